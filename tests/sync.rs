use misol::sans::{
    frame::{FrameError, FrameKind},
    sync::{BUFFER_CAPACITY, FrameFormat, Synchronizer},
};

mod support;

use support::Frame;

/// Take frames until the synchronizer needs more bytes.
fn drain(sync: &mut Synchronizer, idle: bool) -> Vec<Result<Vec<u8>, FrameError>> {
    let mut out = vec![];
    loop {
        match sync.next_frame(idle) {
            Ok(Some(frame)) => out.push(Ok(frame.as_bytes().to_vec())),
            Ok(None) => return out,
            Err(err) => out.push(Err(err)),
        }
    }
}

#[test]
fn skips_bytes_ahead_of_marker() {
    let frame = Frame::default().encode();
    let mut sync = Synchronizer::new(FrameFormat::Basic);

    sync.push(&[0x00, 0x13, 0x37]);
    sync.push(&frame);

    assert_eq!(drain(&mut sync, true), vec![Ok(frame)]);
    assert_eq!(sync.discarded(), 3);
    assert_eq!(sync.buffered_len(), 0);
}

#[test]
fn rejects_corrupt_frame_and_recovers() {
    let mut corrupt = Frame::default().encode();
    corrupt[5] ^= 0x01;
    let next = Frame {
        temperature: 600,
        ..Frame::default()
    }
    .encode();

    let mut sync = Synchronizer::new(FrameFormat::Auto);
    sync.push(&corrupt);
    sync.push(&next);

    let frames = drain(&mut sync, true);

    assert_eq!(frames.len(), 2);
    assert_eq!(
        frames[0],
        Err(FrameError::ChecksumMismatch {
            found: 0xc2,
            calculated: 0xc3
        })
    );
    assert_eq!(frames[1], Ok(next));
    // The rest of the corrupt frame, after its marker.
    assert_eq!(sync.discarded(), 16);
}

#[test]
fn waits_for_rest_of_frame() {
    let frame = Frame::default().encode();
    let mut sync = Synchronizer::new(FrameFormat::Auto);

    sync.push(&frame[..10]);
    assert_eq!(sync.next_frame(true), Ok(None));
    assert_eq!(sync.buffered_len(), 10);

    sync.push(&frame[10..]);
    let frame = sync.next_frame(true).unwrap().unwrap();
    assert_eq!(frame.kind(), FrameKind::Basic);
    assert_eq!(frame.extension(), None);
}

#[test]
fn auto_defers_basic_frame_until_idle() {
    let frame = Frame::default().encode();
    let mut sync = Synchronizer::new(FrameFormat::Auto);

    sync.push(&frame);

    assert_eq!(sync.next_frame(false), Ok(None));
    assert_eq!(
        sync.next_frame(true).unwrap().map(|f| f.kind()),
        Some(FrameKind::Basic)
    );
}

#[test]
fn auto_accepts_pressure_extension() {
    let frame = Frame::default().encode_with_pressure(101_325);
    let mut sync = Synchronizer::new(FrameFormat::Auto);

    sync.push(&frame);

    let raw = sync.next_frame(false).unwrap().unwrap();
    assert_eq!(raw.kind(), FrameKind::WithPressure);
    assert_eq!(raw.extension(), Some(&frame[17..]));
    assert_eq!(raw.as_bytes(), &frame[..]);
    assert_eq!(sync.buffered_len(), 0);
}

#[test]
fn auto_does_not_mistake_next_frame_for_extension() {
    let first = Frame::default().encode();
    let second = Frame {
        humidity: 57,
        ..Frame::default()
    }
    .encode();

    let mut sync = Synchronizer::new(FrameFormat::Auto);
    sync.push(&first);
    sync.push(&second);

    assert_eq!(drain(&mut sync, true), vec![Ok(first), Ok(second)]);
    assert_eq!(sync.discarded(), 0);
}

#[test]
fn auto_keeps_next_frame_resembling_extension() {
    let first = Frame::default().encode();
    // 0x24 + 0x5a + 0x04 matches the flags byte 0x82 of a 260 degree bearing.
    let second = Frame {
        wind_direction: 260,
        ..Frame::default()
    }
    .encode();
    assert_eq!(second[3], 0x82);

    let mut sync = Synchronizer::new(FrameFormat::Auto);
    sync.push(&first);
    sync.push(&second);

    let raw = sync.next_frame(false).unwrap().unwrap();
    assert_eq!(raw.kind(), FrameKind::Basic);
    assert_eq!(raw.as_bytes(), &first[..]);

    assert_eq!(drain(&mut sync, true), vec![Ok(second)]);
    assert_eq!(sync.discarded(), 0);
}

#[test]
fn rejects_every_single_bit_flip() {
    let good = Frame {
        humidity: 57,
        ..Frame::default()
    }
    .encode();

    for byte in 0..16 {
        for bit in 0..8 {
            let mut corrupt = Frame::default().encode();
            corrupt[byte] ^= 1 << bit;

            let mut sync = Synchronizer::new(FrameFormat::Auto);
            sync.push(&corrupt);
            sync.push(&good);

            let frames: Vec<_> = drain(&mut sync, true)
                .into_iter()
                .filter_map(Result::ok)
                .collect();

            assert_eq!(frames, [good.clone()], "bit {bit} of byte {byte}");
        }
    }
}

#[test]
fn basic_format_ignores_extension() {
    let frame = Frame::default().encode_with_pressure(101_325);
    let mut sync = Synchronizer::new(FrameFormat::Basic);

    sync.push(&frame);

    assert_eq!(drain(&mut sync, true), vec![Ok(frame[..17].to_vec())]);
    // The extension carries no marker and is dropped.
    assert_eq!(sync.discarded(), 4);
}

#[test]
fn pressure_format_waits_for_extension() {
    let frame = Frame::default().encode_with_pressure(101_325);
    let mut sync = Synchronizer::new(FrameFormat::WithPressure);

    sync.push(&frame[..17]);
    assert_eq!(sync.next_frame(true), Ok(None));

    sync.push(&frame[17..]);
    assert_eq!(
        sync.next_frame(true).unwrap().map(|f| f.kind()),
        Some(FrameKind::WithPressure)
    );
}

#[test]
fn pressure_format_drops_corrupt_extension() {
    let mut frame = Frame::default().encode_with_pressure(101_325);
    frame[18] ^= 0x80;
    let mut sync = Synchronizer::new(FrameFormat::WithPressure);

    sync.push(&frame);

    let raw = sync.next_frame(true).unwrap().unwrap();
    assert_eq!(raw.kind(), FrameKind::Basic);
    assert_eq!(raw.as_bytes(), &frame[..17]);
    assert_eq!(sync.extension_mismatches(), 1);
    assert_eq!(sync.buffered_len(), 0);
}

#[test]
fn always_makes_progress() {
    let mut sync = Synchronizer::new(FrameFormat::Auto);

    assert_eq!(sync.push(&[0x24; 100]), BUFFER_CAPACITY);

    let frames = drain(&mut sync, true);

    assert_eq!(frames.len(), BUFFER_CAPACITY - 16);
    assert!(frames.iter().all(Result::is_err));
    assert_eq!(sync.buffered_len(), 16);
}

#[test]
fn clear_drops_buffered_bytes() {
    let frame = Frame::default().encode();
    let mut sync = Synchronizer::new(FrameFormat::Auto);

    sync.push(&frame[..12]);
    sync.clear();
    sync.push(&frame);

    assert_eq!(drain(&mut sync, true), vec![Ok(frame)]);
}
