#![cfg(feature = "std")]

use std::{
    collections::VecDeque,
    io::{self, Cursor, ErrorKind, Read},
};

use misol::{
    avec::{ByteSource, ReadSource, WeatherStation, reader::Error},
    config::{Config, NightThreshold},
};

mod support;

use support::{Frame, Recorder, init_logger};

/// Reader replaying a script of reads, then reporting its end.
struct Script(VecDeque<io::Result<Vec<u8>>>);

impl Read for Script {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.pop_front() {
            None => Ok(0),
            Some(Err(err)) => Err(err),
            Some(Ok(mut r)) => {
                let n = r.len().min(buf.len());
                buf[..n].copy_from_slice(&r[..n]);
                if n < r.len() {
                    self.0.push_front(Ok(r.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

#[test]
fn decodes_until_end() {
    init_logger();
    let mut stream = Frame::default().encode();
    stream.extend(Frame::default().encode_with_pressure(101_325));
    let mut recorder = Recorder::default();

    let station =
        misol::avec::decode_reader(&mut Cursor::new(stream), &Config::default(), &mut recorder)
            .unwrap();

    assert_eq!(station.diagnostics().frames_decoded, 2);
    assert_eq!(recorder.get("pressure"), Some("1013.25"));
}

#[test]
fn would_block_counts_as_no_bytes() {
    let frame = Frame::default().encode();
    let mut source = ReadSource::new(Script(VecDeque::from([
        Ok(frame[..5].to_vec()),
        Err(ErrorKind::WouldBlock.into()),
        Err(ErrorKind::Interrupted.into()),
        Ok(frame[5..].to_vec()),
        Err(ErrorKind::TimedOut.into()),
    ])));
    let mut station = WeatherStation::new(&Config::default()).unwrap();
    let mut recorder = Recorder::default();

    assert_eq!(station.poll(&mut source, &mut recorder), 0);
    assert_eq!(station.poll(&mut source, &mut recorder), 1);
    assert!(source.take_error().is_none());
    assert!(!source.is_eof());

    assert_eq!(source.pull(), None);
    assert!(source.is_eof());
}

#[test]
fn keeps_reader_errors() {
    let frame = Frame::default().encode();
    let mut reader = Script(VecDeque::from([
        Ok(frame),
        Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged")),
    ]));
    let mut recorder = Recorder::default();

    let result = misol::avec::decode_reader(&mut reader, &Config::default(), &mut recorder);

    assert!(matches!(result, Err(Error::Io(err)) if err.kind() == ErrorKind::BrokenPipe));
    assert_eq!(recorder.get("temperature"), Some("23.4"));
}

#[test]
fn rejects_invalid_config() {
    let config = Config {
        night_threshold: NightThreshold::Band {
            lower: 6.0,
            upper: 4.0,
        },
        ..Config::default()
    };

    let result = misol::avec::decode_reader(&mut io::empty(), &config, &mut Recorder::default());

    assert!(matches!(result, Err(Error::Config(_))));
}
