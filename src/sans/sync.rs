//! Frame synchronization over a buffered byte stream.

use log::{trace, warn};

use super::{
    check,
    frame::{
        BASIC_FRAME_LEN, FrameError, FrameKind, PRESSURE_FRAME_LEN, RawFrame, START_MARKER,
    },
};

/// Number of bytes the synchronizer can hold between polls.
pub const BUFFER_CAPACITY: usize = 64;

/// Which frame variant the station transmits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FrameFormat {
    /// Every frame is a basic frame.
    Basic,
    /// Every frame carries the pressure extension.
    WithPressure,
    /// Accept an extension when one follows a basic frame.
    #[default]
    Auto,
}

/// Assembles verified frames from bytes pushed in arbitrary chunks.
///
/// Bytes ahead of a start marker are dropped. A candidate frame whose
/// checksum fails is rejected, and scanning resumes at the byte after its
/// marker, so a corrupt stream is always consumed.
#[derive(Debug)]
pub struct Synchronizer {
    buffer: [u8; BUFFER_CAPACITY],
    len: usize,
    format: FrameFormat,
    discarded: usize,
    extension_mismatches: usize,
}

impl Synchronizer {
    pub fn new(format: FrameFormat) -> Self {
        Self {
            buffer: [0; BUFFER_CAPACITY],
            len: 0,
            format,
            discarded: 0,
            extension_mismatches: 0,
        }
    }

    /// Unfilled part of the buffer. Mark bytes written here with [`Self::commit`].
    pub fn spare_capacity_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.len..]
    }

    /// Mark `n` bytes of the spare capacity as filled.
    pub fn commit(&mut self, n: usize) {
        self.len = (self.len + n).min(BUFFER_CAPACITY);
    }

    /// Copy as many bytes from `r` as fit, returning the number taken.
    pub fn push(&mut self, r: &[u8]) -> usize {
        let spare = self.spare_capacity_mut();
        let n = r.len().min(spare.len());
        spare[..n].copy_from_slice(&r[..n]);
        self.commit(n);
        n
    }

    pub fn buffered_len(&self) -> usize {
        self.len
    }

    /// Total bytes dropped while searching for a start marker.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Total pressure extensions dropped for a bad checksum.
    pub fn extension_mismatches(&self) -> usize {
        self.extension_mismatches
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Try to take the next verified frame from the buffer.
    ///
    /// Returns `Ok(None)` if more bytes are needed. Set `idle` once the
    /// source has nothing more to give this poll; it allows a basic frame to
    /// be released in [`FrameFormat::Auto`] without waiting for an extension
    /// that may never come.
    pub fn next_frame(&mut self, idle: bool) -> Result<Option<RawFrame>, FrameError> {
        let skip = self.buffer[..self.len]
            .iter()
            .position(|&b| b == START_MARKER)
            .unwrap_or(self.len);

        if skip != 0 {
            trace!("discarding {skip} bytes ahead of start marker");
            self.discarded += skip;
            self.consume(skip);
        }

        if self.len < BASIC_FRAME_LEN {
            return Ok(None);
        }

        if let Err((found, calculated)) = check::verify(&self.buffer[..BASIC_FRAME_LEN]) {
            // Step over the marker only, a real frame may start inside.
            self.consume(1);
            return Err(FrameError::ChecksumMismatch { found, calculated });
        }

        let extension = &self.buffer[BASIC_FRAME_LEN..self.len.min(PRESSURE_FRAME_LEN)];
        let complete = self.len >= PRESSURE_FRAME_LEN;

        let (kind, consumed) = match self.format {
            FrameFormat::Basic => (FrameKind::Basic, BASIC_FRAME_LEN),
            FrameFormat::WithPressure if !complete => return Ok(None),
            FrameFormat::WithPressure => match check::verify(extension) {
                Ok(()) => (FrameKind::WithPressure, PRESSURE_FRAME_LEN),
                Err((found, calculated)) => {
                    warn!(
                        "dropping pressure extension: found checksum {found:#04x}, calculated {calculated:#04x}"
                    );
                    self.extension_mismatches += 1;
                    (FrameKind::Basic, PRESSURE_FRAME_LEN)
                }
            },
            FrameFormat::Auto if !complete && !idle => return Ok(None),
            FrameFormat::Auto if !complete => (FrameKind::Basic, BASIC_FRAME_LEN),
            // A marker here opens the next frame; no pressure reading starts with it.
            FrameFormat::Auto if extension.first() == Some(&START_MARKER) => {
                (FrameKind::Basic, BASIC_FRAME_LEN)
            }
            FrameFormat::Auto => match check::verify(extension) {
                Ok(()) => (FrameKind::WithPressure, PRESSURE_FRAME_LEN),
                Err(_) => (FrameKind::Basic, BASIC_FRAME_LEN),
            },
        };

        let frame = RawFrame::new(kind, &self.buffer[..self.len]);
        self.consume(consumed);

        Ok(frame)
    }

    fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.buffer.copy_within(n..self.len, 0);
        self.len -= n;
    }
}
