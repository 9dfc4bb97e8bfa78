//! Slice-based byte source.

use crate::config::{Config, ConfigError};

use super::{ByteSource, MeasurementSink, WeatherStation};

/// A [`ByteSource`] over bytes already in memory, such as a capture.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    r: &'a [u8],
    /// Largest number of bytes handed out per read, to mimic a serial FIFO.
    chunk: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(r: &'a [u8]) -> Self {
        Self { r, chunk: usize::MAX }
    }

    /// Hand out at most `chunk` bytes per read.
    pub fn with_chunk(r: &'a [u8], chunk: usize) -> Self {
        Self {
            r,
            chunk: chunk.max(1),
        }
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> &'a [u8] {
        self.r
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.r.len()).min(self.chunk);
        let (head, tail) = self.r.split_at(n);
        buf[..n].copy_from_slice(head);
        self.r = tail;
        n
    }
}

/// Decode every frame in a slice of a captured stream, publishing to a sink.
///
/// This method is also re-exported as `misol::avec::decode_slice`.
///
/// Returns the decoder, so its state and diagnostics can be inspected.
pub fn decode(
    r: &[u8],
    config: &Config,
    o: &mut impl MeasurementSink,
) -> Result<WeatherStation, ConfigError> {
    let mut station = WeatherStation::new(config)?;
    station.poll(&mut SliceSource::new(r), o);
    Ok(station)
}
