//! Reader-based byte source.
//!
//! _Requires Cargo feature `std`._

use std::io::{ErrorKind, Read};

use log::warn;
use thiserror::Error;

use crate::config::{Config, ConfigError};

use super::{ByteSource, MeasurementSink, WeatherStation};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Invalid decoder configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A [`ByteSource`] over a reader, such as a serial port opened in
/// non-blocking mode or with a short timeout.
///
/// A read that would block or times out counts as no bytes ready. Any other
/// error is logged and kept for [`Self::take_error`]; polling carries on.
#[derive(Debug)]
pub struct ReadSource<R> {
    r: R,
    error: Option<std::io::Error>,
    eof: bool,
}

impl<R: Read> ReadSource<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            error: None,
            eof: false,
        }
    }

    /// Take the last error other than a timeout, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Whether the reader reported its end.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn into_inner(self) -> R {
        self.r
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }

        loop {
            match self.r.read(buf) {
                Ok(0) => {
                    self.eof = true;
                    return 0;
                }
                Ok(n) => return n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return 0;
                }
                Err(err) => {
                    warn!("serial read failed: {err}");
                    self.error = Some(err);
                    return 0;
                }
            }
        }
    }
}

/// Decode every frame a reader yields until its end, publishing to a sink.
///
/// Suited to captures and blocking readers; a reader that keeps reporting
/// `WouldBlock` is polled until it ends.
///
/// This method is also re-exported as `misol::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    config: &Config,
    o: &mut impl MeasurementSink,
) -> Result<WeatherStation, Error> {
    let mut station = WeatherStation::new(config)?;
    let mut source = ReadSource::new(r);

    while !source.is_eof() {
        station.poll(&mut source, o);

        if let Some(err) = source.take_error() {
            Err(err)?;
        }
    }

    Ok(station)
}
