//! Poll-driven decoder for a single station.

use log::{debug, trace, warn};

use crate::{
    config::{Config, ConfigError, Enabled},
    sans::{
        convert::convert,
        derived::{DerivedState, NightDetector, RainGauge, WindVane},
        fields::extract,
        frame::{FrameError, RawFrame},
        sync::Synchronizer,
    },
};

use super::{MeasurementSink, Readings};

/// A non-blocking supply of bytes, such as a serial port.
pub trait ByteSource {
    /// Copy bytes that are ready into `buf`, returning how many were copied.
    ///
    /// Must not wait for bytes to arrive. Returns `0` when nothing is ready.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Take a single ready byte.
    fn pull(&mut self) -> Option<u8> {
        let mut b = [0];
        match self.read(&mut b) {
            0 => None,
            _ => Some(b[0]),
        }
    }
}

/// Counters of recovered faults, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub frames_decoded: usize,
    /// Candidate frames rejected for a bad checksum.
    pub checksum_mismatches: usize,
    /// Pressure extensions dropped for a bad checksum.
    pub pressure_checksum_mismatches: usize,
    /// Frames that did not fit the compiled layout.
    pub layout_violations: usize,
    /// Bytes dropped while searching for a start marker.
    pub bytes_discarded: usize,
}

/// Decoder for one weather station.
///
/// Owns the frame synchronizer and the state derived across frames. Call
/// [`Self::poll`] from the host's periodic loop; each call consumes what the
/// source has ready and decodes every complete frame.
#[derive(Debug)]
pub struct WeatherStation {
    enabled: Enabled,
    sync: Synchronizer,
    state: DerivedState,
    diagnostics: Diagnostics,
}

impl WeatherStation {
    /// Build a decoder, rejecting an invalid configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let (lower, upper) = config.night_threshold.bounds();

        let state = DerivedState {
            night: NightDetector::new(lower, upper),
            rain: RainGauge::new(config.frame_interval),
            vane: WindVane::new(config.north_correction, config.compass_rose()),
            uv: config.uv_index_table,
        };

        debug!("enabled measurements: {:?}", config.enabled);

        Ok(Self {
            enabled: config.enabled,
            sync: Synchronizer::new(config.frame_format),
            state,
            diagnostics: Diagnostics::default(),
        })
    }

    /// Consume the bytes `source` has ready, forwarding values of every
    /// complete frame to `sink`.
    ///
    /// Returns the number of frames decoded. A partial frame stays buffered
    /// until a later poll completes it.
    pub fn poll<S, O>(&mut self, source: &mut S, sink: &mut O) -> usize
    where
        S: ByteSource + ?Sized,
        O: MeasurementSink + ?Sized,
    {
        let mut decoded = 0;

        loop {
            let spare = self.sync.spare_capacity_mut();
            let full = spare.is_empty();
            let n = if full { 0 } else { source.read(spare) };
            self.sync.commit(n);

            if n != 0 {
                trace!("received {n} bytes");
            }

            let idle = n == 0 && !full;
            decoded += self.drain(idle, sink);

            if idle {
                break;
            }
        }

        decoded
    }

    /// Decode bytes handed over directly, rather than read from a source.
    ///
    /// Returns the number of frames decoded.
    pub fn feed<O>(&mut self, mut r: &[u8], sink: &mut O) -> usize
    where
        O: MeasurementSink + ?Sized,
    {
        let mut decoded = 0;

        while !r.is_empty() {
            let n = self.sync.push(r);
            r = &r[n..];
            decoded += self.drain(r.is_empty(), sink);
        }

        decoded
    }

    /// Decode a frame that has already been synchronized and verified.
    ///
    /// Updates the derived state and forwards enabled values to `sink`.
    pub fn decode_frame<O>(
        &mut self,
        frame: &RawFrame,
        sink: &mut O,
    ) -> Result<Readings, FrameError>
    where
        O: MeasurementSink + ?Sized,
    {
        trace!("decoding {frame:?}");

        let fields = match extract(frame) {
            Ok(fields) => fields,
            Err(err) => {
                warn!("dropping frame: {err}");
                self.diagnostics.layout_violations += 1;
                return Err(err);
            }
        };

        let converted = convert(&fields);
        let derived = self.state.update(&fields, &converted);
        let readings = Readings::new(fields.station_id, &converted, &derived);

        debug!("station {:#04x}: {readings:?}", fields.station_id);

        let forwarded = readings.forward(self.enabled, sink);
        trace!("forwarded {forwarded} values");

        self.diagnostics.frames_decoded += 1;

        Ok(readings)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            bytes_discarded: self.sync.discarded(),
            pressure_checksum_mismatches: self.sync.extension_mismatches(),
            ..self.diagnostics
        }
    }

    /// State carried between frames.
    pub fn state(&self) -> &DerivedState {
        &self.state
    }

    /// Drop buffered bytes, for example after the transport was reopened.
    ///
    /// Derived state is kept.
    pub fn reset(&mut self) {
        self.sync.clear();
    }

    fn drain<O>(&mut self, idle: bool, sink: &mut O) -> usize
    where
        O: MeasurementSink + ?Sized,
    {
        let mut decoded = 0;

        loop {
            match self.sync.next_frame(idle) {
                Ok(Some(frame)) => {
                    if self.decode_frame(&frame, sink).is_ok() {
                        decoded += 1;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("dropping frame: {err}");
                    self.diagnostics.checksum_mismatches += 1;
                }
            }
        }

        decoded
    }
}
