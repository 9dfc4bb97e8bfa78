//! Protocol constants and wire layout.
//!
//! Everything tied to a particular revision of the station firmware lives in
//! this module: the start marker, frame lengths, and the byte layout of both
//! frame parts. All multi-byte values are big-endian.
//!
//! ```text
//!  0      1    2       3       4      5     6       7     8..10  10..12 12..15 15    16
//! +------+----+-------+-------+------+-----+-------+-----+------+------+------+-----+-----+
//! | 0x24 | id | dir   | flags | temp | hum | speed | gust| rain | uv   | light| rsv | sum |
//! +------+----+-------+-------+------+-----+-------+-----+------+------+------+-----+-----+
//!
//!  17..20     20
//! +----------+-----+
//! | pressure | sum |    (pressure extension, optional)
//! +----------+-----+
//! ```

use thiserror::Error;
use zerocopy::FromBytes;

/// First byte of every frame.
pub const START_MARKER: u8 = 0x24;

/// Length of a frame without the pressure extension, checksum included.
pub const BASIC_FRAME_LEN: usize = 17;

/// Length of the pressure extension, checksum included.
pub const PRESSURE_EXTENSION_LEN: usize = 4;

/// Length of a frame carrying the pressure extension.
pub const PRESSURE_FRAME_LEN: usize = BASIC_FRAME_LEN + PRESSURE_EXTENSION_LEN;

/// An error raised against a synchronized frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Calculated and found checksum values do not match.
    #[error("Calculated ({calculated:#04x}) and found ({found:#04x}) checksum values do not match.")]
    ChecksumMismatch { found: u8, calculated: u8 },
    /// Frame length disagrees with the compiled layout.
    #[error("Frame of {actual} bytes does not fit the {expected} byte layout.")]
    LayoutViolation { expected: usize, actual: usize },
}

/// Which parts a synchronized frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Basic measurements only.
    Basic,
    /// Basic measurements followed by a verified pressure extension.
    WithPressure,
}

impl FrameKind {
    /// Total length of a frame of this kind.
    pub fn len(self) -> usize {
        match self {
            FrameKind::Basic => BASIC_FRAME_LEN,
            FrameKind::WithPressure => PRESSURE_FRAME_LEN,
        }
    }
}

/// A verified frame, copied out of the synchronizer's buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; PRESSURE_FRAME_LEN],
    kind: FrameKind,
}

impl RawFrame {
    /// Copy a frame of the given kind from the front of `r`.
    ///
    /// Returns `None` if `r` is shorter than the frame.
    pub fn new(kind: FrameKind, r: &[u8]) -> Option<Self> {
        let r = r.get(..kind.len())?;
        let mut bytes = [0; PRESSURE_FRAME_LEN];
        bytes[..r.len()].copy_from_slice(r);

        Some(Self { bytes, kind })
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// The frame bytes, checksums included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.kind.len()]
    }

    /// The basic part of the frame.
    pub fn basic(&self) -> &[u8] {
        &self.bytes[..BASIC_FRAME_LEN]
    }

    /// The pressure extension, if carried.
    pub fn extension(&self) -> Option<&[u8]> {
        match self.kind {
            FrameKind::Basic => None,
            FrameKind::WithPressure => Some(&self.bytes[BASIC_FRAME_LEN..PRESSURE_FRAME_LEN]),
        }
    }
}

impl core::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RawFrame({:?}, [", self.kind)?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        f.write_str("])")
    }
}

/// Byte layout of the basic frame.
#[repr(C, packed)]
#[derive(Debug, FromBytes)]
pub(crate) struct BasicLayout {
    pub marker: u8,
    pub station_id: u8,
    pub wind_direction: u8,
    pub flags: u8,
    pub temperature: u8,
    pub humidity: u8,
    pub wind_speed: u8,
    pub wind_gust: u8,
    pub rainfall: [u8; 2],
    pub uv: [u8; 2],
    pub light: [u8; 3],
    pub _reserved: u8,
    pub checksum: u8,
}

/// Byte layout of the pressure extension.
#[repr(C, packed)]
#[derive(Debug, FromBytes)]
pub(crate) struct PressureLayout {
    pub pressure: [u8; 3],
    pub checksum: u8,
}
