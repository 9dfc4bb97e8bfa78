//! Values computed with memory of earlier frames.
//!
//! [`DerivedState`] is owned by a single decoder and updated once per frame.
//! Every update is total: out-of-range input is clamped or ignored, never
//! rejected.

use core::{fmt, time::Duration};

use super::{
    convert::{Converted, RAINFALL_STEP, round},
    fields::FieldSet,
};

/// Night detection with hysteresis.
///
/// Night begins when light falls below `lower` and ends when it rises above
/// `upper`. Between the two thresholds the previous state is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightDetector {
    lower: f32,
    upper: f32,
    night: bool,
}

impl NightDetector {
    /// Thresholds must satisfy `lower <= upper`; see [`crate::config::Config::validate`].
    pub fn new(lower: f32, upper: f32) -> Self {
        Self {
            lower,
            upper,
            night: false,
        }
    }

    /// Feed a light reading in lux, returning the updated state.
    pub fn update(&mut self, light: f32) -> bool {
        if !self.night && light < self.lower {
            self.night = true;
        } else if self.night && light > self.upper {
            self.night = false;
        }

        self.night
    }

    pub fn is_night(&self) -> bool {
        self.night
    }
}

/// Precipitation intensity from successive readings of the tip counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainGauge {
    last: Option<u16>,
    scale: f32,
}

impl RainGauge {
    /// `interval` is the time between two frames of the station.
    pub fn new(interval: Duration) -> Self {
        let hours = interval.as_secs_f32() / 3600.0;

        Self {
            last: None,
            scale: RAINFALL_STEP / hours,
        }
    }

    /// Feed the current tip counter, returning the intensity in mm/h.
    ///
    /// Returns `None` on the first reading. A counter lower than the
    /// previous one (the station restarted) counts as no rain.
    pub fn update(&mut self, counter: u16) -> Option<f32> {
        let intensity = self
            .last
            .map(|last| round(f32::from(counter.saturating_sub(last)) * self.scale, 2));

        self.last = Some(counter);

        intensity
    }

    pub fn last_counter(&self) -> Option<u16> {
        self.last
    }
}

/// A point of the compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// All sixteen points, clockwise from north.
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }

    /// The nearest point to a bearing, on a rose of 8 or 16 points.
    pub fn from_degrees(degrees: f32, rose: CompassRose) -> Self {
        let sectors = rose.sectors();
        let width = 360.0 / sectors as f32;
        let degrees = degrees.clamp(0.0, 360.0);

        // Truncation floors here since the operand is never negative.
        let sector = ((degrees + width / 2.0) / width) as usize % sectors;

        Self::ALL[sector * (16 / sectors)]
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution of the compass rose used for direction labels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompassRose {
    /// Cardinal and intercardinal directions.
    #[default]
    EightPoint,
    /// Adds the secondary intercardinal directions.
    SixteenPoint,
}

impl CompassRose {
    pub fn sectors(self) -> usize {
        match self {
            CompassRose::EightPoint => 8,
            CompassRose::SixteenPoint => 16,
        }
    }
}

impl From<bool> for CompassRose {
    /// Map the secondary-intercardinal flag to a rose.
    fn from(secondary_intercardinals: bool) -> Self {
        if secondary_intercardinals {
            CompassRose::SixteenPoint
        } else {
            CompassRose::EightPoint
        }
    }
}

/// Wind direction labelling relative to true north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindVane {
    north_correction: i16,
    rose: CompassRose,
}

impl WindVane {
    /// `north_correction` must be within `[-180, 180]`.
    pub fn new(north_correction: i16, rose: CompassRose) -> Self {
        Self {
            north_correction,
            rose,
        }
    }

    /// Apply the north correction, wrapping into `[0, 360)`.
    pub fn correct(&self, raw_degrees: u16) -> u16 {
        (i32::from(raw_degrees) + i32::from(self.north_correction)).rem_euclid(360) as u16
    }

    pub fn label(&self, raw_degrees: u16) -> CompassPoint {
        CompassPoint::from_degrees(f32::from(self.correct(raw_degrees)), self.rose)
    }
}

/// Number of upper bounds in a [`UvIndexTable`].
pub const UV_INDEX_BANDS: usize = 13;

/// Banding of UV intensity into the UV index.
///
/// Holds the upper bound of each index in mW/m², strictly increasing. The
/// index of an intensity is the number of bounds it exceeds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UvIndexTable(pub [f32; UV_INDEX_BANDS]);

impl Default for UvIndexTable {
    fn default() -> Self {
        Self([
            4320.0, 8510.0, 12100.0, 15700.0, 20170.0, 24500.0, 27610.0, 31000.0, 35120.0,
            39180.0, 42770.0, 46500.0, 50290.0,
        ])
    }
}

impl UvIndexTable {
    pub fn index(&self, intensity: f32) -> u8 {
        self.0.iter().take_while(|&&bound| bound < intensity).count() as u8
    }

    /// Whether the bounds are finite and strictly increasing.
    pub fn is_monotonic(&self) -> bool {
        self.0.iter().all(|b| b.is_finite()) && self.0.windows(2).all(|w| w[0] < w[1])
    }
}

/// Values derived from one frame together with the state of earlier ones.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Derived {
    pub night: Option<bool>,
    /// mm/h.
    pub precipitation_intensity: Option<f32>,
    pub wind_direction: Option<CompassPoint>,
    pub uv_index: Option<u8>,
}

/// State carried between frames by one decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedState {
    pub night: NightDetector,
    pub rain: RainGauge,
    pub vane: WindVane,
    pub uv: UvIndexTable,
}

impl DerivedState {
    /// Advance the state by one frame.
    pub fn update(&mut self, fields: &FieldSet, converted: &Converted) -> Derived {
        Derived {
            night: converted.light.map(|l| self.night.update(l)),
            precipitation_intensity: self.rain.update(fields.rainfall),
            wind_direction: fields.wind_direction.map(|d| self.vane.label(d)),
            uv_index: converted.uv_intensity.map(|u| self.uv.index(u)),
        }
    }
}
