//! Decoder configuration and its validation.

use core::{fmt, str::FromStr, time::Duration};

use thiserror::Error;

use crate::sans::{
    derived::{CompassRose, UvIndexTable},
    sync::FrameFormat,
};

/// An error in a configuration, found before a decoder is constructed.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Night threshold is not a finite number.
    #[error("Night threshold must be finite.")]
    NonFiniteThreshold,
    /// Lower night threshold exceeds the upper one.
    #[error("Lower night threshold ({lower}) exceeds upper night threshold ({upper}).")]
    ThresholdOrder { lower: f32, upper: f32 },
    /// North correction outside of a half turn either way.
    #[error("North correction ({0}) must be within -180 and 180 degrees.")]
    NorthCorrection(i16),
    /// UV index bounds are not finite and strictly increasing.
    #[error("UV index bounds must be finite and strictly increasing.")]
    UvIndexTable,
    /// Frame interval of zero.
    #[error("Frame interval must be greater than zero.")]
    FrameInterval,
    /// Name matching no measurement.
    #[error("Unknown measurement name.")]
    UnknownMeasurement,
}

macro_rules! measurements {
    ($($variant:ident => $name:literal,)*) => {
        /// A value that can be forwarded to a sink, named by its configuration key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        pub enum Measurement {
            $($variant,)*
        }

        impl Measurement {
            /// Every measurement, in the order values are forwarded.
            pub const ALL: &'static [Measurement] = &[$(Measurement::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Measurement::$variant => $name,)*
                }
            }
        }

        impl FromStr for Measurement {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Measurement::$variant),)*
                    _ => Err(ConfigError::UnknownMeasurement),
                }
            }
        }
    };
}

measurements! {
    Temperature => "temperature",
    Humidity => "humidity",
    Pressure => "pressure",
    WindSpeed => "wind_speed",
    WindGust => "wind_gust",
    WindDirectionDegrees => "wind_direction_degrees",
    AccumulatedPrecipitation => "accumulated_precipitation",
    PrecipitationIntensity => "precipitation_intensity",
    Light => "light",
    UvIntensity => "uv_intensity",
    UvIndex => "uv_index",
    BatteryLevel => "battery_level",
    Night => "night",
    WindSpeedText => "wind_speed_text",
    WindDirectionText => "wind_direction_text",
    LightText => "light_text",
    PrecipitationIntensityText => "precipitation_intensity_text",
    WeatherConditionsText => "weather_conditions_text",
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of measurements forwarded to a sink.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Enabled(u32);

impl Enabled {
    pub const NONE: Enabled = Enabled(0);
    pub const ALL: Enabled = Enabled((1 << Measurement::ALL.len()) - 1);

    pub const fn contains(self, m: Measurement) -> bool {
        self.0 & Self::bit(m) != 0
    }

    #[must_use]
    pub const fn with(self, m: Measurement) -> Self {
        Enabled(self.0 | Self::bit(m))
    }

    #[must_use]
    pub const fn without(self, m: Measurement) -> Self {
        Enabled(self.0 & !Self::bit(m))
    }

    /// Enabled measurements, in forwarding order.
    pub fn iter(self) -> impl Iterator<Item = Measurement> {
        Measurement::ALL.iter().copied().filter(move |&m| self.contains(m))
    }

    const fn bit(m: Measurement) -> u32 {
        1 << m as u32
    }
}

impl Default for Enabled {
    fn default() -> Self {
        Enabled::ALL
    }
}

impl FromIterator<Measurement> for Enabled {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        iter.into_iter().fold(Enabled::NONE, Enabled::with)
    }
}

impl fmt::Debug for Enabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Enabled {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Enabled;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of measurement names")
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Enabled, A::Error> {
                let mut enabled = Enabled::NONE;
                while let Some(m) = seq.next_element::<Measurement>()? {
                    enabled = enabled.with(m);
                }
                Ok(enabled)
            }
        }

        d.deserialize_seq(Visitor)
    }
}

/// Light level, in lux, at which night begins and ends.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum NightThreshold {
    /// A single threshold for both directions, without hysteresis.
    Scalar(f32),
    /// Night begins below `lower` and ends above `upper`.
    Band { lower: f32, upper: f32 },
}

impl NightThreshold {
    /// The `(lower, upper)` pair.
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            NightThreshold::Scalar(t) => (t, t),
            NightThreshold::Band { lower, upper } => (lower, upper),
        }
    }
}

impl Default for NightThreshold {
    fn default() -> Self {
        NightThreshold::Band {
            lower: 4.5,
            upper: 5.5,
        }
    }
}

/// Options for a single weather station, fixed once a decoder is built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Config {
    /// Measurements forwarded to the sink.
    pub enabled: Enabled,
    pub night_threshold: NightThreshold,
    /// Degrees added to the wind direction before labelling, within `[-180, 180]`.
    pub north_correction: i16,
    /// Label wind direction on a 16 point rather than an 8 point rose.
    pub secondary_intercardinal_direction: bool,
    pub frame_format: FrameFormat,
    /// Time between two frames, used to turn rain into a rate.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "frame_interval_secs", deserialize_with = "deserialize_secs")
    )]
    pub frame_interval: Duration,
    pub uv_index_table: UvIndexTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: Enabled::ALL,
            night_threshold: NightThreshold::default(),
            north_correction: 0,
            secondary_intercardinal_direction: false,
            frame_format: FrameFormat::Auto,
            frame_interval: Duration::from_secs(16),
            uv_index_table: UvIndexTable::default(),
        }
    }
}

impl Config {
    /// Check every option, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lower, upper) = self.night_threshold.bounds();

        if !lower.is_finite() || !upper.is_finite() {
            Err(ConfigError::NonFiniteThreshold)?;
        }

        if lower > upper {
            Err(ConfigError::ThresholdOrder { lower, upper })?;
        }

        if !(-180..=180).contains(&self.north_correction) {
            Err(ConfigError::NorthCorrection(self.north_correction))?;
        }

        if !self.uv_index_table.is_monotonic() {
            Err(ConfigError::UvIndexTable)?;
        }

        if self.frame_interval.is_zero() {
            Err(ConfigError::FrameInterval)?;
        }

        Ok(())
    }

    pub fn compass_rose(&self) -> CompassRose {
        CompassRose::from(self.secondary_intercardinal_direction)
    }
}

#[cfg(feature = "serde")]
fn deserialize_secs<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    let secs = <f32 as serde::Deserialize>::deserialize(d)?;
    Duration::try_from_secs_f32(secs).map_err(serde::de::Error::custom)
}
