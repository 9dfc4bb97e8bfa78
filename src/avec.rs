//! Convenience interfaces for decoding a live station.
//!
//! A [`WeatherStation`] is polled with a [`ByteSource`], and forwards each
//! decoded value to a [`MeasurementSink`]. A value is forwarded only when the
//! frame carries it and the [`Config`](crate::config::Config) enables it.
//!
//! In many cases the sink can be derived. See the
//! [`MeasurementSink`](macro@MeasurementSink) macro for details.

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;
mod station;

#[cfg(feature = "std")]
pub use reader::{ReadSource, decode as decode_reader};
pub use slice::{SliceSource, decode as decode_slice};
pub use station::{ByteSource, Diagnostics, WeatherStation};

use crate::{
    config::{Enabled, Measurement},
    sans::{
        convert::Converted,
        derived::{CompassPoint, Derived},
        describe::{Beaufort, Brightness, Conditions, Precipitation},
    },
};

/// Derive [`MeasurementSink`] for a struct holding received values.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// To keep the latest value of a measurement, add the `measurement(key)`
/// attribute to an `Option<T>` struct field, where `key` names a method
/// `set_key` of [`MeasurementSink`] and `T` is the type it receives.
///
/// ```
/// #[derive(Debug, Default, MeasurementSink)]
/// struct Latest {
///     #[measurement(temperature)]
///     temperature: Option<f32>,
///     #[measurement(wind_direction_text)]
///     wind_direction: Option<CompassPoint>,
///     #[measurement(night)]
///     night: Option<bool>,
/// }
/// ```
///
/// To do anything else with a value, supply an accumulator closure. Since the
/// value type cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, MeasurementSink)]
/// struct Gusts {
///     #[measurement(wind_gust, |v, x: f32| v.push(x))]
///     history: Vec<f32>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use misol_derive::MeasurementSink;

/// Receive decoded values from a [`WeatherStation`].
///
/// Each method is called at most once per decoded frame. The default
/// implementation of each method ignores received values.
///
/// See the [`MeasurementSink`](macro@MeasurementSink) derive macro for an
/// automatic implementation of this trait.
#[allow(unused_variables)]
pub trait MeasurementSink {
    /// Air temperature, in °C.
    fn set_temperature(&mut self, _: f32) {}
    /// Relative humidity, in %.
    fn set_humidity(&mut self, _: f32) {}
    /// Barometric pressure, in hPa.
    fn set_pressure(&mut self, _: f32) {}
    /// Average wind speed, in m/s.
    fn set_wind_speed(&mut self, _: f32) {}
    /// Wind gust, in m/s.
    fn set_wind_gust(&mut self, _: f32) {}
    /// Wind direction as measured, in degrees.
    fn set_wind_direction_degrees(&mut self, _: f32) {}
    /// Rain since the station started, in mm.
    fn set_accumulated_precipitation(&mut self, _: f32) {}
    /// Rain rate since the previous frame, in mm/h.
    fn set_precipitation_intensity(&mut self, _: f32) {}
    /// Illuminance, in lx.
    fn set_light(&mut self, _: f32) {}
    /// UV intensity, in mW/m².
    fn set_uv_intensity(&mut self, _: f32) {}
    fn set_uv_index(&mut self, _: u8) {}
    /// Battery state, `true` when low.
    fn set_battery_level(&mut self, _: bool) {}
    fn set_night(&mut self, _: bool) {}

    fn set_wind_speed_text(&mut self, _: Beaufort) {}
    /// Wind direction after north correction.
    fn set_wind_direction_text(&mut self, _: CompassPoint) {}
    fn set_light_text(&mut self, _: Brightness) {}
    fn set_precipitation_intensity_text(&mut self, _: Precipitation) {}
    fn set_weather_conditions_text(&mut self, _: Conditions) {}
}

/// Every value decoded from a single frame.
///
/// A value is `None` when the frame does not carry what it needs.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Readings {
    pub station_id: u8,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub pressure: Option<f32>,
    pub wind_speed: Option<f32>,
    pub wind_gust: Option<f32>,
    pub wind_direction_degrees: Option<f32>,
    pub accumulated_precipitation: Option<f32>,
    pub precipitation_intensity: Option<f32>,
    pub light: Option<f32>,
    pub uv_intensity: Option<f32>,
    pub uv_index: Option<u8>,
    pub battery_level: Option<bool>,
    pub night: Option<bool>,
    pub wind_speed_text: Option<Beaufort>,
    pub wind_direction_text: Option<CompassPoint>,
    pub light_text: Option<Brightness>,
    pub precipitation_intensity_text: Option<Precipitation>,
    pub weather_conditions_text: Option<Conditions>,
}

impl Readings {
    pub fn new(station_id: u8, converted: &Converted, derived: &Derived) -> Self {
        let wind_speed_text = converted.wind_speed.map(Beaufort::from_speed);
        let light_text = converted.light.map(Brightness::from_light);
        let precipitation_intensity_text = derived
            .precipitation_intensity
            .map(Precipitation::from_intensity);

        let weather_conditions_text = Conditions::summarize(
            precipitation_intensity_text,
            wind_speed_text,
            derived.night,
            light_text,
        );

        Self {
            station_id,
            temperature: converted.temperature,
            humidity: converted.humidity,
            pressure: converted.pressure,
            wind_speed: converted.wind_speed,
            wind_gust: converted.wind_gust,
            wind_direction_degrees: converted.wind_direction_degrees,
            accumulated_precipitation: Some(converted.accumulated_precipitation),
            precipitation_intensity: derived.precipitation_intensity,
            light: converted.light,
            uv_intensity: converted.uv_intensity,
            uv_index: derived.uv_index,
            battery_level: Some(converted.battery_low),
            night: derived.night,
            wind_speed_text,
            wind_direction_text: derived.wind_direction,
            light_text,
            precipitation_intensity_text,
            weather_conditions_text,
        }
    }

    /// Whether this frame produced a value for a measurement.
    pub fn is_present(&self, m: Measurement) -> bool {
        match m {
            Measurement::Temperature => self.temperature.is_some(),
            Measurement::Humidity => self.humidity.is_some(),
            Measurement::Pressure => self.pressure.is_some(),
            Measurement::WindSpeed => self.wind_speed.is_some(),
            Measurement::WindGust => self.wind_gust.is_some(),
            Measurement::WindDirectionDegrees => self.wind_direction_degrees.is_some(),
            Measurement::AccumulatedPrecipitation => self.accumulated_precipitation.is_some(),
            Measurement::PrecipitationIntensity => self.precipitation_intensity.is_some(),
            Measurement::Light => self.light.is_some(),
            Measurement::UvIntensity => self.uv_intensity.is_some(),
            Measurement::UvIndex => self.uv_index.is_some(),
            Measurement::BatteryLevel => self.battery_level.is_some(),
            Measurement::Night => self.night.is_some(),
            Measurement::WindSpeedText => self.wind_speed_text.is_some(),
            Measurement::WindDirectionText => self.wind_direction_text.is_some(),
            Measurement::LightText => self.light_text.is_some(),
            Measurement::PrecipitationIntensityText => self.precipitation_intensity_text.is_some(),
            Measurement::WeatherConditionsText => self.weather_conditions_text.is_some(),
        }
    }

    /// Publish every value that is both present and enabled.
    ///
    /// Returns the number of values published.
    pub fn forward<S: MeasurementSink + ?Sized>(&self, enabled: Enabled, sink: &mut S) -> usize {
        let mut forwarded = 0;

        for &m in Measurement::ALL {
            let present = self.is_present(m);
            let wanted = enabled.contains(m);

            if present && wanted {
                self.publish(m, sink);
                forwarded += 1;
            }
        }

        forwarded
    }

    fn publish<S: MeasurementSink + ?Sized>(&self, m: Measurement, sink: &mut S) {
        macro_rules! publish {
            ($field:ident, $method:ident) => {
                if let Some(value) = self.$field {
                    sink.$method(value)
                }
            };
        }

        match m {
            Measurement::Temperature => publish!(temperature, set_temperature),
            Measurement::Humidity => publish!(humidity, set_humidity),
            Measurement::Pressure => publish!(pressure, set_pressure),
            Measurement::WindSpeed => publish!(wind_speed, set_wind_speed),
            Measurement::WindGust => publish!(wind_gust, set_wind_gust),
            Measurement::WindDirectionDegrees => {
                publish!(wind_direction_degrees, set_wind_direction_degrees)
            }
            Measurement::AccumulatedPrecipitation => {
                publish!(accumulated_precipitation, set_accumulated_precipitation)
            }
            Measurement::PrecipitationIntensity => {
                publish!(precipitation_intensity, set_precipitation_intensity)
            }
            Measurement::Light => publish!(light, set_light),
            Measurement::UvIntensity => publish!(uv_intensity, set_uv_intensity),
            Measurement::UvIndex => publish!(uv_index, set_uv_index),
            Measurement::BatteryLevel => publish!(battery_level, set_battery_level),
            Measurement::Night => publish!(night, set_night),
            Measurement::WindSpeedText => publish!(wind_speed_text, set_wind_speed_text),
            Measurement::WindDirectionText => {
                publish!(wind_direction_text, set_wind_direction_text)
            }
            Measurement::LightText => publish!(light_text, set_light_text),
            Measurement::PrecipitationIntensityText => publish!(
                precipitation_intensity_text,
                set_precipitation_intensity_text
            ),
            Measurement::WeatherConditionsText => {
                publish!(weather_conditions_text, set_weather_conditions_text)
            }
        }
    }
}
