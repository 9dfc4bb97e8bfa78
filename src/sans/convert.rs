//! Conversion of raw fields to physical units.

use super::fields::FieldSet;

/// Temperature offset, in tenths of a degree Celsius.
const TEMPERATURE_OFFSET: i32 = 400;
/// Wind speed per count of the anemometer, in metres per second.
const WIND_SPEED_STEP: f32 = 1.12;
/// Rain per tip of the gauge, in millimetres.
pub const RAINFALL_STEP: f32 = 0.3;
/// Milliwatts per square metre in one microwatt per square centimetre.
const UV_SCALE: f32 = 10.0;

/// Measurements of a single frame in physical units.
///
/// Values derived across frames (night, precipitation intensity, labels) are
/// not included; see [`crate::sans::derived`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Converted {
    /// °C.
    pub temperature: Option<f32>,
    /// %.
    pub humidity: Option<f32>,
    /// hPa.
    pub pressure: Option<f32>,
    /// m/s.
    pub wind_speed: Option<f32>,
    /// m/s.
    pub wind_gust: Option<f32>,
    /// Degrees in `[0, 360)`, uncorrected.
    pub wind_direction_degrees: Option<f32>,
    /// mm.
    pub accumulated_precipitation: f32,
    /// lx.
    pub light: Option<f32>,
    /// mW/m².
    pub uv_intensity: Option<f32>,
    pub battery_low: bool,
}

/// Apply scale, offset, and rounding to each raw field.
pub fn convert(fields: &FieldSet) -> Converted {
    let temperature = fields
        .temperature
        .map(|t| round((i32::from(t) - TEMPERATURE_OFFSET) as f32 / 10.0, 1));

    let humidity = fields
        .humidity
        .map(|h| round(f32::from(h).clamp(0.0, 100.0), 2));

    let pressure = fields.pressure.map(|p| round(p as f32 / 100.0, 2));

    let wind_speed = fields
        .wind_speed
        .map(|s| round(f32::from(s) / 8.0 * WIND_SPEED_STEP, 2));

    let wind_gust = fields
        .wind_gust
        .map(|g| round(f32::from(g) * WIND_SPEED_STEP, 2));

    let wind_direction_degrees = fields
        .wind_direction
        .map(|d| f32::from(d % 360));

    let accumulated_precipitation = round(f32::from(fields.rainfall) * RAINFALL_STEP, 1);

    let light = fields.light.map(|l| round(l as f32 / 10.0, 1));

    let uv_intensity = fields.uv.map(|u| round(f32::from(u) * UV_SCALE, 1));

    Converted {
        temperature,
        humidity,
        pressure,
        wind_speed,
        wind_gust,
        wind_direction_degrees,
        accumulated_precipitation,
        light,
        uv_intensity,
        battery_low: fields.low_battery,
    }
}

/// Round to zero, one, or two decimal places.
pub(crate) fn round(x: f32, decimals: u8) -> f32 {
    let scale = match decimals {
        0 => 1.0,
        1 => 10.0,
        _ => 100.0,
    };
    libm::roundf(x * scale) / scale
}
