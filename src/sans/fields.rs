//! Extraction of raw integer fields from a verified frame.

use tartan_bitfield::bitfield;

use super::frame::{
    BASIC_FRAME_LEN, BasicLayout, FrameError, PRESSURE_EXTENSION_LEN, PressureLayout, RawFrame,
};

/// Raw field values of a single frame, before unit conversion.
///
/// A field is `None` when the frame does not carry it, or carries the
/// all-ones marker a station sends for a missing sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    pub station_id: u8,
    /// 9 bits, degrees.
    pub wind_direction: Option<u16>,
    pub low_battery: bool,
    /// 11 bits, tenths of a degree Celsius above -40.
    pub temperature: Option<u16>,
    /// Percent.
    pub humidity: Option<u8>,
    /// 9 bits, eighths of 1.12 m/s.
    pub wind_speed: Option<u16>,
    /// Multiples of 1.12 m/s.
    pub wind_gust: Option<u8>,
    /// Tip counter, 0.3 mm per tip.
    pub rainfall: u16,
    /// µW/cm².
    pub uv: Option<u16>,
    /// 24 bits, tenths of a lux.
    pub light: Option<u32>,
    /// 24 bits, hundredths of a hectopascal.
    pub pressure: Option<u32>,
}

/// Read each field of a verified frame from its place in the wire layout.
pub fn extract(frame: &RawFrame) -> Result<FieldSet, FrameError> {
    let basic: [u8; BASIC_FRAME_LEN] =
        frame
            .basic()
            .try_into()
            .map_err(|_| FrameError::LayoutViolation {
                expected: BASIC_FRAME_LEN,
                actual: frame.basic().len(),
            })?;

    let BasicLayout {
        station_id,
        wind_direction,
        flags,
        temperature,
        humidity,
        wind_speed,
        wind_gust,
        rainfall,
        uv,
        light,
        ..
    } = zerocopy::transmute!(basic);

    bitfield! {
        /// Battery state and the high bits of three fields.
        struct Flags(u8) {
            [0..3] temperature_high: u8,
            [3] low_battery,
            [4] wind_speed_high,
            [7] wind_direction_high,
        }
    }

    let flags = Flags(flags);

    let wind_direction = u16::from(wind_direction) | u16::from(flags.wind_direction_high()) << 8;
    let temperature = u16::from(temperature) | u16::from(flags.temperature_high()) << 8;
    let wind_speed = u16::from(wind_speed) | u16::from(flags.wind_speed_high()) << 8;
    let light = u32::from_be_bytes([0, light[0], light[1], light[2]]);

    let pressure = match frame.extension() {
        Some(extension) => {
            let extension: [u8; PRESSURE_EXTENSION_LEN] =
                extension
                    .try_into()
                    .map_err(|_| FrameError::LayoutViolation {
                        expected: PRESSURE_EXTENSION_LEN,
                        actual: extension.len(),
                    })?;

            let PressureLayout { pressure, .. } = zerocopy::transmute!(extension);
            valid(u32::from_be_bytes([0, pressure[0], pressure[1], pressure[2]]), 24)
        }
        None => None,
    };

    Ok(FieldSet {
        station_id,
        wind_direction: valid(wind_direction, 9),
        low_battery: flags.low_battery(),
        temperature: valid(temperature, 11),
        humidity: valid(humidity, 8),
        wind_speed: valid(wind_speed, 9),
        wind_gust: valid(wind_gust, 8),
        rainfall: u16::from_be_bytes(rainfall),
        uv: valid(u16::from_be_bytes(uv), 16),
        light: valid(light, 24),
        pressure,
    })
}

/// Discard a value holding the all-ones marker for a field `bits` wide.
fn valid<T>(x: T, bits: u32) -> Option<T>
where
    T: Copy + Into<u64>,
{
    if x.into() != (1u64 << bits) - 1 {
        Some(x)
    } else {
        None
    }
}
