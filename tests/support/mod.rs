#![allow(dead_code)]

use misol::{
    avec::MeasurementSink,
    sans::{
        derived::CompassPoint,
        describe::{Beaufort, Brightness, Conditions, Precipitation},
    },
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Field values of a frame, before encoding.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub station_id: u8,
    pub wind_direction: u16,
    pub low_battery: bool,
    pub temperature: u16,
    pub humidity: u8,
    pub wind_speed: u16,
    pub wind_gust: u8,
    pub rainfall: u16,
    pub uv: u16,
    pub light: u32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            station_id: 0x5a,
            wind_direction: 270,
            low_battery: false,
            temperature: 634,
            humidity: 56,
            wind_speed: 17,
            wind_gust: 3,
            rainfall: 1234,
            uv: 500,
            light: 123_456,
        }
    }
}

impl Frame {
    pub fn encode(&self) -> Vec<u8> {
        let flags = (self.temperature >> 8) as u8 & 0x07
            | u8::from(self.low_battery) << 3
            | ((self.wind_speed >> 8) as u8 & 0x01) << 4
            | ((self.wind_direction >> 8) as u8 & 0x01) << 7;

        let [_, light_0, light_1, light_2] = self.light.to_be_bytes();
        let [rain_0, rain_1] = self.rainfall.to_be_bytes();
        let [uv_0, uv_1] = self.uv.to_be_bytes();

        let mut r = vec![
            0x24,
            self.station_id,
            self.wind_direction as u8,
            flags,
            self.temperature as u8,
            self.humidity,
            self.wind_speed as u8,
            self.wind_gust,
            rain_0,
            rain_1,
            uv_0,
            uv_1,
            light_0,
            light_1,
            light_2,
            0x00,
        ];
        r.push(sum(&r));
        r
    }

    /// Encode followed by a pressure extension, in hundredths of a hPa.
    pub fn encode_with_pressure(&self, pressure: u32) -> Vec<u8> {
        let mut r = self.encode();
        let [_, p_0, p_1, p_2] = pressure.to_be_bytes();
        let extension = [p_0, p_1, p_2];
        r.extend_from_slice(&extension);
        r.push(sum(&extension));
        r
    }
}

fn sum(r: &[u8]) -> u8 {
    r.iter().fold(0, |acc, b| acc.wrapping_add(*b))
}

pub fn from_hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

/// Sink recording every value as `key=value`, in the order received.
#[derive(Debug, Default)]
pub struct Recorder(pub Vec<String>);

impl Recorder {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .filter_map(|kv| kv.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, _)| k)
            .collect()
    }
}

macro_rules! record {
    ($($method:ident => $key:literal: $ty:ty,)*) => {
        impl MeasurementSink for Recorder {
            $(
                fn $method(&mut self, value: $ty) {
                    self.0.push(format!("{}={value}", $key));
                }
            )*
        }
    };
}

record! {
    set_temperature => "temperature": f32,
    set_humidity => "humidity": f32,
    set_pressure => "pressure": f32,
    set_wind_speed => "wind_speed": f32,
    set_wind_gust => "wind_gust": f32,
    set_wind_direction_degrees => "wind_direction_degrees": f32,
    set_accumulated_precipitation => "accumulated_precipitation": f32,
    set_precipitation_intensity => "precipitation_intensity": f32,
    set_light => "light": f32,
    set_uv_intensity => "uv_intensity": f32,
    set_uv_index => "uv_index": u8,
    set_battery_level => "battery_level": bool,
    set_night => "night": bool,
    set_wind_speed_text => "wind_speed_text": Beaufort,
    set_wind_direction_text => "wind_direction_text": CompassPoint,
    set_light_text => "light_text": Brightness,
    set_precipitation_intensity_text => "precipitation_intensity_text": Precipitation,
    set_weather_conditions_text => "weather_conditions_text": Conditions,
}
