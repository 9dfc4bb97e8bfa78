//! Plain-language descriptions of measured values.

use core::fmt;

macro_rules! description {
    (
        $(#[$attr:meta])*
        $name:ident { $($variant:ident => $text:literal,)* }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

description!(
    /// Beaufort scale force of a wind speed.
    Beaufort {
        Calm => "Calm",
        LightAir => "Light air",
        LightBreeze => "Light breeze",
        GentleBreeze => "Gentle breeze",
        ModerateBreeze => "Moderate breeze",
        FreshBreeze => "Fresh breeze",
        StrongBreeze => "Strong breeze",
        NearGale => "Near gale",
        Gale => "Gale",
        StrongGale => "Strong gale",
        Storm => "Storm",
        ViolentStorm => "Violent storm",
        Hurricane => "Hurricane force",
    }
);

impl Beaufort {
    /// Upper wind speed of each force but the last, in m/s.
    const BOUNDS: [f32; 12] = [
        0.5, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
    ];

    const ALL: [Beaufort; 13] = [
        Beaufort::Calm,
        Beaufort::LightAir,
        Beaufort::LightBreeze,
        Beaufort::GentleBreeze,
        Beaufort::ModerateBreeze,
        Beaufort::FreshBreeze,
        Beaufort::StrongBreeze,
        Beaufort::NearGale,
        Beaufort::Gale,
        Beaufort::StrongGale,
        Beaufort::Storm,
        Beaufort::ViolentStorm,
        Beaufort::Hurricane,
    ];

    pub fn from_speed(speed: f32) -> Self {
        let force = Self::BOUNDS.iter().take_while(|&&b| b <= speed).count();
        Self::ALL[force]
    }

    pub fn force(&self) -> u8 {
        *self as u8
    }
}

description!(
    /// Rate of rainfall.
    Precipitation {
        Dry => "Dry",
        Light => "Light rain",
        Moderate => "Moderate rain",
        Heavy => "Heavy rain",
        Violent => "Violent rain",
    }
);

impl Precipitation {
    /// From an intensity in mm/h.
    pub fn from_intensity(intensity: f32) -> Self {
        match intensity {
            i if i < 0.1 => Precipitation::Dry,
            i if i < 2.5 => Precipitation::Light,
            i if i < 7.6 => Precipitation::Moderate,
            i if i < 50.0 => Precipitation::Heavy,
            _ => Precipitation::Violent,
        }
    }
}

description!(
    /// Brightness of the sky.
    Brightness {
        Dark => "Dark",
        Dim => "Dim",
        Overcast => "Overcast",
        Cloudy => "Cloudy",
        Bright => "Bright",
        Sunny => "Sunny",
    }
);

impl Brightness {
    /// From an illuminance in lux.
    pub fn from_light(light: f32) -> Self {
        match light {
            l if l < 10.0 => Brightness::Dark,
            l if l < 1_000.0 => Brightness::Dim,
            l if l < 10_000.0 => Brightness::Overcast,
            l if l < 25_000.0 => Brightness::Cloudy,
            l if l < 50_000.0 => Brightness::Bright,
            _ => Brightness::Sunny,
        }
    }
}

description!(
    /// Summary of the current weather, most significant condition first.
    Conditions {
        Rainy => "Rainy",
        Pouring => "Pouring",
        Windy => "Windy",
        Night => "Night",
        Cloudy => "Cloudy",
        PartlyCloudy => "Partly cloudy",
        Sunny => "Sunny",
    }
);

impl Conditions {
    /// Wind from this force up reads as windy.
    const WINDY: Beaufort = Beaufort::StrongBreeze;

    /// Combine the available values into a summary.
    ///
    /// Rain outranks wind, wind outranks night, and night outranks the
    /// brightness of the sky. Returns `None` if nothing decided the summary
    /// before brightness was needed and no light reading is available.
    pub fn summarize(
        precipitation: Option<Precipitation>,
        wind: Option<Beaufort>,
        night: Option<bool>,
        brightness: Option<Brightness>,
    ) -> Option<Self> {
        match precipitation {
            Some(Precipitation::Heavy | Precipitation::Violent) => return Some(Conditions::Pouring),
            Some(Precipitation::Light | Precipitation::Moderate) => return Some(Conditions::Rainy),
            _ => {}
        }

        if wind.is_some_and(|w| w >= Self::WINDY) {
            return Some(Conditions::Windy);
        }

        if night == Some(true) {
            return Some(Conditions::Night);
        }

        Some(match brightness? {
            Brightness::Dark | Brightness::Dim | Brightness::Overcast => Conditions::Cloudy,
            Brightness::Cloudy | Brightness::Bright => Conditions::PartlyCloudy,
            Brightness::Sunny => Conditions::Sunny,
        })
    }
}
