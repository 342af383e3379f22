use serde::{Deserialize, Serialize};

/// Normalized icon class consumed by the display layer.
///
/// Derived from provider conditions by [`crate::icons::classify`];
/// never taken verbatim from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTag {
    Sunny,
    PartlySunny,
    Cloudy,
    Rainy,
    Snowy,
    Foggy,
    Clear,
    Default,
}

impl IconTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconTag::Sunny => "sunny",
            IconTag::PartlySunny => "partly-sunny",
            IconTag::Cloudy => "cloudy",
            IconTag::Rainy => "rainy",
            IconTag::Snowy => "snowy",
            IconTag::Foggy => "foggy",
            IconTag::Clear => "clear",
            IconTag::Default => "default",
        }
    }
}

impl std::fmt::Display for IconTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions in display units. Rebuilt from scratch on every
/// successful fetch; never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// "City, CC" as reported by the provider.
    pub location: String,
    /// Degrees Celsius, rounded.
    pub temperature: i32,
    /// Title-cased description, e.g. "Light Rain".
    pub condition: String,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// km/h, converted from the provider's m/s.
    pub wind_speed: i32,
    /// Perceived temperature in degrees Celsius, rounded.
    pub feels_like: i32,
    /// The free provider tier carries no UV data, so this stays `None`
    /// on live fetches until a real source is wired in.
    pub uv_index: Option<u8>,
    /// Kilometers, converted from the provider's meters.
    pub visibility: i32,
    /// Atmospheric pressure in hPa.
    pub pressure: i32,
    pub icon: IconTag,
}

/// One bucketed day of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// "Today", "Tomorrow", or the full weekday name.
    pub label: String,
    /// Daily high in degrees Celsius, rounded.
    pub high: i32,
    /// Daily low in degrees Celsius, rounded.
    pub low: i32,
    pub condition: String,
    pub icon: IconTag,
    /// Probability of precipitation, 0..=100.
    pub precipitation: u8,
}
