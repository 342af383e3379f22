use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::WeatherError;
use crate::icons::classify;
use crate::model::{ForecastDay, WeatherSnapshot};
use crate::provider::openweather::{ConditionEntry, CurrentPayload, ForecastPayload};

/// Visibility the provider implies when it omits the field, in meters.
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

/// Forecast horizon in calendar days.
const FORECAST_DAYS: usize = 5;

fn round(value: f64) -> i32 {
    value.round() as i32
}

/// Uppercases the first letter of every word: "light rain" -> "Light Rain".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;
    for c in s.chars() {
        if boundary && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            boundary = false;
        } else {
            out.push(c);
            boundary = !c.is_alphanumeric();
        }
    }
    out
}

/// Display label for a forecast entry. Index-based on purpose: entry 0 is
/// whatever day the provider returned first, which the UI presents as
/// "Today".
pub fn day_label(date: NaiveDate, index: usize) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A").to_string(),
    }
}

fn first_condition(entries: &[ConditionEntry], what: &str) -> Result<ConditionEntry, WeatherError> {
    entries
        .first()
        .cloned()
        .ok_or_else(|| WeatherError::MalformedResponse(format!("{what} carried no weather entry")))
}

/// Maps a raw current-conditions payload into the display model.
///
/// Pure over the already-fetched payload: rounds temperatures, converts
/// wind m/s to km/h and visibility meters to kilometers, title-cases the
/// first description and classifies the icon.
pub fn snapshot_from_current(payload: &CurrentPayload) -> Result<WeatherSnapshot, WeatherError> {
    let condition = first_condition(&payload.weather, "current conditions")?;

    Ok(WeatherSnapshot {
        location: format!("{}, {}", payload.name, payload.sys.country),
        temperature: round(payload.main.temp),
        condition: title_case(&condition.description),
        humidity: payload.main.humidity,
        wind_speed: round(payload.wind.speed * 3.6),
        feels_like: round(payload.main.feels_like),
        uv_index: None,
        visibility: round(payload.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0),
        pressure: round(payload.main.pressure),
        icon: classify(&condition.main, &condition.description, &condition.icon),
    })
}

struct DayBucket {
    temps: Vec<f64>,
    pops: Vec<f64>,
    first: ConditionEntry,
}

/// Buckets the provider's 3-hour samples into calendar days.
///
/// Per date: high/low over all sampled temperatures, precipitation from
/// the maximum probability, condition and icon from the date's first
/// sample. First-sample-wins is a long-standing display simplification
/// kept for compatibility with existing clients.
pub fn forecast_from_samples(payload: &ForecastPayload) -> Result<Vec<ForecastDay>, WeatherError> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for sample in &payload.list {
        let date_part = sample.dt_txt.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
            WeatherError::MalformedResponse(format!(
                "unparseable forecast timestamp '{}'",
                sample.dt_txt
            ))
        })?;

        let condition = first_condition(&sample.weather, "forecast sample")?;

        buckets
            .entry(date)
            .and_modify(|bucket| {
                bucket.temps.push(sample.main.temp);
                bucket.pops.push(sample.pop);
            })
            .or_insert_with(|| DayBucket {
                temps: vec![sample.main.temp],
                pops: vec![sample.pop],
                first: condition,
            });
    }

    let forecast = buckets
        .into_iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(index, (date, bucket))| {
            let high = bucket.temps.iter().cloned().fold(f64::MIN, f64::max);
            let low = bucket.temps.iter().cloned().fold(f64::MAX, f64::min);
            let max_pop = bucket.pops.iter().cloned().fold(0.0, f64::max);

            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                label: day_label(date, index),
                high: round(high),
                low: round(low),
                condition: title_case(&bucket.first.description),
                icon: classify(&bucket.first.main, &bucket.first.description, &bucket.first.icon),
                precipitation: round(max_pop * 100.0).clamp(0, 100) as u8,
            }
        })
        .collect();

    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IconTag;
    use crate::provider::openweather::{CityInfo, ForecastSample, MainReadings, SysInfo, WindReadings};

    fn condition(main: &str, description: &str, icon: &str) -> ConditionEntry {
        ConditionEntry {
            main: main.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    fn sample(dt_txt: &str, temp: f64, pop: f64, cond: ConditionEntry) -> ForecastSample {
        ForecastSample {
            dt_txt: dt_txt.to_string(),
            main: MainReadings {
                temp,
                feels_like: temp,
                humidity: 50,
                pressure: 1013.0,
            },
            weather: vec![cond],
            pop,
        }
    }

    fn forecast_payload(list: Vec<ForecastSample>) -> ForecastPayload {
        ForecastPayload {
            city: CityInfo {
                name: "London".to_string(),
                country: "GB".to_string(),
            },
            list,
        }
    }

    fn london_current() -> CurrentPayload {
        CurrentPayload {
            name: "London".to_string(),
            sys: SysInfo {
                country: "GB".to_string(),
            },
            main: MainReadings {
                temp: 15.4,
                feels_like: 14.0,
                humidity: 82,
                pressure: 1011.0,
            },
            wind: WindReadings { speed: 5.0 },
            visibility: Some(10_000.0),
            weather: vec![condition("Rain", "light rain", "10d")],
        }
    }

    #[test]
    fn snapshot_end_to_end_for_london() {
        let snapshot = snapshot_from_current(&london_current()).expect("snapshot");

        assert_eq!(snapshot.location, "London, GB");
        assert_eq!(snapshot.temperature, 15);
        assert_eq!(snapshot.feels_like, 14);
        assert_eq!(snapshot.wind_speed, 18);
        assert_eq!(snapshot.condition, "Light Rain");
        assert_eq!(snapshot.icon, IconTag::Rainy);
        assert_eq!(snapshot.humidity, 82);
        assert_eq!(snapshot.pressure, 1011);
        assert_eq!(snapshot.visibility, 10);
        assert_eq!(snapshot.uv_index, None);
    }

    #[test]
    fn snapshot_defaults_missing_wind_and_visibility() {
        let mut payload = london_current();
        payload.wind = WindReadings::default();
        payload.visibility = None;

        let snapshot = snapshot_from_current(&payload).expect("snapshot");
        assert_eq!(snapshot.wind_speed, 0);
        assert_eq!(snapshot.visibility, 10);
    }

    #[test]
    fn snapshot_without_weather_entry_is_malformed() {
        let mut payload = london_current();
        payload.weather.clear();

        let err = snapshot_from_current(&payload).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn samples_spanning_two_dates_produce_two_days() {
        let payload = forecast_payload(vec![
            sample("2026-08-04 09:00:00", 14.6, 0.10, condition("Clouds", "few clouds", "02d")),
            sample("2026-08-04 12:00:00", 19.4, 0.35, condition("Rain", "light rain", "10d")),
            sample("2026-08-04 15:00:00", 17.2, 0.80, condition("Rain", "moderate rain", "10d")),
            sample("2026-08-05 09:00:00", 11.1, 0.00, condition("Clear", "clear sky", "01d")),
            sample("2026-08-05 12:00:00", 15.9, 0.05, condition("Clear", "clear sky", "01d")),
        ]);

        let days = forecast_from_samples(&payload).expect("forecast");
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, "2026-08-04");
        assert_eq!(days[0].high, 19);
        assert_eq!(days[0].low, 15);
        assert_eq!(days[0].precipitation, 80);
        // First sample of the day decides condition and icon.
        assert_eq!(days[0].condition, "Few Clouds");
        assert_eq!(days[0].icon, IconTag::PartlySunny);

        assert_eq!(days[1].date, "2026-08-05");
        assert_eq!(days[1].high, 16);
        assert_eq!(days[1].low, 11);
        assert_eq!(days[1].precipitation, 5);
        assert_eq!(days[1].icon, IconTag::Sunny);
    }

    #[test]
    fn forecast_is_capped_at_five_days() {
        let list = (1..=7)
            .map(|day| {
                sample(
                    &format!("2026-08-{day:02} 12:00:00"),
                    20.0,
                    0.0,
                    condition("Clear", "clear sky", "01d"),
                )
            })
            .collect();

        let days = forecast_from_samples(&forecast_payload(list)).expect("forecast");
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, "2026-08-01");
        assert_eq!(days[4].date, "2026-08-05");
    }

    #[test]
    fn day_labels_are_index_based() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(); // a Friday
        assert_eq!(day_label(date, 0), "Today");
        assert_eq!(day_label(date, 1), "Tomorrow");
        assert_eq!(day_label(date, 2), "Friday");
        assert_eq!(day_label(date.succ_opt().unwrap(), 3), "Saturday");
    }

    #[test]
    fn empty_sample_list_yields_empty_forecast() {
        let days = forecast_from_samples(&forecast_payload(vec![])).expect("forecast");
        assert!(days.is_empty());
    }

    #[test]
    fn sample_without_weather_entry_is_malformed() {
        let mut bad = sample("2026-08-04 12:00:00", 20.0, 0.0, condition("Clear", "clear sky", "01d"));
        bad.weather.clear();

        let err = forecast_from_samples(&forecast_payload(vec![bad])).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn unparseable_timestamp_is_malformed() {
        let bad = sample("not-a-date", 20.0, 0.0, condition("Clear", "clear sky", "01d"));
        let err = forecast_from_samples(&forecast_payload(vec![bad])).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn title_case_handles_multiword_and_punctuation() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("sand/dust whirls"), "Sand/Dust Whirls");
        assert_eq!(title_case("overcast clouds"), "Overcast Clouds");
        assert_eq!(title_case(""), "");
    }
}
