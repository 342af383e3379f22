use async_trait::async_trait;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::fetch::{FetchClient, RetryPolicy};
use crate::request::build_url;

use super::WeatherApi;

/// One entry of the provider's `weather` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// The provider's `main` block, shared by current conditions and
/// forecast samples.
#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindReadings {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SysInfo {
    pub country: String,
}

/// Current-conditions response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    pub sys: SysInfo,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: WindReadings,
    /// Meters; the provider omits it in some regions.
    pub visibility: Option<f64>,
    pub weather: Vec<ConditionEntry>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    /// Sample timestamp as `YYYY-MM-DD HH:MM:SS`.
    pub dt_txt: String,
    pub main: MainReadings,
    pub weather: Vec<ConditionEntry>,
    /// Probability of precipitation, 0.0..=1.0.
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
}

/// 5-day/3-hour forecast response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub city: CityInfo,
    pub list: Vec<ForecastSample>,
}

/// Live client for the provider's free-tier REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    units: &'static str,
    fetch: FetchClient,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let fetch = FetchClient::new(config.request_timeout, RetryPolicy {
            attempts: config.attempt_budget,
            delay: config.retry_delay,
        })?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            units: config.units.as_str(),
            fetch,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = build_url(&self.base_url, endpoint, &self.api_key, &[
            ("q", city),
            ("units", self.units),
        ])?;

        let body = self.fetch.get_text(&url).await?;
        serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("{endpoint}: {e}")))
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<CurrentPayload, WeatherError> {
        self.get_json("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<ForecastPayload, WeatherError> {
        self.get_json("forecast", city).await
    }
}
