use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::WeatherError;
use crate::provider::openweather::{CurrentPayload, ForecastPayload};

pub mod openweather;

/// Seam between the store and the network. The production implementation
/// is [`openweather::OpenWeatherClient`]; tests substitute fakes.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Raw current-conditions payload for a city.
    async fn current(&self, city: &str) -> Result<CurrentPayload, WeatherError>;

    /// Raw 5-day/3-hour forecast payload for a city.
    async fn forecast(&self, city: &str) -> Result<ForecastPayload, WeatherError>;
}
