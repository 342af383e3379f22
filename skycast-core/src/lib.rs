//! Core library for the `skycast` weather app.
//!
//! This crate is the whole data-acquisition pipeline:
//! - Configuration, credential validation and request construction
//! - A resilient fetcher with timeout, classification and fixed-delay retry
//! - Normalization of provider payloads into the display model
//! - Connectivity probing and offline fallback data
//! - The store that owns `{data, loading, error}` state per fetch kind
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod icons;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod request;
pub mod store;

pub use config::{StoredConfig, Units, WeatherConfig, is_valid_credential};
pub use error::WeatherError;
pub use model::{ForecastDay, IconTag, WeatherSnapshot};
pub use provider::WeatherApi;
pub use provider::openweather::OpenWeatherClient;
pub use store::{FetchPhase, StoreState, WeatherStore};
