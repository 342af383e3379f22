use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::WeatherConfig;
use crate::connectivity::{ConnectivityProbe, HttpProbe};
use crate::error::WeatherError;
use crate::fallback::{fallback_forecast, fallback_snapshot};
use crate::model::{ForecastDay, WeatherSnapshot};
use crate::normalize::{forecast_from_samples, snapshot_from_current};
use crate::provider::WeatherApi;
use crate::provider::openweather::OpenWeatherClient;

/// Soft message written alongside fallback data when the device itself
/// is offline. Distinct from the hard error messages in
/// [`WeatherError::user_message`].
pub const OFFLINE_NOTICE: &str =
    "You appear to be offline. Showing placeholder weather data.";

/// Lifecycle of one fetch kind as observed by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Per-kind state. Current conditions and forecast each own one of
/// these, so a forecast failure never masks a healthy snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSlot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set when `data` is fallback content served while unreachable.
    pub offline: bool,
    #[serde(skip)]
    generation: u64,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            offline: false,
            generation: 0,
        }
    }
}

impl<T> FetchSlot<T> {
    pub fn phase(&self) -> FetchPhase {
        if self.loading {
            FetchPhase::Loading
        } else if self.offline && self.data.is_some() {
            FetchPhase::Ready
        } else if self.error.is_some() {
            FetchPhase::Error
        } else if self.data.is_some() {
            FetchPhase::Ready
        } else {
            FetchPhase::Idle
        }
    }

    /// Bumps the generation and enters Loading. Returns the token the
    /// in-flight request must present to apply its terminal write.
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.offline = false;
        self.generation
    }

    /// Applies a terminal outcome if `generation` is still current.
    /// A stale token means a newer fetch superseded this one and the
    /// response is discarded.
    fn settle(&mut self, generation: u64, outcome: FetchOutcome<T>) -> bool {
        if self.generation != generation {
            return false;
        }
        self.loading = false;
        match outcome {
            FetchOutcome::Ready(data) => {
                self.data = Some(data);
                self.error = None;
                self.offline = false;
            }
            FetchOutcome::Offline(data) => {
                self.data = Some(data);
                self.error = Some(OFFLINE_NOTICE.to_string());
                self.offline = true;
            }
            FetchOutcome::Failed(message) => {
                self.error = Some(message);
                self.offline = false;
            }
        }
        true
    }
}

enum FetchOutcome<T> {
    Ready(T),
    Offline(T),
    Failed(String),
}

/// Everything the consumer reads, cloned out atomically.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreState {
    pub current: FetchSlot<WeatherSnapshot>,
    pub forecast: FetchSlot<Vec<ForecastDay>>,
}

/// Owned state object driving the whole pipeline. Created once at
/// application start and handed to whoever renders weather; there is no
/// process-wide singleton.
///
/// Writes are atomic per call: each terminal state lands under one lock
/// acquisition, so no partial state is ever observable.
#[derive(Debug)]
pub struct WeatherStore {
    config: WeatherConfig,
    api: Arc<dyn WeatherApi>,
    probe: Arc<dyn ConnectivityProbe>,
    state: Mutex<StoreState>,
}

impl WeatherStore {
    pub fn new(
        config: WeatherConfig,
        api: Arc<dyn WeatherApi>,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            config,
            api,
            probe,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Production wiring: live provider client plus the HTTP probe.
    pub fn with_defaults(config: WeatherConfig) -> Result<Self, WeatherError> {
        let api = Arc::new(OpenWeatherClient::new(&config)?);
        let probe = Arc::new(HttpProbe::new(config.probe_timeout)?);
        Ok(Self::new(config, api, probe))
    }

    pub fn state(&self) -> StoreState {
        self.lock().clone()
    }

    /// Clears both error fields without touching cached data. The
    /// offline flag stays so fallback content keeps reading as such.
    pub fn clear_error(&self) {
        let mut state = self.lock();
        state.current.error = None;
        state.forecast.error = None;
    }

    /// Runs the full current-conditions pipeline and writes the terminal
    /// state. Never returns an error; consumers observe the slot.
    pub async fn fetch_weather(&self, city: Option<&str>) {
        let city = self.city_or_default(city);
        let generation = self.lock().current.begin();

        let result = match self.api.current(&city).await {
            Ok(payload) => snapshot_from_current(&payload),
            Err(err) => Err(err),
        };

        let outcome = match result {
            Ok(snapshot) => FetchOutcome::Ready(snapshot),
            Err(err) => self.degrade(err, || fallback_snapshot(&city)).await,
        };

        let applied = self.lock().current.settle(generation, outcome);
        if !applied {
            info!(%city, "discarding stale current-conditions response");
        }
    }

    /// Forecast counterpart of [`Self::fetch_weather`], fully independent
    /// of the current-conditions slot.
    pub async fn fetch_forecast(&self, city: Option<&str>) {
        let city = self.city_or_default(city);
        let generation = self.lock().forecast.begin();

        let result = match self.api.forecast(&city).await {
            Ok(payload) => forecast_from_samples(&payload),
            Err(err) => Err(err),
        };

        let outcome = match result {
            Ok(days) => FetchOutcome::Ready(days),
            Err(err) => {
                self.degrade(err, || fallback_forecast(Local::now().date_naive()))
                    .await
            }
        };

        let applied = self.lock().forecast.settle(generation, outcome);
        if !applied {
            info!(%city, "discarding stale forecast response");
        }
    }

    /// Re-runs both fetches. Without an explicit city, reuses the city of
    /// the cached snapshot, falling back to the configured default.
    pub async fn refresh_weather(&self, city: Option<&str>) {
        let city = match city {
            Some(c) => c.to_string(),
            None => self
                .cached_city()
                .unwrap_or_else(|| self.config.default_city.clone()),
        };

        tokio::join!(
            self.fetch_weather(Some(&city)),
            self.fetch_forecast(Some(&city)),
        );
    }

    fn city_or_default(&self, city: Option<&str>) -> String {
        match city {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => self.config.default_city.clone(),
        }
    }

    /// City part of the cached snapshot's "City, CC" location.
    fn cached_city(&self) -> Option<String> {
        let state = self.lock();
        state
            .current
            .data
            .as_ref()
            .map(|snap| snap.location.split(',').next().unwrap_or("").trim().to_string())
            .filter(|city| !city.is_empty())
    }

    /// Decides between the hard error and the soft offline state. The
    /// probe is only consulted for transport-level failures.
    async fn degrade<T>(
        &self,
        err: WeatherError,
        fallback: impl FnOnce() -> T,
    ) -> FetchOutcome<T> {
        if err.is_offline_candidate() && !self.probe.is_online().await {
            info!(error = %err, "provider unreachable while offline, serving fallback data");
            return FetchOutcome::Offline(fallback());
        }

        warn!(error = %err, "weather fetch failed");
        FetchOutcome::Failed(err.user_message())
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A poisoned lock only means a panic mid-clone; the state itself
        // is always consistent, so keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
