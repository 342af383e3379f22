use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::PROBE_TIMEOUT;
use crate::error::WeatherError;

/// Endpoint used purely as a reachability signal, independent of the
/// weather provider.
const PROBE_URL: &str = "https://clients3.google.com/generate_204";

/// Reachability check consulted when a fetch fails on transport. Decides
/// between "hard error" and "offline, showing fallback data".
#[async_trait]
pub trait ConnectivityProbe: Send + Sync + Debug {
    async fn is_online(&self) -> bool;
}

/// Probe backed by a lightweight GET against a well-known endpoint.
/// Any answered request that is not an error status counts as online.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_url(PROBE_URL, timeout)
    }

    pub fn with_url(url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build probe client: {e}")))?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(PROBE_TIMEOUT)
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn is_online(&self) -> bool {
        match self.http.get(&self.url).send().await {
            Ok(res) => {
                let status = res.status();
                let online = !status.is_client_error() && !status.is_server_error();
                debug!(%status, online, "connectivity probe answered");
                online
            }
            Err(err) => {
                debug!(error = %err, "connectivity probe failed");
                false
            }
        }
    }
}
