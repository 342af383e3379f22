use thiserror::Error;

/// Everything that can go wrong between "fetch was triggered" and
/// "the store has a terminal state to show".
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    /// The credential failed shape validation before any network attempt.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Provider rejected the credential (401/403).
    #[error("credential rejected by the weather service (HTTP {0})")]
    InvalidCredential(u16),

    /// Provider does not know the requested location (404).
    #[error("location not found")]
    NotFound,

    /// Provider rate limit hit (429).
    #[error("rate limited by the weather service")]
    RateLimited,

    /// Provider-side failure (5xx). Retried up to the attempt budget.
    #[error("weather service unavailable (HTTP {0})")]
    ServiceUnavailable(u16),

    /// An attempt exceeded the request timeout.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure: DNS, connection refused, broken socket.
    #[error("network failure: {0}")]
    Network(String),

    /// Body did not match the provider's documented schema.
    #[error("malformed weather service response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status the classifier has no name for.
    #[error("unexpected weather service response (HTTP {0})")]
    Http(u16),
}

impl WeatherError {
    /// Whether another attempt may produce a different outcome.
    /// Credential, not-found and rate-limit failures are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WeatherError::ServiceUnavailable(_) | WeatherError::Timeout | WeatherError::Network(_)
        )
    }

    /// Whether this failure may be downgraded to the soft offline state
    /// once the connectivity probe confirms the network is unusable.
    pub fn is_offline_candidate(&self) -> bool {
        matches!(self, WeatherError::Timeout | WeatherError::Network(_))
    }

    /// Stable human-readable message for the store's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Config(hint) => {
                format!("Weather service is not configured: {hint}")
            }
            WeatherError::InvalidCredential(_) => {
                "Weather service unavailable. Please check API configuration.".to_string()
            }
            WeatherError::NotFound => {
                "Location not found. Please try a different city name.".to_string()
            }
            WeatherError::RateLimited => {
                "Too many requests to the weather service. Please wait and try again.".to_string()
            }
            WeatherError::Timeout | WeatherError::Network(_) => {
                "Unable to connect to weather service. Check your internet connection.".to_string()
            }
            WeatherError::ServiceUnavailable(_)
            | WeatherError::MalformedResponse(_)
            | WeatherError::Http(_) => {
                "Unable to fetch weather data. Please try again later.".to_string()
            }
        }
    }
}
