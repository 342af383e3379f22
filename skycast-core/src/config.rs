use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Provider endpoint root, free-tier REST API.
pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// City used when the caller passes none and nothing is cached yet.
pub const DEFAULT_CITY: &str = "New York";

/// Per-attempt request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Fixed delay between retry attempts. Deliberately not exponential.
pub const RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Total attempts per logical request, first try included.
pub const ATTEMPT_BUDGET: u32 = 3;

/// Timeout for the reachability probe, which should answer fast or not
/// at all.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Well-known placeholder tokens that must never reach the provider.
/// Compared case-insensitively.
const PLACEHOLDER_KEYS: &[&str] = &[
    "YOUR_API_KEY_HERE",
    "your_api_key",
    "demo_key",
    "changeme",
    "test",
    "xxxxxxxx",
];

/// Shape check for the API credential, run before every network attempt.
///
/// Rules, in order: non-empty, not a known placeholder, length within
/// 16..=40, ASCII alphanumeric only. Pure and deterministic; never talks
/// to the provider.
pub fn is_valid_credential(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    if PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(token)) {
        return false;
    }
    if token.len() < 16 || token.len() > 40 {
        return false;
    }
    token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Unit system forwarded to the provider's `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Runtime settings for the pipeline. A [`Default`] instance carries the
/// production constants; tests shrink the timings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_city: String,
    pub units: Units,
    pub request_timeout: Duration,
    pub retry_delay: Duration,
    pub attempt_budget: u32,
    pub probe_timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: String::new(),
            default_city: DEFAULT_CITY.to_string(),
            units: Units::Metric,
            request_timeout: REQUEST_TIMEOUT,
            retry_delay: RETRY_DELAY,
            attempt_budget: ATTEMPT_BUDGET,
            probe_timeout: PROBE_TIMEOUT,
        }
    }
}

impl WeatherConfig {
    /// Build runtime settings from the on-disk file, keeping the
    /// compiled-in defaults for everything the file does not set.
    pub fn from_stored(stored: &StoredConfig) -> Self {
        let mut cfg = Self::default();
        if let Some(key) = &stored.api_key {
            cfg.api_key = key.clone();
        }
        if let Some(city) = &stored.default_city {
            cfg.default_city = city.clone();
        }
        if let Some(units) = stored.units {
            cfg.units = units;
        }
        cfg
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredConfig {
    /// Example TOML:
    /// api_key = "..."
    pub api_key: Option<String>,
    pub default_city: Option<String>,
    pub units: Option<Units>,
}

impl StoredConfig {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: StoredConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the API key. Rejects tokens that fail shape validation
    /// so a placeholder can never be persisted.
    pub fn upsert_api_key(&mut self, api_key: String) -> Result<()> {
        if !is_valid_credential(&api_key) {
            return Err(anyhow!(
                "API key has an invalid shape (expected 16-40 alphanumeric characters).\n\
                 Hint: copy the key from your OpenWeatherMap account page."
            ));
        }
        self.api_key = Some(api_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_rejects_out_of_range_lengths() {
        assert!(!is_valid_credential(&"a".repeat(15)));
        assert!(!is_valid_credential(&"a".repeat(41)));
        assert!(is_valid_credential(&"a".repeat(16)));
        assert!(is_valid_credential(&"a".repeat(40)));
    }

    #[test]
    fn credential_rejects_non_alphanumeric() {
        assert!(!is_valid_credential("abcd1234abcd1234-abcd"));
        assert!(!is_valid_credential("abcd1234 abcd1234abc"));
        assert!(!is_valid_credential("abcd1234abcd1234abcé"));
    }

    #[test]
    fn credential_rejects_placeholders_case_insensitively() {
        for placeholder in ["YOUR_API_KEY_HERE", "your_api_key_here", "Demo_Key", "demo_key", ""] {
            assert!(!is_valid_credential(placeholder), "accepted {placeholder:?}");
        }
    }

    #[test]
    fn credential_accepts_realistic_key() {
        assert!(is_valid_credential("a1b2c3d4e5f6a7b8c9d0"));
    }

    #[test]
    fn units_roundtrip() {
        for units in [Units::Metric, Units::Imperial] {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(units, parsed);
        }
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn stored_config_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut cfg = StoredConfig::default();
        cfg.upsert_api_key("a1b2c3d4e5f6a7b8c9d0".to_string()).expect("valid key");
        cfg.default_city = Some("Lisbon".to_string());
        cfg.save_to(&path).expect("save");

        let loaded = StoredConfig::load_from(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("a1b2c3d4e5f6a7b8c9d0"));
        assert_eq!(loaded.default_city.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn upsert_rejects_placeholder_key() {
        let mut cfg = StoredConfig::default();
        let err = cfg.upsert_api_key("demo_key".to_string()).unwrap_err();
        assert!(err.to_string().contains("invalid shape"));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn missing_file_loads_as_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.toml");
        let cfg = StoredConfig::load_from(&path).expect("load");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn runtime_config_prefers_stored_values() {
        let stored = StoredConfig {
            api_key: Some("a1b2c3d4e5f6a7b8c9d0".to_string()),
            default_city: Some("Oslo".to_string()),
            units: Some(Units::Imperial),
        };
        let cfg = WeatherConfig::from_stored(&stored);
        assert_eq!(cfg.api_key, "a1b2c3d4e5f6a7b8c9d0");
        assert_eq!(cfg.default_city, "Oslo");
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.attempt_budget, ATTEMPT_BUDGET);
    }
}
