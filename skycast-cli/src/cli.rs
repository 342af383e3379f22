use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use skycast_core::store::StoreState;
use skycast_core::{ForecastDay, StoredConfig, WeatherConfig, WeatherSnapshot, WeatherStore};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather and 5-day forecast in your terminal")]
pub struct Cli {
    /// Print the raw store state as JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather service API key and defaults.
    Configure,

    /// Show current conditions.
    Current {
        /// City name, e.g. "London" or "São Paulo". Defaults to the
        /// configured city.
        city: Option<String>,
    },

    /// Show the 5-day forecast.
    Forecast {
        /// City name. Defaults to the configured city.
        city: Option<String>,
    },

    /// Refresh current conditions and forecast together.
    Refresh {
        /// City name. Defaults to the last shown city, then the
        /// configured one.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { city } => {
                let store = build_store()?;
                store.fetch_weather(city.as_deref()).await;
                let state = store.state();
                if self.json {
                    return print_json(&state);
                }
                render_current(&state)
            }
            Command::Forecast { city } => {
                let store = build_store()?;
                store.fetch_forecast(city.as_deref()).await;
                let state = store.state();
                if self.json {
                    return print_json(&state);
                }
                render_forecast(&state)
            }
            Command::Refresh { city } => {
                let store = build_store()?;
                store.refresh_weather(city.as_deref()).await;
                let state = store.state();
                if self.json {
                    return print_json(&state);
                }
                render_current(&state)?;
                println!();
                render_forecast(&state)
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut stored = StoredConfig::load()?;

    let key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("configuration aborted")?;
    stored.upsert_api_key(key)?;

    let city = inquire::Text::new("Default city:")
        .with_default(stored.default_city.as_deref().unwrap_or("New York"))
        .prompt()
        .context("configuration aborted")?;
    if !city.trim().is_empty() {
        stored.default_city = Some(city.trim().to_string());
    }

    stored.save()?;
    println!(
        "Saved configuration to {}",
        StoredConfig::config_file_path()?.display()
    );
    Ok(())
}

fn build_store() -> Result<WeatherStore> {
    let stored = StoredConfig::load()?;
    let config = WeatherConfig::from_stored(&stored);
    WeatherStore::with_defaults(config).map_err(|e| anyhow!(e))
}

fn print_json(state: &StoreState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

fn render_current(state: &StoreState) -> Result<()> {
    let slot = &state.current;
    if slot.offline {
        if let Some(notice) = &slot.error {
            eprintln!("! {notice}");
        }
    } else if let Some(error) = &slot.error {
        bail!("{error}");
    }

    let snapshot = slot
        .data
        .as_ref()
        .ok_or_else(|| anyhow!("No weather data available."))?;
    println!("{}", format_snapshot(snapshot));
    Ok(())
}

fn render_forecast(state: &StoreState) -> Result<()> {
    let slot = &state.forecast;
    if slot.offline {
        if let Some(notice) = &slot.error {
            eprintln!("! {notice}");
        }
    } else if let Some(error) = &slot.error {
        bail!("{error}");
    }

    let days = slot
        .data
        .as_ref()
        .ok_or_else(|| anyhow!("No forecast data available."))?;
    for day in days {
        println!("{}", format_forecast_day(day));
    }
    Ok(())
}

fn format_snapshot(snapshot: &WeatherSnapshot) -> String {
    let uv = snapshot
        .uv_index
        .map_or_else(|| "n/a".to_string(), |v| v.to_string());

    format!(
        "{}\n  {}°C  {} (feels like {}°C)\n  humidity {}%  wind {} km/h  pressure {} hPa\n  visibility {} km  UV {}",
        snapshot.location,
        snapshot.temperature,
        snapshot.condition,
        snapshot.feels_like,
        snapshot.humidity,
        snapshot.wind_speed,
        snapshot.pressure,
        snapshot.visibility,
        uv,
    )
}

fn format_forecast_day(day: &ForecastDay) -> String {
    format!(
        "{:<9} {}  {:>3}° / {:>3}°  {:<20} {:>3}% precip",
        day.label, day.date, day.high, day.low, day.condition, day.precipitation,
    )
}
