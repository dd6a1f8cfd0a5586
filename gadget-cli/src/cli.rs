use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};

use gadget_core::{
    GadgetConfig, GeocodeResolver, LocationQuery, ResolvedLocation, Units, WeatherResult,
    fetch_weather, provider_from_env, summarize_daily,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-gadget", version, about = "Weather gadget CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a location and unit system, then save them for `show`.
    Configure {
        /// City name, e.g. "Paris". Prompted for when omitted.
        #[arg(long)]
        city: Option<String>,

        /// Country code or name, e.g. "FR". Prompted for when omitted.
        #[arg(long)]
        country: Option<String>,

        /// Unit system, "metric" or "imperial". Prompted for when omitted.
        #[arg(long)]
        units: Option<String>,
    },

    /// Show current weather and the 5-day forecast for the saved location.
    Show,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { city, country, units } => configure(city, country, units).await,
            Command::Show => show().await,
        }
    }
}

async fn configure(
    city: Option<String>,
    country: Option<String>,
    units: Option<String>,
) -> Result<()> {
    let city = match city {
        Some(city) => city,
        None => Text::new("City:").prompt().context("Failed to read city")?,
    };
    let country = match country {
        Some(country) => country,
        None => Text::new("Country:").prompt().context("Failed to read country")?,
    };

    let query = LocationQuery { city, country };

    let mut resolver = GeocodeResolver::new(provider_from_env()?);
    let Some(candidates) = resolver.resolve(&query).await? else {
        bail!("Both city and country are required.");
    };

    if candidates.is_empty() {
        println!("No locations found for your search.");
        return Ok(());
    }

    // Selection is made by value against the exact list this search
    // returned, so a later search can never redirect it to a stale entry.
    let candidate = Select::new("Select your location:", candidates)
        .prompt()
        .context("Failed to read location selection")?;

    let units = match units {
        Some(units) => Units::try_from(units.as_str())?,
        None => {
            let choice = Select::new("Units:", vec!["Metric (°C, m/s)", "Imperial (°F, mph)"])
                .prompt()
                .context("Failed to read units selection")?;
            if choice.starts_with("Imperial") { Units::Imperial } else { Units::Metric }
        }
    };

    let mut config = GadgetConfig::load()?;
    config.set_location(ResolvedLocation::from_candidate(candidate, units));
    config.save()?;

    println!("Saved. Run `weather-gadget show` to see the weather.");
    Ok(())
}

async fn show() -> Result<()> {
    let config = GadgetConfig::load()?;

    if !config.is_configured() {
        println!("Please configure the weather gadget to select a location and view weather information.");
        println!("Run `weather-gadget configure` to get started.");
        return Ok(());
    }

    let result = fetch_weather(&config).await;
    print_weather(&config, &result);
    Ok(())
}

fn print_weather(config: &GadgetConfig, result: &WeatherResult) {
    if result.is_empty() {
        match &result.error {
            Some(error) => println!("Error: {error}"),
            None => println!(
                "Weather data is currently unavailable. Please try again later or reconfigure the gadget."
            ),
        }
        return;
    }

    let heading = result
        .current
        .as_ref()
        .map(|current| current.name.clone())
        .or_else(|| result.forecast.as_ref().and_then(|forecast| forecast.city_name.clone()))
        .or_else(|| config.name.clone())
        .unwrap_or_else(|| "Weather".to_string());

    println!("{heading} Weather");

    if let Some(current) = &result.current {
        let suffix = current.units.temperature_suffix();
        println!("  Current temperature: {:.1} {suffix}", current.temperature);
        println!("  Feels like:          {:.1} {suffix}", current.feels_like);
        println!("  Humidity:            {}%", current.humidity);
        println!("  Conditions:          {}", current.description);
    }

    if let Some(forecast) = &result.forecast {
        // Prefer the units echoed with the current conditions; fall back to
        // the configured ones when the current call failed.
        let units = result.current.as_ref().map(|current| current.units).or(config.units);

        if let Some(units) = units {
            let days = summarize_daily(&forecast.list, units);
            if !days.is_empty() {
                println!();
                println!("5-day forecast:");
                for day in &days {
                    println!(
                        "  {:<12} {:>6.1} {}  {}",
                        day.day,
                        day.temperature,
                        day.units.temperature_suffix(),
                        day.description
                    );
                }
            }
        }
    }

    if let Some(error) = &result.error {
        println!();
        println!("Warning: {error}");
    }
}
