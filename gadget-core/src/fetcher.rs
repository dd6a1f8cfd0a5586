use crate::{
    config::GadgetConfig,
    error::GadgetError,
    model::{ResolvedLocation, WeatherResult},
    provider::{self, WeatherApi},
};

/// Fetches current conditions and the forecast series for a resolved location.
#[derive(Debug)]
pub struct WeatherFetcher {
    api: Box<dyn WeatherApi>,
}

impl WeatherFetcher {
    pub fn new(api: Box<dyn WeatherApi>) -> Self {
        Self { api }
    }

    /// Retrieve current conditions and the forecast concurrently.
    ///
    /// The two upstream calls are started together and joined once both
    /// settle. They fail independently: one side failing leaves the other
    /// side's payload in the result, with the failure messages joined into a
    /// single error string, current-weather message first.
    pub async fn fetch(&self, location: &ResolvedLocation) -> WeatherResult {
        let (current_res, forecast_res) = tokio::join!(
            self.api.current(location.lat, location.lon, location.units),
            self.api.forecast(location.lat, location.lon, location.units),
        );

        let mut errors = Vec::new();

        let current = match current_res {
            Ok(observation) => Some(observation.with_units(location.units)),
            Err(err) => {
                tracing::warn!("current weather fetch failed: {err:#}");
                errors.push(format!("{err:#}"));
                None
            }
        };

        let forecast = match forecast_res {
            Ok(forecast) => Some(forecast),
            Err(err) => {
                tracing::warn!("forecast fetch failed: {err:#}");
                errors.push(format!("{err:#}"));
                None
            }
        };

        let error = if errors.is_empty() { None } else { Some(errors.join(" ")) };

        WeatherResult { current, forecast, error }
    }
}

/// Fetch weather for the configured location, reading the API key from the
/// environment at call time.
///
/// All failures are reported in-band through [`WeatherResult::error`]: an
/// unconfigured gadget and a missing API key short-circuit with zero network
/// calls and distinct messages; anything outside the anticipated paths
/// degenerates to the blanket "unexpected error" result.
pub async fn fetch_weather(config: &GadgetConfig) -> WeatherResult {
    fetch_weather_with(config, provider::provider_from_env()).await
}

/// Core of [`fetch_weather`] with the credential/client construction outcome
/// passed in, so the short-circuit paths are testable without the process
/// environment.
async fn fetch_weather_with(
    config: &GadgetConfig,
    api: Result<Box<dyn WeatherApi>, GadgetError>,
) -> WeatherResult {
    let Some(location) = config.resolved_location() else {
        return WeatherResult::failure(GadgetError::NotConfigured);
    };

    match api {
        Ok(api) => WeatherFetcher::new(api).fetch(&location).await,
        Err(err) => WeatherResult::failure(err),
    }
}
