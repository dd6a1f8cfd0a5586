use crate::{
    error::GadgetError,
    model::{CurrentObservation, Forecast, LocationCandidate, LocationQuery, Units},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_VAR: &str = "OPENWEATHER_KEY";

/// Upstream weather source.
///
/// The three operations are independent; implementations must allow the
/// current-conditions and forecast calls to run concurrently.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Geocode a city/country pair into candidate locations, upstream order
    /// preserved, at most five entries.
    async fn geocode(&self, query: &LocationQuery) -> anyhow::Result<Vec<LocationCandidate>>;

    /// Current conditions at a coordinate.
    async fn current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> anyhow::Result<CurrentObservation>;

    /// 3-hourly forecast series at a coordinate, spanning five days.
    async fn forecast(&self, lat: f64, lon: f64, units: Units) -> anyhow::Result<Forecast>;
}

/// Construct the upstream client from the process environment.
///
/// The key is read at call time, so a key provisioned after startup is picked
/// up without a restart. A missing or empty key is a reportable condition,
/// not a crash.
pub fn provider_from_env() -> Result<Box<dyn WeatherApi>, GadgetError> {
    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(GadgetError::ServiceNotConfigured)?;

    let client = OpenWeatherClient::new(api_key).map_err(|err| {
        tracing::error!("failed to construct OpenWeather client: {err:#}");
        GadgetError::Unexpected
    })?;

    Ok(Box::new(client))
}
