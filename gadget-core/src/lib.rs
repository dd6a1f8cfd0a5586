//! Core library for the weather gadget.
//!
//! This crate defines:
//! - The gadget configuration (selected location and unit system)
//! - Geocoding of free-text city/country input into candidate locations
//! - Concurrent retrieval of current conditions and the 5-day forecast,
//!   with partial failures folded into one combined result
//! - Reduction of the 3-hourly forecast series into daily summaries
//!
//! It is used by `gadget-cli`, but can also be reused by other frontends.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod resolver;

pub use config::GadgetConfig;
pub use error::GadgetError;
pub use fetcher::{WeatherFetcher, fetch_weather};
pub use forecast::{MAX_FORECAST_DAYS, summarize_daily};
pub use model::{
    CurrentConditions, CurrentObservation, DailyForecastSummary, Forecast, ForecastSample,
    LocationCandidate, LocationQuery, ResolvedLocation, Units, WeatherResult,
};
pub use provider::{WeatherApi, provider_from_env};
pub use resolver::GeocodeResolver;
