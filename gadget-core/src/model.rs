use serde::{Deserialize, Serialize};

/// Measurement system for temperatures. Only these two are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
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

    /// Suffix for displaying temperatures in this system.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
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
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported systems: metric, imperial."
            )),
        }
    }
}

/// Free-text location input as the user typed it.
///
/// Compared for equality (case-sensitive, exact) to decide whether a repeat
/// search can reuse the previous candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationQuery {
    pub city: String,
    pub country: String,
}

impl LocationQuery {
    /// A query is searchable only when both fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.city.is_empty() && !self.country.is_empty()
    }
}

/// One geocoded match for a location query.
///
/// Candidates are only meaningful as part of the ordered list one search
/// returned; a new search replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    /// Administrative area, e.g. "Île-de-France". Not reported for every place.
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationCandidate {
    /// Human-readable label, e.g. "Paris, Île-de-France, FR".
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

impl std::fmt::Display for LocationCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// The location and unit system the gadget is configured to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub units: Units,
}

impl ResolvedLocation {
    /// Bind a selected candidate to a unit system.
    pub fn from_candidate(candidate: LocationCandidate, units: Units) -> Self {
        Self {
            name: Some(candidate.name),
            state: candidate.state,
            country: Some(candidate.country),
            lat: candidate.lat,
            lon: candidate.lon,
            units,
        }
    }
}

/// Current conditions as reported upstream, before a unit system is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub name: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub icon: String,
    pub description: String,
}

impl CurrentObservation {
    /// Attach the requested unit system so display code never needs the
    /// original request context. The upstream payload carries no such field.
    pub fn with_units(self, units: Units) -> CurrentConditions {
        CurrentConditions {
            name: self.name,
            temperature: self.temperature,
            feels_like: self.feels_like,
            humidity: self.humidity,
            icon: self.icon,
            description: self.description,
            units,
        }
    }
}

/// Current conditions ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub icon: String,
    pub description: String,
    pub units: Units,
}

/// One raw entry of the 3-hourly forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
}

/// The full forecast series for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Location name echoed by the forecast API; used as a heading fallback
    /// when the current-conditions call failed.
    pub city_name: Option<String>,
    pub list: Vec<ForecastSample>,
}

/// One calendar day of the forecast, represented by its first sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastSummary {
    /// Calendar-day label, e.g. "Mon, Aug 29". Unique within one summary.
    pub day: String,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
    pub units: Units,
}

/// Combined outcome of the two independent weather retrievals.
///
/// Either side may be absent on partial failure; `error` carries the joined
/// failure messages when any upstream call failed. Consumers branch on the
/// presence of data and of the error string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
    pub error: Option<String>,
}

impl WeatherResult {
    /// Result with no payload at all, only an error message.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            current: None,
            forecast: None,
            error: Some(error.to_string()),
        }
    }

    /// True when neither retrieval produced data.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.forecast.is_none()
    }
}

/// URL of the OpenWeather icon image for a condition code.
///
/// `large` selects the `@2x` variant used for current conditions; forecast
/// tiles use the base size.
pub fn icon_url(icon: &str, large: bool) -> String {
    if large {
        format!("https://openweathermap.org/img/wn/{icon}@2x.png")
    } else {
        format!("https://openweathermap.org/img/wn/{icon}.png")
    }
}
