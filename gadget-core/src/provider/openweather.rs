use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::model::{CurrentObservation, Forecast, ForecastSample, LocationCandidate, LocationQuery, Units};

use super::WeatherApi;

const DATA_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the OpenWeather geocoding, current-weather and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    data_base_url: String,
    geo_base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            http,
            data_base_url: DATA_BASE_URL.to_string(),
            geo_base_url: GEO_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: Client::new(),
            data_base_url: base_url.to_string(),
            geo_base_url: base_url.to_string(),
        }
    }

    /// GET a URL and return the body, folding a non-2xx status and its
    /// (truncated) body into a single error message.
    async fn get_checked(&self, what: &str, url: String, query: &[(&str, &str)]) -> Result<String> {
        tracing::debug!(url = %url, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    state: Option<String>,
    country: String,
    lat: f64,
    lon: f64,
}

impl From<OwGeoEntry> for LocationCandidate {
    fn from(entry: OwGeoEntry) -> Self {
        LocationCandidate {
            name: entry.name,
            state: entry.state,
            country: entry.country,
            lat: entry.lat,
            lon: entry.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode(&self, query: &LocationQuery) -> Result<Vec<LocationCandidate>> {
        let url = format!("{}/direct", self.geo_base_url);
        let q = format!("{},{}", query.city, query.country);

        let body = self
            .get_checked(
                "geocoding",
                url,
                &[("q", q.as_str()), ("limit", "5"), ("appid", self.api_key.as_str())],
            )
            .await?;

        let parsed: Vec<OwGeoEntry> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        Ok(parsed.into_iter().map(LocationCandidate::from).collect())
    }

    async fn current(&self, lat: f64, lon: f64, units: Units) -> Result<CurrentObservation> {
        let url = format!("{}/weather", self.data_base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();

        let body = self
            .get_checked(
                "current weather",
                url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", units.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .context("Failed to parse OpenWeather current weather JSON")?;

        let (icon, description) = first_condition(&parsed.weather);

        Ok(CurrentObservation {
            name: parsed.name,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            icon,
            description,
        })
    }

    async fn forecast(&self, lat: f64, lon: f64, units: Units) -> Result<Forecast> {
        let url = format!("{}/forecast", self.data_base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();

        let body = self
            .get_checked(
                "forecast",
                url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", units.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        let list = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (icon, description) = first_condition(&entry.weather);
                ForecastSample {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    icon,
                    description,
                }
            })
            .collect();

        Ok(Forecast { city_name: Some(parsed.city.name), list })
    }
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.icon.clone(), w.description.clone()))
        .unwrap_or_else(|| (String::new(), "Unknown".to_string()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn geocode_maps_candidates_in_upstream_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("q", "Paris,FR"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Paris", "state": "Île-de-France", "country": "FR", "lat": 48.85, "lon": 2.35},
                {"name": "Paris", "country": "FR", "lat": 33.66, "lon": -95.55}
            ])))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("test-key", &server.uri());
        let query = LocationQuery { city: "Paris".into(), country: "FR".into() };
        let candidates = client.geocode(&query).await.expect("geocode should succeed");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].state.as_deref(), Some("Île-de-France"));
        assert_eq!(candidates[0].lat, 48.85);
        // Second entry has no `state` field at all; it must still parse.
        assert_eq!(candidates[1].state, None);
        assert_eq!(candidates[1].lon, -95.55);
    }

    #[tokio::test]
    async fn geocode_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("bad-key", &server.uri());
        let query = LocationQuery { city: "Paris".into(), country: "FR".into() };
        let err = client.geocode(&query).await.unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("geocoding request failed"));
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn current_maps_payload_and_sends_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 56},
                "weather": [{"icon": "01d", "description": "clear sky"}]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("test-key", &server.uri());
        let observation = client
            .current(48.85, 2.35, Units::Metric)
            .await
            .expect("current should succeed");

        assert_eq!(observation.name, "Paris");
        assert_eq!(observation.temperature, 21.4);
        assert_eq!(observation.feels_like, 20.9);
        assert_eq!(observation.humidity, 56);
        assert_eq!(observation.icon, "01d");
        assert_eq!(observation.description, "clear sky");
    }

    #[tokio::test]
    async fn forecast_maps_series_and_city_name() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": {"name": "Paris"},
                "list": [
                    {"dt": 1661774400, "main": {"temp": 70.2}, "weather": [{"icon": "10d", "description": "light rain"}]},
                    {"dt": 1661785200, "main": {"temp": 71.8}, "weather": [{"icon": "04d", "description": "broken clouds"}]}
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("test-key", &server.uri());
        let forecast = client
            .forecast(48.85, 2.35, Units::Imperial)
            .await
            .expect("forecast should succeed");

        assert_eq!(forecast.city_name.as_deref(), Some("Paris"));
        assert_eq!(forecast.list.len(), 2);
        assert_eq!(forecast.list[0].timestamp, 1661774400);
        assert_eq!(forecast.list[0].temperature, 70.2);
        assert_eq!(forecast.list[1].description, "broken clouds");
    }

    #[tokio::test]
    async fn empty_weather_array_falls_back_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 56},
                "weather": []
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("test-key", &server.uri());
        let observation = client
            .current(48.85, 2.35, Units::Metric)
            .await
            .expect("current should succeed");

        assert_eq!(observation.description, "Unknown");
        assert_eq!(observation.icon, "");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let short = "short body";
        assert_eq!(truncate_body(short), short);

        let long = "é".repeat(150);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
