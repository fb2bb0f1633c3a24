use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    Config,
    astro::unix_to_utc,
    error::DashboardError,
    model::{CurrentWeather, Forecast, WeatherSample},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        Self::new(api_key, config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// GET `{base_url}/{endpoint}` for `place` and decode the body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        place: &str,
    ) -> Result<T, DashboardError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(url = %url, place, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", place), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                DashboardError::Transport(format!("request to OpenWeather ({endpoint}) failed: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            DashboardError::Transport(format!("failed to read OpenWeather {endpoint} body: {e}"))
        })?;

        if status == StatusCode::NOT_FOUND || body_says_not_found(&body) {
            return Err(DashboardError::NotFound(place.to_string()));
        }

        if !status.is_success() {
            return Err(DashboardError::Transport(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            DashboardError::Transport(format!("failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, place: &str) -> Result<CurrentWeather, DashboardError> {
        let parsed: OwCurrentResponse = self.fetch("weather", place).await?;
        parsed.into_current()
    }

    #[instrument(skip(self))]
    async fn forecast(&self, place: &str) -> Result<Forecast, DashboardError> {
        let parsed: OwForecastResponse = self.fetch("forecast", place).await?;
        parsed.into_forecast()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwCurrentResponse {
    fn into_current(self) -> Result<CurrentWeather, DashboardError> {
        let (condition_code, description, icon) = primary_condition(self.weather);

        Ok(CurrentWeather {
            location_name: self.name,
            observation_time: timestamp(self.dt)?,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            clouds_pct: self.clouds.all,
            wind_speed_mps: self.wind.speed,
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility,
            condition_code,
            description,
            icon,
            sunrise: timestamp(self.sys.sunrise)?,
            sunset: timestamp(self.sys.sunset)?,
        })
    }
}

impl OwForecastResponse {
    fn into_forecast(self) -> Result<Forecast, DashboardError> {
        let samples = self
            .list
            .into_iter()
            .map(|entry| {
                let (condition_code, description, _) = primary_condition(entry.weather);
                Ok(WeatherSample {
                    reference_time: timestamp(entry.dt)?,
                    temperature_c: entry.main.temp,
                    feels_like_c: entry.main.feels_like,
                    humidity_pct: entry.main.humidity,
                    clouds_pct: entry.clouds.all,
                    wind_speed_mps: entry.wind.speed,
                    pressure_hpa: entry.main.pressure,
                    visibility_m: entry.visibility,
                    condition_code,
                    description,
                })
            })
            .collect::<Result<Vec<_>, DashboardError>>()?;

        let location_name = if self.city.country.is_empty() {
            self.city.name
        } else {
            format!("{}, {}", self.city.name, self.city.country)
        };

        Ok(Forecast { location_name, samples })
    }
}

/// OpenWeather lists conditions most-significant first.
fn primary_condition(weather: Vec<OwWeather>) -> (u16, String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.id, w.description, w.icon))
        .unwrap_or_else(|| (0, "Unknown".to_string(), String::new()))
}

fn timestamp(ts: i64) -> Result<DateTime<Utc>, DashboardError> {
    unix_to_utc(ts)
        .ok_or_else(|| DashboardError::Transport(format!("timestamp {ts} is out of range")))
}

/// OpenWeather sometimes reports errors as `{"cod": "404", ...}` with a 200 status.
fn body_says_not_found(body: &str) -> bool {
    #[derive(Deserialize)]
    struct Cod {
        cod: serde_json::Value,
    }

    match serde_json::from_str::<Cod>(body) {
        Ok(Cod { cod: serde_json::Value::String(s) }) => s == "404",
        Ok(Cod { cod: serde_json::Value::Number(n) }) => n.as_u64() == Some(404),
        _ => false,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST_JSON: &str = r#"{
        "cod": "200",
        "list": [
            {
                "dt": 1700000000,
                "main": {"temp": 3.5, "feels_like": 1.0, "pressure": 1012, "humidity": 81},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10n"}],
                "clouds": {"all": 90},
                "wind": {"speed": 4.1, "deg": 200},
                "visibility": 10000
            },
            {
                "dt": 1700010800,
                "main": {"temp": 2.0, "feels_like": -1.2, "pressure": 1013, "humidity": 85},
                "weather": [],
                "wind": {"speed": 3.0}
            }
        ],
        "city": {"name": "Oslo", "country": "NO"}
    }"#;

    #[test]
    fn parses_forecast_payload() {
        let parsed: OwForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let forecast = parsed.into_forecast().unwrap();

        assert_eq!(forecast.location_name, "Oslo, NO");
        assert_eq!(forecast.samples.len(), 2);

        let first = &forecast.samples[0];
        assert_eq!(first.condition_code, 500);
        assert_eq!(first.clouds_pct, 90);
        assert_eq!(first.visibility_m, Some(10_000));
        assert_eq!(first.reference_time.timestamp(), 1_700_000_000);

        let second = &forecast.samples[1];
        assert_eq!(second.condition_code, 0);
        assert_eq!(second.description, "Unknown");
        assert_eq!(second.clouds_pct, 0);
        assert_eq!(second.visibility_m, None);
    }

    #[test]
    fn detects_not_found_in_body() {
        assert!(body_says_not_found(r#"{"cod":"404","message":"city not found"}"#));
        assert!(body_says_not_found(r#"{"cod":404,"message":"city not found"}"#));
        assert!(!body_says_not_found(r#"{"cod":"200","list":[]}"#));
        assert!(!body_says_not_found("not json"));
    }

    #[test]
    fn truncates_long_bodies_on_char_boundary() {
        let body = "\u{00E9}".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let provider = OpenWeatherProvider::new(
            "KEY".into(),
            "http://localhost:1234/".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
