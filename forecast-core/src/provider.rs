use crate::{Config, CurrentWeather, DashboardError, Forecast};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of weather data for a named place.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Latest observation at `place`.
    async fn current_weather(&self, place: &str) -> Result<CurrentWeather, DashboardError>;

    /// 5-day forecast at 3-hour resolution for `place`.
    async fn forecast(&self, place: &str) -> Result<Forecast, DashboardError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
