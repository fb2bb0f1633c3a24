//! Core library for the `forecast` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` seam
//! - Daily aggregation, weather alerts and sunrise/sunset formatting
//! - Chart construction and SVG rendering
//! - The dashboard pipeline tying one submission together
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod alerts;
pub mod astro;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregate::{DailyEntry, DailySeries, aggregate_daily, aggregate_daily_max};
pub use alerts::{AlertKind, AlertSet, summarize_alerts};
pub use astro::{SunTimes, format_utc};
pub use config::Config;
pub use dashboard::{Dashboard, Report};
pub use error::DashboardError;
pub use model::{
    CurrentWeather, DashboardRequest, Forecast, GraphStyle, TemperatureUnit, WeatherSample,
};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
