use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub const DEGREE_SIGN: char = '\u{00B0}';

/// Temperature unit selected for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    /// Unit letter, e.g. `C`.
    pub fn letter(&self) -> char {
        match self {
            TemperatureUnit::Celsius => 'C',
            TemperatureUnit::Fahrenheit => 'F',
        }
    }

    /// Degree suffix, e.g. `°C`.
    pub fn suffix(&self) -> String {
        format!("{DEGREE_SIGN}{}", self.letter())
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(DashboardError::InvalidInput(format!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            ))),
        }
    }
}

/// Chart style for the temperature graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphStyle {
    #[default]
    Bar,
    Line,
}

impl GraphStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphStyle::Bar => "bar",
            GraphStyle::Line => "line",
        }
    }

    pub const fn all() -> &'static [GraphStyle] {
        &[GraphStyle::Bar, GraphStyle::Line]
    }
}

impl fmt::Display for GraphStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphStyle::Bar => f.write_str("Bar Graph"),
            GraphStyle::Line => f.write_str("Line Graph"),
        }
    }
}

impl FromStr for GraphStyle {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "bar" | "bar graph" => Ok(GraphStyle::Bar),
            "line" | "line graph" => Ok(GraphStyle::Line),
            _ => Err(DashboardError::InvalidInput(format!(
                "Unknown graph style '{value}'. Supported styles: bar, line."
            ))),
        }
    }
}

/// What the user submitted.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub city: String,
    pub unit: TemperatureUnit,
    pub graph: GraphStyle,
}

/// One 3-hour forecast step. Temperatures are in Celsius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSample {
    pub reference_time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub clouds_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub visibility_m: Option<u32>,
    /// OpenWeather condition id, e.g. 500 for light rain.
    pub condition_code: u16,
    pub description: String,
}

impl WeatherSample {
    /// UTC calendar day this sample belongs to.
    pub fn date(&self) -> NaiveDate {
        self.reference_time.date_naive()
    }

    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        unit.convert(self.temperature_c)
    }
}

/// 5-day / 3-hour forecast for one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub samples: Vec<WeatherSample>,
}

/// Latest observation for one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub observation_time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub clouds_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub visibility_m: Option<u32>,
    pub condition_code: u16,
    pub description: String,
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl CurrentWeather {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@4x.png", self.icon)
    }
}
