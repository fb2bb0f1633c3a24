use chrono::{DateTime, Utc};

use crate::model::CurrentWeather;

pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Sunrise and sunset for the current day at the requested place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunTimes {
    pub fn from_current(current: &CurrentWeather) -> Self {
        Self { sunrise: current.sunrise, sunset: current.sunset }
    }

    pub fn sunrise_utc(&self) -> String {
        format_utc(self.sunrise)
    }

    pub fn sunset_utc(&self) -> String {
        format_utc(self.sunset)
    }
}

pub fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format(UTC_FORMAT).to_string()
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
