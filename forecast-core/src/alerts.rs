use std::{collections::BTreeSet, fmt, ops::RangeInclusive};

use crate::model::Forecast;

pub const NO_ALERTS: &str = "No Upcoming Alerts!";

/// Weather conditions worth flagging. Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertKind {
    Cloud,
    Rain,
    Snow,
    Hurricane,
    Tornado,
    Fog,
    Storm,
}

impl AlertKind {
    pub const fn all() -> &'static [AlertKind] {
        &[
            AlertKind::Cloud,
            AlertKind::Rain,
            AlertKind::Snow,
            AlertKind::Hurricane,
            AlertKind::Tornado,
            AlertKind::Fog,
            AlertKind::Storm,
        ]
    }

    /// OpenWeather condition ids that count as this kind.
    fn codes(&self) -> &'static [RangeInclusive<u16>] {
        match self {
            AlertKind::Cloud => &[801..=804],
            AlertKind::Rain => &[200..=232, 300..=321, 500..=531],
            AlertKind::Snow => &[600..=622],
            AlertKind::Hurricane => &[902..=902, 962..=962],
            AlertKind::Tornado => &[781..=781, 900..=900],
            AlertKind::Fog => &[741..=741],
            AlertKind::Storm => &[901..=901, 960..=961],
        }
    }

    pub fn matches(&self, condition_code: u16) -> bool {
        self.codes().iter().any(|range| range.contains(&condition_code))
    }

    fn label(&self) -> &'static str {
        match self {
            AlertKind::Cloud => "Cloud Alert \u{26C5}",
            AlertKind::Rain => "Rain Alert \u{1F327}\u{FE0F}",
            AlertKind::Snow => "Snow Alert \u{2744}\u{FE0F}",
            AlertKind::Hurricane => "Hurricane Alert \u{1F300}",
            AlertKind::Tornado => "Tornado Alert \u{1F32A}\u{FE0F}",
            AlertKind::Fog => "Fog Alert \u{1F32B}\u{FE0F}",
            AlertKind::Storm => "Storm Alert \u{1F329}\u{FE0F}",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSet(BTreeSet<AlertKind>);

impl AlertSet {
    pub fn contains(&self, kind: AlertKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = AlertKind> + '_ {
        self.0.iter().copied()
    }

    /// Display lines, or the single "no alerts" line when nothing applies.
    pub fn lines(&self) -> Vec<String> {
        if self.0.is_empty() {
            return vec![NO_ALERTS.to_string()];
        }
        self.iter().map(|kind| kind.to_string()).collect()
    }
}

impl FromIterator<AlertKind> for AlertSet {
    fn from_iter<I: IntoIterator<Item = AlertKind>>(iter: I) -> Self {
        AlertSet(iter.into_iter().collect())
    }
}

/// Flags every alert kind that occurs anywhere in the forecast window.
pub fn summarize_alerts(forecast: &Forecast) -> AlertSet {
    AlertKind::all()
        .iter()
        .copied()
        .filter(|kind| forecast.samples.iter().any(|s| kind.matches(s.condition_code)))
        .collect()
}
