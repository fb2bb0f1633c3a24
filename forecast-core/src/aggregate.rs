//! Per-day reduction of 3-hour forecast samples.
//!
//! Samples are grouped by the UTC calendar date of their reference time. Days keep
//! the order in which they are first seen; the input is never re-sorted.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::WeatherSample;

/// Folded values for one calendar day. `None` means no sample has set the bound yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    entries: Vec<DailyEntry>,
}

impl DailySeries {
    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|e| e.date)
    }

    /// `(date, min)` pairs for days where a minimum is known.
    pub fn mins(&self) -> Vec<(NaiveDate, f64)> {
        self.entries.iter().filter_map(|e| e.min.map(|v| (e.date, v))).collect()
    }

    /// `(date, max)` pairs for days where a maximum is known.
    pub fn maxes(&self) -> Vec<(NaiveDate, f64)> {
        self.entries.iter().filter_map(|e| e.max.map(|v| (e.date, v))).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    MinMax,
    MaxOnly,
}

/// Daily min and max of `projector` over `samples`.
pub fn aggregate_daily<F>(samples: &[WeatherSample], projector: F) -> DailySeries
where
    F: Fn(&WeatherSample) -> f64,
{
    fold_by_day(samples, projector, Bounds::MinMax)
}

/// Daily max of `projector` over `samples`; `min` is left unset.
pub fn aggregate_daily_max<F>(samples: &[WeatherSample], projector: F) -> DailySeries
where
    F: Fn(&WeatherSample) -> f64,
{
    fold_by_day(samples, projector, Bounds::MaxOnly)
}

fn fold_by_day<F>(samples: &[WeatherSample], projector: F, bounds: Bounds) -> DailySeries
where
    F: Fn(&WeatherSample) -> f64,
{
    let mut entries: Vec<DailyEntry> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let date = sample.date();
        let slot = *index.entry(date).or_insert_with(|| {
            entries.push(DailyEntry { date, min: None, max: None });
            entries.len() - 1
        });

        let value = projector(sample);
        let entry = &mut entries[slot];

        if bounds == Bounds::MinMax && entry.min.is_none_or(|current| value < current) {
            entry.min = Some(value);
        }
        if entry.max.is_none_or(|current| value > current) {
            entry.max = Some(value);
        }
    }

    DailySeries { entries }
}
