//! Chart construction for the daily series.
//!
//! Builders here only describe a chart. Drawing happens in [`svg`].

use chrono::{Datelike, NaiveDate};

use crate::{
    aggregate::DailySeries,
    model::{DEGREE_SIGN, GraphStyle, TemperatureUnit},
};

pub mod svg;

pub use svg::render_svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const MIN_COLOR: Rgb = Rgb(0x42, 0xbf, 0xf4);
pub const MAX_COLOR: Rgb = Rgb(0xff, 0x53, 0x49);

const PAIRED_BAR_WIDTH: f64 = 0.5;
const SINGLE_BAR_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

impl From<GraphStyle> for ChartKind {
    fn from(style: GraphStyle) -> Self {
        match style {
            GraphStyle::Bar => ChartKind::Bar,
            GraphStyle::Line => ChartKind::Line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<(NaiveDate, f64)>,
    /// Horizontal shift from the day's centre, in days.
    pub offset: f64,
    /// Bar width in days; unused for lines.
    pub width: f64,
}

impl Series {
    /// Plot coordinates of each point after applying the offset.
    pub fn coords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|(date, value)| (date_to_x(*date) + self.offset, *value))
    }
}

/// Text placed at a bar top, centred horizontally.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub legend: bool,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Horizontal extent with half a day of margin on each side.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let xs = self.series.iter().flat_map(|s| s.points.iter().map(|(d, _)| date_to_x(*d)));
        let (lo, hi) = min_max(xs)?;
        Some((lo - 0.6, hi + 0.6))
    }

    /// Vertical extent. Bars always include the zero baseline.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let ys = self.series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v));
        let (mut lo, mut hi) = min_max(ys)?;

        if self.kind == ChartKind::Bar {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }

        let span = hi - lo;
        let pad = if span > f64::EPSILON { span * 0.12 } else { 1.0 };

        let bottom = if self.kind == ChartKind::Bar && lo == 0.0 { 0.0 } else { lo - pad };
        Some((bottom, hi + pad))
    }

    pub fn day_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).max().unwrap_or(0)
    }
}

/// Daily min/max temperature chart in the requested style.
pub fn temperature_chart(style: GraphStyle, series: &DailySeries, unit: TemperatureUnit) -> Chart {
    let kind = ChartKind::from(style);
    let (min_offset, max_offset) = match kind {
        ChartKind::Bar => (-PAIRED_BAR_WIDTH / 2.0, PAIRED_BAR_WIDTH / 2.0),
        ChartKind::Line => (0.0, 0.0),
    };

    let min = Series {
        label: "Min".to_string(),
        color: MIN_COLOR,
        points: series.mins(),
        offset: min_offset,
        width: PAIRED_BAR_WIDTH,
    };
    let max = Series {
        label: "Max".to_string(),
        color: MAX_COLOR,
        points: series.maxes(),
        offset: max_offset,
        width: PAIRED_BAR_WIDTH,
    };

    let annotations = match kind {
        ChartKind::Bar => [&min, &max]
            .into_iter()
            .flat_map(|s| annotate(s, |v| format!("{}{DEGREE_SIGN}", v.round() as i64)))
            .collect(),
        ChartKind::Line => Vec::new(),
    };

    Chart {
        title: "Weekly Forecast".to_string(),
        x_label: "Day".to_string(),
        y_label: format!("Temperature ({})", unit.suffix()),
        kind,
        series: vec![min, max],
        annotations,
        legend: true,
    }
}

/// Daily max humidity, always as bars.
pub fn humidity_chart(series: &DailySeries) -> Chart {
    let bars = Series {
        label: "Humidity".to_string(),
        color: MIN_COLOR,
        points: series.maxes(),
        offset: 0.0,
        width: SINGLE_BAR_WIDTH,
    };
    let annotations = annotate(&bars, |v| format!("{}%", v.round() as i64));

    Chart {
        title: "Humidity Forecast".to_string(),
        x_label: "Day".to_string(),
        y_label: "Humidity (%)".to_string(),
        kind: ChartKind::Bar,
        series: vec![bars],
        annotations,
        legend: false,
    }
}

fn annotate(series: &Series, text: impl Fn(f64) -> String) -> Vec<Annotation> {
    series.coords().map(|(x, y)| Annotation { x, y, text: text(y) }).collect()
}

pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// `%m/%d` tick label for whole-day positions, blank in between.
pub fn format_day_tick(x: &f64) -> String {
    if (x - x.round()).abs() > 0.01 {
        return String::new();
    }
    x_to_date(*x).map(|d| d.format("%m/%d").to_string()).unwrap_or_default()
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
