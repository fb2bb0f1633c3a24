use std::{
    fmt::{self, Write as _},
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use forecast_core::{DashboardError, Report};

const RULE: &str = "_____________________________________";

/// Where the chart documents of one report were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFiles {
    pub temperature: PathBuf,
    pub humidity: PathBuf,
}

pub fn write_charts(report: &Report, out_dir: &Path) -> anyhow::Result<ChartFiles> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let files = ChartFiles {
        temperature: out_dir.join("temperature.svg"),
        humidity: out_dir.join("humidity.svg"),
    };

    for (path, svg) in
        [(&files.temperature, &report.temperature.svg), (&files.humidity, &report.humidity.svg)]
    {
        fs::write(path, svg)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Wrote chart");
    }

    Ok(files)
}

pub fn print_report(report: &Report, files: &ChartFiles) {
    print!("{}", format_report(report, files));
}

pub fn print_warning(err: &DashboardError) {
    eprintln!("Warning: {}", err.user_message());
}

pub fn print_error(err: &DashboardError) {
    eprintln!("Error: {}", err.user_message());
    tracing::debug!(error = ?err, "Submission failed");
}

/// Print a failed submission: dashboard errors by kind, anything else with its context chain.
pub fn print_failure(err: &anyhow::Error) {
    match err.downcast_ref::<DashboardError>() {
        Some(e) if e.is_warning() => print_warning(e),
        Some(e) => print_error(e),
        None => {
            eprintln!("Error: {err:#}");
            tracing::debug!(error = ?err, "Submission failed");
        }
    }
}

/// Every section in display order: current weather, temperature, alerts, sun, humidity.
pub fn format_report(report: &Report, files: &ChartFiles) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, report, files);
    out
}

fn write_report(out: &mut String, report: &Report, files: &ChartFiles) -> fmt::Result {
    let c = &report.current;
    let suffix = &c.unit_suffix;

    writeln!(out, "Weather Forecaster: {}", c.location_name)?;
    writeln!(out, "{} ({})", c.description, c.icon_url)?;
    writeln!(out, "\u{1F321}\u{FE0F} Temperature: {}{suffix}", c.temperature)?;
    writeln!(out, "Feels Like: {}{suffix}", c.feels_like)?;
    writeln!(out, "\u{2601}\u{FE0F} Clouds Coverage: {}%", c.clouds_pct)?;
    writeln!(out, "\u{1F4A8} Wind Speed: {} m/s", c.wind_speed_mps)?;
    writeln!(out, "\u{1F4A7} Humidity: {}%", c.humidity_pct)?;
    writeln!(out, "\u{23F2}\u{FE0F} Pressure: {} mBar", c.pressure_hpa)?;
    match c.visibility_km {
        Some(km) => writeln!(out, "\u{1F6E3}\u{FE0F} Visibility: {km} km")?,
        None => writeln!(out, "\u{1F6E3}\u{FE0F} Visibility: n/a")?,
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "5 Day Min and Max Temperature ({})", report.request.graph)?;
    for entry in report.temperature.series.entries() {
        writeln!(
            out,
            "  {}  min {}{suffix}  max {}{suffix}",
            entry.date.format("%m/%d"),
            rounded(entry.min),
            rounded(entry.max),
        )?;
    }
    writeln!(out, "  chart: {}", files.temperature.display())?;

    writeln!(out, "{RULE}")?;
    writeln!(out, "Upcoming Weather Alerts")?;
    for line in report.alerts.lines() {
        writeln!(out, "  - {line}")?;
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "Sunrise and Sunset")?;
    writeln!(out, "\u{1F305} Sunrise: {}", report.sun.sunrise_utc())?;
    writeln!(out, "\u{1F307} Sunset: {}", report.sun.sunset_utc())?;

    writeln!(out, "{RULE}")?;
    writeln!(out, "Humidity Index of 5 Days")?;
    for entry in report.humidity.series.entries() {
        writeln!(out, "  {}  {}%", entry.date.format("%m/%d"), rounded(entry.max))?;
    }
    writeln!(out, "  chart: {}", files.humidity.display())
}

fn rounded(value: Option<f64>) -> String {
    value.map(|v| (v.round() as i64).to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use forecast_core::{
        AlertKind, DashboardRequest, GraphStyle, SunTimes, TemperatureUnit, WeatherSample,
        aggregate_daily, aggregate_daily_max,
        chart::{humidity_chart, temperature_chart},
        dashboard::{CurrentBlock, RenderedChart},
    };

    fn report() -> Report {
        let samples: Vec<WeatherSample> = [(14, 21, 9.2, 70), (15, 0, 6.4, 88), (15, 3, 8.0, 75)]
            .into_iter()
            .map(|(day, hour, temp, humidity)| WeatherSample {
                reference_time: Utc.with_ymd_and_hms(2023, 11, day, hour, 0, 0).unwrap(),
                temperature_c: temp,
                feels_like_c: temp,
                humidity_pct: humidity,
                clouds_pct: 0,
                wind_speed_mps: 1.0,
                pressure_hpa: 1018.0,
                visibility_m: None,
                condition_code: 800,
                description: String::new(),
            })
            .collect();

        let unit = TemperatureUnit::Celsius;
        let temps = aggregate_daily(&samples, |s| s.temperature(unit));
        let humidity = aggregate_daily_max(&samples, |s| f64::from(s.humidity_pct));

        Report {
            request: DashboardRequest { city: "London".into(), unit, graph: GraphStyle::Bar },
            current: CurrentBlock {
                location_name: "London".into(),
                icon_url: "https://openweathermap.org/img/wn/04d@4x.png".into(),
                description: "Broken Clouds".into(),
                temperature: 11,
                feels_like: 10,
                unit_suffix: unit.suffix(),
                clouds_pct: 75,
                wind_speed_mps: 4.63,
                humidity_pct: 76,
                pressure_hpa: 1019.0,
                visibility_km: Some(10.0),
            },
            temperature: RenderedChart {
                chart: temperature_chart(GraphStyle::Bar, &temps, unit),
                series: temps,
                svg: String::new(),
            },
            alerts: [AlertKind::Fog, AlertKind::Rain].into_iter().collect(),
            sun: SunTimes {
                sunrise: Utc.timestamp_opt(1_699_945_800, 0).unwrap(),
                sunset: Utc.timestamp_opt(1_699_978_500, 0).unwrap(),
            },
            humidity: RenderedChart {
                chart: humidity_chart(&humidity),
                series: humidity,
                svg: String::new(),
            },
        }
    }

    fn files() -> ChartFiles {
        ChartFiles {
            temperature: PathBuf::from("out/temperature.svg"),
            humidity: PathBuf::from("out/humidity.svg"),
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = format_report(&report(), &files());

        let positions: Vec<usize> = [
            "Temperature: 11\u{00B0}C",
            "5 Day Min and Max Temperature",
            "Upcoming Weather Alerts",
            "Sunrise and Sunset",
            "Humidity Index of 5 Days",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn lists_daily_values_and_alerts() {
        let text = format_report(&report(), &files());

        assert!(text.contains("11/14  min 9\u{00B0}C  max 9\u{00B0}C"));
        assert!(text.contains("11/15  min 6\u{00B0}C  max 8\u{00B0}C"));
        assert!(text.contains("11/15  88%"));
        assert!(text.contains("Sunrise: 2023-11-14 07:10:00 UTC"));
        assert!(text.contains("Pressure: 1019 mBar"));
        assert!(text.contains("Visibility: 10 km"));

        let rain = text.find("Rain Alert").unwrap();
        let fog = text.find("Fog Alert").unwrap();
        assert!(rain < fog);
    }

    #[test]
    fn writes_both_chart_files() {
        let dir = std::env::temp_dir().join(format!("forecast-cli-test-{}", std::process::id()));
        let mut report = report();
        report.temperature.svg = "<svg>t</svg>".into();
        report.humidity.svg = "<svg>h</svg>".into();

        let files = write_charts(&report, &dir).expect("should write");

        assert_eq!(fs::read_to_string(&files.temperature).unwrap(), "<svg>t</svg>");
        assert_eq!(fs::read_to_string(&files.humidity).unwrap(), "<svg>h</svg>");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_output_dir_is_an_io_error() {
        let blocker =
            std::env::temp_dir().join(format!("forecast-cli-blocker-{}", std::process::id()));
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_charts(&report(), &blocker).unwrap_err();

        assert!(err.downcast_ref::<DashboardError>().is_none());
        assert!(err.to_string().contains("Failed to create output directory"), "{err:#}");
        let _ = fs::remove_file(&blocker);
    }
}
