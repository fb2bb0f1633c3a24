//! One submission of the forecast form, from validation to a finished report.

use tracing::info;

use crate::{
    aggregate::{DailySeries, aggregate_daily, aggregate_daily_max},
    alerts::{AlertSet, summarize_alerts},
    astro::SunTimes,
    chart::{Chart, humidity_chart, render_svg, temperature_chart},
    error::DashboardError,
    model::{CurrentWeather, DashboardRequest, TemperatureUnit},
    provider::WeatherProvider,
};

pub const EMPTY_CITY_WARNING: &str = "Provide a city name!!";

/// Current conditions, already converted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentBlock {
    pub location_name: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub unit_suffix: String,
    pub clouds_pct: u8,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub visibility_km: Option<f64>,
}

impl CurrentBlock {
    pub fn new(current: &CurrentWeather, unit: TemperatureUnit) -> Self {
        Self {
            location_name: current.location_name.clone(),
            icon_url: current.icon_url(),
            description: title_case(&current.description),
            temperature: unit.convert(current.temperature_c).round() as i64,
            feels_like: unit.convert(current.feels_like_c).round() as i64,
            unit_suffix: unit.suffix(),
            clouds_pct: current.clouds_pct,
            wind_speed_mps: current.wind_speed_mps,
            humidity_pct: current.humidity_pct,
            pressure_hpa: current.pressure_hpa,
            visibility_km: current.visibility_m.map(|m| f64::from(m) / 1000.0),
        }
    }
}

/// A chart together with its drawn SVG document.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub chart: Chart,
    pub series: DailySeries,
    pub svg: String,
}

impl RenderedChart {
    fn render(chart: Chart, series: DailySeries) -> Result<Self, DashboardError> {
        let svg = render_svg(&chart)?;
        Ok(Self { chart, series, svg })
    }
}

/// All sections of one submission, in display order.
#[derive(Debug, Clone)]
pub struct Report {
    pub request: DashboardRequest,
    pub current: CurrentBlock,
    pub temperature: RenderedChart,
    pub alerts: AlertSet,
    pub sun: SunTimes,
    pub humidity: RenderedChart,
}

/// Runs submissions against one weather provider. Holds no state between runs.
#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Fetch, aggregate and render everything for `request`.
    ///
    /// The first failure aborts the run; no partial report is returned.
    pub async fn submit(&self, request: &DashboardRequest) -> Result<Report, DashboardError> {
        let city = validate_city(&request.city)?;
        let unit = request.unit;

        info!(city, %unit, graph = request.graph.as_str(), "Rendering dashboard");

        let current = self.provider.current_weather(city).await?;
        let forecast = self.provider.forecast(city).await?;
        info!(samples = forecast.samples.len(), "Fetched forecast");

        let current_block = CurrentBlock::new(&current, unit);

        let temps = aggregate_daily(&forecast.samples, |s| s.temperature(unit));
        let temperature =
            RenderedChart::render(temperature_chart(request.graph, &temps, unit), temps)?;

        let alerts = summarize_alerts(&forecast);
        let sun = SunTimes::from_current(&current);

        let humidity_series =
            aggregate_daily_max(&forecast.samples, |s| f64::from(s.humidity_pct));
        let humidity = RenderedChart::render(humidity_chart(&humidity_series), humidity_series)?;

        info!(alerts = alerts.len(), days = temperature.series.len(), "Dashboard ready");

        Ok(Report {
            request: DashboardRequest { city: city.to_string(), ..request.clone() },
            current: current_block,
            temperature,
            alerts,
            sun,
            humidity,
        })
    }
}

/// The city must contain something other than whitespace.
pub fn validate_city(city: &str) -> Result<&str, DashboardError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidInput(EMPTY_CITY_WARNING.to_string()));
    }
    Ok(trimmed)
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
