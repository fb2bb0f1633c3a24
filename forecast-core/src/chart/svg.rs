use plotters::{
    coord::Shift,
    drawing::DrawingAreaErrorKind,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::error::DashboardError;

use super::{Chart, ChartKind, Rgb, format_day_tick};

pub const CHART_SIZE: (u32, u32) = (800, 480);

/// Axis extent used when a chart has no points.
const EMPTY_RANGE: (f64, f64) = (0.0, 1.0);

type DrawResult<T> = Result<T, DrawingAreaErrorKind<std::io::Error>>;

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

/// Draw `chart` into a standalone SVG document.
///
/// A chart without points still gets its title, axis labels and an empty grid.
pub fn render_svg(chart: &Chart) -> Result<String, DashboardError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw(chart, &root).map_err(|e| DashboardError::Render(e.to_string()))?;
        root.present().map_err(|e| DashboardError::Render(e.to_string()))?;
    }

    tracing::debug!(title = %chart.title, bytes = svg.len(), "Rendered chart");
    Ok(svg)
}

fn draw(chart: &Chart, root: &DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult<()> {
    let empty = chart.is_empty();
    let (x0, x1) = chart.x_range().unwrap_or(EMPTY_RANGE);
    let (y0, y1) = chart.y_range().unwrap_or(EMPTY_RANGE);
    let tick = |x: &f64| if empty { String::new() } else { format_day_tick(x) };

    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(chart.day_count() + 2)
        .x_label_formatter(&tick)
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    for series in &chart.series {
        let color = RGBColor::from(series.color);

        match chart.kind {
            ChartKind::Bar => {
                let half = series.width / 2.0;
                let bars = series
                    .coords()
                    .map(|(x, y)| Rectangle::new([(x - half, 0.0), (x + half, y)], color.filled()));
                let anno = ctx.draw_series(bars)?;
                if chart.legend {
                    anno.label(series.label.as_str()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
                }
            }
            ChartKind::Line => {
                let anno =
                    ctx.draw_series(LineSeries::new(series.coords(), color.stroke_width(2)))?;
                if chart.legend {
                    anno.label(series.label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
                ctx.draw_series(series.coords().map(|p| Circle::new(p, 4, color.filled())))?;
            }
        }
    }

    let text_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    ctx.draw_series(
        chart
            .annotations
            .iter()
            .map(|a| Text::new(a.text.clone(), (a.x, a.y), text_style.clone())),
    )?;

    if chart.legend && !empty {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DailySeries;
    use crate::chart::{Series, humidity_chart, temperature_chart};
    use crate::model::{GraphStyle, TemperatureUnit};
    use chrono::NaiveDate;

    fn chart(kind: ChartKind) -> Chart {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        Chart {
            title: "Weekly Forecast".into(),
            x_label: "Day".into(),
            y_label: "Temperature".into(),
            kind,
            series: vec![Series {
                label: "Max".into(),
                color: Rgb(0xff, 0x53, 0x49),
                points: vec![(day(1), 12.0), (day(2), -3.0), (day(3), 7.5)],
                offset: 0.0,
                width: 0.5,
            }],
            annotations: Vec::new(),
            legend: true,
        }
    }

    #[test]
    fn bar_chart_renders_to_svg() {
        let svg = render_svg(&chart(ChartKind::Bar)).expect("should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Weekly Forecast"));
    }

    #[test]
    fn line_chart_renders_to_svg() {
        let svg = render_svg(&chart(ChartKind::Line)).expect("should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn empty_series_renders_bare_axes() {
        let chart = humidity_chart(&DailySeries::default());
        assert!(chart.is_empty());

        let svg = render_svg(&chart).expect("empty chart should still render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Humidity Forecast"));
    }

    #[test]
    fn empty_line_chart_renders() {
        let chart = temperature_chart(
            GraphStyle::Line,
            &DailySeries::default(),
            TemperatureUnit::Celsius,
        );
        let svg = render_svg(&chart).expect("empty chart should still render");
        assert!(svg.contains("Weekly Forecast"));
        assert!(!svg.contains("<circle"));
    }
}
