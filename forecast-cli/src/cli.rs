use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, Dashboard, DashboardError, DashboardRequest, GraphStyle, TemperatureUnit,
    provider_from_config,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::info;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast dashboard")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show the dashboard for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Temperature unit: celsius or fahrenheit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Temperature graph style: bar or line.
        #[arg(long)]
        graph: Option<GraphStyle>,

        /// Directory for the chart SVG files.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Fill in the form interactively and submit as often as you like.
    Interactive {
        /// Directory for the chart SVG files.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, unit, graph, out_dir } => {
                let config = Config::load()?;
                let dashboard = Dashboard::new(provider_from_config(&config)?);
                let out_dir = out_dir.unwrap_or_else(|| config.output_dir());

                let request = DashboardRequest {
                    city,
                    unit: unit.unwrap_or(config.default_unit),
                    graph: graph.unwrap_or(config.default_graph),
                };

                let Err(err) = submit(&dashboard, &request, &out_dir).await else {
                    return Ok(());
                };
                match err.downcast_ref::<DashboardError>() {
                    Some(e) if e.is_warning() => {
                        output::print_warning(e);
                        Ok(())
                    }
                    Some(e) => Err(anyhow::anyhow!(e.user_message())),
                    None => Err(err),
                }
            }
            Command::Interactive { out_dir } => {
                let config = Config::load()?;
                let dashboard = Dashboard::new(provider_from_config(&config)?);
                let out_dir = out_dir.unwrap_or_else(|| config.output_dir());
                interactive(&dashboard, &config, &out_dir).await
            }
        }
    }
}

/// Run one submission and print the report.
async fn submit(
    dashboard: &Dashboard,
    request: &DashboardRequest,
    out_dir: &std::path::Path,
) -> anyhow::Result<()> {
    let report = dashboard.submit(request).await?;
    let files = output::write_charts(&report, out_dir)?;
    output::print_report(&report, &files);
    Ok(())
}

/// Idle: wait for the form. Rendering: one submission. Always back to Idle.
async fn interactive(
    dashboard: &Dashboard,
    config: &Config,
    out_dir: &std::path::Path,
) -> anyhow::Result<()> {
    println!("Weather Forecaster");
    println!("Enter the city name, choose a temperature unit and a graph type (Esc to quit).");

    loop {
        let request = match prompt_request(config) {
            Ok(request) => request,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                info!("Leaving interactive mode");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read form input"),
        };

        if let Err(err) = submit(dashboard, &request, out_dir).await {
            output::print_failure(&err);
        }
    }
}

fn prompt_request(config: &Config) -> Result<DashboardRequest, InquireError> {
    let city = Text::new("Name of the city:").prompt()?;

    let units = TemperatureUnit::all().to_vec();
    let unit_start = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    let unit = Select::new("Select temperature unit:", units)
        .with_starting_cursor(unit_start)
        .prompt()?;

    let graphs = GraphStyle::all().to_vec();
    let graph_start = graphs.iter().position(|g| *g == config.default_graph).unwrap_or(0);
    let graph =
        Select::new("Select graph type:", graphs).with_starting_cursor(graph_start).prompt()?;

    Ok(DashboardRequest { city, unit, graph })
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_options() {
        let cli = Cli::try_parse_from([
            "forecast", "-v", "show", "London", "--unit", "fahrenheit", "--graph", "line",
        ])
        .expect("should parse");

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Show { city, unit, graph, out_dir } => {
                assert_eq!(city, "London");
                assert_eq!(unit, Some(TemperatureUnit::Fahrenheit));
                assert_eq!(graph, Some(GraphStyle::Line));
                assert!(out_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = Cli::try_parse_from(["forecast", "show", "London", "--unit", "kelvin"]);
        assert!(err.is_err());
    }

    #[test]
    fn parses_interactive() {
        let cli = Cli::try_parse_from(["forecast", "interactive", "--out-dir", "charts"])
            .expect("should parse");
        assert!(matches!(cli.command, Command::Interactive { out_dir: Some(_) }));
    }
}
