//! `energy-outlook`: energy and emissions forecasting with green-shift scenarios
//!
//! Without flags the full pipeline runs: data load, ACF/PACF diagnostics,
//! model back-test and gas forecast, charts, executive summary and the
//! default scenario levels.

use anyhow::{Context, Result};
use clap::Parser;
use energy_outlook::{init_tracing, Pipeline, PipelineConfig, RunOptions};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "energy-outlook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "U.S. Energy & Emissions Forecasting Tool", long_about = None)]
struct Cli {
    /// Run a single scenario with this percent green shift (e.g. 10 for 10%)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    scenario: Option<u32>,

    /// Skip generating charts
    #[arg(long)]
    skip_plots: bool,

    /// Skip the executive summary
    #[arg(long)]
    skip_summary: bool,

    /// Run the baseline only, without scenario modelling
    #[arg(long)]
    only_baseline: bool,

    /// TOML configuration file
    #[arg(short, long, env = "ENERGY_OUTLOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for all written files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Local energy dataset instead of downloading
    #[arg(long)]
    energy_csv: Option<PathBuf>,

    /// Local CO₂ dataset instead of downloading
    #[arg(long)]
    co2_csv: Option<PathBuf>,

    /// Re-download datasets even when cached
    #[arg(long)]
    refresh: bool,

    /// Last year of the back-test training window
    #[arg(long)]
    cutoff_year: Option<i32>,

    /// Years to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Country to analyse
    #[arg(long)]
    country: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(path) = &self.energy_csv {
            config.data.energy_csv = Some(path.clone());
        }
        if let Some(path) = &self.co2_csv {
            config.data.co2_csv = Some(path.clone());
        }
        if self.refresh {
            config.data.refresh = true;
        }
        if let Some(year) = self.cutoff_year {
            config.forecast.cutoff_year = year;
        }
        if let Some(horizon) = self.horizon {
            config.forecast.horizon = horizon;
        }
        if let Some(country) = &self.country {
            config.country = country.clone();
        }
        Ok(config)
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            scenario_pct: self.scenario,
            skip_plots: self.skip_plots,
            skip_summary: self.skip_summary,
            only_baseline: self.only_baseline,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let config = cli.load_config()?;
    let pipeline =
        Pipeline::new(config, cli.run_options()).context("Invalid pipeline configuration")?;
    let report = pipeline.run().context("Pipeline failed")?;

    info!(
        selected = %report.comparison.selected,
        files = report.written.len(),
        "done"
    );
    Ok(())
}
