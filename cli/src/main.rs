//! `msdf` CLI: batch scenario runs and run-log summaries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sim::replay::{load_run_log, save_run_log};
use sim::runner::{run, MetricsSummary};
use sim::scenarios::{Scenario, ScenarioKind, SensorSettings};
use sim::trajectory::FigureEight;
use std::path::{Path, PathBuf};
use tracker_core::kf::{DEFAULT_INITIAL_VARIANCE, DEFAULT_UPDATE_THRESHOLD};
use tracker_core::model::DEFAULT_PROCESS_NOISE_PSD;
use tracker_core::{FilterConfig, MotionModel, PipelineConfig};

#[derive(Parser)]
#[command(name = "msdf", about = "Multi-sensor data fusion tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a named scenario in batch mode and output metrics.
    Run {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Minimum time between two filter updates
        #[arg(long, default_value_t = DEFAULT_UPDATE_THRESHOLD)]
        threshold: f64,
        /// Process noise power spectral density
        #[arg(long, default_value_t = DEFAULT_PROCESS_NOISE_PSD)]
        psd: f64,
        /// Initial position/velocity variance
        #[arg(long, default_value_t = DEFAULT_INITIAL_VARIANCE)]
        initial_variance: f64,
        /// Smooth this many past steps after every update
        #[arg(long)]
        retrodiction: Option<usize>,
        /// Number of figure-eight loops
        #[arg(long, default_value_t = 2)]
        rounds: u32,
        /// Grid sensor noise std dev
        #[arg(long)]
        grid_sigma: Option<f64>,
        /// Radar range noise std dev
        #[arg(long)]
        range_sigma: Option<f64>,
        /// Radar azimuth noise std dev, in degrees
        #[arg(long)]
        azimuth_sigma_deg: Option<f64>,
        /// Output metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also save the full run log
        #[arg(long)]
        save_log: Option<PathBuf>,
    },
    /// Recompute metrics from a previously saved run log.
    Summarize {
        /// Path to run log JSON file
        input: PathBuf,
        /// Output metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            threshold,
            psd,
            initial_variance,
            retrodiction,
            rounds,
            grid_sigma,
            range_sigma,
            azimuth_sigma_deg,
            output,
            save_log,
        } => {
            let mut settings = SensorSettings {
                motion: MotionModel::new(psd),
                ..SensorSettings::default()
            };
            if let Some(sigma) = grid_sigma {
                settings.grid.sigma = sigma;
            }
            if let Some(sigma) = range_sigma {
                settings.range_noise_std = sigma;
            }
            if let Some(deg) = azimuth_sigma_deg {
                settings.azimuth_noise_std = deg.to_radians();
            }
            let config = PipelineConfig {
                filter: FilterConfig {
                    initial_variance,
                    update_threshold: threshold,
                },
                retrodiction_steps: retrodiction,
            };
            let truth = FigureEight {
                rounds,
                ..FigureEight::default()
            };
            run_scenario(
                scenario,
                seed,
                truth,
                settings,
                config,
                output.as_deref(),
                save_log.as_deref(),
            )?;
        }
        Commands::Summarize { input, output } => {
            summarize(&input, output.as_deref())?;
        }
    }

    Ok(())
}

fn run_scenario(
    kind: ScenarioKind,
    seed: u64,
    truth: FigureEight,
    settings: SensorSettings,
    config: PipelineConfig,
    output_path: Option<&Path>,
    log_path: Option<&Path>,
) -> Result<()> {
    let truth = FigureEight::new(truth.speed, truth.accel, truth.rounds)?;
    let scenario = Scenario::build(kind, seed, truth, settings);

    println!(
        "Running scenario '{}' (seed={}, period={:.0}s, rounds={})...",
        scenario.name(),
        seed,
        truth.period(),
        truth.rounds
    );

    let start = std::time::Instant::now();
    let report = run(&scenario, config).with_context(|| format!("scenario '{}'", scenario.name()))?;
    let elapsed = start.elapsed();

    let summary = report.summary();
    print_summary(&summary);
    println!("Wall time: {:.3}s", elapsed.as_secs_f64());

    if let Some(path) = output_path {
        write_json(&summary, path)?;
        println!("Metrics written to {}", path.display());
    }

    if let Some(path) = log_path {
        save_run_log(&report.log, path).with_context(|| format!("saving run log to {}", path.display()))?;
        println!("Run log saved to {}", path.display());
    }

    Ok(())
}

fn summarize(input: &Path, output_path: Option<&Path>) -> Result<()> {
    let log = load_run_log(input).with_context(|| format!("loading run log from {}", input.display()))?;
    println!(
        "Loaded run log '{}' (seed={}, {} frames)",
        log.scenario_name,
        log.seed,
        log.frames.len()
    );

    let summary = MetricsSummary::new(&log, &log.metrics(), &log.smoothed_metrics());
    print_summary(&summary);

    if let Some(path) = output_path {
        write_json(&summary, path)?;
        println!("Metrics written to {}", path.display());
    }

    Ok(())
}

fn print_summary(s: &MetricsSummary) {
    println!("=== Metrics ===");
    println!("Steps:                {}", s.n_steps);
    println!("Updates:              {}", s.n_updates);
    println!("Position RMSE:        {:.1} m", s.rmse_position);
    println!("Velocity RMSE:        {:.1} m/s", s.rmse_velocity);
    println!("Observation RMSE:     {:.1} m", s.rmse_observation);
    println!("Max miss distance:    {:.1} m", s.max_miss_distance);
    println!("Smoothed pos. RMSE:   {:.1} m", s.smoothed_rmse_position);
}

fn write_json(summary: &MetricsSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).with_context(|| format!("writing metrics to {}", path.display()))?;
    Ok(())
}
