//! Batch driver: run a scenario through the pipeline and record every step.

use crate::error::ConfigError;
use crate::replay::{Frame, RunLog};
use crate::scenarios::Scenario;
use sensor_models::Trajectory;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracker_core::metrics::TrackingMetrics;
use tracker_core::{Pipeline, PipelineConfig};

/// Outcome of a batch run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub log: RunLog,
    /// Metrics of the online estimates
    pub metrics: TrackingMetrics,
    /// Metrics after retrodiction (equal to `metrics` when smoothing is off)
    pub smoothed_metrics: TrackingMetrics,
}

/// Summary written by the CLI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub scenario: String,
    pub seed: u64,
    pub n_steps: u64,
    pub n_updates: u64,
    pub rmse_position: f64,
    pub rmse_velocity: f64,
    pub rmse_observation: f64,
    pub max_miss_distance: f64,
    pub smoothed_rmse_position: f64,
}

impl MetricsSummary {
    pub fn new(log: &RunLog, metrics: &TrackingMetrics, smoothed: &TrackingMetrics) -> Self {
        Self {
            scenario: log.scenario_name.clone(),
            seed: log.seed,
            n_steps: metrics.n_steps,
            n_updates: metrics.n_updates,
            rmse_position: metrics.rmse_position(),
            rmse_velocity: metrics.rmse_velocity(),
            rmse_observation: metrics.rmse_observation(),
            max_miss_distance: metrics.max_miss_distance,
            smoothed_rmse_position: smoothed.rmse_position(),
        }
    }
}

impl RunReport {
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary::new(&self.log, &self.metrics, &self.smoothed_metrics)
    }
}

fn validate(config: &PipelineConfig) -> Result<(), ConfigError> {
    let threshold = config.filter.update_threshold;
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(ConfigError::InvalidThreshold(threshold));
    }
    let variance = config.filter.initial_variance;
    if !(variance.is_finite() && variance > 0.0) {
        return Err(ConfigError::InvalidInitialVariance(variance));
    }
    Ok(())
}

/// Drive `scenario` over its whole time domain.
pub fn run(scenario: &Scenario, config: PipelineConfig) -> Result<RunReport, ConfigError> {
    validate(&config)?;
    let sensor = scenario.sensor()?;
    let times = scenario.times();
    info!(
        scenario = scenario.name(),
        seed = scenario.seed,
        steps = times.len(),
        sensor = sensor.kind(),
        "starting run"
    );

    let mut pipeline = Pipeline::new(config, sensor);
    let outputs = pipeline.run(&times);

    // history index i is step i; entries below the last retrodiction window
    // keep whatever smoothing reached them
    let history = pipeline.kf.history();
    let mut metrics = TrackingMetrics::default();
    let mut frames = Vec::with_capacity(outputs.len());
    for (i, out) in outputs.iter().enumerate() {
        let truth_position = scenario.truth.position(out.time);
        let truth_velocity = scenario.truth.velocity(out.time);
        let miss = metrics.accumulate(&out.estimate, &out.observation, &truth_position, &truth_velocity, out.updated);
        if out.updated {
            debug!(t = out.time, miss, "missed by");
        }
        frames.push(Frame {
            time: out.time,
            truth_position: [truth_position.x, truth_position.y],
            truth_velocity: [truth_velocity.x, truth_velocity.y],
            observation: (&out.observation).into(),
            prediction: (&out.prediction).into(),
            estimate: (&out.estimate).into(),
            smoothed: history.get(i).and_then(|e| e.smoothed.as_ref()).map(Into::into),
            updated: out.updated,
        });
    }

    let log = RunLog {
        scenario_name: scenario.name().to_string(),
        seed: scenario.seed,
        radar_positions: scenario.radar_positions.clone(),
        frames,
    };
    let smoothed_metrics = log.smoothed_metrics();
    info!(
        updates = metrics.n_updates,
        rmse_position = metrics.rmse_position(),
        smoothed_rmse_position = smoothed_metrics.rmse_position(),
        max_miss = metrics.max_miss_distance,
        "run finished"
    );

    Ok(RunReport {
        log,
        metrics,
        smoothed_metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{ScenarioKind, SensorSettings};
    use crate::trajectory::FigureEight;
    use sensor_models::GridConfig;
    use tracker_core::FilterConfig;

    fn scenario(kind: ScenarioKind) -> Scenario {
        Scenario::build(kind, 42, FigureEight::default(), SensorSettings::default())
    }

    #[test]
    fn grid_run_tracks_the_figure() {
        let report = run(&scenario(ScenarioKind::Grid), PipelineConfig::default()).unwrap();
        assert_eq!(report.log.frames.len(), 1000);
        assert_eq!(report.metrics.n_steps, 1000);
        assert!(report.metrics.n_updates > 100);
        assert!(report.metrics.n_updates < 1000);
        // well inside the 10 km half-width of the figure
        assert!(report.metrics.rmse_position() < 1000.0);
        assert_eq!(report.log.metrics(), report.metrics);
    }

    #[test]
    fn fused_radars_beat_single_radar() {
        let merged = run(&scenario(ScenarioKind::Radar), PipelineConfig::default()).unwrap();
        let single = run(&scenario(ScenarioKind::SingleRadar), PipelineConfig::default()).unwrap();
        assert!(merged.metrics.rmse_observation() < single.metrics.rmse_observation());
    }

    #[test]
    fn noiseless_grid_is_exact_at_updates() {
        let settings = SensorSettings {
            grid: GridConfig {
                sigma: 0.0,
                ..GridConfig::default()
            },
            ..SensorSettings::default()
        };
        let s = Scenario::build(ScenarioKind::Grid, 1, FigureEight::default(), settings);
        let report = run(&s, PipelineConfig::default()).unwrap();
        for frame in report.log.frames.iter().filter(|f| f.updated) {
            assert!((frame.estimate.state[0] - frame.truth_position[0]).abs() < 1e-6);
            assert!((frame.estimate.state[1] - frame.truth_position[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn retrodiction_marks_smoothed_frames() {
        let config = PipelineConfig {
            retrodiction_steps: Some(10),
            ..PipelineConfig::default()
        };
        let report = run(&scenario(ScenarioKind::Grid), config).unwrap();
        assert!(report.log.frames.iter().any(|f| f.smoothed.is_some()));
        assert!(report.log.frames.last().is_some_and(|f| f.smoothed.is_none()));

        let plain = run(&scenario(ScenarioKind::Grid), PipelineConfig::default()).unwrap();
        assert!(plain.log.frames.iter().all(|f| f.smoothed.is_none()));
        assert_eq!(plain.metrics, plain.smoothed_metrics);
    }

    #[test]
    fn retrodiction_improves_on_online_estimates() {
        let config = PipelineConfig {
            retrodiction_steps: Some(10),
            ..PipelineConfig::default()
        };
        for kind in [ScenarioKind::Grid, ScenarioKind::Radar] {
            let report = run(&scenario(kind), config).unwrap();
            assert!(report.smoothed_metrics.rmse_position() < report.metrics.rmse_position());
        }
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = run(&scenario(ScenarioKind::RadarRing), PipelineConfig::default()).unwrap();
        let b = run(&scenario(ScenarioKind::RadarRing), PipelineConfig::default()).unwrap();
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn rejects_bad_threshold() {
        let config = PipelineConfig {
            filter: FilterConfig {
                update_threshold: 0.0,
                ..FilterConfig::default()
            },
            ..PipelineConfig::default()
        };
        assert_eq!(
            run(&scenario(ScenarioKind::Grid), config).unwrap_err(),
            ConfigError::InvalidThreshold(0.0)
        );
    }
}
