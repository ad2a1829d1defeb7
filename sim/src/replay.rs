//! Run log: serialize/deserialize simulation runs for offline analysis and plotting.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracker_core::metrics::TrackingMetrics;
use tracker_core::types::{EstimateSnapshot, ObservationSnapshot};
use tracker_core::{Estimate, Observation};

/// A full recorded simulation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunLog {
    pub scenario_name: String,
    pub seed: u64,
    /// Radar positions, for plotting
    pub radar_positions: Vec<[f64; 2]>,
    /// One frame per time step, in chronological order
    pub frames: Vec<Frame>,
}

/// Everything known about one time step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Frame {
    pub time: f64,
    pub truth_position: [f64; 2],
    pub truth_velocity: [f64; 2],
    pub observation: ObservationSnapshot,
    pub prediction: EstimateSnapshot,
    /// Estimate reported online at this step
    pub estimate: EstimateSnapshot,
    /// Retrodicted estimate, if smoothing reached this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothed: Option<EstimateSnapshot>,
    pub updated: bool,
}

impl RunLog {
    /// Recompute the metrics of the online estimates against the recorded truth.
    pub fn metrics(&self) -> TrackingMetrics {
        self.metrics_of(|f| &f.estimate)
    }

    /// Metrics of the smoothed estimates, falling back to the online estimate
    /// for frames smoothing never reached.
    pub fn smoothed_metrics(&self) -> TrackingMetrics {
        self.metrics_of(|f| f.smoothed.as_ref().unwrap_or(&f.estimate))
    }

    fn metrics_of(&self, pick: impl Fn(&Frame) -> &EstimateSnapshot) -> TrackingMetrics {
        let mut metrics = TrackingMetrics::default();
        for frame in &self.frames {
            metrics.accumulate(
                &Estimate::from(pick(frame)),
                &Observation::from(&frame.observation),
                &frame.truth_position.into(),
                &frame.truth_velocity.into(),
                frame.updated,
            );
        }
        metrics
    }
}

/// Save a run log to a JSON file.
pub fn save_run_log(log: &RunLog, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), log)
        .with_context(|| format!("writing run log '{}'", log.scenario_name))
}

/// Load a run log from a JSON file.
pub fn load_run_log(path: &Path) -> anyhow::Result<RunLog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a run log", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("msdf_no_such_run_log.json");
        let err = load_run_log(&path).unwrap_err();
        assert!(format!("{err:#}").contains("msdf_no_such_run_log.json"));
    }

    #[test]
    fn garbage_is_rejected() {
        let path = std::env::temp_dir().join(format!("msdf_garbage_{}.json", std::process::id()));
        std::fs::write(&path, "{\"frames\": 3}").unwrap();
        let err = load_run_log(&path);
        std::fs::remove_file(&path).ok();
        assert!(err.is_err());
    }
}
