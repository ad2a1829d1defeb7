//! Scenario definitions.
//!
//! Each scenario is a named sensor layout around the figure-eight ground truth.
//! All scenarios are deterministic given the same seed.

use crate::error::ConfigError;
use crate::trajectory::FigureEight;
use sensor_models::{
    GaussianNoise, GridConfig, GridSensor, MergedSensor, RadarConfig, RadarSensor, Sensor, Trajectory,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::MotionModel;

/// Which pre-defined scenario to load.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// One grid sensor observing the position directly
    Grid,
    /// Four radars around the figure, fused
    Radar,
    /// Six radars on a wide ring, fused
    RadarRing,
    /// One radar at the origin
    SingleRadar,
}

impl ScenarioKind {
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Grid => "grid",
            ScenarioKind::Radar => "radar",
            ScenarioKind::RadarRing => "radar-ring",
            ScenarioKind::SingleRadar => "single-radar",
        }
    }

    /// Radar positions of this layout. Empty for the grid scenario.
    pub fn radar_positions(self) -> Vec<[f64; 2]> {
        match self {
            ScenarioKind::Grid => Vec::new(),
            ScenarioKind::Radar => vec![[6000.0, 0.0], [-6000.0, 0.0], [0.0, 5000.0], [0.0, -5000.0]],
            ScenarioKind::RadarRing => vec![
                [10000.0, 10000.0],
                [-10000.0, 10000.0],
                [10000.0, -10000.0],
                [-10000.0, -10000.0],
                [6000.0, 0.0],
                [-6000.0, 0.0],
            ],
            ScenarioKind::SingleRadar => vec![[0.0, 0.0]],
        }
    }
}

/// Sensor noise and motion settings shared by every sensor of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSettings {
    pub grid: GridConfig,
    /// Range noise std dev of every radar
    pub range_noise_std: f64,
    /// Azimuth noise std dev of every radar (radians)
    pub azimuth_noise_std: f64,
    pub motion: MotionModel,
}

impl Default for SensorSettings {
    fn default() -> Self {
        let radar = RadarConfig::default();
        Self {
            grid: GridConfig::default(),
            range_noise_std: radar.range_noise_std,
            azimuth_noise_std: radar.azimuth_noise_std,
            motion: MotionModel::default(),
        }
    }
}

/// A fully configured simulation scenario.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub seed: u64,
    pub truth: Arc<FigureEight>,
    pub radar_positions: Vec<[f64; 2]>,
    pub settings: SensorSettings,
}

impl Scenario {
    /// Build the named scenario. Uses `seed` for repeatability.
    pub fn build(
        kind: ScenarioKind,
        seed: u64,
        truth: FigureEight,
        settings: SensorSettings,
    ) -> Self {
        Scenario {
            kind,
            seed,
            truth: Arc::new(truth),
            radar_positions: kind.radar_positions(),
            settings,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn times(&self) -> Vec<f64> {
        self.truth.time_domain()
    }

    /// Instantiate the sensor of this scenario. Each physical sensor gets its
    /// own noise stream derived from the scenario seed.
    pub fn sensor(&self) -> Result<Sensor, ConfigError> {
        let truth: Arc<dyn Trajectory> = self.truth.clone();
        let s = &self.settings;

        let sensor: Sensor = match self.kind {
            ScenarioKind::Grid => {
                let grid = GridConfig {
                    motion: s.motion,
                    ..s.grid
                };
                GridSensor::from_config(truth, &grid, Box::new(GaussianNoise::new(self.seed)))?.into()
            }
            ScenarioKind::SingleRadar => self.radar(truth, 0, self.radar_positions[0])?.into(),
            ScenarioKind::Radar | ScenarioKind::RadarRing => {
                let children = self
                    .radar_positions
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| self.radar(truth.clone(), i, p).map(Sensor::from))
                    .collect::<Result<Vec<_>, _>>()?;
                MergedSensor::new(children)?.with_motion(s.motion)?.into()
            }
        };
        Ok(sensor)
    }

    fn radar(&self, truth: Arc<dyn Trajectory>, index: usize, position: [f64; 2]) -> Result<RadarSensor, ConfigError> {
        let config = RadarConfig {
            position,
            range_noise_std: self.settings.range_noise_std,
            azimuth_noise_std: self.settings.azimuth_noise_std,
            motion: self.settings.motion,
        };
        let noise = GaussianNoise::new(self.seed.wrapping_add(index as u64));
        Ok(RadarSensor::from_config(truth, &config, Box::new(noise))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::MeasurementModel;

    fn scenario(kind: ScenarioKind) -> Scenario {
        Scenario::build(kind, 42, FigureEight::default(), SensorSettings::default())
    }

    #[test]
    fn layouts() {
        assert!(ScenarioKind::Grid.radar_positions().is_empty());
        assert_eq!(ScenarioKind::Radar.radar_positions().len(), 4);
        assert_eq!(ScenarioKind::RadarRing.radar_positions().len(), 6);
        assert_eq!(ScenarioKind::SingleRadar.radar_positions(), vec![[0.0, 0.0]]);
    }

    #[test]
    fn sensor_kinds() {
        assert_eq!(scenario(ScenarioKind::Grid).sensor().unwrap().kind(), "grid");
        assert_eq!(scenario(ScenarioKind::SingleRadar).sensor().unwrap().kind(), "radar");
        let merged = scenario(ScenarioKind::RadarRing).sensor().unwrap();
        assert_eq!(merged.kind(), "merged");
        assert_eq!(merged.positions(), ScenarioKind::RadarRing.radar_positions());
    }

    #[test]
    fn same_seed_same_measurements() {
        let s = scenario(ScenarioKind::Radar);
        let (mut a, mut b) = (s.sensor().unwrap(), s.sensor().unwrap());
        for t in s.times().into_iter().take(50) {
            assert_eq!(a.measure(t).z, b.measure(t).z);
        }
    }

    #[test]
    fn bad_noise_is_reported() {
        let settings = SensorSettings {
            range_noise_std: -1.0,
            ..SensorSettings::default()
        };
        let s = Scenario::build(ScenarioKind::Radar, 1, FigureEight::default(), settings);
        assert!(matches!(s.sensor(), Err(ConfigError::Sensor(_))));
    }
}
