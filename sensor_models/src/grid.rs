//! Grid sensor: observes the position directly in the estimation frame.

use crate::error::{check_sigma, Result, SensorError};
use crate::noise::NoiseSource;
use crate::truth::Trajectory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::{position_selector, MeasurementModel, MotionModel, ObsCov, ObsMatrix, ObsVec, Observation, StateCov};

/// Configuration of a grid sensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Position noise std dev, same on both axes
    pub sigma: f64,
    pub motion: MotionModel,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sigma: 100.0,
            motion: MotionModel::default(),
        }
    }
}

/// Position sensor with isotropic Gaussian noise: z = p(t) + σ·n, R = σ²I.
#[derive(Debug)]
pub struct GridSensor {
    truth: Arc<dyn Trajectory>,
    sigma: f64,
    motion: MotionModel,
    noise: Box<dyn NoiseSource>,
}

impl GridSensor {
    pub fn new(truth: Arc<dyn Trajectory>, sigma: f64, noise: Box<dyn NoiseSource>) -> Result<Self> {
        Self::from_config(truth, &GridConfig { sigma, ..GridConfig::default() }, noise)
    }

    pub fn from_config(
        truth: Arc<dyn Trajectory>,
        config: &GridConfig,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self> {
        let sigma = check_sigma("grid", config.sigma)?;
        if !(config.motion.psd.is_finite() && config.motion.psd >= 0.0) {
            return Err(SensorError::InvalidProcessNoise(config.motion.psd));
        }
        Ok(Self {
            truth,
            sigma,
            motion: config.motion,
            noise,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Measurement noise covariance R = σ²I.
    pub fn r_matrix(&self) -> ObsCov {
        ObsCov::identity() * (self.sigma * self.sigma)
    }
}

impl MeasurementModel for GridSensor {
    fn h(&self) -> ObsMatrix {
        position_selector()
    }

    fn process_noise(&self, dt: f64) -> StateCov {
        self.motion.process_noise(dt)
    }

    fn measure(&mut self, t: f64) -> Observation {
        let error = ObsVec::new(self.noise.gaussian(self.sigma), self.noise.gaussian(self.sigma));
        Observation::new(self.truth.position(t) + error, self.r_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FixedNoise, ZeroNoise};
    use crate::truth::Stationary;

    #[test]
    fn noise_added_to_truth() {
        let truth = Arc::new(Stationary::new(10.0, 20.0));
        let mut s = GridSensor::new(truth, 2.0, Box::new(FixedNoise::new(vec![1.0, -0.5]))).unwrap();
        let obs = s.measure(0.0);
        assert_eq!(obs.z, ObsVec::new(12.0, 19.0));
        assert_eq!(obs.cov, ObsCov::identity() * 4.0);
    }

    #[test]
    fn zero_sigma_is_exact() {
        let truth = Arc::new(Stationary::new(10.0, 0.0));
        let mut s = GridSensor::new(truth, 0.0, Box::new(ZeroNoise)).unwrap();
        let obs = s.measure(3.0);
        assert_eq!(obs.z, ObsVec::new(10.0, 0.0));
        assert_eq!(obs.cov, ObsCov::zeros());
    }

    #[test]
    fn rejects_negative_sigma() {
        let truth = Arc::new(Stationary::new(0.0, 0.0));
        let err = GridSensor::new(truth, -1.0, Box::new(ZeroNoise)).unwrap_err();
        assert!(matches!(err, SensorError::InvalidNoise { name: "grid", .. }));
    }

    #[test]
    fn process_noise_uses_configured_density() {
        let truth = Arc::new(Stationary::new(0.0, 0.0));
        let config = GridConfig {
            sigma: 1.0,
            motion: MotionModel::new(500.0),
        };
        let s = GridSensor::from_config(truth, &config, Box::new(ZeroNoise)).unwrap();
        assert_eq!(s.process_noise(1.0)[(2, 2)], 500.0);
    }
}
