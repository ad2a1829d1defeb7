//! Radar sensor: range/azimuth measurement reported in the cartesian frame.
//!
//! The radar measures (r, φ) with independent Gaussian noise. Instead of
//! handing the filter a polar measurement, it linearises the polar→cartesian
//! map at the true point with T = Rot(φ)·Diag(1, r) and reports
//! - z = p(t) + T·[σ_r n₁, σ_φ n₂]ᵀ
//! - R = T·Diag(σ_r², σ_φ²)·Tᵀ
//!
//! i.e. the first-order Taylor approximation of the true sensor.

use crate::error::{check_sigma, Result, SensorError};
use crate::noise::NoiseSource;
use crate::observation::{cartesian_covariance, polar_jacobian, to_polar};
use crate::truth::Trajectory;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::{position_selector, MeasurementModel, MotionModel, ObsMatrix, ObsVec, Observation, StateCov};

/// Physical configuration of a radar sensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Radar position (x, y) in world coordinates
    pub position: [f64; 2],
    /// Measurement noise: range standard deviation
    pub range_noise_std: f64,
    /// Measurement noise: azimuth standard deviation (radians)
    pub azimuth_noise_std: f64,
    pub motion: MotionModel,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            range_noise_std: 20.0,
            azimuth_noise_std: 10f64.to_radians(),
            motion: MotionModel::default(),
        }
    }
}

/// Ground-based 2D radar at a fixed position.
#[derive(Debug)]
pub struct RadarSensor {
    truth: Arc<dyn Trajectory>,
    position: Vector2<f64>,
    sigma_range: f64,
    sigma_azimuth: f64,
    motion: MotionModel,
    noise: Box<dyn NoiseSource>,
}

impl RadarSensor {
    pub fn new(
        truth: Arc<dyn Trajectory>,
        position: [f64; 2],
        sigma_range: f64,
        sigma_azimuth: f64,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self> {
        let config = RadarConfig {
            position,
            range_noise_std: sigma_range,
            azimuth_noise_std: sigma_azimuth,
            ..RadarConfig::default()
        };
        Self::from_config(truth, &config, noise)
    }

    pub fn from_config(
        truth: Arc<dyn Trajectory>,
        config: &RadarConfig,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self> {
        let [x, y] = config.position;
        if !(x.is_finite() && y.is_finite()) {
            return Err(SensorError::InvalidPosition(x, y));
        }
        if !(config.motion.psd.is_finite() && config.motion.psd >= 0.0) {
            return Err(SensorError::InvalidProcessNoise(config.motion.psd));
        }
        Ok(Self {
            truth,
            position: Vector2::new(x, y),
            sigma_range: check_sigma("range", config.range_noise_std)?,
            sigma_azimuth: check_sigma("azimuth", config.azimuth_noise_std)?,
            motion: config.motion,
            noise,
        })
    }

    pub fn position(&self) -> [f64; 2] {
        [self.position.x, self.position.y]
    }

    /// Noise-free [range, azimuth] of the target at time `t`.
    pub fn polar_truth(&self, t: f64) -> (f64, f64) {
        to_polar(&self.position, &self.truth.position(t))
    }

    /// Noisy [range, azimuth] reading at time `t`, before linearisation.
    pub fn measure_polar(&mut self, t: f64) -> (f64, f64) {
        let (r, phi) = self.polar_truth(t);
        (
            r + self.noise.gaussian(self.sigma_range),
            phi + self.noise.gaussian(self.sigma_azimuth),
        )
    }
}

impl MeasurementModel for RadarSensor {
    fn h(&self) -> ObsMatrix {
        position_selector()
    }

    fn process_noise(&self, dt: f64) -> StateCov {
        self.motion.process_noise(dt)
    }

    fn measure(&mut self, t: f64) -> Observation {
        let truth = self.truth.position(t);
        let (r, phi) = to_polar(&self.position, &truth);
        let polar_error = ObsVec::new(
            self.noise.gaussian(self.sigma_range),
            self.noise.gaussian(self.sigma_azimuth),
        );
        let z = truth + polar_jacobian(r, phi) * polar_error;
        let cov = cartesian_covariance(r, phi, self.sigma_range, self.sigma_azimuth);
        Observation::new(z, cov)
    }
}
