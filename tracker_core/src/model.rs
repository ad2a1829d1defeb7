//! Motion model shared by every sensor, and the capability set a sensor must
//! expose to drive the filter.
//!
//! ## CV Transition model
//! F = I₄ + dt * [[0₂ I₂]; [0₂ 0₂]]
//! i.e. x += vx*dt, y += vy*dt
//!
//! ## Process noise D (discrete white-noise acceleration)
//! D = psd * [[dt⁴/4 I₂, dt³/2 I₂]; [dt³/2 I₂, dt² I₂]]

use crate::types::{ObsMatrix, Observation, StateCov};
use serde::{Deserialize, Serialize};

/// Process-noise power spectral density used when nothing else is configured.
pub const DEFAULT_PROCESS_NOISE_PSD: f64 = 4.5;

/// Constant-velocity motion model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionModel {
    /// Scale of the white-noise acceleration (higher = more manoeuvring allowed).
    pub psd: f64,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self {
            psd: DEFAULT_PROCESS_NOISE_PSD,
        }
    }
}

impl MotionModel {
    pub fn new(psd: f64) -> Self {
        Self { psd }
    }

    /// Build state transition matrix F for timestep dt.
    pub fn transition_matrix(dt: f64) -> StateCov {
        let mut f = StateCov::identity();
        // position += velocity * dt
        f[(0, 2)] = dt;
        f[(1, 3)] = dt;
        f
    }

    /// Build process noise matrix D for timestep dt.
    pub fn process_noise(&self, dt: f64) -> StateCov {
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let dt4 = dt3 * dt;

        let mut d = StateCov::zeros();
        for i in 0..2usize {
            d[(i, i)] = dt4 / 4.0;
            d[(i + 2, i + 2)] = dt2;
            d[(i, i + 2)] = dt3 / 2.0;
            d[(i + 2, i)] = dt3 / 2.0;
        }
        d * self.psd
    }
}

/// Capability set of a sensor as seen by the estimator: the observation
/// matrix, the motion model and a way to take a measurement.
pub trait MeasurementModel {
    /// Observation matrix H mapping the state onto the observed subspace.
    fn h(&self) -> ObsMatrix;

    /// State transition F(Δt).
    fn transition(&self, dt: f64) -> StateCov {
        MotionModel::transition_matrix(dt)
    }

    /// Process noise covariance D(Δt).
    fn process_noise(&self, dt: f64) -> StateCov;

    /// Take a (noisy) observation of the target at time `t`.
    fn measure(&mut self, t: f64) -> Observation;
}
