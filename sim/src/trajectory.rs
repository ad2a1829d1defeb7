//! Figure-eight ground truth.
//!
//! The target flies a Lissajous figure-eight with nominal speed `v` and
//! nominal acceleration `q`:
//!
//! ```text
//! a = v² / q,  w = q / (2v)
//! r(t) = a · (sin wt, sin 2wt)
//! ```
//!
//! Velocity and acceleration are the exact time derivatives of `r`.

use crate::error::ConfigError;
use nalgebra::Vector2;
use sensor_models::Trajectory;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Time samples per full loop of the figure-eight.
pub const STEPS_PER_ROUND: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FigureEight {
    /// Nominal speed (m/s)
    pub speed: f64,
    /// Nominal acceleration (m/s²)
    pub accel: f64,
    /// Number of loops flown
    pub rounds: u32,
}

impl Default for FigureEight {
    fn default() -> Self {
        Self {
            speed: 300.0,
            accel: 9.0,
            rounds: 2,
        }
    }
}

impl FigureEight {
    pub fn new(speed: f64, accel: f64, rounds: u32) -> Result<Self, ConfigError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidTrajectory("speed must be finite and positive"));
        }
        if !(accel.is_finite() && accel > 0.0) {
            return Err(ConfigError::InvalidTrajectory("acceleration must be finite and positive"));
        }
        if rounds == 0 {
            return Err(ConfigError::InvalidTrajectory("at least one round is required"));
        }
        Ok(Self { speed, accel, rounds })
    }

    /// Half-width of the figure.
    pub fn amplitude(&self) -> f64 {
        self.speed * self.speed / self.accel
    }

    pub fn angular_rate(&self) -> f64 {
        self.accel / (2.0 * self.speed)
    }

    /// Duration of one loop.
    pub fn period(&self) -> f64 {
        TAU / self.angular_rate()
    }
}

impl Trajectory for FigureEight {
    fn position(&self, t: f64) -> Vector2<f64> {
        let (a, w) = (self.amplitude(), self.angular_rate());
        Vector2::new(a * (w * t).sin(), a * (2.0 * w * t).sin())
    }

    fn velocity(&self, t: f64) -> Vector2<f64> {
        let (a, w) = (self.amplitude(), self.angular_rate());
        Vector2::new(a * w * (w * t).cos(), 2.0 * a * w * (2.0 * w * t).cos())
    }

    fn acceleration(&self, t: f64) -> Vector2<f64> {
        let (a, w) = (self.amplitude(), self.angular_rate());
        let w2 = w * w;
        Vector2::new(-a * w2 * (w * t).sin(), -4.0 * a * w2 * (2.0 * w * t).sin())
    }

    /// Evenly spaced sample times covering every round, both ends included.
    fn time_domain(&self) -> Vec<f64> {
        let n = self.rounds as usize * STEPS_PER_ROUND;
        let end = self.rounds as f64 * self.period();
        if n < 2 {
            return vec![0.0];
        }
        (0..n).map(|i| end * i as f64 / (n - 1) as f64).collect()
    }
}
