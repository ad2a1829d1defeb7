//! Ground-truth trajectory seen by the sensors.
//!
//! A trajectory is a pure function of time; sensors only ever read it.

use nalgebra::Vector2;
use std::fmt;

/// Deterministic true motion of the tracked object.
pub trait Trajectory: Send + Sync + fmt::Debug {
    /// True [x, y] at time `t`.
    fn position(&self, t: f64) -> Vector2<f64>;
    /// True [vx, vy] at time `t`.
    fn velocity(&self, t: f64) -> Vector2<f64>;
    /// True [ax, ay] at time `t`.
    fn acceleration(&self, t: f64) -> Vector2<f64>;
    /// Finite, non-negative, strictly increasing sample times of a run.
    fn time_domain(&self) -> Vec<f64>;
}

/// Object that never moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stationary {
    pub position: Vector2<f64>,
}

impl Stationary {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
        }
    }
}

impl Trajectory for Stationary {
    fn position(&self, _t: f64) -> Vector2<f64> {
        self.position
    }

    fn velocity(&self, _t: f64) -> Vector2<f64> {
        Vector2::zeros()
    }

    fn acceleration(&self, _t: f64) -> Vector2<f64> {
        Vector2::zeros()
    }

    /// Nothing happens, so one sample is enough.
    fn time_domain(&self) -> Vec<f64> {
        vec![0.0]
    }
}
