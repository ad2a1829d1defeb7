//! Tracking metrics: RMSE of position/velocity/observation, miss distance,
//! update count.

use crate::types::{Estimate, ObsVec, Observation};
use serde::{Deserialize, Serialize};

/// Accumulated metric statistics over a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingMetrics {
    /// Number of steps evaluated
    pub n_steps: u64,
    /// Number of steps that committed an update
    pub n_updates: u64,
    /// Sum of squared position errors (for RMSE)
    pub sum_sq_pos_err: f64,
    /// Sum of squared velocity errors (for RMSE)
    pub sum_sq_vel_err: f64,
    /// Sum of squared observation errors (raw sensor quality)
    pub sum_sq_obs_err: f64,
    /// Largest distance between estimate and truth seen so far
    pub max_miss_distance: f64,
}

impl TrackingMetrics {
    /// Root-mean-square position error (2D).
    pub fn rmse_position(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        (self.sum_sq_pos_err / self.n_steps as f64).sqrt()
    }

    /// Root-mean-square velocity error (2D).
    pub fn rmse_velocity(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        (self.sum_sq_vel_err / self.n_steps as f64).sqrt()
    }

    /// Root-mean-square error of the raw observations.
    pub fn rmse_observation(&self) -> f64 {
        if self.n_steps == 0 {
            return 0.0;
        }
        (self.sum_sq_obs_err / self.n_steps as f64).sqrt()
    }

    /// Accumulate one step. Returns the miss distance of this step.
    pub fn accumulate(
        &mut self,
        estimate: &Estimate,
        observation: &Observation,
        true_position: &ObsVec,
        true_velocity: &ObsVec,
        updated: bool,
    ) -> f64 {
        self.n_steps += 1;
        if updated {
            self.n_updates += 1;
        }

        let miss = (estimate.position() - true_position).norm();
        self.sum_sq_pos_err += miss * miss;
        self.sum_sq_vel_err += (estimate.velocity() - true_velocity).norm_squared();
        self.sum_sq_obs_err += (observation.z - true_position).norm_squared();
        self.max_miss_distance = self.max_miss_distance.max(miss);
        miss
    }
}
