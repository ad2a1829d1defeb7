//! Kalman filter: predict, gated update and retrodiction.
//!
//! # Design choices
//! - A **linear KF** over [x, y, vx, vy] with the constant-velocity model from
//!   [`crate::model`]. Sensors hand over F, D, H and R; the filter never builds
//!   them itself.
//! - All math is done in `f64` via fixed-size `nalgebra` matrices, so shape
//!   errors cannot reach run time.
//! - Singular innovation or prediction covariances are inverted with the
//!   pseudo-inverse.
//!
//! ## History
//! Every processed step appends one [`HistoryEntry`]. `update` rewrites the
//! newest entry, `retrodiction` rewrites older entries by index. Neither ever
//! changes the length of the history.

use crate::linalg::{enforce_psd, inverse_or_pinv2, inverse_or_pinv4};
use crate::types::{Estimate, ObsCov, ObsMatrix, ObsVec, StateCov, StateVec};
use nalgebra::Matrix4x2;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Minimum elapsed time between two committed updates.
pub const DEFAULT_UPDATE_THRESHOLD: f64 = 5.0;

/// Diagonal of the initial covariance (very uncertain prior at the origin).
pub const DEFAULT_INITIAL_VARIANCE: f64 = 500.0;

/// Configuration for the Kalman filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Prior variance on every state component.
    pub initial_variance: f64,
    /// Updates only happen once this much time has passed since the last one.
    pub update_threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            initial_variance: DEFAULT_INITIAL_VARIANCE,
            update_threshold: DEFAULT_UPDATE_THRESHOLD,
        }
    }
}

/// One processed step in the filter history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Prediction computed for this step, before any correction.
    pub predicted: Estimate,
    /// Prediction, or the corrected pair if this step was updated.
    pub filtered: Estimate,
    /// Set by retrodiction.
    pub smoothed: Option<Estimate>,
    /// True if an update was committed at this step.
    pub updated: bool,
}

impl HistoryEntry {
    fn from_prediction(estimate: Estimate) -> Self {
        Self {
            predicted: estimate,
            filtered: estimate,
            smoothed: None,
            updated: false,
        }
    }

    /// Best available estimate for this step.
    pub fn current(&self) -> Estimate {
        self.smoothed.unwrap_or(self.filtered)
    }
}

/// Result of a KF update step, exposed for diagnostics.
#[derive(Clone, Debug)]
pub struct KfUpdateResult {
    pub estimate: Estimate,
    /// Innovation ν = z − H·x
    pub innovation: ObsVec,
    /// Innovation covariance S = H·P·Hᵀ + R
    pub innovation_cov: ObsCov,
    /// Kalman gain K
    pub kalman_gain: Matrix4x2<f64>,
}

/// Single-target linear Kalman filter with an append-only history.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    pub config: FilterConfig,
    prev_estimate: StateVec,
    prev_covariance: StateCov,
    prev_time: f64,
    history: Vec<HistoryEntry>,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl KalmanFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            prev_estimate: StateVec::zeros(),
            prev_covariance: StateCov::identity() * config.initial_variance,
            prev_time: 0.0,
            history: Vec::new(),
        }
    }

    /// Drop all history and go back to the prior.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Last committed (state, covariance).
    pub fn estimate(&self) -> Estimate {
        Estimate::new(self.prev_estimate, self.prev_covariance)
    }

    /// Time of the last committed update.
    pub fn prev_time(&self) -> f64 {
        self.prev_time
    }

    /// Time elapsed between the last committed update and `t`.
    pub fn elapsed(&self, t: f64) -> f64 {
        t - self.prev_time
    }

    /// True if enough time has passed since the last update to correct at `t`.
    pub fn update_due(&self, t: f64) -> bool {
        self.elapsed(t) >= self.config.update_threshold
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Predict from the committed state: x = F·x, P = F·P·Fᵀ + D.
    ///
    /// The committed state is left alone; the prediction is appended to the
    /// history.
    pub fn predict(&mut self, f: &StateCov, d: &StateCov) -> Estimate {
        let state = f * self.prev_estimate;
        let cov = enforce_psd(&(f * self.prev_covariance * f.transpose() + d));
        let estimate = Estimate::new(state, cov);
        self.history.push(HistoryEntry::from_prediction(estimate));
        estimate
    }

    /// Correct `prediction` with observation `z` (noise `r`, matrix `h`) and
    /// commit the result as the state at time `t`.
    pub fn update(
        &mut self,
        z: &ObsVec,
        r: &ObsCov,
        h: &ObsMatrix,
        prediction: &Estimate,
        t: f64,
    ) -> KfUpdateResult {
        let x = prediction.state;
        let p = prediction.cov;

        // Innovation: ν = z − H·x
        let innovation = z - h * x;

        // Innovation covariance: S = H·P·Hᵀ + R
        let s = h * p * h.transpose() + r;

        // Kalman gain: K = P·Hᵀ·S⁻¹
        let k = p * h.transpose() * inverse_or_pinv2(&s);

        // Updated state: x' = x + K·ν
        let new_state = x + k * innovation;

        // Updated covariance: Joseph form P' = (I−KH)·P·(I−KH)ᵀ + K·R·Kᵀ
        let i_kh = StateCov::identity() - k * h;
        let new_cov = enforce_psd(&(i_kh * p * i_kh.transpose() + k * r * k.transpose()));

        self.prev_estimate = new_state;
        self.prev_covariance = new_cov;
        self.prev_time = t;

        let estimate = Estimate::new(new_state, new_cov);
        match self.history.last_mut() {
            Some(entry) => {
                entry.filtered = estimate;
                entry.smoothed = None;
                entry.updated = true;
            }
            None => self.history.push(HistoryEntry {
                predicted: *prediction,
                filtered: estimate,
                smoothed: None,
                updated: true,
            }),
        }

        KfUpdateResult {
            estimate,
            innovation,
            innovation_cov: s,
            kalman_gain: k,
        }
    }

    /// Fixed-interval (Rauch–Tung–Striebel) smoothing over the newest
    /// `steps + 1` history entries, with `f` the transition between two
    /// consecutive entries.
    ///
    /// Entry `l` is revised from its filtered pair, the prediction stored with
    /// entry `l + 1`, and the already-revised pair at `l + 1`:
    /// G = P_l·Fᵀ·P⁺_{l+1|l}, x_l += G(x_{l+1} − x_{l+1|l}),
    /// P_l += G(P_{l+1} − P_{l+1|l})Gᵀ.
    ///
    /// Too short a history is not an error: nothing happens.
    pub fn retrodiction(&mut self, f: &StateCov, steps: usize) {
        let len = self.history.len();
        if steps == 0 || len < steps + 1 {
            trace!(len, steps, "retrodiction skipped: not enough history");
            return;
        }

        let first = len - 1 - steps;
        for l in (first..len - 1).rev() {
            let next = self.history[l + 1];
            let later = next.current();
            let pred = next.predicted;
            let filtered = self.history[l].filtered;

            let g = filtered.cov * f.transpose() * inverse_or_pinv4(&pred.cov);
            let state = filtered.state + g * (later.state - pred.state);
            let cov = enforce_psd(&(filtered.cov + g * (later.cov - pred.cov) * g.transpose()));

            self.history[l].smoothed = Some(Estimate::new(state, cov));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
