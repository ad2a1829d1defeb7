//! Fundamental types used across the entire workspace.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scalar type: use f64 throughout for numerical precision in Kalman filter.
// ---------------------------------------------------------------------------

/// 4-DOF state vector: [x, y, vx, vy]
pub type StateVec = Vector4<f64>;

/// 4×4 state covariance matrix
pub type StateCov = Matrix4<f64>;

/// 2D observation vector [x, y] in the Cartesian world frame
pub type ObsVec = Vector2<f64>;

/// 2×2 observation covariance
pub type ObsCov = Matrix2<f64>;

/// 2×4 observation matrix H mapping the state onto the observed subspace
pub type ObsMatrix = Matrix2x4<f64>;

/// Observation matrix selecting [x, y] from [x, y, vx, vy].
pub fn position_selector() -> ObsMatrix {
    ObsMatrix::new(
        1., 0., 0., 0., //
        0., 1., 0., 0.,
    )
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

/// A state estimate together with its uncertainty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    pub state: StateVec,
    pub cov: StateCov,
}

impl Estimate {
    pub fn new(state: StateVec, cov: StateCov) -> Self {
        Self { state, cov }
    }

    /// Returns 2D [x, y] position
    pub fn position(&self) -> ObsVec {
        ObsVec::new(self.state[0], self.state[1])
    }

    /// Returns 2D [vx, vy] velocity
    pub fn velocity(&self) -> ObsVec {
        ObsVec::new(self.state[2], self.state[3])
    }

    /// 2×2 position block of the covariance.
    pub fn position_cov(&self) -> ObsCov {
        self.cov.fixed_view::<2, 2>(0, 0).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// A single observation: a point in the estimation frame and its covariance R.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Observed [x, y]
    pub z: ObsVec,
    /// Measurement noise covariance R (Cartesian frame)
    pub cov: ObsCov,
}

impl Observation {
    pub fn new(z: ObsVec, cov: ObsCov) -> Self {
        Self { z, cov }
    }
}

// ---------------------------------------------------------------------------
// Serializable snapshots (run logs carry plain arrays, not nalgebra types)
// ---------------------------------------------------------------------------

/// Plain-array copy of an [`Estimate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimateSnapshot {
    pub state: [f64; 4],
    /// Row-major 4×4 covariance
    pub cov: [f64; 16],
}

impl From<&Estimate> for EstimateSnapshot {
    fn from(e: &Estimate) -> Self {
        let mut cov = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                cov[r * 4 + c] = e.cov[(r, c)];
            }
        }
        Self {
            state: [e.state[0], e.state[1], e.state[2], e.state[3]],
            cov,
        }
    }
}

impl From<&EstimateSnapshot> for Estimate {
    fn from(s: &EstimateSnapshot) -> Self {
        Estimate {
            state: StateVec::from_column_slice(&s.state),
            cov: StateCov::from_row_slice(&s.cov),
        }
    }
}

/// Plain-array copy of an [`Observation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    pub z: [f64; 2],
    /// Row-major 2×2 covariance
    pub cov: [f64; 4],
}

impl From<&Observation> for ObservationSnapshot {
    fn from(o: &Observation) -> Self {
        Self {
            z: [o.z[0], o.z[1]],
            cov: [o.cov[(0, 0)], o.cov[(0, 1)], o.cov[(1, 0)], o.cov[(1, 1)]],
        }
    }
}

impl From<&ObservationSnapshot> for Observation {
    fn from(s: &ObservationSnapshot) -> Self {
        Observation {
            z: ObsVec::from_column_slice(&s.z),
            cov: ObsCov::from_row_slice(&s.cov),
        }
    }
}
