//! `tracker_core` — Core single-target estimation algorithms.
//!
//! # Module layout
//! - [`types`]    — State, covariance and observation types
//! - [`linalg`]   — Pseudo-inverse fallback and PSD repair
//! - [`model`]    — Constant-velocity motion model and the sensor capability trait
//! - [`kf`]       — Kalman filter (predict / gated update / retrodiction)
//! - [`pipeline`] — Per-step orchestration of sensor and filter
//! - [`metrics`]  — RMSE and miss distance

pub mod kf;
pub mod linalg;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod types;

pub use kf::{FilterConfig, HistoryEntry, KalmanFilter, KfUpdateResult};
pub use model::{MeasurementModel, MotionModel};
pub use pipeline::{Pipeline, PipelineConfig, StepOutput};
pub use types::{
    position_selector, Estimate, ObsCov, ObsMatrix, ObsVec, Observation, StateCov, StateVec,
};
