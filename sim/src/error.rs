//! Run configuration errors.

use sensor_models::SensorError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid trajectory: {0}")]
    InvalidTrajectory(&'static str),

    #[error("update threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),

    #[error("initial variance must be finite and positive, got {0}")]
    InvalidInitialVariance(f64),

    #[error(transparent)]
    Sensor(#[from] SensorError),
}
