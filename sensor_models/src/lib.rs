//! `sensor_models` — Grid, radar and merged sensors feeding the tracker.
//!
//! # Module layout
//! - [`truth`]       — Ground-truth trajectory trait
//! - [`noise`]       — Injectable Gaussian / fixed / zero noise sources
//! - [`observation`] — Polar geometry and the polar→cartesian linearisation
//! - [`grid`]        — Direct position sensor
//! - [`radar`]       — Range/azimuth sensor reported in cartesian form
//! - [`fusion`]      — Information-weighted merge of simultaneous sensors
//! - [`sensor`]      — Closed enum over all sensor kinds

pub mod error;
pub mod fusion;
pub mod grid;
pub mod noise;
pub mod observation;
pub mod radar;
pub mod sensor;
pub mod truth;

pub use error::SensorError;
pub use fusion::{fuse, MergedSensor};
pub use grid::{GridConfig, GridSensor};
pub use noise::{FixedNoise, GaussianNoise, NoiseSource, ZeroNoise};
pub use radar::{RadarConfig, RadarSensor};
pub use sensor::Sensor;
pub use truth::{Stationary, Trajectory};
