//! `sim` — Scenario simulator: figure-eight ground truth, sensor layouts, batch runs, run logs.

pub mod error;
pub mod replay;
pub mod runner;
pub mod scenarios;
pub mod trajectory;

pub use error::ConfigError;
pub use replay::{load_run_log, save_run_log, Frame, RunLog};
pub use runner::{run, MetricsSummary, RunReport};
pub use scenarios::{Scenario, ScenarioKind, SensorSettings};
pub use trajectory::FigureEight;
