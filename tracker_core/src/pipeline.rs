//! Pipeline orchestrator: the full estimation cycle for one simulation step.
//!
//! # Processing steps per time `t`
//! 1. Elapsed time since the last committed update
//! 2. Motion model F(Δt), D(Δt) from the sensor
//! 3. Take a measurement (fused if the sensor is a composite)
//! 4. Predict
//! 5. Update, only if Δt has reached the update threshold
//! 6. Retrodiction over the newest entries, if enabled and an update happened

use crate::{
    kf::{FilterConfig, KalmanFilter},
    model::MeasurementModel,
    types::{Estimate, ObsVec, Observation},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the estimation pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    /// Smooth this many past steps after every update (`None` = off).
    pub retrodiction_steps: Option<usize>,
}

/// Outputs of one pipeline step.
#[derive(Clone, Debug)]
pub struct StepOutput {
    pub time: f64,
    /// Measurement taken at this step (used only if `updated`)
    pub observation: Observation,
    /// Prediction before any correction
    pub prediction: Estimate,
    /// Current estimate after this step: the update result if one was
    /// committed, otherwise the prediction
    pub estimate: Estimate,
    pub updated: bool,
    /// Innovation ν of the update, if any
    pub innovation: Option<ObsVec>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Drives one sensor (possibly a fused composite) and one Kalman filter.
pub struct Pipeline<S> {
    pub config: PipelineConfig,
    pub sensor: S,
    pub kf: KalmanFilter,
    last_step_time: Option<f64>,
}

impl<S: MeasurementModel> Pipeline<S> {
    /// Create a new pipeline.
    pub fn new(config: PipelineConfig, sensor: S) -> Self {
        Self {
            kf: KalmanFilter::new(config.filter),
            config,
            sensor,
            last_step_time: None,
        }
    }

    /// Process simulation step `t`. Steps must be fed in increasing time order.
    pub fn step(&mut self, t: f64) -> StepOutput {
        let dt = self.kf.elapsed(t);
        let f = self.sensor.transition(dt);
        let d = self.sensor.process_noise(dt);
        let observation = self.sensor.measure(t);
        let prediction = self.kf.predict(&f, &d);

        let mut output = StepOutput {
            time: t,
            observation,
            prediction,
            estimate: prediction,
            updated: false,
            innovation: None,
        };

        if self.kf.update_due(t) {
            debug!(
                t,
                dt,
                z_x = observation.z[0],
                z_y = observation.z[1],
                "filtering"
            );
            let h = self.sensor.h();
            let res = self
                .kf
                .update(&observation.z, &observation.cov, &h, &prediction, t);
            output.estimate = res.estimate;
            output.updated = true;
            output.innovation = Some(res.innovation);

            if let (Some(steps), Some(prev)) = (self.config.retrodiction_steps, self.last_step_time) {
                let f_step = self.sensor.transition(t - prev);
                self.kf.retrodiction(&f_step, steps);
            }
        } else {
            trace!(t, dt, "predict only");
        }

        self.last_step_time = Some(t);
        output
    }

    /// Run every time in `times` and collect the outputs.
    pub fn run(&mut self, times: &[f64]) -> Vec<StepOutput> {
        times.iter().map(|&t| self.step(t)).collect()
    }

    /// Smoothed (or filtered) estimates of every processed step so far.
    pub fn trajectory(&self) -> Vec<Estimate> {
        self.kf.history().iter().map(|e| e.current()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
