//! The closed set of sensor kinds a pipeline can be driven by.

use crate::fusion::MergedSensor;
use crate::grid::GridSensor;
use crate::radar::RadarSensor;
use tracker_core::{MeasurementModel, ObsMatrix, Observation, StateCov};

/// Any sensor the tracker knows how to consume.
#[derive(Debug)]
pub enum Sensor {
    Grid(GridSensor),
    Radar(RadarSensor),
    Merged(MergedSensor),
}

impl Sensor {
    pub fn kind(&self) -> &'static str {
        match self {
            Sensor::Grid(_) => "grid",
            Sensor::Radar(_) => "radar",
            Sensor::Merged(_) => "merged",
        }
    }

    /// Radar positions, for display. Grid sensors have none.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        match self {
            Sensor::Grid(_) => Vec::new(),
            Sensor::Radar(r) => vec![r.position()],
            Sensor::Merged(m) => m.positions(),
        }
    }
}

impl MeasurementModel for Sensor {
    fn h(&self) -> ObsMatrix {
        match self {
            Sensor::Grid(s) => s.h(),
            Sensor::Radar(s) => s.h(),
            Sensor::Merged(s) => s.h(),
        }
    }

    fn transition(&self, dt: f64) -> StateCov {
        match self {
            Sensor::Grid(s) => s.transition(dt),
            Sensor::Radar(s) => s.transition(dt),
            Sensor::Merged(s) => s.transition(dt),
        }
    }

    fn process_noise(&self, dt: f64) -> StateCov {
        match self {
            Sensor::Grid(s) => s.process_noise(dt),
            Sensor::Radar(s) => s.process_noise(dt),
            Sensor::Merged(s) => s.process_noise(dt),
        }
    }

    fn measure(&mut self, t: f64) -> Observation {
        match self {
            Sensor::Grid(s) => s.measure(t),
            Sensor::Radar(s) => s.measure(t),
            Sensor::Merged(s) => s.measure(t),
        }
    }
}

impl From<GridSensor> for Sensor {
    fn from(s: GridSensor) -> Self {
        Sensor::Grid(s)
    }
}

impl From<RadarSensor> for Sensor {
    fn from(s: RadarSensor) -> Self {
        Sensor::Radar(s)
    }
}

impl From<MergedSensor> for Sensor {
    fn from(s: MergedSensor) -> Self {
        Sensor::Merged(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::ZeroNoise;
    use crate::truth::{Stationary, Trajectory};
    use std::sync::Arc;
    use tracker_core::{position_selector, MotionModel};

    #[test]
    fn delegates_to_inner_sensor() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(30.0, 40.0));
        let mut grid: Sensor = GridSensor::new(truth.clone(), 0.0, Box::new(ZeroNoise)).unwrap().into();
        let mut radar: Sensor = RadarSensor::new(truth, [0.0, 0.0], 0.0, 0.0, Box::new(ZeroNoise))
            .unwrap()
            .into();

        assert_eq!(grid.kind(), "grid");
        assert_eq!(radar.kind(), "radar");
        assert_eq!(grid.h(), position_selector());
        assert_eq!(radar.transition(2.0), MotionModel::transition_matrix(2.0));
        assert_eq!(grid.measure(0.0).z, radar.measure(0.0).z);
        assert!(grid.positions().is_empty());
        assert_eq!(radar.positions(), vec![[0.0, 0.0]]);
    }
}
