//! Fusion of simultaneous position observations.
//!
//! For regular covariances this is the information form
//! R = (Σ R_i⁻¹)⁻¹, z = R · Σ R_i⁻¹ z_i.
//! It is evaluated as a sequential fold in covariance form,
//!
//! ```text
//! W = (R_a + R_b)⁺
//! z = z_a + R_a·W·(z_b − z_a)
//! R = R_a − R_a·W·R_a
//! ```
//!
//! which stays valid when a child is exact along some axis (a zero-σ grid, a
//! radar with σ_φ = 0): the exact child pins that axis instead of dropping out.

use crate::error::{Result, SensorError};
use crate::sensor::Sensor;
use rayon::prelude::*;
use tracing::trace;
use tracker_core::linalg::inverse_or_pinv2;
use tracker_core::{
    position_selector, MeasurementModel, MotionModel, ObsCov, ObsMatrix, ObsVec, Observation, StateCov,
};

/// Fuse observations of the same position taken at the same instant.
pub fn fuse(observations: &[Observation]) -> Result<Observation> {
    observations
        .iter()
        .copied()
        .reduce(combine)
        .ok_or(SensorError::EmptyFusion)
}

/// Combine two independent observations of the same position.
fn combine(a: Observation, b: Observation) -> Observation {
    let w = inverse_or_pinv2(&(a.cov + b.cov));
    let gain = a.cov * w;
    let z = a.z + gain * (b.z - a.z);
    let cov = a.cov - gain * a.cov;
    Observation::new(z, (cov + cov.transpose()) * 0.5)
}

/// A virtual sensor reporting the fused observation of its children.
#[derive(Debug)]
pub struct MergedSensor {
    children: Vec<Sensor>,
    motion: MotionModel,
}

impl MergedSensor {
    pub fn new(children: Vec<Sensor>) -> Result<Self> {
        if children.is_empty() {
            return Err(SensorError::EmptyFusion);
        }
        Ok(Self {
            children,
            motion: MotionModel::default(),
        })
    }

    pub fn with_motion(mut self, motion: MotionModel) -> Result<Self> {
        if !(motion.psd.is_finite() && motion.psd >= 0.0) {
            return Err(SensorError::InvalidProcessNoise(motion.psd));
        }
        self.motion = motion;
        Ok(self)
    }

    pub fn children(&self) -> &[Sensor] {
        &self.children
    }

    /// Positions of every radar below this sensor.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.children.iter().flat_map(Sensor::positions).collect()
    }

    /// Measure every child at `t`, in child order.
    pub fn measure_children(&mut self, t: f64) -> Vec<Observation> {
        // each child owns its noise source, so the parallel result is identical
        // to measuring them one after another
        self.children.par_iter_mut().map(|s| s.measure(t)).collect()
    }
}

impl MeasurementModel for MergedSensor {
    fn h(&self) -> ObsMatrix {
        position_selector()
    }

    fn process_noise(&self, dt: f64) -> StateCov {
        self.motion.process_noise(dt)
    }

    fn measure(&mut self, t: f64) -> Observation {
        let observations = self.measure_children(t);
        trace!(t, n = observations.len(), "fusing observations");
        // `new` rejects an empty child list
        observations
            .into_iter()
            .reduce(combine)
            .unwrap_or_else(|| Observation::new(ObsVec::zeros(), ObsCov::zeros()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSensor;
    use crate::noise::{GaussianNoise, ZeroNoise};
    use crate::radar::RadarSensor;
    use crate::truth::{Stationary, Trajectory};
    use approx::assert_abs_diff_eq;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;
    use tracker_core::linalg::min_eigenvalue2;

    fn random_cov(rng: &mut ChaCha8Rng) -> ObsCov {
        let a = ObsCov::from_fn(|_, _| rng.gen_range(-10.0..10.0));
        a * a.transpose() + ObsCov::identity() * 0.1
    }

    #[test]
    fn fused_covariance_is_dominated() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let n = rng.gen_range(1..5);
            let obs: Vec<Observation> = (0..n)
                .map(|_| {
                    let z = ObsVec::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
                    Observation::new(z, random_cov(&mut rng))
                })
                .collect();
            let fused = fuse(&obs).unwrap();
            for o in &obs {
                let gap = o.cov - fused.cov;
                assert!(min_eigenvalue2(&gap) >= -1e-6 * o.cov.norm());
            }
        }
    }

    #[test]
    fn single_observation_passes_through() {
        let obs = Observation::new(ObsVec::new(3.0, 4.0), ObsCov::new(4.0, 1.0, 1.0, 9.0));
        let fused = fuse(std::slice::from_ref(&obs)).unwrap();
        assert_abs_diff_eq!(fused.z, obs.z, epsilon = 1e-9);
        assert_abs_diff_eq!(fused.cov, obs.cov, epsilon = 1e-9);
    }

    #[test]
    fn equal_weights_average() {
        let cov = ObsCov::identity() * 100.0;
        let obs = [
            Observation::new(ObsVec::new(0.0, 10.0), cov),
            Observation::new(ObsVec::new(20.0, -10.0), cov),
        ];
        let fused = fuse(&obs).unwrap();
        assert_abs_diff_eq!(fused.z, ObsVec::new(10.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(fused.cov, ObsCov::identity() * 50.0, epsilon = 1e-9);
    }

    #[test]
    fn singular_children_pin_their_exact_axis() {
        // zero variance means exact: the first child knows y, the second knows x
        let obs = [
            Observation::new(ObsVec::new(999.0, 7.0), ObsCov::new(400.0, 0.0, 0.0, 0.0)),
            Observation::new(ObsVec::new(5.0, -999.0), ObsCov::new(0.0, 0.0, 0.0, 400.0)),
        ];
        let fused = fuse(&obs).unwrap();
        assert_abs_diff_eq!(fused.z, ObsVec::new(5.0, 7.0), epsilon = 1e-9);
        assert_abs_diff_eq!(fused.cov, ObsCov::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn exact_child_wins_in_either_order() {
        let exact = Observation::new(ObsVec::new(10.0, 0.0), ObsCov::zeros());
        let noisy = Observation::new(ObsVec::new(40.0, -25.0), ObsCov::new(400.0, 30.0, 30.0, 100.0));
        for obs in [[exact, noisy], [noisy, exact]] {
            let fused = fuse(&obs).unwrap();
            assert_abs_diff_eq!(fused.z, exact.z, epsilon = 1e-9);
            assert_abs_diff_eq!(fused.cov, ObsCov::zeros(), epsilon = 1e-9);
        }
    }

    #[test]
    fn merged_exact_grid_reports_truth() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(10.0, 0.0));
        let grid = GridSensor::new(truth, 0.0, Box::new(ZeroNoise)).unwrap();
        let mut merged = MergedSensor::new(vec![grid.into()]).unwrap();
        let obs = merged.measure(0.0);
        assert_abs_diff_eq!(obs.z, ObsVec::new(10.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(obs.cov, ObsCov::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn merged_radar_without_azimuth_noise_reports_truth() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(1000.0, 500.0));
        let radar = RadarSensor::new(truth.clone(), [6000.0, 0.0], 20.0, 0.0, Box::new(ZeroNoise)).unwrap();
        let mut merged = MergedSensor::new(vec![radar.into()]).unwrap();
        let obs = merged.measure(0.0);
        assert_abs_diff_eq!(obs.z, ObsVec::new(1000.0, 500.0), epsilon = 1e-9);

        // paired with a noisy grid, the radar still pins its cross-range axis
        let radar = RadarSensor::new(truth.clone(), [6000.0, 0.0], 20.0, 0.0, Box::new(ZeroNoise)).unwrap();
        let grid = GridSensor::new(truth, 100.0, Box::new(ZeroNoise)).unwrap();
        let mut merged = MergedSensor::new(vec![radar.into(), grid.into()]).unwrap();
        let obs = merged.measure(0.0);
        assert_abs_diff_eq!(obs.z, ObsVec::new(1000.0, 500.0), epsilon = 1e-9);
        assert!(obs.cov.determinant().abs() < 1e-6);
    }

    #[test]
    fn empty_fusion_is_an_error() {
        assert_eq!(fuse(&[]).unwrap_err(), SensorError::EmptyFusion);
        assert_eq!(MergedSensor::new(Vec::new()).unwrap_err(), SensorError::EmptyFusion);
    }

    #[test]
    fn merged_sensor_is_reproducible() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(1000.0, 500.0));
        let build = || {
            let children: Vec<Sensor> = [(6000.0, 0.0), (-6000.0, 0.0), (0.0, 5000.0)]
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    RadarSensor::new(truth.clone(), [x, y], 20.0, 0.01, Box::new(GaussianNoise::new(i as u64)))
                        .unwrap()
                        .into()
                })
                .collect();
            MergedSensor::new(children).unwrap()
        };
        let (mut a, mut b) = (build(), build());
        for t in 0..20 {
            let (oa, ob) = (a.measure(t as f64), b.measure(t as f64));
            assert_eq!(oa.z, ob.z);
            assert_eq!(oa.cov, ob.cov);
        }
    }

    #[test]
    fn merged_radars_beat_each_radar() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(1000.0, 500.0));
        let positions = [[6000.0, 0.0], [-6000.0, 0.0], [0.0, 5000.0], [0.0, -5000.0]];
        let children: Vec<Sensor> = positions
            .iter()
            .map(|&p| {
                RadarSensor::new(truth.clone(), p, 20.0, 10f64.to_radians(), Box::new(ZeroNoise))
                    .unwrap()
                    .into()
            })
            .collect();
        let mut merged = MergedSensor::new(children).unwrap();
        assert_eq!(merged.positions(), positions.to_vec());

        let singles = merged.measure_children(0.0);
        let fused = merged.measure(0.0);
        assert_abs_diff_eq!(fused.z, ObsVec::new(1000.0, 500.0), epsilon = 1e-9);
        for o in &singles {
            assert!(fused.cov.trace() < o.cov.trace());
        }
    }

    #[test]
    fn grid_and_radar_mix() {
        let truth: Arc<dyn Trajectory> = Arc::new(Stationary::new(0.0, 0.0));
        let children = vec![
            Sensor::from(GridSensor::new(truth.clone(), 100.0, Box::new(ZeroNoise)).unwrap()),
            Sensor::from(RadarSensor::new(truth, [1000.0, 0.0], 20.0, 0.01, Box::new(ZeroNoise)).unwrap()),
        ];
        let mut merged = MergedSensor::new(children).unwrap();
        assert_eq!(merged.positions(), vec![[1000.0, 0.0]]);
        let fused = merged.measure(1.0);
        // radar range axis is x (400 vs grid 10000), cross-range 100 vs 10000
        assert_abs_diff_eq!(fused.cov[(0, 0)], 1.0 / (1.0 / 400.0 + 1.0 / 10000.0), epsilon = 1e-6);
        assert_abs_diff_eq!(fused.cov[(1, 1)], 1.0 / (1.0 / 100.0 + 1.0 / 10000.0), epsilon = 1e-6);
    }
}
