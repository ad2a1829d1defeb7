//! Polar ↔ cartesian conversion and the local linearisation of a polar
//! measurement around a point.
//!
//! # Azimuth convention
//! φ = atan2(Δy, Δx) ∈ (−π, π], measured counter-clockwise from +x. The only
//! discontinuity is the wrap across the negative x-axis. A point exactly on the
//! sensor has φ = 0.

use nalgebra::{Matrix2, Vector2};

/// Convert a world point to [range, azimuth] relative to `origin`.
pub fn to_polar(origin: &Vector2<f64>, point: &Vector2<f64>) -> (f64, f64) {
    let d = point - origin;
    let range = d.norm();
    let azimuth = d.y.atan2(d.x);
    (range, azimuth)
}

/// Convert [range, azimuth] relative to `origin` back to a world point.
pub fn to_cartesian(origin: &Vector2<f64>, range: f64, azimuth: f64) -> Vector2<f64> {
    origin + range * Vector2::new(azimuth.cos(), azimuth.sin())
}

/// Counter-clockwise rotation by `phi`.
pub fn rotation(phi: f64) -> Matrix2<f64> {
    let (s, c) = phi.sin_cos();
    Matrix2::new(c, -s, s, c)
}

/// Stretch of the azimuth axis by the range.
pub fn dilation(range: f64) -> Matrix2<f64> {
    Matrix2::new(1.0, 0.0, 0.0, range)
}

/// Jacobian of (r, φ) ↦ (r cos φ, r sin φ): T = Rot(φ)·Diag(1, r).
pub fn polar_jacobian(range: f64, azimuth: f64) -> Matrix2<f64> {
    rotation(azimuth) * dilation(range)
}

/// Polar noise covariance Diag(σ_r², σ_φ²) carried into the cartesian frame:
/// T·Diag(σ_r², σ_φ²)·Tᵀ.
pub fn cartesian_covariance(range: f64, azimuth: f64, sigma_range: f64, sigma_azimuth: f64) -> Matrix2<f64> {
    let t = polar_jacobian(range, azimuth);
    let polar = Matrix2::new(sigma_range * sigma_range, 0.0, 0.0, sigma_azimuth * sigma_azimuth);
    let cov = t * polar * t.transpose();
    (cov + cov.transpose()) * 0.5
}
