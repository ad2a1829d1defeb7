//! Small linear-algebra helpers shared by the filter, the smoother and fusion.
//!
//! Covariances produced by sensors may legitimately be singular (a radar with
//! zero azimuth noise, a noiseless grid sensor), so every inversion here falls
//! back to the SVD pseudo-inverse instead of failing.

use crate::types::{ObsCov, StateCov};

/// Singular values below this are treated as zero by the pseudo-inverse.
pub const PINV_EPS: f64 = 1e-10;

/// Negative eigenvalues smaller than this fraction of the spectral radius are
/// rounding noise and left alone.
pub const PSD_REL_TOL: f64 = 1e-12;

/// Invert a 2×2 covariance, falling back to the pseudo-inverse when singular.
pub fn inverse_or_pinv2(m: &ObsCov) -> ObsCov {
    m.try_inverse().unwrap_or_else(|| {
        // pseudo_inverse only errs when U or V were not computed
        m.svd(true, true)
            .pseudo_inverse(PINV_EPS)
            .unwrap_or_else(|_| ObsCov::zeros())
    })
}

/// Invert a 4×4 covariance, falling back to the pseudo-inverse when singular.
pub fn inverse_or_pinv4(m: &StateCov) -> StateCov {
    m.try_inverse().unwrap_or_else(|| {
        m.svd(true, true)
            .pseudo_inverse(PINV_EPS)
            .unwrap_or_else(|_| StateCov::zeros())
    })
}

/// Symmetrise `p` and clamp any negative eigenvalue to zero.
///
/// The matrix is only rebuilt from its eigen-decomposition when the symmetric
/// part has a clearly negative eigenvalue, so exact results (e.g. a zero
/// position block after a noiseless update) pass through untouched.
pub fn enforce_psd(p: &StateCov) -> StateCov {
    let sym = (p + p.transpose()) * 0.5;
    let eig = sym.symmetric_eigen();
    let scale = eig.eigenvalues.amax().max(f64::MIN_POSITIVE);
    if eig.eigenvalues.min() >= -PSD_REL_TOL * scale {
        return sym;
    }
    let clamped = eig.eigenvalues.map(|l| l.max(0.0));
    let v = &eig.eigenvectors;
    let repaired = v * StateCov::from_diagonal(&clamped) * v.transpose();
    (repaired + repaired.transpose()) * 0.5
}

/// Smallest eigenvalue of the symmetric part of a 4×4 matrix.
pub fn min_eigenvalue4(p: &StateCov) -> f64 {
    let sym = (p + p.transpose()) * 0.5;
    sym.symmetric_eigen().eigenvalues.min()
}

/// Smallest eigenvalue of the symmetric part of a 2×2 matrix.
pub fn min_eigenvalue2(p: &ObsCov) -> f64 {
    let sym = (p + p.transpose()) * 0.5;
    sym.symmetric_eigen().eigenvalues.min()
}
