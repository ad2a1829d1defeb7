//! Configuration errors raised when a sensor is constructed.

use thiserror::Error;

/// Sensor construction errors. These are contract violations caught up
/// front; numerical degeneracies at run time are never reported this way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("invalid {name} standard deviation {value}: must be finite and non-negative")]
    InvalidNoise { name: &'static str, value: f64 },

    #[error("invalid process noise density {0}: must be finite and non-negative")]
    InvalidProcessNoise(f64),

    #[error("invalid sensor position ({0}, {1}): must be finite")]
    InvalidPosition(f64, f64),

    #[error("fusion needs at least one sensor")]
    EmptyFusion,
}

pub type Result<T> = std::result::Result<T, SensorError>;

/// Reject negative or non-finite noise standard deviations.
pub(crate) fn check_sigma(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SensorError::InvalidNoise { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigma_validation() {
        assert_eq!(check_sigma("grid", 0.0), Ok(0.0));
        assert_eq!(check_sigma("grid", 3.5), Ok(3.5));
        assert!(matches!(
            check_sigma("range", -1.0),
            Err(SensorError::InvalidNoise { name: "range", .. })
        ));
        assert!(check_sigma("azimuth", f64::NAN).is_err());
        assert!(check_sigma("azimuth", f64::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = SensorError::InvalidNoise {
            name: "range",
            value: -2.0,
        };
        assert!(err.to_string().contains("range"));
    }
}
