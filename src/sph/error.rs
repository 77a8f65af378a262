use crate::units::Real;

/// Rejected configuration.
///
/// Numerical trouble during a step (coincident particles, near zero densities) is compensated locally and never reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SphError {
    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: Real,
    },
    #[error("{name} must be finite, got {value:?}")]
    NonFiniteVector { name: &'static str, value: [Real; 3] },
}
