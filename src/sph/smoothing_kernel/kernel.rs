use crate::units::{Real, Vector};
use cgmath::Zero;

/// SPH smoothing kernel
///
/// Only radially symmetric kernels are supported.
/// All kernels have compact support within the smoothing length, i.e. for |r|>h every function returns 0.
pub trait Kernel {
    const DIVISION_EPSILON: Real = 1.0e-10;

    /// Radius of the kernel support, typically expressed as 'h'.
    fn smoothing_length(&self) -> Real;

    /// Evaluates the kernel function for a given distance.
    /// `r_sq`:     Squared length of ri_to_rj
    /// `r`:        Length of ri_to_rj
    fn evaluate(&self, r_sq: Real, r: Real) -> Real;

    /// First derivative of the kernel with respect to distance, dW/dr.
    fn derivative(&self, r: Real) -> Real;

    /// Evaluates the gradient of the kernel with respect to the position of particle i.
    /// `rj_to_ri`: Vector from a position j to a position i, so ri - rj. Not normalized!
    /// `r_sq`:     Squared length of rj_to_ri
    /// `r`:        Length of rj_to_ri
    ///
    /// Direction is undefined for coincident positions, in which case the zero vector is returned.
    #[inline]
    fn gradient(&self, rj_to_ri: Vector, _r_sq: Real, r: Real) -> Vector {
        if r < Self::DIVISION_EPSILON || r > self.smoothing_length() {
            return Vector::zero();
        }
        rj_to_ri * (self.derivative(r) / r)
    }

    /// Evaluates the laplacian of the kernel.
    /// `r_sq`:     Squared length of ri_to_rj
    /// `r`:        Length of ri_to_rj
    fn laplacian(&self, r_sq: Real, r: Real) -> Real;
}
