use super::kernel::Kernel;
use crate::units::Real;

/// Cubic Spline smoothing kernel.
///
/// Classic cubic spline kernel from "J. Monaghan, Smoothed Particle Hydrodynamics, “Annual Review of Astronomy and Astrophysics”, 30 (1992), pp. 543-574."
/// Uses the 3D normalization 8/(πh³) for a support radius of h (instead of 2h as in the paper).
#[derive(Copy, Clone, Debug)]
pub struct CubicSpline {
    h: Real,
    h_inv: Real,
    normalizer: Real,
}

impl CubicSpline {
    pub fn new(smoothing_length: Real) -> CubicSpline {
        CubicSpline {
            h: smoothing_length,
            h_inv: 1.0 / smoothing_length,
            normalizer: 8.0 / (std::f64::consts::PI as Real * smoothing_length.powi(3)),
        }
    }
}

impl Kernel for CubicSpline {
    #[inline]
    fn smoothing_length(&self) -> Real {
        self.h
    }

    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        let q = r * self.h_inv;
        if q <= 0.5 {
            self.normalizer * (1.0 + (q * q * q - q * q) * 6.0)
        } else if q <= 1.0 {
            self.normalizer * (1.0 - q).powi(3) * 2.0
        } else {
            0.0
        }
    }

    #[inline]
    fn derivative(&self, r: Real) -> Real {
        let q = r * self.h_inv;
        if q <= 0.5 {
            self.normalizer * self.h_inv * (q * q * 3.0 - q * 2.0) * 6.0
        } else if q <= 1.0 {
            -self.normalizer * self.h_inv * (1.0 - q).powi(2) * 6.0
        } else {
            0.0
        }
    }

    // ∇²W = W'' + 2/r W'
    #[inline]
    fn laplacian(&self, _r_sq: Real, r: Real) -> Real {
        let q = r * self.h_inv;
        let factor = self.normalizer * self.h_inv * self.h_inv;
        if q <= 0.5 {
            factor * (72.0 * q - 36.0)
        } else if q <= 1.0 {
            factor * 12.0 * (1.0 - q) * (2.0 * q - 1.0) / q
        } else {
            0.0
        }
    }
}

generate_kernel_tests!(CubicSpline);
