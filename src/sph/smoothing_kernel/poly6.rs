use super::kernel::Kernel;
use crate::units::Real;

/// Poly6 smoothing kernel.
///
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
/// Kernel not well suited for computing pressure forces since derivative approaches zero.
#[derive(Copy, Clone, Debug)]
pub struct Poly6 {
    h: Real,
    hsq: Real,
    normalizer: Real,
}

impl Poly6 {
    pub fn new(smoothing_length: Real) -> Poly6 {
        Poly6 {
            h: smoothing_length,
            hsq: smoothing_length * smoothing_length,
            normalizer: 315.0 / (64.0 * std::f64::consts::PI as Real * smoothing_length.powi(9)),
        }
    }
}

impl Kernel for Poly6 {
    #[inline]
    fn smoothing_length(&self) -> Real {
        self.h
    }

    #[inline]
    fn evaluate(&self, r_sq: Real, _r: Real) -> Real {
        if r_sq > self.hsq {
            return 0.0;
        }
        let dsq = self.hsq - r_sq;
        self.normalizer * dsq * dsq * dsq
    }

    #[inline]
    fn derivative(&self, r: Real) -> Real {
        let r_sq = r * r;
        if r_sq > self.hsq {
            return 0.0;
        }
        let dsq = self.hsq - r_sq;
        -6.0 * self.normalizer * r * dsq * dsq
    }

    #[inline]
    fn laplacian(&self, r_sq: Real, _r: Real) -> Real {
        if r_sq > self.hsq {
            return 0.0;
        }
        let dsq = self.hsq - r_sq;
        -6.0 * self.normalizer * dsq * (3.0 * self.hsq - 7.0 * r_sq)
    }
}

generate_kernel_tests!(Poly6);
