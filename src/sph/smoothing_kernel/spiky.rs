use super::kernel::Kernel;
use crate::units::Real;

/// Debrun's "Spiky" smoothing kernel.
///
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
/// Kernel well suited for pressure since its gradient doesn't vanish at the center.
#[derive(Copy, Clone, Debug)]
pub struct Spiky {
    h: Real,
    normalizer: Real,
}

impl Spiky {
    const MIN_LAPLACIAN_DISTANCE: Real = 0.0000001;

    pub fn new(smoothing_length: Real) -> Spiky {
        Spiky {
            h: smoothing_length,
            normalizer: 15.0 / (std::f64::consts::PI as Real * smoothing_length.powi(6)),
        }
    }
}

impl Kernel for Spiky {
    #[inline]
    fn smoothing_length(&self) -> Real {
        self.h
    }

    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        if r > self.h {
            return 0.0;
        }
        let hsubr = self.h - r;
        self.normalizer * hsubr * hsubr * hsubr
    }

    #[inline]
    fn derivative(&self, r: Real) -> Real {
        if r > self.h {
            return 0.0;
        }
        let hsubr = self.h - r;
        -3.0 * self.normalizer * hsubr * hsubr
    }

    // Singular at the center, distance is clamped.
    #[inline]
    fn laplacian(&self, _r_sq: Real, r: Real) -> Real {
        if r > self.h {
            return 0.0;
        }
        let r = r.max(Self::MIN_LAPLACIAN_DISTANCE);
        let hsubr = self.h - r;
        6.0 * self.normalizer * hsubr * (2.0 * r - self.h) / r
    }
}

generate_kernel_tests!(Spiky);
