use crate::units::Real;

/// Viscosity smoothing kernel.
///
/// Only the laplacian is needed for viscous forces, as in Müller et al.'s viscosity kernel
/// ("Particle-Based Fluid Simulation for Interactive Applications"): 45/(2πh⁶) (h - r).
#[derive(Copy, Clone, Debug)]
pub struct Viscosity {
    h: Real,
    normalizer_laplacian: Real,
}

impl Viscosity {
    pub fn new(smoothing_length: Real) -> Viscosity {
        Viscosity {
            h: smoothing_length,
            normalizer_laplacian: 45.0 / (2.0 * std::f64::consts::PI as Real * smoothing_length.powi(6)),
        }
    }

    pub fn smoothing_length(&self) -> Real {
        self.h
    }

    #[inline]
    pub fn laplacian(&self, r: Real) -> Real {
        if r > self.h {
            0.0
        } else {
            self.normalizer_laplacian * (self.h - r)
        }
    }
}
