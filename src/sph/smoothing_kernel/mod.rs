//! Smoothing Kernels.

// Checks every kernel for the properties the solver relies on: consistency of value and derivative,
// compact support and normalization.
macro_rules! generate_kernel_tests {
    ($kernel_type:ident) => {
        #[cfg(test)]
        mod tests {
            use super::$kernel_type;
            use crate::sph::smoothing_kernel::Kernel;
            use crate::units::*;
            use cgmath::prelude::*;
            use more_asserts::*;

            const SMOOTHING_LENGTHS: [Real; 3] = [0.5, 1.0, 2.0];
            const NUM_SAMPLES: usize = 64;

            fn sample_distances(h: Real) -> impl Iterator<Item = Real> {
                (1..NUM_SAMPLES).map(move |i| h * i as Real / NUM_SAMPLES as Real)
            }

            fn evaluate(kernel: &$kernel_type, r: Real) -> Real {
                kernel.evaluate(r * r, r)
            }

            #[test]
            fn derivative_matches_numerical_derivative() {
                for &h in SMOOTHING_LENGTHS.iter() {
                    let kernel = $kernel_type::new(h);
                    let step = h * 1.0e-3;
                    let max_derivative = sample_distances(h).map(|r| kernel.derivative(r).abs()).fold(0.0, Real::max);
                    for r in sample_distances(h) {
                        let numerical = (evaluate(&kernel, r + step) - evaluate(&kernel, r - step)) / (2.0 * step);
                        let analytic = kernel.derivative(r);
                        assert_le!(
                            (numerical - analytic).abs(),
                            2.0e-3 * max_derivative,
                            "h={}, r={}: numerical {} vs analytic {}",
                            h,
                            r,
                            numerical,
                            analytic
                        );
                    }
                }
            }

            #[test]
            fn laplacian_matches_numerical_laplacian() {
                let h = 1.0;
                let kernel = $kernel_type::new(h);
                let step = 1.0e-2;
                let samples = || (20..90).map(|i| i as Real / 100.0);
                let max_laplacian = samples().map(|r| kernel.laplacian(r * r, r).abs()).fold(0.0, Real::max);
                for r in samples() {
                    let second_derivative =
                        (evaluate(&kernel, r + step) - 2.0 * evaluate(&kernel, r) + evaluate(&kernel, r - step)) / (step * step);
                    let numerical = second_derivative + 2.0 / r * kernel.derivative(r);
                    assert_le!((numerical - kernel.laplacian(r * r, r)).abs(), 3.0e-2 * max_laplacian, "r={}", r);
                }
            }

            #[test]
            fn gradient_is_derivative_along_direction() {
                for &h in SMOOTHING_LENGTHS.iter() {
                    let kernel = $kernel_type::new(h);
                    let direction = Vector::new(1.0, -2.0, 0.5).normalize();
                    for r in sample_distances(h) {
                        let rj_to_ri = direction * r;
                        let gradient = kernel.gradient(rj_to_ri, r * r, r);
                        let expected = direction * kernel.derivative(r);
                        assert_le!((gradient - expected).magnitude(), 1.0e-4 * (1.0 + expected.magnitude()));

                        let mirrored = kernel.gradient(-rj_to_ri, r * r, r);
                        assert_le!((gradient + mirrored).magnitude(), 1.0e-5 * (1.0 + expected.magnitude()));
                    }
                }
            }

            #[test]
            fn vanishes_at_and_beyond_support() {
                for &h in SMOOTHING_LENGTHS.iter() {
                    let kernel = $kernel_type::new(h);
                    let scale = evaluate(&kernel, 0.0);
                    assert_le!(evaluate(&kernel, h).abs(), 1.0e-5 * scale);
                    assert_le!(kernel.derivative(h).abs(), 1.0e-4 * scale / h);
                    for r in [h * 1.001, h * 1.5, h * 10.0].iter().copied() {
                        assert_eq!(evaluate(&kernel, r), 0.0);
                        assert_eq!(kernel.derivative(r), 0.0);
                        assert_eq!(kernel.laplacian(r * r, r), 0.0);
                        assert_eq!(kernel.gradient(Vector::new(r, 0.0, 0.0), r * r, r), Vector::zero());
                    }
                }
            }

            #[test]
            fn gradient_at_center_is_zero() {
                let kernel = $kernel_type::new(1.0);
                assert_eq!(kernel.gradient(Vector::zero(), 0.0, 0.0), Vector::zero());
                assert_gt!(evaluate(&kernel, 0.0), 0.0);
            }

            #[test]
            fn normalized_in_3d() {
                for &h in SMOOTHING_LENGTHS.iter() {
                    let kernel = $kernel_type::new(h);
                    const NUM_STEPS: usize = 4000;
                    let dr = h as f64 / NUM_STEPS as f64;
                    let integral: f64 = (0..NUM_STEPS)
                        .map(|i| {
                            let r = (i as f64 + 0.5) * dr;
                            4.0 * std::f64::consts::PI * r * r * evaluate(&kernel, r as Real) as f64 * dr
                        })
                        .sum();
                    assert_le!((integral - 1.0).abs(), 1.0e-3, "h={}: integral {}", h, integral);
                }
            }
        }
    };
}

pub use self::cubic::CubicSpline;
pub use self::kernel::Kernel;
pub use self::poly6::Poly6;
pub use self::spiky::Spiky;
pub use self::viscosity::Viscosity;

mod cubic;
mod kernel;
mod poly6;
mod spiky;
mod viscosity;
