use super::parameters::SimulationParameters;
use super::smoothing_kernel::{Kernel, Viscosity};
use super::spatial_hash::SpatialHashGrid;
use crate::units::*;
use cgmath::prelude::*;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rayon::prelude::*;

/// Added to every density we divide by.
pub const DENSITY_EPSILON: Real = 1e-6;

/// Per-step constants of the fluid model.
#[derive(Copy, Clone, Debug)]
pub struct FluidConstants {
    pub particle_mass: Real,
    pub stiffness: Real,
    pub rest_density: Real,
    pub viscosity: Real,
    pub smoothing_radius: Real,
    pub gravity: Vector,
    // seeds directions used to separate coincident particles
    pub fallback_seed: u64,
}

impl FluidConstants {
    pub fn new(parameters: &SimulationParameters, fallback_seed: u64) -> FluidConstants {
        FluidConstants {
            particle_mass: parameters.particle_mass(),
            stiffness: parameters.stiffness(),
            rest_density: parameters.rest_density(),
            viscosity: parameters.viscosity(),
            smoothing_radius: parameters.smoothing_radius(),
            gravity: parameters.gravity_vector(),
            fallback_seed,
        }
    }

    /// Equation of State (EOS)
    ///
    /// Linear in the density deviation and deliberately not clamped: below rest density the pressure is negative.
    #[inline]
    pub fn pressure(&self, density: Real) -> Real {
        self.stiffness * (density - self.rest_density)
    }
}

/// Read-only view of everything the force stage needs.
#[derive(Copy, Clone)]
pub struct FluidState<'a> {
    pub grid: &'a SpatialHashGrid,
    pub positions: &'a [Point], // positions the grid was built with
    pub velocities: &'a [Vector],
    pub densities: &'a [Real],
}

/// Random unit direction for the coincident pair (i, j).
///
/// Draws from a generator seeded by the unordered pair, so the result does not depend on thread scheduling.
/// The direction for (j, i) is the exact opposite of (i, j), keeping the pair force symmetric.
pub fn fallback_direction(seed: u64, i: usize, j: usize) -> Vector {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let pair = ((lo as u64) << 32) ^ (hi as u64);
    let mut rng = SmallRng::seed_from_u64(seed ^ pair.wrapping_mul(0x9e37_79b9_7f4a_7c15));

    // uniform on the sphere
    let phi: Real = rng.gen_range(0.0..(2.0 * std::f64::consts::PI as Real));
    let cos_theta: Real = rng.gen_range(-1.0..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let direction = Vector::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);

    if i < j {
        direction
    } else {
        -direction
    }
}

/// Density at particle i: self-contribution plus all neighbors within the smoothing radius.
#[inline]
pub fn density<K: Kernel>(kernel: &K, grid: &SpatialHashGrid, positions: &[Point], constants: &FluidConstants, i: usize) -> Real {
    let mass = constants.particle_mass;
    let mut density = kernel.evaluate(0.0, 0.0) * mass; // self-contribution
    grid.foreach_neighbor(
        i,
        positions,
        constants.smoothing_radius,
        #[inline(always)]
        |_, _, r_sq| {
            density += kernel.evaluate(r_sq, r_sq.sqrt()) * mass;
        },
    );
    density
}

/// Recomputes all densities. Each particle only writes its own slot.
pub fn update_densities<K: Kernel + Sync>(
    kernel: &K,
    grid: &SpatialHashGrid,
    positions: &[Point],
    constants: &FluidConstants,
    densities: &mut [Real],
) {
    microprofile::scope!("ForceEvaluator", "update_densities");
    assert_eq!(positions.len(), densities.len());

    // Density contributions are symmetric, but that is hard to use in a parallel loop.
    densities
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, density_i)| *density_i = density(kernel, grid, positions, constants, i));
}

#[inline(always)]
fn pressure_contribution<K: Kernel>(
    kernel: &K,
    constants: &FluidConstants,
    shared_pressure: Real,
    rj_to_ri: Vector,
    r_sq: Real,
    i: usize,
    j: usize,
) -> Vector {
    let r = r_sq.sqrt();
    let gradient = if r < K::DIVISION_EPSILON {
        // Degenerated overlap, gradient direction undefined.
        fallback_direction(constants.fallback_seed, i, j) * kernel.derivative(0.0)
    } else {
        kernel.gradient(rj_to_ri, r_sq, r)
    };
    constants.particle_mass * shared_pressure * gradient
}

#[inline(always)]
fn viscosity_contribution(kernel: &Viscosity, constants: &FluidConstants, velocity_diff: Vector, density_j: Real, r_sq: Real) -> Vector {
    constants.particle_mass * kernel.laplacian(r_sq.sqrt()) / (density_j + DENSITY_EPSILON) * velocity_diff
}

/// Pressure force on particle i, Σ m (p_i + p_j) / 2 ∇W(r_i - r_j).
pub fn pressure_force<K: Kernel>(kernel: &K, state: &FluidState<'_>, constants: &FluidConstants, i: usize) -> Vector {
    let pressure_i = constants.pressure(state.densities[i]);
    let mut force = Vector::zero();
    state.grid.foreach_neighbor(
        i,
        state.positions,
        constants.smoothing_radius,
        #[inline(always)]
        |j, rj_to_ri, r_sq| {
            let shared_pressure = 0.5 * (pressure_i + constants.pressure(state.densities[j]));
            force += pressure_contribution(kernel, constants, shared_pressure, rj_to_ri, r_sq, i, j);
        },
    );
    force
}

/// Viscous force on particle i, μ Σ m (v_j - v_i) / ρ_j ∇²W.
// Laplacian based physical model as in "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
pub fn viscosity_force(kernel: &Viscosity, state: &FluidState<'_>, constants: &FluidConstants, i: usize) -> Vector {
    let vi = state.velocities[i];
    let mut force = Vector::zero();
    state.grid.foreach_neighbor(
        i,
        state.positions,
        constants.smoothing_radius,
        #[inline(always)]
        |j, _, r_sq| {
            force += viscosity_contribution(kernel, constants, state.velocities[j] - vi, state.densities[j], r_sq);
        },
    );
    force * constants.viscosity
}

/// Total acceleration of particle i: (pressure + viscous force) / ρ_i + gravity.
pub fn acceleration<K: Kernel>(pressure_kernel: &K, viscosity_kernel: &Viscosity, state: &FluidState<'_>, constants: &FluidConstants, i: usize) -> Vector {
    let vi = state.velocities[i];
    let density_i = state.densities[i];
    let pressure_i = constants.pressure(density_i);

    let mut pressure_force = Vector::zero();
    let mut viscous_force = Vector::zero();

    // no self-contribution since vector to particle is zero (-> no pressure) and velocity difference is zero as well (-> no viscosity)
    state.grid.foreach_neighbor(
        i,
        state.positions,
        constants.smoothing_radius,
        #[inline(always)]
        |j, rj_to_ri, r_sq| {
            let density_j = state.densities[j];
            let shared_pressure = 0.5 * (pressure_i + constants.pressure(density_j));
            pressure_force += pressure_contribution(pressure_kernel, constants, shared_pressure, rj_to_ri, r_sq, i, j);
            viscous_force += viscosity_contribution(viscosity_kernel, constants, state.velocities[j] - vi, density_j, r_sq);
        },
    );

    (pressure_force + viscous_force * constants.viscosity) / (density_i + DENSITY_EPSILON) + constants.gravity
}

/// Computes accelerations for all particles from the densities of this step.
pub fn update_accelerations<K: Kernel + Sync>(pressure_kernel: &K, state: &FluidState<'_>, constants: &FluidConstants, accelerations: &mut [Vector]) {
    microprofile::scope!("ForceEvaluator", "update_accelerations");
    assert_eq!(state.positions.len(), accelerations.len());
    assert_eq!(state.densities.len(), accelerations.len());

    let viscosity_kernel = Viscosity::new(constants.smoothing_radius);
    accelerations
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, acceleration_i)| *acceleration_i = acceleration(pressure_kernel, &viscosity_kernel, state, constants, i));
}
