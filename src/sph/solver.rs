use super::coloring;
use super::error::SphError;
use super::forces::{self, FluidConstants, FluidState};
use super::integrator::{self, BoundingBox};
use super::parameters::{KernelFamily, SimulationParameters};
use super::particles::Particles;
use super::smoothing_kernel::{CubicSpline, Kernel, Poly6, Spiky};
use super::spatial_hash::SpatialHashGrid;
use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

/// Snapshot of a few global quantities, for diagnostics and time step control.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SolverStatistics {
    pub num_particles: usize,
    pub max_speed: Real,
    pub min_density: Real,
    pub max_density: Real,
    pub average_density: Real,
    // number of position/velocity components that are NaN or infinite
    pub non_finite_count: usize,
}

/// Weakly compressible SPH fluid in an axis aligned box.
///
/// Each step runs predict, grid rebuild, density, forces + integration and recolor, in this order.
/// Every stage finishes for all particles before the next one starts.
///
/// `dt` is taken as is. Large time steps make the fluid explode, picking a stable `dt` is up to the caller (see [`TimeManager`](super::TimeManager)).
pub struct SphSolver {
    parameters: SimulationParameters,
    particles: Particles,
    grid: SpatialHashGrid,

    // accelerations of the current step, swapped into the particles by the integrator
    new_accelerations: Vec<Vector>,
    step_count: u64,
}

impl Default for SphSolver {
    fn default() -> Self {
        SphSolver::new(SimulationParameters::default())
    }
}

impl SphSolver {
    /// Lays out the initial lattice as configured by `parameters`.
    pub fn new(parameters: SimulationParameters) -> SphSolver {
        let mut solver = SphSolver {
            parameters,
            particles: Particles::default(),
            grid: SpatialHashGrid::new(),
            new_accelerations: Vec::new(),
            step_count: 0,
        };
        solver.reset();
        solver
    }

    /// Replaces particle count, spawn gap, spawn origin and gravity, then resets.
    ///
    /// A particle count of zero leaves the solver untouched.
    pub fn initialize(&mut self, num_particles: usize, spawn_gap: Real, spawn_origin: Point, gravity: Real) -> Result<(), SphError> {
        let mut parameters = self.parameters.clone();
        parameters.set_spawn_gap(spawn_gap)?;
        parameters.set_spawn_origin(spawn_origin)?;
        parameters.set_gravity(gravity)?;
        parameters.set_num_particles(num_particles);

        if num_particles == 0 {
            log::debug!("initialize with zero particles, nothing to do");
            return Ok(());
        }
        self.parameters = parameters;
        self.reset();
        Ok(())
    }

    /// Puts all particles back on the spawn lattice, at rest.
    pub fn reset(&mut self) {
        microprofile::scope!("SphSolver", "reset");
        let parameters = &self.parameters;
        log::debug!(
            "reset: {} particles, gap {}, origin {:?}",
            parameters.num_particles(),
            parameters.spawn_gap(),
            parameters.spawn_origin()
        );

        self.particles = Particles::lattice(
            parameters.num_particles(),
            parameters.spawn_gap(),
            parameters.spawn_origin(),
            parameters.spawn_shape(),
        );
        self.new_accelerations = vec![Vector::zero(); self.particles.len()];
        self.step_count = 0;

        // densities are valid right away, not only after the first step
        let smoothing_radius = parameters.smoothing_radius();
        self.grid.update(&self.particles.positions, smoothing_radius);
        let constants = FluidConstants::new(parameters, parameters.fallback_seed());
        match parameters.kernel_family() {
            KernelFamily::CubicSpline => forces::update_densities(
                &CubicSpline::new(smoothing_radius),
                &self.grid,
                &self.particles.positions,
                &constants,
                &mut self.particles.densities,
            ),
            KernelFamily::PolySpiky => forces::update_densities(
                &Poly6::new(smoothing_radius),
                &self.grid,
                &self.particles.positions,
                &constants,
                &mut self.particles.densities,
            ),
        }
    }

    /// Advances the simulation by `dt` seconds, keeping all particles inside `bounds`.
    pub fn step(&mut self, dt: Real, bounds: &BoundingBox) {
        microprofile::scope!("SphSolver", "step");

        let num_particles = self.parameters.num_particles();
        if self.particles.len() != num_particles || !self.particles.is_consistent() || self.new_accelerations.len() != num_particles {
            log::warn!(
                "particle count changed from {} to {}, resetting the fluid",
                self.particles.len(),
                num_particles
            );
            self.reset();
        }
        if self.particles.is_empty() {
            return;
        }

        let smoothing_radius = self.parameters.smoothing_radius();
        match self.parameters.kernel_family() {
            KernelFamily::CubicSpline => {
                let kernel = CubicSpline::new(smoothing_radius);
                self.step_with_kernels(&kernel, &kernel, dt, bounds)
            }
            KernelFamily::PolySpiky => self.step_with_kernels(&Poly6::new(smoothing_radius), &Spiky::new(smoothing_radius), dt, bounds),
        }
        self.step_count += 1;
    }

    fn step_with_kernels<D: Kernel + Sync, P: Kernel + Sync>(&mut self, density_kernel: &D, pressure_kernel: &P, dt: Real, bounds: &BoundingBox) {
        let parameters = &self.parameters;
        let particles = &mut self.particles;
        let grid = &mut self.grid;
        let new_accelerations = &mut self.new_accelerations;
        let constants = FluidConstants::new(parameters, Self::fallback_seed_for_step(parameters.fallback_seed(), self.step_count));

        {
            microprofile::scope!("SphSolver", "predict");
            particles
                .predicted_positions
                .par_iter_mut()
                .zip(particles.positions.par_iter())
                .zip(particles.velocities.par_iter())
                .for_each(|((predicted, &position), &velocity)| *predicted = position + velocity * dt);
        }

        {
            let evaluation_positions: &[Point] = if parameters.use_predicted_positions() {
                &particles.predicted_positions
            } else {
                &particles.positions
            };

            {
                microprofile::scope!("SphSolver", "rebuild grid");
                grid.update(evaluation_positions, parameters.smoothing_radius());
            }
            forces::update_densities(density_kernel, grid, evaluation_positions, &constants, &mut particles.densities);

            let state = FluidState {
                grid,
                positions: evaluation_positions,
                velocities: &particles.velocities,
                densities: &particles.densities,
            };
            forces::update_accelerations(pressure_kernel, &state, &constants, new_accelerations);
        }

        integrator::integrate(
            &mut particles.positions,
            &mut particles.velocities,
            &mut particles.accelerations,
            new_accelerations,
            dt,
            bounds,
            parameters.particle_radius(),
            parameters.restitution(),
        );

        coloring::update_colors(&particles.velocities, &mut particles.colors, parameters.color_velocity_ceiling());
    }

    fn fallback_seed_for_step(seed: u64, step: u64) -> u64 {
        seed ^ step.wrapping_add(1).wrapping_mul(0xbf58_476d_1ce4_e5b9)
    }

    pub fn positions(&self) -> &[Point] {
        &self.particles.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.particles.colors
    }

    pub fn velocities(&self) -> &[Vector] {
        &self.particles.velocities
    }

    pub fn densities(&self) -> &[Real] {
        &self.particles.densities
    }

    pub fn accelerations(&self) -> &[Vector] {
        &self.particles.accelerations
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Grid as built in the last step (or reset).
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Parameters may be changed between steps. A new particle count resets the fluid on the next step.
    pub fn parameters_mut(&mut self) -> &mut SimulationParameters {
        &mut self.parameters
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Steps since the last reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn statistics(&self) -> SolverStatistics {
        microprofile::scope!("SphSolver", "statistics");
        let particles = &self.particles;
        if particles.is_empty() {
            return SolverStatistics::default();
        }

        let identity = || (0.0 as Real, Real::INFINITY, Real::NEG_INFINITY, 0.0 as f64, 0usize);
        let (max_speed, min_density, max_density, density_sum, non_finite_count) = (
            &particles.positions,
            &particles.velocities,
            &particles.densities,
        )
            .into_par_iter()
            .map(|(p, v, &density)| {
                let non_finite = (0..3).filter(|&k| !p[k].is_finite()).count() + (0..3).filter(|&k| !v[k].is_finite()).count();
                (v.magnitude(), density, density, density as f64, non_finite)
            })
            .reduce(identity, |a, b| (a.0.max(b.0), a.1.min(b.1), a.2.max(b.2), a.3 + b.3, a.4 + b.4));

        SolverStatistics {
            num_particles: particles.len(),
            max_speed,
            min_density,
            max_density,
            average_density: (density_sum / particles.len() as f64) as Real,
            non_finite_count,
        }
    }
}
