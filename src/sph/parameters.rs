use super::error::SphError;
use super::particles::SpawnShape;
use crate::units::*;

/// Which kernels are used for density and pressure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KernelFamily {
    /// Cubic spline for both density and pressure gradient.
    CubicSpline,
    /// Poly6 for density, Spiky for the pressure gradient (Müller et al. 2003).
    PolySpiky,
}

/// Tunable solver configuration.
///
/// Every setter validates its input, an invalid value leaves the previous one untouched.
/// Values may be changed between steps; spawn settings and the particle count only take effect on the next reset.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    particle_mass: Real,
    stiffness: Real, // pressure multiplier, p = k (ρ - ρ0)
    smoothing_radius: Real,
    rest_density: Real, // ρ0
    viscosity: Real,
    gravity: Real, // magnitude, pointing towards -y
    restitution: Real,
    particle_radius: Real,
    color_velocity_ceiling: Real,

    num_particles: usize,
    spawn_gap: Real,
    spawn_origin: Point,
    spawn_shape: SpawnShape,

    use_predicted_positions: bool,
    kernel_family: KernelFamily,
    fallback_seed: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            particle_mass: 1.0,
            stiffness: 1.0,
            smoothing_radius: 2.0,
            rest_density: 1000.0,
            viscosity: 0.0,
            gravity: 9.81,
            restitution: 0.5,
            particle_radius: 1.0,
            color_velocity_ceiling: 10.0,

            num_particles: 2500,
            spawn_gap: 2.0,
            spawn_origin: Point::new(0.0, 0.0, 0.0),
            spawn_shape: SpawnShape::Cube,

            use_predicted_positions: true,
            kernel_family: KernelFamily::CubicSpline,
            fallback_seed: 0,
        }
    }
}

fn positive(name: &'static str, value: Real) -> Result<Real, SphError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SphError::InvalidParameter {
            name,
            requirement: "finite and positive",
            value,
        })
    }
}

fn non_negative(name: &'static str, value: Real) -> Result<Real, SphError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SphError::InvalidParameter {
            name,
            requirement: "finite and not negative",
            value,
        })
    }
}

fn finite(name: &'static str, value: Real) -> Result<Real, SphError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SphError::InvalidParameter {
            name,
            requirement: "finite",
            value,
        })
    }
}

fn finite_point(name: &'static str, value: Point) -> Result<Point, SphError> {
    if value.x.is_finite() && value.y.is_finite() && value.z.is_finite() {
        Ok(value)
    } else {
        Err(SphError::NonFiniteVector {
            name,
            value: [value.x, value.y, value.z],
        })
    }
}

impl SimulationParameters {
    pub fn particle_mass(&self) -> Real {
        self.particle_mass
    }

    pub fn stiffness(&self) -> Real {
        self.stiffness
    }

    pub fn smoothing_radius(&self) -> Real {
        self.smoothing_radius
    }

    pub fn rest_density(&self) -> Real {
        self.rest_density
    }

    pub fn viscosity(&self) -> Real {
        self.viscosity
    }

    pub fn gravity(&self) -> Real {
        self.gravity
    }

    /// Gravity as acceleration vector in m/s² (== N/kg).
    pub fn gravity_vector(&self) -> Vector {
        Vector::new(0.0, -self.gravity, 0.0)
    }

    pub fn restitution(&self) -> Real {
        self.restitution
    }

    pub fn particle_radius(&self) -> Real {
        self.particle_radius
    }

    pub fn color_velocity_ceiling(&self) -> Real {
        self.color_velocity_ceiling
    }

    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    pub fn spawn_gap(&self) -> Real {
        self.spawn_gap
    }

    pub fn spawn_origin(&self) -> Point {
        self.spawn_origin
    }

    pub fn spawn_shape(&self) -> SpawnShape {
        self.spawn_shape
    }

    pub fn use_predicted_positions(&self) -> bool {
        self.use_predicted_positions
    }

    pub fn kernel_family(&self) -> KernelFamily {
        self.kernel_family
    }

    pub fn fallback_seed(&self) -> u64 {
        self.fallback_seed
    }

    pub fn set_particle_mass(&mut self, mass: Real) -> Result<(), SphError> {
        self.particle_mass = positive("particle mass", mass)?;
        Ok(())
    }

    pub fn set_stiffness(&mut self, stiffness: Real) -> Result<(), SphError> {
        self.stiffness = non_negative("stiffness", stiffness)?;
        Ok(())
    }

    pub fn set_smoothing_radius(&mut self, smoothing_radius: Real) -> Result<(), SphError> {
        self.smoothing_radius = positive("smoothing radius", smoothing_radius)?;
        Ok(())
    }

    pub fn set_rest_density(&mut self, rest_density: Real) -> Result<(), SphError> {
        self.rest_density = non_negative("rest density", rest_density)?;
        Ok(())
    }

    pub fn set_viscosity(&mut self, viscosity: Real) -> Result<(), SphError> {
        self.viscosity = non_negative("viscosity", viscosity)?;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Real) -> Result<(), SphError> {
        self.gravity = finite("gravity", gravity)?;
        Ok(())
    }

    pub fn set_restitution(&mut self, restitution: Real) -> Result<(), SphError> {
        if !(0.0..=1.0).contains(&restitution) {
            return Err(SphError::InvalidParameter {
                name: "restitution",
                requirement: "within [0, 1]",
                value: restitution,
            });
        }
        self.restitution = restitution;
        Ok(())
    }

    pub fn set_particle_radius(&mut self, particle_radius: Real) -> Result<(), SphError> {
        self.particle_radius = non_negative("particle radius", particle_radius)?;
        Ok(())
    }

    pub fn set_color_velocity_ceiling(&mut self, ceiling: Real) -> Result<(), SphError> {
        self.color_velocity_ceiling = positive("color velocity ceiling", ceiling)?;
        Ok(())
    }

    /// Takes effect on the next reset (a step with a different particle count resets on its own).
    pub fn set_num_particles(&mut self, num_particles: usize) {
        self.num_particles = num_particles;
    }

    pub fn set_spawn_gap(&mut self, spawn_gap: Real) -> Result<(), SphError> {
        self.spawn_gap = positive("spawn gap", spawn_gap)?;
        Ok(())
    }

    pub fn set_spawn_origin(&mut self, spawn_origin: Point) -> Result<(), SphError> {
        self.spawn_origin = finite_point("spawn origin", spawn_origin)?;
        Ok(())
    }

    pub fn set_spawn_shape(&mut self, spawn_shape: SpawnShape) {
        self.spawn_shape = spawn_shape;
    }

    pub fn set_use_predicted_positions(&mut self, use_predicted_positions: bool) {
        self.use_predicted_positions = use_predicted_positions;
    }

    pub fn set_kernel_family(&mut self, kernel_family: KernelFamily) {
        self.kernel_family = kernel_family;
    }

    /// Seed for the random directions that separate coincident particles.
    pub fn set_fallback_seed(&mut self, seed: u64) {
        self.fallback_seed = seed;
    }
}
