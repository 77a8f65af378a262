use crate::units::*;
use rayon::prelude::*;

/// Axis aligned box the fluid is confined to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> BoundingBox {
        BoundingBox { min, max }
    }

    /// Box spanning `center ± half_extent` on every axis.
    pub fn centered(center: Point, half_extent: Real) -> BoundingBox {
        let half = Vector::new(half_extent, half_extent, half_extent);
        BoundingBox {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Point {
        self.min + (self.max - self.min) * 0.5
    }

    /// Whether `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains(&self, p: Point, tolerance: Real) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] - tolerance && p[axis] <= self.max[axis] + tolerance)
    }
}

/// Leap frog (velocity Verlet form) step of a single particle.
///
/// `acceleration` holds the acceleration of the previous step and is replaced by `new_acceleration`.
#[inline]
pub fn leapfrog(position: &mut Point, velocity: &mut Vector, acceleration: &mut Vector, new_acceleration: Vector, dt: Real) {
    *velocity += (*acceleration + new_acceleration) * (0.5 * dt);
    *position += *velocity * dt + new_acceleration * (0.5 * dt * dt);
    *acceleration = new_acceleration;
}

/// Keeps a sphere of `radius` inside `bounds`, axis by axis.
///
/// A particle crossing a face is put back onto it and its velocity component along that axis is reflected and scaled by `restitution`.
/// If the box is thinner than the particle on some axis, the particle is centered on that axis instead.
#[inline]
pub fn resolve_box_collision(position: &mut Point, velocity: &mut Vector, bounds: &BoundingBox, radius: Real, restitution: Real) {
    for axis in 0..3 {
        let lower = bounds.min[axis] + radius;
        let upper = bounds.max[axis] - radius;
        if lower > upper {
            position[axis] = 0.5 * (bounds.min[axis] + bounds.max[axis]);
            velocity[axis] = -velocity[axis] * restitution;
        } else if position[axis] < lower {
            position[axis] = lower;
            velocity[axis] = -velocity[axis] * restitution;
        } else if position[axis] > upper {
            position[axis] = upper;
            velocity[axis] = -velocity[axis] * restitution;
        }
    }
}

/// Advances all particles by `dt` and resolves collisions with the box.
#[allow(clippy::too_many_arguments)]
pub fn integrate(
    positions: &mut [Point],
    velocities: &mut [Vector],
    accelerations: &mut [Vector],
    new_accelerations: &[Vector],
    dt: Real,
    bounds: &BoundingBox,
    particle_radius: Real,
    restitution: Real,
) {
    microprofile::scope!("Integrator", "integrate");
    assert_eq!(positions.len(), velocities.len());
    assert_eq!(positions.len(), accelerations.len());
    assert_eq!(positions.len(), new_accelerations.len());

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(accelerations.par_iter_mut())
        .zip(new_accelerations.par_iter())
        .for_each(|(((position, velocity), acceleration), new_acceleration)| {
            leapfrog(position, velocity, acceleration, *new_acceleration, dt);
            resolve_box_collision(position, velocity, bounds, particle_radius, restitution);
        });
}
