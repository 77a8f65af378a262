use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Blue for particles at rest, red at or above `velocity_ceiling`.
#[inline]
pub fn velocity_color(velocity: Vector, velocity_ceiling: Real) -> Color {
    let speed = velocity.magnitude();
    // NaN speeds end up blue
    let t = if speed.is_nan() { 0.0 } else { clamp(speed / velocity_ceiling, 0.0, 1.0) };
    Color::new(t, 0.0, 1.0 - t, 1.0)
}

pub fn update_colors(velocities: &[Vector], colors: &mut [Color], velocity_ceiling: Real) {
    microprofile::scope!("Coloring", "update_colors");
    assert_eq!(velocities.len(), colors.len());

    colors
        .par_iter_mut()
        .zip(velocities.par_iter())
        .for_each(|(color, velocity)| *color = velocity_color(*velocity, velocity_ceiling));
}
