use criterion::{black_box, criterion_group, Criterion};

use sph3d::sph::{
    self,
    forces::{self, FluidConstants, FluidState},
    smoothing_kernel::{CubicSpline, Spiky},
    SpatialHashGrid,
};
use sph3d::units::*;

fn bench_update_densities(c: &mut Criterion) {
    let mut parameters = sph::SimulationParameters::default();
    parameters.set_num_particles(8000);
    parameters.set_spawn_gap(1.0).unwrap();

    let particles = sph::Particles::lattice(
        parameters.num_particles(),
        parameters.spawn_gap(),
        parameters.spawn_origin(),
        parameters.spawn_shape(),
    );
    let mut grid = SpatialHashGrid::new();
    grid.update(&particles.positions, parameters.smoothing_radius());

    let constants = FluidConstants::new(&parameters, 0);
    let kernel = black_box(CubicSpline::new(parameters.smoothing_radius()));
    let mut densities = vec![0.0; particles.len()];

    c.bench_function(&format!("update_densities - lattice with {} particles", particles.len()), |b| {
        b.iter(|| forces::update_densities(&kernel, &grid, &particles.positions, &constants, &mut densities))
    });

    let state = FluidState {
        grid: &grid,
        positions: &particles.positions,
        velocities: &particles.velocities,
        densities: &densities,
    };
    let pressure_kernel = black_box(Spiky::new(parameters.smoothing_radius()));
    let mut accelerations = vec![Vector::new(0.0, 0.0, 0.0); particles.len()];
    c.bench_function(&format!("update_accelerations - lattice with {} particles", particles.len()), |b| {
        b.iter(|| forces::update_accelerations(&pressure_kernel, &state, &constants, &mut accelerations))
    });
}

criterion_group!(update_densities, bench_update_densities);
