use cgmath::prelude::*;
use criterion::{black_box, criterion_group, Criterion};
use rand::prelude::*;

use sph3d::sph::SpatialHashGrid;
use sph3d::units::*;

fn bench_spatial_hash(c: &mut Criterion) {
    const NUM_POSITIONS: usize = 20000;
    const DENSITY: Real = 1.0;
    let search_radius = black_box(2.0);

    let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(123456789);
    let positions: Vec<Point> = std::iter::repeat_with(|| Point::from_vec(rng.gen::<Vector>() * (NUM_POSITIONS as Real / DENSITY).cbrt()))
        .take(NUM_POSITIONS)
        .collect();

    let mut grid = SpatialHashGrid::new();
    grid.update(&positions, search_radius);

    c.bench_function(
        &format!(
            "spatial_hash.update (warm), {} positions, {} density, {} search_radius",
            NUM_POSITIONS, DENSITY, search_radius
        ),
        |b| b.iter(|| grid.update(&positions, search_radius)),
    );

    c.bench_function(
        &format!(
            "spatial_hash.foreach_neighbor, {} positions, {} density, {} search_radius",
            NUM_POSITIONS, DENSITY, search_radius
        ),
        |b| {
            let mut pindex = 0; // cycle through position for a more balanced result
            b.iter(|| {
                let mut accum: Vector = Zero::zero();
                grid.foreach_neighbor(pindex, &positions, search_radius, |_, rj_to_ri, _| {
                    accum += rj_to_ri;
                });
                pindex = (pindex + 1) % NUM_POSITIONS;
                accum
            })
        },
    );
}

fn config() -> Criterion {
    Criterion::default().warm_up_time(core::time::Duration::new(0, 1000))
}

criterion_group!(
    name = spatial_hash;
    config = config();
    targets = bench_spatial_hash
);
