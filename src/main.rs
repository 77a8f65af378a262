use std::time::{Duration, Instant};

use sph3d::sph::*;
use sph3d::units::*;

const NUM_PARTICLES: usize = 1000;
const BOX_HALF_EXTENT: Real = 15.0;
const SIMULATED_SECONDS: Real = 5.0;
const STATISTICS_INTERVAL: u64 = 100;

fn main() -> Result<(), SphError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    microprofile::init!();
    microprofile::set_enable_all_groups!(true);

    // dam break: a block of fluid in one corner of the box
    let mut parameters = SimulationParameters::default();
    parameters.set_num_particles(NUM_PARTICLES);
    parameters.set_restitution(0.2)?;
    parameters.set_spawn_origin(Point::new(-13.0, -13.0, -13.0))?;
    let particle_diameter = 2.0 * parameters.particle_radius();

    let mut solver = SphSolver::new(parameters);
    let bounds = BoundingBox::centered(Point::new(0.0, 0.0, 0.0), BOX_HALF_EXTENT);
    let mut time_manager = TimeManager::new(TimeStepLimits {
        frame_length: Some(1.0 / 60.0),
        ..TimeStepLimits::default()
    });

    log::info!("simulating {} particles for {}s", solver.num_particles(), SIMULATED_SECONDS);

    let start = Instant::now();
    let mut processing_time = Duration::default();
    while time_manager.passed_time() < SIMULATED_SECONDS {
        microprofile::scope!("main", "simulation step");

        let step_start = Instant::now();
        solver.step(time_manager.timestep(), &bounds);
        processing_time += step_start.elapsed();

        let statistics = solver.statistics();
        time_manager.advance(particle_diameter, statistics.max_speed);

        if solver.step_count() % STATISTICS_INTERVAL == 0 {
            log::info!(
                "t={:.3}s dt={:.5}s max speed {:.3}, density {:.3}..{:.3} (avg {:.3}), {:.2}ms/step",
                time_manager.passed_time(),
                time_manager.timestep(),
                statistics.max_speed,
                statistics.min_density,
                statistics.max_density,
                statistics.average_density,
                processing_time.as_secs_f64() * 1000.0 / solver.step_count() as f64,
            );
        }
        if statistics.non_finite_count > 0 {
            log::error!("simulation diverged after {} steps", solver.step_count());
            break;
        }

        microprofile::flip!();
    }

    log::info!(
        "done: {} steps in {:.2}s wall time",
        solver.step_count(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
