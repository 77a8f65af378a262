pub use self::error::SphError;
pub use self::integrator::BoundingBox;
pub use self::parameters::{KernelFamily, SimulationParameters};
pub use self::particles::{Particles, SpawnShape};
pub use self::solver::{SolverStatistics, SphSolver};
pub use self::spatial_hash::SpatialHashGrid;
pub use self::timemanager::*;

pub mod coloring;
pub mod forces;
pub mod integrator;
pub mod smoothing_kernel;
pub mod spatial_hash;

mod error;
mod parameters;
mod particles;
mod solver;
mod timemanager;
