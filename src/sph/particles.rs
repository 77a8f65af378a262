use crate::units::*;
use cgmath::prelude::*;

/// Arrangement of the initial particle lattice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnShape {
    /// Cube: x fastest, then y, then z.
    Cube,
    /// Single layer in the xy plane: x fastest, then y.
    Square,
}

impl SpawnShape {
    /// Number of particles along a lattice edge, i.e. the smallest side whose full lattice holds `num_particles`.
    pub fn side_length(self, num_particles: usize) -> usize {
        let exponent = match self {
            SpawnShape::Cube => 3,
            SpawnShape::Square => 2,
        };
        let mut side: usize = 1;
        while side.pow(exponent) < num_particles {
            side += 1;
        }
        side
    }

    /// Position of the `index`th particle in a lattice with `side` particles per edge.
    pub fn lattice_position(self, index: usize, side: usize, gap: Real, origin: Point) -> Point {
        let x = (index % side) as Real;
        let offset = match self {
            SpawnShape::Cube => Vector::new(x, ((index / side) % side) as Real, (index / (side * side)) as Real),
            SpawnShape::Square => Vector::new(x, (index / side) as Real, 0.0),
        };
        origin + offset * gap
    }
}

pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.2, 0.2, 1.0];

/// Per-particle state as structure of arrays.
///
/// All arrays always have the same length, they are only ever replaced together.
#[derive(Clone, Debug, Default)]
pub struct Particles {
    pub positions: Vec<Point>,
    pub predicted_positions: Vec<Point>, // look-ahead positions, x + v dt
    pub velocities: Vec<Vector>,
    pub accelerations: Vec<Vector>, // from previous step, needed by leap frog
    pub densities: Vec<Real>,       // Local densities ρ
    pub colors: Vec<Color>,
}

impl Particles {
    /// Lays out `num_particles` at rest on a lattice starting at `origin`.
    pub fn lattice(num_particles: usize, gap: Real, origin: Point, shape: SpawnShape) -> Particles {
        let side = shape.side_length(num_particles);
        let positions: Vec<Point> = (0..num_particles)
            .map(|i| shape.lattice_position(i, side, gap, origin))
            .collect();

        Particles {
            predicted_positions: positions.clone(),
            positions,
            velocities: vec![Vector::zero(); num_particles],
            accelerations: vec![Vector::zero(); num_particles],
            densities: vec![0.0; num_particles],
            colors: vec![Color::from(DEFAULT_COLOR); num_particles],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks that every per-particle array has the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.predicted_positions.len() == n
            && self.velocities.len() == n
            && self.accelerations.len() == n
            && self.densities.len() == n
            && self.colors.len() == n
    }
}
