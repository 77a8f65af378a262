use crate::units::*;
use cgmath::prelude::*;
use rayon::prelude::*;

pub type ParticleIndex = u32;
pub type CellKey = u32;

/// Marks a bucket without any particle in the first-index table.
pub const ABSENT: ParticleIndex = ParticleIndex::MAX;

// Large primes from "Optimized Spatial Hashing for Collision Detection of Deformable Objects", Teschner et al.
const HASH_PRIME_X: i64 = 73_856_093;
const HASH_PRIME_Y: i64 = 19_349_663;
const HASH_PRIME_Z: i64 = 83_492_791;

/// Bucket count never goes below this, no matter how few particles there are.
pub const MIN_BUCKET_COUNT: u32 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPos {
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> CellPos {
        CellPos {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z.wrapping_add(dz),
        }
    }

    #[inline]
    fn to_key(self, bucket_count: u32) -> CellKey {
        let hash = (self.x as i64)
            .wrapping_mul(HASH_PRIME_X)
            .wrapping_add((self.y as i64).wrapping_mul(HASH_PRIME_Y))
            .wrapping_add((self.z as i64).wrapping_mul(HASH_PRIME_Z));
        hash.rem_euclid(bucket_count as i64) as CellKey
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellEntry {
    pub key: CellKey,
    pub pidx: ParticleIndex,
}

/// Uniform grid with cells the size of the search radius, stored as a hash table over a sorted particle list.
///
/// Rebuilt from scratch every step:
/// every particle gets a hashed cell key, the (key, particle) list is sorted by key,
/// and for every key present the offset of its first entry is recorded.
/// Queries visit the 3x3x3 block of cells around a position and scan each bucket until the key changes.
///
/// Hash collisions only cost time: every candidate is re-checked against the true distance.
#[derive(Debug)]
pub struct SpatialHashGrid {
    entries: Vec<CellEntry>,
    first_index: Vec<ParticleIndex>,
    cell_size: Real,
    cell_size_inv: Real,
    fixed_bucket_count: Option<u32>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        SpatialHashGrid::new()
    }
}

impl SpatialHashGrid {
    /// Grid whose bucket count follows the particle count.
    pub fn new() -> SpatialHashGrid {
        SpatialHashGrid {
            entries: Vec::new(),
            first_index: Vec::new(),
            cell_size: 1.0,
            cell_size_inv: 1.0,
            fixed_bucket_count: None,
        }
    }

    /// Grid with a constant bucket count, independent of the particle count.
    ///
    /// Worst case neighbor iteration cost grows with particles per bucket, so a count well above the particle count should be chosen.
    pub fn with_bucket_count(bucket_count: u32) -> SpatialHashGrid {
        SpatialHashGrid {
            fixed_bucket_count: Some(bucket_count.max(1)),
            ..SpatialHashGrid::new()
        }
    }

    /// Bucket count used for a given number of particles (unless fixed).
    pub fn suggested_bucket_count(num_particles: usize) -> u32 {
        let wanted = (num_particles.saturating_mul(2)).next_power_of_two();
        wanted.clamp(MIN_BUCKET_COUNT as usize, 1 << 31) as u32
    }

    pub fn bucket_count(&self) -> u32 {
        self.first_index.len() as u32
    }

    pub fn cell_size(&self) -> Real {
        self.cell_size
    }

    pub fn entries(&self) -> &[CellEntry] {
        &self.entries
    }

    /// Offset of the first sorted entry with the given key, or `None` if no particle hashed to it.
    pub fn first_index(&self, key: CellKey) -> Option<usize> {
        match self.first_index.get(key as usize) {
            Some(&first) if first != ABSENT => Some(first as usize),
            _ => None,
        }
    }

    #[inline]
    pub fn position_to_cellpos(&self, position: Point) -> CellPos {
        let cellspace = position.to_vec() * self.cell_size_inv;
        CellPos {
            x: cellspace.x.floor() as i32,
            y: cellspace.y.floor() as i32,
            z: cellspace.z.floor() as i32,
        }
    }

    #[inline]
    pub fn cell_key(&self, cell: CellPos) -> CellKey {
        cell.to_key(self.bucket_count())
    }

    /// Rebuilds the grid for the given positions with cells of size `cell_size` (the smoothing radius).
    pub fn update(&mut self, positions: &[Point], cell_size: Real) {
        microprofile::scope!("SpatialHashGrid", "update");

        self.cell_size = cell_size;
        self.cell_size_inv = 1.0 / cell_size;

        let bucket_count = self
            .fixed_bucket_count
            .unwrap_or_else(|| Self::suggested_bucket_count(positions.len()).max(self.bucket_count()));
        if bucket_count as usize != self.first_index.len() {
            log::debug!("resizing spatial hash table from {} to {} buckets", self.first_index.len(), bucket_count);
            self.first_index.resize(bucket_count as usize, ABSENT);
        }
        self.first_index.par_iter_mut().for_each(|first| *first = ABSENT);

        {
            microprofile::scope!("SpatialHashGrid", "hash");
            let grid = &*self;
            let entries: Vec<CellEntry> = positions
                .par_iter()
                .enumerate()
                .map(|(pidx, &position)| CellEntry {
                    key: grid.cell_key(grid.position_to_cellpos(position)),
                    pidx: pidx as ParticleIndex,
                })
                .collect();
            self.entries = entries;
        }

        {
            microprofile::scope!("SpatialHashGrid", "sort");
            // Stable, so particles sharing a bucket stay in index order.
            self.entries.par_sort_by_key(|entry| entry.key);
        }

        let mut prev_key = None;
        for (offset, entry) in self.entries.iter().enumerate() {
            if prev_key != Some(entry.key) {
                self.first_index[entry.key as usize] = offset as ParticleIndex;
                prev_key = Some(entry.key);
            }
        }
    }

    /// Calls `f(j, rj_to_ri, r_sq)` for every particle `j` within `radius` of `point`, skipping `exclude`.
    ///
    /// `positions` must be the positions the grid was last built with.
    #[inline]
    pub fn foreach_neighbor_of_point(
        &self,
        point: Point,
        exclude: Option<usize>,
        positions: &[Point],
        radius: Real,
        mut f: impl FnMut(usize, Vector, Real),
    ) {
        if self.entries.is_empty() {
            return;
        }
        let radius_sq = radius * radius;
        let cell = self.position_to_cellpos(point);

        // Different offset cells may collide into the same bucket; each bucket is scanned only once.
        let mut visited_keys = [0 as CellKey; 27];
        let mut num_visited = 0;

        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let key = self.cell_key(cell.offset(dx, dy, dz));
                    if visited_keys[..num_visited].contains(&key) {
                        continue;
                    }
                    visited_keys[num_visited] = key;
                    num_visited += 1;

                    let first = match self.first_index(key) {
                        Some(first) => first,
                        None => continue,
                    };
                    for entry in self.entries[first..].iter().take_while(|entry| entry.key == key) {
                        let j = entry.pidx as usize;
                        if Some(j) == exclude {
                            continue;
                        }
                        let rj_to_ri = point - positions[j];
                        let r_sq = rj_to_ri.magnitude2();
                        if r_sq <= radius_sq {
                            f(j, rj_to_ri, r_sq);
                        }
                    }
                }
            }
        }
    }

    /// Calls `f(j, rj_to_ri, r_sq)` for every particle `j != i` within `radius` of particle `i`.
    #[inline]
    pub fn foreach_neighbor(&self, i: usize, positions: &[Point], radius: Real, f: impl FnMut(usize, Vector, Real)) {
        self.foreach_neighbor_of_point(positions[i], Some(i), positions, radius, f)
    }

    /// Number of particles in the buckets scanned for particle `i`, before the distance check.
    pub fn potential_neighbor_count(&self, i: usize, positions: &[Point]) -> usize {
        let mut count = 0;
        self.foreach_neighbor_of_point(positions[i], Some(i), positions, Real::INFINITY, |_, _, _| count += 1);
        count
    }
}
