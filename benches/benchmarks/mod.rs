pub mod smoothing_kernel;
pub mod spatial_hash;
pub mod update_densities;
