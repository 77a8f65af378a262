pub mod sph;
pub mod units;
