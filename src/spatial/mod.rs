//! Spatial partitioning for proximity queries.

pub mod hash;

pub use hash::{SpatialConfig, SpatialHash};
