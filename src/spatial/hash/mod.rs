//! Spatial Hash - uniform chunk grid over the world disc.
//!
//! The grid origin is the world's negative corner `(-R, -R)` and
//! `resolution` chunks span the full diameter `2R` on each axis.
//! Chunk `(i, j)` is stored under the folded key `i * resolution + j`.
//!
//! Buckets are only allocated once touched and are never freed by
//! [`SpatialHash::clear`], so a per-tick rebuild does not churn the allocator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::Vec2;

mod indexing;
mod insert;
mod query;

/// The persisted shape of a spatial hash.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialConfig {
    pub resolution: u32,
    pub max_per_chunk: Option<usize>,
    pub world_radius: f32,
}

/// Uniform grid mapping points and boxes to chunk buckets.
#[derive(Clone, Debug)]
pub struct SpatialHash<T> {
    resolution: u32,
    chunk_size: f32,
    world_radius: f32,
    /// `usize::MAX` when unbounded
    max_per_chunk: usize,
    buckets: HashMap<usize, Vec<T>>,
    size: usize,
    rejected: usize,
}

impl<T> SpatialHash<T> {
    /// Create a grid of `resolution x resolution` chunks covering a world of
    /// radius `world_radius`. `max_per_chunk = None` means unbounded.
    pub fn new(resolution: u32, max_per_chunk: Option<usize>, world_radius: f32) -> Self {
        let resolution = resolution.max(1);
        Self {
            resolution,
            chunk_size: 2.0 * world_radius / resolution as f32,
            world_radius,
            max_per_chunk: max_per_chunk.unwrap_or(usize::MAX),
            buckets: HashMap::new(),
            size: 0,
            rejected: 0,
        }
    }

    pub fn from_config(config: &SpatialConfig) -> Self {
        Self::new(config.resolution, config.max_per_chunk, config.world_radius)
    }

    pub fn config(&self) -> SpatialConfig {
        SpatialConfig {
            resolution: self.resolution,
            max_per_chunk: self.chunk_capacity(),
            world_radius: self.world_radius,
        }
    }

    /// Number of stored references (an item spanning 4 chunks counts 4 times).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insertions refused since the last clear.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn world_radius(&self) -> f32 {
        self.world_radius
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(-self.world_radius, -self.world_radius)
    }

    pub fn chunk_capacity(&self) -> Option<usize> {
        if self.max_per_chunk == usize::MAX {
            None
        } else {
            Some(self.max_per_chunk)
        }
    }

    pub fn total_capacity(&self) -> Option<usize> {
        let chunks = (self.resolution as usize) * (self.resolution as usize);
        self.chunk_capacity().map(|c| c.saturating_mul(chunks))
    }

    /// Keys of every bucket ever touched (including currently empty ones).
    pub fn chunk_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    pub fn chunk_contents(&self, idx: usize) -> &[T] {
        self.buckets.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Each non-empty bucket exactly once, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.buckets
            .values()
            .filter(|bucket| !bucket.is_empty())
            .map(Vec::as_slice)
    }

    /// Empty every bucket, keeping the storage.
    pub fn clear(&mut self) {
        self.buckets.values_mut().for_each(Vec::clear);
        self.size = 0;
        self.rejected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Aabb;

    fn scenario_hash() -> SpatialHash<u32> {
        SpatialHash::new(100, None, 10.0)
    }

    #[test]
    fn point_lands_in_expected_chunk() {
        let mut hash = scenario_hash();
        assert!((hash.chunk_size() - 0.2).abs() < 1e-6);
        assert_eq!(hash.chunk_of(Vec2::new(0.05, 0.05)), (50, 50));
        assert!(hash.insert(1, Vec2::new(0.05, 0.05)));
        assert_eq!(hash.count_in_chunk(50, 50), 1);
    }

    #[test]
    fn box_spans_nine_chunks() {
        let mut hash = scenario_hash();
        let aabb = Aabb::new(Vec2::new(-0.15, -0.15), Vec2::new(0.25, 0.25));
        assert!(hash.insert_box(7, aabb));
        assert_eq!(hash.iter().count(), 9);
        for i in 49..=51 {
            for j in 49..=51 {
                assert_eq!(hash.count_in_chunk(i, j), 1, "chunk ({i}, {j})");
            }
        }
    }

    #[test]
    fn reversed_box_corners_are_normalized() {
        let mut hash = scenario_hash();
        let aabb = Aabb::new(Vec2::new(0.25, 0.25), Vec2::new(-0.15, -0.15));
        assert!(hash.insert_box(7, aabb));
        assert_eq!(hash.size(), 9);
    }

    #[test]
    fn full_bucket_rejects_without_panicking() {
        let mut hash: SpatialHash<u32> = SpatialHash::new(4, Some(2), 1.0);
        let p = Vec2::new(0.1, 0.1);
        assert!(!hash.is_full(p));
        assert!(hash.insert(1, p));
        assert!(hash.is_full(p));
        assert!(hash.insert(2, p));
        assert!(!hash.insert(3, p));
        assert_eq!(hash.count_at(p), 2);
        assert_eq!(hash.rejected(), 1);
    }

    #[test]
    fn clear_keeps_buckets_but_drops_items() {
        let mut hash = scenario_hash();
        hash.insert(1, Vec2::new(0.0, 0.0));
        hash.insert(2, Vec2::new(5.0, 5.0));
        let touched = hash.chunk_indices().count();
        hash.clear();
        assert!(hash.is_empty());
        assert_eq!(hash.iter().count(), 0);
        assert_eq!(hash.chunk_indices().count(), touched);
    }

    #[test]
    fn points_outside_world_clamp_to_edge_chunks() {
        let hash = scenario_hash();
        assert_eq!(hash.chunk_of(Vec2::new(-50.0, 50.0)), (0, 99));
        assert_eq!(hash.chunk_of(Vec2::new(10.0, -10.0)), (99, 0));
    }

    #[test]
    fn duplicate_insert_is_stored_once() {
        let mut hash = scenario_hash();
        assert!(hash.insert(4, Vec2::new(1.0, 1.0)));
        assert!(hash.insert(4, Vec2::new(1.01, 1.01)));
        assert_eq!(hash.size(), 1);
    }
}
