use std::collections::HashSet;
use std::hash::Hash;

use crate::core::Aabb;

use super::*;

impl<T> SpatialHash<T> {
    // === Occupancy ===

    pub fn count_at(&self, pos: Vec2) -> usize {
        let (i, j) = self.chunk_of(pos);
        self.count_in_chunk(i, j)
    }

    pub fn count_in_chunk(&self, i: u32, j: u32) -> usize {
        self.count_at_index(self.chunk_index(i, j))
    }

    pub fn count_at_index(&self, idx: usize) -> usize {
        self.buckets.get(&idx).map_or(0, Vec::len)
    }

    /// True once the chunk holding `pos` has at most one free slot left.
    pub fn is_full(&self, pos: Vec2) -> bool {
        self.count_at(pos) >= self.max_per_chunk.saturating_sub(1)
    }
}

impl<T: Clone + Eq + Hash> SpatialHash<T> {
    // === Broad-phase queries ===

    /// Every distinct item stored in a chunk that `aabb` overlaps.
    /// Candidates only: callers run their own narrow-phase test.
    pub fn query_box(&self, aabb: Aabb) -> Vec<T> {
        let aabb = aabb.normalized();
        let (i0, j0) = self.chunk_of(aabb.min);
        let (i1, j1) = self.chunk_of(aabb.max);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for i in i0..=i1 {
            for j in j0..=j1 {
                for item in self.chunk_contents(self.chunk_index(i, j)) {
                    if seen.insert(item.clone()) {
                        out.push(item.clone());
                    }
                }
            }
        }
        out
    }

    /// Candidates within `radius` of `center` (chunk granularity).
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<T> {
        self.query_box(Aabb::around(center, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_deduplicates_box_items() {
        let mut hash: SpatialHash<u32> = SpatialHash::new(10, None, 5.0);
        hash.insert_box(1, Aabb::new(Vec2::new(-1.5, -1.5), Vec2::new(1.5, 1.5)));
        hash.insert(2, Vec2::new(0.2, 0.2));
        hash.insert(3, Vec2::new(4.9, 4.9));

        let mut found = hash.query_radius(Vec2::new(0.0, 0.0), 0.5);
        found.sort();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn unbounded_chunks_are_never_full() {
        let mut hash: SpatialHash<u32> = SpatialHash::new(1, None, 1.0);
        for i in 0..1000 {
            hash.insert(i, Vec2::zero());
        }
        assert!(!hash.is_full(Vec2::zero()));
        assert_eq!(hash.count_at(Vec2::zero()), 1000);
    }
}
