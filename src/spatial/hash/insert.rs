use crate::core::Aabb;

use super::*;

impl<T: Clone + PartialEq> SpatialHash<T> {
    /// Insert `item` into the chunk containing `pos`.
    ///
    /// Returns `false` (and counts a rejection) when the chunk is at capacity.
    pub fn insert(&mut self, item: T, pos: Vec2) -> bool {
        let (i, j) = self.chunk_of(pos);
        let idx = self.chunk_index(i, j);
        self.insert_at(item, idx)
    }

    /// Insert a reference to `item` into every chunk the box overlaps.
    ///
    /// Reversed corners are normalized first. Returns `false` if at least one
    /// overlapped chunk was full; the chunks that had room keep the item.
    pub fn insert_box(&mut self, item: T, aabb: Aabb) -> bool {
        let aabb = aabb.normalized();
        let (i0, j0) = self.chunk_of(aabb.min);
        let (i1, j1) = self.chunk_of(aabb.max);

        let mut all_inserted = true;
        for i in i0..=i1 {
            for j in j0..=j1 {
                let idx = self.chunk_index(i, j);
                all_inserted &= self.insert_at(item.clone(), idx);
            }
        }
        all_inserted
    }

    /// Insert into an explicit chunk `(i, j)`.
    pub fn insert_in_chunk(&mut self, item: T, i: u32, j: u32) -> bool {
        let i = i.min(self.resolution - 1);
        let j = j.min(self.resolution - 1);
        let idx = self.chunk_index(i, j);
        self.insert_at(item, idx)
    }

    fn insert_at(&mut self, item: T, idx: usize) -> bool {
        let max = self.max_per_chunk;
        let bucket = self.buckets.entry(idx).or_default();
        if bucket.contains(&item) {
            return true;
        }
        if bucket.len() >= max {
            self.rejected += 1;
            return false;
        }
        bucket.push(item);
        self.size += 1;
        true
    }

    /// Drop every reference to `item` in the chunks `aabb` overlaps.
    /// Returns how many references were removed.
    pub fn remove_box(&mut self, item: &T, aabb: Aabb) -> usize {
        let aabb = aabb.normalized();
        let (i0, j0) = self.chunk_of(aabb.min);
        let (i1, j1) = self.chunk_of(aabb.max);

        let mut removed = 0;
        for i in i0..=i1 {
            for j in j0..=j1 {
                let idx = self.chunk_index(i, j);
                if let Some(bucket) = self.buckets.get_mut(&idx) {
                    let before = bucket.len();
                    bucket.retain(|x| x != item);
                    removed += before - bucket.len();
                }
            }
        }
        self.size -= removed;
        removed
    }
}
