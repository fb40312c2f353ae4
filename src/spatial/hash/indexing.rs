use super::*;

impl<T> SpatialHash<T> {
    // === Index conversion ===

    /// Chunk coordinates of a world position, clamped into `[0, resolution)`.
    #[inline]
    pub fn chunk_of(&self, pos: Vec2) -> (u32, u32) {
        (self.chunk_axis(pos.x), self.chunk_axis(pos.y))
    }

    #[inline]
    fn chunk_axis(&self, v: f32) -> u32 {
        let cell = ((v + self.world_radius) / self.chunk_size).floor();
        // NaN casts to 0
        (cell as i64).clamp(0, self.resolution as i64 - 1) as u32
    }

    /// Folded bucket key for chunk `(i, j)`.
    #[inline]
    pub fn chunk_index(&self, i: u32, j: u32) -> usize {
        i as usize * self.resolution as usize + j as usize
    }

    #[inline]
    pub fn chunk_coords(&self, idx: usize) -> (u32, u32) {
        let res = self.resolution as usize;
        ((idx / res) as u32, (idx % res) as u32)
    }

    /// World-space lower corner of chunk `(i, j)`.
    pub fn chunk_origin(&self, i: u32, j: u32) -> Vec2 {
        self.origin() + Vec2::new(i as f32 * self.chunk_size, j as f32 * self.chunk_size)
    }
}
