//! Small geometric helpers shared by the spatial index and the backends.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

#[inline]
pub fn circle_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

/// Axis-aligned bounding box. Corners may be given in any order;
/// [`Aabb::normalized`] puts them back in min/max order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: Vec2::new(center.x - radius, center.y - radius),
            max: Vec2::new(center.x + radius, center.y + radius),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(self.max.x), self.min.y.min(self.max.y)),
            max: Vec2::new(self.min.x.max(self.max.x), self.min.y.max(self.max.y)),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[inline]
pub fn point_in_circle(center: Vec2, radius: f32, p: Vec2) -> bool {
    p.distance_squared(center) < radius * radius
}
