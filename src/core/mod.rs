//! Core math shared by every subsystem.

pub mod geometry;
pub mod vec2;

pub use geometry::{circle_area, point_in_circle, Aabb};
pub use vec2::Vec2;
