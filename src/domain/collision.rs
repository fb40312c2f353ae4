use serde::{Deserialize, Serialize};

use crate::core::Vec2;

use super::ids::BodyId;

/// What a body touched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ContactTarget {
    Body(BodyId),
    /// The world's outer wall.
    Boundary,
    /// A static obstacle registered with the backend.
    Static(u32),
}

/// One contact gathered during the last step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub other: ContactTarget,
    pub point: Vec2,
}

impl Collision {
    pub fn new(other: ContactTarget, point: Vec2) -> Self {
        Self { other, point }
    }

    pub fn other_body(&self) -> Option<BodyId> {
        match self.other {
            ContactTarget::Body(id) => Some(id),
            _ => None,
        }
    }
}
