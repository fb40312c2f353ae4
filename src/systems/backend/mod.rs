//! Physics backend contract.
//!
//! The world owns bookkeeping (ids, joints, reaping, spatial index); a backend
//! owns integration. It builds concrete bodies, advances them, delivers
//! contacts before `step_physics` returns, and mirrors the joint set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, JointId};
use crate::systems::body::{BodyRegistry, Particle};
use crate::systems::joints::Joining;

pub mod kinematic;

pub use kinematic::{KinematicBackend, KinematicBody};

/// Failure inside a backend step. Treated as fatal by the world.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("non-finite state on body {body}")]
    NumericalBlowUp { body: BodyId },
    #[error("{0}")]
    Other(String),
}

/// A static circular obstacle (rock) inside the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticObstacle {
    pub id: u32,
    pub center: Vec2,
    pub radius: f32,
}

/// Everything static a backend should collide against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBoundary {
    /// Radius of the enclosing wall. `None` = open world.
    pub radius: Option<f32>,
    pub obstacles: Vec<StaticObstacle>,
}

impl WorldBoundary {
    pub fn disc(radius: f32) -> Self {
        Self { radius: Some(radius), obstacles: Vec::new() }
    }

    pub fn with_obstacle(mut self, center: Vec2, radius: f32) -> Self {
        let id = self.obstacles.len() as u32;
        self.obstacles.push(StaticObstacle { id, center, radius });
        self
    }
}

/// Joint side of a backend: whatever it needs to simulate constraints.
pub trait JointBackend {
    /// Natural surface-to-surface separation of a joined pair.
    fn natural_gap(&self, radius_a: f32, radius_b: f32) -> f32;

    /// Instantiate the backend joint for an accepted joining.
    fn create_joint(&mut self, joining: &Joining, ideal_length: f32);

    /// Release the backend joint. Unknown ids are ignored.
    fn destroy_joint(&mut self, id: JointId);

    /// Current rest length of the backend joint, if it exists.
    fn joint_length(&self, id: JointId) -> Option<f32>;

    fn resize_joint(&mut self, id: JointId, length: f32);
}

/// Counters a backend reports for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackendCounts {
    pub joints: usize,
    pub contacts: usize,
    pub obstacles: usize,
}

pub trait PhysicsBackend: JointBackend + Send + Sync + 'static {
    type Body: Particle;

    /// Build a concrete body. The world assigns `id` and registers it.
    fn new_body(&self, id: BodyId, kind: BodyKind) -> Self::Body;

    fn register_static_bodies(&mut self, boundary: &WorldBoundary);

    /// Advance every live body by `delta` seconds. Contacts for this step must
    /// be on the bodies before this returns.
    fn step_physics(
        &mut self,
        bodies: &BodyRegistry<Self::Body>,
        delta: f32,
    ) -> Result<(), BackendError>;

    /// Drop backend resources tied to a reaped body.
    fn release_body(&mut self, _body: &Self::Body) {}

    fn counts(&self) -> BackendCounts {
        BackendCounts::default()
    }
}
