//! Reference backend: plain circles in a fluid.
//!
//! Integration is semi-implicit Euler. Joints are solved as position
//! constraints, contacts as mass-weighted separation plus a restitution
//! impulse. Good enough to drive the world in tests and in the browser demo;
//! a real rigid-body engine can take its place behind [`PhysicsBackend`].

mod body;
mod contacts;
mod integrate;
mod solver;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tracing::warn;

use crate::config::PhysicsConfig;
use crate::domain::{BodyId, BodyKind, JointId};
use crate::spatial::SpatialHash;
use crate::systems::body::{BodyRegistry, Particle};
use crate::systems::joints::Joining;

use super::{BackendCounts, BackendError, JointBackend, PhysicsBackend, WorldBoundary};

pub use body::KinematicBody;

/// Backend-side copy of a live joint.
#[derive(Clone, Debug)]
pub(super) struct BackendJoint {
    pub(super) joining: Joining,
    pub(super) length: f32,
}

pub struct KinematicBackend {
    config: PhysicsConfig,
    boundary: WorldBoundary,
    joints: HashMap<JointId, BackendJoint>,
    broadphase: SpatialHash<BodyId>,
    contacts: usize,
}

impl KinematicBackend {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            config: config.clone(),
            boundary: WorldBoundary::default(),
            joints: HashMap::new(),
            broadphase: SpatialHash::new(config.spatial_resolution, None, config.world_radius),
            contacts: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn boundary(&self) -> &WorldBoundary {
        &self.boundary
    }

    pub fn joint_ids(&self) -> impl Iterator<Item = JointId> + '_ {
        self.joints.keys().copied()
    }
}

impl JointBackend for KinematicBackend {
    fn natural_gap(&self, radius_a: f32, radius_b: f32) -> f32 {
        (radius_a + radius_b) * self.config.joint_gap_factor
    }

    fn create_joint(&mut self, joining: &Joining, ideal_length: f32) {
        self.joints.insert(
            joining.id(),
            BackendJoint { joining: joining.clone(), length: ideal_length },
        );
    }

    fn destroy_joint(&mut self, id: JointId) {
        self.joints.remove(&id);
    }

    fn joint_length(&self, id: JointId) -> Option<f32> {
        self.joints.get(&id).map(|j| j.length)
    }

    fn resize_joint(&mut self, id: JointId, length: f32) {
        if let Some(joint) = self.joints.get_mut(&id) {
            joint.length = length;
        }
    }
}

impl PhysicsBackend for KinematicBackend {
    type Body = KinematicBody;

    fn new_body(&self, id: BodyId, kind: BodyKind) -> KinematicBody {
        KinematicBody::new(id, kind, &self.config)
    }

    fn register_static_bodies(&mut self, boundary: &WorldBoundary) {
        self.boundary = boundary.clone();
    }

    fn step_physics(
        &mut self,
        bodies: &BodyRegistry<KinematicBody>,
        delta: f32,
    ) -> Result<(), BackendError> {
        if delta <= 0.0 {
            return Ok(());
        }
        let live: Vec<_> = bodies.snapshot().into_iter().filter(|b| !b.is_dead()).collect();

        self.integrate(&live, bodies, delta);
        self.solve_joints(bodies, delta);
        self.contacts = self.resolve_contacts(&live, bodies);
        self.sense(&live, bodies);

        for body in &live {
            let s = body.core().state();
            if !(s.pos.is_finite() && s.vel.is_finite() && s.angle.is_finite()) {
                warn!(body = %body.id(), "body state blew up");
                return Err(BackendError::NumericalBlowUp { body: body.id() });
            }
        }
        Ok(())
    }

    fn release_body(&mut self, body: &KinematicBody) {
        let id = body.id();
        self.joints.retain(|joint, _| !joint.contains(id));
    }

    fn counts(&self) -> BackendCounts {
        BackendCounts {
            joints: self.joints.len(),
            contacts: self.contacts,
            obstacles: self.boundary.obstacles.len(),
        }
    }
}
