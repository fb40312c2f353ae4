//! Joining - a symmetric link between two bodies.
//!
//! Each endpoint either tracks the body's centre or a fixed point on its rim,
//! given as an angle relative to the body's own orientation. Endpoints are
//! held by id and resolved on demand, so a joining never keeps a dead body
//! alive and every resolution has to handle absence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Vec2;
use crate::domain::{BodyId, JointId};
use crate::error::{KineticsError, KineticsResult};
use crate::systems::backend::JointBackend;
use crate::systems::body::{BodyLookup, Particle};

/// Backend hint for how the joint should behave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JointKind {
    /// Upper bound on separation only.
    Rope,
    /// Spring-like joint. A zero frequency means rigid.
    #[serde(rename_all = "camelCase")]
    Distance { damping_ratio: f32, frequency_hz: f32 },
}

impl Default for JointKind {
    fn default() -> Self {
        JointKind::Rope
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Joining {
    body_a: BodyId,
    body_b: BodyId,
    anchor_angle_a: f32,
    anchor_angle_b: f32,
    anchored_a: bool,
    anchored_b: bool,
    #[serde(default)]
    kind: JointKind,
}

impl Joining {
    /// Centre-to-centre link.
    pub fn centres(a: BodyId, b: BodyId) -> Self {
        Self {
            body_a: a,
            body_b: b,
            anchor_angle_a: 0.0,
            anchor_angle_b: 0.0,
            anchored_a: false,
            anchored_b: false,
            kind: JointKind::Rope,
        }
    }

    /// Rim-to-rim link at the given body-relative angles.
    pub fn anchored(a: BodyId, b: BodyId, anchor_angle_a: f32, anchor_angle_b: f32) -> Self {
        Self {
            anchor_angle_a,
            anchor_angle_b,
            anchored_a: true,
            anchored_b: true,
            ..Self::centres(a, b)
        }
    }

    pub fn with_kind(mut self, kind: JointKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id(&self) -> JointId {
        JointId::of(self.body_a, self.body_b)
    }

    pub fn body_a(&self) -> BodyId {
        self.body_a
    }

    pub fn body_b(&self) -> BodyId {
        self.body_b
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn anchored_a(&self) -> bool {
        self.anchored_a
    }

    pub fn anchored_b(&self) -> bool {
        self.anchored_b
    }

    pub fn anchor_angle_a(&self) -> f32 {
        self.anchor_angle_a
    }

    pub fn anchor_angle_b(&self) -> f32 {
        self.anchor_angle_b
    }

    /// Both endpoints on the rim.
    pub fn is_peer_to_peer(&self) -> bool {
        self.anchored_a && self.anchored_b
    }

    pub fn not_anchored(&self) -> bool {
        !self.anchored_a && !self.anchored_b
    }

    pub fn involves(&self, id: BodyId) -> bool {
        self.body_a == id || self.body_b == id
    }

    /// The other endpoint's id. Asking with a non-member is a caller bug.
    pub fn other_id(&self, id: BodyId) -> KineticsResult<BodyId> {
        if id == self.body_a {
            Ok(self.body_b)
        } else if id == self.body_b {
            Ok(self.body_a)
        } else {
            Err(KineticsError::NotAMember { body: id, joint: self.id() })
        }
    }

    // === Endpoint resolution ===

    pub fn particle_a<L: BodyLookup>(&self, bodies: &L) -> Option<Arc<L::Body>> {
        bodies.lookup(self.body_a)
    }

    pub fn particle_b<L: BodyLookup>(&self, bodies: &L) -> Option<Arc<L::Body>> {
        bodies.lookup(self.body_b)
    }

    /// `Err` for a non-member, `Ok(None)` if the other side is gone.
    pub fn other<L: BodyLookup>(&self, id: BodyId, bodies: &L) -> KineticsResult<Option<Arc<L::Body>>> {
        Ok(bodies.lookup(self.other_id(id)?))
    }

    /// True if either endpoint is missing or dead.
    pub fn any_died<L: BodyLookup>(&self, bodies: &L) -> bool {
        let dead = |b: Option<Arc<L::Body>>| b.map_or(true, |b| b.is_dead());
        dead(self.particle_a(bodies)) || dead(self.particle_b(bodies))
    }

    // === Anchors ===

    fn anchor_point<P: Particle>(body: &P, angle: f32, anchored: bool) -> Vec2 {
        let s = body.core().state();
        if !anchored {
            return s.pos;
        }
        s.pos + Vec2::from_angle(angle + s.angle) * s.radius
    }

    pub fn anchor_a<L: BodyLookup>(&self, bodies: &L) -> Option<Vec2> {
        self.particle_a(bodies)
            .map(|b| Self::anchor_point(&*b, self.anchor_angle_a, self.anchored_a))
    }

    pub fn anchor_b<L: BodyLookup>(&self, bodies: &L) -> Option<Vec2> {
        self.particle_b(bodies)
            .map(|b| Self::anchor_point(&*b, self.anchor_angle_b, self.anchored_b))
    }

    /// World-space anchor on `id`'s side.
    pub fn anchor_of<L: BodyLookup>(&self, id: BodyId, bodies: &L) -> KineticsResult<Option<Vec2>> {
        if id == self.body_a {
            Ok(self.anchor_a(bodies))
        } else if id == self.body_b {
            Ok(self.anchor_b(bodies))
        } else {
            Err(KineticsError::NotAMember { body: id, joint: self.id() })
        }
    }

    pub fn anchor_dist2<L: BodyLookup>(&self, bodies: &L) -> Option<f32> {
        let a = self.anchor_a(bodies)?;
        let b = self.anchor_b(bodies)?;
        Some(a.distance_squared(b))
    }

    // === Lengths ===

    /// Backend gap plus the radius of every centre-tracking endpoint.
    pub fn ideal_length<L, B>(&self, bodies: &L, backend: &B) -> Option<f32>
    where
        L: BodyLookup,
        B: JointBackend + ?Sized,
    {
        let ra = self.particle_a(bodies)?.radius();
        let rb = self.particle_b(bodies)?.radius();
        let mut len = backend.natural_gap(ra, rb);
        if !self.anchored_a {
            len += ra;
        }
        if !self.anchored_b {
            len += rb;
        }
        Some(len)
    }

    pub fn max_length<L, B>(&self, bodies: &L, backend: &B, factor: f32) -> Option<f32>
    where
        L: BodyLookup,
        B: JointBackend + ?Sized,
    {
        self.ideal_length(bodies, backend).map(|len| len * factor)
    }

    /// True when stretched past `factor * ideal`, or when an endpoint can no
    /// longer be resolved.
    pub fn max_length_exceeded<L, B>(&self, bodies: &L, backend: &B, factor: f32) -> bool
    where
        L: BodyLookup,
        B: JointBackend + ?Sized,
    {
        let Some(dist2) = self.anchor_dist2(bodies) else {
            return true;
        };
        let Some(max) = self.max_length(bodies, backend, factor) else {
            return true;
        };
        dist2 > max * max
    }
}
