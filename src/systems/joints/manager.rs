//! JointsManager - the live joint set of one world.
//!
//! Structural changes are never applied in place. Agents enqueue adds and
//! removals from any thread; the simulation thread applies them at
//! [`flush`](JointsManager::flush). Lock order is pending adds, then live
//! joints, then pending removals. Body locks are always taken last.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::config::PhysicsConfig;
use crate::domain::{BodyId, JointId};
use crate::systems::body::{BodyLookup, Particle};

use super::Joining;

/// Break and regrow thresholds, copied out of the config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimits {
    pub max_length_factor: f32,
    pub regrow_tolerance: f32,
}

impl JointLimits {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            max_length_factor: config.max_length_factor,
            regrow_tolerance: config.regrow_tolerance,
        }
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

pub struct JointsManager {
    pub(super) joinings: RwLock<HashMap<JointId, Joining>>,
    pub(super) pending_adds: Mutex<Vec<Joining>>,
    pub(super) pending_removals: Mutex<Vec<JointId>>,
    pub(super) limits: JointLimits,
}

impl JointsManager {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self::with_limits(JointLimits::from_config(config))
    }

    pub fn with_limits(limits: JointLimits) -> Self {
        Self {
            joinings: RwLock::new(HashMap::new()),
            pending_adds: Mutex::new(Vec::new()),
            pending_removals: Mutex::new(Vec::new()),
            limits,
        }
    }

    pub fn limits(&self) -> JointLimits {
        self.limits
    }

    // === Requests ===

    /// Queue a new joint. Returns `false` without side effects if the pair is
    /// already live or queued either way, if it joins a body to itself, or if
    /// an endpoint is gone. On success both bodies see each other in their
    /// joined maps straight away.
    pub fn create_joint<L: BodyLookup>(&self, joining: Joining, bodies: &L) -> bool {
        let (a, b) = (joining.body_a(), joining.body_b());
        if a == b {
            return false;
        }
        let (Some(body_a), Some(body_b)) = (bodies.lookup(a), bodies.lookup(b)) else {
            return false;
        };
        if body_a.is_dead() || body_b.is_dead() {
            return false;
        }

        let id = joining.id();
        let mut adds = self.pending_adds.lock();
        let live = self.joinings.read();
        let removals = self.pending_removals.lock();
        if live.contains_key(&id) || removals.contains(&id) || adds.iter().any(|j| j.id() == id) {
            return false;
        }

        body_a.core().register_joining(b, id);
        body_b.core().register_joining(a, id);
        adds.push(joining);
        trace!(joint = %id, "joint requested");
        true
    }

    /// Ask for a joint to go away. A live joint is deregistered from its
    /// bodies now and erased at the next flush; a joint still waiting to be
    /// added is simply dropped from the queue. Returns `false` if there was
    /// nothing to remove or the removal was already queued.
    pub fn request_removal<L: BodyLookup>(&self, id: JointId, bodies: &L) -> bool {
        let mut adds = self.pending_adds.lock();
        if let Some(pos) = adds.iter().position(|j| j.id() == id) {
            let joining = adds.swap_remove(pos);
            deregister(&joining, bodies);
            trace!(joint = %id, "queued joint cancelled");
            return true;
        }

        let live = self.joinings.read();
        let mut removals = self.pending_removals.lock();
        let Some(joining) = live.get(&id) else {
            return false;
        };
        if removals.contains(&id) {
            return false;
        }
        deregister(joining, bodies);
        removals.push(id);
        trace!(joint = %id, "joint removal requested");
        true
    }

    // === Queries ===

    /// Live map only: a joint queued this tick reads as not joined until
    /// the next flush.
    pub fn are_joined(&self, a: BodyId, b: BodyId) -> bool {
        self.joinings.read().contains_key(&JointId::of(a, b))
    }

    pub fn is_live(&self, id: JointId) -> bool {
        self.joinings.read().contains_key(&id)
    }

    /// Live map first, then the pending adds.
    pub fn joining(&self, id: JointId) -> Option<Joining> {
        let adds = self.pending_adds.lock();
        if let Some(j) = self.joinings.read().get(&id) {
            return Some(j.clone());
        }
        adds.iter().find(|j| j.id() == id).cloned()
    }

    /// Snapshot of every live joining.
    pub fn joinings(&self) -> Vec<Joining> {
        self.joinings.read().values().cloned().collect()
    }

    /// Live joinings minus those already queued for removal. This is the
    /// set that survives the next flush.
    pub fn active_joinings(&self) -> Vec<Joining> {
        let live = self.joinings.read();
        let removals = self.pending_removals.lock();
        live.values().filter(|j| !removals.contains(&j.id())).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.joinings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.joinings.read().is_empty()
    }

    pub fn pending_adds(&self) -> usize {
        self.pending_adds.lock().len()
    }

    pub fn pending_removals(&self) -> usize {
        self.pending_removals.lock().len()
    }
}

/// Drop the pair from both bodies' joined maps, if they still exist.
pub(super) fn deregister<L: BodyLookup>(joining: &Joining, bodies: &L) {
    let (a, b) = (joining.body_a(), joining.body_b());
    if let Some(body) = bodies.lookup(a) {
        body.core().deregister_joining(b);
    }
    if let Some(body) = bodies.lookup(b) {
        body.core().deregister_joining(a);
    }
}

pub(super) fn register<L: BodyLookup>(joining: &Joining, bodies: &L) {
    let (a, b) = (joining.body_a(), joining.body_b());
    let id = joining.id();
    if let Some(body) = bodies.lookup(a) {
        body.core().register_joining(b, id);
    }
    if let Some(body) = bodies.lookup(b) {
        body.core().register_joining(a, id);
    }
}
