//! Shared body state behind the [`Particle`](super::Particle) trait.
//!
//! Every field is interior-mutable so agents on other threads can push forces,
//! grow the body or kill it while the simulation thread holds an `Arc` to it.
//! Locks here are leaf locks: nothing else is acquired while one is held.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::core::{circle_area, point_in_circle, Aabb, Vec2};
use crate::domain::{BodyId, BodyKind, CauseOfDeath, Collision, JointId};
use crate::error::{KineticsError, KineticsResult};

/// Kinematic + dynamic state of one body, plus this step's accumulators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub radius: f32,
    pub mass_density: f32,
    /// Sensor reach; only used once ranged interaction is enabled.
    pub interaction_radius: f32,
    #[serde(skip)]
    pub force: Vec2,
    #[serde(skip)]
    pub impulse: Vec2,
    #[serde(skip)]
    pub torque: f32,
}

impl BodyState {
    pub fn at_rest(radius: f32, mass_density: f32) -> Self {
        Self {
            pos: Vec2::zero(),
            vel: Vec2::zero(),
            angle: 0.0,
            angular_vel: 0.0,
            radius,
            mass_density,
            interaction_radius: 0.0,
            force: Vec2::zero(),
            impulse: Vec2::zero(),
            torque: 0.0,
        }
    }

    pub fn mass(&self) -> f32 {
        circle_area(self.radius) * self.mass_density
    }

    /// Hand over the accumulators and zero them. Backends call this under the
    /// same lock that integrates the result, so nothing applied concurrently
    /// is lost.
    pub fn take_accumulated(&mut self) -> Accumulated {
        Accumulated {
            force: std::mem::take(&mut self.force),
            impulse: std::mem::take(&mut self.impulse),
            torque: std::mem::take(&mut self.torque),
        }
    }
}

/// Forces gathered since the backend last integrated the body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accumulated {
    pub force: Vec2,
    pub impulse: Vec2,
    pub torque: f32,
}

type UserData = Arc<dyn Any + Send + Sync>;

pub struct BodyCore {
    id: BodyId,
    kind: BodyKind,
    radius_range: (f32, f32),
    state: Mutex<BodyState>,
    dead: AtomicBool,
    disposed: AtomicBool,
    cause_of_death: Mutex<Option<CauseOfDeath>>,
    /// other body id -> joint id
    joinings: RwLock<HashMap<BodyId, JointId>>,
    contacts: Mutex<Vec<Collision>>,
    interactions: Mutex<Vec<BodyId>>,
    user_data: RwLock<Option<UserData>>,
    ranged: AtomicBool,
}

impl BodyCore {
    pub fn new(id: BodyId, kind: BodyKind, config: &PhysicsConfig) -> Self {
        let radius = config.min_radius;
        Self {
            id,
            kind,
            radius_range: (config.min_radius, config.max_radius),
            state: Mutex::new(BodyState::at_rest(radius, config.default_mass_density)),
            dead: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            cause_of_death: Mutex::new(None),
            joinings: RwLock::new(HashMap::new()),
            contacts: Mutex::new(Vec::new()),
            interactions: Mutex::new(Vec::new()),
            user_data: RwLock::new(None),
            ranged: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    // === Lifecycle ===

    pub fn is_dead(&self) -> bool {
        self.dead.load(Ordering::Acquire)
    }

    /// Mark dead. Resources are released at the next reap, not here.
    /// The first recorded cause wins.
    pub fn kill(&self, cause: CauseOfDeath) {
        {
            let mut slot = self.cause_of_death.lock();
            if slot.is_none() {
                *slot = Some(cause);
            }
        }
        self.dead.store(true, Ordering::Release);
    }

    pub fn cause_of_death(&self) -> Option<CauseOfDeath> {
        *self.cause_of_death.lock()
    }

    /// Returns `true` only for the call that performed the transition.
    pub fn mark_disposed(&self) -> bool {
        !self.disposed.swap(true, Ordering::AcqRel)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    // === Kinematics ===

    /// Copy of the full state.
    pub fn state(&self) -> BodyState {
        *self.state.lock()
    }

    /// Mutate state under the body lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut BodyState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn pos(&self) -> Vec2 {
        self.state.lock().pos
    }

    pub fn set_pos(&self, pos: Vec2) {
        self.state.lock().pos = pos;
    }

    pub fn vel(&self) -> Vec2 {
        self.state.lock().vel
    }

    pub fn set_vel(&self, vel: Vec2) {
        self.state.lock().vel = vel;
    }

    pub fn speed(&self) -> f32 {
        self.vel().length()
    }

    pub fn angle(&self) -> f32 {
        self.state.lock().angle
    }

    pub fn set_angle(&self, angle: f32) {
        self.state.lock().angle = angle;
    }

    pub fn angular_vel(&self) -> f32 {
        self.state.lock().angular_vel
    }

    pub fn set_angular_vel(&self, angular_vel: f32) {
        self.state.lock().angular_vel = angular_vel;
    }

    // === Size and mass ===

    pub fn radius(&self) -> f32 {
        self.state.lock().radius
    }

    /// Clamped into the configured radius range. Mass follows.
    pub fn set_radius(&self, radius: f32) {
        let (min, max) = self.radius_range;
        self.state.lock().radius = radius.max(min).min(max);
    }

    pub fn mass_density(&self) -> f32 {
        self.state.lock().mass_density
    }

    pub fn set_mass_density(&self, density: f32) {
        self.state.lock().mass_density = density.max(0.0);
    }

    pub fn mass(&self) -> f32 {
        self.state.lock().mass()
    }

    pub fn mass_if_radius(&self, radius: f32) -> f32 {
        circle_area(radius) * self.mass_density()
    }

    pub fn area(&self) -> f32 {
        circle_area(self.radius())
    }

    pub fn bounding_box(&self) -> Aabb {
        let s = self.state.lock();
        Aabb::around(s.pos, s.radius)
    }

    pub fn point_inside(&self, p: Vec2) -> bool {
        let s = self.state.lock();
        point_in_circle(s.pos, s.radius, p)
    }

    // === Accumulators ===

    pub fn apply_force(&self, force: Vec2) {
        self.state.lock().force += force;
    }

    pub fn apply_impulse(&self, impulse: Vec2) {
        self.state.lock().impulse += impulse;
    }

    pub fn apply_torque(&self, torque: f32) {
        self.state.lock().torque += torque;
    }

    pub fn accumulated(&self) -> Accumulated {
        let s = self.state.lock();
        Accumulated { force: s.force, impulse: s.impulse, torque: s.torque }
    }

    pub fn take_accumulated(&self) -> Accumulated {
        self.state.lock().take_accumulated()
    }

    pub fn clear_accumulators(&self) {
        self.take_accumulated();
    }

    // === Joined bodies ===

    pub fn register_joining(&self, other: BodyId, joint: JointId) {
        self.joinings.write().insert(other, joint);
    }

    pub fn deregister_joining(&self, other: BodyId) -> Option<JointId> {
        self.joinings.write().remove(&other)
    }

    /// O(1) "already joined to `other`?" check.
    pub fn joint_with(&self, other: BodyId) -> Option<JointId> {
        self.joinings.read().get(&other).copied()
    }

    pub fn joined_ids(&self) -> Vec<(BodyId, JointId)> {
        self.joinings.read().iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn attached_count(&self) -> usize {
        self.joinings.read().len()
    }

    // === Contacts ===

    pub fn contacts(&self) -> Vec<Collision> {
        self.contacts.lock().clone()
    }

    pub fn add_contact(&self, collision: Collision) {
        self.contacts.lock().push(collision);
    }

    /// Forget every contact with `other`.
    pub fn end_contact(&self, other: BodyId) {
        self.contacts.lock().retain(|c| c.other_body() != Some(other));
    }

    pub fn clear_contacts(&self) {
        self.contacts.lock().clear();
    }

    pub fn retain_contacts(&self, keep: impl FnMut(&Collision) -> bool) {
        self.contacts.lock().retain(keep);
    }

    // === Ranged interaction ===

    pub fn enable_ranged_interaction(&self) {
        self.ranged.store(true, Ordering::Release);
    }

    pub fn can_interact_at_range(&self) -> bool {
        self.ranged.load(Ordering::Acquire)
    }

    pub fn set_ranged_interaction_radius(&self, radius: f32) {
        self.state.lock().interaction_radius = radius.max(0.0);
    }

    pub fn interaction_radius(&self) -> f32 {
        self.state.lock().interaction_radius
    }

    pub fn add_interacting(&self, other: BodyId) {
        let mut queue = self.interactions.lock();
        if !queue.contains(&other) {
            queue.push(other);
        }
    }

    pub fn remove_interacting(&self, other: BodyId) {
        self.interactions.lock().retain(|id| *id != other);
    }

    pub fn interactions(&self) -> Vec<BodyId> {
        self.interactions.lock().clone()
    }

    pub fn retain_interactions(&self, keep: impl FnMut(&BodyId) -> bool) {
        self.interactions.lock().retain(keep);
    }

    // === User data ===

    /// Attach the owning entity. Replaces any previous owner.
    pub fn set_user_data(&self, data: UserData) {
        *self.user_data.write() = Some(data);
    }

    pub fn clear_user_data(&self) -> Option<UserData> {
        self.user_data.write().take()
    }

    pub fn user_data_any(&self) -> Option<UserData> {
        self.user_data.read().clone()
    }

    /// Typed access to the owner. Asking for the wrong type is a caller bug.
    pub fn user_data<T: Any + Send + Sync>(&self) -> KineticsResult<Arc<T>> {
        let data = self
            .user_data_any()
            .ok_or(KineticsError::MissingUserData(self.id))?;
        data.downcast::<T>().map_err(|_| KineticsError::UserDataType {
            body: self.id,
            expected: std::any::type_name::<T>(),
        })
    }
}

impl std::fmt::Debug for BodyCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyCore")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("dead", &self.is_dead())
            .finish()
    }
}
