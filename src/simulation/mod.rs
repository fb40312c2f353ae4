//! Physics World - owns the bodies of one simulation and drives its tick.
//!
//! Operations live in their own files and are wired in through `#[path]`
//! modules:
//! - init/      - construction and settings
//! - commands/  - body creation, joining, kills
//! - step/      - the tick: integrate, flush, reap, spatial rebuild
//! - snapshot/  - save and restore
//! - perf/      - step timing

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::config::PhysicsConfig;
use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, CauseOfDeath, JointId};
use crate::error::KineticsResult;
use crate::spatial::SpatialHash;
use crate::systems::backend::{PhysicsBackend, WorldBoundary};
use crate::systems::body::BodyRegistry;
use crate::systems::joints::{JointKind, Joining, JointsManager};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "commands/join.rs"]
mod join;
#[path = "step/step.rs"]
mod step;
#[path = "step/reap.rs"]
mod reap;
#[path = "step/rebuild_spatial.rs"]
mod rebuild_spatial;
#[path = "snapshot/snapshot.rs"]
pub mod snapshot;

pub use perf_stats::PerfStats;
pub use snapshot::{BodySnapshot, WorldSnapshot};
pub use step::StepReport;

pub(crate) use perf_timer::PerfTimer;

pub struct PhysicsWorld<B: PhysicsBackend> {
    config: PhysicsConfig,
    backend: Mutex<B>,
    bodies: BodyRegistry<B::Body>,
    joints: JointsManager,
    spatial: RwLock<SpatialHash<BodyId>>,
    boundary: RwLock<WorldBoundary>,

    // State
    next_id: AtomicU64,
    tick: AtomicU64,
    disposed: AtomicBool,

    // Perf metrics
    perf_enabled: AtomicBool,
    perf_stats: Mutex<PerfStats>,
}

impl<B: PhysicsBackend> PhysicsWorld<B> {
    /// Create a world over `backend`. Fails only on an invalid config.
    pub fn new(config: PhysicsConfig, backend: B) -> KineticsResult<Self> {
        init::create_world(config, backend)
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    // === Bodies ===

    /// New live body with a fresh id, registered before this returns.
    pub fn create_body(&self, kind: BodyKind) -> Arc<B::Body> {
        commands::create_body(self, kind)
    }

    /// Same as [`create_body`](Self::create_body), placed and sized.
    pub fn create_body_at(&self, kind: BodyKind, pos: Vec2, radius: f32) -> Arc<B::Body> {
        commands::create_body_at(self, kind, pos, radius)
    }

    pub fn body(&self, id: BodyId) -> Option<Arc<B::Body>> {
        self.bodies.get(id)
    }

    pub fn bodies(&self) -> Vec<Arc<B::Body>> {
        self.bodies.snapshot()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn registry(&self) -> &BodyRegistry<B::Body> {
        &self.bodies
    }

    pub fn kill_body(&self, id: BodyId, cause: CauseOfDeath) -> KineticsResult<()> {
        commands::kill_body(self, id, cause)
    }

    /// Run every live body's `update` hook.
    pub fn update_bodies(&self, delta: f32) {
        commands::update_bodies(self, delta)
    }

    // === Joints ===

    pub fn join_centres(&self, a: BodyId, b: BodyId) -> bool {
        join::join(self, a, b, false, JointKind::Rope)
    }

    /// Rim-to-rim join, anchored where each body faces the other.
    pub fn join_anchored(&self, a: BodyId, b: BodyId) -> bool {
        join::join(self, a, b, true, JointKind::Rope)
    }

    pub fn join_with_kind(&self, a: BodyId, b: BodyId, anchored: bool, kind: JointKind) -> bool {
        join::join(self, a, b, anchored, kind)
    }

    /// Queue an explicit joining built by the caller.
    pub fn create_joint(&self, joining: Joining) -> bool {
        self.joints.create_joint(joining, &self.bodies)
    }

    pub fn request_joint_removal(&self, id: JointId) -> bool {
        self.joints.request_removal(id, &self.bodies)
    }

    pub fn are_joined(&self, a: BodyId, b: BodyId) -> bool {
        self.joints.are_joined(a, b)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &JointsManager {
        &self.joints
    }

    // === Spatial ===

    /// Read access to the spatial index as of the last step.
    pub fn spatial(&self) -> RwLockReadGuard<'_, SpatialHash<BodyId>> {
        self.spatial.read()
    }

    /// Live bodies whose disc overlaps the given circle.
    pub fn bodies_near(&self, center: Vec2, radius: f32) -> Vec<Arc<B::Body>> {
        commands::bodies_near(self, center, radius)
    }

    // === Step ===

    /// Advance the world by `delta` seconds. A backend failure is fatal and
    /// comes back as [`KineticsError::Backend`](crate::error::KineticsError::Backend).
    pub fn step(&self, delta: f32) -> KineticsResult<StepReport> {
        step::step(self, delta)
    }

    // === Settings ===

    pub fn register_static_bodies(&self, boundary: WorldBoundary) {
        settings::register_static_bodies(self, boundary)
    }

    pub fn boundary(&self) -> WorldBoundary {
        self.boundary.read().clone()
    }

    /// Enable or disable per-step perf metrics.
    pub fn enable_perf_metrics(&self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled)
    }

    /// Last step's perf snapshot (zeros while perf is disabled).
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    /// Run `f` with exclusive access to the backend.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.backend.lock())
    }

    // === Persistence ===

    pub fn snapshot(&self) -> WorldSnapshot {
        snapshot::take(self)
    }

    /// Rebuild a world from a snapshot on top of a fresh backend.
    pub fn restore(snapshot: WorldSnapshot, backend: B) -> KineticsResult<Self> {
        snapshot::restore(snapshot, backend)
    }

    /// Drop every body and joint. Safe to call more than once.
    pub fn dispose(&self) {
        init::dispose(self)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
