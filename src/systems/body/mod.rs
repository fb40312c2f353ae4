//! Body (particle) contract.
//!
//! A body is anything with position, velocity, mass and radius that can take
//! forces and die. Backends provide the concrete type; everything they share
//! lives in [`BodyCore`], and the trait only adds the per-tick hooks.

mod state;
mod registry;

use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, CauseOfDeath};

pub use state::{Accumulated, BodyCore, BodyState};
pub use registry::{BodyLookup, BodyRegistry, Liveness};

pub trait Particle: Send + Sync + 'static {
    fn core(&self) -> &BodyCore;

    /// Agent-side tick hook. Drops contacts and interaction entries that
    /// point at bodies which are no longer alive.
    fn update(&self, _delta: f32, world: &dyn Liveness) {
        let core = self.core();
        core.retain_contacts(|c| c.other_body().map_or(true, |id| world.is_alive(id)));
        core.retain_interactions(|id| world.is_alive(*id));
    }

    /// Backend-side hook, run right after integration. Accumulators are
    /// already consumed by then; anything applied since belongs to the next
    /// step and must be left alone.
    fn physics_update(&self) {}

    /// Release backend resources. Called once at reap; repeated calls are no-ops.
    fn dispose(&self) {
        let core = self.core();
        if core.mark_disposed() {
            core.kill(CauseOfDeath::Disposed);
            core.clear_contacts();
            core.retain_interactions(|_| false);
        }
    }

    // Shorthands for the most used parts of the core.

    fn id(&self) -> BodyId {
        self.core().id()
    }

    fn kind(&self) -> BodyKind {
        self.core().kind()
    }

    fn is_dead(&self) -> bool {
        self.core().is_dead()
    }

    fn kill(&self, cause: CauseOfDeath) {
        self.core().kill(cause)
    }

    fn pos(&self) -> Vec2 {
        self.core().pos()
    }

    fn angle(&self) -> f32 {
        self.core().angle()
    }

    fn radius(&self) -> f32 {
        self.core().radius()
    }

    fn mass(&self) -> f32 {
        self.core().mass()
    }

    fn apply_force(&self, force: Vec2) {
        self.core().apply_force(force)
    }

    fn apply_impulse(&self, impulse: Vec2) {
        self.core().apply_impulse(impulse)
    }

    fn apply_torque(&self, torque: f32) {
        self.core().apply_torque(torque)
    }

    fn enable_ranged_interaction(&self) {
        self.core().enable_ranged_interaction()
    }
}
