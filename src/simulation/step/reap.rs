use tracing::trace;

use crate::domain::BodyId;
use crate::systems::backend::PhysicsBackend;
use crate::systems::body::Particle;

use super::PhysicsWorld;

/// Remove every dead body from the registry, dispose it and let the backend
/// release whatever it holds for it.
pub(super) fn reap_dead<B: PhysicsBackend>(world: &PhysicsWorld<B>, backend: &mut B) -> Vec<BodyId> {
    let dead = world.bodies.take_dead();
    let mut ids = Vec::with_capacity(dead.len());
    for body in dead {
        body.dispose();
        backend.release_body(&body);
        trace!(body = %body.id(), cause = ?body.core().cause_of_death(), "body reaped");
        ids.push(body.id());
    }
    ids
}
