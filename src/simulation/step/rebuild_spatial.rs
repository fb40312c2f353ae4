use crate::systems::backend::PhysicsBackend;
use crate::systems::body::Particle;

use super::PhysicsWorld;

/// Repopulate the spatial index from scratch under one write lock.
/// Returns how many insertions a full chunk turned away.
pub(super) fn rebuild<B: PhysicsBackend>(world: &PhysicsWorld<B>) -> usize {
    let bodies = world.bodies.snapshot();
    let mut spatial = world.spatial.write();
    spatial.clear();
    for body in bodies.iter().filter(|b| !b.is_dead()) {
        spatial.insert_box(body.id(), body.core().bounding_box());
    }
    spatial.rejected()
}
