use std::sync::atomic::Ordering;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, CauseOfDeath};
use crate::error::{KineticsError, KineticsResult};
use crate::systems::backend::PhysicsBackend;
use crate::systems::body::Particle;

use super::PhysicsWorld;

pub(super) fn create_body<B: PhysicsBackend>(world: &PhysicsWorld<B>, kind: BodyKind) -> Arc<B::Body> {
    let id = BodyId(world.next_id.fetch_add(1, Ordering::AcqRel));
    let body = Arc::new(world.backend.lock().new_body(id, kind));
    world.bodies.insert(body.clone());
    trace!(body = %id, ?kind, "body created");
    body
}

pub(super) fn create_body_at<B: PhysicsBackend>(
    world: &PhysicsWorld<B>,
    kind: BodyKind,
    pos: Vec2,
    radius: f32,
) -> Arc<B::Body> {
    let body = create_body(world, kind);
    let core = body.core();
    core.set_pos(pos);
    core.set_radius(radius);
    body
}

pub(super) fn kill_body<B: PhysicsBackend>(
    world: &PhysicsWorld<B>,
    id: BodyId,
    cause: CauseOfDeath,
) -> KineticsResult<()> {
    let body = world.bodies.get(id).ok_or(KineticsError::UnknownBody(id))?;
    body.kill(cause);
    Ok(())
}

pub(super) fn update_bodies<B: PhysicsBackend>(world: &PhysicsWorld<B>, delta: f32) {
    let bodies = world.bodies.snapshot();
    let registry = &world.bodies;

    #[cfg(feature = "parallel")]
    {
        bodies
            .par_iter()
            .filter(|b| !b.is_dead())
            .for_each(|b| b.update(delta, registry));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for body in bodies.iter().filter(|b| !b.is_dead()) {
            body.update(delta, registry);
        }
    }
}

pub(super) fn bodies_near<B: PhysicsBackend>(
    world: &PhysicsWorld<B>,
    center: Vec2,
    radius: f32,
) -> Vec<Arc<B::Body>> {
    let candidates = world.spatial.read().query_radius(center, radius);
    candidates
        .into_iter()
        .filter_map(|id| world.bodies.get(id))
        .filter(|body| {
            let reach = radius + body.radius();
            !body.is_dead() && body.pos().distance_squared(center) <= reach * reach
        })
        .collect()
}
