//! Save and restore a world.
//!
//! Bodies keep their ids and kinematic state; joints are stored as plain
//! [`Joining`]s and re-attached on load. User data, contacts, interaction
//! queues and backend joint objects are transient and rebuilt or dropped.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PhysicsConfig;
use crate::domain::{BodyId, BodyKind};
use crate::error::KineticsResult;
use crate::spatial::{SpatialConfig, SpatialHash};
use crate::systems::backend::{PhysicsBackend, WorldBoundary};
use crate::systems::body::{BodyState, Particle};
use crate::systems::joints::Joining;

use super::{rebuild_spatial, PhysicsWorld};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub id: BodyId,
    pub kind: BodyKind,
    pub state: BodyState,
    #[serde(default)]
    pub ranged_interaction: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub config: PhysicsConfig,
    pub next_id: u64,
    pub tick: u64,
    pub bodies: Vec<BodySnapshot>,
    pub joinings: Vec<Joining>,
    pub spatial: SpatialConfig,
    #[serde(default)]
    pub boundary: WorldBoundary,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> KineticsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> KineticsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Live bodies and live joints only; anything queued or dying is left out.
pub(super) fn take<B: PhysicsBackend>(world: &PhysicsWorld<B>) -> WorldSnapshot {
    let mut bodies: Vec<BodySnapshot> = world
        .bodies
        .snapshot()
        .into_iter()
        .filter(|b| !b.is_dead())
        .map(|b| BodySnapshot {
            id: b.id(),
            kind: b.kind(),
            state: b.core().state(),
            ranged_interaction: b.core().can_interact_at_range(),
        })
        .collect();
    bodies.sort_by_key(|b| b.id);

    let alive = |id: BodyId| bodies.binary_search_by_key(&id, |b| b.id).is_ok();
    let mut joinings: Vec<Joining> = world
        .joints
        .active_joinings()
        .into_iter()
        .filter(|j| alive(j.body_a()) && alive(j.body_b()))
        .collect();
    joinings.sort_by_key(|j| j.id());

    WorldSnapshot {
        config: world.config.clone(),
        next_id: world.next_id.load(Ordering::Acquire),
        tick: world.tick(),
        spatial: world.spatial.read().config(),
        boundary: world.boundary(),
        bodies,
        joinings,
    }
}

pub(super) fn restore<B: PhysicsBackend>(
    snapshot: WorldSnapshot,
    backend: B,
) -> KineticsResult<PhysicsWorld<B>> {
    let WorldSnapshot { config, next_id, tick, bodies, joinings, spatial, boundary } = snapshot;
    let world = PhysicsWorld::new(config, backend)?;
    *world.spatial.write() = SpatialHash::from_config(&spatial);
    world.register_static_bodies(boundary);

    let mut max_id = 0;
    {
        let backend = world.backend.lock();
        for saved in &bodies {
            let body = backend.new_body(saved.id, saved.kind);
            let state = saved.state;
            body.core().with_state(|s| *s = state);
            if saved.ranged_interaction {
                body.enable_ranged_interaction();
            }
            max_id = max_id.max(saved.id.0);
            world.bodies.insert(Arc::new(body));
        }
    }
    world.next_id.store(next_id.max(max_id + 1), Ordering::Release);
    world.tick.store(tick, Ordering::Release);

    let report = {
        let mut backend = world.backend.lock();
        world.joints.restore(joinings, &world.bodies, &mut *backend)
    };
    rebuild_spatial::rebuild(&world);

    info!(
        bodies = world.body_count(),
        joints = report.added,
        dropped = report.discarded,
        "world restored"
    );
    Ok(world)
}
