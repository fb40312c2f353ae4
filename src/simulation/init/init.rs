use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::PhysicsConfig;
use crate::error::KineticsResult;
use crate::spatial::SpatialHash;
use crate::systems::backend::{KinematicBackend, PhysicsBackend, WorldBoundary};
use crate::systems::body::{BodyRegistry, Particle};
use crate::systems::joints::JointsManager;

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

/// Ids start at 1 so 0 never names a body.
pub(super) const FIRST_BODY_ID: u64 = 1;

pub(super) fn create_world<B: PhysicsBackend>(
    config: PhysicsConfig,
    backend: B,
) -> KineticsResult<PhysicsWorld<B>> {
    config.validate()?;
    let spatial = SpatialHash::new(
        config.spatial_resolution,
        config.max_bodies_per_chunk,
        config.world_radius,
    );
    info!(
        world_radius = config.world_radius,
        resolution = config.spatial_resolution,
        "physics world created"
    );
    Ok(PhysicsWorld {
        joints: JointsManager::new(&config),
        perf_enabled: AtomicBool::new(config.perf_enabled),
        config,
        backend: Mutex::new(backend),
        bodies: BodyRegistry::new(),
        spatial: RwLock::new(spatial),
        boundary: RwLock::new(WorldBoundary::default()),
        next_id: AtomicU64::new(FIRST_BODY_ID),
        tick: AtomicU64::new(0),
        disposed: AtomicBool::new(false),
        perf_stats: Mutex::new(PerfStats::default()),
    })
}

pub(super) fn dispose<B: PhysicsBackend>(world: &PhysicsWorld<B>) {
    if world.disposed.swap(true, Ordering::AcqRel) {
        return;
    }
    let mut backend = world.backend.lock();
    world.joints.clear(&world.bodies, &mut *backend);
    let bodies = world.bodies.clear();
    for body in &bodies {
        body.dispose();
        backend.release_body(body);
    }
    world.spatial.write().clear();
    info!(bodies = bodies.len(), "physics world disposed");
}

impl PhysicsWorld<KinematicBackend> {
    /// World over the built-in [`KinematicBackend`], walled in by a disc of
    /// `config.world_radius`.
    pub fn kinematic(config: PhysicsConfig) -> KineticsResult<Self> {
        let backend = KinematicBackend::new(&config);
        let radius = config.world_radius;
        let world = PhysicsWorld::new(config, backend)?;
        world.register_static_bodies(WorldBoundary::disc(radius));
        Ok(world)
    }
}
