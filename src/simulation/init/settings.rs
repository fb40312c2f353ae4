use std::sync::atomic::Ordering;

use crate::systems::backend::{PhysicsBackend, WorldBoundary};

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

pub(super) fn enable_perf_metrics<B: PhysicsBackend>(world: &PhysicsWorld<B>, enabled: bool) {
    world.perf_enabled.store(enabled, Ordering::Release);
    if !enabled {
        world.perf_stats.lock().reset();
    }
}

pub(super) fn get_perf_stats<B: PhysicsBackend>(world: &PhysicsWorld<B>) -> PerfStats {
    world.perf_stats.lock().clone()
}

pub(super) fn register_static_bodies<B: PhysicsBackend>(
    world: &PhysicsWorld<B>,
    boundary: WorldBoundary,
) {
    world.backend.lock().register_static_bodies(&boundary);
    *world.boundary.write() = boundary;
}
