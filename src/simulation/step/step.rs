use std::sync::atomic::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::BodyId;
use crate::error::KineticsResult;
use crate::systems::backend::{BackendError, PhysicsBackend};
use crate::systems::body::Particle;
use crate::systems::joints::FlushReport;

use super::perf_stats::PerfStats;
use super::{reap, rebuild_spatial, PerfTimer, PhysicsWorld};

/// Outcome of one [`PhysicsWorld::step`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub tick: u64,
    pub flush: FlushReport,
    /// Bodies removed and disposed this step.
    pub reaped: Vec<BodyId>,
    pub step_ms: f64,
}

pub(super) fn step<B: PhysicsBackend>(world: &PhysicsWorld<B>, delta: f32) -> KineticsResult<StepReport> {
    let perf_on = world.perf_enabled.load(Ordering::Acquire);
    let step_start = PerfTimer::start();
    let mut stats = PerfStats::default();

    // One step at a time; agents that need the backend wait here.
    let mut backend = world.backend.lock();

    // === BACKEND INTEGRATION ===
    let (result, backend_ms) = PerfTimer::measure(|| {
        backend.step_physics(&world.bodies, delta)?;
        for body in world.bodies.snapshot() {
            if !body.is_dead() {
                body.physics_update();
            }
        }
        Ok::<_, BackendError>(())
    });
    if let Err(err) = result {
        warn!(error = %err, tick = world.tick(), "backend step failed");
        return Err(err.into());
    }
    stats.backend_ms = backend_ms;

    // === JOINT FLUSH ===
    let (flush, flush_ms) = PerfTimer::measure(|| world.joints.flush(&world.bodies, &mut *backend));
    stats.flush_ms = flush_ms;

    // === REAP ===
    let (reaped, reap_ms) = PerfTimer::measure(|| reap::reap_dead(world, &mut *backend));
    stats.reap_ms = reap_ms;

    let counts = backend.counts();
    drop(backend);

    // === SPATIAL REBUILD ===
    let (rejected, spatial_ms) = PerfTimer::measure(|| rebuild_spatial::rebuild(world));
    stats.spatial_ms = spatial_ms;

    let tick = world.tick.fetch_add(1, Ordering::AcqRel) + 1;
    let step_ms = step_start.elapsed_ms();

    if perf_on {
        stats.step_ms = step_ms;
        stats.body_count = world.bodies.len() as u32;
        stats.joint_count = world.joints.len() as u32;
        stats.contact_count = counts.contacts as u32;
        stats.reaped = reaped.len() as u32;
        stats.joints_added = flush.added as u32;
        stats.joints_removed = flush.removed as u32;
        stats.joints_broken = flush.broken as u32;
        stats.spatial_rejected = rejected as u32;
        stats.tick = tick as u32;
        *world.perf_stats.lock() = stats;
    }

    if !reaped.is_empty() {
        debug!(tick, reaped = reaped.len(), "dead bodies reaped");
    }

    Ok(StepReport { tick, flush, reaped, step_ms })
}
