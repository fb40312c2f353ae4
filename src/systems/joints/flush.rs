//! Flush point: the only place the live joint set changes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::JointId;
use crate::systems::backend::JointBackend;
use crate::systems::body::BodyLookup;

use super::manager::{deregister, register, JointsManager};
use super::{JointKind, Joining};

/// What one flush did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushReport {
    pub removed: usize,
    pub added: usize,
    /// Queued adds dropped because an endpoint died first.
    pub discarded: usize,
    /// Live joints found broken; they go away at the next flush.
    pub broken: usize,
    pub resized: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        *self == FlushReport::default()
    }

    pub fn merge(&mut self, other: FlushReport) {
        self.removed += other.removed;
        self.added += other.added;
        self.discarded += other.discarded;
        self.broken += other.broken;
        self.resized += other.resized;
    }
}

impl JointsManager {
    /// Apply queued removals, then queued adds, then scan the live set for
    /// broken joints. Breakage found here is queued, so a joint that snaps
    /// during this flush is still live until the next one.
    pub fn flush<L, B>(&self, bodies: &L, backend: &mut B) -> FlushReport
    where
        L: BodyLookup + Sync,
        B: JointBackend + Sync + ?Sized,
    {
        let mut report = FlushReport::default();

        // === Removals ===
        let removals = std::mem::take(&mut *self.pending_removals.lock());
        if !removals.is_empty() {
            let mut live = self.joinings.write();
            for id in removals {
                if let Some(joining) = live.remove(&id) {
                    deregister(&joining, bodies);
                    backend.destroy_joint(id);
                    report.removed += 1;
                    trace!(joint = %id, "joint removed");
                }
            }
        }

        // === Adds ===
        // Both locks stay held so no request can slip in between the queue
        // check and the live insert.
        {
            let mut adds = self.pending_adds.lock();
            if !adds.is_empty() {
                let mut live = self.joinings.write();
                for joining in adds.drain(..) {
                    let id = joining.id();
                    let ideal = if joining.any_died(bodies) {
                        None
                    } else {
                        joining.ideal_length(bodies, &*backend)
                    };
                    match ideal {
                        Some(length) => {
                            backend.create_joint(&joining, length);
                            live.insert(id, joining);
                            report.added += 1;
                            trace!(joint = %id, length, "joint created");
                        }
                        None => {
                            deregister(&joining, bodies);
                            report.discarded += 1;
                            trace!(joint = %id, "queued joint discarded");
                        }
                    }
                }
            }
        }

        // === Breakage ===
        let snapshot = self.joinings();
        let broken = self.find_broken(&snapshot, bodies, &*backend);
        for id in &broken {
            if self.request_removal(*id, bodies) {
                report.broken += 1;
            }
        }

        // === Regrowth ===
        let tolerance = self.limits.regrow_tolerance;
        for joining in &snapshot {
            if !joining.not_anchored() || joining.kind() != JointKind::Rope {
                continue;
            }
            let id = joining.id();
            if broken.contains(&id) {
                continue;
            }
            let (Some(current), Some(ideal)) =
                (backend.joint_length(id), joining.ideal_length(bodies, &*backend))
            else {
                continue;
            };
            if tolerance * current < ideal {
                backend.resize_joint(id, ideal);
                report.resized += 1;
            }
        }

        if !report.is_empty() {
            debug!(
                removed = report.removed,
                added = report.added,
                discarded = report.discarded,
                broken = report.broken,
                resized = report.resized,
                live = self.len(),
                "joints flushed"
            );
        }
        report
    }

    fn find_broken<L, B>(&self, snapshot: &[Joining], bodies: &L, backend: &B) -> Vec<JointId>
    where
        L: BodyLookup + Sync,
        B: JointBackend + Sync + ?Sized,
    {
        let factor = self.limits.max_length_factor;
        let is_broken = |j: &Joining| {
            j.any_died(bodies) || j.max_length_exceeded(bodies, backend, factor)
        };

        #[cfg(feature = "parallel")]
        {
            snapshot
                .par_iter()
                .filter(|j| is_broken(*j))
                .map(Joining::id)
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            snapshot.iter().filter(|j| is_broken(*j)).map(Joining::id).collect()
        }
    }

    /// Tear down every backend joint and re-create the live set from scratch.
    /// Queued removals are applied instead of re-created, and joints whose
    /// endpoints no longer resolve are dropped.
    pub fn rebuild<L, B>(&self, bodies: &L, backend: &mut B) -> FlushReport
    where
        L: BodyLookup + Sync,
        B: JointBackend + Sync + ?Sized,
    {
        let (removed, live) = {
            let mut live = self.joinings.write();
            let removals = std::mem::take(&mut *self.pending_removals.lock());
            let removed: Vec<Joining> = removals.iter().filter_map(|id| live.remove(id)).collect();
            let rest: Vec<Joining> = live.drain().map(|(_, j)| j).collect();
            (removed, rest)
        };
        for joining in &removed {
            deregister(joining, bodies);
        }
        for joining in removed.iter().chain(live.iter()) {
            backend.destroy_joint(joining.id());
        }
        let dropped = self.requeue(live, bodies);
        let mut report = self.flush(bodies, backend);
        report.removed += removed.len();
        report.discarded += dropped;
        report
    }

    /// Queue externally supplied joinings (e.g. from a snapshot) and flush.
    pub fn restore<L, B>(&self, joinings: Vec<Joining>, bodies: &L, backend: &mut B) -> FlushReport
    where
        L: BodyLookup + Sync,
        B: JointBackend + Sync + ?Sized,
    {
        let dropped = self.requeue(joinings, bodies);
        let mut report = self.flush(bodies, backend);
        report.discarded += dropped;
        report
    }

    fn requeue<L: BodyLookup>(&self, joinings: Vec<Joining>, bodies: &L) -> usize {
        let mut dropped = 0;
        let mut adds = self.pending_adds.lock();
        for joining in joinings {
            let id = joining.id();
            if adds.iter().any(|j| j.id() == id) {
                dropped += 1;
                continue;
            }
            let resolvable = joining.particle_a(bodies).is_some()
                && joining.particle_b(bodies).is_some();
            if !resolvable {
                deregister(&joining, bodies);
                dropped += 1;
                continue;
            }
            register(&joining, bodies);
            adds.push(joining);
        }
        dropped
    }

    /// Drop everything, live and queued, releasing backend joints.
    pub fn clear<L, B>(&self, bodies: &L, backend: &mut B)
    where
        L: BodyLookup,
        B: JointBackend + ?Sized,
    {
        let queued: Vec<Joining> = self.pending_adds.lock().drain(..).collect();
        let live: Vec<Joining> = self.joinings.write().drain().map(|(_, j)| j).collect();
        self.pending_removals.lock().clear();
        for joining in queued.iter().chain(live.iter()) {
            deregister(joining, bodies);
        }
        for joining in &live {
            backend.destroy_joint(joining.id());
        }
    }
}
