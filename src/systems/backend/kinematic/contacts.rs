use std::collections::HashSet;
use std::sync::Arc;

use crate::core::Vec2;
use crate::domain::{BodyId, CauseOfDeath, Collision, ContactTarget};
use crate::systems::body::{BodyRegistry, Particle};

use super::{KinematicBackend, KinematicBody};

/// Overlapping pair found this step. `normal` points from `a` to `b`.
struct Contact {
    a: Arc<KinematicBody>,
    b: Arc<KinematicBody>,
    normal: Vec2,
    depth: f32,
}

impl Contact {
    fn between(a: &Arc<KinematicBody>, b: &Arc<KinematicBody>) -> Option<Self> {
        let (pa, ra) = (a.pos(), a.radius());
        let (pb, rb) = (b.pos(), b.radius());
        let delta = pb - pa;
        let dist2 = delta.length_squared();
        let reach = ra + rb;
        if dist2 >= reach * reach {
            return None;
        }
        let dist = dist2.sqrt();
        let normal = if dist > 0.0 { delta * (1.0 / dist) } else { Vec2::new(1.0, 0.0) };
        Some(Self { a: a.clone(), b: b.clone(), normal, depth: reach - dist })
    }

    fn deliver(&self) {
        let point = self.a.pos() + self.normal * self.a.radius();
        self.a.core().add_contact(Collision::new(ContactTarget::Body(self.b.id()), point));
        self.b.core().add_contact(Collision::new(ContactTarget::Body(self.a.id()), point));

        // A body whose centre ends up inside the other one suffocates.
        let dist = self.a.radius() + self.b.radius() - self.depth;
        if dist < self.b.radius() {
            self.a.kill(CauseOfDeath::Suffocation);
        }
        if dist < self.a.radius() {
            self.b.kill(CauseOfDeath::Suffocation);
        }
    }

    fn weights(&self) -> Option<(f32, f32)> {
        let wa = 1.0 / self.a.mass();
        let wb = 1.0 / self.b.mass();
        let total = wa + wb;
        (total.is_finite() && total > 0.0).then(|| (wa / total, wb / total))
    }

    fn resolve_velocity(&self, restitution: f32) {
        let Some((sa, sb)) = self.weights() else {
            return;
        };
        let closing = (self.b.core().vel() - self.a.core().vel()).dot(self.normal);
        if closing >= 0.0 {
            return;
        }
        let change = -(1.0 + restitution) * closing;
        self.a.core().with_state(|s| s.vel -= self.normal * (change * sa));
        self.b.core().with_state(|s| s.vel += self.normal * (change * sb));
    }

    fn separate(&self) {
        let Some((sa, sb)) = self.weights() else {
            return;
        };
        self.a.core().with_state(|s| s.pos -= self.normal * (self.depth * sa));
        self.b.core().with_state(|s| s.pos += self.normal * (self.depth * sb));
    }
}

impl KinematicBackend {
    /// Find overlapping pairs, hand both sides a [`Collision`], push them
    /// apart and keep everything inside the static geometry. Returns the
    /// number of contacts produced.
    pub(super) fn resolve_contacts(
        &mut self,
        live: &[Arc<KinematicBody>],
        bodies: &BodyRegistry<KinematicBody>,
    ) -> usize {
        for body in live {
            body.core().clear_contacts();
        }
        self.rebuild_broadphase(live);

        let mut pairs = Vec::new();
        for body in live {
            let id = body.id();
            for other_id in self.broadphase.query_box(body.core().bounding_box()) {
                // Joined bodies do not collide with each other.
                if other_id <= id || body.core().joint_with(other_id).is_some() {
                    continue;
                }
                let Some(other) = bodies.get(other_id) else {
                    continue;
                };
                if other.is_dead() {
                    continue;
                }
                if let Some(contact) = Contact::between(body, &other) {
                    pairs.push(contact);
                }
            }
        }

        for contact in &pairs {
            contact.deliver();
        }
        for _ in 0..self.config.velocity_iterations.max(1) {
            for contact in &pairs {
                contact.resolve_velocity(self.config.restitution);
            }
        }
        for contact in &pairs {
            contact.separate();
        }

        pairs.len() + self.resolve_static(live)
    }

    fn rebuild_broadphase(&mut self, live: &[Arc<KinematicBody>]) {
        self.broadphase.clear();
        for body in live {
            self.broadphase.insert_box(body.id(), body.core().bounding_box());
        }
    }

    fn resolve_static(&self, live: &[Arc<KinematicBody>]) -> usize {
        let restitution = self.config.restitution;
        let mut hits = 0;
        for body in live {
            if let Some(limit) = self.boundary.radius {
                let hit = body.core().with_state(|s| {
                    let dist = s.pos.length();
                    if dist + s.radius <= limit || dist == 0.0 {
                        return None;
                    }
                    let outward = s.pos * (1.0 / dist);
                    s.pos = outward * (limit - s.radius).max(0.0);
                    reflect(&mut s.vel, outward, restitution);
                    Some(outward * limit)
                });
                if let Some(point) = hit {
                    body.core().add_contact(Collision::new(ContactTarget::Boundary, point));
                    hits += 1;
                }
            }

            for obstacle in &self.boundary.obstacles {
                let hit = body.core().with_state(|s| {
                    let delta = s.pos - obstacle.center;
                    let reach = s.radius + obstacle.radius;
                    if delta.length_squared() >= reach * reach {
                        return None;
                    }
                    let normal = match delta.normalize() {
                        n if n == Vec2::ZERO => Vec2::new(1.0, 0.0),
                        n => n,
                    };
                    s.pos = obstacle.center + normal * reach;
                    reflect(&mut s.vel, -normal, restitution);
                    Some(obstacle.center + normal * obstacle.radius)
                });
                if let Some(point) = hit {
                    body.core()
                        .add_contact(Collision::new(ContactTarget::Static(obstacle.id), point));
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Refresh the interaction queue of every body with ranged interaction
    /// enabled: bodies inside the sensor disc are added, the rest dropped.
    pub(super) fn sense(&self, live: &[Arc<KinematicBody>], bodies: &BodyRegistry<KinematicBody>) {
        for body in live {
            let core = body.core();
            if !core.can_interact_at_range() {
                continue;
            }
            let id = body.id();
            let pos = body.pos();
            let range = core.interaction_radius();
            let in_range: HashSet<BodyId> = self
                .broadphase
                .query_radius(pos, range)
                .into_iter()
                .filter(|other| *other != id)
                .filter_map(|other| bodies.get(other))
                .filter(|other| !other.is_dead())
                .filter(|other| {
                    let reach = range + other.radius();
                    other.pos().distance_squared(pos) < reach * reach
                })
                .map(|other| other.id())
                .collect();
            core.retain_interactions(|other| in_range.contains(other));
            for other in in_range {
                core.add_interacting(other);
            }
        }
    }
}

/// Remove the velocity component heading along `normal` (into a wall) and
/// bounce it back scaled by `restitution`.
fn reflect(vel: &mut Vec2, normal: Vec2, restitution: f32) {
    let into = vel.dot(normal);
    if into > 0.0 {
        *vel -= normal * (into * (1.0 + restitution));
    }
}
