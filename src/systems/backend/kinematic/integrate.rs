use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::Vec2;
use crate::systems::body::{BodyRegistry, Particle};

use super::{KinematicBackend, KinematicBody};

impl KinematicBackend {
    /// Consume this step's accumulators, apply fluid drag and angular damping, then
    /// advance positions.
    pub(super) fn integrate(
        &self,
        live: &[Arc<KinematicBody>],
        bodies: &BodyRegistry<KinematicBody>,
        dt: f32,
    ) {
        let drag = self.config.fluid_drag;
        let angular_damping = self.config.angular_damping;

        #[cfg(feature = "parallel")]
        {
            live.par_iter()
                .for_each(|body| integrate_body(body, bodies, dt, drag, angular_damping));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for body in live {
                integrate_body(body, bodies, dt, drag, angular_damping);
            }
        }
    }
}

fn integrate_body(
    body: &KinematicBody,
    bodies: &BodyRegistry<KinematicBody>,
    dt: f32,
    drag: f32,
    angular_damping: f32,
) {
    let towards = attached_directions(body, bodies);
    body.core().with_state(|s| {
        // Anything applied after this point waits for the next step.
        let acc = s.take_accumulated();
        let mass = s.mass();
        if mass <= 0.0 {
            return;
        }
        let inv_mass = 1.0 / mass;
        s.vel += acc.impulse * inv_mass + acc.force * (inv_mass * dt);

        let inertia = 0.5 * mass * s.radius * s.radius;
        if inertia > 0.0 {
            s.angular_vel += acc.torque / inertia * dt;
        }

        let dragged = dampened_velocity(s.vel, &towards);
        s.vel -= dragged * (drag * dt).min(1.0);
        s.angular_vel /= 1.0 + dt * angular_damping;

        s.pos += s.vel * dt;
        s.angle += s.angular_vel * dt;
    });
}

/// Unit vectors from `body` to every body it is joined to.
fn attached_directions(body: &KinematicBody, bodies: &BodyRegistry<KinematicBody>) -> Vec<Vec2> {
    let joined = body.core().joined_ids();
    if joined.is_empty() {
        return Vec::new();
    }
    let pos = body.pos();
    joined
        .into_iter()
        .filter_map(|(other, _)| bodies.get(other))
        .map(|other| (other.pos() - pos).normalize())
        .filter(|dir| *dir != Vec2::ZERO)
        .collect()
}

/// The share of `vel` that fluid drag acts on. Motion towards an attached
/// body is exempt, so joined cells can pull together through the fluid.
pub(super) fn dampened_velocity(vel: Vec2, towards: &[Vec2]) -> Vec2 {
    let mut dragged = vel;
    for dir in towards {
        let along = dragged.dot(*dir);
        if along > 0.0 {
            dragged -= *dir * along;
        }
    }
    dragged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_motion_is_fully_dragged() {
        let vel = Vec2::new(1.0, 2.0);
        assert_eq!(dampened_velocity(vel, &[]), vel);
    }

    #[test]
    fn motion_towards_partner_escapes_drag() {
        let vel = Vec2::new(1.0, 1.0);
        let dragged = dampened_velocity(vel, &[Vec2::new(1.0, 0.0)]);
        assert_eq!(dragged, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn motion_away_from_partner_is_dragged() {
        let vel = Vec2::new(-1.0, 0.0);
        assert_eq!(dampened_velocity(vel, &[Vec2::new(1.0, 0.0)]), vel);
    }
}
