use std::f32::consts::TAU;

use crate::systems::body::{BodyRegistry, Particle};
use crate::systems::joints::JointKind;

use super::{BackendJoint, KinematicBackend, KinematicBody};

const MIN_SEPARATION: f32 = 1e-6;

impl KinematicBackend {
    /// Relax every joint towards its rest length, `position_iterations` times.
    pub(super) fn solve_joints(&self, bodies: &BodyRegistry<KinematicBody>, dt: f32) {
        if self.joints.is_empty() {
            return;
        }
        let iterations = self.config.position_iterations.max(1);
        for _ in 0..iterations {
            for joint in self.joints.values() {
                solve_joint(joint, bodies, dt, iterations);
            }
        }
    }
}

fn solve_joint(joint: &BackendJoint, bodies: &BodyRegistry<KinematicBody>, dt: f32, iterations: u32) {
    let joining = &joint.joining;
    let (Some(a), Some(b)) = (joining.particle_a(bodies), joining.particle_b(bodies)) else {
        return;
    };
    if a.is_dead() || b.is_dead() {
        return;
    }
    let (Some(pa), Some(pb)) = (joining.anchor_a(bodies), joining.anchor_b(bodies)) else {
        return;
    };

    let delta = pb - pa;
    let dist = delta.length();
    if dist < MIN_SEPARATION {
        return;
    }
    let normal = delta * (1.0 / dist);
    let error = dist - joint.length;

    // Rigid constraints also cancel relative velocity along the axis.
    let (correction, rigid) = match joining.kind() {
        JointKind::Rope if error <= 0.0 => return,
        JointKind::Rope => (error, true),
        JointKind::Distance { frequency_hz, .. } if frequency_hz <= 0.0 => (error, true),
        JointKind::Distance { frequency_hz, damping_ratio } => {
            let omega = TAU * frequency_hz;
            let k = omega * omega * dt * dt;
            let c = 2.0 * damping_ratio * omega * dt;
            (error * k / (1.0 + c + k) / iterations as f32, false)
        }
    };

    let wa = inverse_mass(a.mass());
    let wb = inverse_mass(b.mass());
    let total = wa + wb;
    if total <= 0.0 {
        return;
    }

    let rel_vel = if rigid {
        (b.core().vel() - a.core().vel()).dot(normal)
    } else {
        0.0
    };
    // A rope only resists separation.
    let rel_vel = match joining.kind() {
        JointKind::Rope => rel_vel.max(0.0),
        _ => rel_vel,
    };

    let push = |body: &KinematicBody, share: f32, sign: f32| {
        body.core().with_state(|s| {
            s.pos += normal * (sign * correction * share);
            s.vel += normal * (sign * rel_vel * share);
        });
    };
    push(a.as_ref(), wa / total, 1.0);
    push(b.as_ref(), wb / total, -1.0);
}

fn inverse_mass(mass: f32) -> f32 {
    if mass > 0.0 {
        1.0 / mass
    } else {
        0.0
    }
}
