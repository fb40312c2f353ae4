use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PhysicsConfig;
use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind};
use crate::systems::body::{BodyCore, Particle};

/// Body type of the [`KinematicBackend`](super::KinematicBackend).
#[derive(Debug)]
pub struct KinematicBody {
    core: BodyCore,
    sleep_speed_ratio: f32,
    asleep: AtomicBool,
}

impl KinematicBody {
    pub fn new(id: BodyId, kind: BodyKind, config: &PhysicsConfig) -> Self {
        Self {
            core: BodyCore::new(id, kind, config),
            sleep_speed_ratio: config.sleep_speed_ratio,
            asleep: AtomicBool::new(false),
        }
    }

    /// Put to rest by the last `physics_update`.
    pub fn is_asleep(&self) -> bool {
        self.asleep.load(Ordering::Acquire)
    }
}

impl Particle for KinematicBody {
    fn core(&self) -> &BodyCore {
        &self.core
    }

    /// Zeroes the velocity of bodies drifting slower than
    /// `radius * sleep_speed_ratio`.
    fn physics_update(&self) {
        let threshold = self.sleep_speed_ratio;
        let asleep = self.core.with_state(|s| {
            if s.vel.length() < s.radius * threshold {
                s.vel = Vec2::zero();
                s.angular_vel = 0.0;
                true
            } else {
                false
            }
        });
        self.asleep.store(asleep, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_body_falls_asleep() {
        let body = KinematicBody::new(BodyId(7), BodyKind::Plant, &PhysicsConfig::new());
        body.core().set_radius(0.1);
        body.core().set_vel(Vec2::new(0.001, 0.0));
        body.apply_force(Vec2::new(1.0, 1.0));
        body.physics_update();
        assert!(body.is_asleep());
        assert_eq!(body.core().vel(), Vec2::zero());
        // a force applied after integration waits for the next step
        assert_eq!(body.core().accumulated().force, Vec2::new(1.0, 1.0));

        body.core().set_vel(Vec2::new(1.0, 0.0));
        body.physics_update();
        assert!(!body.is_asleep());
    }
}
