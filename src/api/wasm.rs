//! Browser-facing facade over a [`PhysicsWorld`] on the kinematic backend.
//!
//! Ids cross the boundary as `f64` (JS numbers); a body id always fits in
//! the 53-bit integer range.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::config::PhysicsConfig;
use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, CauseOfDeath};
use crate::simulation::{PerfStats, PhysicsWorld};
use crate::systems::backend::{KinematicBackend, KinematicBody};
use crate::systems::body::Particle;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn body_id(id: f64) -> BodyId {
    BodyId(id as u64)
}

#[wasm_bindgen]
pub struct World {
    inner: PhysicsWorld<KinematicBackend>,
}

#[wasm_bindgen]
impl World {
    #[wasm_bindgen(constructor)]
    pub fn new(world_radius: f32) -> Result<World, JsValue> {
        let config = PhysicsConfig::new().with_world_radius(world_radius);
        let inner = PhysicsWorld::kinematic(config).map_err(js_error)?;
        Ok(World { inner })
    }

    /// Full configuration as camelCase JSON.
    pub fn from_config_json(json: &str) -> Result<World, JsValue> {
        let config = PhysicsConfig::from_json(json).map_err(js_error)?;
        let inner = PhysicsWorld::kinematic(config).map_err(js_error)?;
        Ok(World { inner })
    }

    /// Returns the new body's id.
    pub fn create_body(&self, x: f32, y: f32, radius: f32) -> f64 {
        let body = self.inner.create_body_at(BodyKind::Generic, Vec2::new(x, y), radius);
        body.id().0 as f64
    }

    pub fn kill_body(&self, id: f64) -> bool {
        self.inner.kill_body(body_id(id), CauseOfDeath::Killed).is_ok()
    }

    pub fn apply_impulse(&self, id: f64, x: f32, y: f32) -> bool {
        match self.inner.body(body_id(id)) {
            Some(body) => {
                body.apply_impulse(Vec2::new(x, y));
                true
            }
            None => false,
        }
    }

    pub fn join_centres(&self, a: f64, b: f64) -> bool {
        self.inner.join_centres(body_id(a), body_id(b))
    }

    pub fn join_anchored(&self, a: f64, b: f64) -> bool {
        self.inner.join_anchored(body_id(a), body_id(b))
    }

    pub fn are_joined(&self, a: f64, b: f64) -> bool {
        self.inner.are_joined(body_id(a), body_id(b))
    }

    pub fn step(&self, delta: f32) -> Result<(), JsValue> {
        self.inner.step(delta).map(|_| ()).map_err(js_error)
    }

    pub fn body_count(&self) -> u32 {
        self.inner.body_count() as u32
    }

    pub fn joint_count(&self) -> u32 {
        self.inner.joint_count() as u32
    }

    /// `[x, y, radius]` per live body, flattened for upload. Ordered by id,
    /// matching `render_ids`.
    pub fn render_buffer(&self) -> Vec<f32> {
        let bodies = self.render_order();
        let mut out = Vec::with_capacity(bodies.len() * 3);
        for body in &bodies {
            let s = body.core().state();
            out.extend_from_slice(&[s.pos.x, s.pos.y, s.radius]);
        }
        out
    }

    /// Ids for `render_buffer`, one per body. Kept as `f64` so ids stay exact
    /// past 2^24.
    pub fn render_ids(&self) -> Vec<f64> {
        self.render_order().iter().map(|b| b.id().0 as f64).collect()
    }

    pub fn enable_perf_metrics(&self, enabled: bool) {
        self.inner.enable_perf_metrics(enabled);
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.inner.get_perf_stats()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.inner.snapshot().to_json().map_err(js_error)
    }
}

impl World {
    fn render_order(&self) -> Vec<Arc<KinematicBody>> {
        let mut bodies: Vec<_> = self.inner.bodies().into_iter().filter(|b| !b.is_dead()).collect();
        bodies.sort_by_key(|b| b.id());
        bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ids_stay_exact_for_large_ids() {
        let config = PhysicsConfig::new().with_world_radius(1.0);
        let world = PhysicsWorld::kinematic(config).unwrap();
        world.create_body_at(BodyKind::Generic, Vec2::new(0.1, 0.2), 0.02);
        world.create_body_at(BodyKind::Generic, Vec2::new(-0.3, 0.0), 0.03);

        let mut snapshot = world.snapshot();
        let big = (1u64 << 24) + 1;
        snapshot.bodies[0].id = BodyId(big);
        snapshot.bodies[1].id = BodyId(big + 1);
        let backend = KinematicBackend::new(&snapshot.config);
        let world = World { inner: PhysicsWorld::restore(snapshot, backend).unwrap() };

        assert_eq!(world.render_ids(), vec![big as f64, (big + 1) as f64]);
        assert_eq!(world.render_buffer(), vec![0.1, 0.2, 0.02, -0.3, 0.0, 0.03]);
    }
}
