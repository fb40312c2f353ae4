use wasm_bindgen::prelude::*;

/// Timings and counters of the last step.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) backend_ms: f64,
    pub(super) flush_ms: f64,
    pub(super) reap_ms: f64,
    pub(super) spatial_ms: f64,

    pub(super) body_count: u32,
    pub(super) joint_count: u32,
    pub(super) contact_count: u32,
    pub(super) reaped: u32,
    pub(super) joints_added: u32,
    pub(super) joints_removed: u32,
    pub(super) joints_broken: u32,
    pub(super) spatial_rejected: u32,
    pub(super) tick: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }

    /// Named readings for dashboards and logs. `Physics Step Time` covers
    /// backend integration and the `physics_update` hooks only.
    pub fn readings(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Tick Time", self.step_ms),
            ("Physics Step Time", self.backend_ms),
            ("Joint Flush Time", self.flush_ms),
            ("Reap Time", self.reap_ms),
            ("Spatial Rebuild Time", self.spatial_ms),
            ("Bodies", self.body_count as f64),
            ("Joints", self.joint_count as f64),
            ("Contacts", self.contact_count as f64),
        ]
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn backend_ms(&self) -> f64 { self.backend_ms }
    #[wasm_bindgen(getter)]
    pub fn flush_ms(&self) -> f64 { self.flush_ms }
    #[wasm_bindgen(getter)]
    pub fn reap_ms(&self) -> f64 { self.reap_ms }
    #[wasm_bindgen(getter)]
    pub fn spatial_ms(&self) -> f64 { self.spatial_ms }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn joint_count(&self) -> u32 { self.joint_count }
    #[wasm_bindgen(getter)]
    pub fn contact_count(&self) -> u32 { self.contact_count }
    #[wasm_bindgen(getter)]
    pub fn reaped(&self) -> u32 { self.reaped }
    #[wasm_bindgen(getter)]
    pub fn joints_added(&self) -> u32 { self.joints_added }
    #[wasm_bindgen(getter)]
    pub fn joints_removed(&self) -> u32 { self.joints_removed }
    #[wasm_bindgen(getter)]
    pub fn joints_broken(&self) -> u32 { self.joints_broken }
    #[wasm_bindgen(getter)]
    pub fn spatial_rejected(&self) -> u32 { self.spatial_rejected }
    #[wasm_bindgen(getter)]
    pub fn tick(&self) -> u32 { self.tick }
}
