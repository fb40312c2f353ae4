//! Tuning parameters for the world, the joint registry and the backend.

use serde::{Deserialize, Serialize};

use crate::error::{KineticsError, KineticsResult};

/// Configuration handed to [`PhysicsWorld`](crate::simulation::PhysicsWorld)
/// at construction. Every subsystem reads its constants from here.
///
/// # Builder Pattern
/// ```
/// use kinetic_engine::config::PhysicsConfig;
///
/// let config = PhysicsConfig::new()
///     .with_world_radius(10.0)
///     .with_spatial_resolution(100)
///     .with_max_bodies_per_chunk(Some(16));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsConfig {
    /// Radius of the world disc. The spatial grid spans `2 * world_radius`.
    pub world_radius: f32,
    /// Chunks per axis in the spatial index.
    pub spatial_resolution: u32,
    /// Per-chunk occupancy limit. `None` = unbounded.
    pub max_bodies_per_chunk: Option<usize>,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    /// Natural surface gap of a joined pair = (rA + rB) * factor.
    pub joint_gap_factor: f32,
    /// Joints break once stretched beyond ideal length * factor.
    pub max_length_factor: f32,
    /// Unanchored rope joints are resized once the ideal length outgrows
    /// the backend length by this ratio.
    pub regrow_tolerance: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub default_mass_density: f32,
    /// Linear drag applied to free bodies.
    pub fluid_drag: f32,
    pub angular_damping: f32,
    /// Bodies slower than `radius * sleep_speed_ratio` are put to rest.
    pub sleep_speed_ratio: f32,
    pub restitution: f32,
    /// Collect per-step perf stats.
    pub perf_enabled: bool,
}

impl PhysicsConfig {
    pub fn new() -> Self {
        PhysicsConfig {
            world_radius: 30.0,
            spatial_resolution: 64,
            max_bodies_per_chunk: None,
            velocity_iterations: 6,
            position_iterations: 2,
            joint_gap_factor: 0.2,
            max_length_factor: 1.5,
            regrow_tolerance: 1.05,
            min_radius: 0.0015,
            max_radius: 0.15,
            default_mass_density: 1.0,
            fluid_drag: 0.8,
            angular_damping: 5.0,
            sleep_speed_ratio: 1.0 / 50.0,
            restitution: 0.2,
            perf_enabled: true,
        }
    }

    pub fn from_json(json: &str) -> KineticsResult<Self> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> KineticsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> KineticsResult<()> {
        if !(self.world_radius.is_finite() && self.world_radius > 0.0) {
            return Err(KineticsError::InvalidConfig(format!(
                "world radius must be positive, got {}",
                self.world_radius
            )));
        }
        if self.spatial_resolution == 0 {
            return Err(KineticsError::InvalidConfig("spatial resolution must be at least 1".into()));
        }
        if self.max_bodies_per_chunk == Some(0) {
            return Err(KineticsError::InvalidConfig("chunk capacity must be at least 1".into()));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(KineticsError::InvalidConfig(format!(
                "radius range [{}, {}] is empty",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_length_factor < 1.0 {
            return Err(KineticsError::InvalidConfig("max length factor must be >= 1".into()));
        }
        if self.regrow_tolerance < 1.0 {
            return Err(KineticsError::InvalidConfig("regrow tolerance must be >= 1".into()));
        }
        if self.default_mass_density <= 0.0 {
            return Err(KineticsError::InvalidConfig("mass density must be positive".into()));
        }
        Ok(())
    }

    pub fn with_world_radius(mut self, radius: f32) -> Self {
        self.world_radius = radius;
        self
    }

    pub fn with_spatial_resolution(mut self, resolution: u32) -> Self {
        self.spatial_resolution = resolution;
        self
    }

    pub fn with_max_bodies_per_chunk(mut self, max: Option<usize>) -> Self {
        self.max_bodies_per_chunk = max;
        self
    }

    pub fn with_iterations(mut self, velocity: u32, position: u32) -> Self {
        self.velocity_iterations = velocity;
        self.position_iterations = position;
        self
    }

    pub fn with_joint_gap_factor(mut self, factor: f32) -> Self {
        self.joint_gap_factor = factor;
        self
    }

    pub fn with_radius_range(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    pub fn with_fluid_drag(mut self, drag: f32) -> Self {
        self.fluid_drag = drag;
        self
    }

    pub fn with_perf(mut self, enabled: bool) -> Self {
        self.perf_enabled = enabled;
        self
    }

    /// Clamp a requested radius into the configured range.
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.max(self.min_radius).min(self.max_radius)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}
