//! Body registry: id -> body for one world.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::BodyId;

use super::Particle;

/// Fallible id -> body resolution. `None` means the body is gone (or was
/// never registered); callers must handle it.
pub trait BodyLookup {
    type Body: Particle;

    fn lookup(&self, id: BodyId) -> Option<Arc<Self::Body>>;
}

/// Object-safe liveness check used by body hooks.
pub trait Liveness {
    fn is_alive(&self, id: BodyId) -> bool;
}

impl<L: BodyLookup> Liveness for L {
    fn is_alive(&self, id: BodyId) -> bool {
        self.lookup(id).map_or(false, |b| !b.is_dead())
    }
}

/// Concurrent id -> body map. Reads never block each other.
pub struct BodyRegistry<P> {
    bodies: RwLock<HashMap<BodyId, Arc<P>>>,
}

impl<P: Particle> BodyRegistry<P> {
    pub fn new() -> Self {
        Self { bodies: RwLock::new(HashMap::new()) }
    }

    pub fn insert(&self, body: Arc<P>) {
        self.bodies.write().insert(body.id(), body);
    }

    pub fn get(&self, id: BodyId) -> Option<Arc<P>> {
        self.bodies.read().get(&id).cloned()
    }

    pub fn remove(&self, id: BodyId) -> Option<Arc<P>> {
        self.bodies.write().remove(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.read().is_empty()
    }

    /// Point-in-time copy of every registered body.
    pub fn snapshot(&self) -> Vec<Arc<P>> {
        self.bodies.read().values().cloned().collect()
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.read().keys().copied().collect()
    }

    /// Remove every body that reports dead and hand them back for disposal.
    pub fn take_dead(&self) -> Vec<Arc<P>> {
        let mut map = self.bodies.write();
        let dead: Vec<BodyId> = map
            .iter()
            .filter(|(_, b)| b.is_dead())
            .map(|(id, _)| *id)
            .collect();
        dead.into_iter().filter_map(|id| map.remove(&id)).collect()
    }

    pub fn clear(&self) -> Vec<Arc<P>> {
        self.bodies.write().drain().map(|(_, b)| b).collect()
    }
}

impl<P: Particle> Default for BodyRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Particle> BodyLookup for BodyRegistry<P> {
    type Body = P;

    fn lookup(&self, id: BodyId) -> Option<Arc<P>> {
        self.get(id)
    }
}
