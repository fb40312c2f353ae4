//! Domain vocabulary: identities, body kinds, causes of death and contacts.

pub mod body_kind;
pub mod collision;
pub mod ids;

pub use body_kind::{BodyKind, CauseOfDeath};
pub use collision::{Collision, ContactTarget};
pub use ids::{BodyId, JointId};
