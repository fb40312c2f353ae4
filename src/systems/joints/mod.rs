//! Joints: the [`Joining`] entity and the per-world [`JointsManager`].

mod flush;
mod joining;
mod manager;

pub use flush::FlushReport;
pub use joining::{JointKind, Joining};
pub use manager::{JointLimits, JointsManager};
