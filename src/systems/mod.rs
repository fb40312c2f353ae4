//! Systems: bodies, joints and the physics backend that moves them.

pub mod backend;
pub mod body;
pub mod joints;
