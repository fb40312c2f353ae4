//! Error types for world, registry and body operations.

use thiserror::Error;

use crate::domain::ids::{BodyId, JointId};
use crate::systems::backend::BackendError;

/// Errors surfaced by the kinetic core.
///
/// Transient absence (a dead or not yet flushed endpoint) is never an error;
/// it shows up as `None` from lookups. Capacity limits show up as `false`.
#[derive(Debug, Error)]
pub enum KineticsError {
    /// A body was asked about a joint it does not belong to.
    #[error("body {body} is not an endpoint of joint {joint}")]
    NotAMember { body: BodyId, joint: JointId },
    /// No body with this id is registered.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),
    #[error("body {0} has no user data")]
    MissingUserData(BodyId),
    #[error("user data of body {body} is not a {expected}")]
    UserDataType { body: BodyId, expected: &'static str },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The backend failed inside a step. Not recoverable.
    #[error("physics backend failed: {0}")]
    Backend(#[from] BackendError),
    /// Config or snapshot JSON could not be parsed or written.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KineticsResult<T> = Result<T, KineticsError>;
