use serde::{Deserialize, Serialize};

/// Which biological entity a body stands for. Chosen at construction and
/// carried through snapshots; backends may use it to pick defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Plant,
    Protozoan,
    Meat,
    Generic,
}

impl Default for BodyKind {
    fn default() -> Self {
        BodyKind::Generic
    }
}

/// Why a body died. Only the first recorded cause is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CauseOfDeath {
    Suffocation,
    Starvation,
    Eaten,
    OldAge,
    Killed,
    /// Released by the world without a biological cause.
    Disposed,
}
