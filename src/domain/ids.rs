//! Identity types for bodies and joints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable body identity. Assigned once by the world, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commutative identity of a joined pair.
///
/// Stored as the canonically ordered pair `(lo, hi)`, so `of(a, b) == of(b, a)`
/// and two different pairs can never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId {
    lo: BodyId,
    hi: BodyId,
}

impl JointId {
    pub fn of(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn lo(&self) -> BodyId {
        self.lo
    }

    pub fn hi(&self) -> BodyId {
        self.hi
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.lo == id || self.hi == id
    }

    /// The other member of the pair, or `None` if `id` is not a member.
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if id == self.lo {
            Some(self.hi)
        } else if id == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Lossless packing into a single integer key.
    pub fn as_u128(&self) -> u128 {
        ((self.lo.0 as u128) << 64) | self.hi.0 as u128
    }

    /// `a ^ b` of the two ids. Commutative but NOT collision-free; kept for
    /// tooling that expects the short form, never used as a map key here.
    pub fn xor_hash(&self) -> u64 {
        self.lo.0 ^ self.hi.0
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.lo, self.hi)
    }
}
