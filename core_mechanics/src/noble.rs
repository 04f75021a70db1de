use std::fmt;

use serde::{Deserialize, Serialize};

use super::tokens::TokenPool;

pub const NOBLE_VICTORY_POINTS: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noble {
    pub id: NobleId,
    /// Bonus counts (owned cards per colour) needed for a visit.
    pub requirement: TokenPool,
    pub points: u8,
}

impl Noble {
    pub fn new(id: NobleId, requirement: TokenPool) -> Self {
        Self {
            id,
            requirement,
            points: NOBLE_VICTORY_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NobleId(u8);

impl NobleId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for NobleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "noble #{}", self.0)
    }
}
