use std::fmt;

use serde::{Deserialize, Serialize};

use super::gem::Gem;
use super::tokens::TokenPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    pub(crate) fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        };
        write!(f, "tier {level}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u8);

impl CardId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card #{}", self.0)
    }
}

/// A development card. Never mutated once the catalog builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentCard {
    pub id: CardId,
    pub tier: Tier,
    pub bonus: Gem,
    pub points: u8,
    pub cost: TokenPool,
}

impl DevelopmentCard {
    pub fn new(id: CardId, tier: Tier, bonus: Gem, points: u8, cost: TokenPool) -> Self {
        Self {
            id,
            tier,
            bonus,
            points,
            cost,
        }
    }
}
