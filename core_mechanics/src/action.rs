use serde::{Deserialize, Serialize};

use super::card::{CardId, Tier};
use super::gem::Gem;
use super::noble::NobleId;
use super::tokens::TokenPool;

/// Where a reserve or purchase finds its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRef {
    Display(CardId),
    /// Top of the face-down pile. Only valid for reserving.
    Deck(Tier),
    /// One of the acting player's reserved cards. Only valid for purchasing.
    Reserved(CardId),
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardRef::Display(id) => write!(f, "face-up {id}"),
            CardRef::Deck(tier) => write!(f, "top of the {tier} pile"),
            CardRef::Reserved(id) => write!(f, "reserved {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    TakeThreeDistinct(Vec<Gem>),
    TakeTwoSame(Gem),
    Reserve(CardRef),
    Purchase(CardRef),
    /// Tokens handed back when a turn ends above the holding limit.
    Discard(TokenPool),
    /// Picks the visiting noble when several qualify in the same turn.
    ChooseNoble(NobleId),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::TakeThreeDistinct(_) => "take_three_distinct",
            Action::TakeTwoSame(_) => "take_two_same",
            Action::Reserve(_) => "reserve",
            Action::Purchase(_) => "purchase",
            Action::Discard(_) => "discard",
            Action::ChooseNoble(_) => "choose_noble",
        }
    }

    /// The four actions that make up a regular turn.
    pub fn is_main(&self) -> bool {
        !matches!(self, Action::Discard(_) | Action::ChooseNoble(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Reserved,
    Owned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTransfer {
    pub card: CardId,
    pub source: CardRef,
    pub destination: Destination,
}

/// The exact change a validated action makes. Every count is non-negative;
/// direction is carried by the field, never by sign.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Delta {
    /// Tokens moving from the supply to the player.
    pub gained: TokenPool,
    /// Tokens moving from the player back to the supply.
    pub returned: TokenPool,
    pub card: Option<CardTransfer>,
    pub noble: Option<NobleId>,
}

impl Delta {
    pub fn gain(gained: TokenPool) -> Self {
        Self {
            gained,
            ..Default::default()
        }
    }

    pub fn give_back(returned: TokenPool) -> Self {
        Self {
            returned,
            ..Default::default()
        }
    }

    pub fn noble_visit(noble: NobleId) -> Self {
        Self {
            noble: Some(noble),
            ..Default::default()
        }
    }
}
