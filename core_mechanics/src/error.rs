//! Rejections are recoverable: validation never touches live state, so a
//! rejected action leaves the game exactly as it was.
//! [`EngineError`] is the one fatal outcome for a game.

use serde::{Deserialize, Serialize};

use super::action::CardRef;
use super::gem::Gem;
use super::noble::NobleId;
use super::tokens::TokenPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("malformed action: {0}")]
    InvalidActionShape(String),

    #[error("supply holds {available} {gem}, {required} needed")]
    InsufficientSupply { gem: Gem, available: u8, required: u8 },

    #[error("already holding {held} reserved cards")]
    ReservationLimitReached { held: usize },

    #[error("{0} is not available")]
    CardNotFound(CardRef),

    #[error("payment is short by {gold_needed} gold, {gold_held} held")]
    CannotAfford { gold_needed: u8, gold_held: u8 },

    #[error("must discard exactly {required} held tokens, offered {offered}")]
    InvalidDiscardAmount { required: u8, offered: TokenPool },

    #[error("{0} is not on the board")]
    NobleNotFound(NobleId),

    #[error("bonuses do not meet the requirement of {0}")]
    NobleNotEligible(NobleId),

    #[error("illegal transition: {0}")]
    IllegalStateTransition(String),
}

/// Fatal per-game errors raised while driving a game with decision sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("seat {seat} had no action to offer")]
    NoActionAvailable { seat: usize },

    #[error("seat {seat} did not choose a noble")]
    NoNobleChosen { seat: usize },

    #[error("seat {seat} was rejected {attempts} times in a row, last: {last}")]
    TooManyRejections {
        seat: usize,
        attempts: u32,
        last: Rejection,
    },

    #[error("{sources} decision sources for {seats} seats")]
    SeatMismatch { sources: usize, seats: usize },
}
