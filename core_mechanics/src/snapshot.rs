//! Read-only export of a game for display, persistence and decision
//! sources. Pile order never leaves the engine; only pile sizes do.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::{Board, Display};
use super::card::{DevelopmentCard, Tier};
use super::game::{FinalRound, Game, Phase};
use super::noble::Noble;
use super::player::Player;
use super::tokens::TokenPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game_id: Uuid,
    pub round: u32,
    pub phase: Phase,
    pub board: BoardView,
    pub players: Vec<PlayerView>,
    pub final_round: Option<FinalRound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub supply: TokenPool,
    pub display: BTreeMap<Tier, Display>,
    pub pile_sizes: BTreeMap<Tier, usize>,
    pub nobles: Vec<Noble>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "visibility")]
pub enum ReservedView {
    Visible { card: DevelopmentCard, blind: bool },
    /// Drawn blind by another seat: only the tier is public.
    Hidden { tier: Tier },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: usize,
    pub name: String,
    pub tokens: TokenPool,
    pub bonuses: TokenPool,
    pub owned: Vec<DevelopmentCard>,
    pub reserved: Vec<ReservedView>,
    pub nobles: Vec<Noble>,
    pub score: u8,
    pub turns_taken: u32,
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        Self {
            supply: board.supply(),
            display: Tier::ALL
                .into_iter()
                .map(|tier| (tier, board.display(tier).clone()))
                .collect(),
            pile_sizes: Tier::ALL
                .into_iter()
                .map(|tier| (tier, board.pile_size(tier)))
                .collect(),
            nobles: board.nobles().to_vec(),
        }
    }
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            seat: player.seat,
            name: player.name.clone(),
            tokens: player.tokens,
            bonuses: player.bonuses(),
            owned: player.owned.clone(),
            reserved: player
                .reserved
                .iter()
                .map(|reservation| ReservedView::Visible {
                    card: reservation.card.clone(),
                    blind: reservation.blind,
                })
                .collect(),
            nobles: player.nobles.clone(),
            score: player.score(),
            turns_taken: player.turns_taken,
        }
    }
}

impl Snapshot {
    pub(crate) fn capture(game: &Game) -> Self {
        Self {
            game_id: game.id(),
            round: game.round(),
            phase: game.phase().clone(),
            board: BoardView::from(game.board()),
            players: game.players().iter().map(PlayerView::from).collect(),
            final_round: game.final_round(),
        }
    }

    /// The view `seat` is entitled to: other seats' blind reservations are
    /// reduced to their tier.
    pub fn for_seat(mut self, seat: usize) -> Self {
        for player in self.players.iter_mut().filter(|player| player.seat != seat) {
            for reserved in player.reserved.iter_mut() {
                if let ReservedView::Visible { card, blind: true } = reserved {
                    *reserved = ReservedView::Hidden { tier: card.tier };
                }
            }
        }
        self
    }

    pub fn acting_seat(&self) -> Option<usize> {
        self.phase.seat()
    }

    pub fn player(&self, seat: usize) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.seat == seat)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
