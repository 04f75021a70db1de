use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::action::{Action, CardRef, Delta, Destination};
use super::board::Board;
use super::config::{ConfigError, GameConfig};
use super::error::Rejection;
use super::history::{History, TurnRecord, Verdict};
use super::noble::{Noble, NobleId};
use super::player::{Player, Reservation};
use super::snapshot::Snapshot;
use super::tokens::{Shortfall, MAX_TOKENS_HELD};
use super::validator;

/// Reaching this many points at the end of a turn starts the final round.
pub const WINNING_POINTS_THRESHOLD: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(usize),
    /// Seats still tied after score and card count, in seat order.
    Draw(Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    AwaitingAction { seat: usize },
    AwaitingDiscard { seat: usize, excess: u8 },
    ResolvingNobles { seat: usize, candidates: Vec<NobleId> },
    Finished { outcome: Outcome },
}

impl Phase {
    pub fn seat(&self) -> Option<usize> {
        match self {
            Phase::AwaitingAction { seat }
            | Phase::AwaitingDiscard { seat, .. }
            | Phase::ResolvingNobles { seat, .. } => Some(*seat),
            Phase::Finished { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingAction { .. } => "awaiting_action",
            Phase::AwaitingDiscard { .. } => "awaiting_discard",
            Phase::ResolvingNobles { .. } => "resolving_nobles",
            Phase::Finished { .. } => "finished",
        }
    }

    fn accepts(&self, action: &Action) -> bool {
        match self {
            Phase::AwaitingAction { .. } => action.is_main(),
            Phase::AwaitingDiscard { .. } => matches!(action, Action::Discard(_)),
            Phase::ResolvingNobles { .. } => matches!(action, Action::ChooseNoble(_)),
            Phase::Finished { .. } => false,
        }
    }
}

/// Set once, by the first turn that ends with someone at the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRound {
    pub round: u32,
    pub triggered_by: usize,
    /// The game ends after this seat's turn so every seat plays equally often.
    pub last_seat: usize,
}

/// An accepted submission: what was recorded and the state right after it.
#[derive(Debug, Clone)]
pub struct Applied {
    pub record: TurnRecord,
    pub snapshot: Snapshot,
}

struct Step {
    delta: Delta,
    noble_visit: Option<NobleId>,
}

#[derive(Debug, Clone)]
pub struct Game {
    id: Uuid,
    seed: u64,
    board: Board,
    players: Vec<Player>,
    phase: Phase,
    round: u32,
    final_round: Option<FinalRound>,
    submissions: u32,
    history: Option<History>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = Board::setup(config.players.len(), &mut rng);
        Ok(Self::assemble(seed, board, config.players, config.record_history))
    }

    /// Starts on a prepared board instead of a shuffled one. The seed would
    /// not rebuild that board, so no history is kept.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_default();
        Ok(Self::assemble(seed, board, config.players, false))
    }

    fn assemble(seed: u64, board: Board, names: Vec<String>, record_history: bool) -> Self {
        let id = Uuid::new_v4();
        let history = record_history.then(|| History::new(id, seed, names.clone()));
        let players = names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| Player::new(seat, name))
            .collect();

        info!(game = %id, seed, "game created");
        Self {
            id,
            seed,
            board,
            players,
            phase: Phase::AwaitingAction { seat: 0 },
            round: 1,
            final_round: None,
            submissions: 0,
            history,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn restore_id(&mut self, id: Uuid) {
        self.id = id;
        if let Some(history) = self.history.as_mut() {
            history.game_id = id;
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn seats(&self) -> usize {
        self.players.len()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn final_round(&self) -> Option<FinalRound> {
        self.final_round
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Finished { outcome } => Some(outcome),
            _ => None,
        }
    }

    pub fn scores(&self) -> Vec<u8> {
        self.players.iter().map(Player::score).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Actions the current phase would accept. Discards are not enumerated;
    /// any selection of exactly the excess is legal.
    pub fn legal_actions(&self) -> Vec<Action> {
        match &self.phase {
            Phase::AwaitingAction { seat } => {
                validator::legal_actions(&self.board, &self.players[*seat])
            }
            Phase::ResolvingNobles { candidates, .. } => candidates
                .iter()
                .map(|noble_id| Action::ChooseNoble(*noble_id))
                .collect(),
            Phase::AwaitingDiscard { .. } | Phase::Finished { .. } => vec![],
        }
    }

    /// Nobles the seat in [`Phase::ResolvingNobles`] may pick from.
    pub fn noble_candidates(&self) -> Vec<Noble> {
        match &self.phase {
            Phase::ResolvingNobles { candidates, .. } => self
                .board
                .nobles()
                .iter()
                .filter(|noble| candidates.contains(&noble.id))
                .cloned()
                .collect(),
            _ => vec![],
        }
    }

    /// Validates and applies one action for `seat`. A rejection leaves the
    /// game untouched apart from the history entry recording it.
    pub fn submit(&mut self, seat: usize, action: Action) -> Result<Applied, Rejection> {
        let round = self.round;
        let result = self.step(seat, &action);

        let (verdict, noble_visit) = match &result {
            Ok(step) => (Verdict::Accepted(step.delta.clone()), step.noble_visit),
            Err(rejection) => (Verdict::Rejected(rejection.clone()), None),
        };
        let record = TurnRecord {
            seq: self.submissions,
            round,
            seat,
            action,
            verdict,
            noble_visit,
            scores: self.scores(),
        };
        self.submissions += 1;
        if let Some(history) = self.history.as_mut() {
            history.records.push(record.clone());
        }

        match result {
            Ok(_) => {
                debug!(
                    seat,
                    round,
                    action = record.action.name(),
                    phase = self.phase.name(),
                    "action accepted"
                );
                Ok(Applied {
                    record,
                    snapshot: self.snapshot(),
                })
            }
            Err(rejection) => {
                warn!(seat, round, action = record.action.name(), %rejection, "action rejected");
                Err(rejection)
            }
        }
    }

    fn step(&mut self, seat: usize, action: &Action) -> Result<Step, Rejection> {
        self.check_turn(seat, action)?;
        let delta = validator::validate(&self.board, &self.players[seat], action)?;
        self.apply(seat, &delta)?;

        let noble_visit = match self.phase {
            Phase::ResolvingNobles { .. } => {
                self.finish_turn(seat);
                None
            }
            _ => self.settle(seat)?,
        };

        Ok(Step { delta, noble_visit })
    }

    fn check_turn(&self, seat: usize, action: &Action) -> Result<(), Rejection> {
        let expected = self.phase.seat().ok_or_else(|| {
            Rejection::IllegalStateTransition("the game has already finished".into())
        })?;
        if seat != expected {
            return Err(Rejection::IllegalStateTransition(format!(
                "seat {seat} acted while waiting on seat {expected}"
            )));
        }
        if !self.phase.accepts(action) {
            return Err(Rejection::IllegalStateTransition(format!(
                "{} is not accepted while {}",
                action.name(),
                self.phase.name()
            )));
        }
        if let (Phase::ResolvingNobles { candidates, .. }, Action::ChooseNoble(noble_id)) =
            (&self.phase, action)
        {
            if !candidates.contains(noble_id) {
                return Err(Rejection::NobleNotEligible(*noble_id));
            }
        }
        Ok(())
    }

    /// Applies a validated delta to copies of the board and the acting player,
    /// committing both only when every part succeeded.
    fn apply(&mut self, seat: usize, delta: &Delta) -> Result<(), Rejection> {
        let mut board = self.board.clone();
        let mut player = self.players[seat].clone();

        let supply = ((board.supply() + delta.returned) - delta.gained).map_err(
            |Shortfall(gem)| Rejection::InsufficientSupply {
                gem,
                available: board.supply_of(gem),
                required: delta.gained.get(gem),
            },
        )?;
        board.set_supply(supply);
        player.tokens = ((player.tokens + delta.gained) - delta.returned).map_err(
            |Shortfall(gem)| {
                Rejection::InvalidActionShape(format!("seat {seat} does not hold the {gem} to give back"))
            },
        )?;

        if let Some(transfer) = delta.card {
            let card = match transfer.source {
                CardRef::Display(card_id) => board.take_from_display(card_id),
                CardRef::Deck(tier) => board.draw(tier),
                CardRef::Reserved(card_id) => player.take_reserved(card_id),
            }
            .filter(|card| card.id == transfer.card)
            .ok_or(Rejection::CardNotFound(transfer.source))?;

            match transfer.destination {
                Destination::Reserved => player.reserved.push(Reservation {
                    card,
                    blind: matches!(transfer.source, CardRef::Deck(_)),
                }),
                Destination::Owned => player.owned.push(card),
            }
        }

        if let Some(noble_id) = delta.noble {
            let noble = board
                .take_noble(noble_id)
                .ok_or(Rejection::NobleNotFound(noble_id))?;
            player.nobles.push(noble);
        }

        self.board = board;
        self.players[seat] = player;
        Ok(())
    }

    /// End-of-action bookkeeping: the discard check first, then nobles.
    fn settle(&mut self, seat: usize) -> Result<Option<NobleId>, Rejection> {
        let held = self.players[seat].token_count();
        if held > MAX_TOKENS_HELD {
            self.phase = Phase::AwaitingDiscard {
                seat,
                excess: held - MAX_TOKENS_HELD,
            };
            return Ok(None);
        }

        let candidates: Vec<NobleId> = validator::eligible_nobles(&self.board, &self.players[seat])
            .into_iter()
            .map(|noble| noble.id)
            .collect();
        match candidates.as_slice() {
            [] => {
                self.finish_turn(seat);
                Ok(None)
            }
            [only] => {
                let noble_id = *only;
                self.apply(seat, &Delta::noble_visit(noble_id))?;
                debug!(seat, noble = %noble_id, "noble visited");
                self.finish_turn(seat);
                Ok(Some(noble_id))
            }
            _ => {
                self.phase = Phase::ResolvingNobles { seat, candidates };
                Ok(None)
            }
        }
    }

    fn finish_turn(&mut self, seat: usize) {
        self.players[seat].turns_taken += 1;

        let score = self.players[seat].score();
        if self.final_round.is_none() && score >= WINNING_POINTS_THRESHOLD {
            info!(seat, score, round = self.round, "final round triggered");
            self.final_round = Some(FinalRound {
                round: self.round,
                triggered_by: seat,
                last_seat: self.players.len() - 1,
            });
        }

        if let Some(final_round) = self.final_round {
            if seat == final_round.last_seat {
                let outcome = decide_outcome(&self.players);
                info!(?outcome, round = self.round, "game finished");
                self.phase = Phase::Finished { outcome };
                return;
            }
        }

        let next = (seat + 1) % self.players.len();
        if next == 0 {
            self.round += 1;
        }
        self.phase = Phase::AwaitingAction { seat: next };
    }
}

/// Highest score wins; ties go to whoever owns fewer cards.
fn decide_outcome(players: &[Player]) -> Outcome {
    let Some(best) = players
        .iter()
        .map(|player| (player.score(), std::cmp::Reverse(player.owned.len())))
        .max()
    else {
        return Outcome::Draw(vec![]);
    };

    let leaders: Vec<usize> = players
        .iter()
        .filter(|player| (player.score(), std::cmp::Reverse(player.owned.len())) == best)
        .map(|player| player.seat)
        .collect();

    match leaders.as_slice() {
        [winner] => Outcome::Winner(*winner),
        _ => Outcome::Draw(leaders),
    }
}
