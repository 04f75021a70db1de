use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::action::{Action, Delta};
use super::config::{ConfigError, GameConfig};
use super::error::Rejection;
use super::game::Game;
use super::noble::NobleId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted(Delta),
    Rejected(Rejection),
}

/// One submission, accepted or not, as the engine saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub seq: u32,
    pub round: u32,
    pub seat: usize,
    pub action: Action,
    pub verdict: Verdict,
    /// Noble awarded without a choice at the end of this submission.
    pub noble_visit: Option<NobleId>,
    /// Every seat's score once the submission was handled.
    pub scores: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("recorded configuration is invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("replay diverged from the record at submission {seq}")]
    Diverged { seq: u32 },
}

/// Append-only log of a game. Together with the seed it is enough to
/// rebuild the game exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub game_id: Uuid,
    pub seed: u64,
    pub players: Vec<String>,
    pub records: Vec<TurnRecord>,
}

impl History {
    pub fn new(game_id: Uuid, seed: u64, players: Vec<String>) -> Self {
        Self {
            game_id,
            seed,
            players,
            records: vec![],
        }
    }

    pub fn accepted(&self) -> impl Iterator<Item = &TurnRecord> {
        self.records
            .iter()
            .filter(|record| matches!(record.verdict, Verdict::Accepted(_)))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Deals the same board from the recorded seed and resubmits every
    /// record, failing at the first one whose result differs.
    pub fn replay(&self) -> Result<Game, ReplayError> {
        let config = GameConfig::new(self.players.clone(), Some(self.seed))?;
        let mut game = Game::new(config)?;
        game.restore_id(self.game_id);

        for record in &self.records {
            // Rejections are part of the record, so the result is compared
            // through the replayed history rather than the return value.
            let _ = game.submit(record.seat, record.action.clone());
            let replayed = game.history().and_then(|history| history.records.last());
            if replayed != Some(record) {
                return Err(ReplayError::Diverged { seq: record.seq });
            }
        }

        debug!(game = %self.game_id, records = self.records.len(), "replay complete");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;
    use crate::gem::Gem;

    fn get_played_game() -> Game {
        let config = GameConfig::new(vec!["ada".into(), "bo".into()], Some(11)).unwrap();
        let mut game = Game::new(config).unwrap();
        game.submit(0, Action::TakeThreeDistinct(vec![Gem::White, Gem::Blue, Gem::Green]))
            .unwrap();
        let _ = game.submit(0, Action::TakeTwoSame(Gem::Red));
        game.submit(1, Action::TakeTwoSame(Gem::Red)).unwrap();
        game
    }

    #[test]
    fn rejections_are_recorded_alongside_accepted_actions() {
        let game = get_played_game();
        let history = game.history().unwrap();

        assert_eq!(history.records.len(), 3);
        assert_eq!(history.accepted().count(), 2);
        assert!(matches!(
            history.records[1].verdict,
            Verdict::Rejected(Rejection::IllegalStateTransition(_))
        ));
        let seqs: Vec<u32> = history.records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn replay_rebuilds_the_same_state() {
        let game = get_played_game();
        let history = game.history().unwrap();

        let replayed = history.replay().unwrap();
        assert_eq!(replayed.id(), game.id());
        assert_eq!(replayed.board(), game.board());
        assert_eq!(replayed.players(), game.players());
        assert_eq!(replayed.phase(), &Phase::AwaitingAction { seat: 0 });
        assert_eq!(replayed.history(), Some(history));
    }

    #[test]
    fn replay_survives_json() {
        let game = get_played_game();
        let json = game.history().unwrap().to_json().unwrap();
        let history = History::from_json(&json).unwrap();

        assert_eq!(Some(&history), game.history());
        assert!(history.replay().is_ok());
    }

    #[test]
    fn tampered_history_diverges() {
        let game = get_played_game();
        let mut history = game.history().unwrap().clone();
        history.records[2].scores = vec![0, 9];

        let result = history.replay();
        assert!(matches!(result, Err(ReplayError::Diverged { seq: 2 })));

        let mut history = game.history().unwrap().clone();
        history.records[0].verdict = Verdict::Rejected(Rejection::InvalidActionShape("x".into()));
        assert!(matches!(history.replay(), Err(ReplayError::Diverged { seq: 0 })));
    }
}
