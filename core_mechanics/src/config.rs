use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("the game needs {MIN_PLAYERS} to {MAX_PLAYERS} players, {0} given")]
    PlayerCount(usize),

    #[error("seat {0} has an empty name")]
    EmptyName(usize),
}

/// Everything a game needs at start. Built once and handed to [`Game::new`].
///
/// [`Game::new`]: crate::game::Game::new
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// One display name per seat, in seating order. Opaque to the engine.
    pub players: Vec<String>,
    /// Shuffle seed. Drawn from entropy when absent.
    pub seed: Option<u64>,
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

fn default_record_history() -> bool {
    true
}

impl GameConfig {
    pub fn new(players: Vec<String>, seed: Option<u64>) -> Result<Self, ConfigError> {
        let config = Self {
            players,
            seed,
            record_history: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn without_history(self) -> Self {
        Self {
            record_history: false,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ConfigError::PlayerCount(count));
        }
        if let Some(seat) = self.players.iter().position(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyName(seat));
        }
        Ok(())
    }
}
