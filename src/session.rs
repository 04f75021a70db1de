use std::path::Path;

use anyhow::{Context, Result};
use core_mechanics::driver::{self, DecisionSource};
use core_mechanics::error::EngineError;
use core_mechanics::game::{Game, Outcome};
use core_mechanics::history::History;
use tracing::info;

/// A finished (or abandoned) game together with how it ended.
pub struct Finished {
    pub game: Game,
    pub result: Result<Outcome, EngineError>,
}

/// Drives `game` on the blocking pool: decision sources may wait on stdin.
pub async fn run(
    mut game: Game,
    mut sources: Vec<Box<dyn DecisionSource + Send>>,
    max_rejections: u32,
) -> Result<Finished> {
    let finished = tokio::task::spawn_blocking(move || {
        let result = driver::play(&mut game, &mut sources, max_rejections);
        Finished { game, result }
    })
    .await
    .context("game task panicked")?;

    info!(game = %finished.game.id(), round = finished.game.round(), "session over");
    Ok(finished)
}

pub fn save_history(game: &Game, path: &Path) -> Result<()> {
    let history = game
        .history()
        .context("history recording was disabled for this game")?;
    let json = history.to_json()?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), records = history.records.len(), "history saved");
    Ok(())
}

pub fn load_history(path: &Path) -> Result<History> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    History::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

pub fn describe(game: &Game, outcome: &Outcome) -> String {
    let name = |seat: usize| {
        game.players()
            .get(seat)
            .map_or_else(|| format!("seat {seat}"), |player| player.name.clone())
    };
    match outcome {
        Outcome::Winner(seat) => format!(
            "{} wins with {} points after {} rounds",
            name(*seat),
            game.scores().get(*seat).copied().unwrap_or_default(),
            game.round()
        ),
        Outcome::Draw(seats) => {
            let names: Vec<String> = seats.iter().map(|seat| name(*seat)).collect();
            format!("draw between {}", names.join(", "))
        }
    }
}
