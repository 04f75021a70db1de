use tracing::{info, warn};

use super::action::Action;
use super::error::{EngineError, Rejection};
use super::game::{Game, Outcome, Phase};
use super::noble::{Noble, NobleId};
use super::snapshot::Snapshot;

/// Anything that picks actions for a seat: a human at a terminal, a bot, a
/// scripted test. The engine validates everything it returns.
pub trait DecisionSource {
    /// Called while the seat owes a regular action or a discard. `legal` is
    /// empty for discards; the snapshot's phase carries the excess instead.
    fn choose_action(&mut self, snapshot: &Snapshot, legal: &[Action]) -> Option<Action>;

    fn choose_noble(&mut self, snapshot: &Snapshot, candidates: &[Noble]) -> Option<NobleId>;

    fn on_rejected(&mut self, _snapshot: &Snapshot, _rejection: &Rejection) {}
}

/// Runs `game` to the end. More than `max_rejections` consecutive rejections
/// for one request ends the game with an error.
pub fn play(
    game: &mut Game,
    sources: &mut [Box<dyn DecisionSource + Send>],
    max_rejections: u32,
) -> Result<Outcome, EngineError> {
    if sources.len() != game.seats() {
        return Err(EngineError::SeatMismatch {
            sources: sources.len(),
            seats: game.seats(),
        });
    }

    let mut rejections = 0;
    loop {
        let (seat, action) = match game.phase().clone() {
            Phase::Finished { outcome } => {
                info!(?outcome, round = game.round(), "game over");
                return Ok(outcome);
            }
            Phase::AwaitingAction { seat } | Phase::AwaitingDiscard { seat, .. } => {
                let snapshot = game.snapshot().for_seat(seat);
                let legal = game.legal_actions();
                let action = sources[seat]
                    .choose_action(&snapshot, &legal)
                    .ok_or(EngineError::NoActionAvailable { seat })?;
                (seat, action)
            }
            Phase::ResolvingNobles { seat, .. } => {
                let snapshot = game.snapshot().for_seat(seat);
                let noble = sources[seat]
                    .choose_noble(&snapshot, &game.noble_candidates())
                    .ok_or(EngineError::NoNobleChosen { seat })?;
                (seat, Action::ChooseNoble(noble))
            }
        };

        match game.submit(seat, action) {
            Ok(_) => rejections = 0,
            Err(rejection) => {
                rejections += 1;
                if rejections > max_rejections {
                    warn!(seat, attempts = rejections, "giving up on seat");
                    return Err(EngineError::TooManyRejections {
                        seat,
                        attempts: rejections,
                        last: rejection,
                    });
                }
                sources[seat].on_rejected(&game.snapshot().for_seat(seat), &rejection);
            }
        }
    }
}
