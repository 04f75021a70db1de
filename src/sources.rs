use std::sync::{Arc, Mutex};

use core_mechanics::action::Action;
use core_mechanics::driver::DecisionSource;
use core_mechanics::error::Rejection;
use core_mechanics::game::Phase;
use core_mechanics::gem::Gem;
use core_mechanics::noble::{Noble, NobleId};
use core_mechanics::snapshot::Snapshot;
use core_mechanics::tokens::TokenPool;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc::Receiver;
use tracing::debug;

/// Lines typed at the terminal, shared by every human seat.
pub type Lines = Arc<Mutex<Receiver<String>>>;

/// A human seat. Each prompt accepts either the index of a listed action or
/// an action written as JSON, e.g. `{"take_two_same":"red"}`.
pub struct StdinSource {
    name: String,
    lines: Lines,
}

impl StdinSource {
    pub fn new(name: impl Into<String>, lines: Lines) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    fn next_line(&self) -> Option<String> {
        let mut lines = self.lines.lock().ok()?;
        lines.blocking_recv()
    }
}

/// Parses a typed answer against the listed options.
pub fn parse_choice<T: Clone>(input: &str, options: &[T]) -> Option<T> {
    let index: usize = input.trim().parse().ok()?;
    options.get(index).cloned()
}

impl DecisionSource for StdinSource {
    fn choose_action(&mut self, snapshot: &Snapshot, legal: &[Action]) -> Option<Action> {
        println!();
        print!("{}", render_table(snapshot));
        match snapshot.phase {
            Phase::AwaitingDiscard { excess, .. } => {
                println!("> {}, hand back {excess} tokens", self.name);
                println!("  e.g. {{\"discard\":{{\"red\":{excess}}}}}");
            }
            _ => {
                println!("> {}, your move:", self.name);
                for (index, action) in legal.iter().enumerate() {
                    println!("  [{index}] {}", serde_json::to_string(action).ok()?);
                }
            }
        }

        loop {
            let line = self.next_line()?;
            if let Some(action) = parse_choice(&line, legal) {
                return Some(action);
            }
            match serde_json::from_str::<Action>(line.trim()) {
                Ok(action) => return Some(action),
                Err(decoding_error) => println!("Malformatted action: {decoding_error}"),
            }
        }
    }

    fn choose_noble(&mut self, _snapshot: &Snapshot, candidates: &[Noble]) -> Option<NobleId> {
        println!("> {}, several nobles want to visit you:", self.name);
        for (index, noble) in candidates.iter().enumerate() {
            println!("  [{index}] {} needs {}", noble.id, noble.requirement);
        }

        loop {
            let line = self.next_line()?;
            match parse_choice(&line, candidates) {
                Some(noble) => return Some(noble.id),
                None => println!("Pick one of the listed nobles"),
            }
        }
    }

    fn on_rejected(&mut self, _snapshot: &Snapshot, rejection: &Rejection) {
        println!("> Not allowed: {rejection}");
    }
}

/// The table as text, with the seat to act marked `*`.
fn render_table(snapshot: &Snapshot) -> String {
    let mut lines = vec![format!(
        "Round {} | supply {}",
        snapshot.round, snapshot.board.supply
    )];
    for (tier, display) in &snapshot.board.display {
        let cards: Vec<String> = display
            .iter()
            .flatten()
            .map(|card| format!("{}({}, {}pt, {})", card.id, card.bonus, card.points, card.cost))
            .collect();
        let pile = snapshot.board.pile_sizes.get(tier).copied().unwrap_or_default();
        lines.push(format!("  {tier} [{pile} left]: {}", cards.join("  ")));
    }
    for noble in &snapshot.board.nobles {
        lines.push(format!("  {} needs {}", noble.id, noble.requirement));
    }
    let acting = snapshot.acting_seat();
    for player in &snapshot.players {
        let marker = if acting == Some(player.seat) { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {} ({} pts): tokens {} | bonuses {} | {} reserved",
            player.name,
            player.score,
            player.tokens,
            player.bonuses,
            player.reserved.len()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Bot that plays uniformly among legal actions, with an optional lean
/// towards purchases. Stops answering past `round_limit`.
pub struct RandomSource {
    rng: ChaCha8Rng,
    purchase_bias: f64,
    round_limit: Option<u32>,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            purchase_bias: 0.0,
            round_limit: None,
        }
    }

    pub fn with_purchase_bias(self, purchase_bias: f64) -> Self {
        Self {
            purchase_bias: purchase_bias.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn with_round_limit(self, round_limit: u32) -> Self {
        Self {
            round_limit: Some(round_limit),
            ..self
        }
    }

    fn discard(&mut self, tokens: TokenPool, excess: u8) -> Action {
        let mut held: Vec<Gem> = tokens.into();
        held.shuffle(&mut self.rng);
        held.truncate(excess as usize);
        Action::Discard(TokenPool::from_gems(&held))
    }
}

impl DecisionSource for RandomSource {
    fn choose_action(&mut self, snapshot: &Snapshot, legal: &[Action]) -> Option<Action> {
        if let Phase::AwaitingDiscard { seat, excess } = snapshot.phase {
            let tokens = snapshot.player(seat)?.tokens;
            return Some(self.discard(tokens, excess));
        }
        if matches!(self.round_limit, Some(limit) if snapshot.round > limit) {
            debug!(round = snapshot.round, "round limit reached");
            return None;
        }

        let purchases: Vec<&Action> = legal
            .iter()
            .filter(|action| matches!(action, Action::Purchase(_)))
            .collect();
        if !purchases.is_empty() && self.rng.gen_bool(self.purchase_bias) {
            return purchases.choose(&mut self.rng).map(|action| (*action).clone());
        }
        legal.choose(&mut self.rng).cloned()
    }

    fn choose_noble(&mut self, _snapshot: &Snapshot, candidates: &[Noble]) -> Option<NobleId> {
        candidates.choose(&mut self.rng).map(|noble| noble.id)
    }
}

#[cfg(test)]
mod tests {
    use core_mechanics::config::GameConfig;
    use core_mechanics::game::Game;

    use super::*;

    fn get_default_game() -> Game {
        let config = GameConfig::new(vec!["ada".into(), "bo".into()], Some(9)).unwrap();
        Game::new(config).unwrap()
    }

    #[test]
    fn parses_listed_indices() {
        let options = vec!["a", "b", "c"];
        assert_eq!(parse_choice(" 2\n", &options), Some("c"));
        assert_eq!(parse_choice("3", &options), None);
        assert_eq!(parse_choice("{}", &options), None);
    }

    #[test]
    fn random_source_only_picks_legal_actions() {
        let game = get_default_game();
        let legal = game.legal_actions();
        let mut source = RandomSource::new(1).with_purchase_bias(1.0);

        for _ in 0..20 {
            let action = source.choose_action(&game.snapshot(), &legal).unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn random_discard_returns_exactly_the_excess() {
        let mut source = RandomSource::new(4);
        let tokens = TokenPool::new(3, 3, 3, 2, 1, 0);

        match source.discard(tokens, 2) {
            Action::Discard(selection) => {
                assert_eq!(selection.total(), 2);
                assert!(tokens.covers(&selection));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn random_source_gives_up_past_the_round_limit() {
        let game = get_default_game();
        let mut snapshot = game.snapshot();
        snapshot.round = 11;
        let mut source = RandomSource::new(2).with_round_limit(10);

        assert_eq!(source.choose_action(&snapshot, &game.legal_actions()), None);
    }

    #[test]
    fn table_marks_the_seat_to_act() {
        let mut game = get_default_game();
        game.submit(0, Action::TakeTwoSame(Gem::Blue)).unwrap();

        let table = render_table(&game.snapshot());
        assert!(table.starts_with("Round 1 |"));
        assert!(table.contains("\n  ada (0 pts)"));
        assert!(table.contains("\n* bo (0 pts)"));
    }

    #[test]
    fn stdin_source_reads_json_actions() {
        let (line_tx, line_rx) = tokio::sync::mpsc::channel(4);
        let mut source = StdinSource::new("ada", Arc::new(Mutex::new(line_rx)));
        line_tx.blocking_send("not json".into()).unwrap();
        line_tx
            .blocking_send(r#"{"take_two_same":"red"}"#.into())
            .unwrap();

        let game = get_default_game();
        let action = source.choose_action(&game.snapshot(), &[]);
        assert_eq!(action, Some(Action::TakeTwoSame(Gem::Red)));

        drop(line_tx);
        assert_eq!(source.choose_action(&game.snapshot(), &[]), None);
    }
}
