use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use clap::Parser;
use core_mechanics::config::GameConfig;
use core_mechanics::driver::DecisionSource;
use core_mechanics::game::Game;
use splendor_engine::session::{self, Finished};
use splendor_engine::sources::{Lines, RandomSource, StdinSource};
use tokio::task::JoinSet;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Splendor
///
/// Play Splendor at the terminal, pit bots against each other, or replay a
/// saved game.
#[derive(Parser, Debug)]
struct Args {
    /// Seat names in playing order, comma separated.
    #[clap(long, env = "SPLENDOR_PLAYERS", value_delimiter = ',', default_value = "ada,bo")]
    players: Vec<String>,
    /// Shuffle seed. A random one is drawn when omitted.
    #[clap(long, env = "SPLENDOR_SEED")]
    seed: Option<u64>,
    /// Consecutive rejected actions tolerated from one seat before giving up.
    #[clap(long, default_value = "3")]
    max_rejections: u32,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Play a game. The first `humans` seats read their moves from stdin.
    Play {
        #[clap(long, default_value = "1")]
        humans: usize,
        /// Write the game history to this file when the game stops.
        #[clap(long)]
        history: Option<PathBuf>,
    },
    /// Run bot-only games and print how each one ended.
    Simulate {
        #[clap(long, default_value = "10")]
        games: u64,
        /// Chance a bot buys a card whenever it can.
        #[clap(long, default_value = "0.8")]
        purchase_bias: f64,
        /// Bots stop answering past this round.
        #[clap(long, default_value = "100")]
        round_limit: u32,
    },
    /// Rebuild a saved game and check it against its record.
    Replay {
        /// History file written by `play --history`.
        history: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Play { humans, history } => {
            play(args.players, args.seed, args.max_rejections, humans, history).await
        }
        Command::Simulate {
            games,
            purchase_bias,
            round_limit,
        } => {
            let bots = BotSettings {
                purchase_bias,
                round_limit,
            };
            simulate(args.players, args.seed, args.max_rejections, games, bots).await
        }
        Command::Replay { history } => replay(history),
    }
}

async fn play(
    players: Vec<String>,
    seed: Option<u64>,
    max_rejections: u32,
    humans: usize,
    history: Option<PathBuf>,
) -> Result<()> {
    if humans > players.len() {
        bail!("{humans} human seats requested for {} players", players.len());
    }
    let game = Game::new(GameConfig::new(players.clone(), seed)?)?;
    println!("> New game {} (seed {})", game.id(), game.seed());

    let lines = listen_for_local_input();
    let sources = players
        .iter()
        .enumerate()
        .map(|(seat, name)| -> Box<dyn DecisionSource + Send> {
            if seat < humans {
                Box::new(StdinSource::new(name.clone(), lines.clone()))
            } else {
                let bot_seed = game.seed().wrapping_add(seat as u64);
                Box::new(RandomSource::new(bot_seed).with_purchase_bias(0.8))
            }
        })
        .collect();

    let Finished { game, result } = session::run(game, sources, max_rejections).await?;
    if let Some(path) = history {
        session::save_history(&game, &path)?;
        println!("> History written to {}", path.display());
    }
    match result {
        Ok(outcome) => println!("> {}", session::describe(&game, &outcome)),
        Err(error) => println!("> Game stopped: {error}"),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct BotSettings {
    purchase_bias: f64,
    round_limit: u32,
}

async fn simulate(
    players: Vec<String>,
    seed: Option<u64>,
    max_rejections: u32,
    games: u64,
    bots: BotSettings,
) -> Result<()> {
    let base_seed = seed.unwrap_or_else(rand::random);
    let mut tasks = JoinSet::new();

    for index in 0..games {
        let game_seed = base_seed.wrapping_add(index);
        let config = GameConfig::new(players.clone(), Some(game_seed))?.without_history();
        let game = Game::new(config)?;
        let sources = (0..players.len())
            .map(|seat| -> Box<dyn DecisionSource + Send> {
                Box::new(
                    RandomSource::new(game_seed.rotate_left(seat as u32 + 1))
                        .with_purchase_bias(bots.purchase_bias)
                        .with_round_limit(bots.round_limit),
                )
            })
            .collect();
        tasks.spawn(async move { (game_seed, session::run(game, sources, max_rejections).await) });
    }

    let mut finished = 0;
    while let Some(joined) = tasks.join_next().await {
        let (game_seed, run) = joined?;
        let Finished { game, result } = run?;
        match result {
            Ok(outcome) => {
                finished += 1;
                println!("seed {game_seed}: {}", session::describe(&game, &outcome));
            }
            Err(error) => {
                warn!(seed = game_seed, round = game.round(), %error, "game abandoned");
                println!("seed {game_seed}: abandoned in round {} ({error})", game.round());
            }
        }
    }
    println!("> {finished} of {games} games finished");
    Ok(())
}

fn replay(path: PathBuf) -> Result<()> {
    let history = session::load_history(&path)?;
    let game = history.replay()?;
    println!(
        "> Replayed {} submissions ({} accepted) of game {}",
        history.records.len(),
        history.accepted().count(),
        game.id()
    );
    match game.outcome() {
        Some(outcome) => println!("> {}", session::describe(&game, outcome)),
        None => println!("> The game was not finished ({})", game.phase().name()),
    }
    println!("{}", game.snapshot().to_json_pretty()?);
    Ok(())
}

fn listen_for_local_input() -> Lines {
    let (line_tx, line_rx) = tokio::sync::mpsc::channel(1);
    std::thread::spawn(move || input_loop(line_tx));
    Arc::new(Mutex::new(line_rx))
}

fn input_loop(line_tx: tokio::sync::mpsc::Sender<String>) -> Result<()> {
    let mut buffer = String::new();
    let stdin = std::io::stdin();
    loop {
        if stdin.read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        line_tx.blocking_send(buffer.clone())?;
        buffer.clear();
    }
}
