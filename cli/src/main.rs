use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use minebot_core::*;
use serde::Serialize;

use config::PlayConfig;

mod config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a simulated game until it is won, lost or stalled
    Play(PlayArgs),
    /// Print the next move for a board read from a text snapshot
    Advise(AdviseArgs),
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// TOML file with rows, cols, mines, seed and delay_ms
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<Coord>,

    #[arg(long)]
    cols: Option<Coord>,

    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds to wait after every move
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AdviseArgs {
    /// Snapshot file, `-` for stdin
    file: PathBuf,

    /// Seed for the guess when nothing can be deduced
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct PlaySummary {
    seed: u64,
    outcome: Outcome,
    simulator: SimState,
    board: String,
}

#[derive(Serialize, Debug)]
struct Advice {
    status: GameStatus,
    decision: Option<Decision>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match cli.command {
        Command::Play(args) => play(args),
        Command::Advise(args) => advise(args),
    }
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => PlayConfig::load(path)?,
        None => PlayConfig::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(mines) = args.mines {
        config.mines = mines;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.delay_ms = delay_ms;
    }
    let seed = resolve_seed(args.seed, config.seed);

    let minefield = config.minefield();
    log::info!(
        "Playing {}x{} with {} mines, seed {seed}",
        minefield.size.0,
        minefield.size.1,
        minefield.mines
    );

    let game = SimulatedGame::random(minefield, seed);
    let session_config = SessionConfig::new(game.size())?;
    let mut session = DecisionLoop::new(
        session_config,
        DeductionEngine::seeded(seed),
        game.clone(),
        game.clone(),
    );

    let delay = Duration::from_millis(config.delay_ms);
    let outcome = loop {
        let report = session.step()?;
        if report.state.is_terminal() {
            break Outcome {
                state: report.state,
                steps: session.steps(),
            };
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    };

    let summary = PlaySummary {
        seed,
        outcome,
        simulator: game.state(),
        board: session.board().to_string(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.board);
        println!(
            "{} after {} moves (simulator: {:?}, seed {})",
            summary.outcome.state, summary.outcome.steps, summary.simulator, summary.seed
        );
    }

    Ok(())
}

fn advise(args: AdviseArgs) -> anyhow::Result<()> {
    let text = if args.file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Could not read snapshot from stdin")?;
        text
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Could not read snapshot {}", args.file.display()))?
    };

    let snapshot = Snapshot::parse(&text).context("Invalid snapshot")?;
    let board = BoardModel::new(snapshot.size()).apply(&snapshot)?;
    let status = evaluate(&board);
    let decision = if status.is_finished() {
        None
    } else {
        DeductionEngine::seeded(args.seed).decide(&board)
    };

    let advice = Advice { status, decision };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        println!("status: {}", advice.status);
        match advice.decision {
            Some(decision) => println!("next: {} by {}", decision.action, decision.strategy),
            None => println!("next: none"),
        }
    }

    Ok(())
}

/// The flag wins over the config file; with neither, a fresh seed is drawn.
fn resolve_seed(flag: Option<u64>, config: Option<u64>) -> u64 {
    flag.or(config).unwrap_or_else(rand::random)
}
