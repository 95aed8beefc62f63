use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, debug};
use solitaire_advisor::{
    action::{Hint, PlannedMove, describe_hint, describe_move, format_moves},
    advisor::is_advisable,
    autofinish::auto_finish_plan,
    deal,
    evaluation::evaluate_destinations,
    hint::best_hint,
    moves::{candidate_selections, simulated_state},
    scoring::{ScoringAction, actions_for_move, delta, recycle_action},
    state::{DrawMode, GameState, GameVariant},
};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the single best hint for a board
    Hint {
        /// Cards drawn per turn (1 or 3)
        #[arg(short, long, value_name = "NUM")]
        draw: Option<usize>,
        /// Path to a game state file (reads stdin when piped)
        file: Option<PathBuf>,
    },
    /// List every legal move, marking the ones worth making
    Moves {
        /// Cards drawn per turn (1 or 3)
        #[arg(short, long, value_name = "NUM")]
        draw: Option<usize>,
        /// Path to a game state file (reads stdin when piped)
        file: Option<PathBuf>,
    },
    /// Print the auto-finish sequence for a decided board
    Finish {
        /// Path to a game state file (reads stdin when piped)
        file: Option<PathBuf>,
    },
    /// Print a seeded starting position
    Deal {
        /// Deal number (greenfelt.net for klondike, classic numbering for freecell)
        #[arg(short, long, value_name = "SEED")]
        seed: u32,
        /// Game variant: klondike or freecell
        #[arg(long, default_value = "klondike", value_name = "NAME")]
        variant: String,
        /// Cards drawn per turn (1 or 3)
        #[arg(short, long, value_name = "NUM")]
        draw: Option<usize>,
    },
}

fn main() -> Result<()> {
    let Cli { verbose, command } = Cli::parse();
    init_logger(verbose);

    match command {
        Commands::Hint { draw, file } => {
            let state = load_state(file, draw)?;
            println!("{}\n", state.pretty_print());
            match best_hint(&state) {
                Some(hint) => {
                    let points = hint_points(&state, &hint);
                    println!("{}{}", describe_hint(&state, &hint), format_points(&points));
                }
                None => println!("No useful move."),
            }
        }
        Commands::Moves { draw, file } => {
            let state = load_state(file, draw)?;
            println!("{}\n", state.pretty_print());
            let mut advisable = vec![];
            for selection in candidate_selections(&state) {
                for evaluation in evaluate_destinations(&selection, &state) {
                    let mov = PlannedMove::new(selection.clone(), evaluation.destination);
                    let marker = if is_advisable(&selection, &evaluation, &state) {
                        advisable.push(mov.clone());
                        '*'
                    } else {
                        ' '
                    };
                    let points = actions_for_move(&state, &mov);
                    println!(
                        "{marker} {}{}",
                        describe_move(&state, &mov),
                        format_points(&points)
                    );
                }
            }
            if !advisable.is_empty() {
                println!("\n{}", format_moves(&advisable));
            }
        }
        Commands::Finish { file } => {
            let state = load_state(file, None)?;
            let Some(plan) = auto_finish_plan(&state) else {
                bail!("The board cannot be auto-finished.");
            };
            let points: i32 = plan
                .iter()
                .scan(state.clone(), |scratch, mov| {
                    let earned = actions_for_move(scratch, mov);
                    *scratch = simulated_state(scratch, &mov.selection, mov.destination)?;
                    Some(earned.iter().map(|&a| delta(a)).sum::<i32>())
                })
                .sum();
            println!("✓ Finishes in {} Moves (+{points})\n", plan.len());
            println!("{}", format_moves(&plan));
        }
        Commands::Deal {
            seed,
            variant,
            draw,
        } => {
            let variant = GameVariant::from_id(&variant)
                .with_context(|| format!("Unknown variant '{variant}'"))?;
            let draw_mode = parse_draw(draw)?.unwrap_or_default();
            let state = match variant {
                GameVariant::Klondike => deal::klondike(seed, draw_mode),
                GameVariant::FreeCell => deal::freecell(seed),
            };
            println!("{}", state.pretty_print());
        }
    }

    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_state(file: Option<PathBuf>, draw: Option<usize>) -> Result<GameState> {
    let mut state = if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read '{}'", file.display()))?;
        GameState::parse(&content).context("Failed to parse board")?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        GameState::parse(&content).context("Failed to parse board")?
    } else {
        bail!("No game state `file` provided and nothing piped on stdin.");
    };
    if let Some(draw_mode) = parse_draw(draw)? {
        state.draw_mode = draw_mode;
    }
    debug!(
        "Loaded {} board: {} on foundations, {} face down",
        state.variant.id(),
        state.foundation_card_count(),
        state.face_down_count()
    );
    Ok(state)
}

fn parse_draw(draw: Option<usize>) -> Result<Option<DrawMode>> {
    match draw {
        None => Ok(None),
        Some(count) => match DrawMode::from_count(count) {
            Some(mode) => Ok(Some(mode)),
            None => bail!("Draw count must be 1 or 3."),
        },
    }
}

fn hint_points(state: &GameState, hint: &Hint) -> Vec<ScoringAction> {
    match hint {
        Hint::Move(mov) => actions_for_move(state, mov).to_vec(),
        Hint::TapStock => recycle_action(state).into_iter().collect(),
    }
}

fn format_points(actions: &[ScoringAction]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let total: i32 = actions.iter().map(|&a| delta(a)).sum();
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
    format!("  [{total:+}: {}]", labels.join(", "))
}
