#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Wumpus World in the terminal.

mod config;
mod script;

use std::{path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wumpus_core::{CellKind, CellView, Event, GameSnapshot, Narration, Position};
use wumpus_system_session::Session;

use config::{AutoplaySection, WorldSection};
use script::ScriptStep;

/// Simulated time advanced per autoplay tick.
const TICK: Duration = Duration::from_millis(100);

/// Command-line arguments accepted by the Wumpus World binary.
#[derive(Debug, Parser)]
#[command(name = "wumpus-world", about = "Play a game of Wumpus World in the terminal")]
struct CliArgs {
    /// TOML configuration file; `wumpus.toml` is used when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Side length of the square grid.
    #[arg(long)]
    size: Option<u32>,
    /// Fraction of cells turned into pits.
    #[arg(long)]
    pit_density: Option<f64>,
    /// Seed for layout generation.
    #[arg(long)]
    seed: Option<u64>,
    /// Pause before each autoplay deliberation, in milliseconds.
    #[arg(long)]
    turn_delay_ms: Option<u64>,
    /// Deliberation pause before an autoplay move commits, in milliseconds.
    #[arg(long)]
    thinking_delay_ms: Option<u64>,
    /// Comma-separated manual commands such as `right,down,shoot-right`.
    /// Autoplay drives the game when omitted.
    #[arg(long, value_name = "CMDS")]
    script: Option<String>,
    /// Upper bound on simulated ticks during an autoplay run.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u32,
    /// Sleep through simulated delays instead of running at full speed.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the Wumpus World command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = config::load(args.config.as_deref())?;
    let world_config = file.world_config(&WorldSection {
        size: args.size,
        pit_density: args.pit_density,
        seed: args.seed,
    });
    let autoplay_config = file.autoplay_config(&AutoplaySection {
        turn_delay_ms: args.turn_delay_ms,
        thinking_delay_ms: args.thinking_delay_ms,
    });

    let mut session =
        Session::new(world_config, autoplay_config).context("failed to build the world")?;
    tracing::info!(
        size = world_config.size,
        pit_density = world_config.pit_density,
        seed = world_config.seed,
        "{}",
        session.snapshot().narration
    );

    match args.script.as_deref() {
        Some(text) => {
            let steps = script::parse(text).context("failed to parse --script")?;
            run_script(&mut session, &steps);
        }
        None => run_autoplay(&mut session, args.max_ticks, args.realtime),
    }

    print_summary(&session.snapshot());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_script(session: &mut Session, steps: &[ScriptStep]) {
    for step in steps {
        match *step {
            ScriptStep::Move(direction) => session.move_player(direction),
            ScriptStep::Shoot(direction) => session.shoot(direction),
            ScriptStep::Reset => session.reset(),
        }
        log_events(session);
    }
}

fn run_autoplay(session: &mut Session, max_ticks: u32, realtime: bool) {
    session.set_autoplay(true);
    log_events(session);

    for _ in 0..max_ticks {
        let snapshot = session.snapshot();
        if snapshot.status.is_terminal() || !snapshot.autoplay_enabled {
            return;
        }
        if realtime {
            thread::sleep(TICK);
        }
        session.advance(TICK);
        log_events(session);
    }
    tracing::warn!(max_ticks, "autoplay run stopped at the tick limit");
}

fn log_events(session: &mut Session) {
    for event in session.drain_events() {
        match (&event, narrate(&event)) {
            (Event::TimeAdvanced { .. }, _) => {}
            (Event::PlayerMoved { to, .. }, Some(narration)) => {
                tracing::info!(%to, "{narration}");
            }
            (_, Some(narration)) => tracing::info!("{narration}"),
            (Event::GameEnded { status }, None) => tracing::info!(?status, "game over"),
            (other, None) => tracing::debug!(event = ?other, "session event"),
        }
    }
}

/// Narration belonging to a single event, independent of later events.
fn narrate(event: &Event) -> Option<Narration> {
    match event {
        Event::PlayerMoved { content, .. } => Some(Narration::arrival(*content)),
        Event::WumpusKilled { .. } => Some(Narration::WumpusKilled),
        Event::ArrowMissed => Some(Narration::ArrowMissed),
        _ => None,
    }
}

fn print_summary(snapshot: &GameSnapshot) {
    for y in 0..snapshot.size {
        let row: String = (0..snapshot.size)
            .map(|x| glyph(snapshot, Position::new(x, y)))
            .collect();
        println!("{row}");
    }
    println!("status: {:?}", snapshot.status);
    println!("score: {}", snapshot.score);
    println!(
        "arrow: {}",
        if snapshot.arrow_available {
            "available"
        } else {
            "spent"
        }
    );
    println!("visited: {}", snapshot.visited.len());
    println!("{}", snapshot.narration);
}

fn glyph(snapshot: &GameSnapshot, position: Position) -> char {
    if position == snapshot.player {
        return '@';
    }
    match snapshot.cell(position) {
        Some(CellView::Revealed(kind)) => match kind {
            CellKind::Empty => '.',
            CellKind::Wumpus => 'W',
            CellKind::Pit => 'P',
            CellKind::Gold => 'G',
            CellKind::Breeze => 'b',
            CellKind::Stench => 's',
        },
        Some(CellView::Unvisited) | None => '?',
    }
}
