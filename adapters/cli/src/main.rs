#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a lair battle and prints its event stream.

mod layout;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use lair_defence_core::{BattleResults, Event};
use lair_defence_system_battle::{BattleSimulator, PacingHook, Pause, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::layout::LairLayout;

#[derive(Debug, Parser)]
#[command(name = "lair-defence", about = "Simulates a party raiding a monster lair")]
struct Cli {
    /// Lair description to load; the bundled demo lair when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// TOML file with simulation tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the battle RNG; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Campaign day, overriding the config file.
    #[arg(long)]
    day: Option<u32>,

    /// Turn limit, overriding the config file.
    #[arg(long)]
    max_turns: Option<u32>,

    /// Milliseconds to wait after each phase.
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Print events as JSON lines instead of the battle log.
    #[arg(long)]
    json: bool,

    /// Draw the lair once the battle is over.
    #[arg(long)]
    show_map: bool,

    /// Tracing filter, e.g. `debug` or `lair_defence_system_battle=trace`.
    #[arg(long)]
    log: Option<String>,
}

/// Pacing hook that sleeps at every pause point, half as long after moves.
#[derive(Debug)]
struct SleepPacing {
    delay: Duration,
}

impl PacingHook for SleepPacing {
    fn pause(&mut self, pause: Pause) {
        let delay = match pause {
            Pause::AfterPhase(_) => self.delay,
            Pause::AfterMove => self.delay / 2,
        };
        thread::sleep(delay);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::try_new(directives).context("invalid --log filter")?,
        None => EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;

    let text = match &cli.layout {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read lair layout {}", path.display()))?,
        None => layout::DEMO_LAIR.to_owned(),
    };
    let context = LairLayout::parse(&text)
        .context("failed to parse lair layout")?
        .into_context()
        .context("lair layout is inconsistent")?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, day = config.day, max_turns = config.max_turns, "simulating battle");

    let mut simulator = BattleSimulator::seeded(context, config, seed);
    if cli.pace_ms > 0 {
        simulator = simulator.with_pacing(SleepPacing {
            delay: Duration::from_millis(cli.pace_ms),
        });
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let started = simulator.start_battle();
    emit(&mut out, simulator.drain_events(), cli.json)?;
    started.context("battle could not start")?;

    let outcome = loop {
        let outcome = simulator.step().context("failed to resolve turn")?;
        emit(&mut out, simulator.drain_events(), cli.json)?;
        if let Some(outcome) = outcome {
            break outcome;
        }
    };

    if cli.show_map && !cli.json {
        writeln!(out)?;
        write!(out, "{}", layout::render(simulator.context()))?;
    }
    if let Some(results) = outcome.results() {
        info!(
            gold = results.gold_reward,
            experience = results.experience_reward,
            turns = results.stats.turns,
            "battle finished"
        );
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<SimulationConfig>(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(day) = cli.day {
        config.day = day;
    }
    if let Some(max_turns) = cli.max_turns {
        config.max_turns = max_turns;
    }
    Ok(config)
}

fn emit(out: &mut impl Write, events: Vec<Event>, json: bool) -> Result<()> {
    for event in events {
        if json {
            serde_json::to_writer(&mut *out, &event)?;
            writeln!(out)?;
        } else {
            write_event(out, &event)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_event(out: &mut impl Write, event: &Event) -> io::Result<()> {
    match event {
        Event::BattleStart {
            adventurers,
            monsters,
        } => writeln!(
            out,
            "{} adventurers enter a lair guarded by {} monsters.",
            adventurers.len(),
            monsters.len()
        ),
        Event::TurnComplete { turn, log } => write_log(out, *turn, log),
        Event::Error { turn, log, error } => {
            write_log(out, *turn, log)?;
            writeln!(out, "  ! {error}")
        }
        Event::Victory { log, results } => {
            write_log(out, results.stats.turns, log)?;
            write_results(out, "Victory", results)
        }
        Event::Defeat { log, results } => {
            write_log(out, results.stats.turns, log)?;
            write_results(out, "Defeat", results)
        }
        Event::CellUpdate { .. }
        | Event::AdventurerMove { .. }
        | Event::MonsterDefeated { .. }
        | Event::AdventurerDefeated { .. } => Ok(()),
    }
}

fn write_log(out: &mut impl Write, turn: u32, log: &[String]) -> io::Result<()> {
    writeln!(out, "Turn {turn}")?;
    for line in log {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

fn write_results(out: &mut impl Write, verdict: &str, results: &BattleResults) -> io::Result<()> {
    writeln!(
        out,
        "{verdict} after {} turns: {} gold, {} experience, {}/{} adventurers survived.",
        results.stats.turns,
        results.gold_reward,
        results.experience_reward,
        results.adventurers_survived,
        results.total_adventurers
    )
}
