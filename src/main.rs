//! Board Quest - Unified CLI
//!
//! Plays an adventure board scenario and replays its turn log.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use board_quest::{PlaybackDriver, PlaybackEvent, QuestConfig, RunSummary, Scenario, run_session};
use clap::Parser;
use cli::{Cli, Command};
use quest_engine::{LogEntry, SeededDice, Session, TurnController, create_cursor};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            scenario,
            config,
            seed,
            autoplay,
            interval_ms,
            extra_turns,
            json,
        } => {
            let config = load_config(config)?
                .with_seed(seed)
                .with_autoplay_interval_ms(interval_ms)
                .with_extra_turns(extra_turns.map(Into::into));
            run_play(scenario, config, autoplay, json).await
        }
        Command::Check { scenario } => run_check(scenario),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<QuestConfig> {
    match path {
        Some(path) => QuestConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(QuestConfig::default()),
    }
}

/// Play a scenario to a terminal status, then replay its log
#[instrument(skip(config), fields(scenario = %scenario.display()))]
async fn run_play(
    scenario: PathBuf,
    config: QuestConfig,
    autoplay: bool,
    json: bool,
) -> Result<()> {
    let scenario = Scenario::from_file(&scenario)
        .with_context(|| format!("loading scenario {}", scenario.display()))?;
    info!(name = %scenario.name(), "Starting quest");

    let mut session = scenario.start()?;
    let dice = match config.seed() {
        Some(seed) => SeededDice::new(*seed),
        None => SeededDice::from_entropy(),
    };
    info!(seed = dice.seed(), "Dice ready");

    let mut controller = TurnController::new(dice).with_policy(*config.extra_turns());
    let summary = run_session(&mut session, &mut controller, *config.max_turns());

    if autoplay {
        play_back(&session, &config).await?;
    } else {
        for entry in session.log() {
            println!("{}", entry.display_line());
        }
    }

    print_summary(&summary, json)
}

/// Step through the log on the auto-play timer until it ends or Ctrl-C
async fn play_back(session: &Session, config: &QuestConfig) -> Result<()> {
    let (mut driver, mut events) =
        PlaybackDriver::new(create_cursor(session.log_snapshot()), config.autoplay_interval());

    if let Some(first) = driver.current() {
        print_entry(&first);
    }
    driver.set_auto_play(true);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(PlaybackEvent::Showing { entry, .. }) => print_entry(&entry),
                Some(PlaybackEvent::Finished { index }) => {
                    info!(index, "Playback finished");
                    break;
                }
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl-C")?;
                warn!("Playback interrupted, jumping to the end");
                driver.jump_to_end();
                break;
            }
        }
    }

    Ok(())
}

fn print_entry(entry: &LogEntry) {
    println!("{}", entry.display_line());
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("Status:   {}", summary.status());
    println!("Turns:    {}", summary.turns());
    println!("Position: {}", summary.position());
    println!(
        "Health:   {}  Gold: {}  Level: {}  XP: {}",
        summary.character().health(),
        summary.character().gold(),
        summary.character().level(),
        summary.character().experience()
    );
    if *summary.capped() {
        println!("Stopped after the turn cap; the quest is unfinished.");
    }
    Ok(())
}

/// Validate a scenario file
#[instrument(fields(scenario = %scenario.display()))]
fn run_check(scenario: PathBuf) -> Result<()> {
    let loaded = Scenario::from_file(&scenario)
        .with_context(|| format!("loading scenario {}", scenario.display()))?;
    loaded.validate()?;

    println!("{}: {} tiles", loaded.name(), loaded.tiles().len());
    for (kind, count) in loaded.tile_counts() {
        println!("  {:<10} {count}", kind.to_string());
    }
    Ok(())
}
