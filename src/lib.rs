//! Board Quest library - run adventure board sessions and play back their logs
//!
//! The simulation itself lives in `quest_engine`; this crate adds the parts a
//! running program needs around it.
//!
//! # Architecture
//!
//! - **Config**: TOML settings (dice seed, auto-play interval, extra turns)
//! - **Scenario**: starting character and board loaded from TOML
//! - **Runner**: plays a session to a terminal status
//! - **Playback**: timed, cancellable auto-play over the session log
//!
//! # Example
//!
//! ```no_run
//! use board_quest::{QuestConfig, Scenario, run_session};
//! use quest_engine::{SeededDice, TurnController};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = QuestConfig::from_file("quest.toml")?;
//! let mut session = Scenario::from_file("goblin_road.toml")?.start()?;
//! let mut controller = TurnController::new(SeededDice::new(7)).with_policy(*config.extra_turns());
//! let summary = run_session(&mut session, &mut controller, *config.max_turns());
//! println!("{}", summary.status());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod playback;
mod runner;
mod scenario;

// Crate-level exports - Configuration
pub use config::{ConfigError, QuestConfig};

// Crate-level exports - Scenarios
pub use scenario::{Scenario, ScenarioError};

// Crate-level exports - Running sessions
pub use runner::{RunSummary, run_session};

// Crate-level exports - Playback
pub use playback::{AutoPlayHandle, PlaybackDriver, PlaybackEvent};
