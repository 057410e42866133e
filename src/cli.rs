//! Command-line interface for board_quest.

use clap::{Parser, Subcommand, ValueEnum};
use quest_engine::ExtraTurnPolicy;

/// Board Quest - turn-based adventure board simulation
#[derive(Parser, Debug)]
#[command(name = "board_quest")]
#[command(about = "Simulate an adventure board and replay its log", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Extra turn handling as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtraTurnArg {
    /// Bonus extra turns are played.
    Grant,
    /// Bonus extra turns are only logged.
    Cosmetic,
}

impl From<ExtraTurnArg> for ExtraTurnPolicy {
    fn from(arg: ExtraTurnArg) -> Self {
        match arg {
            ExtraTurnArg::Grant => ExtraTurnPolicy::Grant,
            ExtraTurnArg::Cosmetic => ExtraTurnPolicy::Cosmetic,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a scenario to the end and replay its log
    Play {
        /// Path to the scenario TOML file
        #[arg(short, long)]
        scenario: std::path::PathBuf,

        /// Path to an optional config TOML file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Dice seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Step through the log on a timer instead of printing it at once
        #[arg(long)]
        autoplay: bool,

        /// Milliseconds between auto-play steps (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Extra turn handling (overrides config)
        #[arg(long, value_enum)]
        extra_turns: Option<ExtraTurnArg>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scenario file without playing it
    Check {
        /// Path to the scenario TOML file
        #[arg(short, long)]
        scenario: std::path::PathBuf,
    },
}
