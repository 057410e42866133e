//! Scenario files: the starting character and the board layout.

use derive_getters::Getters;
use derive_more::{Display, Error};
use quest_engine::{Board, Character, Session, SessionError, TileKind, start_session};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Initial character and board for one playthrough.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name.
    #[serde(default = "default_name")]
    name: String,

    /// Starting character.
    character: Character,

    /// Board tiles in order.
    #[serde(default)]
    tiles: Board,
}

fn default_name() -> String {
    "Untitled quest".to_string()
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(name: impl Into<String>, character: Character, tiles: Board) -> Self {
        Self {
            name: name.into(),
            character,
            tiles,
        }
    }

    /// Loads a scenario from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        debug!("Loading scenario from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScenarioError::new(format!("Failed to read scenario file: {}", e)))?;

        let scenario = Self::from_toml(&content)?;
        info!(
            name = %scenario.name,
            tiles = scenario.tiles.len(),
            "Scenario loaded successfully"
        );
        Ok(scenario)
    }

    /// Parses a scenario from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        toml::from_str(content)
            .map_err(|e| ScenarioError::new(format!("Failed to parse scenario: {}", e)))
    }

    /// Number of tiles of each kind, in declaration order, zeros included.
    pub fn tile_counts(&self) -> Vec<(TileKind, usize)> {
        TileKind::iter()
            .map(|kind| {
                let count = self.tiles.tiles().iter().filter(|t| t.kind() == kind).count();
                (kind, count)
            })
            .collect()
    }

    /// Checks that a session can start on this scenario.
    ///
    /// A board without an End tile is still playable (the last tile counts
    /// as the goal) but is reported.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn validate(&self) -> Result<(), SessionError> {
        Session::new(self.tiles.clone(), self.character.clone()).start()?;
        if !self.tiles.tiles().iter().any(|t| t.kind() == TileKind::End) {
            warn!("Board has no End tile; the last tile acts as the goal");
        }
        Ok(())
    }

    /// Starts a session on this scenario.
    pub fn start(self) -> Result<Session, SessionError> {
        start_session(self.tiles, self.character)
    }
}

/// Scenario loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Scenario error: {} at {}:{}", message, file, line)]
pub struct ScenarioError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScenarioError {
    /// Creates a new scenario error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
