//! Turn log entries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kind of event recorded in the log. Drives icon and color choice during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Rolls, moves and anything without a specific category.
    Narration,
    /// Monster fights.
    Combat,
    /// Treasure, gold and items.
    Treasure,
    /// Traps.
    Trap,
    /// Healing.
    Heal,
    /// Bonus squares.
    Bonus,
    /// Reaching the end.
    Victory,
    /// Health reaching zero.
    Defeat,
}

impl Category {
    /// Icon shown next to entries of this category.
    pub fn icon(self) -> &'static str {
        match self {
            Category::Narration => "🎲",
            Category::Combat => "⚔️",
            Category::Treasure => "💰",
            Category::Trap => "🪤",
            Category::Heal => "💚",
            Category::Bonus => "✨",
            Category::Victory => "🏆",
            Category::Defeat => "💀",
        }
    }

    /// Best-effort category for free text that arrived without one.
    ///
    /// Lossy: this only looks for keywords, so a message such as "the trap
    /// door led to treasure" lands in whichever category is checked first.
    /// Entries built by the encounter resolver are always tagged explicitly
    /// and never pass through here.
    pub fn classify(message: &str) -> Self {
        const RULES: [(Category, &[&str]); 7] = [
            (Category::Defeat, &["defeat", "game over", "fallen", "died"]),
            (Category::Victory, &["victory", "completed", "reached the end", "goal"]),
            (Category::Combat, &["combat", "monster", "attack", "fight", "battle"]),
            (Category::Trap, &["trap"]),
            (Category::Heal, &["heal", "recover", "restore"]),
            (Category::Treasure, &["treasure", "gold", "item", "chest"]),
            (Category::Bonus, &["bonus", "extra turn"]),
        ];

        let lower = message.to_lowercase();
        RULES
            .iter()
            .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Narration)
    }
}

/// One line of the turn log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Turn that produced the entry (1-based; 0 for entries before the first turn).
    pub turn_index: u32,
    /// Human-readable message.
    pub message: String,
    /// Event category.
    pub category: Category,
}

impl LogEntry {
    /// Creates an explicitly tagged entry.
    pub fn new(turn_index: u32, category: Category, message: impl Into<String>) -> Self {
        Self {
            turn_index,
            message: message.into(),
            category,
        }
    }

    /// Creates an entry from untagged upstream text, classifying it by keyword.
    pub fn from_opaque(turn_index: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        let category = Category::classify(&message);
        Self {
            turn_index,
            message,
            category,
        }
    }

    /// Message prefixed with the category icon.
    pub fn display_line(&self) -> String {
        format!("{} {}", self.category.icon(), self.message)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[turn {}] {}", self.turn_index, self.message)
    }
}
