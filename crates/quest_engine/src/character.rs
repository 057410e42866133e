//! Character snapshot owned by a session.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Maximum health a character can hold.
pub const MAX_HEALTH: u32 = 100;

/// Mutable character snapshot.
///
/// Health is kept within `[0, MAX_HEALTH]` by every mutator. Gold and
/// experience only grow.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Character {
    /// Current health.
    #[serde(deserialize_with = "deserialize_health")]
    health: u32,
    /// Attack strength compared against monster attack power.
    attack: u32,
    /// Defense rating.
    defense: u32,
    /// Character level, never below 1.
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    level: u32,
    /// Accumulated experience.
    #[serde(default)]
    experience: u32,
    /// Accumulated gold.
    #[serde(default)]
    gold: u32,
}

fn default_level() -> u32 {
    1
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u32::deserialize(deserializer).map(|level| level.max(1))
}

fn deserialize_health<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u32::deserialize(deserializer).map(|health| health.min(MAX_HEALTH))
}

impl Character {
    /// Creates a fresh level 1 character with no experience or gold.
    #[instrument]
    pub fn new(health: u32, attack: u32, defense: u32) -> Self {
        Self {
            health: health.min(MAX_HEALTH),
            attack,
            defense,
            level: 1,
            experience: 0,
            gold: 0,
        }
    }

    /// Sets the level (values below 1 become 1).
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    /// Sets accumulated experience.
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    /// Sets accumulated gold.
    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    /// Returns true once health has reached zero.
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Removes health, stopping at zero. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        before - self.health
    }

    /// Restores health, stopping at `MAX_HEALTH`. Returns the health actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
        self.health - before
    }

    /// Adds experience.
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Adds gold.
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}
