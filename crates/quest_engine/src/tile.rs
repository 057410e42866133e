//! Tile vocabulary and board layout.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter};

/// Effect carried by a bonus tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum BonusEffect {
    /// Grants the character another turn.
    ExtraTurn,
    /// Flavor only, no mechanical effect.
    #[serde(other)]
    Flavor,
}

/// One addressable position on the board.
///
/// Tiles are immutable descriptors; the encounter resolver reads them and
/// never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumDiscriminants)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum_discriminants(name(TileKind))]
#[strum_discriminants(derive(Hash, Display, EnumIter, Serialize, Deserialize))]
#[strum_discriminants(serde(rename_all = "snake_case"))]
pub enum Tile {
    /// A monster to fight.
    Monster {
        /// Monster name.
        name: String,
        /// Attack the character must beat to win.
        attack_power: u32,
    },
    /// A treasure chest.
    Treasure {
        /// Treasure name.
        name: String,
        /// Gold inside, if any.
        #[serde(default)]
        gold_amount: Option<u32>,
        /// Item inside, if any.
        #[serde(default)]
        item_name: Option<String>,
    },
    /// A trap dealing fixed damage.
    Trap {
        /// Trap name.
        name: String,
        /// Health removed when triggered.
        damage: u32,
    },
    /// A healing spring.
    Heal {
        /// Source name.
        name: String,
        /// Health restored.
        value: u32,
    },
    /// A bonus square.
    Bonus {
        /// Flavor text.
        description: String,
        /// Mechanical effect.
        effect: BonusEffect,
    },
    /// The goal.
    End,
    /// Nothing here.
    Empty,
}

impl Tile {
    /// Returns the kind of this tile.
    pub fn kind(&self) -> TileKind {
        TileKind::from(self)
    }

    /// Returns true for the End tile.
    pub fn is_end(&self) -> bool {
        matches!(self, Tile::End)
    }
}

/// Ordered sequence of tiles, fixed for the lifetime of a session.
///
/// An empty board can be built (it arrives from outside the engine) but a
/// session refuses to start on one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Creates a board from its tiles.
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true when the board has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Gets the tile at `index`.
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Index of the last tile, `None` on an empty board.
    pub fn last_index(&self) -> Option<usize> {
        self.tiles.len().checked_sub(1)
    }

    /// All tiles in order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Position reached from `from` after moving `steps`, clamped to the last tile.
    pub fn clamp_move(&self, from: usize, steps: usize) -> usize {
        let last = self.last_index().unwrap_or(0);
        from.saturating_add(steps).min(last)
    }
}

impl FromIterator<Tile> for Board {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
