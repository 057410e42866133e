//! Encounter resolution: what a tile does to the character who lands on it.
//!
//! Resolution is a pure function of the character and the tile. It never
//! rolls dice and never touches the session.

use crate::character::Character;
use crate::log::{Category, LogEntry};
use crate::tile::{BonusEffect, Tile};
use tracing::{debug, instrument};

/// Experience awarded for defeating a monster.
pub const MONSTER_EXPERIENCE: u32 = 10;
/// Health lost when a monster wins the fight.
pub const MONSTER_DAMAGE: u32 = 20;

/// Outcome of resolving one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Character after the encounter.
    pub character: Character,
    /// Entries describing the encounter, in order.
    pub events: Vec<LogEntry>,
    /// True when the encounter ends the game (defeat or End tile).
    pub terminal: bool,
    /// True when the tile granted an extra turn.
    pub extra_turn: bool,
}

struct Events {
    turn: u32,
    entries: Vec<LogEntry>,
}

impl Events {
    fn push(&mut self, category: Category, message: impl Into<String>) {
        self.entries.push(LogEntry::new(self.turn, category, message));
    }
}

/// Resolves `tile` against `character` during turn `turn_index`.
#[instrument(skip(character), fields(health = character.health()))]
pub fn resolve(mut character: Character, tile: &Tile, turn_index: u32) -> Resolution {
    let mut events = Events {
        turn: turn_index,
        entries: Vec::new(),
    };
    let mut terminal = false;
    let mut extra_turn = false;

    match tile {
        Tile::Monster { name, attack_power } => {
            if *character.attack() > *attack_power {
                events.push(
                    Category::Combat,
                    format!(
                        "Combat! You defeated the {name} ({} vs {attack_power}).",
                        character.attack()
                    ),
                );
                character.gain_experience(MONSTER_EXPERIENCE);
                events.push(
                    Category::Combat,
                    format!("You gained {MONSTER_EXPERIENCE} experience."),
                );
            } else {
                let lost = character.take_damage(MONSTER_DAMAGE);
                events.push(
                    Category::Combat,
                    format!(
                        "Combat! The {name} overpowers you ({} vs {attack_power}). \
                         You lose {lost} health.",
                        character.attack()
                    ),
                );
                terminal = push_defeat_if_fallen(&character, &mut events);
            }
        }
        Tile::Treasure {
            name,
            gold_amount,
            item_name,
        } => {
            events.push(Category::Treasure, format!("You found a treasure: {name}!"));
            if let Some(gold) = gold_amount {
                character.add_gold(*gold);
                events.push(Category::Treasure, format!("You collected {gold} gold."));
            }
            if let Some(item) = item_name {
                events.push(Category::Treasure, format!("You obtained {item}."));
            }
        }
        Tile::Trap { name, damage } => {
            events.push(Category::Trap, format!("It's a trap! {name} springs."));
            let lost = character.take_damage(*damage);
            events.push(Category::Trap, format!("You lose {lost} health."));
            terminal = push_defeat_if_fallen(&character, &mut events);
        }
        Tile::Heal { name, value } => {
            events.push(Category::Heal, format!("You found {name}."));
            let gained = character.heal(*value);
            events.push(
                Category::Heal,
                format!(
                    "You recover {gained} health (now {}).",
                    character.health()
                ),
            );
        }
        Tile::Bonus {
            description,
            effect,
        } => {
            events.push(Category::Bonus, format!("Bonus! {description}"));
            if *effect == BonusEffect::ExtraTurn {
                extra_turn = true;
                events.push(Category::Bonus, "You earned an extra turn!");
            }
        }
        Tile::End => {
            events.push(
                Category::Victory,
                "You reached the goal. Adventure completed!",
            );
            terminal = true;
        }
        Tile::Empty => {
            events.push(Category::Narration, "Nothing happens here.");
        }
    }

    debug!(
        kind = %tile.kind(),
        health = character.health(),
        terminal,
        events = events.entries.len(),
        "Resolved encounter"
    );

    Resolution {
        character,
        events: events.entries,
        terminal,
        extra_turn,
    }
}

fn push_defeat_if_fallen(character: &Character, events: &mut Events) -> bool {
    if character.is_defeated() {
        events.push(Category::Defeat, "You have been defeated. Game over.");
        true
    } else {
        false
    }
}
