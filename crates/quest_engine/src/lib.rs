//! Quest engine - turn-based adventure board simulation
//!
//! A character walks a linear board of tiles. Each turn rolls a die, moves
//! (never past the last tile), resolves the tile's encounter and appends
//! human-readable entries to the session log. A playback cursor replays that
//! log one entry at a time.
//!
//! # Architecture
//!
//! - **Tiles**: closed vocabulary of tile kinds and the board layout
//! - **Dice**: injectable dice sources (seeded, scripted, closure)
//! - **Encounter**: pure `(character, tile) -> (character, events, terminal)`
//! - **Turn**: roll, move, resolve, update status
//! - **Session**: NotStarted / InProgress / Completed / GameOver lifecycle
//! - **Cursor**: staged playback over the log
//!
//! # Example
//!
//! ```
//! use quest_engine::{
//!     Board, Character, ScriptedDice, SessionStatus, Tile, TurnController, start_session,
//! };
//!
//! let board = Board::new(vec![Tile::Empty, Tile::End]);
//! let mut session = start_session(board, Character::new(100, 5, 2)).unwrap();
//! let mut controller = TurnController::new(ScriptedDice::new([1]));
//! controller.play_turn(&mut session);
//! assert_eq!(session.status(), SessionStatus::Completed);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod character;
mod cursor;
mod dice;
mod encounter;
mod error;
mod log;
mod session;
mod tile;
mod turn;

pub mod invariants;

// Crate-level exports - Domain model
pub use character::{Character, MAX_HEALTH};
pub use tile::{Board, BonusEffect, Tile, TileKind};

// Crate-level exports - Dice
pub use dice::{DiceSource, FnDice, MAX_ROLL, MIN_ROLL, ScriptedDice, SeededDice};

// Crate-level exports - Log
pub use log::{Category, LogEntry};

// Crate-level exports - Encounters
pub use encounter::{MONSTER_DAMAGE, MONSTER_EXPERIENCE, Resolution, resolve};

// Crate-level exports - Session and turns
pub use error::{InvalidBoardError, SessionError};
pub use session::{Session, SessionStatus, start_session};
pub use turn::{ExtraTurnPolicy, TurnController, TurnReport};

// Crate-level exports - Playback
pub use cursor::{CursorState, PlaybackCursor, Tick, create_cursor};
