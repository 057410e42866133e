//! Session state machine for one playthrough.

use crate::character::Character;
use crate::error::{InvalidBoardError, SessionError};
use crate::log::LogEntry;
use crate::tile::Board;
use crate::turn::{self, ExtraTurnPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::Display;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a session.
///
/// `NotStarted -> InProgress -> {Completed, GameOver}`. Nothing leaves a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SessionStatus {
    /// Created but not started.
    NotStarted,
    /// Accepting turns.
    InProgress,
    /// The character reached the end of the board.
    Completed,
    /// The character's health reached zero.
    GameOver,
}

impl SessionStatus {
    /// Returns true for `Completed` and `GameOver`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::GameOver)
    }
}

/// Full mutable state of one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) board: Arc<Board>,
    pub(crate) character: Character,
    pub(crate) position: usize,
    pub(crate) turn_count: u32,
    pub(crate) log: Vec<LogEntry>,
    pub(crate) status: SessionStatus,
    pub(crate) rolls: Vec<u8>,
    pub(crate) extra_turn_pending: bool,
}

impl Session {
    /// Creates a session in `NotStarted`.
    #[instrument(skip_all)]
    pub fn new(board: impl Into<Arc<Board>>, character: Character) -> Self {
        Self {
            board: board.into(),
            character,
            position: 0,
            turn_count: 0,
            log: Vec::new(),
            status: SessionStatus::NotStarted,
            rolls: Vec::new(),
            extra_turn_pending: false,
        }
    }

    /// Starts the session: validates the board and resets position, turn
    /// count and log.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::NotStarted {
            warn!("Attempted to start a session twice");
            return Err(SessionError::AlreadyStarted(self.status));
        }
        if self.board.is_empty() {
            warn!("Refusing to start on an empty board");
            return Err(InvalidBoardError::new("board has no tiles").into());
        }

        self.position = 0;
        self.turn_count = 0;
        self.log.clear();
        self.rolls.clear();
        self.extra_turn_pending = false;
        self.status = SessionStatus::InProgress;

        info!(tiles = self.board.len(), "Session started");
        Ok(())
    }

    /// Creates and starts a session in one step.
    pub fn start_new(
        board: impl Into<Arc<Board>>,
        character: Character,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(board, character);
        session.start()?;
        Ok(session)
    }

    /// Rebuilds a session by feeding recorded rolls through the turn controller.
    ///
    /// Rolls outside `[1, 6]` are clamped like any other die face. Rolls left
    /// over once the session becomes terminal are ignored.
    #[instrument(skip(board, character))]
    pub fn replay(
        board: impl Into<Arc<Board>>,
        character: Character,
        rolls: &[u8],
        policy: ExtraTurnPolicy,
    ) -> Result<Self, SessionError> {
        let mut session = Self::start_new(board, character)?;
        for &roll in rolls {
            if session.status != SessionStatus::InProgress {
                debug!(
                    remaining = rolls.len() - session.rolls.len(),
                    "Replay reached a terminal status"
                );
                break;
            }
            turn::apply_roll(&mut session, roll, policy);
        }
        Ok(session)
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Shared handle to the board.
    pub fn board_handle(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// The character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Current tile index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of turns played.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Accumulated log.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Copy of the log for a playback cursor.
    pub fn log_snapshot(&self) -> Arc<[LogEntry]> {
        Arc::from(self.log.as_slice())
    }

    /// Lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns true once the session is `Completed` or `GameOver`.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Dice value of every turn played, in order.
    pub fn rolls(&self) -> &[u8] {
        &self.rolls
    }

    /// True when the last turn granted an extra turn that has not been played.
    pub fn extra_turn_pending(&self) -> bool {
        self.extra_turn_pending
    }

    /// Hands the character back to the caller, ending the session.
    pub fn into_character(self) -> Character {
        self.character
    }
}

/// Starts a session on `board` for `character`.
pub fn start_session(
    board: impl Into<Arc<Board>>,
    character: Character,
) -> Result<Session, SessionError> {
    Session::start_new(board, character)
}
