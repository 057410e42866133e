//! Session errors.

use crate::session::SessionStatus;
use derive_more::{Display, Error};
use tracing::instrument;

/// The board handed to a session cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid board: {} at {}:{}", message, file, line)]
pub struct InvalidBoardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InvalidBoardError {
    /// Creates a new board error with caller location tracking.
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

/// Error starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The board failed validation.
    #[display("{}", _0)]
    InvalidBoard(InvalidBoardError),

    /// `start` was called on a session that already left `NotStarted`.
    #[display("Session already started (status: {})", _0)]
    AlreadyStarted(#[error(not(source))] SessionStatus),
}

impl From<InvalidBoardError> for SessionError {
    #[track_caller]
    fn from(err: InvalidBoardError) -> Self {
        Self::InvalidBoard(err)
    }
}
