//! First-class invariants for sessions.
//!
//! Invariants are logical properties that must hold after every turn.
//! They are testable independently and checked in debug builds by the
//! turn controller.

use crate::character::MAX_HEALTH;
use crate::session::{Session, SessionStatus};
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match <(I1, I2)>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(violations) => violations,
        };
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Position stays on the board (vacuous before the session starts).
#[derive(Debug, Clone, Copy)]
pub struct PositionOnBoard;

impl Invariant<Session> for PositionOnBoard {
    fn holds(session: &Session) -> bool {
        session.status() == SessionStatus::NotStarted || session.position() < session.board().len()
    }

    fn description() -> &'static str {
        "Position must be within the board"
    }
}

/// Health stays within `[0, MAX_HEALTH]`.
#[derive(Debug, Clone, Copy)]
pub struct HealthInRange;

impl Invariant<Session> for HealthInRange {
    fn holds(session: &Session) -> bool {
        *session.character().health() <= MAX_HEALTH
    }

    fn description() -> &'static str {
        "Health must stay within [0, 100]"
    }
}

/// Terminal status matches the state that produced it.
///
/// GameOver exactly when health is zero after a turn; Completed only with
/// health left and the character on the last tile.
#[derive(Debug, Clone, Copy)]
pub struct TerminalStatusConsistent;

impl Invariant<Session> for TerminalStatusConsistent {
    fn holds(session: &Session) -> bool {
        let defeated = session.character().is_defeated();
        match session.status() {
            SessionStatus::GameOver => defeated,
            SessionStatus::Completed => {
                !defeated
                    && (session.board().last_index() == Some(session.position())
                        || session.board().get(session.position()).is_some_and(|t| t.is_end()))
            }
            SessionStatus::InProgress => session.turn_count() == 0 || !defeated,
            SessionStatus::NotStarted => session.turn_count() == 0,
        }
    }

    fn description() -> &'static str {
        "Terminal status must match health and position"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (PositionOnBoard, HealthInRange, TerminalStatusConsistent);

/// Asserts that all session invariants hold (panics on violation in debug builds).
pub fn assert_invariants(session: &Session) {
    if let Err(violations) = SessionInvariants::check_all(session) {
        for violation in &violations {
            warn!(description = %violation.description, "Session invariant violated");
        }
        debug_assert!(violations.is_empty(), "Session invariants violated: {violations:?}");
    }
}
