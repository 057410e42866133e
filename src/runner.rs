//! Plays a session through to a terminal status.

use derive_getters::Getters;
use quest_engine::{Character, DiceSource, Session, SessionStatus, TurnController};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct RunSummary {
    /// Final session status.
    status: SessionStatus,
    /// Turns played.
    turns: u32,
    /// Final tile index.
    position: usize,
    /// Character at the end of the run.
    character: Character,
    /// Number of log entries produced.
    log_len: usize,
    /// Dice value of every turn.
    rolls: Vec<u8>,
    /// True when the run stopped on the turn cap instead of a terminal status.
    capped: bool,
}

impl RunSummary {
    /// Summarizes the current state of a session.
    pub fn from_session(session: &Session, capped: bool) -> Self {
        Self {
            status: session.status(),
            turns: session.turn_count(),
            position: session.position(),
            character: session.character().clone(),
            log_len: session.log().len(),
            rolls: session.rolls().to_vec(),
            capped,
        }
    }
}

/// Plays rounds until the session is terminal or `max_turns` turns have been played.
#[instrument(skip(session, controller), fields(tiles = session.board().len()))]
pub fn run_session<D: DiceSource>(
    session: &mut Session,
    controller: &mut TurnController<D>,
    max_turns: u32,
) -> RunSummary {
    info!(policy = %controller.policy(), "Running session");

    while session.status() == SessionStatus::InProgress {
        if session.turn_count() >= max_turns {
            warn!(turns = session.turn_count(), "Turn cap reached, stopping run");
            return RunSummary::from_session(session, true);
        }
        let reports = controller.play_round_capped(session, max_turns);
        debug!(turns_in_round = reports.len(), "Round finished");
        if reports.is_empty() {
            break;
        }
    }

    let summary = RunSummary::from_session(session, false);
    info!(
        status = %summary.status,
        turns = summary.turns,
        health = summary.character.health(),
        gold = summary.character.gold(),
        "Run finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_engine::{Board, BonusEffect, ScriptedDice, Tile, start_session};

    fn long_board() -> Board {
        let mut tiles = vec![Tile::Empty; 10];
        tiles.push(Tile::End);
        Board::new(tiles)
    }

    #[test]
    fn test_runs_to_completion() {
        let mut session = start_session(long_board(), Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([3]));

        let summary = run_session(&mut session, &mut controller, 100);

        assert_eq!(*summary.status(), SessionStatus::Completed);
        assert_eq!(*summary.turns(), 4);
        assert_eq!(summary.rolls(), &[3, 3, 3, 3]);
        assert!(!summary.capped());
    }

    #[test]
    fn test_turn_cap_holds_through_chained_extra_turns() {
        let bonus = Tile::Bonus {
            description: "Tailwind".to_string(),
            effect: BonusEffect::ExtraTurn,
        };
        let board = Board::new(vec![
            Tile::Empty,
            bonus.clone(),
            bonus.clone(),
            bonus,
            Tile::Empty,
            Tile::Empty,
            Tile::End,
        ]);
        let mut session = start_session(board, Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        let summary = run_session(&mut session, &mut controller, 1);

        assert_eq!(*summary.turns(), 1);
        assert_eq!(*summary.position(), 1);
        assert_eq!(*summary.status(), SessionStatus::InProgress);
        assert!(*summary.capped());
    }

    #[test]
    fn test_stops_at_turn_cap() {
        let mut session = start_session(long_board(), Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        let summary = run_session(&mut session, &mut controller, 2);

        assert_eq!(*summary.status(), SessionStatus::InProgress);
        assert_eq!(*summary.turns(), 2);
        assert!(*summary.capped());
    }
}
