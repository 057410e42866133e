//! Turn controller: roll, move, resolve, update status.

use crate::dice::{self, DiceSource};
use crate::encounter;
use crate::log::{Category, LogEntry};
use crate::session::{Session, SessionStatus};
use crate::tile::{Tile, TileKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::Display;
use tracing::{debug, info, instrument};

/// What happens when a bonus tile grants an extra turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ExtraTurnPolicy {
    /// The controller plays another turn within the same round.
    #[default]
    Grant,
    /// The extra turn is only mentioned in the log.
    Cosmetic,
}

/// Summary of one played turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based turn number.
    pub turn: u32,
    /// Dice value.
    pub roll: u8,
    /// Position before moving.
    pub from: usize,
    /// Position after moving.
    pub to: usize,
    /// Kind of tile resolved.
    pub tile: TileKind,
    /// Number of log entries this turn appended.
    pub entries_added: usize,
    /// Session status after the turn.
    pub status: SessionStatus,
    /// True when this turn left an extra turn pending.
    pub extra_turn: bool,
}

/// Drives turns for a session using an injected dice source.
#[derive(Debug, Clone)]
pub struct TurnController<D> {
    dice: D,
    policy: ExtraTurnPolicy,
}

impl<D: DiceSource> TurnController<D> {
    /// Creates a controller that grants extra turns.
    pub fn new(dice: D) -> Self {
        Self {
            dice,
            policy: ExtraTurnPolicy::default(),
        }
    }

    /// Sets the extra turn policy.
    pub fn with_policy(mut self, policy: ExtraTurnPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The extra turn policy in use.
    pub fn policy(&self) -> ExtraTurnPolicy {
        self.policy
    }

    /// Mutable access to the dice source.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Plays exactly one turn.
    ///
    /// Returns `None` without touching the session unless it is `InProgress`.
    #[instrument(skip_all, fields(status = %session.status(), turn = session.turn_count() + 1))]
    pub fn play_turn(&mut self, session: &mut Session) -> Option<TurnReport> {
        if session.status() != SessionStatus::InProgress {
            debug!("Ignoring turn on a session that is not in progress");
            return None;
        }
        let roll = self.dice.roll();
        Some(apply_roll(session, roll, self.policy))
    }

    /// Plays one turn plus any extra turns it grants.
    pub fn play_round(&mut self, session: &mut Session) -> Vec<TurnReport> {
        self.play_round_capped(session, u32::MAX)
    }

    /// Like [`play_round`](Self::play_round), but never lets the session's
    /// turn count exceed `max_turns`. An extra turn cut off by the cap stays
    /// pending on the session.
    #[instrument(skip_all, fields(max_turns))]
    pub fn play_round_capped(&mut self, session: &mut Session, max_turns: u32) -> Vec<TurnReport> {
        let mut reports = Vec::new();
        if session.turn_count() >= max_turns {
            return reports;
        }
        let Some(first) = self.play_turn(session) else {
            return reports;
        };
        reports.push(first);

        while session.extra_turn_pending() && session.status() == SessionStatus::InProgress {
            if session.turn_count() >= max_turns {
                debug!(turns = session.turn_count(), "Turn cap cuts the round short");
                break;
            }
            info!(turn = session.turn_count() + 1, "Playing extra turn");
            match self.play_turn(session) {
                Some(report) => reports.push(report),
                None => break,
            }
        }
        reports
    }
}

static FALLBACK_TILE: Tile = Tile::Empty;

/// Applies one turn with a known dice value. Callers guarantee the session is `InProgress`.
pub(crate) fn apply_roll(session: &mut Session, roll: u8, policy: ExtraTurnPolicy) -> TurnReport {
    let roll = dice::clamp_face(roll);
    let turn = session.turn_count + 1;
    let from = session.position;
    let log_before = session.log.len();
    session.extra_turn_pending = false;

    session.log.push(LogEntry::new(
        turn,
        Category::Narration,
        format!("Turn {turn}: you rolled a {roll}."),
    ));

    let board = Arc::clone(&session.board);
    let to = board.clamp_move(from, usize::from(roll));
    let message = if to == from {
        format!("You stay on tile {to}.")
    } else {
        format!("You move from tile {from} to tile {to}.")
    };
    session.log.push(LogEntry::new(turn, Category::Narration, message));

    debug_assert!(to < board.len(), "clamped position must be on the board");
    let tile = board.get(to).unwrap_or(&FALLBACK_TILE);
    let resolution = encounter::resolve(session.character.clone(), tile, turn);

    session.log.extend(resolution.events);
    session.character = resolution.character;
    session.position = to;
    session.turn_count = turn;
    session.rolls.push(roll);

    let at_last_tile = board.last_index() == Some(to);
    session.status = if session.character.is_defeated() {
        SessionStatus::GameOver
    } else if resolution.terminal {
        SessionStatus::Completed
    } else if at_last_tile {
        session.log.push(LogEntry::new(
            turn,
            Category::Victory,
            "You reached the end of the board. Adventure completed!",
        ));
        SessionStatus::Completed
    } else {
        SessionStatus::InProgress
    };

    session.extra_turn_pending = resolution.extra_turn
        && policy == ExtraTurnPolicy::Grant
        && session.status == SessionStatus::InProgress;

    #[cfg(debug_assertions)]
    crate::invariants::assert_invariants(session);
    debug_assert!(session.position >= from, "position must never move backwards");

    let report = TurnReport {
        turn,
        roll,
        from,
        to,
        tile: tile.kind(),
        entries_added: session.log.len() - log_before,
        status: session.status,
        extra_turn: session.extra_turn_pending,
    };

    info!(
        turn,
        roll,
        from,
        to,
        tile = %report.tile,
        status = %report.status,
        health = session.character.health(),
        "Turn played"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::dice::ScriptedDice;
    use crate::session::start_session;
    use crate::tile::{Board, BonusEffect};

    fn goblin_board() -> Board {
        Board::new(vec![
            Tile::Empty,
            Tile::Monster {
                name: "Goblin".into(),
                attack_power: 5,
            },
            Tile::End,
        ])
    }

    #[test]
    fn test_single_end_tile_completes_immediately() {
        let mut session =
            start_session(Board::new(vec![Tile::End]), Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([4]));

        let report = controller.play_turn(&mut session).unwrap();

        assert_eq!(report.to, 0);
        assert_eq!(session.position(), 0);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(session.log().iter().any(|e| e.category == Category::Victory));
    }

    #[test]
    fn test_winning_the_fight_keeps_playing() {
        let mut session = start_session(goblin_board(), Character::new(100, 10, 0)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        controller.play_turn(&mut session);

        assert_eq!(session.position(), 1);
        assert_eq!(*session.character().experience(), 10);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn test_losing_the_fight_ends_the_game() {
        let mut session = start_session(goblin_board(), Character::new(15, 2, 0)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        controller.play_turn(&mut session);

        assert_eq!(*session.character().health(), 0);
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert!(session.log().iter().any(|e| e.category == Category::Defeat));
    }

    #[test]
    fn test_terminal_session_ignores_turns() {
        let mut session = start_session(goblin_board(), Character::new(15, 2, 0)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));
        controller.play_turn(&mut session);
        let snapshot = session.clone();

        assert!(controller.play_turn(&mut session).is_none());
        assert!(controller.play_round(&mut session).is_empty());
        assert_eq!(session, snapshot);
    }

    #[test]
    fn test_not_started_session_ignores_turns() {
        let mut session = Session::new(goblin_board(), Character::new(100, 1, 1));
        let mut controller = TurnController::new(ScriptedDice::new([1]));
        assert!(controller.play_turn(&mut session).is_none());
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_last_tile_counts_as_the_end() {
        let board = Board::new(vec![Tile::Empty, Tile::Empty, Tile::Empty]);
        let mut session = start_session(board, Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([6]));

        let report = controller.play_turn(&mut session).unwrap();

        assert_eq!(report.to, 2);
        assert_eq!(report.tile, TileKind::Empty);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.log().last().map(|e| e.category), Some(Category::Victory));
    }

    #[test]
    fn test_defeat_on_last_tile_is_game_over() {
        let board = Board::new(vec![
            Tile::Empty,
            Tile::Trap {
                name: "Spikes".into(),
                damage: 50,
            },
        ]);
        let mut session = start_session(board, Character::new(40, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([3]));

        controller.play_turn(&mut session);

        assert_eq!(session.status(), SessionStatus::GameOver);
        assert!(session.log().iter().all(|e| e.category != Category::Victory));
    }

    fn bonus_board() -> Board {
        Board::new(vec![
            Tile::Empty,
            Tile::Bonus {
                description: "Tailwind".into(),
                effect: BonusEffect::ExtraTurn,
            },
            Tile::Empty,
            Tile::Empty,
            Tile::End,
        ])
    }

    #[test]
    fn test_round_plays_granted_extra_turn() {
        let mut session = start_session(bonus_board(), Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        let reports = controller.play_round(&mut session);

        assert_eq!(reports.len(), 2);
        assert!(reports[0].extra_turn);
        assert!(!reports[1].extra_turn);
        assert_eq!(session.position(), 2);
        assert_eq!(session.turn_count(), 2);
        assert!(!session.extra_turn_pending());
    }

    #[test]
    fn test_cosmetic_policy_only_logs() {
        let mut session = start_session(bonus_board(), Character::new(100, 1, 1)).unwrap();
        let mut controller =
            TurnController::new(ScriptedDice::new([1])).with_policy(ExtraTurnPolicy::Cosmetic);

        let reports = controller.play_round(&mut session);

        assert_eq!(reports.len(), 1);
        assert!(!session.extra_turn_pending());
        assert!(session.log().iter().any(|e| e.message.contains("extra turn")));
    }

    fn chained_bonus_board() -> Board {
        let bonus = Tile::Bonus {
            description: "Tailwind".into(),
            effect: BonusEffect::ExtraTurn,
        };
        Board::new(vec![
            Tile::Empty,
            bonus.clone(),
            bonus.clone(),
            bonus,
            Tile::Empty,
            Tile::Empty,
            Tile::End,
        ])
    }

    #[test]
    fn test_capped_round_stops_chained_extra_turns() {
        let mut session = start_session(chained_bonus_board(), Character::new(100, 1, 1)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1]));

        let reports = controller.play_round_capped(&mut session, 2);

        assert_eq!(reports.len(), 2);
        assert_eq!(session.turn_count(), 2);
        assert_eq!(session.position(), 2);
        assert!(session.extra_turn_pending());
        assert!(controller.play_round_capped(&mut session, 2).is_empty());

        let reports = controller.play_round(&mut session);
        assert_eq!(reports.len(), 2);
        assert_eq!(session.position(), 4);
    }

    #[test]
    fn test_turn_entries_are_tagged_with_turn_number() {
        let mut session = start_session(goblin_board(), Character::new(100, 10, 0)).unwrap();
        let mut controller = TurnController::new(ScriptedDice::new([1, 1]));

        controller.play_turn(&mut session);
        controller.play_turn(&mut session);

        let turns: Vec<u32> = session.log().iter().map(|e| e.turn_index).collect();
        assert!(turns.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(turns.first(), Some(&1));
        assert_eq!(turns.last(), Some(&2));
        assert_eq!(session.status(), SessionStatus::Completed);
    }
}
