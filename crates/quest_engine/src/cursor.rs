//! Playback cursor over a turn log.
//!
//! The cursor only points into a log snapshot; it never touches the session
//! that produced it. Timing lives with whoever drives [`PlaybackCursor::tick`].

use crate::log::LogEntry;
use std::sync::Arc;
use strum::Display;
use tracing::{debug, instrument};

/// Observable state of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CursorState {
    /// At the first entry (or the log is empty).
    Idle,
    /// Somewhere between the first and last entry under manual control.
    Advancing,
    /// Auto-play is enabled.
    AutoPlaying,
    /// At the last entry.
    AtEnd,
}

/// Result of a scheduled auto-play step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Moved forward, more entries remain.
    Advanced,
    /// Reached the last entry; auto-play switched itself off.
    Finished {
        /// Whether this tick moved the cursor.
        moved: bool,
    },
    /// Auto-play is off; nothing happened.
    Inactive,
}

/// Read-only pointer into a turn log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCursor {
    log: Arc<[LogEntry]>,
    index: usize,
    auto_playing: bool,
}

impl PlaybackCursor {
    /// Creates a cursor at the first entry with auto-play off.
    pub fn new(log: impl Into<Arc<[LogEntry]>>) -> Self {
        Self {
            log: log.into(),
            index: 0,
            auto_playing: false,
        }
    }

    /// The log being played back.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns true for an empty log.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Current index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether auto-play is enabled.
    pub fn is_auto_playing(&self) -> bool {
        self.auto_playing
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&LogEntry> {
        self.log.get(self.index)
    }

    fn last_index(&self) -> usize {
        self.log.len().saturating_sub(1)
    }

    /// Returns true when the cursor sits on the last entry.
    pub fn is_at_end(&self) -> bool {
        !self.log.is_empty() && self.index == self.last_index()
    }

    /// Current state. A one-entry log reports `AtEnd` rather than `Idle`.
    pub fn state(&self) -> CursorState {
        if self.auto_playing {
            CursorState::AutoPlaying
        } else if self.is_at_end() {
            CursorState::AtEnd
        } else if self.index == 0 {
            CursorState::Idle
        } else {
            CursorState::Advancing
        }
    }

    /// Moves to the next entry. Manual control switches auto-play off.
    /// Returns whether the cursor moved.
    #[instrument(skip(self), fields(index = self.index, len = self.log.len()))]
    pub fn advance(&mut self) -> bool {
        self.auto_playing = false;
        self.step_forward()
    }

    /// Moves to the previous entry. Manual control switches auto-play off.
    /// Returns whether the cursor moved.
    #[instrument(skip(self), fields(index = self.index))]
    pub fn retreat(&mut self) -> bool {
        self.auto_playing = false;
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Moves to the last entry and switches auto-play off.
    pub fn jump_to_end(&mut self) {
        self.auto_playing = false;
        self.index = self.last_index();
    }

    /// Enables or disables auto-play.
    pub fn set_auto_play(&mut self, enabled: bool) {
        debug!(enabled, index = self.index, "Setting auto-play");
        self.auto_playing = enabled;
    }

    /// Back to the first entry with auto-play off.
    pub fn reset(&mut self) {
        self.index = 0;
        self.auto_playing = false;
    }

    /// One scheduled auto-play step.
    pub fn tick(&mut self) -> Tick {
        if !self.auto_playing {
            return Tick::Inactive;
        }
        let moved = self.step_forward();
        if self.log.is_empty() || self.is_at_end() {
            self.auto_playing = false;
            debug!(index = self.index, "Auto-play reached the end");
            Tick::Finished { moved }
        } else {
            Tick::Advanced
        }
    }

    /// Swaps in a newer snapshot of a growing log, keeping the index when it still fits.
    pub fn replace_log(&mut self, log: impl Into<Arc<[LogEntry]>>) {
        self.log = log.into();
        self.index = self.index.min(self.last_index());
    }

    fn step_forward(&mut self) -> bool {
        if self.index < self.last_index() {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

/// Creates a cursor over `log`.
pub fn create_cursor(log: impl Into<Arc<[LogEntry]>>) -> PlaybackCursor {
    PlaybackCursor::new(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Category;

    fn log(n: u32) -> Vec<LogEntry> {
        (0..n)
            .map(|i| LogEntry::new(i, Category::Narration, format!("entry {i}")))
            .collect()
    }

    #[test]
    fn test_five_entry_walkthrough() {
        let mut cursor = create_cursor(log(5));
        cursor.jump_to_end();
        assert_eq!(cursor.index(), 4);
        assert!(!cursor.advance());
        assert_eq!(cursor.index(), 4);

        cursor.set_auto_play(true);
        assert!(cursor.retreat());
        assert!(!cursor.is_auto_playing());
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut cursor = create_cursor(log(3));
        assert!(!cursor.retreat());
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.state(), CursorState::Idle);
    }

    #[test]
    fn test_manual_advance_disables_auto_play() {
        let mut cursor = create_cursor(log(3));
        cursor.set_auto_play(true);
        assert_eq!(cursor.state(), CursorState::AutoPlaying);
        cursor.advance();
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.state(), CursorState::Advancing);
    }

    #[test]
    fn test_auto_play_stops_itself_at_the_end() {
        let mut cursor = create_cursor(log(3));
        cursor.set_auto_play(true);
        assert_eq!(cursor.tick(), Tick::Advanced);
        assert_eq!(cursor.tick(), Tick::Finished { moved: true });
        assert_eq!(cursor.state(), CursorState::AtEnd);
        assert_eq!(cursor.tick(), Tick::Inactive);
    }

    #[test]
    fn test_auto_play_enabled_at_end_finishes_without_moving() {
        let mut cursor = create_cursor(log(2));
        cursor.jump_to_end();
        cursor.set_auto_play(true);
        assert_eq!(cursor.tick(), Tick::Finished { moved: false });
        assert!(!cursor.is_auto_playing());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut cursor = create_cursor(log(4));
        cursor.advance();
        cursor.set_auto_play(true);
        cursor.reset();
        assert_eq!(cursor.index(), 0);
        assert!(!cursor.is_auto_playing());
    }

    #[test]
    fn test_empty_log_is_safe() {
        let mut cursor = create_cursor(Vec::<LogEntry>::new());
        assert!(!cursor.advance());
        cursor.jump_to_end();
        assert_eq!(cursor.index(), 0);
        assert!(cursor.current().is_none());
        cursor.set_auto_play(true);
        assert_eq!(cursor.tick(), Tick::Finished { moved: false });
        assert_eq!(cursor.state(), CursorState::Idle);
    }

    #[test]
    fn test_replace_log_keeps_position() {
        let mut cursor = create_cursor(log(3));
        cursor.jump_to_end();
        cursor.replace_log(log(6));
        assert_eq!(cursor.index(), 2);
        assert!(cursor.advance());
        cursor.replace_log(log(2));
        assert_eq!(cursor.index(), 1);
    }
}
