//! Timed playback of a turn log.
//!
//! The driver wraps a [`PlaybackCursor`] and publishes the entry under the
//! cursor to a consumer channel. Auto-play runs as a Tokio task owned by an
//! [`AutoPlayHandle`]; the task is aborted whenever the handle is stopped
//! or dropped, and it exits on its own once the consumer hangs up.

use quest_engine::{CursorState, LogEntry, PlaybackCursor, Tick};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Messages sent from the driver to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The cursor now points at `entry`.
    Showing {
        /// Cursor index.
        index: usize,
        /// Entry at that index.
        entry: LogEntry,
    },
    /// Auto-play reached the last entry and stopped.
    Finished {
        /// Final cursor index.
        index: usize,
    },
}

/// Owner of a running auto-play task. Dropping it cancels the task.
#[derive(Debug)]
pub struct AutoPlayHandle {
    task: JoinHandle<()>,
}

impl AutoPlayHandle {
    /// Cancels the task.
    pub fn cancel(self) {
        drop(self);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoPlayHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock(cursor: &Mutex<PlaybackCursor>) -> MutexGuard<'_, PlaybackCursor> {
    cursor.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives a cursor for a consumer, manually or on a timer.
#[derive(Debug)]
pub struct PlaybackDriver {
    cursor: Arc<Mutex<PlaybackCursor>>,
    interval: Duration,
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
    auto_play: Option<AutoPlayHandle>,
    // Bumped on every stop; a task whose generation is stale must not touch the cursor.
    generation: Arc<AtomicU64>,
}

impl PlaybackDriver {
    /// Creates a driver and the channel its events arrive on.
    pub fn new(
        cursor: PlaybackCursor,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let driver = Self {
            cursor: Arc::new(Mutex::new(cursor)),
            interval,
            event_tx,
            auto_play: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (driver, event_rx)
    }

    /// Current cursor index.
    pub fn index(&self) -> usize {
        lock(&self.cursor).index()
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<LogEntry> {
        lock(&self.cursor).current().cloned()
    }

    /// Cursor state.
    pub fn state(&self) -> CursorState {
        lock(&self.cursor).state()
    }

    /// Whether auto-play is enabled.
    pub fn is_auto_playing(&self) -> bool {
        lock(&self.cursor).is_auto_playing()
    }

    /// Sends the entry under the cursor to the consumer.
    pub fn show_current(&self) {
        let cursor = lock(&self.cursor);
        publish(&self.event_tx, &cursor);
    }

    /// Moves forward one entry, taking over from auto-play.
    #[instrument(skip(self))]
    pub fn advance(&mut self) -> bool {
        self.manual(PlaybackCursor::advance)
    }

    /// Moves back one entry, taking over from auto-play.
    #[instrument(skip(self))]
    pub fn retreat(&mut self) -> bool {
        self.manual(PlaybackCursor::retreat)
    }

    /// Moves to the last entry, taking over from auto-play.
    #[instrument(skip(self))]
    pub fn jump_to_end(&mut self) {
        self.manual(|cursor| {
            cursor.jump_to_end();
            true
        });
    }

    /// Back to the first entry with auto-play off.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.manual(|cursor| {
            cursor.reset();
            true
        });
    }

    /// Swaps in a newer snapshot of a growing log.
    pub fn replace_log(&mut self, log: impl Into<Arc<[LogEntry]>>) {
        lock(&self.cursor).replace_log(log);
    }

    /// Enables or disables auto-play.
    ///
    /// Enabling arms a task that advances the cursor every interval; it must
    /// be called from within a Tokio runtime.
    #[instrument(skip(self), fields(interval_ms = self.interval.as_millis() as u64))]
    pub fn set_auto_play(&mut self, enabled: bool) {
        self.stop_timer();
        lock(&self.cursor).set_auto_play(enabled);
        if enabled {
            self.auto_play = Some(self.arm());
            info!("Auto-play armed");
        }
    }

    fn manual(&mut self, op: impl FnOnce(&mut PlaybackCursor) -> bool) -> bool {
        self.stop_timer();
        let mut cursor = lock(&self.cursor);
        let moved = op(&mut cursor);
        if moved {
            publish(&self.event_tx, &cursor);
        }
        moved
    }

    fn stop_timer(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.auto_play.take() {
            debug!("Cancelling auto-play task");
            handle.cancel();
        }
    }

    fn arm(&self) -> AutoPlayHandle {
        let cursor = Arc::clone(&self.cursor);
        let event_tx = self.event_tx.clone();
        let period = self.interval;
        let generation = Arc::clone(&self.generation);
        let armed_at = generation.load(Ordering::SeqCst);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let mut guard = lock(&cursor);
                if generation.load(Ordering::SeqCst) != armed_at {
                    debug!(armed_at, "Stale auto-play task, exiting");
                    break;
                }
                let delivered = match guard.tick() {
                    Tick::Advanced => publish(&event_tx, &guard),
                    Tick::Finished { moved } => {
                        if moved {
                            publish(&event_tx, &guard);
                        }
                        let _ = event_tx.send(PlaybackEvent::Finished {
                            index: guard.index(),
                        });
                        debug!(index = guard.index(), "Auto-play finished");
                        break;
                    }
                    Tick::Inactive => break,
                };
                if !delivered {
                    debug!("Playback consumer gone, stopping auto-play");
                    guard.set_auto_play(false);
                    break;
                }
            }
        });

        AutoPlayHandle { task }
    }
}

/// Sends the current entry. Returns false when the consumer is gone.
fn publish(event_tx: &mpsc::UnboundedSender<PlaybackEvent>, cursor: &PlaybackCursor) -> bool {
    let Some(entry) = cursor.current() else {
        return true;
    };
    event_tx
        .send(PlaybackEvent::Showing {
            index: cursor.index(),
            entry: entry.clone(),
        })
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_engine::{Category, create_cursor};

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn log(n: u32) -> Vec<LogEntry> {
        (0..n)
            .map(|i| LogEntry::new(i, Category::Narration, format!("entry {i}")))
            .collect()
    }

    fn shown_index(event: Option<PlaybackEvent>) -> Option<usize> {
        match event {
            Some(PlaybackEvent::Showing { index, .. }) => Some(index),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_play_walks_to_the_end() {
        let (mut driver, mut events) = PlaybackDriver::new(create_cursor(log(3)), INTERVAL);
        let started = Instant::now();

        driver.set_auto_play(true);

        assert_eq!(shown_index(events.recv().await), Some(1));
        assert_eq!(shown_index(events.recv().await), Some(2));
        assert_eq!(events.recv().await, Some(PlaybackEvent::Finished { index: 2 }));
        assert!(started.elapsed() >= INTERVAL * 2);
        assert!(!driver.is_auto_playing());
        assert_eq!(driver.state(), CursorState::AtEnd);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_control_cancels_auto_play() {
        let (mut driver, mut events) = PlaybackDriver::new(create_cursor(log(5)), INTERVAL);

        driver.set_auto_play(true);
        assert!(driver.advance());
        assert!(!driver.is_auto_playing());

        tokio::time::sleep(INTERVAL * 4).await;

        assert_eq!(shown_index(events.try_recv().ok()), Some(1));
        assert!(events.try_recv().is_err());
        assert_eq!(driver.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_then_retreat_under_auto_play() {
        let (mut driver, _events) = PlaybackDriver::new(create_cursor(log(5)), INTERVAL);

        driver.jump_to_end();
        assert_eq!(driver.index(), 4);
        assert!(!driver.advance());

        driver.set_auto_play(true);
        assert!(driver.retreat());
        assert!(!driver.is_auto_playing());
        assert_eq!(driver.index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_and_rewinds() {
        let (mut driver, mut events) = PlaybackDriver::new(create_cursor(log(4)), INTERVAL);

        driver.set_auto_play(true);
        assert_eq!(shown_index(events.recv().await), Some(1));
        driver.reset();

        assert_eq!(driver.index(), 0);
        assert!(!driver.is_auto_playing());
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(shown_index(events.try_recv().ok()), Some(0));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_driver_cancels_the_timer() {
        let (mut driver, mut events) = PlaybackDriver::new(create_cursor(log(5)), INTERVAL);

        driver.set_auto_play(true);
        drop(driver);

        assert_eq!(events.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_stops_when_consumer_leaves() {
        let (mut driver, events) = PlaybackDriver::new(create_cursor(log(5)), INTERVAL);

        driver.set_auto_play(true);
        drop(events);
        tokio::time::sleep(INTERVAL * 2).await;

        assert!(!driver.is_auto_playing());
        assert_eq!(driver.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_leaves_one_live_timer() {
        let (mut driver, mut events) = PlaybackDriver::new(create_cursor(log(5)), INTERVAL);

        driver.set_auto_play(true);
        // Keep the first task alive as if its abort had not landed yet.
        let stale = driver.auto_play.take().unwrap();
        std::mem::forget(stale);
        driver.set_auto_play(true);

        tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;

        assert_eq!(driver.index(), 1);
        assert_eq!(shown_index(events.try_recv().ok()), Some(1));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_log_finishes_on_first_tick() {
        let (mut driver, mut events) =
            PlaybackDriver::new(create_cursor(Vec::<LogEntry>::new()), INTERVAL);

        driver.set_auto_play(true);

        assert_eq!(events.recv().await, Some(PlaybackEvent::Finished { index: 0 }));
    }
}
