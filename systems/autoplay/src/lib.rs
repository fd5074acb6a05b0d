#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous player that picks moves with a fixed heuristic and commits
//! them on a cooperative timer.

pub mod policy;
pub mod timer;

use std::time::Duration;

use wumpus_core::{BoardView, Command, Direction, Event, SessionStamp};

pub use policy::choose_move;
use timer::{TimerHandle, TimerQueue};

/// Pause before the autonomous player starts deliberating on its next move.
pub const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(1500);

/// Deliberation pause between choosing a move and committing it.
pub const DEFAULT_THINKING_DELAY: Duration = Duration::from_millis(1000);

/// Configuration parameters required to construct the autoplay system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    turn_delay: Duration,
    thinking_delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided delays.
    #[must_use]
    pub const fn new(turn_delay: Duration, thinking_delay: Duration) -> Self {
        Self {
            turn_delay,
            thinking_delay,
        }
    }

    /// Pause before each deliberation starts.
    #[must_use]
    pub const fn turn_delay(&self) -> Duration {
        self.turn_delay
    }

    /// Pause between choosing and committing a move.
    #[must_use]
    pub const fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_DELAY, DEFAULT_THINKING_DELAY)
    }
}

/// Stage the autoplay loop is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingStep {
    /// Waiting for the turn delay before deliberating.
    Turn,
    /// Deliberating on a chosen direction before committing it.
    Commit {
        /// Direction that will be played.
        direction: Direction,
        /// Game state the choice was made against.
        stamp: SessionStamp,
    },
}

/// Pure system that drives the player while autoplay is enabled.
///
/// At most one timer is pending at any time. It is cancelled whenever
/// autoplay is switched off, the game resets or ends, or the system is
/// dropped.
#[derive(Debug)]
pub struct Autoplay {
    config: Config,
    timers: TimerQueue<PendingStep>,
    pending: Option<TimerHandle>,
    enabled: bool,
}

impl Autoplay {
    /// Creates a new autoplay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            timers: TimerQueue::new(),
            pending: None,
            enabled: false,
        }
    }

    /// Configuration the system was built with.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Reports whether the loop is currently active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stage the loop is currently waiting on, if any.
    #[must_use]
    pub fn pending_step(&self) -> Option<PendingStep> {
        self.pending
            .and_then(|handle| self.timers.get(handle))
            .copied()
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Consumes world events and the current board to emit commands.
    ///
    /// Due timers fire in deadline order until one of them issues commands.
    /// The caller applies those and hands the resulting events back, at
    /// which point the remaining delivered time is worked off, so a single
    /// large `dt` plays out every stage that fits inside it.
    pub fn handle(
        &mut self,
        events: &[Event],
        board: BoardView<'_>,
        stamp: SessionStamp,
        out: &mut Vec<Command>,
    ) {
        let issued = out.len();
        for event in events {
            match event {
                Event::AutoplayToggled { enabled: true } => {
                    self.enabled = true;
                    let _ = self.cancel_pending();
                    self.schedule_turn(board);
                }
                Event::AutoplayToggled { enabled: false } | Event::GameReset => {
                    self.enabled = false;
                    let _ = self.cancel_pending();
                }
                Event::GameEnded { .. } => {
                    let _ = self.cancel_pending();
                }
                Event::PlayerMoved { .. } | Event::ArrowFired { .. } => {
                    if !self.enabled {
                        continue;
                    }
                    if let Some(PendingStep::Commit { .. }) = self.cancel_pending() {
                        tracing::debug!("pending autoplay decision superseded");
                        out.push(Command::SetThinking { thinking: false });
                    }
                    self.schedule_turn(board);
                }
                Event::TimeAdvanced { dt } => self.timers.advance(*dt),
                Event::WumpusKilled { .. }
                | Event::ArrowMissed
                | Event::ThinkingChanged { .. } => {}
            }
        }

        while out.len() == issued {
            let Some((handle, step)) = self.timers.pop_due() else {
                break;
            };
            if self.pending == Some(handle) {
                self.pending = None;
            }
            match step {
                PendingStep::Turn => self.deliberate(board, stamp, out),
                PendingStep::Commit {
                    direction,
                    stamp: chosen_at,
                } => self.commit(direction, chosen_at, board, stamp, out),
            }
        }
    }

    /// Cancels every pending timer and stops the loop.
    pub fn shutdown(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.pending = None;
        self.enabled = false;
        if cancelled > 0 {
            tracing::debug!(cancelled, "autoplay timers cancelled on shutdown");
        }
    }

    fn deliberate(&mut self, board: BoardView<'_>, stamp: SessionStamp, out: &mut Vec<Command>) {
        if !self.enabled || board.status().is_terminal() {
            return;
        }
        let Some(direction) = choose_move(&board) else {
            tracing::debug!(player = %board.player(), "autoplay found no move");
            return;
        };

        tracing::debug!(%direction, "autoplay thinking");
        out.push(Command::SetThinking { thinking: true });
        self.schedule(
            self.config.thinking_delay,
            PendingStep::Commit { direction, stamp },
        );
    }

    fn commit(
        &mut self,
        direction: Direction,
        chosen_at: SessionStamp,
        board: BoardView<'_>,
        stamp: SessionStamp,
        out: &mut Vec<Command>,
    ) {
        out.push(Command::SetThinking { thinking: false });
        if chosen_at != stamp {
            tracing::debug!(?chosen_at, ?stamp, "discarding stale autoplay decision");
            self.schedule_turn(board);
            return;
        }
        if !self.enabled {
            return;
        }

        tracing::info!("AI chose to move {direction}");
        out.push(Command::Move { direction });
    }

    fn schedule_turn(&mut self, board: BoardView<'_>) {
        if !self.enabled || board.status().is_terminal() || self.pending.is_some() {
            return;
        }
        self.schedule(self.config.turn_delay, PendingStep::Turn);
    }

    fn schedule(&mut self, delay: Duration, step: PendingStep) {
        let handle = self.timers.schedule(delay, step);
        tracing::trace!(handle = handle.get(), ?step, ?delay, "autoplay timer scheduled");
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self) -> Option<PendingStep> {
        let handle = self.pending.take()?;
        self.timers.cancel(handle)
    }
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.shutdown();
    }
}
