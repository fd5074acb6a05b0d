#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-player session that wires the world to the autoplay system.

use std::time::Duration;

use wumpus_core::{Command, Direction, Event, GameSnapshot};
use wumpus_system_autoplay::{Autoplay, Config as AutoplayConfig};
use wumpus_world::{self as world, query, GenerationError, World, WorldConfig};

/// Owns one game and the autonomous player attached to it.
///
/// Every public operation applies a command to the world, feeds the
/// resulting events to the autoplay system and keeps applying the commands
/// it answers with until nothing further is produced. Dropping the session
/// drops the autoplay system, which cancels its timers.
#[derive(Debug)]
pub struct Session {
    world: World,
    autoplay: Autoplay,
    log: Vec<Event>,
}

impl Session {
    /// Builds a session around a freshly generated world.
    pub fn new(world: WorldConfig, autoplay: AutoplayConfig) -> Result<Self, GenerationError> {
        Ok(Self::with_world(World::new(world)?, autoplay))
    }

    /// Builds a session around an existing world.
    #[must_use]
    pub fn with_world(world: World, autoplay: AutoplayConfig) -> Self {
        Self {
            world,
            autoplay: Autoplay::new(autoplay),
            log: Vec::new(),
        }
    }

    /// Moves the player one cell.
    pub fn move_player(&mut self, direction: Direction) {
        self.submit(Command::Move { direction });
    }

    /// Fires the single arrow.
    pub fn shoot(&mut self, direction: Direction) {
        self.submit(Command::Shoot { direction });
    }

    /// Starts a new game on a freshly generated grid.
    pub fn reset(&mut self) {
        self.submit(Command::Reset);
    }

    /// Switches the autonomous player on or off.
    pub fn set_autoplay(&mut self, enabled: bool) {
        self.submit(Command::SetAutoplay { enabled });
    }

    /// Advances simulated time, firing any autoplay timers that come due.
    pub fn advance(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    /// Captures the player-facing view of the game.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        query::snapshot(&self.world)
    }

    /// Returns every event produced since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    /// Read-only access to the underlying world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the autoplay system.
    #[must_use]
    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    fn submit(&mut self, command: Command) {
        tracing::trace!(?command, "session command");
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let mut follow_up = Vec::new();
            self.autoplay.handle(
                &events,
                query::board_view(&self.world),
                query::stamp(&self.world),
                &mut follow_up,
            );

            for event in &events {
                if !matches!(event, Event::TimeAdvanced { .. }) {
                    tracing::debug!(?event, "session event");
                }
            }
            self.log.extend(events);
            pending = follow_up;
        }
    }
}
