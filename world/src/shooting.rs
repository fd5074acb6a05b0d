//! Resolution of the single arrow.

use wumpus_core::{CellKind, Direction, Event, Narration, SHOT_COST, WUMPUS_REWARD};

use crate::World;

impl World {
    /// Fires the arrow from the player's cell along `direction`.
    ///
    /// The arrow flies straight through pits, gold and sensors until it either
    /// strikes the Wumpus or leaves the grid. It is spent either way.
    pub(crate) fn resolve_shot(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.arrow_available || self.status.is_terminal() {
            return;
        }

        self.arrow_available = false;
        self.score += SHOT_COST;
        self.turn = self.turn.saturating_add(1);
        out_events.push(Event::ArrowFired { direction });

        let size = self.grid.size();
        let mut cursor = self.player;
        loop {
            let Some(next) = cursor.step(direction, size) else {
                self.narration = Narration::ArrowMissed;
                tracing::debug!(%direction, score = self.score, "arrow missed");
                out_events.push(Event::ArrowMissed);
                return;
            };

            if self.grid.get(next) == Some(CellKind::Wumpus) {
                self.grid.set(next, CellKind::Empty);
                self.score += WUMPUS_REWARD;
                self.narration = Narration::WumpusKilled;
                tracing::debug!(%direction, at = %next, score = self.score, "wumpus killed");
                out_events.push(Event::WumpusKilled { at: next });
                return;
            }

            cursor = next;
        }
    }
}
