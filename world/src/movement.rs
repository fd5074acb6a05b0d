//! Resolution of player moves.

use wumpus_core::{CellKind, Direction, Event, GameStatus, Narration, GOLD_REWARD, MOVE_COST};

use crate::World;

impl World {
    /// Steps the player one cell in `direction`.
    ///
    /// The move is ignored once the game has ended or when the destination
    /// lies outside the grid. The grid itself is never altered.
    pub(crate) fn resolve_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() {
            return;
        }
        let Some(destination) = self.player.step(direction, self.grid.size()) else {
            return;
        };
        let Some(content) = self.grid.get(destination) else {
            return;
        };

        let from = self.player;
        self.mark_visited(destination);
        self.player = destination;
        self.score += MOVE_COST;
        self.turn = self.turn.saturating_add(1);
        self.narration = Narration::arrival(content);

        tracing::debug!(%from, to = %destination, ?content, score = self.score, "player moved");
        out_events.push(Event::PlayerMoved {
            from,
            to: destination,
            content,
        });

        match content {
            CellKind::Wumpus | CellKind::Pit => self.finish(GameStatus::Lost, out_events),
            CellKind::Gold => {
                self.score += GOLD_REWARD;
                self.finish(GameStatus::Won, out_events);
            }
            CellKind::Breeze | CellKind::Stench | CellKind::Empty => {}
        }
    }
}
