//! Heuristic move selection.
//!
//! The policy reads the whole board, hidden cells included. It is a fixed
//! ranking, not an inference over percepts.

use std::cmp::Ordering;

use wumpus_core::{BoardView, CellKind, Direction};

/// Picks the best-ranked direction from the player's cell.
///
/// Candidates are the directions whose destination lies inside the grid.
/// Gold ranks first and hazards last. Between the two, unvisited cells beat
/// visited ones, then cells without a breeze or stench beat warned cells.
/// Remaining ties fall back to [`Direction::ALL`] order.
#[must_use]
pub fn choose_move(board: &BoardView<'_>) -> Option<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .filter_map(|direction| {
            let destination = board.player().step(direction, board.size())?;
            let content = board.cell(destination)?;
            Some(Candidate {
                direction,
                content,
                visited: board.is_visited(destination),
            })
        })
        .min_by(Candidate::rank)
        .map(|candidate| candidate.direction)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    direction: Direction,
    content: CellKind,
    visited: bool,
}

impl Candidate {
    fn tier(&self) -> u8 {
        match self.content {
            CellKind::Gold => 0,
            CellKind::Wumpus | CellKind::Pit => 2,
            CellKind::Empty | CellKind::Breeze | CellKind::Stench => 1,
        }
    }

    fn rank(a: &Self, b: &Self) -> Ordering {
        a.tier()
            .cmp(&b.tier())
            .then_with(|| {
                if a.tier() == 1 {
                    a.visited
                        .cmp(&b.visited)
                        .then(a.content.is_warning().cmp(&b.content.is_warning()))
                } else {
                    Ordering::Equal
                }
            })
            .then(a.direction.cmp(&b.direction))
    }
}
