//! Dense square grid of cell contents.

use wumpus_core::{CellKind, Position};

use crate::GenerationError;

/// Row-major storage of every cell in the square world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    pub(crate) fn empty(size: u32) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cells: vec![CellKind::Empty; capacity],
        }
    }

    /// Builds a grid from explicit rows, top row first.
    ///
    /// The rows must form a non-empty square. No placement invariants are
    /// checked, so hand-made layouts may omit the gold or place several pits
    /// side by side.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GenerationError>
    where
        R: AsRef<[CellKind]>,
    {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.as_ref().len() != size) {
            return Err(GenerationError::MalformedLayout);
        }
        let side = u32::try_from(size).map_err(|_| GenerationError::MalformedLayout)?;

        let cells = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Ok(Self { size: side, cells })
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Content of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<CellKind> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major slice over every cell.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }

    /// Counts the cells holding the provided content.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    pub(crate) fn set(&mut self, position: Position, kind: CellKind) {
        if let Some(index) = self.index(position) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        if !position.within(self.size) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_layouts() {
        let rows: [&[CellKind]; 2] = [&[CellKind::Empty, CellKind::Pit], &[CellKind::Gold]];
        assert_eq!(Grid::from_rows(&rows), Err(GenerationError::MalformedLayout));

        let empty: [[CellKind; 0]; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GenerationError::MalformedLayout));
    }

    #[test]
    fn positions_follow_row_major_order() {
        let grid = Grid::empty(2);
        let order: Vec<_> = grid.positions().collect();
        assert_eq!(
            order,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn set_ignores_out_of_bounds_cells() {
        let mut grid = Grid::empty(2);
        grid.set(Position::new(5, 0), CellKind::Pit);
        assert_eq!(grid.count(CellKind::Pit), 0);

        grid.set(Position::new(1, 1), CellKind::Pit);
        assert_eq!(grid.get(Position::new(1, 1)), Some(CellKind::Pit));
    }
}
