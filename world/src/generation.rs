//! Procedural layout of the Wumpus, the pits, the gold and their sensors.

use rand::Rng;
use thiserror::Error;
use wumpus_core::{CellKind, Direction, Position, START};

use crate::grid::Grid;

/// Rejection draws attempted per placement before falling back to a draw over
/// the remaining free cells.
pub const MAX_SAMPLING_ATTEMPTS: u32 = 64;

/// Neighbour order used when writing sensors around a hazard.
const SENSOR_DIRECTIONS: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Reasons a world cannot be generated from the provided configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// The grid has no cells.
    #[error("grid size must be positive")]
    EmptyGrid,
    /// The pit density is not a finite fraction between zero and one.
    #[error("pit density {0} is not a fraction between 0 and 1")]
    InvalidDensity(f64),
    /// The free cells cannot hold the Wumpus, the pits and the gold.
    #[error("layout needs {required} free cells but only {available} exist")]
    InsufficientSpace {
        /// Cells needed for the Wumpus, every pit and the gold.
        required: usize,
        /// Cells other than the start.
        available: usize,
    },
    /// Explicit layout rows do not form a non-empty square.
    #[error("layout rows must form a non-empty square")]
    MalformedLayout,
}

/// Parameters controlling a generated layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    size: u32,
    pit_density: f64,
}

impl GeneratorConfig {
    /// Creates a configuration for a square grid of `size` with the given pit
    /// density.
    #[must_use]
    pub const fn new(size: u32, pit_density: f64) -> Self {
        Self { size, pit_density }
    }

    /// Side length of the generated grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Fraction of all cells turned into pits.
    #[must_use]
    pub const fn pit_density(&self) -> f64 {
        self.pit_density
    }
}

/// Validated generator that produces layouts satisfying the placement rules.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    config: GeneratorConfig,
    pit_count: usize,
}

impl WorldGenerator {
    /// Validates the configuration up front so generation never loops on an
    /// infeasible layout.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        if config.size == 0 {
            return Err(GenerationError::EmptyGrid);
        }
        let density = config.pit_density;
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(GenerationError::InvalidDensity(density));
        }

        let cells_u64 = u64::from(config.size) * u64::from(config.size);
        let cells = usize::try_from(cells_u64).map_err(|_| GenerationError::EmptyGrid)?;
        let pit_count = (cells as f64 * density).floor() as usize;
        let required = pit_count.saturating_add(2);
        let available = cells - 1;
        if required > available {
            return Err(GenerationError::InsufficientSpace {
                required,
                available,
            });
        }

        Ok(Self { config, pit_count })
    }

    /// Configuration the generator was built from.
    #[must_use]
    pub const fn config(&self) -> GeneratorConfig {
        self.config
    }

    /// Number of pits every generated layout contains.
    #[must_use]
    pub const fn pit_count(&self) -> usize {
        self.pit_count
    }

    /// Produces a fresh layout drawing positions from `rng`.
    pub fn generate<R>(&self, rng: &mut R) -> Result<Grid, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::empty(self.config.size);

        let wumpus = place(&mut grid, CellKind::Wumpus, rng).ok_or_else(|| self.exhausted())?;
        tracing::trace!(%wumpus, "placed wumpus");

        for _ in 0..self.pit_count {
            let _ = place(&mut grid, CellKind::Pit, rng).ok_or_else(|| self.exhausted())?;
        }

        let gold = place(&mut grid, CellKind::Gold, rng).ok_or_else(|| self.exhausted())?;
        tracing::trace!(%gold, pits = self.pit_count, "placed gold");

        place_sensors(&mut grid);
        Ok(grid)
    }

    fn exhausted(&self) -> GenerationError {
        let cells = grid_cells(self.config.size);
        GenerationError::InsufficientSpace {
            required: self.pit_count.saturating_add(2),
            available: cells.saturating_sub(1),
        }
    }
}

fn grid_cells(size: u32) -> usize {
    usize::try_from(u64::from(size) * u64::from(size)).unwrap_or(usize::MAX)
}

fn is_free(grid: &Grid, position: Position) -> bool {
    position != START && grid.get(position) == Some(CellKind::Empty)
}

fn place<R>(grid: &mut Grid, kind: CellKind, rng: &mut R) -> Option<Position>
where
    R: Rng + ?Sized,
{
    let size = grid.size();
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if is_free(grid, candidate) {
            grid.set(candidate, kind);
            return Some(candidate);
        }
    }

    let free: Vec<Position> = grid
        .positions()
        .filter(|position| is_free(grid, *position))
        .collect();
    if free.is_empty() {
        return None;
    }
    let candidate = free[rng.gen_range(0..free.len())];
    grid.set(candidate, kind);
    Some(candidate)
}

/// Writes sensors around every hazard in a single row-major pass.
///
/// A sensor only lands on a cell that is still empty, so when two hazards
/// share a neighbour the one scanned first claims it.
fn place_sensors(grid: &mut Grid) {
    let size = grid.size();
    let hazards: Vec<Position> = grid.positions().collect();
    for position in hazards {
        let Some(sensor) = grid.get(position).and_then(CellKind::sensor) else {
            continue;
        };
        for direction in SENSOR_DIRECTIONS {
            let Some(neighbour) = position.step(direction, size) else {
                continue;
            };
            if grid.get(neighbour) == Some(CellKind::Empty) {
                grid.set(neighbour, sensor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(
            WorldGenerator::new(GeneratorConfig::new(0, 0.2)).err(),
            Some(GenerationError::EmptyGrid)
        );
    }

    #[test]
    fn rejects_densities_outside_unit_interval() {
        for density in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let error = WorldGenerator::new(GeneratorConfig::new(4, density)).err();
            assert!(
                matches!(error, Some(GenerationError::InvalidDensity(_))),
                "density {density} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_layouts_without_room_for_every_placement() {
        assert_eq!(
            WorldGenerator::new(GeneratorConfig::new(1, 0.0)).err(),
            Some(GenerationError::InsufficientSpace {
                required: 2,
                available: 0,
            })
        );
        assert_eq!(
            WorldGenerator::new(GeneratorConfig::new(3, 0.9)).err(),
            Some(GenerationError::InsufficientSpace {
                required: 10,
                available: 8,
            })
        );
    }

    #[test]
    fn fills_every_free_cell_when_layout_is_tight() {
        // 3x3 with 6 pits leaves exactly one wumpus, six pits and the gold
        // for the eight cells around the start.
        let generator = WorldGenerator::new(GeneratorConfig::new(3, 0.7)).expect("feasible");
        assert_eq!(generator.pit_count(), 6);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let grid = generator.generate(&mut rng).expect("grid");
        assert_eq!(grid.count(CellKind::Wumpus), 1);
        assert_eq!(grid.count(CellKind::Pit), 6);
        assert_eq!(grid.count(CellKind::Gold), 1);
        assert!(matches!(
            grid.get(START),
            Some(CellKind::Empty | CellKind::Breeze | CellKind::Stench)
        ));
    }

    #[test]
    fn first_hazard_in_scan_order_claims_shared_neighbour() {
        let mut grid = Grid::empty(3);
        grid.set(Position::new(0, 1), CellKind::Pit);
        grid.set(Position::new(2, 1), CellKind::Wumpus);
        place_sensors(&mut grid);

        // (1, 1) neighbours both hazards; the pit is scanned first.
        assert_eq!(grid.get(Position::new(1, 1)), Some(CellKind::Breeze));
        assert_eq!(grid.get(Position::new(2, 0)), Some(CellKind::Stench));
        assert_eq!(grid.get(Position::new(0, 0)), Some(CellKind::Breeze));
    }
}
