#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wumpus World.

mod generation;
mod grid;
mod movement;
mod shooting;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wumpus_core::{
    Command, Event, GameStatus, Narration, Position, DEFAULT_GRID_SIZE, DEFAULT_PIT_DENSITY,
    START,
};

pub use generation::{GenerationError, GeneratorConfig, WorldGenerator, MAX_SAMPLING_ATTEMPTS};
pub use grid::Grid;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x5eed_0f_a11_c0de;

/// Parameters required to construct a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Side length of the square grid.
    pub size: u32,
    /// Fraction of all cells turned into pits.
    pub pit_density: f64,
    /// Seed for the random source that drives every generated layout.
    pub seed: u64,
}

impl WorldConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(size: u32, pit_density: f64, seed: u64) -> Self {
        Self {
            size,
            pit_density,
            seed,
        }
    }

    /// Returns a copy using the provided seed.
    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_PIT_DENSITY, DEFAULT_SEED)
    }
}

/// Represents the authoritative state of a single Wumpus World game.
#[derive(Debug)]
pub struct World {
    generator: WorldGenerator,
    rng: ChaCha8Rng,
    grid: Grid,
    player: Position,
    visited: Vec<bool>,
    score: i64,
    arrow_available: bool,
    status: GameStatus,
    narration: Narration,
    autoplay_enabled: bool,
    autoplay_thinking: bool,
    epoch: u64,
    turn: u64,
}

impl World {
    /// Creates a world with a freshly generated layout.
    pub fn new(config: WorldConfig) -> Result<Self, GenerationError> {
        let generator =
            WorldGenerator::new(GeneratorConfig::new(config.size, config.pit_density))?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = generator.generate(&mut rng)?;
        Ok(Self::assemble(generator, rng, grid))
    }

    /// Creates a world around an explicit layout.
    ///
    /// The layout is used as-is for the first game; resets generate new
    /// layouts of the same size using the configured density and seed.
    pub fn with_grid(config: WorldConfig, grid: Grid) -> Result<Self, GenerationError> {
        let generator =
            WorldGenerator::new(GeneratorConfig::new(grid.size(), config.pit_density))?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(generator, rng, grid))
    }

    fn assemble(generator: WorldGenerator, rng: ChaCha8Rng, grid: Grid) -> Self {
        let mut world = Self {
            visited: vec![false; grid.cells().len()],
            generator,
            rng,
            grid,
            player: START,
            score: 0,
            arrow_available: true,
            status: GameStatus::Playing,
            narration: Narration::Welcome,
            autoplay_enabled: false,
            autoplay_thinking: false,
            epoch: 0,
            turn: 0,
        };
        world.mark_visited(START);
        world
    }

    fn mark_visited(&mut self, position: Position) {
        if let Some(index) = self.grid.index(position) {
            if let Some(slot) = self.visited.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let grid = match self.generator.generate(&mut self.rng) {
            Ok(grid) => grid,
            Err(error) => {
                tracing::error!(%error, "failed to regenerate world; keeping current game");
                return;
            }
        };

        let was_enabled = self.autoplay_enabled;
        let was_thinking = self.autoplay_thinking;

        self.visited = vec![false; grid.cells().len()];
        self.grid = grid;
        self.player = START;
        self.score = 0;
        self.arrow_available = true;
        self.status = GameStatus::Playing;
        self.narration = Narration::Welcome;
        self.autoplay_enabled = false;
        self.autoplay_thinking = false;
        self.epoch = self.epoch.saturating_add(1);
        self.turn = 0;
        self.mark_visited(START);

        tracing::debug!(epoch = self.epoch, "world reset");
        if was_thinking {
            out_events.push(Event::ThinkingChanged { thinking: false });
        }
        if was_enabled {
            out_events.push(Event::AutoplayToggled { enabled: false });
        }
        out_events.push(Event::GameReset);
    }

    fn set_autoplay(&mut self, enabled: bool, out_events: &mut Vec<Event>) {
        if enabled == self.autoplay_enabled {
            return;
        }
        if enabled && self.status.is_terminal() {
            return;
        }

        if !enabled {
            self.clear_thinking(out_events);
        }
        self.autoplay_enabled = enabled;
        tracing::debug!(enabled, "autoplay toggled");
        out_events.push(Event::AutoplayToggled { enabled });
    }

    fn set_thinking(&mut self, thinking: bool, out_events: &mut Vec<Event>) {
        if !thinking {
            self.clear_thinking(out_events);
            return;
        }
        if self.autoplay_thinking || !self.autoplay_enabled || self.status.is_terminal() {
            return;
        }
        self.autoplay_thinking = true;
        out_events.push(Event::ThinkingChanged { thinking: true });
    }

    fn clear_thinking(&mut self, out_events: &mut Vec<Event>) {
        if self.autoplay_thinking {
            self.autoplay_thinking = false;
            out_events.push(Event::ThinkingChanged { thinking: false });
        }
    }

    fn finish(&mut self, status: GameStatus, out_events: &mut Vec<Event>) {
        self.status = status;
        tracing::info!(?status, score = self.score, "game ended");
        self.clear_thinking(out_events);
        out_events.push(Event::GameEnded { status });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands whose preconditions do not hold are accepted as no-ops and
/// produce no events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => world.resolve_move(direction, out_events),
        Command::Shoot { direction } => world.resolve_shot(direction, out_events),
        Command::Reset => world.reset(out_events),
        Command::SetAutoplay { enabled } => world.set_autoplay(enabled, out_events),
        Command::SetThinking { thinking } => world.set_thinking(thinking, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wumpus_core::{
        BoardView, CellView, GameSnapshot, GameStatus, Narration, Position, SessionStamp,
    };

    use super::{Grid, World};

    /// Provides read-only access to the full layout, hidden cells included.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> Position {
        world.player
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> i64 {
        world.score
    }

    /// Current game status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Whether the arrow can still be fired.
    #[must_use]
    pub fn arrow_available(world: &World) -> bool {
        world.arrow_available
    }

    /// Message describing the most recent event.
    #[must_use]
    pub fn narration(world: &World) -> Narration {
        world.narration
    }

    /// Whether autoplay is active.
    #[must_use]
    pub fn autoplay_enabled(world: &World) -> bool {
        world.autoplay_enabled
    }

    /// Whether the autonomous player is deliberating.
    #[must_use]
    pub fn autoplay_thinking(world: &World) -> bool {
        world.autoplay_thinking
    }

    /// Reports whether the player has stood on the provided cell.
    #[must_use]
    pub fn is_visited(world: &World, position: Position) -> bool {
        world
            .grid
            .index(position)
            .and_then(|index| world.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Identifies the current game for staleness checks.
    #[must_use]
    pub fn stamp(world: &World) -> SessionStamp {
        SessionStamp {
            epoch: world.epoch,
            turn: world.turn,
        }
    }

    /// Captures the omniscient board view consumed by systems.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        BoardView::new(
            world.grid.size(),
            world.grid.cells(),
            &world.visited,
            world.player,
            world.status,
        )
    }

    /// Captures the visitation-gated snapshot handed to presentation layers.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        let cells = world
            .grid
            .cells()
            .iter()
            .zip(world.visited.iter())
            .map(|(cell, visited)| {
                if *visited {
                    CellView::Revealed(*cell)
                } else {
                    CellView::Unvisited
                }
            })
            .collect();
        let visited = world
            .grid
            .positions()
            .filter(|position| is_visited(world, *position))
            .collect();

        GameSnapshot {
            size: world.grid.size(),
            cells,
            player: world.player,
            visited,
            score: world.score,
            arrow_available: world.arrow_available,
            status: world.status,
            narration: world.narration,
            autoplay_enabled: world.autoplay_enabled,
            autoplay_thinking: world.autoplay_thinking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wumpus_core::{CellKind, Direction};

    #[test]
    fn new_world_starts_at_origin_with_welcome() {
        let world = World::new(WorldConfig::default()).expect("world");

        assert_eq!(query::player(&world), START);
        assert_eq!(query::score(&world), 0);
        assert!(query::arrow_available(&world));
        assert_eq!(query::status(&world), GameStatus::Playing);
        assert_eq!(query::narration(&world), Narration::Welcome);
        assert_eq!(query::snapshot(&world).visited, vec![START]);
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        assert_eq!(
            World::new(WorldConfig::new(0, 0.2, 1)).err(),
            Some(GenerationError::EmptyGrid)
        );
    }

    #[test]
    fn autoplay_cannot_start_after_game_ended() {
        let grid = Grid::from_rows(&[
            [CellKind::Empty, CellKind::Pit],
            [CellKind::Gold, CellKind::Wumpus],
        ])
        .expect("grid");
        let mut world = World::with_grid(WorldConfig::new(2, 0.0, 3), grid).expect("world");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Move {
                direction: Direction::Right,
            },
            &mut events,
        );
        assert_eq!(query::status(&world), GameStatus::Lost);

        events.clear();
        apply(&mut world, Command::SetAutoplay { enabled: true }, &mut events);
        assert!(events.is_empty());
        assert!(!query::autoplay_enabled(&world));
    }

    #[test]
    fn thinking_requires_active_autoplay() {
        let mut world = World::new(WorldConfig::default()).expect("world");
        let mut events = Vec::new();

        apply(&mut world, Command::SetThinking { thinking: true }, &mut events);
        assert!(events.is_empty());
        assert!(!query::autoplay_thinking(&world));

        apply(&mut world, Command::SetAutoplay { enabled: true }, &mut events);
        apply(&mut world, Command::SetThinking { thinking: true }, &mut events);
        assert!(query::autoplay_thinking(&world));

        events.clear();
        apply(&mut world, Command::SetAutoplay { enabled: false }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::ThinkingChanged { thinking: false },
                Event::AutoplayToggled { enabled: false },
            ]
        );
        assert!(!query::autoplay_thinking(&world));
    }
}
