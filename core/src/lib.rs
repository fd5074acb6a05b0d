#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wumpus World engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`BoardView`], and respond exclusively with new command
//! batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Side length of the square grid used when no size is configured.
pub const DEFAULT_GRID_SIZE: u32 = 4;

/// Fraction of the grid turned into pits when no density is configured.
pub const DEFAULT_PIT_DENSITY: f64 = 0.2;

/// Score applied for every accepted move.
pub const MOVE_COST: i64 = -1;

/// Score applied when the arrow is fired, regardless of outcome.
pub const SHOT_COST: i64 = -10;

/// Score awarded for reaching the gold.
pub const GOLD_REWARD: i64 = 1000;

/// Score awarded for killing the Wumpus.
pub const WUMPUS_REWARD: i64 = 500;

/// Fixed cell every game starts from.
pub const START: Position = Position::new(0, 0);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one cell in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player fire the arrow along the provided direction.
    Shoot {
        /// Direction the arrow travels from the player's cell.
        direction: Direction,
    },
    /// Discards the current game and generates a fresh grid.
    Reset,
    /// Turns the autonomous player on or off.
    SetAutoplay {
        /// Whether autoplay should be active after the command.
        enabled: bool,
    },
    /// Marks the autonomous player as deliberating or idle.
    SetThinking {
        /// Whether a decision is currently pending.
        thinking: bool,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player stepped between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Position,
        /// Cell the player occupies after the move.
        to: Position,
        /// Content of the destination cell at the time of the move.
        content: CellKind,
    },
    /// Confirms that the arrow left the quiver.
    ArrowFired {
        /// Direction the arrow travelled.
        direction: Direction,
    },
    /// Reports that the arrow struck and removed the Wumpus.
    WumpusKilled {
        /// Cell the Wumpus occupied.
        at: Position,
    },
    /// Reports that the arrow left the grid without hitting anything.
    ArrowMissed,
    /// Announces that the game reached a terminal status.
    GameEnded {
        /// Terminal status that became active.
        status: GameStatus,
    },
    /// Announces that a fresh game replaced the previous one.
    GameReset,
    /// Announces that autoplay was switched on or off.
    AutoplayToggled {
        /// Whether autoplay is active after the change.
        enabled: bool,
    },
    /// Announces that the autonomous player started or stopped deliberating.
    ThinkingChanged {
        /// Whether a decision is pending after the change.
        thinking: bool,
    },
}

/// Cardinal directions available to the player and the arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction in canonical enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector `(dx, dy)` associated with the direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Lowercase name used in logs and scripts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the position lies inside a square grid of `size`.
    #[must_use]
    pub const fn within(&self, size: u32) -> bool {
        self.x < size && self.y < size
    }

    /// Neighbouring position one step in `direction`, if it stays inside a
    /// square grid of `size`.
    #[must_use]
    pub fn step(self, direction: Direction, size: u32) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        let next = Position::new(x, y);
        next.within(size).then_some(next)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Content held by a single grid cell.
///
/// Sensors share the slot with hazards and gold, so a cell never shows more
/// than one of these at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing of interest.
    #[default]
    Empty,
    /// The Wumpus; entering the cell loses the game.
    Wumpus,
    /// A pit; entering the cell loses the game.
    Pit,
    /// The gold; entering the cell wins the game.
    Gold,
    /// Marker placed next to a pit.
    Breeze,
    /// Marker placed next to the Wumpus.
    Stench,
}

impl CellKind {
    /// Reports whether entering the cell ends the game in a loss.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Wumpus | Self::Pit)
    }

    /// Reports whether the cell carries a breeze or stench marker.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::Breeze | Self::Stench)
    }

    /// Sensor written around this cell during generation, if any.
    #[must_use]
    pub const fn sensor(self) -> Option<CellKind> {
        match self {
            Self::Wumpus => Some(Self::Stench),
            Self::Pit => Some(Self::Breeze),
            _ => None,
        }
    }
}

/// Lifecycle of a single game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The game accepts moves and shots.
    #[default]
    Playing,
    /// The player reached the gold.
    Won,
    /// The player entered a hazard.
    Lost,
}

impl GameStatus {
    /// Reports whether the status no longer accepts moves or shots.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Message describing the most recent event, shown to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Narration {
    /// Greeting shown on a fresh game.
    #[default]
    Welcome,
    /// The player stepped onto an empty cell.
    AllQuiet,
    /// The player stepped onto a breeze marker.
    Breeze,
    /// The player stepped onto a stench marker.
    Stench,
    /// The player stepped onto the Wumpus.
    EatenByWumpus,
    /// The player stepped into a pit.
    FellIntoPit,
    /// The player reached the gold.
    FoundGold,
    /// The arrow left the grid.
    ArrowMissed,
    /// The arrow killed the Wumpus.
    WumpusKilled,
}

impl Narration {
    /// Narration for the player arriving on a cell holding `content`.
    #[must_use]
    pub const fn arrival(content: CellKind) -> Self {
        match content {
            CellKind::Wumpus => Self::EatenByWumpus,
            CellKind::Pit => Self::FellIntoPit,
            CellKind::Gold => Self::FoundGold,
            CellKind::Breeze => Self::Breeze,
            CellKind::Stench => Self::Stench,
            CellKind::Empty => Self::AllQuiet,
        }
    }

    /// Player-facing text for the narration.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome to Wumpus World!",
            Self::AllQuiet => "All is quiet...",
            Self::Breeze => "You feel a breeze. There must be a pit nearby.",
            Self::Stench => "You smell a stench. The Wumpus must be nearby.",
            Self::EatenByWumpus => "You were eaten by the Wumpus! Game over.",
            Self::FellIntoPit => "You fell into a pit! Game over.",
            Self::FoundGold => "You found the gold! You win!",
            Self::ArrowMissed => "Your arrow disappears into the darkness.",
            Self::WumpusKilled => "You killed the Wumpus!",
        }
    }
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Identifies the game state a scheduled decision was computed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionStamp {
    /// Number of resets performed so far.
    pub epoch: u64,
    /// Number of accepted moves and shots within the current epoch.
    pub turn: u64,
}

/// Read-only view of the full board, including cells the player never visited.
///
/// Only systems receive this view; adapters observe the gated
/// [`GameSnapshot`] instead.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    size: u32,
    cells: &'a [CellKind],
    visited: &'a [bool],
    player: Position,
    status: GameStatus,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by row-major cell and visit slices.
    #[must_use]
    pub fn new(
        size: u32,
        cells: &'a [CellKind],
        visited: &'a [bool],
        player: Position,
        status: GameStatus,
    ) -> Self {
        Self {
            size,
            cells,
            visited,
            player,
            status,
        }
    }

    /// Side length of the square grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Status of the game the view was captured from.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Content of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellKind> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the player has stood on the provided cell.
    #[must_use]
    pub fn is_visited(&self, position: Position) -> bool {
        self.index(position)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.within(self.size) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// What the presentation layer may learn about a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellView {
    /// The player never stood on the cell; its content stays hidden.
    Unvisited,
    /// The cell was visited and its content is revealed.
    Revealed(CellKind),
}

/// Read-only snapshot of a game, gated by visitation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Side length of the square grid.
    pub size: u32,
    /// Row-major cell views.
    pub cells: Vec<CellView>,
    /// Cell currently occupied by the player.
    pub player: Position,
    /// Visited cells in row-major order.
    pub visited: Vec<Position>,
    /// Current score.
    pub score: i64,
    /// Whether the arrow can still be fired.
    pub arrow_available: bool,
    /// Current game status.
    pub status: GameStatus,
    /// Message describing the most recent event.
    pub narration: Narration,
    /// Whether autoplay is active.
    pub autoplay_enabled: bool,
    /// Whether the autonomous player is deliberating.
    pub autoplay_thinking: bool,
}

impl GameSnapshot {
    /// View of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellView> {
        if !position.within(self.size) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        self.cells.get(row * width + column).copied()
    }
}
