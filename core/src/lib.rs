#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Puck-Man engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Puck-Man.";

/// Describes whether the simulation advances when ticked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Ticks advance the player and the ghosts.
    Running,
    /// Ticks are ignored until the game resumes.
    Paused,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one fixed tick.
    ///
    /// The player moves first; ghosts react to the resulting events.
    Tick,
    /// Changes the heading the player keeps stepping in.
    SetHeading {
        /// Direction the player should face from now on.
        direction: Direction,
    },
    /// Requests that a ghost advance a single step in the specified direction.
    StepGhost {
        /// Identifier of the ghost attempting to move.
        ghost: GhostId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the world transition to the provided state.
    SetGameState {
        /// State the world should activate.
        state: GameState,
    },
    /// Returns every ghost to the cell it spawned on.
    ResetGhosts,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just executed, starting at one.
        tick: u64,
    },
    /// Confirms that the player moved between two cells.
    ///
    /// A wrap through the side corridor reports the far side as `to`.
    PlayerAdvanced {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that the player cleared a pickup from the maze.
    PickupCollected {
        /// Cell the pickup was removed from.
        cell: CellCoord,
        /// Kind of pickup that was collected.
        kind: PickupKind,
    },
    /// Confirms that a ghost successfully moved between two cells.
    GhostAdvanced {
        /// Identifier of the ghost that advanced.
        ghost: GhostId,
        /// Cell the ghost occupied before moving.
        from: CellCoord,
        /// Cell the ghost occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a ghost step request was rejected.
    GhostStepRejected {
        /// Identifier of the ghost whose step was refused.
        ghost: GhostId,
        /// Specific reason the step failed.
        reason: StepError,
    },
    /// Announces that the simulation entered a new state.
    GameStateChanged {
        /// State that became active after processing commands.
        state: GameState,
    },
    /// Confirms that every ghost was returned to its spawn cell.
    GhostsReset,
}

/// Reasons a ghost step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepError {
    /// No ghost with the provided identifier exists.
    MissingGhost,
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination is a wall cell.
    Blocked,
}

/// Cardinal movement directions available to every agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Directions in the order the random walk draws them from.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// Derives the direction leading from one cell to an adjacent one.
    ///
    /// Returns `None` when the cells are not orthogonal neighbours.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identity of a ghost, which also fixes how it chases the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostKind {
    /// Chases along breadth-first paths, ignoring terrain.
    Red,
    /// Chases along Dijkstra paths.
    Pink,
    /// Chases along A* paths.
    Blue,
    /// Wanders at random.
    Orange,
}

impl GhostKind {
    /// Strategy assigned to the ghost when it is constructed.
    #[must_use]
    pub const fn default_strategy(self) -> MovementStrategy {
        match self {
            Self::Red => MovementStrategy::Search(SearchAlgorithm::BreadthFirst),
            Self::Pink => MovementStrategy::Search(SearchAlgorithm::Dijkstra),
            Self::Blue => MovementStrategy::Search(SearchAlgorithm::AStar),
            Self::Orange => MovementStrategy::RandomWalk,
        }
    }

    /// Single-character glyph used by text renderers.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Pink => 'P',
            Self::Blue => 'B',
            Self::Orange => 'O',
        }
    }
}

/// Shortest-path algorithms available to pursuing agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchAlgorithm {
    /// Unweighted breadth-first search; every step costs the same.
    BreadthFirst,
    /// Weighted search ordered by cumulative terrain cost.
    Dijkstra,
    /// Weighted search ordered by cumulative cost plus Manhattan distance.
    AStar,
}

/// Movement behaviour fixed for an agent at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementStrategy {
    /// Follows a freshly searched path toward the player every tick.
    Search(SearchAlgorithm),
    /// Attempts one uniformly random step per tick.
    RandomWalk,
}

/// Collectable items scattered across the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Regular pill.
    Pellet,
    /// Power pill.
    Energizer,
}

/// Terrain classification of a passable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Plain corridor.
    Open,
    /// Packed ground.
    Ground,
    /// Tall grass.
    Grass,
    /// Shallow water.
    Water,
}

impl Terrain {
    /// Cost of stepping onto a cell with this terrain.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Open => 1,
            Self::Ground => 3,
            Self::Grass => 5,
            Self::Water => 10,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// upper bounds depend on the grid and are not checked here.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }
}

/// Axis-aligned rectangle spanning two inclusive corner cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RectCorners")]
pub struct CellRect {
    min: CellCoord,
    max: CellCoord,
}

#[derive(Deserialize)]
struct RectCorners {
    min: CellCoord,
    max: CellCoord,
}

impl TryFrom<RectCorners> for CellRect {
    type Error = String;

    fn try_from(corners: RectCorners) -> Result<Self, Self::Error> {
        Self::from_corners(corners.min, corners.max).ok_or_else(|| {
            format!(
                "rectangle corners {:?} and {:?} are inverted",
                corners.min, corners.max
            )
        })
    }
}

impl CellRect {
    /// Constructs a rectangle from its inclusive corners.
    ///
    /// Returns `None` when `max` lies left of or above `min`.
    #[must_use]
    pub fn from_corners(min: CellCoord, max: CellCoord) -> Option<Self> {
        if max.column() < min.column() || max.row() < min.row() {
            return None;
        }
        Some(Self { min, max })
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> CellCoord {
        self.min
    }

    /// Lower-right corner of the rectangle.
    #[must_use]
    pub const fn max(&self) -> CellCoord {
        self.max
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.min.column()..=self.max.column()).contains(&cell.column())
            && (self.min.row()..=self.max.row()).contains(&cell.row())
    }

    /// Iterates every covered cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (min, max) = (self.min, self.max);
        (min.row()..=max.row())
            .flat_map(move |row| (min.column()..=max.column()).map(move |c| CellCoord::new(c, row)))
    }
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSnapshot {
    /// Unique identifier assigned to the ghost.
    pub id: GhostId,
    /// Identity of the ghost.
    pub kind: GhostKind,
    /// Grid cell currently occupied by the ghost.
    pub cell: CellCoord,
    /// Behaviour that decides the ghost's next step.
    pub strategy: MovementStrategy,
}

/// Read-only snapshot describing all ghosts within the maze.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ghost snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<GhostSnapshot> {
        self.snapshots
    }
}
