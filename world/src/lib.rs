#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Puck-Man.

mod grid;
mod layout;

pub use grid::{Grid, Neighbors};
pub use layout::{
    CellSet, GhostSpawn, LayoutError, MazeLayout, MAX_GRID_CELLS, REFERENCE_HEIGHT,
    REFERENCE_WIDTH,
};

use puckman_core::{
    CellCoord, Command, Direction, Event, GameState, GhostId, GhostKind, MovementStrategy,
    PickupKind, StepError, WELCOME_BANNER,
};
use tracing::debug;

/// Represents the authoritative Puck-Man world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    wrap_row: Option<u32>,
    pickups: PickupGrid,
    player: Player,
    ghosts: Vec<Ghost>,
    state: GameState,
    tick_index: u64,
}

impl World {
    /// Creates a world populated from the provided layout.
    ///
    /// Every wall, zone, pickup and spawn is validated before anything is
    /// returned; a malformed layout never yields a partial world.
    pub fn from_layout(layout: &MazeLayout) -> Result<Self, LayoutError> {
        let grid = Grid::from_layout(layout)?;

        if let Some(row) = layout.wrap_row {
            if row >= grid.height() {
                return Err(LayoutError::CellOutOfBounds {
                    set: CellSet::WrapRow,
                    cell: CellCoord::new(0, row),
                });
            }
        }

        let mut pickups = PickupGrid::new(grid.cell_count());
        let placements = [
            (CellSet::Pellets, PickupKind::Pellet, &layout.pellets),
            (CellSet::Energizers, PickupKind::Energizer, &layout.energizers),
        ];
        for (set, kind, cells) in placements {
            for &cell in cells {
                let index = open_cell_index(&grid, set, cell)?;
                if !pickups.place(index, kind) {
                    return Err(LayoutError::PickupOverlap { cell });
                }
            }
        }

        let _ = open_cell_index(&grid, CellSet::PlayerSpawn, layout.player)?;
        let mut ghosts = Vec::with_capacity(layout.ghosts.len());
        for (index, spawn) in layout.ghosts.iter().enumerate() {
            let _ = open_cell_index(&grid, CellSet::GhostSpawn, spawn.cell)?;
            ghosts.push(Ghost {
                id: GhostId::new(index as u32),
                kind: spawn.kind,
                cell: spawn.cell,
                spawn: spawn.cell,
                strategy: spawn.strategy,
            });
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            wrap_row: layout.wrap_row,
            pickups,
            player: Player {
                cell: layout.player,
                heading: None,
            },
            ghosts,
            state: GameState::Running,
            tick_index: 0,
        })
    }

    /// Steps the player in its held heading and collects whatever it lands on.
    fn advance_player(&mut self, out_events: &mut Vec<Event>) {
        let from = self.player.cell;

        if let Some(heading) = self.player.heading {
            let grid = &self.grid;
            let next = self
                .player_destination(from, heading)
                .filter(|cell| grid.in_bounds(*cell) && grid.passable(*cell));
            if let Some(to) = next {
                self.player.cell = to;
                out_events.push(Event::PlayerAdvanced { from, to });
            }
        }

        let cell = self.player.cell;
        if let Some(index) = self.grid.index(cell) {
            if let Some(kind) = self.pickups.take(index) {
                debug!(?cell, ?kind, remaining = self.pickups.remaining(), "pickup collected");
                out_events.push(Event::PickupCollected { cell, kind });
            }
        }
    }

    /// Cell the player would enter, following the side corridor off either edge.
    fn player_destination(&self, from: CellCoord, heading: Direction) -> Option<CellCoord> {
        let last_column = self.grid.width().saturating_sub(1);
        if self.wrap_row == Some(from.row()) {
            match heading {
                Direction::West if from.column() == 0 => {
                    return Some(CellCoord::new(last_column, from.row()))
                }
                Direction::East if from.column() == last_column => {
                    return Some(CellCoord::new(0, from.row()))
                }
                _ => {}
            }
        }
        from.step(heading)
    }

    fn step_ghost(&mut self, ghost: GhostId, direction: Direction) -> Result<Event, StepError> {
        let grid = &self.grid;
        let Some(entry) = self.ghosts.iter_mut().find(|candidate| candidate.id == ghost) else {
            return Err(StepError::MissingGhost);
        };

        let from = entry.cell;
        let to = from
            .step(direction)
            .filter(|cell| grid.in_bounds(*cell))
            .ok_or(StepError::OutOfBounds)?;
        if !grid.passable(to) {
            return Err(StepError::Blocked);
        }

        entry.cell = to;
        Ok(Event::GhostAdvanced { ghost, from, to })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.state == GameState::Paused {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.advance_player(out_events);
        }
        Command::SetHeading { direction } => {
            world.player.heading = Some(direction);
        }
        Command::StepGhost { ghost, direction } => match world.step_ghost(ghost, direction) {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                debug!(ghost = ghost.get(), ?direction, ?reason, "ghost step rejected");
                out_events.push(Event::GhostStepRejected { ghost, reason });
            }
        },
        Command::SetGameState { state } => {
            if world.state != state {
                world.state = state;
                debug!(?state, "game state changed");
                out_events.push(Event::GameStateChanged { state });
            }
        }
        Command::ResetGhosts => {
            for ghost in &mut world.ghosts {
                ghost.cell = ghost.spawn;
            }
            out_events.push(Event::GhostsReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use puckman_core::{
        CellCoord, Direction, GameState, GhostSnapshot, GhostView, PickupKind,
    };

    use super::{Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the maze grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell
    }

    /// Heading the player keeps stepping in, if one was ever set.
    #[must_use]
    pub fn player_heading(world: &World) -> Option<Direction> {
        world.player.heading
    }

    /// Captures a read-only view of the ghosts inhabiting the maze.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| GhostSnapshot {
                    id: ghost.id,
                    kind: ghost.kind,
                    cell: ghost.cell,
                    strategy: ghost.strategy,
                })
                .collect(),
        )
    }

    /// Pickup lying on the provided cell, if any.
    #[must_use]
    pub fn pickup_at(world: &World, cell: CellCoord) -> Option<PickupKind> {
        world
            .grid
            .index(cell)
            .and_then(|index| world.pickups.get(index))
    }

    /// Number of pickups still lying in the maze.
    #[must_use]
    pub fn pickups_remaining(world: &World) -> usize {
        world.pickups.remaining()
    }

    /// State the simulation is currently in.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Number of ticks executed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    heading: Option<Direction>,
}

#[derive(Clone, Copy, Debug)]
struct Ghost {
    id: GhostId,
    kind: GhostKind,
    cell: CellCoord,
    spawn: CellCoord,
    strategy: MovementStrategy,
}

#[derive(Clone, Debug)]
struct PickupGrid {
    cells: Vec<Option<PickupKind>>,
    remaining: usize,
}

impl PickupGrid {
    fn new(capacity: usize) -> Self {
        Self {
            cells: vec![None; capacity],
            remaining: 0,
        }
    }

    fn place(&mut self, index: usize, kind: PickupKind) -> bool {
        match self.cells.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(kind);
                self.remaining += 1;
                true
            }
            _ => false,
        }
    }

    fn take(&mut self, index: usize) -> Option<PickupKind> {
        let taken = self.cells.get_mut(index)?.take();
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    fn get(&self, index: usize) -> Option<PickupKind> {
        self.cells.get(index).copied().flatten()
    }

    fn remaining(&self) -> usize {
        self.remaining
    }
}

fn open_cell_index(grid: &Grid, set: CellSet, cell: CellCoord) -> Result<usize, LayoutError> {
    let index = grid
        .index(cell)
        .ok_or(LayoutError::CellOutOfBounds { set, cell })?;
    if !grid.passable(cell) {
        return Err(LayoutError::CellOnWall { set, cell });
    }
    Ok(index)
}
