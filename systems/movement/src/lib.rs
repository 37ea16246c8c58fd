#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that chases the player and proposes ghost steps.

use puckman_core::{
    CellCoord, Command, Direction, Event, GameState, GhostSnapshot, GhostView, MovementStrategy,
    SearchAlgorithm,
};
use puckman_system_pathfinding::Pathfinder;
use puckman_world::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the random walk with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pure system that reacts to world events and emits ghost step commands.
///
/// Every tick each ghost is planned in identifier order against the player's
/// current cell. Search-driven ghosts rerun their algorithm from scratch and
/// take the first step of the discovered route; wandering ghosts draw one
/// random direction. No route is remembered between ticks.
#[derive(Debug)]
pub struct Movement {
    pathfinder: Pathfinder,
    rng: ChaCha8Rng,
    game_state: GameState,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            pathfinder: Pathfinder::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            game_state: GameState::Running,
        }
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Commands are only produced for batches that advanced the clock while
    /// the game is running.
    pub fn handle(
        &mut self,
        events: &[Event],
        ghost_view: &GhostView,
        player_cell: CellCoord,
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::GameStateChanged { state } = event {
                self.game_state = *state;
            }
        }

        if self.game_state == GameState::Paused {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for ghost in ghost_view.iter() {
            let direction = match ghost.strategy {
                MovementStrategy::Search(algorithm) => {
                    self.chase(ghost, algorithm, player_cell, grid)
                }
                MovementStrategy::RandomWalk => self.wander(ghost, player_cell, grid),
            };

            if let Some(direction) = direction {
                out.push(Command::StepGhost {
                    ghost: ghost.id,
                    direction,
                });
            }
        }
    }

    fn chase(
        &mut self,
        ghost: &GhostSnapshot,
        algorithm: SearchAlgorithm,
        player_cell: CellCoord,
        grid: &Grid,
    ) -> Option<Direction> {
        let path = self
            .pathfinder
            .find_path(algorithm, grid, ghost.cell, player_cell)?;
        let next = path.next_step()?;
        Direction::between(ghost.cell, next)
    }

    fn wander(
        &mut self,
        ghost: &GhostSnapshot,
        player_cell: CellCoord,
        grid: &Grid,
    ) -> Option<Direction> {
        if ghost.cell == player_cell {
            return None;
        }

        let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let destination = ghost.cell.step(direction)?;
        (grid.in_bounds(destination) && grid.passable(destination)).then_some(direction)
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
