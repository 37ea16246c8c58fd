#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path searches over the maze grid.
//!
//! Three interchangeable algorithms fill a [`SearchTree`] with parent
//! pointers: breadth-first search ignores terrain, Dijkstra orders the frontier
//! by cumulative cost and A* adds the Manhattan distance to the goal. The
//! [`Pathfinder`] runs the selected algorithm and turns the tree into a
//! [`Path`] of interior waypoints.

mod queue;
mod search;

pub use queue::PriorityQueue;
pub use search::{a_star_search, breadth_first_search, dijkstra_search, SearchTree};

use puckman_core::{CellCoord, SearchAlgorithm};
use puckman_world::Grid;

/// Route discovered between two cells.
///
/// Waypoints run from the cell right after the start to the cell right before
/// the goal; neither endpoint is included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    waypoints: Vec<CellCoord>,
    hops: usize,
    cost: u32,
}

impl Path {
    /// Interior cells in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Cell the walker should enter next, or `None` when it is already next
    /// to (or on) the goal.
    #[must_use]
    pub fn next_step(&self) -> Option<CellCoord> {
        self.waypoints.first().copied()
    }

    /// Number of interior waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route has no interior waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of steps from start to goal.
    ///
    /// Zero when start and goal coincide.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.hops
    }

    /// Total terrain cost of walking from start to goal along the route.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Consumes the path, yielding the interior waypoints.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.waypoints
    }
}

/// Walks the parent pointers back from `goal` and trims both endpoints.
///
/// Returns `None` when the search never reached `goal`, or when the parent
/// chain does not lead back to `start`.
#[must_use]
pub fn reconstruct_path(
    grid: &Grid,
    tree: &SearchTree,
    start: CellCoord,
    goal: CellCoord,
) -> Option<Path> {
    if !tree.reached(goal) {
        return None;
    }

    let mut chain = vec![goal];
    let mut current = goal;
    while current != start {
        let parent = tree.parent(current)?;
        if parent == current || chain.len() > grid.cell_count() {
            return None;
        }
        current = parent;
        chain.push(current);
    }

    let hops = chain.len() - 1;
    let cost = chain[..hops]
        .iter()
        .map(|cell| grid.cost(*cell))
        .sum();

    chain.reverse();
    let waypoints = if chain.len() >= 2 {
        chain[1..chain.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    Some(Path {
        waypoints,
        hops,
        cost,
    })
}

/// Runs the selected algorithm into the provided tree.
pub fn search(
    algorithm: SearchAlgorithm,
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
    tree: &mut SearchTree,
) {
    match algorithm {
        SearchAlgorithm::BreadthFirst => breadth_first_search(grid, start, goal, tree),
        SearchAlgorithm::Dijkstra => dijkstra_search(grid, start, goal, tree),
        SearchAlgorithm::AStar => a_star_search(grid, start, goal, tree),
    }
}

/// Searches with a throwaway tree and reconstructs the resulting path.
#[must_use]
pub fn run_search(
    algorithm: SearchAlgorithm,
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
) -> Option<Path> {
    Pathfinder::default().find_path(algorithm, grid, start, goal)
}

/// Reusable search workspace that answers path queries.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    tree: SearchTree,
}

impl Pathfinder {
    /// Creates a pathfinder with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches from `start` to `goal` and reconstructs the path.
    ///
    /// `None` means the goal cannot be reached from the start.
    pub fn find_path(
        &mut self,
        algorithm: SearchAlgorithm,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
    ) -> Option<Path> {
        search(algorithm, grid, start, goal, &mut self.tree);
        reconstruct_path(grid, &self.tree, start, goal)
    }

    /// Tree left behind by the most recent search.
    #[must_use]
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }
}
