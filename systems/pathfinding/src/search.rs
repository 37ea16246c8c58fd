use std::collections::VecDeque;

use puckman_core::CellCoord;
use puckman_world::Grid;

use crate::PriorityQueue;

/// Parent and cost maps discovered by a single search.
///
/// The tree is a reusable workspace: every search clears it before exploring,
/// so the maps only ever describe the most recent invocation.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    width: u32,
    height: u32,
    came_from: Vec<Option<CellCoord>>,
    cost_so_far: Vec<Option<u32>>,
    expanded: Vec<bool>,
}

impl SearchTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell the provided cell was first reached from on the best known route.
    ///
    /// The start cell is its own parent; unvisited cells report `None`.
    #[must_use]
    pub fn parent(&self, cell: CellCoord) -> Option<CellCoord> {
        self.index(cell)
            .and_then(|index| self.came_from.get(index).copied().flatten())
    }

    /// Best known cumulative cost of reaching the cell.
    ///
    /// Only weighted searches record costs; breadth-first trees report `None`
    /// everywhere.
    #[must_use]
    pub fn cost(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.cost_so_far.get(index).copied().flatten())
    }

    /// Reports whether the search discovered the cell.
    #[must_use]
    pub fn reached(&self, cell: CellCoord) -> bool {
        self.parent(cell).is_some()
    }

    /// Number of cells the search discovered.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.came_from.iter().filter(|parent| parent.is_some()).count()
    }

    fn prepare(&mut self, grid: &Grid) {
        let cells = grid.cell_count();
        self.width = grid.width();
        self.height = grid.height();
        self.came_from.clear();
        self.came_from.resize(cells, None);
        self.cost_so_far.clear();
        self.cost_so_far.resize(cells, None);
        self.expanded.clear();
        self.expanded.resize(cells, false);
    }

    fn record(&mut self, cell: CellCoord, parent: CellCoord, cost: Option<u32>) {
        if let Some(index) = self.index(cell) {
            self.came_from[index] = Some(parent);
            self.cost_so_far[index] = cost;
        }
    }

    /// Marks the cell as expanded, returning `false` if it already was.
    fn expand(&mut self, cell: CellCoord) -> bool {
        match self.index(cell).and_then(|index| self.expanded.get_mut(index)) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Unweighted frontier search that ignores terrain cost.
///
/// Stops as soon as the goal is dequeued; the goal's neighbours are never
/// expanded. When the goal is unreachable the tree holds the component
/// discovered from `start`.
pub fn breadth_first_search(grid: &Grid, start: CellCoord, goal: CellCoord, tree: &mut SearchTree) {
    tree.prepare(grid);
    if !grid.in_bounds(start) {
        return;
    }

    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    tree.record(start, start, None);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            break;
        }

        for next in grid.neighbors(current) {
            if !tree.reached(next) {
                frontier.push_back(next);
                tree.record(next, current, None);
            }
        }
    }
}

/// Weighted search ordered by cumulative terrain cost.
pub fn dijkstra_search(grid: &Grid, start: CellCoord, goal: CellCoord, tree: &mut SearchTree) {
    weighted_search(grid, start, goal, tree, |_| 0);
}

/// Weighted search ordered by cumulative cost plus the Manhattan distance to
/// the goal.
///
/// The heuristic never exceeds the true remaining cost because every step
/// costs at least one, so the discovered route is as cheap as Dijkstra's.
pub fn a_star_search(grid: &Grid, start: CellCoord, goal: CellCoord, tree: &mut SearchTree) {
    weighted_search(grid, start, goal, tree, |cell| cell.manhattan_distance(goal));
}

fn weighted_search<H>(
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
    tree: &mut SearchTree,
    heuristic: H,
) where
    H: Fn(CellCoord) -> u32,
{
    tree.prepare(grid);
    if !grid.in_bounds(start) {
        return;
    }

    let mut frontier = PriorityQueue::new();
    frontier.put(start, 0);
    tree.record(start, start, Some(0));

    while let Some(current) = frontier.get() {
        if current == goal {
            break;
        }

        // stale duplicate of an already finalized cell
        if !tree.expand(current) {
            continue;
        }

        let Some(current_cost) = tree.cost(current) else {
            continue;
        };

        for next in grid.neighbors(current) {
            let new_cost = current_cost.saturating_add(grid.cost(next));
            if tree.cost(next).map_or(true, |known| new_cost < known) {
                tree.record(next, current, Some(new_cost));
                frontier.put(next, new_cost.saturating_add(heuristic(next)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puckman_world::MazeLayout;

    fn open_grid(width: u32, height: u32) -> Grid {
        Grid::from_layout(&MazeLayout::open(width, height)).expect("valid layout")
    }

    #[test]
    fn breadth_first_marks_start_as_its_own_parent() {
        let grid = open_grid(4, 4);
        let mut tree = SearchTree::new();
        breadth_first_search(&grid, CellCoord::new(1, 1), CellCoord::new(3, 3), &mut tree);

        assert_eq!(tree.parent(CellCoord::new(1, 1)), Some(CellCoord::new(1, 1)));
        assert!(tree.reached(CellCoord::new(3, 3)));
        assert_eq!(tree.cost(CellCoord::new(3, 3)), None);
    }

    #[test]
    fn breadth_first_never_expands_the_goal() {
        let grid = open_grid(5, 1);
        let mut tree = SearchTree::new();
        breadth_first_search(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0), &mut tree);

        assert!(tree.reached(CellCoord::new(2, 0)));
        assert!(!tree.reached(CellCoord::new(3, 0)));
    }

    #[test]
    fn dijkstra_records_cumulative_costs() {
        let layout = MazeLayout {
            water: vec![CellCoord::new(1, 0)],
            ..MazeLayout::open(3, 1)
        };
        let grid = Grid::from_layout(&layout).expect("valid layout");
        let mut tree = SearchTree::new();
        dijkstra_search(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0), &mut tree);

        assert_eq!(tree.cost(CellCoord::new(0, 0)), Some(0));
        assert_eq!(tree.cost(CellCoord::new(1, 0)), Some(10));
        assert_eq!(tree.cost(CellCoord::new(2, 0)), Some(11));
    }

    #[test]
    fn searches_reset_the_tree() {
        let grid = open_grid(6, 1);
        let mut tree = SearchTree::new();
        dijkstra_search(&grid, CellCoord::new(0, 0), CellCoord::new(5, 0), &mut tree);
        assert!(tree.reached(CellCoord::new(5, 0)));

        a_star_search(&grid, CellCoord::new(5, 0), CellCoord::new(4, 0), &mut tree);
        assert!(!tree.reached(CellCoord::new(0, 0)));
        assert_eq!(tree.cost(CellCoord::new(4, 0)), Some(1));
    }

    #[test]
    fn start_outside_grid_discovers_nothing() {
        let grid = open_grid(3, 3);
        let mut tree = SearchTree::new();
        a_star_search(&grid, CellCoord::new(8, 8), CellCoord::new(0, 0), &mut tree);
        assert_eq!(tree.visited(), 0);
    }
}
