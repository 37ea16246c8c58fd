use puckman_core::{CellCoord, CellRect, SearchAlgorithm};
use puckman_system_pathfinding::{breadth_first_search, run_search, Pathfinder, SearchTree};
use puckman_world::{Grid, MazeLayout};

const ALGORITHMS: [SearchAlgorithm; 3] = [
    SearchAlgorithm::BreadthFirst,
    SearchAlgorithm::Dijkstra,
    SearchAlgorithm::AStar,
];

fn rect(x1: u32, y1: u32, x2: u32, y2: u32) -> CellRect {
    CellRect::from_corners(CellCoord::new(x1, y1), CellCoord::new(x2, y2)).expect("ordered corners")
}

fn reference_grid() -> Grid {
    Grid::from_layout(&MazeLayout::reference()).expect("reference maze is valid")
}

/// Reference maze walls without any terrain zones.
fn uniform_reference_grid() -> Grid {
    let layout = MazeLayout {
        ground: Vec::new(),
        grass: Vec::new(),
        water: Vec::new(),
        ..MazeLayout::reference()
    };
    Grid::from_layout(&layout).expect("reference walls are valid")
}

/// Every third cell connected to the player spawn.
fn sample_cells(grid: &Grid) -> Vec<CellCoord> {
    // An off-grid goal makes the search flood the whole component.
    let mut tree = SearchTree::new();
    breadth_first_search(
        grid,
        CellCoord::new(13, 26),
        CellCoord::new(u32::MAX, u32::MAX),
        &mut tree,
    );

    let cells: Vec<_> = (0..grid.height())
        .flat_map(|row| (0..grid.width()).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| tree.reached(*cell))
        .step_by(3)
        .collect();
    assert!(cells.len() > 50, "sample too small: {}", cells.len());
    cells
}

#[test]
fn uniform_costs_give_equal_hop_counts() {
    let grid = uniform_reference_grid();
    let goal = CellCoord::new(13, 26);
    let mut pathfinder = Pathfinder::new();

    for start in sample_cells(&grid) {
        let hops: Vec<_> = ALGORITHMS
            .iter()
            .map(|algorithm| {
                pathfinder
                    .find_path(*algorithm, &grid, start, goal)
                    .map(|path| path.hops())
            })
            .collect();
        assert!(hops[0].is_some(), "{start:?} should reach the player spawn");
        assert_eq!(hops[0], hops[1], "BFS and Dijkstra disagree from {start:?}");
        assert_eq!(hops[1], hops[2], "Dijkstra and A* disagree from {start:?}");
    }
}

#[test]
fn weighted_searches_agree_on_cost() {
    let grid = reference_grid();
    let mut pathfinder = Pathfinder::new();
    let goals = [
        CellCoord::new(13, 26),
        CellCoord::new(1, 4),
        CellCoord::new(26, 32),
        CellCoord::new(13, 14),
    ];

    for goal in goals {
        for start in sample_cells(&grid) {
            let breadth_first = pathfinder
                .find_path(SearchAlgorithm::BreadthFirst, &grid, start, goal)
                .expect("reachable");
            let dijkstra = pathfinder
                .find_path(SearchAlgorithm::Dijkstra, &grid, start, goal)
                .expect("reachable");
            let a_star = pathfinder
                .find_path(SearchAlgorithm::AStar, &grid, start, goal)
                .expect("reachable");

            assert_eq!(
                dijkstra.cost(),
                a_star.cost(),
                "A* lost optimality from {start:?} to {goal:?}"
            );
            assert!(breadth_first.cost() >= dijkstra.cost());
            assert!(breadth_first.hops() <= dijkstra.hops());
        }
    }
}

#[test]
fn breadth_first_ties_follow_cell_parity() {
    let grid = Grid::from_layout(&MazeLayout::open(3, 3)).expect("valid layout");
    let path = run_search(
        SearchAlgorithm::BreadthFirst,
        &grid,
        CellCoord::new(0, 0),
        CellCoord::new(2, 2),
    )
    .expect("open grid is connected");

    assert_eq!(
        path.waypoints(),
        &[
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(1, 2),
        ]
    );
    assert_eq!(path.next_step(), Some(CellCoord::new(0, 1)));
}

#[test]
fn terrain_detour_is_preferred_by_weighted_searches() {
    // A water strip blocks the direct row; the row below is free.
    let layout = MazeLayout {
        water: vec![CellCoord::new(2, 0), CellCoord::new(3, 0)],
        ..MazeLayout::open(6, 2)
    };
    let grid = Grid::from_layout(&layout).expect("valid layout");
    let start = CellCoord::new(0, 0);
    let goal = CellCoord::new(5, 0);

    let breadth_first = run_search(SearchAlgorithm::BreadthFirst, &grid, start, goal)
        .expect("reachable");
    let dijkstra = run_search(SearchAlgorithm::Dijkstra, &grid, start, goal).expect("reachable");
    let a_star = run_search(SearchAlgorithm::AStar, &grid, start, goal).expect("reachable");

    assert_eq!(breadth_first.hops(), 5);
    assert_eq!(dijkstra.cost(), 7);
    assert_eq!(dijkstra.hops(), 7);
    assert_eq!(a_star.cost(), 7);
    assert!(dijkstra
        .waypoints()
        .iter()
        .all(|cell| !layout.water.contains(cell)));
}

#[test]
fn single_gap_wall_forces_route_through_gap() {
    let layout = MazeLayout {
        walls: vec![rect(0, 3, 12, 3), rect(14, 3, 27, 3)],
        ..MazeLayout::open(28, 36)
    };
    let grid = Grid::from_layout(&layout).expect("valid layout");
    let start = CellCoord::new(0, 0);
    let goal = CellCoord::new(0, 34);

    for algorithm in ALGORITHMS {
        let path = run_search(algorithm, &grid, start, goal).expect("gap keeps maze connected");
        assert!(
            path.waypoints().contains(&CellCoord::new(13, 3)),
            "{algorithm:?} must pass through the gap"
        );
        assert!(!path.waypoints().contains(&start));
        assert!(!path.waypoints().contains(&goal));
        assert_eq!(path.hops(), 34 + 2 * 13);
    }
}

#[test]
fn isolated_goal_is_unreachable_for_every_algorithm() {
    let grid = reference_grid();
    // The strip below the maze's bottom wall is not connected to the corridors.
    let goal = CellCoord::new(5, 35);
    for algorithm in ALGORITHMS {
        assert_eq!(
            run_search(algorithm, &grid, CellCoord::new(13, 26), goal),
            None,
            "{algorithm:?}"
        );
    }
}

#[test]
fn outer_rows_are_cut_off_from_the_corridors() {
    let grid = reference_grid();
    let mut tree = SearchTree::new();
    breadth_first_search(
        &grid,
        CellCoord::new(13, 26),
        CellCoord::new(u32::MAX, u32::MAX),
        &mut tree,
    );

    for column in 0..grid.width() {
        for row in [0, 1, 2, 34, 35] {
            assert!(!tree.reached(CellCoord::new(column, row)));
        }
    }
    assert!(tree.reached(CellCoord::new(13, 14)));
    assert!(tree.reached(CellCoord::new(13, 17)));
}

#[test]
fn repeated_searches_are_identical() {
    let grid = reference_grid();
    let start = CellCoord::new(13, 14);
    let goal = CellCoord::new(13, 26);
    let mut pathfinder = Pathfinder::new();

    for algorithm in ALGORITHMS {
        let first = pathfinder.find_path(algorithm, &grid, start, goal);
        let second = pathfinder.find_path(algorithm, &grid, start, goal);
        let fresh = run_search(algorithm, &grid, start, goal);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }
}

#[test]
fn paths_are_contiguous_and_avoid_walls() {
    let grid = reference_grid();
    let start = CellCoord::new(1, 4);
    let goal = CellCoord::new(26, 32);

    for algorithm in ALGORITHMS {
        let path = run_search(algorithm, &grid, start, goal).expect("reachable");
        let mut previous = start;
        for &cell in path.waypoints().iter().chain(std::iter::once(&goal)) {
            assert!(grid.in_bounds(cell) && grid.passable(cell));
            assert_eq!(previous.manhattan_distance(cell), 1, "{algorithm:?} skipped a cell");
            previous = cell;
        }
    }
}
