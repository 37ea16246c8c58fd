//! Maze layout description, its file format and the embedded reference maze.

use puckman_core::{CellCoord, CellRect, GhostKind, MovementStrategy, Terrain};
use serde::Deserialize;
use thiserror::Error;

/// Width of the reference maze in cells.
pub const REFERENCE_WIDTH: u32 = 28;
/// Height of the reference maze in cells.
pub const REFERENCE_HEIGHT: u32 = 36;
/// Largest number of cells a layout may declare.
pub const MAX_GRID_CELLS: u64 = 1 << 20;

/// Everything needed to populate a world: walls, terrain, pickups and spawns.
///
/// Layouts are plain data. Nothing is validated until the layout is turned
/// into a [`crate::Grid`] or [`crate::World`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    /// Number of columns in the grid.
    pub width: u32,
    /// Number of rows in the grid.
    pub height: u32,
    /// Row whose outer edges connect through the side corridor, if any.
    pub wrap_row: Option<u32>,
    /// Wall rectangles with inclusive corners.
    pub walls: Vec<CellRect>,
    /// Cells costing three to enter.
    pub ground: Vec<CellCoord>,
    /// Cells costing five to enter.
    pub grass: Vec<CellCoord>,
    /// Cells costing ten to enter.
    pub water: Vec<CellCoord>,
    /// Cells holding a regular pill at startup.
    pub pellets: Vec<CellCoord>,
    /// Cells holding a power pill at startup.
    pub energizers: Vec<CellCoord>,
    /// Cell the player starts on.
    pub player: CellCoord,
    /// Ghosts in identity order.
    pub ghosts: Vec<GhostSpawn>,
}

/// Starting placement and behaviour of a single ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSpawn {
    /// Identity of the ghost.
    pub kind: GhostKind,
    /// Cell the ghost starts on and returns to when reset.
    pub cell: CellCoord,
    /// Behaviour deciding the ghost's steps.
    pub strategy: MovementStrategy,
}

impl GhostSpawn {
    /// Places a ghost using the strategy its identity implies.
    #[must_use]
    pub const fn new(kind: GhostKind, cell: CellCoord) -> Self {
        Self {
            kind,
            cell,
            strategy: kind.default_strategy(),
        }
    }
}

/// Named cell collections a layout error may refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellSet {
    /// Ground terrain zone.
    Ground,
    /// Grass terrain zone.
    Grass,
    /// Water terrain zone.
    Water,
    /// Regular pill placements.
    Pellets,
    /// Power pill placements.
    Energizers,
    /// Player spawn cell.
    PlayerSpawn,
    /// Ghost spawn cells.
    GhostSpawn,
    /// Side corridor row.
    WrapRow,
}

/// Reasons a layout is refused at startup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout file could not be parsed.
    #[error("failed to parse maze layout: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// The grid has no cells.
    #[error("maze grid must have at least one cell, got {width}x{height}")]
    EmptyGrid {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// The grid declares more cells than [`MAX_GRID_CELLS`].
    #[error("maze grid {width}x{height} exceeds the {limit} cell limit")]
    GridTooLarge {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
        /// Maximum accepted cell count.
        limit: u64,
    },
    /// A wall rectangle lists its corners in the wrong order.
    #[error("wall rectangle corners {min:?} and {max:?} are inverted")]
    InvertedRect {
        /// First corner as written.
        min: CellCoord,
        /// Second corner as written.
        max: CellCoord,
    },
    /// A wall rectangle extends beyond the grid.
    #[error("wall rectangle {rect:?} extends beyond the grid")]
    RectOutOfBounds {
        /// Offending rectangle.
        rect: CellRect,
    },
    /// A listed cell lies outside the grid.
    #[error("{set:?} cell {cell:?} lies outside the grid")]
    CellOutOfBounds {
        /// Collection the cell belongs to.
        set: CellSet,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A listed cell coincides with a wall.
    #[error("{set:?} cell {cell:?} is covered by a wall")]
    CellOnWall {
        /// Collection the cell belongs to.
        set: CellSet,
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two terrain zones claim the same cell.
    #[error("cell {cell:?} is claimed by both {first:?} and {second:?}")]
    TerrainOverlap {
        /// Offending cell.
        cell: CellCoord,
        /// Zone that claimed the cell first.
        first: Terrain,
        /// Zone that claimed it again.
        second: Terrain,
    },
    /// Two pickups share a cell.
    #[error("cell {cell:?} holds more than one pickup")]
    PickupOverlap {
        /// Offending cell.
        cell: CellCoord,
    },
}

impl MazeLayout {
    /// Layout of the given size with no walls, zones, pickups or ghosts.
    ///
    /// The player starts in the upper-left corner.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            wrap_row: None,
            walls: Vec::new(),
            ground: Vec::new(),
            grass: Vec::new(),
            water: Vec::new(),
            pellets: Vec::new(),
            energizers: Vec::new(),
            player: CellCoord::new(0, 0),
            ghosts: Vec::new(),
        }
    }

    /// The classic 28x36 maze with its ghost house and terrain zones.
    #[must_use]
    pub fn reference() -> Self {
        let walls: Vec<CellRect> = REFERENCE_WALLS
            .iter()
            .filter_map(|&[x1, y1, x2, y2]| {
                CellRect::from_corners(CellCoord::new(x1, y1), CellCoord::new(x2, y2))
            })
            .collect();
        let ground = cells(REFERENCE_GROUND);
        let grass = cells(REFERENCE_GRASS);
        let water = cells(REFERENCE_WATER);
        let energizers = cells(REFERENCE_ENERGIZERS);
        let player = CellCoord::new(13, 26);

        let mut layout = Self {
            wrap_row: Some(17),
            walls,
            ground,
            grass,
            water,
            energizers,
            player,
            ghosts: vec![
                GhostSpawn::new(GhostKind::Red, CellCoord::new(13, 14)),
                GhostSpawn::new(GhostKind::Pink, CellCoord::new(11, 17)),
                GhostSpawn::new(GhostKind::Blue, CellCoord::new(13, 17)),
                GhostSpawn::new(GhostKind::Orange, CellCoord::new(15, 17)),
            ],
            ..Self::open(REFERENCE_WIDTH, REFERENCE_HEIGHT)
        };
        layout.pellets = layout.reference_pellets();
        layout
    }

    /// Parses a layout from its TOML representation.
    ///
    /// Only the syntax and rectangle corner order are checked here.
    pub fn from_toml_str(contents: &str) -> Result<Self, LayoutError> {
        let file: LayoutFile = toml::from_str(contents).map_err(|error| LayoutError::Parse {
            message: error.to_string(),
        })?;

        let walls = file
            .walls
            .iter()
            .map(|&[x1, y1, x2, y2]| {
                let (min, max) = (CellCoord::new(x1, y1), CellCoord::new(x2, y2));
                CellRect::from_corners(min, max).ok_or(LayoutError::InvertedRect { min, max })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            width: file.width,
            height: file.height,
            wrap_row: file.wrap_row,
            walls,
            ground: cells(&file.ground),
            grass: cells(&file.grass),
            water: cells(&file.water),
            pellets: cells(&file.pellets),
            energizers: cells(&file.energizers),
            player: cell(file.player),
            ghosts: file
                .ghosts
                .iter()
                .map(|ghost| GhostSpawn {
                    kind: ghost.kind,
                    cell: cell(ghost.cell),
                    strategy: ghost
                        .strategy
                        .unwrap_or_else(|| ghost.kind.default_strategy()),
                })
                .collect(),
        })
    }

    /// Pills fill every plain corridor cell of the playfield outside the
    /// ghost house, except the player spawn and the power pill cells.
    fn reference_pellets(&self) -> Vec<CellCoord> {
        let house = CellRect::from_corners(CellCoord::new(10, 14), CellCoord::new(17, 19));
        let mut pellets = Vec::new();
        for row in REFERENCE_PLAYFIELD_ROWS {
            for column in 0..self.width {
                let cell = CellCoord::new(column, row);
                let blocked = self.walls.iter().any(|rect| rect.contains(cell))
                    || house.is_some_and(|house| house.contains(cell))
                    || self.ground.contains(&cell)
                    || self.grass.contains(&cell)
                    || self.water.contains(&cell)
                    || self.energizers.contains(&cell)
                    || cell == self.player;
                if !blocked {
                    pellets.push(cell);
                }
            }
        }
        pellets
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    width: u32,
    height: u32,
    #[serde(default)]
    wrap_row: Option<u32>,
    #[serde(default)]
    walls: Vec<[u32; 4]>,
    #[serde(default)]
    ground: Vec<[u32; 2]>,
    #[serde(default)]
    grass: Vec<[u32; 2]>,
    #[serde(default)]
    water: Vec<[u32; 2]>,
    #[serde(default)]
    pellets: Vec<[u32; 2]>,
    #[serde(default)]
    energizers: Vec<[u32; 2]>,
    player: [u32; 2],
    #[serde(default)]
    ghosts: Vec<GhostFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GhostFile {
    kind: GhostKind,
    cell: [u32; 2],
    #[serde(default)]
    strategy: Option<MovementStrategy>,
}

fn cell([column, row]: [u32; 2]) -> CellCoord {
    CellCoord::new(column, row)
}

fn cells(raw: &[[u32; 2]]) -> Vec<CellCoord> {
    raw.iter().copied().map(cell).collect()
}

const REFERENCE_PLAYFIELD_ROWS: std::ops::RangeInclusive<u32> = 4..=32;

const REFERENCE_WALLS: &[[u32; 4]] = &[
    [0, 3, 27, 3],
    [0, 4, 0, 11],
    [2, 5, 5, 7],
    [7, 5, 11, 7],
    [13, 4, 14, 7],
    [16, 5, 20, 7],
    [22, 5, 25, 7],
    [27, 4, 27, 11],
    [2, 9, 5, 10],
    [7, 9, 8, 16],
    [10, 9, 17, 10],
    [19, 9, 20, 16],
    [22, 9, 25, 10],
    [0, 12, 5, 16],
    [9, 12, 11, 13],
    [13, 11, 14, 13],
    [16, 12, 18, 13],
    [22, 12, 27, 16],
    [0, 18, 5, 22],
    [7, 18, 8, 22],
    [10, 21, 17, 22],
    [19, 18, 20, 22],
    [22, 18, 27, 22],
    [0, 23, 0, 32],
    [2, 24, 5, 25],
    [7, 24, 11, 25],
    [13, 23, 14, 25],
    [16, 24, 20, 25],
    [22, 24, 25, 25],
    [27, 23, 27, 32],
    [4, 26, 5, 28],
    [22, 26, 23, 28],
    [1, 27, 2, 28],
    [7, 27, 8, 29],
    [10, 27, 17, 28],
    [19, 27, 20, 29],
    [25, 27, 26, 28],
    [2, 30, 11, 31],
    [13, 29, 14, 31],
    [16, 30, 25, 31],
    [0, 33, 27, 33],
    // ghost house
    [10, 15, 12, 16],
    [15, 15, 17, 16],
    [10, 17, 10, 17],
    [17, 17, 17, 17],
    [10, 18, 17, 19],
];

const REFERENCE_GROUND: &[[u32; 2]] = &[
    [6, 12], [6, 13], [6, 14], [6, 15], [6, 16], [6, 17],
    [6, 18], [6, 19], [6, 20], [6, 21], [6, 22],
    [21, 12], [21, 13], [21, 14], [21, 15], [21, 16], [21, 17],
    [21, 18], [21, 19], [21, 20], [21, 21], [21, 22],
];

const REFERENCE_GRASS: &[[u32; 2]] = &[
    [9, 14], [9, 15], [10, 14], [17, 14], [18, 14], [18, 15],
    [9, 19], [9, 20], [10, 20], [11, 20], [12, 20], [13, 20],
    [14, 20], [15, 20], [16, 20], [17, 20], [18, 20], [18, 19],
];

const REFERENCE_WATER: &[[u32; 2]] = &[
    [9, 27], [9, 28], [9, 29], [10, 29], [11, 29], [12, 29],
    [12, 30], [12, 31], [15, 31], [15, 30], [15, 29], [16, 29],
    [17, 29], [18, 29], [18, 28], [18, 27],
];

const REFERENCE_ENERGIZERS: &[[u32; 2]] = &[[1, 6], [26, 6], [1, 26], [26, 26]];

#[cfg(test)]
mod tests {
    use super::*;
    use puckman_core::SearchAlgorithm;

    #[test]
    fn reference_layout_has_classic_dimensions() {
        let layout = MazeLayout::reference();
        assert_eq!(layout.width, 28);
        assert_eq!(layout.height, 36);
        assert_eq!(layout.walls.len(), REFERENCE_WALLS.len());
        assert_eq!(layout.ghosts.len(), 4);
        assert!(!layout.pellets.is_empty());
        assert!(!layout.pellets.contains(&layout.player));
    }

    #[test]
    fn parses_layout_file() {
        let layout = MazeLayout::from_toml_str(
            r#"
            width = 6
            height = 4
            wrap_row = 1
            walls = [[0, 0, 5, 0]]
            water = [[2, 2]]
            pellets = [[1, 1], [2, 1]]
            player = [4, 2]

            [[ghosts]]
            kind = "red"
            cell = [1, 2]

            [[ghosts]]
            kind = "orange"
            cell = [3, 3]
            strategy = { Search = "AStar" }
            "#,
        )
        .expect("layout parses");

        assert_eq!(layout.width, 6);
        assert_eq!(layout.wrap_row, Some(1));
        assert_eq!(layout.walls.len(), 1);
        assert_eq!(layout.water, vec![CellCoord::new(2, 2)]);
        assert_eq!(layout.player, CellCoord::new(4, 2));
        assert_eq!(layout.ghosts[0], GhostSpawn::new(GhostKind::Red, CellCoord::new(1, 2)));
        assert_eq!(
            layout.ghosts[1].strategy,
            MovementStrategy::Search(SearchAlgorithm::AStar)
        );
    }

    #[test]
    fn rejects_inverted_rectangles() {
        let result = MazeLayout::from_toml_str(
            r#"
            width = 4
            height = 4
            walls = [[3, 0, 1, 0]]
            player = [0, 0]
            "#,
        );
        assert_eq!(
            result,
            Err(LayoutError::InvertedRect {
                min: CellCoord::new(3, 0),
                max: CellCoord::new(1, 0),
            })
        );
    }

    #[test]
    fn reports_parse_errors() {
        let result = MazeLayout::from_toml_str("width = \"wide\"");
        assert!(matches!(result, Err(LayoutError::Parse { .. })));
    }
}
