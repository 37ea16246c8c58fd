//! Static wall and terrain model the pursuit searches run over.

use puckman_core::{CellCoord, Terrain};

use crate::layout::{CellSet, LayoutError, MazeLayout, MAX_GRID_CELLS};

/// Dense tile grid populated once from a [`MazeLayout`].
///
/// Walls and terrain zones are stored per cell in row-major order. The grid
/// exposes no mutation after construction, so it can be shared by reference
/// with every system for the lifetime of the world.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Wall,
    Floor(Terrain),
}

impl Grid {
    /// Builds the grid from the layout's wall rectangles and terrain zones.
    ///
    /// Rejects zero-sized or oversized grids, rectangles or zone cells outside
    /// the bounds, zone cells placed on walls and cells claimed by two zones.
    pub fn from_layout(layout: &MazeLayout) -> Result<Self, LayoutError> {
        let (width, height) = (layout.width, layout.height);
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyGrid { width, height });
        }

        let too_large = LayoutError::GridTooLarge {
            width,
            height,
            limit: MAX_GRID_CELLS,
        };
        let cells = u64::from(width) * u64::from(height);
        if cells > MAX_GRID_CELLS {
            return Err(too_large);
        }
        let capacity = usize::try_from(cells).map_err(|_| too_large)?;
        let mut grid = Self {
            width,
            height,
            tiles: vec![Tile::Floor(Terrain::Open); capacity],
        };

        for rect in &layout.walls {
            if !grid.in_bounds(rect.min()) || !grid.in_bounds(rect.max()) {
                return Err(LayoutError::RectOutOfBounds { rect: *rect });
            }
            for cell in rect.cells() {
                if let Some(index) = grid.index(cell) {
                    grid.tiles[index] = Tile::Wall;
                }
            }
        }

        let zones = [
            (CellSet::Ground, Terrain::Ground, &layout.ground),
            (CellSet::Grass, Terrain::Grass, &layout.grass),
            (CellSet::Water, Terrain::Water, &layout.water),
        ];
        for (set, terrain, cells) in zones {
            for &cell in cells {
                let index = grid
                    .index(cell)
                    .ok_or(LayoutError::CellOutOfBounds { set, cell })?;
                match grid.tiles[index] {
                    Tile::Wall => return Err(LayoutError::CellOnWall { set, cell }),
                    Tile::Floor(Terrain::Open) => grid.tiles[index] = Tile::Floor(terrain),
                    Tile::Floor(existing) if existing == terrain => {}
                    Tile::Floor(existing) => {
                        return Err(LayoutError::TerrainOverlap {
                            cell,
                            first: existing,
                            second: terrain,
                        })
                    }
                }
            }
        }

        Ok(grid)
    }

    /// Width of the grid in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Reports whether the cell is not a wall.
    ///
    /// Bounds are not implied: a cell outside the grid is never a wall, so
    /// callers that may leave the grid must also consult [`Grid::in_bounds`].
    #[must_use]
    pub fn passable(&self, cell: CellCoord) -> bool {
        self.tile(cell) != Some(Tile::Wall)
    }

    /// Passable in-bounds orthogonal neighbours of the provided cell.
    ///
    /// Candidates are produced east, north, west, south. When the coordinate
    /// sum of `cell` is even the order is reversed, which alternates the
    /// direction searches favour on ties and keeps paths reproducible.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        let candidates = [
            cell.column()
                .checked_add(1)
                .map(|column| CellCoord::new(column, cell.row())),
            cell.row()
                .checked_sub(1)
                .map(|row| CellCoord::new(cell.column(), row)),
            cell.column()
                .checked_sub(1)
                .map(|column| CellCoord::new(column, cell.row())),
            cell.row()
                .checked_add(1)
                .map(|row| CellCoord::new(cell.column(), row)),
        ];

        for next in candidates.into_iter().flatten() {
            if self.in_bounds(next) && self.passable(next) {
                neighbors.push(next);
            }
        }

        if (u64::from(cell.column()) + u64::from(cell.row())) % 2 == 0 {
            neighbors.reverse();
        }
        neighbors
    }

    /// Cost of stepping onto the provided cell.
    ///
    /// Walls and cells outside the grid report the base cost of one; searches
    /// never query them because [`Grid::neighbors`] filters them out.
    #[must_use]
    pub fn cost(&self, cell: CellCoord) -> u32 {
        self.terrain(cell).map_or(1, Terrain::cost)
    }

    /// Terrain of a passable in-bounds cell, or `None` for walls and cells
    /// outside the grid.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        match self.tile(cell)? {
            Tile::Wall => None,
            Tile::Floor(terrain) => Some(terrain),
        }
    }

    /// Iterates every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter(move |(_, tile)| *tile == Tile::Wall)
            .map(|(cell, _)| cell)
    }

    /// Iterates every cell carrying the provided terrain in row-major order.
    pub fn zone(&self, terrain: Terrain) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter(move |(_, tile)| *tile == Tile::Floor(terrain))
            .map(|(cell, _)| cell)
    }

    /// Number of cells covered by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u64;
            let width = u64::from(width);
            let cell = CellCoord::new((index % width) as u32, (index / width) as u32);
            (cell, *tile)
        })
    }
}

/// Fixed-capacity iterator over the neighbours produced by [`Grid::neighbors`].
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }

    fn reverse(&mut self) {
        self.buffer[..self.len].reverse();
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
