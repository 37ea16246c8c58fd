//! Text snapshot of the maze.

use std::fmt;

use puckman_core::{CellCoord, PickupKind, Terrain};
use puckman_world::{query, World};

const TERRAIN_GLYPHS: [(Terrain, char); 3] = [
    (Terrain::Ground, ':'),
    (Terrain::Grass, '"'),
    (Terrain::Water, '~'),
];
const WALL_GLYPH: char = '#';
const PLAYER_GLYPH: char = 'C';

/// Row-major character buffer covering the whole grid.
///
/// Layers are painted bottom to top: terrain, walls, pickups, the player and
/// finally the ghosts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    width: usize,
    cells: Vec<char>,
}

impl Frame {
    pub(crate) fn capture(world: &World) -> Self {
        let grid = query::grid(world);
        let mut frame = Self {
            width: usize::try_from(grid.width()).unwrap_or(0),
            cells: vec![' '; grid.cell_count()],
        };

        for (terrain, glyph) in TERRAIN_GLYPHS {
            for cell in grid.zone(terrain) {
                frame.paint(grid.index(cell), glyph);
            }
        }
        for cell in grid.walls() {
            frame.paint(grid.index(cell), WALL_GLYPH);
        }

        for row in 0..grid.height() {
            for column in 0..grid.width() {
                let cell = CellCoord::new(column, row);
                let glyph = match query::pickup_at(world, cell) {
                    Some(PickupKind::Pellet) => '.',
                    Some(PickupKind::Energizer) => 'o',
                    None => continue,
                };
                frame.paint(grid.index(cell), glyph);
            }
        }

        frame.paint(grid.index(query::player_cell(world)), PLAYER_GLYPH);
        for ghost in query::ghost_view(world).iter() {
            frame.paint(grid.index(ghost.cell), ghost.kind.glyph());
        }

        frame
    }

    fn paint(&mut self, index: Option<usize>, glyph: char) {
        if let Some(slot) = index.and_then(|index| self.cells.get_mut(index)) {
            *slot = glyph;
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
