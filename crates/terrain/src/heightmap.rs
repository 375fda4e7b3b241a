//! Copies tile chunk heights into the unified surface.
//!
//! Tile `center.offset(dx, dy)` lands in tile row `dy + 1` and tile column `dx + 1`.
//! Rows advance along surface x and columns along surface y:
//!
//! ```text
//! terrain_x = 144 * tile_row + 9 * chunk_x + sample_x
//! terrain_y = 144 * tile_col + 9 * chunk_y + sample_y
//! ```
//!
//! Swapping the pairing rotates the rendered terrain against world axes.

use engine_core::{
    grid_position, GridCoordinate, Tile, TileAccess, CHUNK_SAMPLES, NEIGHBORHOOD, SURFACE_CELLS,
    TILE_CHUNKS, TILE_SAMPLES,
};
use glam::Vec2;

use crate::surface::TerrainSurface;

/// Source of one surface cell: which neighborhood tile, chunk and sample it is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLocation {
    pub tile_row: usize,
    pub tile_col: usize,
    pub chunk_x: usize,
    pub chunk_y: usize,
    pub sample_x: usize,
    pub sample_y: usize,
}

impl SampleLocation {
    /// Surface cell this sample is written to.
    pub fn terrain_index(&self) -> (usize, usize) {
        (
            TILE_SAMPLES * self.tile_row + CHUNK_SAMPLES * self.chunk_x + self.sample_x,
            TILE_SAMPLES * self.tile_col + CHUNK_SAMPLES * self.chunk_y + self.sample_y,
        )
    }

    /// Grid coordinate of the source tile for a neighborhood centered on `center`.
    pub fn tile_coordinate(&self, center: GridCoordinate) -> GridCoordinate {
        center.offset(self.tile_col as i32 - 1, self.tile_row as i32 - 1)
    }
}

/// Inverse of [`SampleLocation::terrain_index`]. `None` for the last row/column,
/// which no tile writes.
pub fn locate(terrain_x: usize, terrain_y: usize) -> Option<SampleLocation> {
    if terrain_x >= SURFACE_CELLS || terrain_y >= SURFACE_CELLS {
        return None;
    }
    let (tile_row, rest_x) = (terrain_x / TILE_SAMPLES, terrain_x % TILE_SAMPLES);
    let (tile_col, rest_y) = (terrain_y / TILE_SAMPLES, terrain_y % TILE_SAMPLES);
    Some(SampleLocation {
        tile_row,
        tile_col,
        chunk_x: rest_x / CHUNK_SAMPLES,
        chunk_y: rest_y / CHUNK_SAMPLES,
        sample_x: rest_x % CHUNK_SAMPLES,
        sample_y: rest_y % CHUNK_SAMPLES,
    })
}

/// Surface-local position of a world position for the neighborhood around `center`,
/// in the `(x, z)` form taken by [`TerrainSurface::sample_height`]. Follows the same
/// pairing as the copy: grid y runs along surface x, grid x along surface y.
pub fn world_to_surface(center: GridCoordinate, pos: Vec2, unit_size: f32) -> Vec2 {
    let grid = grid_position(pos);
    let tile_col = grid.x - (center.x - 1) as f32;
    let tile_row = grid.y - (center.y - 1) as f32;
    Vec2::new(tile_row, tile_col) * (TILE_SAMPLES as f32 * unit_size)
}

/// Write the heights of every available neighborhood tile into `surface`.
///
/// The caller must hold the tile lock for the whole call. Missing tiles are skipped and
/// their region keeps the heights of the previous pass. Returns the missing coordinates.
pub fn synthesize_heights<A>(
    surface: &mut TerrainSurface,
    tiles: &A,
    center: GridCoordinate,
) -> Vec<GridCoordinate>
where
    A: TileAccess + ?Sized,
{
    let mut missing = Vec::new();
    for tile_row in 0..NEIGHBORHOOD {
        for tile_col in 0..NEIGHBORHOOD {
            let coord = center.offset(tile_col as i32 - 1, tile_row as i32 - 1);
            match tiles.get_tile(coord) {
                Some(tile) => copy_tile(surface, tile, tile_row, tile_col),
                None => {
                    log::warn!("Terrain: MapTile {} not loaded, can't apply heightmap", coord);
                    missing.push(coord);
                }
            }
        }
    }
    missing
}

fn copy_tile(surface: &mut TerrainSurface, tile: &Tile, tile_row: usize, tile_col: usize) {
    for chunk_y in 0..TILE_CHUNKS {
        for chunk_x in 0..TILE_CHUNKS {
            let chunk = tile.chunk(chunk_x, chunk_y);
            for sample_y in 0..CHUNK_SAMPLES {
                for sample_x in 0..CHUNK_SAMPLES {
                    let (tx, ty) = SampleLocation {
                        tile_row,
                        tile_col,
                        chunk_x,
                        chunk_y,
                        sample_x,
                        sample_y,
                    }
                    .terrain_index();
                    surface.set_height(tx, ty, chunk.height(sample_x, sample_y));
                }
            }
        }
    }
}
