//! Tile-grid coordinates and map dimensions.

use glam::Vec2;

/// Width of one map tile in world units.
pub const TILE_SIZE: f32 = 533.333_3;
/// Width of one chunk in world units.
pub const CHUNK_SIZE: f32 = TILE_SIZE / TILE_CHUNKS as f32;
/// Distance between two height samples in world units.
pub const UNIT_SIZE: f32 = CHUNK_SIZE / 8.0;

/// Chunks per tile along one axis.
pub const TILE_CHUNKS: usize = 16;
/// Height samples per chunk along one axis.
pub const CHUNK_SAMPLES: usize = 9;
/// Height samples per tile along one axis (16 chunks × 9 samples).
pub const TILE_SAMPLES: usize = TILE_CHUNKS * CHUNK_SAMPLES;
/// Tiles per neighborhood along one axis.
pub const NEIGHBORHOOD: usize = 3;
/// Cells of the synthesized surface along one axis.
pub const SURFACE_CELLS: usize = NEIGHBORHOOD * TILE_SAMPLES;
/// Vertices of the synthesized surface along one axis.
pub const SURFACE_VERTICES: usize = SURFACE_CELLS + 1;

/// Tiles per map along one axis.
pub const MAP_TILES: i32 = 64;
/// World origin sits in the middle of the map grid.
const ZERO_POINT: f32 = (MAP_TILES / 2) as f32 * TILE_SIZE;

/// Fractional tile-grid position of a world position.
/// Grid axes run opposite to world axes: grid 0 is at `+ZERO_POINT`.
pub fn grid_position(pos: Vec2) -> Vec2 {
    (Vec2::splat(ZERO_POINT) - pos) / TILE_SIZE
}

/// Integer coordinate of a map tile in tile-grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid tile containing a world position.
    pub fn from_world(pos: Vec2) -> Self {
        let grid = grid_position(pos);
        Self {
            x: grid.x.floor() as i32,
            y: grid.y.floor() as i32,
        }
    }

    /// Coordinate shifted by `(dx, dy)` tiles.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The 3×3 block centered on this coordinate, `dy` outer and `dx` inner.
    pub fn neighborhood(self) -> impl Iterator<Item = GridCoordinate> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| self.offset(dx, dy)))
    }

    /// Whether `other` lies in the 3×3 block around this coordinate.
    pub fn is_neighbor_of(self, other: GridCoordinate) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    /// Whether this coordinate addresses a tile on the 64×64 map.
    pub fn is_on_map(self) -> bool {
        (0..MAP_TILES).contains(&self.x) && (0..MAP_TILES).contains(&self.y)
    }
}

impl std::fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
