//! Map tile height data as delivered by the map loader.

use crate::grid::{GridCoordinate, CHUNK_SAMPLES, TILE_CHUNKS};

/// Height samples per chunk (9×9).
pub const CHUNK_SAMPLE_COUNT: usize = CHUNK_SAMPLES * CHUNK_SAMPLES;

/// A subdivision of a tile: a 9×9 block of rough height samples plus a base elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Rough heights relative to `base_height`, indexed `sample_x * 9 + sample_y`.
    pub hmap_rough: [f32; CHUNK_SAMPLE_COUNT],
    pub base_height: f32,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            hmap_rough: [0.0; CHUNK_SAMPLE_COUNT],
            base_height: 0.0,
        }
    }
}

impl Chunk {
    /// Chunk whose rough heights come from `f(sample_x, sample_y)`.
    pub fn from_fn(base_height: f32, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut hmap_rough = [0.0; CHUNK_SAMPLE_COUNT];
        for sx in 0..CHUNK_SAMPLES {
            for sy in 0..CHUNK_SAMPLES {
                hmap_rough[sx * CHUNK_SAMPLES + sy] = f(sx, sy);
            }
        }
        Self {
            hmap_rough,
            base_height,
        }
    }

    /// Rough sample at `(sample_x, sample_y)`, without the base height.
    #[inline]
    pub fn rough(&self, sample_x: usize, sample_y: usize) -> f32 {
        self.hmap_rough[sample_x * CHUNK_SAMPLES + sample_y]
    }

    /// Absolute height at `(sample_x, sample_y)`.
    #[inline]
    pub fn height(&self, sample_x: usize, sample_y: usize) -> f32 {
        self.rough(sample_x, sample_y) + self.base_height
    }
}

/// A square region of map data: 16×16 chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub coordinate: GridCoordinate,
    /// Always `TILE_CHUNKS²` chunks, indexed `chunk_y * 16 + chunk_x`.
    chunks: Vec<Chunk>,
}

impl Tile {
    /// Build a tile from a per-chunk constructor `f(chunk_x, chunk_y)`.
    pub fn from_fn(coordinate: GridCoordinate, mut f: impl FnMut(usize, usize) -> Chunk) -> Self {
        let mut chunks = Vec::with_capacity(TILE_CHUNKS * TILE_CHUNKS);
        for cy in 0..TILE_CHUNKS {
            for cx in 0..TILE_CHUNKS {
                chunks.push(f(cx, cy));
            }
        }
        Self { coordinate, chunks }
    }

    /// Tile where every sample has the same absolute height.
    pub fn flat(coordinate: GridCoordinate, height: f32) -> Self {
        Self::from_fn(coordinate, |_, _| Chunk {
            base_height: height,
            ..Chunk::default()
        })
    }

    #[inline]
    pub fn chunk(&self, chunk_x: usize, chunk_y: usize) -> &Chunk {
        &self.chunks[chunk_y * TILE_CHUNKS + chunk_x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_samples_are_x_major() {
        let chunk = Chunk::from_fn(10.0, |sx, sy| (sx * 100 + sy) as f32);
        assert_eq!(chunk.hmap_rough[2 * 9 + 5], 205.0);
        assert_eq!(chunk.rough(2, 5), 205.0);
        assert_eq!(chunk.height(2, 5), 215.0);
    }

    #[test]
    fn tile_addresses_every_chunk() {
        let tile = Tile::from_fn(GridCoordinate::new(3, 4), |cx, cy| Chunk {
            base_height: (cx * 16 + cy) as f32,
            ..Chunk::default()
        });
        assert_eq!(tile.chunk(0, 0).base_height, 0.0);
        assert_eq!(tile.chunk(15, 0).base_height, 240.0);
        assert_eq!(tile.chunk(3, 7).base_height, 55.0);
        assert_eq!(tile.coordinate, GridCoordinate::new(3, 4));
    }

    #[test]
    fn flat_tile_has_uniform_height() {
        let tile = Tile::flat(GridCoordinate::default(), -4.5);
        assert_eq!(tile.chunk(9, 2).height(8, 8), -4.5);
    }
}
