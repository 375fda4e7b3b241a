//! Deterministic tile height data for the map loader.
//!
//! Heights come from fractal Perlin/Simplex noise sampled in global sample space, so
//! neighboring tiles line up and the same seed always yields the same map.

use std::collections::HashSet;

use engine_core::{Chunk, GridCoordinate, Tile, CHUNK_SAMPLES, MAP_TILES, TILE_CHUNKS};
use noise::{NoiseFn, Perlin, Simplex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Samples between neighboring chunk origins; chunk edges share a sample.
const CHUNK_STRIDE: usize = CHUNK_SAMPLES - 1;

/// Configuration for tile generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for all noise and per-tile roughness.
    pub seed: u64,
    /// Peak-to-peak height range in world units.
    pub height_scale: f32,
    /// Height added to every sample.
    pub sea_level: f32,
    /// Noise frequency per sample (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Maximum per-sample roughness added on top of the noise.
    pub roughness: f32,
    /// Tiles that fail to load, as `(x, y)` grid coordinates.
    pub holes: Vec<(i32, i32)>,
    /// A world with no terrain tiles at all (building-only maps).
    pub empty_world: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            height_scale: 60.0,
            sea_level: 0.0,
            frequency: 0.004,
            octaves: 4,
            roughness: 0.25,
            holes: Vec::new(),
            empty_world: false,
        }
    }
}

/// Produces tiles on demand. Stands in for reading map files.
#[derive(Debug)]
pub struct TileGenerator {
    config: GeneratorConfig,
    holes: HashSet<GridCoordinate>,
    perlin: Perlin,
    simplex: Simplex,
}

impl TileGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let holes = config
            .holes
            .iter()
            .map(|&(x, y)| GridCoordinate::new(x, y))
            .collect();
        Self {
            perlin: Perlin::new(deterministic_noise_seed(config.seed, 0)),
            simplex: Simplex::new(deterministic_noise_seed(config.seed, 1)),
            holes,
            config,
        }
    }

    /// Generate the tile at `coord`, or `None` if the map has no tile there.
    pub fn generate(&self, coord: GridCoordinate) -> Option<Tile> {
        if self.config.empty_world || !coord.is_on_map() || self.holes.contains(&coord) {
            return None;
        }

        let tile_index = (coord.y * MAP_TILES + coord.x) as u64;
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ tile_index.wrapping_mul(0x2545f4914f6cdd1d));
        let roughness = self.config.roughness.max(0.0);
        let tile_origin_x = coord.x as f64 * (TILE_CHUNKS * CHUNK_STRIDE) as f64;
        let tile_origin_y = coord.y as f64 * (TILE_CHUNKS * CHUNK_STRIDE) as f64;

        Some(Tile::from_fn(coord, |cx, cy| {
            let origin_x = tile_origin_x + (cx * CHUNK_STRIDE) as f64;
            let origin_y = tile_origin_y + (cy * CHUNK_STRIDE) as f64;
            let base_height = self.height_at(origin_x, origin_y);
            Chunk::from_fn(base_height, |sx, sy| {
                let h = self.height_at(origin_x + sx as f64, origin_y + sy as f64);
                let jitter = if roughness > 0.0 {
                    rng.gen_range(-roughness..=roughness)
                } else {
                    0.0
                };
                h - base_height + jitter
            })
        }))
    }

    /// Absolute height at a global sample position.
    fn height_at(&self, x: f64, y: f64) -> f32 {
        let mut value = 0.0_f64;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0_f64;

        for _ in 0..self.config.octaves.max(1) {
            let perlin_sample = self.perlin.get([x * frequency, y * frequency]);
            let simplex_sample = self.simplex.get([x * frequency + 1000.0, y * frequency + 1000.0]);
            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        // Normalized to -0.5..0.5 so the sea level sits mid-range
        let normalized = ((value / max_value) * 0.5).clamp(-0.5, 0.5);
        normalized as f32 * self.config.height_scale + self.config.sea_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            ..Default::default()
        }
    }

    /// Same seed must produce identical tiles regardless of request order.
    #[test]
    fn tiles_deterministic_same_seed() {
        let a = TileGenerator::new(config(4242));
        let b = TileGenerator::new(config(4242));
        let coord = GridCoordinate::new(31, 33);
        let _ = b.generate(GridCoordinate::new(30, 30));
        assert_eq!(a.generate(coord), b.generate(coord));
    }

    #[test]
    fn different_seed_different_heights() {
        let coord = GridCoordinate::new(32, 32);
        let a = TileGenerator::new(config(1)).generate(coord);
        let b = TileGenerator::new(config(2)).generate(coord);
        assert_ne!(a, b);
    }

    #[test]
    fn holes_and_off_map_tiles_are_missing() {
        let generator = TileGenerator::new(GeneratorConfig {
            holes: vec![(10, 11)],
            ..Default::default()
        });
        assert!(generator.generate(GridCoordinate::new(10, 11)).is_none());
        assert!(generator.generate(GridCoordinate::new(11, 10)).is_some());
        assert!(generator.generate(GridCoordinate::new(-1, 0)).is_none());
        assert!(generator.generate(GridCoordinate::new(0, MAP_TILES)).is_none());
    }

    #[test]
    fn empty_world_has_no_tiles() {
        let generator = TileGenerator::new(GeneratorConfig {
            empty_world: true,
            ..Default::default()
        });
        assert!(generator.generate(GridCoordinate::new(32, 32)).is_none());
    }

    #[test]
    fn heights_stay_within_scale_and_roughness() {
        let cfg = GeneratorConfig {
            sea_level: 10.0,
            ..Default::default()
        };
        let limit = cfg.height_scale * 0.5 + cfg.roughness + 1e-3;
        let tile = TileGenerator::new(cfg.clone())
            .generate(GridCoordinate::new(20, 20))
            .unwrap();
        for cy in 0..TILE_CHUNKS {
            for cx in 0..TILE_CHUNKS {
                let chunk = tile.chunk(cx, cy);
                for sx in 0..CHUNK_SAMPLES {
                    for sy in 0..CHUNK_SAMPLES {
                        let h = chunk.height(sx, sy) - cfg.sea_level;
                        assert!(h.abs() <= limit, "height {} out of range", h);
                    }
                }
            }
        }
    }
}
