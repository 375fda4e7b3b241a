//! Core world-client types shared across the engine crates.
//!
//! This crate provides the foundational types used by the map loader and the terrain:
//! - Tile-grid coordinates and map constants
//! - Tile and chunk height data
//! - The tile source interface the terrain reads through
//! - Frame timing

pub mod grid;
pub mod tile;
pub mod tile_source;
pub mod time;

pub use grid::*;
pub use tile::*;
pub use tile_source::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
