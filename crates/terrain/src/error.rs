//! Terrain streaming errors.

use engine_core::GridCoordinate;
use thiserror::Error;

/// Conditions that make terrain impossible for the current scene.
/// Partial tile misses and flat extents are not errors; they are logged and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
    /// The map subsystem is not present at all.
    #[error("map manager not present, cannot create world terrain")]
    MapsUnavailable,
    /// Loading finished but no tile is loaded anywhere.
    #[error("no maps loaded around grid {coordinate}, not able to draw any terrain")]
    NoMapsLoaded { coordinate: GridCoordinate },
}
