//! Interface between the tile loader and everything that reads tile data.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::grid::GridCoordinate;
use crate::tile::Tile;

/// Read access to loaded tiles while the loader is locked out.
pub trait TileAccess {
    /// Tile at `coord`, or `None` if it is not loaded (never requested, failed, or evicted).
    fn get_tile(&self, coord: GridCoordinate) -> Option<&Tile>;
}

/// Supplies tiles by grid coordinate. Tiles are loaded and freed by another thread;
/// readers must hold the guard from [`TileSource::lock_tiles`] while touching tile data.
pub trait TileSource {
    type Tiles<'a>: TileAccess
    where
        Self: 'a;

    /// Grid coordinate of the current viewpoint.
    fn current_grid_coordinate(&self) -> GridCoordinate;

    /// Whether the loader has finished every request for the current neighborhood.
    fn is_neighborhood_loaded(&self) -> bool;

    /// Number of tiles currently held, anywhere on the map.
    fn loaded_tile_count(&self) -> usize;

    /// Block until the neighborhood is loaded or `timeout` elapses.
    /// Returns whether the neighborhood is loaded.
    fn wait_for_neighborhood(&self, timeout: Duration) -> bool;

    /// Exclusive access to tile data. The loader cannot insert or free tiles until the
    /// guard is dropped.
    fn lock_tiles(&self) -> Self::Tiles<'_>;
}

impl<S: TileSource> TileSource for Arc<S> {
    type Tiles<'a>
        = S::Tiles<'a>
    where
        Self: 'a;

    fn current_grid_coordinate(&self) -> GridCoordinate {
        (**self).current_grid_coordinate()
    }

    fn is_neighborhood_loaded(&self) -> bool {
        (**self).is_neighborhood_loaded()
    }

    fn loaded_tile_count(&self) -> usize {
        (**self).loaded_tile_count()
    }

    fn wait_for_neighborhood(&self, timeout: Duration) -> bool {
        (**self).wait_for_neighborhood(timeout)
    }

    fn lock_tiles(&self) -> Self::Tiles<'_> {
        (**self).lock_tiles()
    }
}

/// Shared flag telling blocking waits that their owner is being torn down.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
