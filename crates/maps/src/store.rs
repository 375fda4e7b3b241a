//! Loaded tiles shared between the loader thread and the terrain.
//!
//! A single mutex covers every tile: the loader inserts and frees tiles under it,
//! readers copy tile data under it. A condvar signals when the current neighborhood
//! has no outstanding requests left.

use std::collections::{HashMap, HashSet};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use engine_core::{GridCoordinate, Tile, TileAccess, TileSource};

#[derive(Debug, Default)]
struct StoreState {
    tiles: HashMap<GridCoordinate, Box<Tile>>,
    /// Grid coordinate of the current viewpoint.
    center: GridCoordinate,
    /// Neighborhood tiles requested from the loader and not yet finished.
    pending: HashSet<GridCoordinate>,
}

/// Tile store implementing [`TileSource`].
#[derive(Debug, Default)]
pub struct TileStore {
    state: Mutex<StoreState>,
    loaded: Condvar,
}

/// Exclusive view of the store handed out by [`TileStore::lock_tiles`].
pub struct TileGuard<'a>(MutexGuard<'a, StoreState>);

impl TileAccess for TileGuard<'_> {
    fn get_tile(&self, coord: GridCoordinate) -> Option<&Tile> {
        self.0.tiles.get(&coord).map(|tile| &**tile)
    }
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single insert/remove, so a poisoned lock still guards consistent data.
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current center coordinate.
    pub fn center(&self) -> GridCoordinate {
        self.lock_state().center
    }

    /// Move the center to `center` and mark every neighborhood tile not yet held as pending.
    /// Returns the coordinates the loader has to fetch.
    pub fn begin_neighborhood(&self, center: GridCoordinate) -> Vec<GridCoordinate> {
        let mut state = self.lock_state();
        state.center = center;
        let missing: Vec<GridCoordinate> = center
            .neighborhood()
            .filter(|coord| !state.tiles.contains_key(coord))
            .collect();
        state.pending = missing.iter().copied().collect();
        if state.pending.is_empty() {
            self.loaded.notify_all();
        }
        missing
    }

    /// Complete the request for `coord`. `None` means the tile could not be loaded.
    /// Tiles that left the neighborhood while loading are dropped.
    pub fn finish(&self, coord: GridCoordinate, tile: Option<Tile>) {
        let mut state = self.lock_state();
        if let Some(tile) = tile {
            if state.center.is_neighbor_of(coord) {
                state.tiles.insert(coord, Box::new(tile));
            }
        }
        state.pending.remove(&coord);
        if state.pending.is_empty() {
            self.loaded.notify_all();
        }
    }

    /// Insert a tile directly, bypassing the request bookkeeping.
    pub fn insert(&self, tile: Tile) {
        self.lock_state().tiles.insert(tile.coordinate, Box::new(tile));
    }

    /// Free the tile at `coord`.
    pub fn remove(&self, coord: GridCoordinate) -> Option<Box<Tile>> {
        self.lock_state().tiles.remove(&coord)
    }

    /// Free every tile outside the current neighborhood. Returns how many were freed.
    pub fn evict_outside(&self) -> usize {
        let mut state = self.lock_state();
        let center = state.center;
        let before = state.tiles.len();
        state.tiles.retain(|&coord, _| center.is_neighbor_of(coord));
        before - state.tiles.len()
    }
}

impl TileSource for TileStore {
    type Tiles<'a>
        = TileGuard<'a>
    where
        Self: 'a;

    fn current_grid_coordinate(&self) -> GridCoordinate {
        self.center()
    }

    fn is_neighborhood_loaded(&self) -> bool {
        self.lock_state().pending.is_empty()
    }

    fn loaded_tile_count(&self) -> usize {
        self.lock_state().tiles.len()
    }

    fn wait_for_neighborhood(&self, timeout: Duration) -> bool {
        let state = self.lock_state();
        let (state, _) = self
            .loaded
            .wait_timeout_while(state, timeout, |s| !s.pending.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        state.pending.is_empty()
    }

    fn lock_tiles(&self) -> TileGuard<'_> {
        TileGuard(self.lock_state())
    }
}
