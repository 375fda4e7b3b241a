//! Terrain lifecycle under viewpoint movement.
//!
//! Every frame the streamer compares the viewpoint's grid coordinate with the last
//! synthesized one. On a change it waits for the loader to finish the new neighborhood,
//! then runs heights → colors → normals in one pass while holding the tile lock for the
//! copy. The surface is only reachable through `&self` between `update` calls, so the
//! renderer never sees a half-finished pass.

use std::time::{Duration, Instant};

use engine_core::{CancelToken, GridCoordinate, TileSource, UNIT_SIZE};
use serde::{Deserialize, Serialize};

use crate::colorize::{colorize, Extent, COLOR_EPSILON};
use crate::error::TerrainError;
use crate::heightmap::synthesize_heights;
use crate::normals::smooth_normals;
use crate::surface::TerrainSurface;
use crate::tracker::GridTracker;

/// Configuration for terrain streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Distance between surface vertices in world units.
    pub unit_size: f32,
    /// `highest` at or below this colors the surface neutral.
    pub color_epsilon: f32,
    /// Longest single wait for the loader before checking for cancellation, in ms.
    pub wait_slice_ms: u64,
    /// Give up waiting for a complete neighborhood after this long and synthesize from
    /// whatever is loaded. `None` waits until loaded or cancelled.
    pub load_timeout_ms: Option<u64>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            unit_size: UNIT_SIZE,
            color_epsilon: COLOR_EPSILON,
            wait_slice_ms: 50,
            load_timeout_ms: None,
        }
    }
}

/// Streaming state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No terrain available: before the first pass, after a cancelled wait, or after
    /// the loader reported no maps at all.
    Idle,
    /// Coordinate changed; waiting for the loader.
    Loading,
    /// Holding tile access and rebuilding the surface.
    Synthesizing,
    /// Surface is complete and usable until the next coordinate change.
    Ready,
}

/// Result of one synthesis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisReport {
    pub coordinate: GridCoordinate,
    /// Neighborhood tiles that were not loaded; their regions hold stale heights.
    pub missing_tiles: Vec<GridCoordinate>,
    pub extent: Extent,
    /// The extent was flat or below zero and the neutral color was used.
    pub degenerate: bool,
}

/// What a call to [`TerrainStreamer::update`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    /// Same grid coordinate as last time; nothing to do.
    Unchanged,
    /// The surface was rebuilt.
    Synthesized(SynthesisReport),
    /// The wait for tiles was cancelled; no tile or surface data was touched.
    Cancelled,
}

enum WaitOutcome {
    Loaded,
    TimedOut,
    Cancelled,
}

/// Owns the terrain surface and rebuilds it from a [`TileSource`] as the viewpoint moves.
pub struct TerrainStreamer<S: TileSource> {
    source: S,
    config: TerrainConfig,
    tracker: GridTracker,
    surface: TerrainSurface,
    state: StreamState,
}

impl<S: TileSource> TerrainStreamer<S> {
    /// Create the streamer. Fails when there is no map subsystem to stream from.
    pub fn new(source: Option<S>, config: TerrainConfig) -> Result<Self, TerrainError> {
        let Some(source) = source else {
            log::error!("Terrain: MapMgr not present, can't create world terrain");
            return Err(TerrainError::MapsUnavailable);
        };
        Ok(Self {
            surface: TerrainSurface::new(config.unit_size),
            source,
            config,
            tracker: GridTracker::new(),
            state: StreamState::Idle,
        })
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn surface(&self) -> &TerrainSurface {
        &self.surface
    }

    /// Grid coordinate of the last pass, if any.
    pub fn coordinate(&self) -> Option<GridCoordinate> {
        self.tracker.last()
    }

    fn transition(&mut self, next: StreamState) {
        if self.state != next {
            log::debug!("Terrain: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Per-frame entry point. Rebuilds the surface when the grid coordinate changed.
    ///
    /// Returns `Err(NoMapsLoaded)` once when loading finishes with zero tiles; the scene
    /// should fall back to its idle state. Later calls at the same coordinate are no-ops.
    pub fn update(&mut self, cancel: &CancelToken) -> Result<StreamUpdate, TerrainError> {
        let mut coordinate = self.source.current_grid_coordinate();
        if !self.tracker.observe(coordinate) {
            return Ok(StreamUpdate::Unchanged);
        }
        self.transition(StreamState::Loading);

        // Follow the center if another thread moved it during the wait.
        loop {
            match self.wait_for_tiles(cancel) {
                WaitOutcome::Loaded => {}
                WaitOutcome::TimedOut => log::warn!(
                    "Terrain: neighborhood of grid {} still loading, using the tiles available",
                    coordinate
                ),
                WaitOutcome::Cancelled => {
                    log::debug!("Terrain: wait for grid {} cancelled", coordinate);
                    self.tracker.reset();
                    self.transition(StreamState::Idle);
                    return Ok(StreamUpdate::Cancelled);
                }
            }
            let latest = self.source.current_grid_coordinate();
            if latest == coordinate {
                break;
            }
            log::debug!("Terrain: center moved from {} to {} while loading", coordinate, latest);
            self.tracker.observe(latest);
            coordinate = latest;
        }

        if self.source.loaded_tile_count() == 0 {
            log::error!("Terrain: No maps loaded, not able to draw any terrain. Switching back to idle.");
            log::error!(
                "Terrain: Hint: Be sure you are not in a WMO-only world (e.g. a capital city or most instances)!"
            );
            self.transition(StreamState::Idle);
            return Err(TerrainError::NoMapsLoaded { coordinate });
        }

        self.transition(StreamState::Synthesizing);
        let report = self.synthesize(coordinate);
        self.transition(StreamState::Ready);
        Ok(StreamUpdate::Synthesized(report))
    }

    fn wait_for_tiles(&self, cancel: &CancelToken) -> WaitOutcome {
        if self.source.is_neighborhood_loaded() {
            return WaitOutcome::Loaded;
        }
        log::debug!("Terrain: Waiting until maps are loaded...");
        let slice = Duration::from_millis(self.config.wait_slice_ms.max(1));
        let deadline = self
            .config
            .load_timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        loop {
            if cancel.is_cancelled() {
                return WaitOutcome::Cancelled;
            }
            let wait = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return WaitOutcome::TimedOut;
                    }
                    left.min(slice)
                }
                None => slice,
            };
            if self.source.wait_for_neighborhood(wait) {
                return WaitOutcome::Loaded;
            }
        }
    }

    fn synthesize(&mut self, coordinate: GridCoordinate) -> SynthesisReport {
        log::debug!("Terrain: Displaying MapTiles near grid {}", coordinate);
        let missing_tiles = {
            let tiles = self.source.lock_tiles();
            synthesize_heights(&mut self.surface, &tiles, coordinate)
        };

        let colors = colorize(&mut self.surface, self.config.color_epsilon);

        log::debug!("Terrain: Smoothing terrain normals...");
        smooth_normals(&mut self.surface);

        SynthesisReport {
            coordinate,
            missing_tiles,
            extent: colors.extent,
            degenerate: colors.degenerate,
        }
    }
}
