//! World scene: streams terrain around a moving viewpoint and falls back to the start
//! screen when no terrain can be shown.

use std::sync::Arc;

use engine_core::{CancelToken, GridCoordinate, TILE_SIZE};
use glam::Vec2;
use maps::{MapLoader, TileGenerator, TileStore};
use terrain::{world_to_surface, StreamState, StreamUpdate, TerrainError, TerrainStreamer};

use crate::config::WorldConfig;

/// Which scene the client shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Start screen; the fallback when the world cannot be drawn.
    GuiStart,
    /// The 3D world.
    World,
}

/// Scripted viewpoint flying a straight line over the terrain.
#[derive(Debug, Clone)]
pub struct Viewpoint {
    pub position: Vec2,
    pub height: f32,
    direction: Vec2,
    speed: f32,
}

impl Viewpoint {
    pub fn new(position: Vec2, heading_degrees: f32, speed: f32) -> Self {
        let heading = heading_degrees.to_radians();
        Self {
            position,
            height: 0.0,
            direction: Vec2::new(heading.cos(), heading.sin()),
            speed,
        }
    }

    pub fn advance(&mut self, timediff_ms: u32) {
        let seconds = timediff_ms as f32 / 1000.0;
        self.position += self.direction * self.speed * seconds;
    }
}

/// The world scene. Waits for tiles end when the owner cancels the token handed to
/// [`SceneWorld::new`]; dropping the scene stops the loader.
pub struct SceneWorld {
    terrain: TerrainStreamer<Arc<TileStore>>,
    cancel: CancelToken,
    viewpoint: Viewpoint,
    clearance: f32,
    loader: MapLoader,
}

impl SceneWorld {
    /// Build the scene and synthesize the first terrain. `loader` is `None` when the map
    /// subsystem is absent. Cancelling `cancel` from another thread ends any wait for tiles.
    pub fn new(
        config: &WorldConfig,
        loader: Option<MapLoader>,
        cancel: CancelToken,
    ) -> Result<Self, TerrainError> {
        log::debug!("SceneWorld: Initializing...");
        let Some(loader) = loader else {
            log::error!("SceneWorld: MapMgr not present, can't create world terrain");
            return Err(TerrainError::MapsUnavailable);
        };
        let terrain = TerrainStreamer::new(Some(Arc::clone(loader.store())), config.terrain.clone())?;

        let (x, y) = config.start;
        let mut scene = Self {
            terrain,
            cancel,
            viewpoint: Viewpoint::new(Vec2::new(x, y), config.heading_degrees, config.speed),
            clearance: config.clearance,
            loader,
        };
        scene.loader.update(scene.viewpoint.position);
        scene.update_terrain()?;
        log::debug!("SceneWorld: Init done!");
        Ok(scene)
    }

    /// Start the map loader described by `config`, or `None` when maps are disabled.
    pub fn spawn_loader(config: &WorldConfig) -> anyhow::Result<Option<MapLoader>> {
        if !config.maps_enabled {
            return Ok(None);
        }
        let (x, y) = config.start;
        let loader = MapLoader::spawn(
            Arc::new(TileStore::new()),
            TileGenerator::new(config.generator.clone()),
            config.loader.clone(),
            GridCoordinate::from_world(Vec2::new(x, y)),
        )?;
        Ok(Some(loader))
    }

    /// Advance one frame.
    pub fn on_update(&mut self, timediff_ms: u32) -> Result<(), TerrainError> {
        self.viewpoint.advance(timediff_ms);
        self.loader.update(self.viewpoint.position);
        self.update_terrain()
    }

    fn update_terrain(&mut self) -> Result<(), TerrainError> {
        match self.terrain.update(&self.cancel)? {
            StreamUpdate::Synthesized(report) => {
                log::info!(
                    "SceneWorld: terrain at grid {} ready ({} missing tiles, heights {:.1}..{:.1})",
                    report.coordinate,
                    report.missing_tiles.len(),
                    report.extent.lowest,
                    report.extent.highest
                );
            }
            StreamUpdate::Unchanged | StreamUpdate::Cancelled => {}
        }
        self.follow_ground();
        Ok(())
    }

    /// Keep the viewpoint `clearance` above the terrain under it.
    fn follow_ground(&mut self) {
        let (Some(center), StreamState::Ready) = (self.terrain.coordinate(), self.terrain.state()) else {
            return;
        };
        let surface = self.terrain.surface();
        let local = world_to_surface(center, self.viewpoint.position, surface.unit_size());
        self.viewpoint.height = surface.sample_height(local.x, local.y) + self.clearance;
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    pub fn terrain(&self) -> &TerrainStreamer<Arc<TileStore>> {
        &self.terrain
    }

    /// One-line status for the log.
    pub fn status_line(&self) -> String {
        let pos = self.viewpoint.position;
        let grid = GridCoordinate::from_world(pos);
        format!(
            "Camera: Pos: {:.1} | {:.1} | {:.1} (tile {:.2}, {:.2})  -- Terrain: grid {} {:?}",
            pos.x,
            pos.y,
            self.viewpoint.height,
            pos.x / TILE_SIZE,
            pos.y / TILE_SIZE,
            grid,
            self.terrain.state()
        )
    }
}

impl Drop for SceneWorld {
    fn drop(&mut self) {
        log::debug!("~SceneWorld()");
        self.cancel.cancel();
    }
}

/// Run the world scene for `config.frames` frames and return the scene state it ends in.
/// Cancelling `cancel` leaves the world at the next frame, or during a wait for tiles.
pub fn run_world(
    config: &WorldConfig,
    loader: Option<MapLoader>,
    clock: &mut engine_core::FrameClock,
    cancel: &CancelToken,
) -> SceneState {
    let mut scene = match SceneWorld::new(config, loader, cancel.clone()) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("SceneWorld: {}. Switching back GUI to idle.", e);
            return SceneState::GuiStart;
        }
    };

    for _ in 0..config.frames {
        if cancel.is_cancelled() {
            log::info!("SceneWorld: cancelled. Switching back GUI to idle.");
            return SceneState::GuiStart;
        }
        let timediff = clock.tick();
        if let Err(e) = scene.on_update(timediff) {
            log::error!("SceneWorld: {}. Switching back GUI to idle.", e);
            return SceneState::GuiStart;
        }
        if config.status_every > 0 && clock.frame_count() % config.status_every == 0 {
            log::info!("{}", scene.status_line());
        }
        if config.realtime {
            std::thread::sleep(std::time::Duration::from_millis(config.frame_ms));
        }
    }
    SceneState::World
}
