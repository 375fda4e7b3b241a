//! Background map loader.
//!
//! The viewpoint thread reports its position; when the grid coordinate changes the
//! loader thread frees tiles that left the neighborhood and loads the ones that entered
//! it, one at a time, publishing each through the [`TileStore`].

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use engine_core::{GridCoordinate, Vec2};
use serde::{Deserialize, Serialize};

use crate::generator::TileGenerator;
use crate::store::TileStore;

/// Loader thread settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Simulated read time per tile in milliseconds.
    pub tile_load_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { tile_load_ms: 5 }
    }
}

enum LoaderCommand {
    Load {
        center: GridCoordinate,
        coords: Vec<GridCoordinate>,
    },
    Shutdown,
}

/// Owns the loader thread. Dropping it stops and joins the thread.
pub struct MapLoader {
    store: Arc<TileStore>,
    commands: Sender<LoaderCommand>,
    worker: Option<JoinHandle<()>>,
}

impl MapLoader {
    /// Start the loader thread and request the neighborhood around `start`.
    pub fn spawn(
        store: Arc<TileStore>,
        generator: TileGenerator,
        config: LoaderConfig,
        start: GridCoordinate,
    ) -> Result<Self> {
        let (commands, rx) = mpsc::channel();
        let worker = {
            let store = Arc::clone(&store);
            let delay = Duration::from_millis(config.tile_load_ms);
            thread::Builder::new()
                .name("map-loader".into())
                .spawn(move || run_loader(&store, &generator, &rx, delay))?
        };
        let loader = Self {
            store,
            commands,
            worker: Some(worker),
        };
        loader.request(start);
        Ok(loader)
    }

    pub fn store(&self) -> &Arc<TileStore> {
        &self.store
    }

    /// Report the viewpoint position; requests a new neighborhood when the grid changes.
    pub fn update(&self, position: Vec2) {
        let coord = GridCoordinate::from_world(position);
        if coord != self.store.center() {
            self.request(coord);
        }
    }

    /// Make `center` the current grid and queue its missing tiles.
    pub fn request(&self, center: GridCoordinate) {
        let coords = self.store.begin_neighborhood(center);
        log::debug!("MapLoader: grid {} needs {} tiles", center, coords.len());
        if let Err(mpsc::SendError(command)) = self.commands.send(LoaderCommand::Load { center, coords }) {
            log::error!("MapLoader: loader thread is gone, grid {} will not load", center);
            // Release the pending marks so waiters see the neighborhood as finished.
            if let LoaderCommand::Load { coords, .. } = command {
                for coord in coords {
                    self.store.finish(coord, None);
                }
            }
        }
    }
}

impl Drop for MapLoader {
    fn drop(&mut self) {
        let _ = self.commands.send(LoaderCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("MapLoader: loader thread panicked");
            }
        }
    }
}

fn run_loader(
    store: &TileStore,
    generator: &TileGenerator,
    rx: &Receiver<LoaderCommand>,
    delay: Duration,
) {
    log::debug!("MapLoader: thread started");
    let mut next = rx.recv().ok();
    while let Some(command) = next.take() {
        let (center, coords) = match newest(command, rx) {
            LoaderCommand::Shutdown => break,
            LoaderCommand::Load { center, coords } => (center, coords),
        };

        let evicted = store.evict_outside();
        if evicted > 0 {
            log::debug!("MapLoader: freed {} tiles outside grid {}", evicted, center);
        }

        for coord in coords {
            // The simulated read time doubles as the check for newer commands.
            let interrupted = if delay.is_zero() {
                rx.try_recv().map_err(|e| e == TryRecvError::Disconnected)
            } else {
                rx.recv_timeout(delay).map_err(|e| e == RecvTimeoutError::Disconnected)
            };
            match interrupted {
                Ok(command) => {
                    log::debug!("MapLoader: grid {} superseded", center);
                    next = Some(command);
                    break;
                }
                Err(true) => {
                    next = None;
                    break;
                }
                Err(false) => {}
            }

            let tile = generator.generate(coord);
            match &tile {
                Some(_) => log::debug!("MapLoader: loaded tile {}", coord),
                None => log::debug!("MapLoader: no tile data for {}", coord),
            }
            store.finish(coord, tile);
        }

        if next.is_none() {
            next = rx.recv().ok();
        }
    }
    log::debug!("MapLoader: thread stopped");
}

/// Skip to the newest queued command; requests it replaces were superseded by
/// `begin_neighborhood`. A shutdown is never skipped.
fn newest(mut command: LoaderCommand, rx: &Receiver<LoaderCommand>) -> LoaderCommand {
    while !matches!(command, LoaderCommand::Shutdown) {
        match rx.try_recv() {
            Ok(next) => command = next,
            Err(_) => break,
        }
    }
    command
}
