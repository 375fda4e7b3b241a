//! Worldview - streams procedurally generated map tiles around a scripted viewpoint
//! and keeps a 3×3-tile terrain surface synthesized under it.

mod config;
mod scene;

use std::time::Duration;

use anyhow::Result;
use engine_core::{CancelToken, FrameClock};

use config::WorldConfig;
use scene::{run_world, SceneState, SceneWorld};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config::config_path();
    let config = if path.exists() {
        WorldConfig::load(&path)
    } else {
        let config = WorldConfig::default();
        config.save(&path);
        log::info!("Wrote default config to {:?}", path);
        config
    };

    log::info!(
        "Starting Worldview at ({:.1}, {:.1}), {} frames",
        config.start.0,
        config.start.1,
        config.frames
    );

    let mut clock = if config.realtime {
        FrameClock::real()
    } else {
        FrameClock::fixed(Duration::from_millis(config.frame_ms))
    };

    let cancel = CancelToken::new();
    let loader = SceneWorld::spawn_loader(&config)?;
    let state = run_world(&config, loader, &mut clock, &cancel);
    match state {
        SceneState::World => log::info!(
            "Left the world after {} frames ({:.1} s)",
            clock.frame_count(),
            clock.elapsed_seconds()
        ),
        SceneState::GuiStart => log::info!("Back at the start screen"),
    }

    Ok(())
}
