//! World viewer configuration (viewpoint path, map loading, terrain). Loaded from world.ron at startup.

use maps::{GeneratorConfig, LoaderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use terrain::TerrainConfig;

/// Persistent viewer settings. Loaded from `world.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Start position in world units (x, y).
    #[serde(default = "default_start")]
    pub start: (f32, f32),
    /// Heading of the scripted flight in degrees (0 = +x).
    #[serde(default)]
    pub heading_degrees: f32,
    /// Flight speed in world units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Height kept above the terrain surface.
    #[serde(default = "default_clearance")]
    pub clearance: f32,
    /// Number of frames to run before leaving the world.
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Frame step in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Run on the wall clock, sleeping `frame_ms` between frames, instead of a fixed step.
    #[serde(default)]
    pub realtime: bool,
    /// Log a status line every this many frames (0 = never).
    #[serde(default = "default_status_every")]
    pub status_every: u64,
    /// Whether the map subsystem is present. Off reproduces a client without map data.
    #[serde(default = "default_true")]
    pub maps_enabled: bool,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

fn default_start() -> (f32, f32) {
    (-100.0, -100.0)
}
fn default_speed() -> f32 {
    400.0
}
fn default_clearance() -> f32 {
    10.0
}
fn default_frames() -> u64 {
    600
}
fn default_frame_ms() -> u64 {
    16
}
fn default_status_every() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            heading_degrees: 0.0,
            speed: default_speed(),
            clearance: default_clearance(),
            frames: default_frames(),
            frame_ms: default_frame_ms(),
            realtime: false,
            status_every: default_status_every(),
            maps_enabled: default_true(),
            terrain: TerrainConfig::default(),
            loader: LoaderConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("world.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = WorldConfig::parse("()").unwrap();
        assert_eq!(c.frames, 600);
        assert_eq!(c.speed, 400.0);
        assert!(c.maps_enabled);
        assert_eq!(c.terrain.wait_slice_ms, TerrainConfig::default().wait_slice_ms);
    }

    #[test]
    fn nested_sections_override_fields() {
        let c = WorldConfig::parse(
            "(frames: 12, maps_enabled: false, generator: (seed: 7, holes: [(31, 32)]), terrain: (load_timeout_ms: Some(250)))",
        )
        .unwrap();
        assert_eq!(c.frames, 12);
        assert!(!c.maps_enabled);
        assert_eq!(c.generator.seed, 7);
        assert_eq!(c.generator.holes, vec![(31, 32)]);
        assert_eq!(c.generator.height_scale, GeneratorConfig::default().height_scale);
        assert_eq!(c.terrain.load_timeout_ms, Some(250));
    }

    #[test]
    fn invalid_config_is_an_error() {
        assert!(WorldConfig::parse("(frames: \"many\")").is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("worldview-config-{}.ron", std::process::id()));
        let config = WorldConfig {
            frames: 42,
            ..Default::default()
        };
        config.save(&path);
        let loaded = WorldConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.frames, 42);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let c = WorldConfig::load(Path::new("/nonexistent/world.ron"));
        assert_eq!(c.frames, default_frames());
    }
}
