//! Game configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file.
//! Provides defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [map]
//! size = 15
//!
//! [player]
//! start_x = 7
//! start_y = 7
//! move_speed = 2
//! collider_shrink = 0.75
//! muzzle_offset = 0.3
//!
//! [bullet]
//! speed = 9
//!
//! [camera]
//! x = 7
//! y = 7
//! z = 15
//! fov = 45
//!
//! [assets]
//! root = ./assets
//!
//! [simulation]
//! time_scale = 1
//! fixed_delta = 0
//! target_fps = 60
//! ```
//!
//! A `fixed_delta` of 0 means frames are timed with the wall clock.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;
use std::path::PathBuf;

use crate::entities::arena::DEFAULT_ARENA_SIZE;
use crate::entities::playertank::PlayerTuning;
use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_PLAYER_START: (f32, f32) = (7.0, 7.0);
const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(7.0, 7.0, 15.0);
const DEFAULT_CAMERA_FOV: f32 = 45.0;
const DEFAULT_ASSETS_ROOT: &str = "./assets";
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores the arena size, player tuning, camera placement and timing
/// options. Values missing from the file keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Tiles per arena side.
    pub map_size: u32,
    /// Player spawn point on the ground plane.
    pub player_start: (f32, f32),
    pub player: PlayerTuning,
    pub camera_position: Vec3,
    /// Vertical field of view in degrees.
    pub camera_fov: f32,
    pub assets_root: PathBuf,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Seconds per frame; `None` uses the wall clock.
    pub fixed_delta: Option<f32>,
    /// Frame pacing for the demo binary.
    pub target_fps: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            map_size: DEFAULT_ARENA_SIZE,
            player_start: DEFAULT_PLAYER_START,
            player: PlayerTuning::default(),
            camera_position: DEFAULT_CAMERA_POSITION,
            camera_fov: DEFAULT_CAMERA_FOV,
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            time_scale: DEFAULT_TIME_SCALE,
            fixed_delta: None,
            target_fps: DEFAULT_TARGET_FPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn player_start_position(&self) -> Vec3 {
        Vec3::new(self.player_start.0, self.player_start.1, 0.0)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|message| ConfigError::Read {
            path: self.config_path.clone(),
            message,
        })?;

        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [map] section
        if let Some(size) = config.getuint("map", "size").ok().flatten() {
            self.map_size = size as u32;
        }

        // [player] section
        if let Some(x) = float("player", "start_x") {
            self.player_start.0 = x;
        }
        if let Some(y) = float("player", "start_y") {
            self.player_start.1 = y;
        }
        if let Some(speed) = float("player", "move_speed") {
            self.player.move_speed = speed;
        }
        if let Some(shrink) = float("player", "collider_shrink") {
            self.player.collider_shrink = shrink;
        }
        if let Some(offset) = float("player", "muzzle_offset") {
            self.player.muzzle_offset = offset;
        }

        // [bullet] section
        if let Some(speed) = float("bullet", "speed") {
            self.player.bullet_speed = speed;
        }

        // [camera] section
        if let Some(x) = float("camera", "x") {
            self.camera_position.x = x;
        }
        if let Some(y) = float("camera", "y") {
            self.camera_position.y = y;
        }
        if let Some(z) = float("camera", "z") {
            self.camera_position.z = z;
        }
        if let Some(fov) = float("camera", "fov") {
            self.camera_fov = fov;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.assets_root = PathBuf::from(root);
        }

        // [simulation] section
        if let Some(scale) = float("simulation", "time_scale") {
            self.time_scale = scale;
        }
        if let Some(delta) = float("simulation", "fixed_delta") {
            self.fixed_delta = (delta > 0.0).then_some(delta);
        }
        if let Some(fps) = config.getuint("simulation", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        info!(
            "Loaded config: map {}x{}, player at {:?}, assets {:?}, time_scale={}, fixed_delta={:?}",
            self.map_size,
            self.map_size,
            self.player_start,
            self.assets_root,
            self.time_scale,
            self.fixed_delta
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [map] section
        config.set("map", "size", Some(self.map_size.to_string()));

        // [player] section
        config.set("player", "start_x", Some(self.player_start.0.to_string()));
        config.set("player", "start_y", Some(self.player_start.1.to_string()));
        config.set("player", "move_speed", Some(self.player.move_speed.to_string()));
        config.set(
            "player",
            "collider_shrink",
            Some(self.player.collider_shrink.to_string()),
        );
        config.set(
            "player",
            "muzzle_offset",
            Some(self.player.muzzle_offset.to_string()),
        );

        // [bullet] section
        config.set("bullet", "speed", Some(self.player.bullet_speed.to_string()));

        // [camera] section
        config.set("camera", "x", Some(self.camera_position.x.to_string()));
        config.set("camera", "y", Some(self.camera_position.y.to_string()));
        config.set("camera", "z", Some(self.camera_position.z.to_string()));
        config.set("camera", "fov", Some(self.camera_fov.to_string()));

        // [assets] section
        config.set(
            "assets",
            "root",
            Some(self.assets_root.to_string_lossy().into_owned()),
        );

        // [simulation] section
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set(
            "simulation",
            "fixed_delta",
            Some(self.fixed_delta.unwrap_or(0.0).to_string()),
        );
        config.set("simulation", "target_fps", Some(self.target_fps.to_string()));

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Write {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
