use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use rift_core::dimension::Dimension;

pub const SCREEN_WIDTH: u32 = 400;
pub const SCREEN_HEIGHT: u32 = 230;
pub const TILE_SIZE: i32 = 16;

/// Knobs for building a level. Every field has a default so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    pub assets_root: PathBuf,
    pub map_name: String,
    pub asset_bundle: String,
    pub viewport: [u32; 2],
    /// Alpha units per 1/60 s.
    pub fade_speed: f32,
    /// Seconds the screen stays fully closed before a fade-out-in reopens.
    pub closed_pause: f32,
    /// Player top edge beyond this y is a fall-out death.
    pub fall_out_y: f32,
    pub unlocked_dimensions: Vec<Dimension>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            map_name: "dimension_one".to_string(),
            asset_bundle: "level".to_string(),
            viewport: [SCREEN_WIDTH, SCREEN_HEIGHT],
            fade_speed: 4.0,
            closed_pause: 0.0,
            fall_out_y: 2000.0,
            unlocked_dimensions: vec![Dimension::Parallel],
        }
    }
}

impl LevelConfig {
    pub fn map_path(&self) -> PathBuf {
        self.assets_root
            .join("maps")
            .join(format!("{}.json", self.map_name))
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.assets_root.join("settings")
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport[0], self.viewport[1])
    }
}

pub fn load_level_config(path: &Path) -> Result<LevelConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level config {}: {e}", path.display()))?;
    let config: LevelConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub(crate) fn validate_config(config: &LevelConfig) -> Result<(), String> {
    if config.viewport[0] == 0 || config.viewport[1] == 0 {
        return Err("Level config validation failed: viewport must be non-zero".to_string());
    }
    if config.fade_speed <= 0.0 {
        return Err("Level config validation failed: fade_speed must be > 0".to_string());
    }
    if !config.unlocked_dimensions.contains(&Dimension::Parallel) {
        return Err(
            "Level config validation failed: unlocked_dimensions must include dimension_one"
                .to_string(),
        );
    }
    Ok(())
}
