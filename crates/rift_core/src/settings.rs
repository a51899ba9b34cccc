//! Per-dimension gameplay settings.
//!
//! Each dimension ships one JSON file (`<settings_dir>/<dimension value>.json`).
//! The level loads all of them up front and hands the active one to the
//! player and every enemy whenever the current dimension changes.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::dimension::Dimension;

/// Movement tuning for the player. Velocities are pixels per second with y
/// pointing down, so `gravity` is positive and a jump sets `-jump_speed`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    pub max_speed: f32,
    pub accel_ground: f32,
    pub accel_air: f32,
    pub friction_ground: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_speed: 110.0,
            accel_ground: 900.0,
            accel_air: 520.0,
            friction_ground: 1100.0,
            gravity: 900.0,
            max_fall_speed: 420.0,
            jump_speed: 300.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EnemySettings {
    pub moving_wall_speed: f32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            moving_wall_speed: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DimensionSettings {
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub enemy: EnemySettings,
    #[serde(default = "default_background")]
    pub background_color: [u8; 3],
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self {
            player: PlayerSettings::default(),
            enemy: EnemySettings::default(),
            background_color: default_background(),
        }
    }
}

pub fn load_settings(path: &Path) -> Result<DimensionSettings, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read settings {}: {e}", path.display()))?;
    let settings: DimensionSettings = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse settings JSON {}: {e}", path.display()))?;
    validate_settings(&settings)
        .map_err(|e| format!("{e} ({})", path.display()))?;
    Ok(settings)
}

/// Load the settings file of every declared dimension from `dir`.
pub fn load_dimension_settings(dir: &Path) -> Result<HashMap<Dimension, DimensionSettings>, String> {
    let mut out = HashMap::new();
    for &dimension in Dimension::ALL {
        let path = dir.join(format!("{}.json", dimension.value()));
        out.insert(dimension, load_settings(&path)?);
    }
    Ok(out)
}

fn validate_settings(settings: &DimensionSettings) -> Result<(), String> {
    let player = &settings.player;
    if player.max_speed <= 0.0 {
        return Err("Settings validation failed: player.max_speed must be > 0".to_string());
    }
    if player.gravity <= 0.0 || player.max_fall_speed <= 0.0 {
        return Err(
            "Settings validation failed: player.gravity and player.max_fall_speed must be > 0"
                .to_string(),
        );
    }
    if player.jump_speed < 0.0 {
        return Err("Settings validation failed: player.jump_speed must be >= 0".to_string());
    }
    if settings.enemy.moving_wall_speed < 0.0 {
        return Err(
            "Settings validation failed: enemy.moving_wall_speed must be >= 0".to_string(),
        );
    }
    Ok(())
}

const fn default_background() -> [u8; 3] {
    [21, 18, 34]
}
