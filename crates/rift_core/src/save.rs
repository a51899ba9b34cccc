//! Persisted save state and the handle the level receives at construction.
//!
//! The level touches the store at two points only: it reads
//! `latest_checkpoint` when it is built and writes it back when the player
//! dies. The SFX icon reads `last_volume` on init and writes it when the
//! player lets go of the volume slider.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub latest_checkpoint: Option<[f32; 2]>,
    #[serde(default = "default_volume")]
    pub last_volume: f32,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            latest_checkpoint: None,
            last_volume: default_volume(),
        }
    }
}

/// Shared, single-threaded handle to the save store. Clones point at the same data.
#[derive(Debug, Clone, Default)]
pub struct SaveHandle(Rc<RefCell<SaveData>>);

impl SaveHandle {
    pub fn new(data: SaveData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    pub fn latest_checkpoint(&self) -> Option<Vec2> {
        self.0.borrow().latest_checkpoint.map(Vec2::from)
    }

    pub fn set_latest_checkpoint(&self, pos: Vec2) {
        self.0.borrow_mut().latest_checkpoint = Some(pos.to_array());
    }

    /// Volume in `0.0..=1.0`.
    pub fn last_volume(&self) -> f32 {
        self.0.borrow().last_volume.clamp(0.0, 1.0)
    }

    pub fn set_last_volume(&self, volume: f32) {
        self.0.borrow_mut().last_volume = volume.clamp(0.0, 1.0);
    }

    pub fn snapshot(&self) -> SaveData {
        self.0.borrow().clone()
    }
}

/// Read save data from `path`. A missing file yields defaults.
pub fn load_save(path: &Path) -> Result<SaveData, String> {
    if !path.exists() {
        log::info!("No save file at {}, starting fresh", path.display());
        return Ok(SaveData::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read save {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse save JSON {}: {e}", path.display()))
}

pub fn write_save(path: &Path, data: &SaveData) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to encode save data: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write save {}: {e}", path.display()))
}

const fn default_volume() -> f32 {
    0.5
}
