//! Named asset bundles.
//!
//! A bundle is a JSON manifest mapping asset keys (`"dave_walk"`, `"portal"`,
//! `"dimension_one"`, ...) to sprite-sheet descriptions. Decoding the image
//! files themselves is left to whatever backend consumes the draw list; the
//! level only needs sheet geometry and animation timing.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec2;

use crate::animation::AnimationClip;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpriteAsset {
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub looping: bool,
}

impl SpriteAsset {
    /// Single-frame sheet, handy for fixtures and static props.
    pub fn still(path: &str, frame_width: u32, frame_height: u32) -> Self {
        Self {
            path: path.to_string(),
            frame_width,
            frame_height,
            frames: 1,
            frame_ms: default_frame_ms(),
            looping: false,
        }
    }

    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.frame_width as f32, self.frame_height as f32)
    }

    pub fn clip(&self) -> AnimationClip {
        AnimationClip::uniform(self.frames, self.frame_ms, self.looping)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetBundle {
    pub version: String,
    pub bundle_id: String,
    #[serde(default)]
    pub sprites: HashMap<String, SpriteAsset>,
}

impl AssetBundle {
    pub fn new(bundle_id: &str) -> Self {
        Self {
            version: "0.1".to_string(),
            bundle_id: bundle_id.to_string(),
            sprites: HashMap::new(),
        }
    }

    pub fn with_sprite(mut self, key: &str, sprite: SpriteAsset) -> Self {
        self.sprites.insert(key.to_string(), sprite);
        self
    }

    /// Look up an asset. A missing key is a content error.
    pub fn get(&self, key: &str) -> Result<&SpriteAsset, String> {
        self.sprites.get(key).ok_or_else(|| {
            format!(
                "Asset bundle '{}' has no asset named '{}'",
                self.bundle_id, key
            )
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sprites.contains_key(key)
    }
}

/// Load `<root>/bundles/<bundle>.json`.
pub fn load_asset_bundle(root: &Path, bundle: &str) -> Result<AssetBundle, String> {
    let path = root.join("bundles").join(format!("{bundle}.json"));
    let raw = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read asset bundle {}: {e}", path.display()))?;
    let parsed: AssetBundle = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse asset bundle JSON {}: {e}", path.display()))?;
    validate_bundle(&parsed)?;
    log::debug!(
        "Loaded asset bundle '{}' ({} sprites)",
        parsed.bundle_id,
        parsed.sprites.len()
    );
    Ok(parsed)
}

fn validate_bundle(bundle: &AssetBundle) -> Result<(), String> {
    if bundle.version != "0.1" {
        return Err(format!(
            "Asset bundle validation failed: unsupported version '{}'",
            bundle.version
        ));
    }
    if bundle.sprites.is_empty() {
        log::warn!("Asset bundle '{}' declares no sprites", bundle.bundle_id);
    }
    for (key, sprite) in &bundle.sprites {
        if sprite.frame_width == 0 || sprite.frame_height == 0 {
            return Err(format!(
                "Asset bundle validation failed: '{}' has a zero frame size",
                key
            ));
        }
        if sprite.frames == 0 {
            return Err(format!(
                "Asset bundle validation failed: '{}' has no frames",
                key
            ));
        }
        if sprite.frame_ms == 0 {
            return Err(format!(
                "Asset bundle validation failed: '{}' has zero frame duration",
                key
            ));
        }
    }
    Ok(())
}

const fn default_frames() -> usize {
    1
}

const fn default_frame_ms() -> u64 {
    100
}
