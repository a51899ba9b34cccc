use glam::Vec2;

use rift_core::animation::{seconds_to_us, AnimationClip, AnimationState};
use rift_core::assets::SpriteAsset;
use rift_core::geom::Rect;
use rift_render::{Camera, DrawList};

pub const EXPLOSION_ASSET: &str = "fire";

#[derive(Debug, Clone)]
struct Explosion {
    center: Vec2,
    anim: AnimationState,
}

/// One-shot sprite animations that remove themselves once their clip ends.
#[derive(Debug, Clone, Default)]
pub struct ExplosionManager {
    asset: String,
    frame_size: Vec2,
    clip: AnimationClip,
    explosions: Vec<Explosion>,
}

impl ExplosionManager {
    pub fn new(asset: &str, sprite: &SpriteAsset) -> Self {
        Self {
            asset: asset.to_string(),
            frame_size: sprite.frame_size(),
            clip: AnimationClip {
                looping: false,
                ..sprite.clip()
            },
            explosions: Vec::new(),
        }
    }

    pub fn spawn(&mut self, center: Vec2) {
        self.explosions.push(Explosion {
            center,
            anim: AnimationState::new(),
        });
    }

    pub fn update(&mut self, dt: f32) {
        let dt_us = seconds_to_us(dt);
        for explosion in &mut self.explosions {
            explosion.anim.tick(dt_us, &self.clip);
        }
        self.explosions.retain(|e| !e.anim.finished);
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        for explosion in &self.explosions {
            let dest = Rect::from_center(explosion.center, self.frame_size.x, self.frame_size.y);
            surface.sprite(
                &self.asset,
                explosion.anim.current(&self.clip),
                camera.apply_rect(dest),
                false,
                255,
            );
        }
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }
}
