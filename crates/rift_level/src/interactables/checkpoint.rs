use glam::Vec2;

use rift_core::geom::Rect;
use rift_render::{Camera, DrawList};

use crate::effects::{Particle, ParticleManager};
use crate::tilemap::MapObject;

pub const CHECKPOINT_ASSET: &str = "checkpoint";

/// One-shot respawn anchor. The first overlap captures it for good.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub rect: Rect,
    text_spawned: bool,
}

impl Checkpoint {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            text_spawned: false,
        }
    }

    pub fn from_object(obj: &MapObject) -> Self {
        Self::new(obj.rect())
    }

    /// Where the player respawns after capturing this checkpoint.
    pub fn anchor(&self) -> Vec2 {
        self.rect.midbottom()
    }

    pub fn is_spent(&self) -> bool {
        self.text_spawned
    }

    /// Returns true on the update the checkpoint is captured.
    pub fn update(&mut self, player_rect: Rect, particles: &mut ParticleManager) -> bool {
        if self.text_spawned || !self.rect.colliderect(&player_rect) {
            return false;
        }
        self.text_spawned = true;
        particles.add(Particle::text(
            "Checkpoint!",
            self.rect.center() - Vec2::new(0.0, self.rect.h),
            Vec2::new(0.0, -1.0),
            3.0,
            80,
        ));
        true
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        let frame = usize::from(self.text_spawned);
        surface.sprite(CHECKPOINT_ASSET, frame, camera.apply_rect(self.rect), false, 255);
    }
}
