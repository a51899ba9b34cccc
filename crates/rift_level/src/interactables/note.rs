use glam::Vec2;

use rift_core::assets::SpriteAsset;
use rift_core::geom::Rect;
use rift_render::{alpha_u8, Camera, DrawList, TEXT_COLOR};

use crate::tilemap::MapObject;

pub const NOTE_ASSET: &str = "note";
/// How far around the note the player can stand and still read it.
const READ_MARGIN: f32 = 24.0;
/// Alpha units per second.
const TEXT_FADE_SPEED: f32 = 600.0;
const TEXT_SIZE: u32 = 8;

/// A sign in the world whose text fades in while the player is near.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub rect: Rect,
    pub text: String,
    revealed: bool,
    text_alpha: f32,
}

impl Note {
    pub fn new(pos: Vec2, sprite: &SpriteAsset, text: &str) -> Self {
        let size = sprite.frame_size();
        Self {
            rect: Rect::new(pos.x, pos.y, size.x, size.y),
            text: text.to_string(),
            revealed: false,
            text_alpha: 0.0,
        }
    }

    pub fn from_object(obj: &MapObject, sprite: &SpriteAsset) -> Result<Self, String> {
        let text = obj.property("text").ok_or_else(|| {
            format!(
                "Note at ({}, {}) has no 'text' property",
                obj.x, obj.y
            )
        })?;
        Ok(Self::new(Vec2::new(obj.x, obj.y), sprite, text))
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn text_alpha(&self) -> f32 {
        self.text_alpha
    }

    pub fn update(&mut self, dt: f32, player_rect: Rect) {
        self.revealed = self
            .rect
            .inflate(READ_MARGIN, READ_MARGIN)
            .colliderect(&player_rect);
        let step = TEXT_FADE_SPEED * dt;
        self.text_alpha = if self.revealed {
            (self.text_alpha + step).min(255.0)
        } else {
            (self.text_alpha - step).max(0.0)
        };
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        surface.sprite(NOTE_ASSET, 0, camera.apply_rect(self.rect), false, 255);
        if self.text_alpha <= 0.0 {
            return;
        }
        let width = self.text.chars().count() as f32 * TEXT_SIZE as f32 * 0.5;
        let above = Vec2::new(
            self.rect.center().x - width * 0.5,
            self.rect.top() - TEXT_SIZE as f32 - 4.0,
        );
        surface.text(
            &self.text,
            camera.apply(above),
            TEXT_SIZE,
            TEXT_COLOR,
            alpha_u8(self.text_alpha),
        );
    }
}
