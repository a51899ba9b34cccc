use glam::Vec2;

use rift_core::animation::{seconds_to_us, AnimationClip, AnimationState};
use rift_core::assets::SpriteAsset;
use rift_core::dimension::Dimension;
use rift_core::geom::Rect;
use rift_core::input::{EventInfo, Key};
use rift_render::{Camera, DrawList, TEXT_COLOR};

use crate::player::Player;
use crate::tilemap::MapObject;

pub const PORTAL_ASSET: &str = "portal";
const USE_KEY: Key = Key::E;

/// Doorway to another dimension. Pressing the use key while overlapping
/// raises `dimension_change` for the rest of the frame; the level clears
/// it at the start of the next update.
#[derive(Debug, Clone)]
pub struct Portal {
    pub rect: Rect,
    /// Fixed destination, or `None` to cycle through unlocked dimensions.
    pub target: Option<Dimension>,
    pub current_dimension: Dimension,
    pub dimension_change: bool,
    unlocked: Vec<Dimension>,
    overlapping: bool,
    clip: AnimationClip,
    anim: AnimationState,
}

impl Portal {
    pub fn new(
        rect: Rect,
        target: Option<Dimension>,
        current: Dimension,
        unlocked: &[Dimension],
        sprite: &SpriteAsset,
    ) -> Self {
        Self {
            rect,
            target,
            current_dimension: current,
            dimension_change: false,
            unlocked: unlocked.to_vec(),
            overlapping: false,
            clip: AnimationClip {
                looping: true,
                ..sprite.clip()
            },
            anim: AnimationState::new(),
        }
    }

    pub fn from_object(
        obj: &MapObject,
        current: Dimension,
        unlocked: &[Dimension],
        sprite: &SpriteAsset,
    ) -> Result<Self, String> {
        let target = match obj.property("dimension") {
            Some(value) => Some(Dimension::from_value(value).ok_or_else(|| {
                format!(
                    "Portal at ({}, {}) targets unknown dimension '{}'",
                    obj.x, obj.y, value
                )
            })?),
            None => None,
        };
        Ok(Self::new(obj.rect(), target, current, unlocked, sprite))
    }

    pub fn unlocked(&self) -> &[Dimension] {
        &self.unlocked
    }

    pub fn unlock_dimension(&mut self, unlocked: &[Dimension]) {
        self.unlocked = unlocked.to_vec();
    }

    /// Where using the portal right now would lead, ignoring locks for a
    /// fixed target.
    pub fn destination(&self) -> Option<Dimension> {
        if let Some(target) = self.target {
            return (target != self.current_dimension).then_some(target);
        }
        let mut candidate = self.current_dimension.next();
        for _ in 0..Dimension::ALL.len() {
            if candidate != self.current_dimension && self.unlocked.contains(&candidate) {
                return Some(candidate);
            }
            candidate = candidate.next();
        }
        None
    }

    pub fn update(&mut self, player: &Player, event_info: &EventInfo) {
        self.anim.tick(seconds_to_us(event_info.dt), &self.clip);
        self.overlapping = player.alive && self.rect.colliderect(&player.rect);
        if !self.overlapping || !event_info.key_pressed(USE_KEY) {
            return;
        }
        let Some(destination) = self.destination() else {
            return;
        };
        if !self.unlocked.contains(&destination) {
            log::debug!("Portal refused locked dimension {}", destination);
            return;
        }
        self.current_dimension = destination;
        self.dimension_change = true;
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        surface.sprite(
            PORTAL_ASSET,
            self.anim.current(&self.clip),
            camera.apply_rect(self.rect),
            false,
            255,
        );
        if self.overlapping {
            let hint = Vec2::new(self.rect.center().x - 2.0, self.rect.top() - 10.0);
            surface.text("E", camera.apply(hint), 8, TEXT_COLOR, 255);
        }
    }
}
