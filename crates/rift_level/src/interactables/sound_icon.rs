use glam::Vec2;

use rift_core::assets::SpriteAsset;
use rift_core::geom::Rect;
use rift_core::input::{EventInfo, MouseBtn};
use rift_core::save::SaveHandle;
use rift_render::DrawList;

use crate::sfx::SfxManager;
use crate::ui::Slider;

pub const SOUND_ICON_ASSET: &str = "sound_icon";
const SLIDER_WIDTH: f32 = 50.0;
const SLIDER_HEIGHT: f32 = 6.0;
const SLIDER_MAX: f32 = 50.0;

/// Speaker icon in the corner. Clicking it shows a volume slider; dragging
/// the slider sets the SFX volume and letting go stores it in the save.
#[derive(Debug, Clone)]
pub struct SoundIcon {
    pub rect: Rect,
    pub slider: Slider,
    slider_open: bool,
}

impl SoundIcon {
    pub fn new(center: Vec2, sprite: &SpriteAsset) -> Self {
        let size = sprite.frame_size();
        let rect = Rect::from_center(center, size.x, size.y);
        let slider_rect = Rect::new(
            rect.left() - SLIDER_WIDTH - 6.0,
            rect.center().y - SLIDER_HEIGHT * 0.5,
            SLIDER_WIDTH,
            SLIDER_HEIGHT,
        );
        Self {
            rect,
            slider: Slider::new(slider_rect, SLIDER_MAX, SLIDER_MAX),
            slider_open: false,
        }
    }

    /// Set the slider from a stored `0..=1` volume and apply it.
    pub fn seed(&mut self, last_volume: f32, sfx: &mut SfxManager) {
        let max = self.slider.max_value();
        self.slider = Slider::new(self.slider.rect, max, last_volume * max);
        sfx.set_volume(self.slider.ratio() * 100.0);
    }

    pub fn slider_open(&self) -> bool {
        self.slider_open
    }

    pub fn update(&mut self, event_info: &EventInfo, sfx: &mut SfxManager, save: &SaveHandle) {
        if event_info.mouse_pressed(MouseBtn::Left)
            && self.rect.contains_point(event_info.mouse_pos)
        {
            self.slider_open = !self.slider_open;
            return;
        }
        if !self.slider_open {
            return;
        }
        let step = self.slider.update(event_info);
        if step.changed {
            sfx.set_volume(self.slider.ratio() * 100.0);
        }
        if step.committed {
            save.set_last_volume(self.slider.ratio());
        }
    }

    pub fn draw(&self, surface: &mut DrawList) {
        // Frame 1 is the muted speaker.
        let frame = usize::from(self.slider.value() <= 0.0);
        surface.sprite(SOUND_ICON_ASSET, frame, self.rect, false, 255);
        if self.slider_open {
            self.slider.draw(surface);
        }
    }
}
