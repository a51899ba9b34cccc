use glam::Vec2;

use rift_core::geom::Rect;
use rift_core::input::{EventInfo, MouseBtn};
use rift_render::{Color, DrawList, TEXT_COLOR};

const BUTTON_COLOR: Color = [52, 46, 78];
const BUTTON_HOVER_COLOR: Color = [84, 74, 122];
const SLIDER_TRACK_COLOR: Color = [40, 36, 60];
const SLIDER_FILL_COLOR: Color = [150, 140, 210];
const SLIDER_KNOB_WIDTH: f32 = 4.0;

/// Screen-space button with hover and click detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    hovered: bool,
    clicked: bool,
}

impl Button {
    pub fn new(rect: Rect, label: &str) -> Self {
        Self {
            rect,
            label: label.to_string(),
            hovered: false,
            clicked: false,
        }
    }

    pub fn update(&mut self, event_info: &EventInfo) {
        self.hovered = self.rect.contains_point(event_info.mouse_pos);
        self.clicked = self.hovered && event_info.mouse_pressed(MouseBtn::Left);
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// True on the update the button was clicked.
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    pub fn draw(&self, surface: &mut DrawList) {
        let color = if self.hovered {
            BUTTON_HOVER_COLOR
        } else {
            BUTTON_COLOR
        };
        surface.rect(self.rect, color, 255);
        surface.text(
            &self.label,
            self.rect.topleft() + Vec2::new(3.0, 3.0),
            8,
            TEXT_COLOR,
            255,
        );
    }
}

/// Horizontal slider mapping its width to `0..=max_value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub rect: Rect,
    value: f32,
    max_value: f32,
    dragging: bool,
}

/// Outcome of one slider update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderStep {
    pub changed: bool,
    /// The drag ended this update.
    pub committed: bool,
}

impl Slider {
    pub fn new(rect: Rect, max_value: f32, value: f32) -> Self {
        Self {
            rect,
            value: value.clamp(0.0, max_value),
            max_value,
            dragging: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn ratio(&self) -> f32 {
        if self.max_value <= 0.0 {
            0.0
        } else {
            self.value / self.max_value
        }
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn update(&mut self, event_info: &EventInfo) -> SliderStep {
        let mut step = SliderStep::default();
        if event_info.mouse_pressed(MouseBtn::Left)
            && self.rect.contains_point(event_info.mouse_pos)
        {
            self.dragging = true;
        }
        let held = event_info.mouse_press.is_held(MouseBtn::Left)
            || event_info.mouse_pressed(MouseBtn::Left);
        if self.dragging && held {
            let t = ((event_info.mouse_pos.x - self.rect.left()) / self.rect.w).clamp(0.0, 1.0);
            let value = t * self.max_value;
            step.changed = value != self.value;
            self.value = value;
        }
        if self.dragging && event_info.mouse_released(MouseBtn::Left) {
            self.dragging = false;
            step.committed = true;
        }
        step
    }

    pub fn draw(&self, surface: &mut DrawList) {
        surface.rect(self.rect, SLIDER_TRACK_COLOR, 255);
        let fill = Rect::new(self.rect.x, self.rect.y, self.rect.w * self.ratio(), self.rect.h);
        surface.rect(fill, SLIDER_FILL_COLOR, 255);
        let knob = Rect::new(
            fill.right() - SLIDER_KNOB_WIDTH * 0.5,
            self.rect.y - 1.0,
            SLIDER_KNOB_WIDTH,
            self.rect.h + 2.0,
        );
        surface.rect(knob, TEXT_COLOR, 255);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_core::input::InputEvent;

    fn at(pos: Vec2) -> EventInfo {
        let mut info = EventInfo::idle(1.0 / 60.0);
        info.mouse_pos = pos;
        info
    }

    fn press(pos: Vec2) -> EventInfo {
        let mut info = at(pos).with_event(InputEvent::MouseDown(MouseBtn::Left));
        info.mouse_press.left = true;
        info
    }

    fn hold(pos: Vec2) -> EventInfo {
        let mut info = at(pos);
        info.mouse_press.left = true;
        info
    }

    fn release(pos: Vec2) -> EventInfo {
        at(pos).with_event(InputEvent::MouseUp(MouseBtn::Left))
    }

    #[test]
    fn button_hover_and_click() {
        let mut button = Button::new(Rect::new(10.0, 10.0, 40.0, 12.0), "Menu");
        button.update(&at(Vec2::new(20.0, 15.0)));
        assert!(button.hovered());
        assert!(!button.clicked());
        button.update(&press(Vec2::new(20.0, 15.0)));
        assert!(button.clicked());
        button.update(&hold(Vec2::new(20.0, 15.0)));
        assert!(!button.clicked(), "click is an edge, not a level");
        button.update(&press(Vec2::new(80.0, 15.0)));
        assert!(!button.hovered() && !button.clicked());
    }

    #[test]
    fn slider_drag_and_commit() {
        let mut slider = Slider::new(Rect::new(100.0, 20.0, 50.0, 6.0), 50.0, 25.0);
        let step = slider.update(&press(Vec2::new(110.0, 22.0)));
        assert!(slider.dragging());
        assert!(step.changed);
        assert_eq!(slider.value(), 10.0);

        // Dragging past the end clamps.
        slider.update(&hold(Vec2::new(400.0, 0.0)));
        assert_eq!(slider.value(), 50.0);
        assert_eq!(slider.ratio(), 1.0);

        let step = slider.update(&release(Vec2::new(400.0, 0.0)));
        assert!(step.committed);
        assert!(!slider.dragging());
    }

    #[test]
    fn slider_ignores_clicks_outside() {
        let mut slider = Slider::new(Rect::new(100.0, 20.0, 50.0, 6.0), 50.0, 25.0);
        let step = slider.update(&press(Vec2::new(10.0, 10.0)));
        assert_eq!(step, SliderStep::default());
        assert_eq!(slider.value(), 25.0);
    }
}
