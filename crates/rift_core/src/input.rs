//! Per-frame input bundle consumed by the level.
//!
//! The platform layer feeds raw key/mouse transitions into [`InputState`].
//! Once per frame it produces an [`EventInfo`] snapshot that carries:
//!
//! - **Discrete events** (`events`): key and mouse transitions that happened
//!   this frame, in arrival order. Gameplay that reacts to presses (jump,
//!   portal activation, dimension unlock) reads these.
//! - **Held state** (`held`, `mouse_press`): level-triggered, true for every
//!   frame the key or button stays down. Used for continuous movement and
//!   slider dragging.
//!
//! `end_frame()` drops the queued events once the snapshot has been consumed.

use glam::Vec2;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Escape,
    Enter,
    W,
    A,
    S,
    D,
    E,
    #[serde(rename = "5")]
    Num5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseBtn),
    MouseUp(MouseBtn),
    Quit,
}

/// Which mouse buttons are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MousePress {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MousePress {
    pub fn is_held(&self, btn: MouseBtn) -> bool {
        match btn {
            MouseBtn::Left => self.left,
            MouseBtn::Middle => self.middle,
            MouseBtn::Right => self.right,
        }
    }
}

/// Everything a level update needs to know about the outside world this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInfo {
    /// Elapsed time since the previous frame, in seconds.
    pub dt: f32,
    pub events: Vec<InputEvent>,
    pub held: HashSet<Key>,
    pub mouse_pos: Vec2,
    pub mouse_press: MousePress,
}

impl EventInfo {
    /// A frame with no input at all.
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_held(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// True if `key` went down during this frame.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.events.contains(&InputEvent::KeyDown(key))
    }

    /// Number of times `key` went down this frame.
    pub fn key_press_count(&self, key: Key) -> usize {
        self.events
            .iter()
            .filter(|event| **event == InputEvent::KeyDown(key))
            .count()
    }

    pub fn mouse_pressed(&self, btn: MouseBtn) -> bool {
        self.events.contains(&InputEvent::MouseDown(btn))
    }

    pub fn mouse_released(&self, btn: MouseBtn) -> bool {
        self.events.contains(&InputEvent::MouseUp(btn))
    }

    pub fn quit_requested(&self) -> bool {
        self.events.contains(&InputEvent::Quit)
    }
}

/// Accumulates raw transitions between frames and turns them into [`EventInfo`].
pub struct InputState {
    held: HashSet<Key>,
    mouse_held: HashSet<MouseBtn>,
    events: Vec<InputEvent>,
    pub mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            mouse_held: HashSet::new(),
            events: Vec::new(),
            mouse_position: Vec2::ZERO,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.events.push(InputEvent::KeyDown(key));
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.events.push(InputEvent::KeyUp(key));
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.events.push(InputEvent::MouseDown(btn));
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) {
            self.events.push(InputEvent::MouseUp(btn));
        }
    }

    pub fn quit(&mut self) {
        self.events.push(InputEvent::Quit);
    }

    /// Make the held key set equal to `keys`, emitting the transitions needed.
    pub fn sync_keys(&mut self, keys: &HashSet<Key>) {
        let released: Vec<Key> = self.held.difference(keys).copied().collect();
        for key in released {
            self.key_up(key);
        }
        for &key in keys {
            self.key_down(key);
        }
    }

    /// Make the held mouse buttons equal to `buttons`, emitting the transitions needed.
    pub fn sync_mouse(&mut self, buttons: &HashSet<MouseBtn>) {
        let released: Vec<MouseBtn> = self.mouse_held.difference(buttons).copied().collect();
        for btn in released {
            self.mouse_up(btn);
        }
        for &btn in buttons {
            self.mouse_down(btn);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn event_info(&self, dt: f32) -> EventInfo {
        EventInfo {
            dt,
            events: self.events.clone(),
            held: self.held.clone(),
            mouse_pos: self.mouse_position,
            mouse_press: MousePress {
                left: self.mouse_held.contains(&MouseBtn::Left),
                middle: self.mouse_held.contains(&MouseBtn::Middle),
                right: self.mouse_held.contains(&MouseBtn::Right),
            },
        }
    }

    pub fn end_frame(&mut self) {
        self.events.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
