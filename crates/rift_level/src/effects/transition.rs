use std::mem;

use rift_core::geom::Rect;
use rift_render::{DrawList, BLACK};

const OPAQUE: f32 = 255.0;
const REFERENCE_FPS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Idle,
    FadingOut,
    Closed,
    FadingIn,
}

/// Full-screen fade to black and back.
///
/// Work that must happen while the screen is hidden is queued with
/// [`FadeTransition::fade_out_in`] and handed back from
/// [`FadeTransition::update`] on the frame the fade becomes fully closed.
/// The owner applies those actions itself, so the fade never needs a
/// reference into the level.
#[derive(Debug, Clone)]
pub struct FadeTransition<A> {
    state: FadeState,
    alpha: f32,
    speed: f32,
    size: (u32, u32),
    fade_in: bool,
    event: bool,
    pause: f32,
    closed_for: f32,
    /// Raise `event` again on the next update, for a hold requested while already closed.
    reannounce: bool,
    pending: Vec<A>,
}

impl<A> FadeTransition<A> {
    /// `fade_in` starts fully closed and opens on the first updates, the way a
    /// level reveals itself on entry.
    pub fn new(fade_in: bool, speed: f32, size: (u32, u32)) -> Self {
        let (state, alpha) = if fade_in {
            (FadeState::FadingIn, OPAQUE)
        } else {
            (FadeState::Idle, 0.0)
        };
        Self {
            state,
            alpha,
            speed,
            size,
            fade_in: true,
            event: false,
            pause: 0.0,
            closed_for: 0.0,
            reannounce: false,
            pending: Vec::new(),
        }
    }

    /// Seconds to stay closed before opening again.
    pub fn with_pause(mut self, pause: f32) -> Self {
        self.pause = pause.max(0.0);
        self
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn fade_in(&self) -> bool {
        self.fade_in
    }

    /// True only on the update that finished closing or reopening.
    pub fn event(&self) -> bool {
        self.event
    }

    pub fn is_closed(&self) -> bool {
        self.state == FadeState::Closed
    }

    /// Close, yield `action` once while closed, then open again.
    pub fn fade_out_in(&mut self, action: A) {
        self.pending.push(action);
        if matches!(self.state, FadeState::Idle | FadeState::FadingIn) {
            self.state = FadeState::FadingOut;
        }
    }

    /// Close and stay closed.
    pub fn hold_closed(&mut self) {
        if self.fade_in && self.state == FadeState::Closed {
            self.reannounce = true;
        }
        self.fade_in = false;
        if matches!(self.state, FadeState::Idle | FadeState::FadingIn) {
            self.state = FadeState::FadingOut;
        }
    }

    /// Advance the fade. Returns the queued actions on the update the
    /// screen becomes fully closed.
    pub fn update(&mut self, dt: f32) -> Vec<A> {
        self.event = false;
        let step = self.speed * dt * REFERENCE_FPS;

        match self.state {
            FadeState::Idle => Vec::new(),
            FadeState::FadingOut => {
                self.alpha = (self.alpha + step).min(OPAQUE);
                if self.alpha < OPAQUE {
                    return Vec::new();
                }
                self.state = FadeState::Closed;
                self.closed_for = 0.0;
                self.event = true;
                mem::take(&mut self.pending)
            }
            FadeState::Closed => {
                // Anything queued after closing still runs behind the black screen.
                let actions = mem::take(&mut self.pending);
                if self.reannounce {
                    self.reannounce = false;
                    self.event = true;
                }
                if self.fade_in {
                    self.closed_for += dt;
                    if self.closed_for >= self.pause {
                        self.state = FadeState::FadingIn;
                    }
                }
                actions
            }
            FadeState::FadingIn => {
                self.alpha = (self.alpha - step).max(0.0);
                if self.alpha <= 0.0 {
                    self.state = FadeState::Idle;
                    self.event = true;
                }
                Vec::new()
            }
        }
    }

    pub fn draw(&self, surface: &mut DrawList) {
        if self.alpha <= 0.0 {
            return;
        }
        let rect = Rect::new(0.0, 0.0, self.size.0 as f32, self.size.1 as f32);
        surface.rect(rect, BLACK, self.alpha.round() as u8);
    }
}
