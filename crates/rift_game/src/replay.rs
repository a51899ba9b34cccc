//! Scripted input playback. A replay is a list of frames, each naming the
//! keys and mouse buttons held during it; transitions between frames become
//! the key-down/up events the game sees.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glam::Vec2;
use rift_core::input::{InputState, Key, MouseBtn};
use rift_render::DrawList;

use crate::states::StateSwitcher;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default)]
    pub mouse_pos: Option<[f32; 2]>,
    #[serde(default)]
    pub mouse_held: Vec<MouseBtn>,
    #[serde(default)]
    pub quit: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    /// Feed this frame's held state into `input`.
    pub fn apply(&self, input: &mut InputState) {
        input.sync_keys(&self.held.iter().copied().collect::<HashSet<_>>());
        if let Some(pos) = self.mouse_pos {
            input.mouse_position = Vec2::from(pos);
        }
        input.sync_mouse(&self.mouse_held.iter().copied().collect::<HashSet<_>>());
        if self.quit {
            input.quit();
        }
    }
}

impl ReplaySequence {
    pub fn expanded_frames(&self) -> Vec<&ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame);
            }
        }
        out
    }
}

/// Totals gathered while playing a replay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplayStats {
    pub frames: usize,
    pub state_switches: usize,
    pub sounds: usize,
    pub last_draw_commands: usize,
    pub quit: bool,
}

/// Step `switcher` once per replay frame, drawing after every update.
pub fn run_replay(
    switcher: &mut StateSwitcher,
    replay: &ReplaySequence,
    surface: &mut DrawList,
) -> Result<ReplayStats, String> {
    let mut input = InputState::new();
    let mut stats = ReplayStats::default();

    for frame in replay.expanded_frames() {
        frame.apply(&mut input);
        let event_info = input.event_info(replay.fixed_dt);
        if event_info.quit_requested() {
            log::info!("Quit requested after {} frames", stats.frames);
            stats.quit = true;
            break;
        }

        let before = switcher.current();
        switcher.update(&event_info)?;
        if switcher.current() != before {
            stats.state_switches += 1;
        }

        surface.clear();
        switcher.draw(surface);
        input.end_frame();

        for sound in switcher.drain_sfx() {
            log::debug!("sfx: {}", sound);
            stats.sounds += 1;
        }
        stats.frames += 1;
        stats.last_draw_commands = surface.len();
        if stats.frames % 60 == 0 {
            log::debug!(
                "frame {}: {} draw commands in {} sections",
                stats.frames,
                surface.len(),
                surface.sections().len()
            );
        }
    }

    Ok(stats)
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read replay {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
