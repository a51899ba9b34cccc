//! Rift -- headless game driver.
//!
//! Loads the level content, replays a scripted input sequence through the
//! state switcher at a fixed timestep, and records each frame into a draw
//! list that a renderer backend can consume. Save data is read at start and
//! written back on exit.

mod replay;
mod states;

use std::path::Path;

use rift_core::save::{load_save, write_save, SaveHandle};
use rift_level::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use rift_level::{load_level_config, LevelConfig};
use rift_render::DrawList;

use replay::{load_replay_from_path, run_replay};
use states::StateSwitcher;

const ASSETS_ROOT: &str = "assets";
const LEVEL_CONFIG_PATH: &str = "assets/level.json";
const REPLAY_PATH: &str = "assets/replays/demo.json";
const SAVE_PATH: &str = "save.json";

fn level_config() -> LevelConfig {
    let path = Path::new(LEVEL_CONFIG_PATH);
    if !path.exists() {
        log::info!("No level config at '{}', using defaults", path.display());
        return LevelConfig {
            assets_root: ASSETS_ROOT.into(),
            ..LevelConfig::default()
        };
    }
    load_level_config(path).unwrap_or_else(|err| {
        panic!("Failed to load level config '{}': {}", path.display(), err);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Rift starting...");

    let save_path = Path::new(SAVE_PATH);
    let save = SaveHandle::new(load_save(save_path).unwrap_or_else(|err| {
        panic!("Failed to load save data '{}': {}", save_path.display(), err);
    }));

    let config = level_config();
    let (width, height) = config.viewport();
    if (width, height) != (SCREEN_WIDTH, SCREEN_HEIGHT) {
        log::warn!("Viewport {}x{} differs from the native {}x{}", width, height, SCREEN_WIDTH, SCREEN_HEIGHT);
    }

    let replay_path = Path::new(REPLAY_PATH);
    let replay = load_replay_from_path(replay_path).unwrap_or_else(|err| {
        panic!("Failed to load replay '{}': {}", replay_path.display(), err);
    });

    let mut switcher = StateSwitcher::new(config, save.clone()).unwrap_or_else(|err| {
        panic!("Failed to build the level: {}", err);
    });

    let mut surface = DrawList::new(width, height);
    match run_replay(&mut switcher, &replay, &mut surface) {
        Ok(stats) => log::info!(
            "Replay finished: {} frames, {} state switches, {} sounds, {} draw commands in the last frame (quit: {})",
            stats.frames,
            stats.state_switches,
            stats.sounds,
            stats.last_draw_commands,
            stats.quit
        ),
        Err(err) => log::error!("Replay stopped: {}", err),
    }

    match write_save(save_path, &save.snapshot()) {
        Ok(()) => log::info!("Saved to {}", save_path.display()),
        Err(err) => log::error!("Failed to write save data: {}", err),
    }
}
