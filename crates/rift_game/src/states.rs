use glam::Vec2;
use serde_json::Value;

use rift_core::input::{EventInfo, Key};
use rift_core::save::SaveHandle;
use rift_level::{GameStateId, Level, LevelConfig, SwitchInfo};
use rift_render::{DrawList, TEXT_COLOR};

const MENU_BACKGROUND: [u8; 3] = [12, 10, 20];

/// Title screen. Enter or Space starts the level.
#[derive(Debug)]
pub struct MainMenu {
    next_state: Option<GameStateId>,
    switch_info: SwitchInfo,
}

impl MainMenu {
    pub fn new() -> Self {
        let mut switch_info = SwitchInfo::new();
        switch_info.insert("from".to_string(), Value::from("main_menu"));
        Self {
            next_state: None,
            switch_info,
        }
    }

    pub fn next_state(&self) -> Option<GameStateId> {
        self.next_state
    }

    pub fn update(&mut self, event_info: &EventInfo) {
        if event_info.key_pressed(Key::Enter) || event_info.key_pressed(Key::Space) {
            self.next_state = Some(GameStateId::Level);
        }
    }

    pub fn draw(&self, surface: &mut DrawList) {
        surface.fill(MENU_BACKGROUND);
        let (w, h) = surface.size();
        let center = Vec2::new(w as f32 * 0.5, h as f32 * 0.5);
        surface.text("RIFT", center - Vec2::new(16.0, 24.0), 16, TEXT_COLOR, 255);
        surface.text("Press Enter", center - Vec2::new(22.0, -8.0), 8, TEXT_COLOR, 255);
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

pub enum GameState {
    MainMenu(MainMenu),
    Level(Box<Level>),
}

impl GameState {
    pub fn id(&self) -> GameStateId {
        match self {
            Self::MainMenu(_) => GameStateId::MainMenu,
            Self::Level(_) => GameStateId::Level,
        }
    }

    fn update(&mut self, event_info: &EventInfo) {
        match self {
            Self::MainMenu(menu) => menu.update(event_info),
            Self::Level(level) => level.update(event_info),
        }
    }

    fn draw(&self, surface: &mut DrawList) {
        match self {
            Self::MainMenu(menu) => menu.draw(surface),
            Self::Level(level) => level.draw(surface),
        }
    }

    fn next_state(&self) -> Option<GameStateId> {
        match self {
            Self::MainMenu(menu) => menu.next_state(),
            Self::Level(level) => level.next_state(),
        }
    }

    fn switch_info(&self) -> SwitchInfo {
        match self {
            Self::MainMenu(menu) => menu.switch_info.clone(),
            Self::Level(level) => level.switch_info().clone(),
        }
    }
}

/// Owns the active state and replaces it when the state asks to leave.
pub struct StateSwitcher {
    state: GameState,
    config: LevelConfig,
    save: SaveHandle,
    sfx: Vec<String>,
}

impl StateSwitcher {
    /// Start straight in the level.
    pub fn new(config: LevelConfig, save: SaveHandle) -> Result<Self, String> {
        let level = Level::load(config.clone(), save.clone(), SwitchInfo::new())?;
        Ok(Self {
            state: GameState::Level(Box::new(level)),
            config,
            save,
            sfx: Vec::new(),
        })
    }

    pub fn current(&self) -> GameStateId {
        self.state.id()
    }

    pub fn update(&mut self, event_info: &EventInfo) -> Result<(), String> {
        self.state.update(event_info);
        // Collect before a switch can drop the level's queue.
        self.collect_sfx();
        if let Some(next) = self.state.next_state() {
            self.enter(next)?;
        }
        Ok(())
    }

    pub fn draw(&self, surface: &mut DrawList) {
        self.state.draw(surface);
    }

    /// Replace the current state, carrying its switch info forward.
    pub fn enter(&mut self, next: GameStateId) -> Result<(), String> {
        let switch_info = self.state.switch_info();
        log::info!("Switching state {:?} -> {:?}", self.state.id(), next);
        self.state = match next {
            GameStateId::MainMenu => GameState::MainMenu(MainMenu::new()),
            GameStateId::Level => GameState::Level(Box::new(Level::load(
                self.config.clone(),
                self.save.clone(),
                switch_info,
            )?)),
        };
        Ok(())
    }

    fn collect_sfx(&mut self) {
        if let GameState::Level(level) = &mut self.state {
            self.sfx.extend(level.world_mut().sfx.drain());
        }
    }

    /// Sound requests queued since the last call.
    pub fn drain_sfx(&mut self) -> Vec<String> {
        self.collect_sfx();
        std::mem::take(&mut self.sfx)
    }
}
