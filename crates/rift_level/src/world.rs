//! State shared by every stage of a level.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use rift_core::assets::{load_asset_bundle, AssetBundle};
use rift_core::dimension::Dimension;
use rift_core::input::EventInfo;
use rift_core::save::SaveHandle;
use rift_core::settings::{load_dimension_settings, DimensionSettings};
use rift_render::Camera;

use crate::config::LevelConfig;
use crate::effects::{BackgroundEffect, ExplosionManager, FadeTransition, Particle, ParticleManager};
use crate::enemy::Enemy;
use crate::interactables::{Checkpoint, Note, Portal, SoundIcon, CHECKPOINT_ASSET, SOUND_ICON_ASSET};
use crate::player::{Player, PLAYER_ASSET};
use crate::sfx::SfxManager;
use crate::tilemap::{load_tilemap_from_path, MapSurface, TileLayerMap};
use crate::ui::Button;

/// Free-form data handed from one game state to the next.
pub type SwitchInfo = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStateId {
    MainMenu,
    Level,
}

/// Work the level defers until the screen is fully black.
#[derive(Debug, Clone, PartialEq)]
pub enum FadeCue {
    Spawn(Particle),
}

/// Everything read from disk to build a level.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub tilemap: TileLayerMap,
    pub settings: HashMap<Dimension, DimensionSettings>,
    pub assets: AssetBundle,
}

impl LevelData {
    pub fn load(config: &LevelConfig) -> Result<Self, String> {
        let tilemap = load_tilemap_from_path(&config.map_path())?;
        let settings = load_dimension_settings(&config.settings_dir())?;
        let assets = load_asset_bundle(&config.assets_root, &config.asset_bundle)?;
        Ok(Self {
            tilemap,
            settings,
            assets,
        })
    }
}

pub struct LevelWorld {
    pub config: LevelConfig,
    pub camera: Camera,
    pub tilemap: TileLayerMap,
    pub map_surf: MapSurface,
    pub tilesets: HashMap<Dimension, String>,
    pub settings: HashMap<Dimension, DimensionSettings>,
    pub assets: AssetBundle,
    pub save: SaveHandle,
    pub sfx: SfxManager,
    pub background: BackgroundEffect,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub portals: Vec<Portal>,
    pub notes: Vec<Note>,
    pub checkpoints: Vec<Checkpoint>,
    pub particles: ParticleManager,
    pub transition: FadeTransition<FadeCue>,
    pub buttons: Vec<Button>,
    pub sound_icon: SoundIcon,
    pub explosions: ExplosionManager,
    pub current_dimension: Dimension,
    pub dimensions_traveled: HashSet<Dimension>,
    pub unlocked_dimensions: Vec<Dimension>,
    pub latest_checkpoint: Vec2,
    pub next_state: Option<GameStateId>,
    /// What the previous state handed in.
    pub incoming_info: SwitchInfo,
    /// What this level hands to the next state. Starts empty.
    pub switch_info: SwitchInfo,
    /// Frame time of the update in progress.
    pub dt: f32,
    death_recorded: bool,
}

impl LevelWorld {
    /// One-time construction shared by every later stage.
    pub fn init(
        data: LevelData,
        config: LevelConfig,
        save: SaveHandle,
        incoming_info: SwitchInfo,
    ) -> Result<Self, String> {
        let LevelData {
            tilemap,
            settings,
            assets,
        } = data;

        if let Some(missing) = Dimension::ALL.iter().find(|d| !settings.contains_key(*d)) {
            return Err(format!("Level has no settings for {}", missing.value()));
        }

        let current_dimension = Dimension::Parallel;
        let current_settings = settings
            .get(&current_dimension)
            .ok_or_else(|| format!("Level has no settings for {}", current_dimension.value()))?;

        let latest_checkpoint = save
            .latest_checkpoint()
            .unwrap_or_else(|| tilemap.spawn_point());

        assets.get(CHECKPOINT_ASSET)?;
        let checkpoints = tilemap
            .layer("checkpoints")?
            .iter()
            .map(Checkpoint::from_object)
            .collect();

        let player = Player::new(
            &current_settings.player,
            latest_checkpoint,
            assets.get(PLAYER_ASSET)?,
        );

        let viewport = config.viewport();
        let mut camera = Camera::new(viewport.0, viewport.1);
        camera.snap_to(player.rect);

        // The sound icon sits 32 px in from the top-right corner.
        let icon_sprite = assets.get(SOUND_ICON_ASSET)?;
        let icon_size = icon_sprite.frame_size();
        let icon_center = Vec2::new(
            viewport.0 as f32 - 32.0 - icon_size.x * 0.5,
            16.0 + icon_size.y * 0.5,
        );
        let sound_icon = SoundIcon::new(icon_center, icon_sprite);

        let transition =
            FadeTransition::new(true, config.fade_speed, viewport).with_pause(config.closed_pause);
        let map_surf = tilemap.make_map(current_dimension.value());

        Ok(Self {
            unlocked_dimensions: config.unlocked_dimensions.clone(),
            background: BackgroundEffect::new(viewport),
            config,
            camera,
            tilemap,
            map_surf,
            tilesets: HashMap::new(),
            settings,
            assets,
            save,
            sfx: SfxManager::new("level"),
            player,
            enemies: Vec::new(),
            portals: Vec::new(),
            notes: Vec::new(),
            checkpoints,
            particles: ParticleManager::new(),
            transition,
            buttons: Vec::new(),
            sound_icon,
            explosions: ExplosionManager::default(),
            current_dimension,
            dimensions_traveled: HashSet::from([current_dimension]),
            latest_checkpoint,
            next_state: None,
            incoming_info,
            switch_info: SwitchInfo::new(),
            dt: 0.0,
            death_recorded: false,
        })
    }

    /// Reset per-frame edges before any stage runs.
    pub fn begin_frame(&mut self, event_info: &EventInfo) {
        self.dt = event_info.dt;
        for portal in &mut self.portals {
            portal.dimension_change = false;
        }
    }

    pub fn current_settings(&self) -> Option<&DimensionSettings> {
        self.settings.get(&self.current_dimension)
    }

    fn tileset_for(&self, dimension: Dimension) -> &str {
        self.tilesets
            .get(&dimension)
            .map_or(dimension.value(), String::as_str)
    }

    pub fn switch_dimension(&mut self, target: Dimension) {
        let Some(settings) = self.settings.get(&target) else {
            log::warn!("No settings loaded for {}, staying in {}", target, self.current_dimension);
            return;
        };
        log::info!("Changed dimension to: {}", target);

        self.current_dimension = target;
        self.map_surf = self.tilemap.make_map(self.tileset_for(target));
        self.player.change_settings(&settings.player);
        for enemy in &mut self.enemies {
            enemy.change_settings(settings);
        }

        let announcement = Particle::text(
            &format!("Switched to: {}", target.label()),
            self.player.center(),
            Vec2::new(0.0, -1.5),
            3.0,
            80,
        );
        if self.dimensions_traveled.insert(target) {
            self.transition.fade_out_in(FadeCue::Spawn(announcement));
        } else {
            self.particles.add(announcement);
        }
        self.sfx.play("portal");
    }

    /// Unlock the first dimension not yet unlocked, if any.
    pub fn unlock_next_dimension(&mut self) {
        if let Some(&next) = Dimension::ALL
            .iter()
            .find(|d| !self.unlocked_dimensions.contains(*d))
        {
            log::info!("Unlocked {}", next);
            self.unlocked_dimensions.push(next);
        }
        for portal in &mut self.portals {
            portal.unlock_dimension(&self.unlocked_dimensions);
        }
    }

    pub fn apply_fade_cue(&mut self, cue: FadeCue) {
        match cue {
            FadeCue::Spawn(particle) => self.particles.add(particle),
        }
    }

    /// Persist the respawn point and play the death effects. Runs once per death.
    pub fn record_death(&mut self) {
        if self.death_recorded {
            return;
        }
        self.death_recorded = true;
        self.save.set_latest_checkpoint(self.latest_checkpoint);
        self.explosions.spawn(self.player.center());
        self.sfx.play("death");
        log::info!(
            "Player died at ({:.0}, {:.0}), respawn at ({:.0}, {:.0})",
            self.player.rect.x,
            self.player.rect.y,
            self.latest_checkpoint.x,
            self.latest_checkpoint.y
        );
    }
}
