use rift_core::input::EventInfo;
use rift_core::save::SaveHandle;
use rift_render::DrawList;

use crate::config::{validate_config, LevelConfig};
use crate::stages::{pipeline, Stage};
use crate::world::{GameStateId, LevelData, LevelWorld, SwitchInfo};

/// A playable level: the shared world plus the stage table that drives it.
pub struct Level {
    world: LevelWorld,
    stages: Vec<Stage>,
}

impl Level {
    /// Read map, settings and assets from disk and build the level.
    pub fn load(config: LevelConfig, save: SaveHandle, incoming_info: SwitchInfo) -> Result<Self, String> {
        validate_config(&config)?;
        let data = LevelData::load(&config)?;
        Self::new(data, config, save, incoming_info)
    }

    pub fn new(
        data: LevelData,
        config: LevelConfig,
        save: SaveHandle,
        incoming_info: SwitchInfo,
    ) -> Result<Self, String> {
        Self::with_pipeline(data, config, save, incoming_info, pipeline())
    }

    /// Build with a custom stage table. Setups run once, in table order,
    /// right after the world is constructed.
    pub fn with_pipeline(
        data: LevelData,
        config: LevelConfig,
        save: SaveHandle,
        incoming_info: SwitchInfo,
        stages: Vec<Stage>,
    ) -> Result<Self, String> {
        validate_config(&config)?;
        let map_id = data.tilemap.map_id.clone();
        let mut world = LevelWorld::init(data, config, save, incoming_info)?;
        for stage in &stages {
            if let Some(setup) = stage.setup {
                setup(&mut world).map_err(|e| format!("Stage '{}' setup failed: {e}", stage.name))?;
            }
        }
        log::info!(
            "Level '{}' ready: {} stages, {} enemies, {} portals, {} notes, {} checkpoints",
            map_id,
            stages.len(),
            world.enemies.len(),
            world.portals.len(),
            world.notes.len(),
            world.checkpoints.len()
        );
        Ok(Self { world, stages })
    }

    pub fn update(&mut self, event_info: &EventInfo) {
        for stage in &self.stages {
            if let Some(update) = stage.update {
                update(&mut self.world, event_info);
            }
        }
    }

    pub fn draw(&self, surface: &mut DrawList) {
        for stage in &self.stages {
            if let Some(draw) = stage.draw {
                surface.begin_section(stage.name);
                draw(&self.world, surface);
            }
        }
    }

    /// Where the game should go next, once the level is finished.
    pub fn next_state(&self) -> Option<GameStateId> {
        self.world.next_state
    }

    /// Data handed to whichever state comes next.
    pub fn switch_info(&self) -> &SwitchInfo {
        &self.world.switch_info
    }

    /// Data the previous state handed to this level.
    pub fn incoming_info(&self) -> &SwitchInfo {
        &self.world.incoming_info
    }

    pub fn world(&self) -> &LevelWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut LevelWorld {
        &mut self.world
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    use glam::Vec2;
    use rift_core::assets::{AssetBundle, SpriteAsset};
    use rift_core::dimension::Dimension;
    use rift_core::geom::Rect;
    use rift_core::input::{InputEvent, Key};
    use rift_core::save::SaveData;
    use rift_core::settings::{DimensionSettings, EnemySettings, PlayerSettings};

    use crate::effects::FadeState;
    use crate::enemy::Enemy;
    use crate::special_tiles::SpecialTileKind;
    use crate::tilemap::{MapObject, ObjectLayer, TileLayerMap, TileMapFile, TilePlacement};

    const DT: f32 = 1.0 / 60.0;
    const SPAWN: Vec2 = Vec2::new(40.0, 208.0);
    const SPIKE_ID: u32 = 9;

    const DRAW_ORDER: [&str; 11] = [
        "background",
        "checkpoints",
        "portals",
        "notes",
        "enemies",
        "tiles",
        "player",
        "ui",
        "sfx_icon",
        "explosions",
        "transition",
    ];

    fn layer(name: &str, objects: Vec<MapObject>) -> ObjectLayer {
        ObjectLayer {
            name: name.to_string(),
            objects,
        }
    }

    /// 40x14 map, floor on row 13 (top at y = 208), one spike at column 30.
    pub(crate) fn fixture_map(populated: bool) -> TileLayerMap {
        let mut tiles: Vec<TilePlacement> = (0..40).map(|x| TilePlacement { x, y: 13, id: 1 }).collect();
        tiles.push(TilePlacement {
            x: 30,
            y: 12,
            id: SPIKE_ID,
        });

        let pick = |objects: Vec<MapObject>| if populated { objects } else { Vec::new() };
        TileLayerMap::from_file(TileMapFile {
            version: "0.1".to_string(),
            map_id: "fixture".to_string(),
            tile_size: 16,
            width: 40,
            height: 14,
            spawn: Some(SPAWN.to_array()),
            tiles,
            special_tiles: HashMap::from([(SPIKE_ID.to_string(), SpecialTileKind::Spike)]),
            layers: vec![
                layer(
                    "checkpoints",
                    pick(vec![MapObject::new("checkpoint", Rect::new(92.0, 34.0, 16.0, 16.0))]),
                ),
                layer(
                    "portals",
                    pick(vec![
                        MapObject::new("portal", Rect::new(200.0, 176.0, 16.0, 32.0)),
                        MapObject::new("portal", Rect::new(300.0, 176.0, 16.0, 32.0))
                            .with_property("dimension", "dimension_two"),
                    ]),
                ),
                layer(
                    "notes",
                    pick(vec![MapObject::new("note", Rect::new(120.0, 192.0, 16.0, 16.0))
                        .with_property("text", "hello")]),
                ),
                layer(
                    "enemies",
                    pick(vec![
                        MapObject::new("moving_wall", Rect::new(400.0, 100.0, 16.0, 16.0)),
                        MapObject::new("bat", Rect::new(420.0, 100.0, 16.0, 16.0)),
                    ]),
                ),
            ],
        })
        .expect("fixture map is valid")
    }

    pub(crate) fn fixture_assets() -> AssetBundle {
        let sheet = |path: &str, frames: usize| SpriteAsset {
            frames,
            ..SpriteAsset::still(path, 16, 16)
        };
        AssetBundle::new("level")
            .with_sprite("dave_walk", sheet("dave.png", 4))
            .with_sprite("checkpoint", sheet("checkpoint.png", 2))
            .with_sprite("portal", sheet("portal.png", 4))
            .with_sprite("note", sheet("note.png", 1))
            .with_sprite("moving_wall", sheet("wall.png", 1))
            .with_sprite("sound_icon", sheet("sound.png", 2))
            .with_sprite("fire", sheet("fire.png", 4))
            .with_sprite("dimension_one", sheet("tiles_one.png", 1))
            .with_sprite("dimension_two", sheet("tiles_two.png", 1))
    }

    pub(crate) fn fixture_data(populated: bool) -> LevelData {
        let inverted = DimensionSettings {
            player: PlayerSettings {
                max_speed: 160.0,
                ..PlayerSettings::default()
            },
            enemy: EnemySettings {
                moving_wall_speed: 75.0,
            },
            background_color: [40, 8, 8],
        };
        LevelData {
            tilemap: fixture_map(populated),
            settings: HashMap::from([
                (Dimension::Parallel, DimensionSettings::default()),
                (Dimension::Inverted, inverted),
            ]),
            assets: fixture_assets(),
        }
    }

    fn fixture_level_with(save: SaveHandle) -> Level {
        Level::new(fixture_data(true), LevelConfig::default(), save, SwitchInfo::new())
            .expect("fixture level builds")
    }

    fn fixture_level() -> Level {
        fixture_level_with(SaveHandle::default())
    }

    fn idle() -> EventInfo {
        EventInfo::idle(DT)
    }

    fn press(key: Key) -> EventInfo {
        idle().with_event(InputEvent::KeyDown(key))
    }

    fn place_player(level: &mut Level, feet: Vec2) {
        let player = &mut level.world_mut().player;
        player.rect = Rect::from_midbottom(feet, player.rect.w, player.rect.h);
        player.velocity = Vec2::ZERO;
    }

    fn wait_for_idle_fade(level: &mut Level) {
        for _ in 0..200 {
            if level.world().transition.state() == FadeState::Idle {
                return;
            }
            level.update(&idle());
        }
        panic!("entry fade never finished");
    }

    fn switch_texts(level: &Level) -> usize {
        level
            .world()
            .particles
            .texts()
            .filter(|t| t.starts_with("Switched to:"))
            .count()
    }

    #[test]
    fn builds_entities_from_layers() {
        let level = fixture_level();
        let world = level.world();
        assert_eq!(world.checkpoints.len(), 1);
        assert_eq!(world.portals.len(), 2);
        assert_eq!(world.notes.len(), 1);
        assert_eq!(world.enemies.len(), 1, "unknown enemy tags are skipped");
        assert_eq!(world.latest_checkpoint, SPAWN);
        assert_eq!(world.current_dimension, Dimension::Parallel);
        assert_eq!(world.tilesets.len(), 2);
        assert_eq!(world.transition.state(), FadeState::FadingIn);
        assert_eq!(level.next_state(), None);
    }

    #[test]
    fn incoming_info_is_not_passed_on() {
        let mut incoming = SwitchInfo::new();
        incoming.insert("from".to_string(), serde_json::Value::from("main_menu"));
        let level = Level::new(
            fixture_data(true),
            LevelConfig::default(),
            SaveHandle::default(),
            incoming,
        )
        .expect("fixture level builds");
        assert_eq!(
            level.incoming_info().get("from"),
            Some(&serde_json::Value::from("main_menu"))
        );
        assert!(level.switch_info().is_empty());
    }

    #[test]
    fn player_starts_at_saved_checkpoint() {
        let save = SaveHandle::new(SaveData {
            latest_checkpoint: Some([160.0, 208.0]),
            ..SaveData::default()
        });
        let level = fixture_level_with(save);
        assert_eq!(level.world().player.rect.midbottom(), Vec2::new(160.0, 208.0));
        assert_eq!(level.world().latest_checkpoint, Vec2::new(160.0, 208.0));
    }

    #[test]
    fn draw_order_is_fixed_regardless_of_entities() {
        let mut full = fixture_level();
        let mut empty = Level::new(
            fixture_data(false),
            LevelConfig::default(),
            SaveHandle::default(),
            SwitchInfo::new(),
        )
        .expect("empty level builds");
        full.update(&idle());
        empty.update(&idle());

        for level in [&full, &empty] {
            let mut surface = DrawList::new(400, 230);
            level.draw(&mut surface);
            assert_eq!(surface.section_labels(), DRAW_ORDER);
        }
    }

    #[test]
    fn checkpoint_captured_once() {
        let mut level = fixture_level();
        place_player(&mut level, Vec2::new(100.0, 50.0));
        level.update(&idle());
        assert_eq!(level.world().latest_checkpoint, Vec2::new(100.0, 50.0));
        assert!(level.world().checkpoints[0].is_spent());

        level.world_mut().latest_checkpoint = Vec2::new(1.0, 1.0);
        place_player(&mut level, Vec2::new(100.0, 50.0));
        level.update(&idle());
        assert_eq!(level.world().latest_checkpoint, Vec2::new(1.0, 1.0));
        let captures = level
            .world()
            .particles
            .texts()
            .filter(|t| *t == "Checkpoint!")
            .count();
        assert_eq!(captures, 1);
        assert_eq!(level.world().save.latest_checkpoint(), None, "only death writes the save");
    }

    #[test]
    fn locked_portal_keeps_dimension() {
        let mut level = fixture_level();
        place_player(&mut level, Vec2::new(308.0, 208.0));
        level.update(&press(Key::E));
        assert_eq!(level.world().current_dimension, Dimension::Parallel);

        place_player(&mut level, Vec2::new(208.0, 208.0));
        level.update(&press(Key::E));
        assert_eq!(level.world().current_dimension, Dimension::Parallel);
        assert!(level
            .world()
            .portals
            .iter()
            .all(|p| p.current_dimension == Dimension::Parallel));
    }

    #[test]
    fn unlock_appends_once() {
        let mut level = fixture_level();
        level.update(&press(Key::Num5));
        assert_eq!(
            level.world().unlocked_dimensions,
            vec![Dimension::Parallel, Dimension::Inverted]
        );
        level.update(&press(Key::Num5));
        assert_eq!(
            level.world().unlocked_dimensions,
            vec![Dimension::Parallel, Dimension::Inverted]
        );
        assert!(level
            .world()
            .portals
            .iter()
            .all(|p| p.unlocked() == [Dimension::Parallel, Dimension::Inverted]));
    }

    #[test]
    fn first_visit_announces_behind_fade_exactly_once() {
        let mut level = fixture_level();
        wait_for_idle_fade(&mut level);
        level.update(&press(Key::Num5));
        place_player(&mut level, Vec2::new(208.0, 208.0));

        level.update(&press(Key::E));
        let world = level.world();
        assert_eq!(world.current_dimension, Dimension::Inverted);
        assert_eq!(world.player.settings().max_speed, 160.0);
        assert_eq!(world.map_surf.tileset, "dimension_two");
        assert!(!world.enemies.is_empty());
        assert!(world.enemies.iter().all(|enemy| match enemy {
            Enemy::MovingWall(wall) => wall.speed() == 75.0,
        }));
        // The fixed-target portal at x = 300 did not fire but follows the switch.
        assert_eq!(world.portals[1].rect.x, 300.0);
        assert!(!world.portals[1].dimension_change);
        assert_eq!(world.portals[1].current_dimension, Dimension::Inverted);
        assert_eq!(world.transition.state(), FadeState::FadingOut);
        assert_eq!(switch_texts(&level), 0, "announcement waits for the closed screen");

        let mut appeared_at = None;
        for frame in 0..200 {
            level.update(&idle());
            let count = switch_texts(&level);
            assert!(count <= 1);
            if count == 1 && appeared_at.is_none() {
                appeared_at = Some(frame);
                assert_eq!(level.world().transition.state(), FadeState::Closed);
            }
        }
        assert!(appeared_at.is_some());
        assert_eq!(level.world().transition.state(), FadeState::Idle);
    }

    #[test]
    fn revisit_announces_immediately() {
        let mut level = fixture_level();
        wait_for_idle_fade(&mut level);
        level.update(&press(Key::Num5));
        place_player(&mut level, Vec2::new(208.0, 208.0));
        level.update(&press(Key::E));
        wait_for_idle_fade(&mut level);
        for _ in 0..100 {
            level.update(&idle());
        }

        place_player(&mut level, Vec2::new(208.0, 208.0));
        level.update(&press(Key::E));
        assert_eq!(level.world().current_dimension, Dimension::Parallel);
        assert_eq!(level.world().transition.state(), FadeState::Idle);
        assert_eq!(switch_texts(&level), 1);
    }

    #[test]
    fn zero_dt_updates_are_idempotent() {
        #[derive(Debug, PartialEq)]
        struct Observed {
            player: Rect,
            velocity: Vec2,
            alive: bool,
            dimension: Dimension,
            fade: (FadeState, f32),
            particles: Vec<(Vec2, i32)>,
            camera: Vec2,
            checkpoint: Vec2,
            next: Option<GameStateId>,
        }
        fn observe(level: &Level) -> Observed {
            let w = level.world();
            Observed {
                player: w.player.rect,
                velocity: w.player.velocity,
                alive: w.player.alive,
                dimension: w.current_dimension,
                fade: (w.transition.state(), w.transition.alpha()),
                particles: w.particles.iter().map(|p| (p.pos, p.lifespan)).collect(),
                camera: w.camera.offset,
                checkpoint: w.latest_checkpoint,
                next: level.next_state(),
            }
        }

        let mut level = fixture_level();
        place_player(&mut level, Vec2::new(100.0, 50.0));
        level.update(&idle());
        assert_eq!(level.world().particles.len(), 1, "checkpoint text is live");

        level.update(&EventInfo::idle(0.0));
        let first = observe(&level);
        level.update(&EventInfo::idle(0.0));
        assert_eq!(observe(&level), first);
    }

    #[test]
    fn falling_out_ends_level_on_closed_fade() {
        let save = SaveHandle::default();
        let mut level = fixture_level_with(save.clone());
        place_player(&mut level, Vec2::new(40.0, 2100.0));
        level.update(&idle());

        let world = level.world();
        assert!(!world.player.alive);
        assert_eq!(world.transition.state(), FadeState::FadingOut);
        assert!(!world.transition.fade_in());
        assert_eq!(world.explosions.len(), 1);
        assert_eq!(save.latest_checkpoint(), Some(SPAWN));
        assert!(world.sfx.queued().iter().any(|s| s == "death"));

        for _ in 0..200 {
            if level.next_state().is_some() {
                break;
            }
            level.update(&idle());
        }
        assert_eq!(level.next_state(), Some(GameStateId::MainMenu));
        assert!(level.world().transition.is_closed());
        let deaths = level.world().sfx.queued().iter().filter(|s| *s == "death").count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn spike_tile_kills() {
        let mut level = fixture_level();
        place_player(&mut level, Vec2::new(488.0, 206.0));
        level.update(&idle());
        assert!(!level.world().player.alive);
        assert_eq!(level.world().save.latest_checkpoint(), Some(SPAWN));
    }

    #[test]
    fn volume_seeded_from_save() {
        let save = SaveHandle::new(SaveData {
            last_volume: 0.2,
            ..SaveData::default()
        });
        let level = fixture_level_with(save);
        assert!((level.world().sfx.volume() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn setup_errors_are_reported_with_stage_name() {
        fn broken(_: &mut LevelWorld) -> Result<(), String> {
            Err("boom".to_string())
        }
        let err = Level::with_pipeline(
            fixture_data(true),
            LevelConfig::default(),
            SaveHandle::default(),
            SwitchInfo::new(),
            vec![Stage::new("broken").with_setup(broken)],
        )
        .err()
        .expect("setup error propagates");
        assert!(err.contains("broken"));
        assert!(err.contains("boom"));
    }

    #[test]
    fn missing_asset_is_a_content_error() {
        let mut data = fixture_data(true);
        data.assets = AssetBundle::new("level").with_sprite("dave_walk", SpriteAsset::still("d.png", 16, 16));
        let err = Level::new(data, LevelConfig::default(), SaveHandle::default(), SwitchInfo::new())
            .err()
            .expect("missing assets fail");
        assert!(err.contains("checkpoint"));
    }

    #[test]
    fn stage_table_order() {
        let level = fixture_level();
        assert_eq!(
            level.stage_names(),
            vec![
                "init",
                "background",
                "checkpoints",
                "portals",
                "notes",
                "enemies",
                "tiles",
                "items",
                "player",
                "special_tiles",
                "enemy_ai",
                "checkpoint_capture",
                "note_reveal",
                "portal_switch",
                "camera",
                "ui",
                "sfx_icon",
                "explosions",
                "transition",
            ]
        );
    }
}
