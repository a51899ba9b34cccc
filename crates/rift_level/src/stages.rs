//! The level's ordered stage table.
//!
//! Each stage contributes an optional one-time setup, a per-frame update
//! and a draw step over the shared [`LevelWorld`]. Updates run in table
//! order and so do draws; the table is the only place ordering lives.

use glam::Vec2;

use rift_core::dimension::Dimension;
use rift_core::input::{EventInfo, Key};
use rift_render::DrawList;

use crate::effects::ExplosionManager;
use crate::effects::explosion::EXPLOSION_ASSET;
use crate::enemy::Enemy;
use crate::interactables::{Note, Portal, NOTE_ASSET, PORTAL_ASSET};
use crate::world::{GameStateId, LevelWorld};

pub type SetupFn = fn(&mut LevelWorld) -> Result<(), String>;
pub type UpdateFn = fn(&mut LevelWorld, &EventInfo);
pub type DrawFn = fn(&LevelWorld, &mut DrawList);

#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub setup: Option<SetupFn>,
    pub update: Option<UpdateFn>,
    pub draw: Option<DrawFn>,
}

impl Stage {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            setup: None,
            update: None,
            draw: None,
        }
    }

    pub fn with_setup(mut self, setup: SetupFn) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_update(mut self, update: UpdateFn) -> Self {
        self.update = Some(update);
        self
    }

    pub fn with_draw(mut self, draw: DrawFn) -> Self {
        self.draw = Some(draw);
        self
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("setup", &self.setup.is_some())
            .field("update", &self.update.is_some())
            .field("draw", &self.draw.is_some())
            .finish()
    }
}

/// The full level chain.
pub fn pipeline() -> Vec<Stage> {
    vec![
        Stage::new("init").with_update(init_update),
        Stage::new("background")
            .with_update(background_update)
            .with_draw(background_draw),
        Stage::new("checkpoints").with_draw(checkpoints_draw),
        Stage::new("portals")
            .with_setup(portals_setup)
            .with_draw(portals_draw),
        Stage::new("notes").with_setup(notes_setup).with_draw(notes_draw),
        Stage::new("enemies").with_draw(enemies_draw),
        Stage::new("tiles").with_setup(tiles_setup).with_draw(tiles_draw),
        // Reserved for the player's item slot.
        Stage::new("items"),
        Stage::new("player")
            .with_update(player_update)
            .with_draw(player_draw),
        Stage::new("special_tiles").with_update(special_tiles_update),
        Stage::new("enemy_ai").with_update(enemy_ai_update),
        Stage::new("checkpoint_capture").with_update(checkpoint_capture_update),
        Stage::new("note_reveal").with_update(note_reveal_update),
        Stage::new("portal_switch").with_update(portal_switch_update),
        Stage::new("camera").with_update(camera_update),
        Stage::new("ui").with_update(ui_update).with_draw(ui_draw),
        Stage::new("sfx_icon")
            .with_setup(sfx_setup)
            .with_update(sfx_update)
            .with_draw(sfx_draw),
        Stage::new("explosions")
            .with_setup(explosions_setup)
            .with_update(explosions_update)
            .with_draw(explosions_draw),
        Stage::new("transition")
            .with_update(transition_update)
            .with_draw(transition_draw),
    ]
}

fn init_update(world: &mut LevelWorld, event_info: &EventInfo) {
    world.begin_frame(event_info);
}

fn background_update(world: &mut LevelWorld, _: &EventInfo) {
    world.background.update(world.dt);
}

fn background_draw(world: &LevelWorld, surface: &mut DrawList) {
    let clear = world
        .current_settings()
        .map_or(rift_render::BLACK, |s| s.background_color);
    world.background.draw(surface, &world.camera, clear);
}

fn checkpoints_draw(world: &LevelWorld, surface: &mut DrawList) {
    for checkpoint in &world.checkpoints {
        checkpoint.draw(surface, &world.camera);
    }
}

fn portals_setup(world: &mut LevelWorld) -> Result<(), String> {
    let sprite = world.assets.get(PORTAL_ASSET)?;
    let mut portals = Vec::new();
    for obj in world.tilemap.layer("portals")? {
        if obj.name != "portal" {
            log::debug!("Skipping '{}' in portals layer", obj.name);
            continue;
        }
        portals.push(Portal::from_object(
            obj,
            world.current_dimension,
            &world.unlocked_dimensions,
            sprite,
        )?);
    }
    world.portals = portals;
    Ok(())
}

fn portals_draw(world: &LevelWorld, surface: &mut DrawList) {
    for portal in &world.portals {
        portal.draw(surface, &world.camera);
    }
}

fn notes_setup(world: &mut LevelWorld) -> Result<(), String> {
    let sprite = world.assets.get(NOTE_ASSET)?;
    world.notes = world
        .tilemap
        .layer("notes")?
        .iter()
        .map(|obj| Note::from_object(obj, sprite))
        .collect::<Result<_, _>>()?;
    Ok(())
}

fn notes_draw(world: &LevelWorld, surface: &mut DrawList) {
    for note in &world.notes {
        note.draw(surface, &world.camera);
    }
}

fn enemies_draw(world: &LevelWorld, surface: &mut DrawList) {
    for enemy in &world.enemies {
        enemy.draw(surface, &world.camera);
    }
}

fn tiles_setup(world: &mut LevelWorld) -> Result<(), String> {
    for &dimension in Dimension::ALL {
        world.assets.get(dimension.value())?;
        world
            .tilesets
            .insert(dimension, dimension.value().to_string());
    }
    world.map_surf = world.tilemap.make_map(world.current_dimension.value());

    let settings = world
        .current_settings()
        .ok_or_else(|| format!("Level has no settings for {}", world.current_dimension.value()))?;
    let mut enemies = Vec::new();
    for obj in world.tilemap.layer("enemies")? {
        match Enemy::from_object(obj, settings, &world.assets)? {
            Some(enemy) => enemies.push(enemy),
            None => log::debug!("Skipping unknown enemy '{}' at ({}, {})", obj.name, obj.x, obj.y),
        }
    }
    world.enemies = enemies;
    Ok(())
}

fn tiles_draw(world: &LevelWorld, surface: &mut DrawList) {
    world.map_surf.draw(surface, world.camera.apply(Vec2::ZERO));
}

fn player_update(world: &mut LevelWorld, event_info: &EventInfo) {
    let obstacles: Vec<_> = world.enemies.iter().map(Enemy::rect).collect();
    let step = world.player.update(event_info, &world.tilemap, &obstacles);
    if step.jumped {
        world.sfx.play("jump");
    }
    if step.landed {
        world.sfx.play("land");
    }

    if world.player.alive && world.player.y() > world.config.fall_out_y {
        world.player.kill();
    }
    if !world.player.alive {
        world.record_death();
    }
}

fn player_draw(world: &LevelWorld, surface: &mut DrawList) {
    world.player.draw(surface, &world.camera);
}

fn special_tiles_update(world: &mut LevelWorld, _: &EventInfo) {
    for group in world.tilemap.special_tiles.values() {
        if group.update(&mut world.player) {
            log::debug!("Special tile {} ({:?}) triggered", group.tile_id, group.kind);
        }
    }
    if !world.player.alive {
        world.record_death();
    }
}

fn enemy_ai_update(world: &mut LevelWorld, event_info: &EventInfo) {
    for enemy in &mut world.enemies {
        enemy.update(event_info, &world.tilemap, &mut world.player);
    }
}

fn checkpoint_capture_update(world: &mut LevelWorld, _: &EventInfo) {
    let player_rect = world.player.rect;
    let mut captured = Vec::new();
    for checkpoint in &mut world.checkpoints {
        if checkpoint.update(player_rect, &mut world.particles) {
            captured.push(checkpoint.anchor());
        }
    }
    for anchor in captured {
        log::info!("Checkpoint captured at ({:.0}, {:.0})", anchor.x, anchor.y);
        world.latest_checkpoint = anchor;
        world.sfx.play("checkpoint");
    }
}

fn note_reveal_update(world: &mut LevelWorld, _: &EventInfo) {
    let player_rect = world.player.rect;
    for note in &mut world.notes {
        note.update(world.dt, player_rect);
    }
}

fn portal_switch_update(world: &mut LevelWorld, event_info: &EventInfo) {
    for portal in &mut world.portals {
        portal.update(&world.player, event_info);
    }

    let targets: Vec<Dimension> = world
        .portals
        .iter()
        .filter(|p| p.dimension_change && world.unlocked_dimensions.contains(&p.current_dimension))
        .map(|p| p.current_dimension)
        .collect();
    for target in targets {
        world.switch_dimension(target);
    }

    let current = world.current_dimension;
    for portal in world.portals.iter_mut().filter(|p| !p.dimension_change) {
        portal.current_dimension = current;
    }

    for _ in 0..event_info.key_press_count(Key::Num5) {
        world.unlock_next_dimension();
    }
}

fn camera_update(world: &mut LevelWorld, _: &EventInfo) {
    world.camera.adjust_to(world.dt, world.player.rect);
}

fn ui_update(world: &mut LevelWorld, event_info: &EventInfo) {
    for button in &mut world.buttons {
        button.update(event_info);
    }
    // Particles advance per tick; a zero-length frame is not a tick.
    if world.dt > 0.0 {
        world.particles.update();
    }
}

fn ui_draw(world: &LevelWorld, surface: &mut DrawList) {
    for button in &world.buttons {
        button.draw(surface);
    }
    world.particles.draw(surface, &world.camera);
}

fn sfx_setup(world: &mut LevelWorld) -> Result<(), String> {
    let last_volume = world.save.last_volume();
    world.sound_icon.seed(last_volume, &mut world.sfx);
    Ok(())
}

fn sfx_update(world: &mut LevelWorld, event_info: &EventInfo) {
    world
        .sound_icon
        .update(event_info, &mut world.sfx, &world.save);
}

fn sfx_draw(world: &LevelWorld, surface: &mut DrawList) {
    world.sound_icon.draw(surface);
}

fn explosions_setup(world: &mut LevelWorld) -> Result<(), String> {
    let sprite = world.assets.get(EXPLOSION_ASSET)?;
    world.explosions = ExplosionManager::new(EXPLOSION_ASSET, sprite);
    Ok(())
}

fn explosions_update(world: &mut LevelWorld, _: &EventInfo) {
    world.explosions.update(world.dt);
}

fn explosions_draw(world: &LevelWorld, surface: &mut DrawList) {
    world.explosions.draw(surface, &world.camera);
}

fn transition_update(world: &mut LevelWorld, _: &EventInfo) {
    for cue in world.transition.update(world.dt) {
        world.apply_fade_cue(cue);
    }
    if world.player.alive {
        return;
    }
    world.transition.hold_closed();
    if world.transition.event() && world.transition.is_closed() && world.next_state.is_none() {
        log::info!("Fade closed after death, leaving level");
        world.next_state = Some(GameStateId::MainMenu);
    }
}

fn transition_draw(world: &LevelWorld, surface: &mut DrawList) {
    world.transition.draw(surface);
}
