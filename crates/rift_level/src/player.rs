use glam::Vec2;

use rift_core::animation::{seconds_to_us, AnimationClip, AnimationState};
use rift_core::assets::SpriteAsset;
use rift_core::geom::Rect;
use rift_core::input::{EventInfo, Key};
use rift_core::settings::PlayerSettings;
use rift_render::{Camera, DrawList};

use crate::tilemap::{CollisionMoveResult, TileLayerMap};

pub const PLAYER_ASSET: &str = "dave_walk";
const HITBOX_WIDTH: f32 = 10.0;
const HITBOX_HEIGHT: f32 = 14.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

/// What happened during one player update, for sound and effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub landed: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub velocity: Vec2,
    pub grounded: bool,
    pub alive: bool,
    pub facing_left: bool,
    pub contacts: ContactState,
    settings: PlayerSettings,
    sprite_size: Vec2,
    walk: AnimationClip,
    anim: AnimationState,
}

impl Player {
    /// Place the player with its feet centered on `spawn`.
    pub fn new(settings: &PlayerSettings, spawn: Vec2, sprite: &SpriteAsset) -> Self {
        Self {
            rect: Rect::from_midbottom(spawn, HITBOX_WIDTH, HITBOX_HEIGHT),
            velocity: Vec2::ZERO,
            grounded: false,
            alive: true,
            facing_left: false,
            contacts: ContactState::default(),
            settings: *settings,
            sprite_size: sprite.frame_size(),
            walk: AnimationClip {
                looping: true,
                ..sprite.clip()
            },
            anim: AnimationState::new(),
        }
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Swap movement tuning, e.g. after a dimension switch. Velocity carries over.
    pub fn change_settings(&mut self, settings: &PlayerSettings) {
        self.settings = *settings;
    }

    pub fn y(&self) -> f32 {
        self.rect.y
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn update(
        &mut self,
        event_info: &EventInfo,
        tilemap: &TileLayerMap,
        obstacles: &[Rect],
    ) -> PlayerStep {
        if !self.alive {
            return PlayerStep::default();
        }

        let dt = event_info.dt;
        let mut step = PlayerStep::default();
        let move_x = axis(event_info);

        let accel = if self.grounded {
            self.settings.accel_ground
        } else {
            self.settings.accel_air
        };
        if move_x != 0.0 {
            let target = move_x * self.settings.max_speed;
            self.velocity.x = move_towards(self.velocity.x, target, accel * dt);
            self.facing_left = move_x < 0.0;
        } else if self.grounded {
            self.velocity.x = move_towards(self.velocity.x, 0.0, self.settings.friction_ground * dt);
        }

        let jump_pressed = [Key::Space, Key::Up, Key::W]
            .into_iter()
            .any(|key| event_info.key_pressed(key));
        if jump_pressed && self.grounded {
            self.velocity.y = -self.settings.jump_speed;
            self.grounded = false;
            step.jumped = true;
        }

        self.velocity.y =
            (self.velocity.y + self.settings.gravity * dt).min(self.settings.max_fall_speed);

        let was_grounded = self.grounded;
        let result = tilemap.move_and_collide(
            self.rect,
            self.velocity.x * dt,
            self.velocity.y * dt,
            obstacles,
        );
        self.apply_collision_result(result);
        step.landed = !was_grounded && self.grounded;

        if self.grounded && self.velocity.x != 0.0 {
            self.anim.tick(seconds_to_us(dt), &self.walk);
        } else if self.velocity.x == 0.0 {
            self.anim.reset();
        }

        step
    }

    fn apply_collision_result(&mut self, result: CollisionMoveResult) {
        self.rect = result.rect;
        self.contacts = ContactState {
            left: result.blocked_left,
            right: result.blocked_right,
            down: result.blocked_down,
            up: result.blocked_up,
        };

        if (result.blocked_left && self.velocity.x < 0.0)
            || (result.blocked_right && self.velocity.x > 0.0)
        {
            self.velocity.x = 0.0;
        }

        if result.blocked_up && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        // Grounded comes from collision contact, not from position heuristics.
        if result.blocked_down && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
            self.grounded = true;
        } else if result.collided_y {
            self.velocity.y = 0.0;
            self.grounded = false;
        } else {
            self.grounded = false;
        }
    }

    /// Returns true if this call is what killed the player.
    pub fn kill(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        self.velocity = Vec2::ZERO;
        was_alive
    }

    pub fn launch(&mut self, speed: f32) {
        self.velocity.y = -speed;
        self.grounded = false;
    }

    /// Displace without collision, used when something solid shoves the player.
    pub fn push(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        if !self.alive {
            return;
        }
        let dest = Rect::from_midbottom(self.rect.midbottom(), self.sprite_size.x, self.sprite_size.y);
        surface.sprite(
            PLAYER_ASSET,
            self.anim.current(&self.walk),
            camera.apply_rect(dest),
            self.facing_left,
            255,
        );
    }
}

fn axis(event_info: &EventInfo) -> f32 {
    let left = event_info.is_held(Key::Left) || event_info.is_held(Key::A);
    let right = event_info.is_held(Key::Right) || event_info.is_held(Key::D);
    match (left, right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tilemap::tests::floor_map;
    use rift_core::input::InputEvent;

    const DT: f32 = 1.0 / 60.0;

    pub(crate) fn test_player(feet: Vec2) -> Player {
        Player::new(
            &PlayerSettings::default(),
            feet,
            &SpriteAsset::still("dave.png", 16, 16),
        )
    }

    fn settle(player: &mut Player, map: &TileLayerMap) {
        for _ in 0..30 {
            player.update(&EventInfo::idle(DT), map, &[]);
        }
    }

    #[test]
    fn falls_and_lands_on_floor() {
        let map = floor_map();
        let mut player = test_player(Vec2::new(40.0, 120.0));
        for _ in 0..120 {
            player.update(&EventInfo::idle(DT), &map, &[]);
        }
        assert!(player.grounded);
        assert!((player.rect.bottom() - 176.0).abs() < 0.01);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn jump_only_activates_when_grounded() {
        let map = floor_map();
        let mut player = test_player(Vec2::new(40.0, 100.0));
        let jump = EventInfo::idle(DT).with_event(InputEvent::KeyDown(Key::Space));
        let step = player.update(&jump, &map, &[]);
        assert!(!step.jumped);
        assert!(player.velocity.y >= 0.0);

        settle(&mut player, &map);
        let step = player.update(&jump, &map, &[]);
        assert!(step.jumped);
        assert!(player.velocity.y < 0.0);
    }

    #[test]
    fn walking_right_hits_wall() {
        let map = floor_map();
        let mut player = test_player(Vec2::new(60.0, 176.0));
        settle(&mut player, &map);
        let walk = EventInfo::idle(DT).with_held(Key::Right);
        let mut hit = false;
        for _ in 0..240 {
            player.update(&walk, &map, &[]);
            if player.contacts.right {
                hit = true;
                break;
            }
        }
        assert!(hit, "player should reach the wall at x = 96");
        assert!(player.rect.right() <= 96.001);
        assert!(!player.facing_left);
    }

    #[test]
    fn change_settings_changes_top_speed() {
        let map = floor_map();
        let walk = EventInfo::idle(DT).with_held(Key::Left);

        let mut slow = test_player(Vec2::new(300.0, 176.0));
        let mut fast = test_player(Vec2::new(300.0, 176.0));
        fast.change_settings(&PlayerSettings {
            max_speed: 200.0,
            ..PlayerSettings::default()
        });
        settle(&mut slow, &map);
        settle(&mut fast, &map);
        for _ in 0..60 {
            slow.update(&walk, &map, &[]);
            fast.update(&walk, &map, &[]);
        }
        assert!(fast.rect.x < slow.rect.x);
        assert_eq!(fast.settings().max_speed, 200.0);
        assert!(fast.facing_left);
    }

    #[test]
    fn dead_player_is_frozen() {
        let map = floor_map();
        let mut player = test_player(Vec2::new(40.0, 100.0));
        assert!(player.kill());
        assert!(!player.kill(), "second kill reports no change");
        let before = player.rect;
        player.update(&EventInfo::idle(DT).with_held(Key::Right), &map, &[]);
        assert_eq!(player.rect, before);
    }

    #[test]
    fn zero_dt_update_keeps_position() {
        let map = floor_map();
        let mut player = test_player(Vec2::new(40.0, 100.0));
        let before = player.rect;
        player.update(&EventInfo::idle(0.0), &map, &[]);
        player.update(&EventInfo::idle(0.0), &map, &[]);
        assert_eq!(player.rect, before);
        assert_eq!(player.velocity, Vec2::ZERO);
    }

    #[test]
    fn deterministic_sequence_reaches_same_final_state() {
        let map = floor_map();
        let mut inputs = Vec::new();
        for _ in 0..40 {
            inputs.push(EventInfo::idle(DT).with_held(Key::Left));
        }
        inputs.push(
            EventInfo::idle(DT)
                .with_held(Key::Left)
                .with_event(InputEvent::KeyDown(Key::Space)),
        );
        for _ in 0..60 {
            inputs.push(EventInfo::idle(DT).with_held(Key::Right));
        }

        let mut run_a = test_player(Vec2::new(200.0, 150.0));
        let mut run_b = test_player(Vec2::new(200.0, 150.0));
        for input in &inputs {
            run_a.update(input, &map, &[]);
        }
        for input in &inputs {
            run_b.update(input, &map, &[]);
        }
        assert_eq!(run_a.rect, run_b.rect);
        assert_eq!(run_a.velocity, run_b.velocity);
        assert_eq!(run_a.grounded, run_b.grounded);
    }

    #[test]
    fn draw_anchors_sprite_at_feet() {
        let player = test_player(Vec2::new(40.0, 176.0));
        let mut surface = DrawList::new(400, 230);
        player.draw(&mut surface, &Camera::new(400, 230));
        match &surface.commands()[0] {
            rift_render::DrawCommand::Sprite { asset, dest, .. } => {
                assert_eq!(asset, PLAYER_ASSET);
                assert_eq!(dest.midbottom(), Vec2::new(40.0, 176.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
