use glam::Vec2;

use rift_core::assets::{AssetBundle, SpriteAsset};
use rift_core::geom::Rect;
use rift_core::input::EventInfo;
use rift_core::settings::{DimensionSettings, EnemySettings};
use rift_render::{Camera, DrawList};

use crate::player::Player;
use crate::tilemap::{MapObject, TileLayerMap};

pub const MOVING_WALL_TAG: &str = "moving_wall";
const DEFAULT_PATROL_DISTANCE: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" | "x" => Some(Self::Horizontal),
            "vertical" | "y" => Some(Self::Vertical),
            _ => None,
        }
    }

    fn unit(self) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::X,
            Self::Vertical => Vec2::Y,
        }
    }
}

/// Solid block that patrols back and forth along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingWall {
    pub rect: Rect,
    pub axis: Axis,
    origin: Vec2,
    distance: f32,
    speed: f32,
    direction: f32,
}

impl MovingWall {
    pub fn new(rect: Rect, axis: Axis, distance: f32, settings: &EnemySettings) -> Self {
        Self {
            rect,
            axis,
            origin: rect.topleft(),
            distance: distance.max(0.0),
            speed: settings.moving_wall_speed,
            direction: 1.0,
        }
    }

    pub fn from_object(obj: &MapObject, settings: &EnemySettings, sprite: &SpriteAsset) -> Result<Self, String> {
        let axis = match obj.property("axis") {
            Some(value) => Axis::parse(value).ok_or_else(|| {
                format!("Moving wall at ({}, {}) has unknown axis '{}'", obj.x, obj.y, value)
            })?,
            None => Axis::Horizontal,
        };
        let distance = match obj.property("distance") {
            Some(value) => value.parse::<f32>().map_err(|e| {
                format!("Moving wall at ({}, {}) has bad distance '{}': {e}", obj.x, obj.y, value)
            })?,
            None => DEFAULT_PATROL_DISTANCE,
        };
        let mut rect = obj.rect();
        if rect.w <= 0.0 || rect.h <= 0.0 {
            let size = sprite.frame_size();
            rect = Rect::new(rect.x, rect.y, size.x, size.y);
        }
        Ok(Self::new(rect, axis, distance, settings))
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn travelled(&self) -> f32 {
        (self.rect.topleft() - self.origin).dot(self.axis.unit())
    }

    /// Move one step. Returns how far the wall actually moved.
    fn step(&mut self, dt: f32, tilemap: &TileLayerMap) -> Vec2 {
        let wanted = (self.speed * dt * self.direction).clamp(
            -self.travelled(),
            self.distance - self.travelled(),
        );
        let delta = self.axis.unit() * wanted;
        let moved = self.rect.translate(delta);

        if wanted != 0.0 && tilemap.rect_hits_solid(moved) {
            self.direction = -self.direction;
            return Vec2::ZERO;
        }
        self.rect = moved;

        let travelled = self.travelled();
        if (self.direction > 0.0 && travelled >= self.distance)
            || (self.direction < 0.0 && travelled <= 0.0)
        {
            self.direction = -self.direction;
        }
        delta
    }

    pub fn update(&mut self, event_info: &EventInfo, tilemap: &TileLayerMap, player: &mut Player) {
        let delta = self.step(event_info.dt, tilemap);
        if delta == Vec2::ZERO || !player.alive {
            return;
        }
        // Riding on top or being shoved from the side both carry the player.
        let carried = self.rect.colliderect(&player.rect)
            || (self.axis == Axis::Horizontal
                && player.grounded
                && (player.rect.bottom() - self.rect.top()).abs() < 0.5
                && player.rect.right() > self.rect.left()
                && player.rect.left() < self.rect.right());
        if carried {
            player.push(delta);
        }
    }

    pub fn change_settings(&mut self, settings: &EnemySettings) {
        self.speed = settings.moving_wall_speed;
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        surface.sprite(MOVING_WALL_TAG, 0, camera.apply_rect(self.rect), false, 255);
    }
}

/// Every enemy kind a map can place, keyed by object name.
#[derive(Debug, Clone, PartialEq)]
pub enum Enemy {
    MovingWall(MovingWall),
}

impl Enemy {
    /// Build the enemy a map object describes. Unknown tags yield `Ok(None)`.
    pub fn from_object(
        obj: &MapObject,
        settings: &DimensionSettings,
        assets: &AssetBundle,
    ) -> Result<Option<Self>, String> {
        match obj.name.as_str() {
            MOVING_WALL_TAG => {
                let sprite = assets.get(MOVING_WALL_TAG)?;
                MovingWall::from_object(obj, &settings.enemy, sprite).map(|w| Some(Self::MovingWall(w)))
            }
            _ => Ok(None),
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Self::MovingWall(wall) => wall.rect,
        }
    }

    pub fn update(&mut self, event_info: &EventInfo, tilemap: &TileLayerMap, player: &mut Player) {
        match self {
            Self::MovingWall(wall) => wall.update(event_info, tilemap, player),
        }
    }

    pub fn change_settings(&mut self, settings: &DimensionSettings) {
        match self {
            Self::MovingWall(wall) => wall.change_settings(&settings.enemy),
        }
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        match self {
            Self::MovingWall(wall) => wall.draw(surface, camera),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::tests::test_player;
    use crate::tilemap::tests::floor_map;

    const DT: f32 = 1.0 / 60.0;

    fn wall_sprite() -> SpriteAsset {
        SpriteAsset::still("wall.png", 16, 16)
    }

    #[test]
    fn patrols_within_distance() {
        let map = floor_map();
        let mut wall = MovingWall::new(
            Rect::new(160.0, 100.0, 16.0, 16.0),
            Axis::Horizontal,
            32.0,
            &EnemySettings { moving_wall_speed: 60.0 },
        );
        let mut player = test_player(Vec2::new(20.0, 40.0));
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..300 {
            wall.update(&EventInfo::idle(DT), &map, &mut player);
            min_x = min_x.min(wall.rect.x);
            max_x = max_x.max(wall.rect.x);
        }
        assert!(min_x >= 160.0 - 1e-3);
        assert!(max_x <= 192.0 + 1e-3);
        assert!(max_x > 191.0, "reaches the far end");
    }

    #[test]
    fn reverses_on_solid_tile() {
        let map = floor_map();
        // Wall column at x = 96..112; start just left of it.
        let mut wall = MovingWall::new(
            Rect::new(78.0, 144.0, 16.0, 16.0),
            Axis::Horizontal,
            64.0,
            &EnemySettings { moving_wall_speed: 60.0 },
        );
        let mut player = test_player(Vec2::new(300.0, 40.0));
        for _ in 0..120 {
            wall.update(&EventInfo::idle(DT), &map, &mut player);
            assert!(wall.rect.right() <= 96.0 + 1e-3);
        }
    }

    #[test]
    fn pushes_overlapping_player() {
        let map = floor_map();
        let mut wall = MovingWall::new(
            Rect::new(160.0, 120.0, 16.0, 16.0),
            Axis::Horizontal,
            64.0,
            &EnemySettings { moving_wall_speed: 60.0 },
        );
        let mut player = test_player(Vec2::new(178.0, 135.0));
        let before = player.rect.x;
        wall.update(&EventInfo::idle(DT), &map, &mut player);
        assert!(player.rect.x > before);
    }

    #[test]
    fn change_settings_updates_speed() {
        let mut enemy = Enemy::MovingWall(MovingWall::new(
            Rect::new(0.0, 0.0, 16.0, 16.0),
            Axis::Vertical,
            10.0,
            &EnemySettings::default(),
        ));
        let settings = DimensionSettings {
            enemy: EnemySettings { moving_wall_speed: 90.0 },
            ..DimensionSettings::default()
        };
        enemy.change_settings(&settings);
        match enemy {
            Enemy::MovingWall(wall) => assert_eq!(wall.speed(), 90.0),
        }
    }

    #[test]
    fn unknown_tag_is_skipped() {
        let assets = AssetBundle::new("level").with_sprite(MOVING_WALL_TAG, wall_sprite());
        let obj = MapObject::new("bat", Rect::new(0.0, 0.0, 16.0, 16.0));
        let enemy = Enemy::from_object(&obj, &DimensionSettings::default(), &assets).expect("not an error");
        assert!(enemy.is_none());

        let obj = MapObject::new(MOVING_WALL_TAG, Rect::new(0.0, 0.0, 16.0, 16.0))
            .with_property("axis", "vertical")
            .with_property("distance", "48");
        match Enemy::from_object(&obj, &DimensionSettings::default(), &assets).expect("valid wall") {
            Some(Enemy::MovingWall(wall)) => assert_eq!(wall.axis, Axis::Vertical),
            None => panic!("moving wall should be built"),
        }
    }
}
