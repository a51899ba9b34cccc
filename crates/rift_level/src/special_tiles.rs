use serde::Deserialize;

use rift_core::geom::Rect;

use crate::player::Player;

/// Launch speed of a bounce tile, pixels per second.
const BOUNCE_SPEED: f32 = 420.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpecialTileKind {
    /// Kills the player on contact.
    Spike,
    /// Throws the player upward on contact.
    Bounce,
}

/// Every placed tile sharing one special tile id.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTileGroup {
    pub tile_id: u32,
    pub kind: SpecialTileKind,
    rects: Vec<Rect>,
}

impl SpecialTileGroup {
    pub fn new(tile_id: u32, kind: SpecialTileKind) -> Self {
        Self {
            tile_id,
            kind,
            rects: Vec::new(),
        }
    }

    pub fn add_tile(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Apply this group's effect if the player touches any of its tiles.
    /// Returns true when the effect fired.
    pub fn update(&self, player: &mut Player) -> bool {
        if !player.alive || !self.rects.iter().any(|r| r.colliderect(&player.rect)) {
            return false;
        }
        match self.kind {
            SpecialTileKind::Spike => player.kill(),
            SpecialTileKind::Bounce => {
                player.launch(BOUNCE_SPEED);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::tests::test_player;
    use glam::Vec2;

    #[test]
    fn spike_kills_on_contact() {
        let mut group = SpecialTileGroup::new(7, SpecialTileKind::Spike);
        group.add_tile(Rect::new(32.0, 160.0, 16.0, 16.0));

        let mut player = test_player(Vec2::new(40.0, 170.0));
        assert!(group.update(&mut player));
        assert!(!player.alive);
        assert!(!group.update(&mut player), "dead players are ignored");
    }

    #[test]
    fn bounce_launches_upward() {
        let mut group = SpecialTileGroup::new(8, SpecialTileKind::Bounce);
        group.add_tile(Rect::new(32.0, 160.0, 16.0, 16.0));

        let mut player = test_player(Vec2::new(40.0, 170.0));
        assert!(group.update(&mut player));
        assert_eq!(player.velocity.y, -BOUNCE_SPEED);
        assert!(player.alive);
    }

    #[test]
    fn no_contact_no_effect() {
        let mut group = SpecialTileGroup::new(7, SpecialTileKind::Spike);
        group.add_tile(Rect::new(200.0, 160.0, 16.0, 16.0));
        let mut player = test_player(Vec2::new(40.0, 170.0));
        assert!(!group.update(&mut player));
        assert!(player.alive);
    }
}
