use glam::Vec2;

use rift_core::geom::Rect;
use rift_render::{Camera, Color, DrawList};

const MOTE_COUNT: usize = 24;
const MOTE_COLOR: Color = [120, 110, 160];
/// Motes scroll slower than the world to read as distant.
const PARALLAX: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
struct Mote {
    pos: Vec2,
    speed: f32,
    size: f32,
}

/// Dimension-colored backdrop with slow rising motes.
#[derive(Debug, Clone)]
pub struct BackgroundEffect {
    size: Vec2,
    motes: Vec<Mote>,
}

impl BackgroundEffect {
    pub fn new(viewport: (u32, u32)) -> Self {
        let size = Vec2::new(viewport.0 as f32, viewport.1 as f32);
        let mut seed: u32 = 0x5eed_1234;
        let motes = (0..MOTE_COUNT)
            .map(|_| {
                let x = next_unit(&mut seed) * size.x;
                let y = next_unit(&mut seed) * size.y;
                Mote {
                    pos: Vec2::new(x, y),
                    speed: 4.0 + next_unit(&mut seed) * 10.0,
                    size: if next_unit(&mut seed) > 0.7 { 2.0 } else { 1.0 },
                }
            })
            .collect();
        Self { size, motes }
    }

    pub fn update(&mut self, dt: f32) {
        for mote in &mut self.motes {
            mote.pos.y -= mote.speed * dt;
            if mote.pos.y < 0.0 {
                mote.pos.y += self.size.y;
            }
        }
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera, clear: Color) {
        surface.fill(clear);
        let shift = camera.offset * PARALLAX;
        for mote in &self.motes {
            let x = (mote.pos.x - shift.x).rem_euclid(self.size.x);
            let y = (mote.pos.y - shift.y).rem_euclid(self.size.y);
            surface.rect(Rect::new(x, y, mote.size, mote.size), MOTE_COLOR, 160);
        }
    }
}

/// Small LCG so the backdrop is identical on every run.
fn next_unit(seed: &mut u32) -> f32 {
    *seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    (*seed >> 8) as f32 / (1u32 << 24) as f32
}
