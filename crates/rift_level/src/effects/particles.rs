use glam::Vec2;

use rift_render::{alpha_u8, Camera, Color, DrawList, TEXT_COLOR};

const TEXT_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleKind {
    Text { text: String, size: u32, color: Color },
    Spark { size: f32, color: Color },
}

/// A short-lived effect. Everything advances once per tick, independent of
/// frame time, and the particle expires when `lifespan` reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alpha: f32,
    pub alpha_speed: f32,
    pub lifespan: i32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn text(text: &str, pos: Vec2, vel: Vec2, alpha_speed: f32, lifespan: i32) -> Self {
        Self {
            pos,
            vel,
            alpha: 255.0,
            alpha_speed,
            lifespan,
            kind: ParticleKind::Text {
                text: text.to_string(),
                size: TEXT_SIZE,
                color: TEXT_COLOR,
            },
        }
    }

    pub fn spark(pos: Vec2, vel: Vec2, size: f32, color: Color, lifespan: i32) -> Self {
        Self {
            pos,
            vel,
            alpha: 255.0,
            alpha_speed: 255.0 / lifespan.max(1) as f32,
            lifespan,
            kind: ParticleKind::Spark { size, color },
        }
    }

    fn tick(&mut self) {
        self.pos += self.vel;
        self.alpha = (self.alpha - self.alpha_speed).max(0.0);
        self.lifespan -= 1;
    }

    pub fn is_alive(&self) -> bool {
        self.lifespan > 0
    }

    fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        let screen = camera.apply(self.pos);
        let alpha = alpha_u8(self.alpha);
        match &self.kind {
            ParticleKind::Text { text, size, color } => {
                // Text particles are anchored at their center.
                let half_width = text.chars().count() as f32 * *size as f32 * 0.25;
                let pos = screen - Vec2::new(half_width, *size as f32 * 0.5);
                surface.text(text, pos, *size, *color, alpha);
            }
            ParticleKind::Spark { size, color } => {
                let rect = rift_core::geom::Rect::from_center(screen, *size, *size);
                surface.rect(rect, *color, alpha);
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParticleManager {
    particles: Vec<Particle>,
}

impl ParticleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advance every particle one tick and drop the expired ones.
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.tick();
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn draw(&self, surface: &mut DrawList, camera: &Camera) {
        for particle in &self.particles {
            particle.draw(surface, camera);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.particles.iter().filter_map(|p| match &p.kind {
            ParticleKind::Text { text, .. } => Some(text.as_str()),
            ParticleKind::Spark { .. } => None,
        })
    }
}
