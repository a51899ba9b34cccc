//! Visual effects that live outside the entity graph: background motes,
//! text particles, explosions and the screen fade.

pub mod background;
pub mod explosion;
pub mod particles;
pub mod transition;

pub use background::BackgroundEffect;
pub use explosion::ExplosionManager;
pub use particles::{Particle, ParticleKind, ParticleManager};
pub use transition::{FadeState, FadeTransition};
