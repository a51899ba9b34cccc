//! Engine-agnostic building blocks shared by the level pipeline and the game
//! binary: geometry, the dimension enum, per-frame input bundles, animation
//! ticking, and the loaders for settings, asset bundles and save data.

pub mod animation;
pub mod assets;
pub mod dimension;
pub mod geom;
pub mod input;
pub mod save;
pub mod settings;
