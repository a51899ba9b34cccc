//! The dimension-switching platformer level: tile map, entities, effects,
//! and the stage table that updates and draws them in a fixed order.

pub mod config;
pub mod effects;
pub mod enemy;
pub mod interactables;
pub mod level;
pub mod player;
pub mod sfx;
pub mod special_tiles;
pub mod stages;
pub mod tilemap;
pub mod ui;
pub mod world;

pub use config::{load_level_config, LevelConfig};
pub use level::Level;
pub use world::{GameStateId, LevelData, LevelWorld, SwitchInfo};
