//! Things the player touches or clicks: checkpoints, portals, notes and the
//! sound icon.

pub mod checkpoint;
pub mod note;
pub mod portal;
pub mod sound_icon;

pub use checkpoint::{Checkpoint, CHECKPOINT_ASSET};
pub use note::{Note, NOTE_ASSET};
pub use portal::{Portal, PORTAL_ASSET};
pub use sound_icon::{SoundIcon, SOUND_ICON_ASSET};
