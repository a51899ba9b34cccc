pub mod camera;
pub mod surface;

pub use camera::Camera;
pub use surface::{alpha_u8, Color, DrawCommand, DrawList, DrawSection, BLACK, TEXT_COLOR};
