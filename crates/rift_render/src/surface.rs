//! Backend-agnostic frame surface.
//!
//! Draw passes append [`DrawCommand`]s to a [`DrawList`] in paint order
//! (later commands cover earlier ones). The list also records labelled
//! sections, one per pipeline stage that drew, so a backend can profile per
//! stage and tests can assert the stage paint order without caring what each
//! stage emitted.

use glam::Vec2;
use rift_core::geom::Rect;

pub type Color = [u8; 3];

pub const BLACK: Color = [0, 0, 0];
pub const TEXT_COLOR: Color = [218, 224, 234];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { color: Color },
    /// One cell of a sprite sheet, in screen space.
    Sprite {
        asset: String,
        frame: usize,
        dest: Rect,
        flip_x: bool,
        alpha: u8,
    },
    /// A baked tile surface blitted with its top-left at `origin`.
    Tiles {
        tileset: String,
        origin: Vec2,
        tile_count: usize,
    },
    Rect { rect: Rect, color: Color, alpha: u8 },
    Text {
        text: String,
        pos: Vec2,
        size: u32,
        color: Color,
        alpha: u8,
    },
}

/// A contiguous run of commands emitted under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSection {
    pub label: &'static str,
    pub command_start: usize,
    pub command_count: usize,
}

#[derive(Debug, Clone)]
pub struct DrawList {
    size: (u32, u32),
    commands: Vec<DrawCommand>,
    sections: Vec<DrawSection>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            commands: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.0 as f32, self.size.1 as f32)
    }

    /// Drop everything recorded for the previous frame.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.sections.clear();
    }

    /// Start a labelled section. Re-opening the label that is already open
    /// continues it instead of starting a new one.
    pub fn begin_section(&mut self, label: &'static str) {
        if let Some(last) = self.sections.last() {
            let open = last.command_start + last.command_count == self.commands.len();
            if last.label == label && open {
                return;
            }
        }
        self.sections.push(DrawSection {
            label,
            command_start: self.commands.len(),
            command_count: 0,
        });
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
        if let Some(last) = self.sections.last_mut() {
            last.command_count += 1;
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.push(DrawCommand::Clear { color });
    }

    pub fn rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        self.push(DrawCommand::Rect { rect, color, alpha });
    }

    pub fn text(&mut self, text: &str, pos: Vec2, size: u32, color: Color, alpha: u8) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
            alpha,
        });
    }

    pub fn sprite(&mut self, asset: &str, frame: usize, dest: Rect, flip_x: bool, alpha: u8) {
        self.push(DrawCommand::Sprite {
            asset: asset.to_string(),
            frame,
            dest,
            flip_x,
            alpha,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn sections(&self) -> &[DrawSection] {
        &self.sections
    }

    pub fn section_labels(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.label).collect()
    }

    /// Commands of the first section with `label`, or an empty slice.
    pub fn section(&self, label: &str) -> &[DrawCommand] {
        match self.sections.iter().find(|s| s.label == label) {
            Some(s) => &self.commands[s.command_start..s.command_start + s.command_count],
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Convert a floating alpha (0..=255) into a command alpha.
pub fn alpha_u8(alpha: f32) -> u8 {
    alpha.clamp(0.0, 255.0).round() as u8
}
