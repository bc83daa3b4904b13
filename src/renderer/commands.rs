//! Draw commands for 2D surfaces
//!
//! The field never touches a canvas directly; it appends commands to a
//! [`DrawList`] and a [`super::Surface`] replays them.

use glam::Vec2;
use std::fmt;

/// 8-bit RGB color with float alpha (CSS `rgba()` semantics)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey with equal channels
    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level, 1.0)
    }
}

impl fmt::Display for Rgba {
    /// CSS color string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Fonts used by the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Particle glyphs
    Glyph,
    /// Center label
    Label,
}

impl Font {
    /// Pixel size
    pub fn size(&self) -> u32 {
        match self {
            Font::Glyph => 14,
            Font::Label => 16,
        }
    }

    /// CSS font shorthand for the given family
    pub fn css(&self, family: &str) -> String {
        format!("{}px {}", self.size(), family)
    }
}

/// Horizontal anchor of a text command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled axis-aligned rectangle
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Rgba,
    },
    /// Text with its baseline anchored at `pos`
    Text {
        text: TextRun,
        pos: Vec2,
        font: Font,
        align: TextAlign,
        color: Rgba,
    },
}

/// Text payload; glyphs are the common case and stay allocation-free
#[derive(Debug, Clone, PartialEq)]
pub enum TextRun {
    Glyph(char),
    Label(String),
}

impl TextRun {
    /// Borrow as `&str`, using `buf` for single glyphs
    pub fn as_str<'a>(&'a self, buf: &'a mut [u8; 4]) -> &'a str {
        match self {
            TextRun::Glyph(c) => c.encode_utf8(buf),
            TextRun::Label(s) => s,
        }
    }
}

/// Ordered list of commands for one frame or one transition step
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        });
    }

    pub fn glyph(&mut self, glyph: char, pos: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: TextRun::Glyph(glyph),
            pos,
            font: Font::Glyph,
            align: TextAlign::Left,
            color,
        });
    }

    pub fn label(&mut self, text: &str, pos: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: TextRun::Label(text.to_string()),
            pos,
            font: Font::Label,
            align: TextAlign::Center,
            color,
        });
    }

    /// Number of text commands
    pub fn text_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count()
    }
}

/// Colors for field elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const SCANLINE: Rgba = Rgba::new(0, 0, 0, crate::consts::SCANLINE_ALPHA);
    pub const GLITCH: Rgba = Rgba::new(255, 255, 255, crate::consts::GLITCH_ALPHA);

    /// Black at the given alpha (trail fade)
    pub const fn fade(alpha: f32) -> Rgba {
        Rgba::new(0, 0, 0, alpha)
    }

    /// White at the given alpha (pulsing label)
    pub const fn white(alpha: f32) -> Rgba {
        Rgba::new(255, 255, 255, alpha)
    }
}
