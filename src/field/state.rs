//! Field state shared by the frame renderer and the transition controller

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which part of the page currently owns the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Wave field is animating every frame
    #[default]
    Animating,
    /// Particles are rushing to the center; the frame loop is stopped
    Collapsing,
    /// Terminal panel is shown (revealing or finished)
    Terminal,
}

/// Drawing surface dimensions in px
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Center of the surface
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Page-session state for the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldState {
    /// Animation time; advances only while animating
    pub time: f32,
    /// Last known pointer position (surface coordinates)
    pub pointer: Vec2,
    pub mode: Mode,
    /// Terminal cursor visibility (toggled by the blink timer)
    pub cursor_visible: bool,
    /// `None` until mounted and after teardown
    pub surface: Option<SurfaceSize>,
}

impl FieldState {
    pub fn new() -> Self {
        Self {
            cursor_visible: true,
            ..Default::default()
        }
    }

    /// Center of the attached surface
    pub fn center(&self) -> Option<Vec2> {
        self.surface.map(|s| s.center())
    }

    pub fn is_animating(&self) -> bool {
        self.mode == Mode::Animating
    }
}
