//! Glyph Field - an ASCII wave field that collapses into a terminal
//!
//! Core modules:
//! - `field`: Deterministic animation core (noise, particle grid, frame, transitions)
//! - `landing`: Orchestrator the platform shell drives
//! - `renderer`: Draw commands and surfaces (canvas on web, character grid on native)
//! - `content`: Terminal panel text and its linked version
//! - `settings`: Tuning constants and persisted preferences

pub mod content;
pub mod field;
pub mod landing;
pub mod renderer;
pub mod settings;

pub use content::TerminalContent;
pub use landing::Landing;
pub use settings::{Settings, Tuning};

use glam::Vec2;

/// Default tuning constants
///
/// These are hand-tuned aesthetics. `Tuning::default()` is built from them;
/// the ones without a `Tuning` field are fixed parts of the look.
pub mod consts {
    /// Grid spacing between particle anchors (px)
    pub const GRID_SPACING: u32 = 25;
    /// Largest grid spacing settings may ask for (px)
    pub const GRID_SPACING_MAX: u32 = 1024;
    /// Speed range for per-particle orbit rate
    pub const SPEED_MIN: f32 = 0.5;
    pub const SPEED_MAX: f32 = 2.0;

    /// Animation time added per frame (not wall-clock)
    pub const TIME_STEP: f32 = 0.016;
    /// Alpha of the black rectangle that fades the previous frame
    pub const TRAIL_ALPHA: f32 = 0.15;

    /// Pointer repulsion falls to zero at this distance (px)
    pub const POINTER_RADIUS: f32 = 250.0;
    /// Fraction of the particle→pointer vector subtracted at full influence
    pub const POINTER_STRENGTH: f32 = 0.3;

    /// Radial ripple from the center
    pub const RIPPLE_FREQUENCY: f32 = 0.02;
    pub const RIPPLE_SPEED: f32 = 2.0;
    pub const RIPPLE_AMPLITUDE: f32 = 20.0;

    /// Orbit radius around the anchor, plus ripple contribution
    pub const ORBIT_RADIUS: f32 = 10.0;
    pub const ORBIT_RIPPLE_GAIN: f32 = 0.5;

    /// Noise is sampled at `time * NOISE_TIME_SCALE` and scaled by `NOISE_GAIN`
    pub const NOISE_TIME_SCALE: f32 = 0.5;
    pub const NOISE_GAIN: f32 = 15.0;

    /// Greyscale palette
    pub const BRIGHTNESS_BASE: f32 = 0.3;
    pub const BRIGHTNESS_WAVE: f32 = 0.2;
    pub const BRIGHTNESS_WAVE_FREQUENCY: f32 = 0.01;
    pub const BRIGHTNESS_POINTER: f32 = 0.5;
    pub const BRIGHTNESS_NOISE: f32 = 0.2;

    /// Per-particle, per-frame chance of picking a new glyph
    pub const GLYPH_CHANGE_CHANCE: f64 = 0.005;

    /// Center label
    pub const LABEL_TEXT: &str = "[ click ]";
    pub const LABEL_PULSE_BASE: f32 = 0.4;
    pub const LABEL_PULSE_AMPLITUDE: f32 = 0.3;
    pub const LABEL_PULSE_SPEED: f32 = 2.0;

    /// Scanlines every N px, and a rare bright glitch line
    pub const SCANLINE_SPACING: u32 = 3;
    pub const SCANLINE_ALPHA: f32 = 0.03;
    pub const GLITCH_CHANCE: f64 = 0.02;
    pub const GLITCH_ALPHA: f32 = 0.1;
    pub const GLITCH_HEIGHT: f32 = 2.0;

    /// Collapse: fixed number of steps, each easing this fraction toward center
    pub const COLLAPSE_STEPS: u32 = 40;
    pub const COLLAPSE_EASE: f32 = 0.08;
    /// Ease must stay below 1 so every step leaves some distance to cover
    pub const COLLAPSE_EASE_MAX: f32 = 0.99;
    pub const COLLAPSE_STEP_MS: u32 = 16;
    /// Collapse grey = min(255, distance * gain)
    pub const COLLAPSE_BRIGHTNESS_GAIN: f32 = 0.5;

    /// Terminal reveal: one char per step
    pub const REVEAL_CHAR_MS: u32 = 25;
    /// Cursor blink interval
    pub const CURSOR_BLINK_MS: u32 = 530;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Map a brightness in [0, 1] to an 8-bit grey level (clamped)
#[inline]
pub fn grey_level(brightness: f32) -> u8 {
    (brightness.clamp(0.0, 1.0) * 255.0).floor() as u8
}
