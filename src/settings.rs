//! Field tuning and display preferences
//!
//! Read from LocalStorage when present. The OS reduced-motion preference is
//! layered on top at load time.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Hand-tuned aesthetic constants
///
/// Every field defaults to the matching value in [`crate::consts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance between grid anchors (px)
    pub grid_spacing: u32,
    /// Animation time added per frame
    pub time_step: f32,
    /// Alpha of the per-frame fade rectangle
    pub trail_alpha: f32,
    /// Pointer influence radius (px)
    pub pointer_radius: f32,
    /// Pointer repulsion scale
    pub pointer_strength: f32,
    /// Per-particle chance of a glyph swap each frame
    pub glyph_change_chance: f64,
    /// Per-frame chance of a glitch line
    pub glitch_chance: f64,
    /// Number of collapse steps before the terminal shows
    pub collapse_steps: u32,
    /// Fraction of the remaining distance covered per collapse step
    pub collapse_ease: f32,
    /// Delay between collapse steps (ms)
    pub collapse_step_ms: u32,
    /// Delay between revealed characters (ms)
    pub reveal_char_ms: u32,
    /// Cursor blink interval (ms)
    pub cursor_blink_ms: u32,
    /// Label pulsing at the center of the field
    pub label: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_spacing: GRID_SPACING,
            time_step: TIME_STEP,
            trail_alpha: TRAIL_ALPHA,
            pointer_radius: POINTER_RADIUS,
            pointer_strength: POINTER_STRENGTH,
            glyph_change_chance: GLYPH_CHANGE_CHANCE,
            glitch_chance: GLITCH_CHANCE,
            collapse_steps: COLLAPSE_STEPS,
            collapse_ease: COLLAPSE_EASE,
            collapse_step_ms: COLLAPSE_STEP_MS,
            reveal_char_ms: REVEAL_CHAR_MS,
            cursor_blink_ms: CURSOR_BLINK_MS,
            label: LABEL_TEXT.to_string(),
        }
    }
}

impl Tuning {
    /// Clamp values that would stall or break the field
    pub fn sanitized(mut self) -> Self {
        self.grid_spacing = self.grid_spacing.clamp(1, GRID_SPACING_MAX);
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            self.time_step = TIME_STEP;
        }
        self.pointer_radius = self.pointer_radius.max(f32::EPSILON);
        self.collapse_ease = if self.collapse_ease.is_finite() {
            self.collapse_ease.clamp(f32::EPSILON, COLLAPSE_EASE_MAX)
        } else {
            COLLAPSE_EASE
        };
        self.glyph_change_chance = self.glyph_change_chance.clamp(0.0, 1.0);
        self.glitch_chance = self.glitch_chance.clamp(0.0, 1.0);
        self
    }
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,

    // === Overlays ===
    /// Faint horizontal scanlines over the field
    pub scanlines: bool,
    /// Occasional bright glitch line
    pub glitch: bool,

    // === Accessibility ===
    /// Reduced motion (no glitch flashes)
    pub reduced_motion: bool,

    /// Font family for glyphs and the label
    pub font_family: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            scanlines: true,
            glitch: true,
            reduced_motion: false,
            font_family: "JetBrains Mono".to_string(),
        }
    }
}

impl Settings {
    /// Effective glitch line (respects reduced_motion)
    pub fn effective_glitch(&self) -> bool {
        self.glitch && !self.reduced_motion
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.tuning = settings.tuning.sanitized();
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                Self::default()
            }
        }
    }

    /// Turn reduced motion on when the system asks for it
    ///
    /// A stored `reduced_motion: true` is never turned back off.
    pub fn with_system_reduced_motion(mut self, prefers_reduced: bool) -> Self {
        self.reduced_motion |= prefers_reduced;
        self
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "glyph_field_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let settings = match storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };
        settings.with_system_reduced_motion(Self::system_prefers_reduced_motion())
    }

    #[cfg(target_arch = "wasm32")]
    fn system_prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|query| query.matches())
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
