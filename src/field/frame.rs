//! One animation frame of the wave field
//!
//! Order matters: fade, particles, label, scanlines. The fade leaves the
//! previous frame partly visible, which is what produces the trails.

use glam::Vec2;
use rand::Rng;

use super::grid::{Particle, ParticleGrid, random_glyph};
use super::noise::noise;
use super::state::FieldState;
use crate::consts::*;
use crate::renderer::{DrawList, Rgba, colors};
use crate::settings::{Settings, Tuning};
use crate::{distance, grey_level};

/// Pointer influence: 1 at the pointer, falling linearly to 0 at `radius`
#[inline]
pub fn pointer_influence(dist: f32, radius: f32) -> f32 {
    (1.0 - dist / radius).max(0.0)
}

/// Offset applied to a particle at `base` by the pointer (points away from it)
#[inline]
pub fn repulsion(base: Vec2, pointer: Vec2, radius: f32, strength: f32) -> Vec2 {
    let to_pointer = pointer - base;
    let influence = pointer_influence(to_pointer.length(), radius);
    -(to_pointer * influence * strength)
}

/// Where a particle is drawn this frame and how bright
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub pos: Vec2,
    pub brightness: f32,
}

/// Displace a particle from its anchor
pub fn displace(p: &Particle, center: Vec2, pointer: Vec2, time: f32, tuning: &Tuning) -> Displacement {
    let dist_from_center = distance(p.base, center);
    let influence = pointer_influence(distance(pointer, p.base), tuning.pointer_radius);

    let ripple =
        (dist_from_center * RIPPLE_FREQUENCY - time * RIPPLE_SPEED).sin() * RIPPLE_AMPLITUDE;
    let n = noise(p.base.x, p.base.y, time * NOISE_TIME_SCALE);

    let angle = p.phase + time * p.speed;
    let orbit = Vec2::new(angle.cos(), angle.sin()) * (ORBIT_RADIUS + ripple * ORBIT_RIPPLE_GAIN);
    let push = repulsion(p.base, pointer, tuning.pointer_radius, tuning.pointer_strength);

    let pos = p.base + orbit + Vec2::splat(n * NOISE_GAIN) + push;

    let brightness = BRIGHTNESS_BASE
        + (dist_from_center * BRIGHTNESS_WAVE_FREQUENCY - time).sin() * BRIGHTNESS_WAVE
        + influence * BRIGHTNESS_POINTER
        + n.abs() * BRIGHTNESS_NOISE;

    Displacement { pos, brightness }
}

/// Label alpha at `time`
#[inline]
pub fn label_pulse(time: f32) -> f32 {
    LABEL_PULSE_BASE + (time * LABEL_PULSE_SPEED).sin() * LABEL_PULSE_AMPLITUDE
}

/// Draw one frame of the field into `out`
///
/// Emits nothing unless the field is animating on an attached surface.
pub fn render_frame<R: Rng + ?Sized>(
    grid: &mut ParticleGrid,
    state: &FieldState,
    settings: &Settings,
    rng: &mut R,
    out: &mut DrawList,
) {
    let Some(surface) = state.surface else {
        return;
    };
    if !state.is_animating() {
        return;
    }

    let tuning = &settings.tuning;
    let (w, h) = (surface.width as f32, surface.height as f32);
    let center = surface.center();
    let time = state.time;

    // Trail fade
    out.fill_rect(0.0, 0.0, w, h, colors::fade(tuning.trail_alpha));

    for p in grid.iter_mut() {
        let d = displace(p, center, state.pointer, time, tuning);
        p.pos = d.pos;

        if rng.random_bool(tuning.glyph_change_chance) {
            p.glyph = random_glyph(rng);
        }

        out.glyph(p.glyph, p.pos, Rgba::grey(grey_level(d.brightness)));
    }

    out.label(&tuning.label, center, colors::white(label_pulse(time)));

    if settings.scanlines {
        for y in (0..surface.height).step_by(SCANLINE_SPACING as usize) {
            out.fill_rect(0.0, y as f32, w, 1.0, colors::SCANLINE);
        }
    }

    if settings.effective_glitch() && rng.random_bool(tuning.glitch_chance) {
        let y = rng.random_range(0.0..h.max(1.0));
        out.fill_rect(0.0, y, w, GLITCH_HEIGHT, colors::GLITCH);
    }
}
