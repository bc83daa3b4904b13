//! Wave field animation core
//!
//! Everything that decides what is drawn lives here. This module must stay
//! free of platform dependencies:
//! - Seeded RNG only (passed in by the caller)
//! - Fixed animation time step, never wall-clock time
//! - Output goes to a `DrawList`, never to a canvas

pub mod frame;
pub mod grid;
pub mod noise;
pub mod reveal;
pub mod state;
pub mod transition;

pub use frame::{Displacement, displace, pointer_influence, render_frame, repulsion};
pub use grid::{GLYPHS, Particle, ParticleGrid, random_glyph};
pub use noise::noise;
pub use reveal::TextReveal;
pub use state::{FieldState, Mode, SurfaceSize};
pub use transition::{Step, ToggleOutcome, ToggleSource, TransitionController, collapse_step};
