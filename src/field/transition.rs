//! Mode switching: collapse into the center, reveal the terminal, restore
//!
//! The controller is a step sequencer. The shell calls [`TransitionController::advance`]
//! and schedules the next call after the returned delay; tests call it in a loop.
//! Only one sequence runs at a time and toggles during a sequence are dropped.

use glam::Vec2;
use std::time::Duration;

use super::grid::ParticleGrid;
use super::reveal::TextReveal;
use super::state::{FieldState, Mode, SurfaceSize};
use crate::consts::COLLAPSE_BRIGHTNESS_GAIN;
use crate::renderer::{DrawList, Rgba, colors};
use crate::settings::Tuning;

/// Where a toggle request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    /// Click anywhere on the page
    Click,
    /// Space bar (only honored while the terminal is shown)
    Space,
}

/// What the shell has to do after a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Request dropped (sequence in flight, or not valid in this mode)
    Ignored,
    /// Stop the frame loop and start calling `advance`
    Collapse,
    /// Grid rebuilt; resume the frame loop
    Restore,
}

/// Result of advancing the in-flight sequence by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Call `advance` again after this delay
    Wait(Duration),
    /// Nothing left to run
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sequence {
    Idle,
    Collapse { step: u32, center: Vec2 },
    Reveal,
}

/// Drives the collapse, reveal and restore transitions
#[derive(Debug, Clone)]
pub struct TransitionController {
    sequence: Sequence,
    reveal: TextReveal,
}

impl TransitionController {
    /// Controller revealing `text` in terminal mode
    pub fn new(text: &str) -> Self {
        Self {
            sequence: Sequence::Idle,
            reveal: TextReveal::new(text),
        }
    }

    /// A collapse or reveal is in flight
    pub fn is_busy(&self) -> bool {
        self.sequence != Sequence::Idle
    }

    /// Completed collapse steps (0 outside a collapse)
    pub fn collapse_step(&self) -> u32 {
        match self.sequence {
            Sequence::Collapse { step, .. } => step,
            _ => 0,
        }
    }

    /// Terminal reveal buffer and finished flag
    pub fn reveal(&self) -> &TextReveal {
        &self.reveal
    }

    /// Handle a toggle request
    ///
    /// On [`ToggleOutcome::Restore`] the caller rebuilds the particle grid.
    pub fn request_toggle(&mut self, source: ToggleSource, state: &mut FieldState) -> ToggleOutcome {
        if self.is_busy() {
            log::debug!("Toggle ({:?}) ignored: transition in flight", source);
            return ToggleOutcome::Ignored;
        }
        if source == ToggleSource::Space && state.mode != Mode::Terminal {
            return ToggleOutcome::Ignored;
        }

        match state.mode {
            Mode::Animating => {
                let center = state.center().unwrap_or(Vec2::ZERO);
                self.sequence = Sequence::Collapse { step: 0, center };
                state.mode = Mode::Collapsing;
                ToggleOutcome::Collapse
            }
            Mode::Terminal => {
                self.reveal.reset();
                state.mode = Mode::Animating;
                ToggleOutcome::Restore
            }
            // Collapsing always has a sequence in flight
            Mode::Collapsing => ToggleOutcome::Ignored,
        }
    }

    /// Run one step of the in-flight sequence
    pub fn advance(
        &mut self,
        state: &mut FieldState,
        grid: &mut ParticleGrid,
        tuning: &Tuning,
        out: &mut DrawList,
    ) -> Step {
        match self.sequence {
            Sequence::Idle => Step::Done,
            Sequence::Collapse { step, center } => {
                let draw = state.surface.map(|surface| (surface, &mut *out));
                collapse_step(grid, center, tuning, draw);

                let step = step + 1;
                if step >= tuning.collapse_steps {
                    state.mode = Mode::Terminal;
                    self.reveal.reset();
                    self.sequence = Sequence::Reveal;
                    log::info!("Collapse finished, revealing terminal");
                } else {
                    self.sequence = Sequence::Collapse { step, center };
                }
                Step::Wait(Duration::from_millis(tuning.collapse_step_ms as u64))
            }
            Sequence::Reveal => {
                if self.reveal.step() && !self.reveal.is_finished() {
                    Step::Wait(Duration::from_millis(tuning.reveal_char_ms as u64))
                } else {
                    self.sequence = Sequence::Idle;
                    Step::Done
                }
            }
        }
    }
}

/// Ease every particle toward `center` and draw it, if a surface is given
///
/// Grey comes from the distance left before the move, so particles darken as
/// they converge.
pub fn collapse_step(
    grid: &mut ParticleGrid,
    center: Vec2,
    tuning: &Tuning,
    mut draw: Option<(SurfaceSize, &mut DrawList)>,
) {
    if let Some((surface, out)) = draw.as_mut() {
        out.fill_rect(
            0.0,
            0.0,
            surface.width as f32,
            surface.height as f32,
            colors::fade(tuning.trail_alpha),
        );
    }

    for p in grid.iter_mut() {
        let offset = center - p.pos;
        p.pos += offset * tuning.collapse_ease;

        if let Some((_, out)) = draw.as_mut() {
            let grey = (offset.length() * COLLAPSE_BRIGHTNESS_GAIN).min(255.0).round() as u8;
            out.glyph(p.glyph, p.pos, Rgba::grey(grey));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const TEXT: &str = "> hello\n[ space ]";

    fn setup() -> (TransitionController, FieldState, ParticleGrid) {
        let mut rng = Pcg32::seed_from_u64(11);
        let state = FieldState {
            surface: Some(SurfaceSize::new(200, 100)),
            ..FieldState::new()
        };
        let grid = ParticleGrid::build(200, 100, 25, &mut rng);
        (TransitionController::new(TEXT), state, grid)
    }

    fn run_collapse(
        ctl: &mut TransitionController,
        state: &mut FieldState,
        grid: &mut ParticleGrid,
        tuning: &Tuning,
    ) {
        let mut out = DrawList::new();
        for _ in 0..tuning.collapse_steps {
            assert_eq!(state.mode, Mode::Collapsing);
            let step = ctl.advance(state, grid, tuning, &mut out);
            assert_eq!(step, Step::Wait(Duration::from_millis(16)));
        }
    }

    #[test]
    fn test_full_cycle() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();

        assert_eq!(ctl.request_toggle(ToggleSource::Click, &mut state), ToggleOutcome::Collapse);
        assert_eq!(state.mode, Mode::Collapsing);
        assert!(ctl.is_busy());

        run_collapse(&mut ctl, &mut state, &mut grid, &tuning);
        assert_eq!(state.mode, Mode::Terminal);
        assert_eq!(ctl.reveal().buffer(), "");

        let n = TEXT.chars().count();
        let mut out = DrawList::new();
        for i in 1..=n {
            let step = ctl.advance(&mut state, &mut grid, &tuning, &mut out);
            assert_eq!(ctl.reveal().buffer().chars().count(), i);
            if i < n {
                assert_eq!(step, Step::Wait(Duration::from_millis(25)));
                assert!(!ctl.reveal().is_finished());
            } else {
                assert_eq!(step, Step::Done);
            }
        }
        // Reveal draws nothing on the canvas
        assert!(out.is_empty());
        assert!(ctl.reveal().is_finished());
        assert_eq!(ctl.reveal().buffer(), TEXT);
        assert!(!ctl.is_busy());

        assert_eq!(ctl.request_toggle(ToggleSource::Space, &mut state), ToggleOutcome::Restore);
        assert_eq!(state.mode, Mode::Animating);
        assert_eq!(ctl.reveal().buffer(), "");
        assert!(!ctl.reveal().is_finished());
    }

    #[test]
    fn test_toggle_ignored_while_collapsing() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();
        let mut out = DrawList::new();

        ctl.request_toggle(ToggleSource::Click, &mut state);
        ctl.advance(&mut state, &mut grid, &tuning, &mut out);
        ctl.advance(&mut state, &mut grid, &tuning, &mut out);

        assert_eq!(ctl.request_toggle(ToggleSource::Click, &mut state), ToggleOutcome::Ignored);
        assert_eq!(ctl.request_toggle(ToggleSource::Space, &mut state), ToggleOutcome::Ignored);
        assert_eq!(state.mode, Mode::Collapsing);
        assert_eq!(ctl.collapse_step(), 2);
    }

    #[test]
    fn test_toggle_ignored_while_revealing() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();
        let mut out = DrawList::new();

        ctl.request_toggle(ToggleSource::Click, &mut state);
        run_collapse(&mut ctl, &mut state, &mut grid, &tuning);
        ctl.advance(&mut state, &mut grid, &tuning, &mut out);
        ctl.advance(&mut state, &mut grid, &tuning, &mut out);

        assert_eq!(ctl.request_toggle(ToggleSource::Space, &mut state), ToggleOutcome::Ignored);
        assert_eq!(ctl.request_toggle(ToggleSource::Click, &mut state), ToggleOutcome::Ignored);
        assert_eq!(state.mode, Mode::Terminal);
        assert_eq!(ctl.reveal().buffer(), "> ");
    }

    #[test]
    fn test_space_ignored_while_animating() {
        let (mut ctl, mut state, _) = setup();
        assert_eq!(ctl.request_toggle(ToggleSource::Space, &mut state), ToggleOutcome::Ignored);
        assert_eq!(state.mode, Mode::Animating);
        assert!(!ctl.is_busy());
    }

    #[test]
    fn test_advance_idle_is_done() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();
        let mut out = DrawList::new();
        assert_eq!(ctl.advance(&mut state, &mut grid, &tuning, &mut out), Step::Done);
        assert!(out.is_empty());
    }

    #[test]
    fn test_collapse_without_surface_draws_nothing() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();
        ctl.request_toggle(ToggleSource::Click, &mut state);
        state.surface = None;

        let mut out = DrawList::new();
        for _ in 0..tuning.collapse_steps {
            ctl.advance(&mut state, &mut grid, &tuning, &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(state.mode, Mode::Terminal);
    }

    #[test]
    fn test_collapse_draws_fade_then_glyphs() {
        let tuning = Tuning::default();
        let (mut ctl, mut state, mut grid) = setup();
        let mut out = DrawList::new();
        ctl.request_toggle(ToggleSource::Click, &mut state);
        ctl.advance(&mut state, &mut grid, &tuning, &mut out);

        assert_eq!(out.len(), 1 + grid.len());
        assert_eq!(out.text_count(), grid.len());
    }

    #[test]
    fn test_collapse_grey_rounds() {
        let tuning = Tuning::default();
        let base = Vec2::new(13.0, 10.0);
        let mut grid = ParticleGrid::default();
        grid.particles.push(crate::field::grid::Particle {
            base,
            pos: base,
            glyph: '█',
            phase: 0.0,
            speed: 1.0,
        });

        // Distance 3 gives a grey of 1.5
        let mut out = DrawList::new();
        let surface = SurfaceSize::new(20, 20);
        collapse_step(&mut grid, Vec2::new(10.0, 10.0), &tuning, Some((surface, &mut out)));
        let grey = out.iter().find_map(|cmd| match cmd {
            crate::renderer::DrawCommand::Text { color, .. } => Some(color.r),
            _ => None,
        });
        assert_eq!(grey, Some(2));
    }

    proptest! {
        #[test]
        fn collapse_moves_strictly_closer(
            points in prop::collection::vec((0.0f32..2000.0, 0.0f32..1500.0), 1..50),
            cx in 0.0f32..1000.0,
            cy in 0.0f32..800.0,
        ) {
            let tuning = Tuning::default();
            let center = Vec2::new(cx, cy);
            let mut grid = ParticleGrid::default();
            for (x, y) in points {
                let base = Vec2::new(x, y);
                prop_assume!(base.distance(center) >= 1.0);
                grid.particles.push(crate::field::grid::Particle {
                    base,
                    pos: base,
                    glyph: '█',
                    phase: 0.0,
                    speed: 1.0,
                });
            }

            for _ in 0..tuning.collapse_steps {
                let before: Vec<f32> = grid.iter().map(|p| p.pos.distance(center)).collect();
                collapse_step(&mut grid, center, &tuning, None);
                for (p, d) in grid.iter().zip(before) {
                    prop_assert!(p.pos.distance(center) < d);
                }
            }
        }
    }
}
