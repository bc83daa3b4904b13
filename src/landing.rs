//! Landing page core
//!
//! Owns the field state, the particle grid, the transition controller and
//! the seeded RNG. The platform shell forwards events here and presents
//! whatever `DrawList` comes back.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::content::TerminalContent;
use crate::field::{
    FieldState, Mode, ParticleGrid, Step, SurfaceSize, ToggleOutcome, ToggleSource,
    TransitionController, render_frame,
};
use crate::renderer::DrawList;
use crate::settings::Settings;

/// What the terminal panel should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display<'a> {
    /// Canvas owns the screen
    Hidden,
    /// Plain text typed so far
    Revealing(&'a str),
    /// Reveal done; show the linked version
    Finished(String),
}

/// Everything the page needs between events
pub struct Landing {
    settings: Settings,
    content: TerminalContent,
    state: FieldState,
    grid: ParticleGrid,
    transition: TransitionController,
    rng: Pcg32,
}

impl Landing {
    pub fn new(settings: Settings, content: TerminalContent, seed: u64) -> Self {
        let transition = TransitionController::new(&content.plain_text());
        Self {
            settings,
            content,
            state: FieldState::new(),
            grid: ParticleGrid::default(),
            transition,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Default settings and content
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Settings::default(), TerminalContent::default(), seed)
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn content(&self) -> &TerminalContent {
        &self.content
    }

    /// A collapse or reveal is in flight
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_busy()
    }

    /// Mount on a surface of the given size and build the grid
    pub fn attach_surface(&mut self, width: u32, height: u32) {
        self.state.surface = Some(SurfaceSize::new(width, height));
        if self.state.is_animating() {
            self.rebuild_grid();
        }
        log::info!(
            "Field attached at {}x{} ({} particles)",
            width,
            height,
            self.grid.len()
        );
    }

    /// Teardown: later frames and steps draw nothing
    pub fn detach_surface(&mut self) {
        self.state.surface = None;
        log::info!("Field detached");
    }

    /// Surface resized; the grid follows only while animating
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        if self.state.surface == Some(size) {
            return;
        }
        self.state.surface = Some(size);
        if self.state.is_animating() {
            self.rebuild_grid();
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.state.pointer = glam::Vec2::new(x, y);
    }

    /// Click or space. See [`ToggleOutcome`] for what the shell does next.
    pub fn request_toggle(&mut self, source: ToggleSource) -> ToggleOutcome {
        let outcome = self.transition.request_toggle(source, &mut self.state);
        match outcome {
            ToggleOutcome::Collapse => {
                log::info!("Collapsing {} particles", self.grid.len());
            }
            ToggleOutcome::Restore => {
                self.rebuild_grid();
                log::info!("Back to the field ({} particles)", self.grid.len());
            }
            ToggleOutcome::Ignored => {}
        }
        outcome
    }

    /// One animation tick. Returns `false` when nothing was drawn.
    pub fn frame(&mut self, out: &mut DrawList) -> bool {
        if !self.state.is_animating() || self.state.surface.is_none() {
            return false;
        }
        self.state.time += self.settings.tuning.time_step;
        render_frame(&mut self.grid, &self.state, &self.settings, &mut self.rng, out);
        true
    }

    /// One step of the collapse/reveal sequence
    pub fn advance(&mut self, out: &mut DrawList) -> Step {
        self.transition
            .advance(&mut self.state, &mut self.grid, &self.settings.tuning, out)
    }

    /// Flip the terminal cursor; returns the new visibility
    pub fn blink_cursor(&mut self) -> bool {
        self.state.cursor_visible = !self.state.cursor_visible;
        self.state.cursor_visible
    }

    /// Current payload for the terminal panel
    pub fn display(&self) -> Display<'_> {
        if self.state.mode != Mode::Terminal {
            return Display::Hidden;
        }
        let reveal = self.transition.reveal();
        if reveal.is_finished() {
            Display::Finished(self.content.to_html())
        } else {
            Display::Revealing(reveal.buffer())
        }
    }

    fn rebuild_grid(&mut self) {
        self.grid = match self.state.surface {
            Some(size) => ParticleGrid::build(
                size.width,
                size.height,
                self.settings.tuning.grid_spacing,
                &mut self.rng,
            ),
            None => ParticleGrid::default(),
        };
        log::debug!(
            "Rebuilt grid: {} particles for {:?}",
            self.grid.len(),
            self.state.surface
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn mounted(w: u32, h: u32) -> Landing {
        let mut landing = Landing::with_seed(2024);
        landing.attach_surface(w, h);
        landing
    }

    /// Drive the sequence to completion, returning the number of steps
    fn run_sequence(landing: &mut Landing) -> usize {
        let mut out = DrawList::new();
        let mut steps = 0;
        while let Step::Wait(_) = landing.advance(&mut out) {
            steps += 1;
        }
        steps + 1
    }

    #[test]
    fn test_mount_builds_grid() {
        let landing = mounted(800, 600);
        assert_eq!(landing.grid().len(), 825);
        assert_eq!(landing.mode(), Mode::Animating);
    }

    #[test]
    fn test_frame_advances_time() {
        let mut landing = mounted(200, 100);
        let mut out = DrawList::new();
        assert!(landing.frame(&mut out));
        assert!(landing.frame(&mut out));
        assert!((landing.state().time - 0.032).abs() < 1e-6);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_frame_before_mount_is_noop() {
        let mut landing = Landing::with_seed(1);
        let mut out = DrawList::new();
        assert!(!landing.frame(&mut out));
        assert!(out.is_empty());
        assert_eq!(landing.state().time, 0.0);
    }

    #[test]
    fn test_resize_rebuilds_while_animating() {
        let mut landing = mounted(800, 600);
        landing.resize(400, 300);
        assert_eq!(landing.grid().len(), ParticleGrid::expected_len(400, 300, 25));
        assert_eq!(landing.grid().size, (400, 300));
    }

    #[test]
    fn test_round_trip_rebuilds_grid() {
        let mut landing = mounted(800, 600);
        let mut out = DrawList::new();
        landing.frame(&mut out);

        assert_eq!(landing.request_toggle(ToggleSource::Click), ToggleOutcome::Collapse);
        assert!(!landing.frame(&mut out), "frame loop must stop while collapsing");

        let chars = landing.content().plain_text().chars().count();
        assert_eq!(run_sequence(&mut landing), 40 + chars);
        assert_eq!(landing.mode(), Mode::Terminal);

        // Resizing in terminal mode defers the rebuild
        landing.resize(1024, 768);
        assert_eq!(landing.grid().size, (800, 600));

        let time = landing.state().time;
        assert_eq!(landing.request_toggle(ToggleSource::Space), ToggleOutcome::Restore);
        assert_eq!(landing.mode(), Mode::Animating);
        assert_eq!(landing.grid().len(), ParticleGrid::expected_len(1024, 768, 25));
        assert_eq!(landing.display(), Display::Hidden);
        // Time was frozen outside animation
        assert_eq!(landing.state().time, time);
    }

    #[test]
    fn test_display_follows_reveal() {
        let mut landing = mounted(300, 200);
        let mut out = DrawList::new();
        assert_eq!(landing.display(), Display::Hidden);

        landing.request_toggle(ToggleSource::Click);
        for _ in 0..40 {
            assert_eq!(landing.display(), Display::Hidden);
            assert_eq!(landing.advance(&mut out), Step::Wait(Duration::from_millis(16)));
        }
        assert_eq!(landing.display(), Display::Revealing(""));

        landing.advance(&mut out);
        assert_eq!(landing.display(), Display::Revealing("\n"));
        landing.advance(&mut out);
        assert_eq!(landing.display(), Display::Revealing("\n>"));

        // Click during the reveal is dropped
        assert_eq!(landing.request_toggle(ToggleSource::Click), ToggleOutcome::Ignored);

        while landing.advance(&mut out) != Step::Done {}
        assert_eq!(landing.display(), Display::Finished(landing.content().to_html()));
    }

    #[test]
    fn test_detach_stops_drawing() {
        let mut landing = mounted(300, 200);
        let mut out = DrawList::new();
        landing.request_toggle(ToggleSource::Click);
        landing.detach_surface();

        landing.advance(&mut out);
        assert!(out.is_empty());
        assert!(!landing.frame(&mut out));
    }

    #[test]
    fn test_reattach_resumes_sequence() {
        let mut landing = mounted(300, 200);
        let mut out = DrawList::new();
        landing.request_toggle(ToggleSource::Click);
        landing.advance(&mut out);
        landing.detach_surface();
        out.clear();

        // Page restored from the back-forward cache
        landing.attach_surface(300, 200);
        assert!(landing.is_transitioning());
        assert!(matches!(landing.advance(&mut out), Step::Wait(_)));
        assert!(!out.is_empty());

        run_sequence(&mut landing);
        assert_eq!(landing.mode(), Mode::Terminal);
        assert_eq!(landing.request_toggle(ToggleSource::Space), ToggleOutcome::Restore);
        assert!(landing.frame(&mut out));
    }

    #[test]
    fn test_out_of_range_tuning_is_clamped() {
        let settings = Settings::from_json(
            r#"{"tuning": {"grid_spacing": 4294967295, "time_step": -1.0, "collapse_ease": 5.0}}"#,
        );
        let mut landing = Landing::new(settings, TerminalContent::default(), 9);
        landing.attach_surface(800, 600);
        assert_eq!(
            landing.grid().len(),
            ParticleGrid::expected_len(800, 600, crate::consts::GRID_SPACING_MAX)
        );

        let mut out = DrawList::new();
        landing.frame(&mut out);
        landing.frame(&mut out);
        assert!(landing.state().time > 0.0);

        let Some(center) = landing.state().center() else {
            panic!("surface attached");
        };
        let distances = |landing: &Landing| -> Vec<f32> {
            landing.grid().iter().map(|p| p.pos.distance(center)).collect()
        };
        landing.request_toggle(ToggleSource::Click);
        for _ in 0..2 {
            let before = distances(&landing);
            landing.advance(&mut out);
            let after = distances(&landing);
            assert!(before.iter().zip(&after).all(|(b, a)| a < b));
        }
    }

    #[test]
    fn test_cursor_blink() {
        let mut landing = Landing::with_seed(3);
        assert!(landing.state().cursor_visible);
        assert!(!landing.blink_cursor());
        assert!(landing.blink_cursor());
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = mounted(200, 200);
        let mut b = mounted(200, 200);
        a.pointer_moved(50.0, 60.0);
        b.pointer_moved(50.0, 60.0);

        let (mut out_a, mut out_b) = (DrawList::new(), DrawList::new());
        for _ in 0..10 {
            a.frame(&mut out_a);
            b.frame(&mut out_b);
        }
        assert_eq!(out_a.commands, out_b.commands);
    }
}
