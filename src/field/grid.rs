//! Particle grid for the wave field
//!
//! Particles are anchored on a uniform grid that runs one spacing past the
//! right and bottom edges, so displaced glyphs never leave a visible seam.
//! The grid is rebuilt from scratch on every resize; particle identity does
//! not survive a rebuild.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::consts::{SPEED_MAX, SPEED_MIN};

/// Glyph alphabet (block and box-drawing characters)
pub const GLYPHS: &[char] = &[
    '▓', '▒', '░', '█', '▄', '▀', '■', '□', '●', '○', '◆', '◇', '╳', '╱', '╲', '─', '│', '┌', '┐',
    '└', '┘', '├', '┤', '┬', '┴', '┼', '═', '║', '╔', '╗', '╚', '╝', '╠', '╣', '╦', '╩', '╬', '▲',
    '▼', '◄', '►',
];

/// Pick a uniformly random glyph from [`GLYPHS`]
pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    GLYPHS[rng.random_range(0..GLYPHS.len())]
}

/// A single glyph in the field
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Grid anchor (never changes after build)
    pub base: Vec2,
    /// Position drawn last frame / collapse step
    pub pos: Vec2,
    pub glyph: char,
    /// Orbit phase offset (radians, [0, 2π))
    pub phase: f32,
    /// Orbit rate multiplier ([0.5, 2.0))
    pub speed: f32,
}

impl Particle {
    fn spawn<R: Rng + ?Sized>(base: Vec2, rng: &mut R) -> Self {
        Self {
            base,
            pos: base,
            glyph: random_glyph(rng),
            phase: rng.random_range(0.0..TAU),
            speed: rng.random_range(SPEED_MIN..SPEED_MAX),
        }
    }
}

/// All particles of the field, in column-major build order
#[derive(Debug, Clone, Default)]
pub struct ParticleGrid {
    pub particles: Vec<Particle>,
    /// Surface size the grid was built for
    pub size: (u32, u32),
    pub spacing: u32,
}

impl ParticleGrid {
    /// Build a fresh grid covering `[0, width + spacing) x [0, height + spacing)`
    pub fn build<R: Rng + ?Sized>(width: u32, height: u32, spacing: u32, rng: &mut R) -> Self {
        let spacing = spacing.max(1);
        let columns = Self::axis_count(width, spacing);
        let rows = Self::axis_count(height, spacing);

        // Anchors are i * spacing, computed in u64 so huge spacings cannot overflow
        let mut particles = Vec::with_capacity(columns * rows);
        for col in 0..columns as u64 {
            let x = (col * spacing as u64) as f32;
            for row in 0..rows as u64 {
                let y = (row * spacing as u64) as f32;
                particles.push(Particle::spawn(Vec2::new(x, y), rng));
            }
        }

        Self {
            particles,
            size: (width, height),
            spacing,
        }
    }

    /// Anchors along one axis: ceil(extent / spacing) + 1
    #[inline]
    pub fn axis_count(extent: u32, spacing: u32) -> usize {
        extent.div_ceil(spacing) as usize + 1
    }

    /// Particle count a fresh build would produce for this size
    pub fn expected_len(width: u32, height: u32, spacing: u32) -> usize {
        let spacing = spacing.max(1);
        Self::axis_count(width, spacing) * Self::axis_count(height, spacing)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_build_800x600() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = ParticleGrid::build(800, 600, 25, &mut rng);
        assert_eq!(grid.len(), 33 * 25);
        assert_eq!(grid.len(), 825);
        assert_eq!(grid.particles[0].base, Vec2::ZERO);
        assert_eq!(grid.particles.last().map(|p| p.base), Some(Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn test_build_uneven_size_overhangs() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = ParticleGrid::build(810, 590, 25, &mut rng);
        // 0..=825 by 25 -> 34 columns, 0..=600 by 25 -> 25 rows
        assert_eq!(grid.len(), 34 * 25);
        assert!(grid.iter().any(|p| p.base.x == 825.0));
        assert!(grid.iter().all(|p| p.base.y <= 600.0));
    }

    #[test]
    fn test_build_empty_surface() {
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = ParticleGrid::build(0, 0, 25, &mut rng);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_build_huge_spacing() {
        let mut rng = Pcg32::seed_from_u64(5);
        let grid = ParticleGrid::build(800, 600, u32::MAX, &mut rng);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.len(), ParticleGrid::expected_len(800, 600, u32::MAX));
        assert!(grid.iter().any(|p| p.base == Vec2::ZERO));
        assert!(grid.iter().any(|p| p.base.x > 800.0 && p.base.y > 600.0));
    }

    #[test]
    fn test_rebuild_is_fresh() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = ParticleGrid::build(200, 200, 25, &mut rng);
        let b = ParticleGrid::build(200, 200, 25, &mut rng);
        assert_eq!(a.len(), b.len());
        // Same anchors, new random parameters
        assert!(a.iter().zip(b.iter()).all(|(p, q)| p.base == q.base));
        assert!(a.iter().zip(b.iter()).any(|(p, q)| p.phase != q.phase));
    }

    proptest! {
        #[test]
        fn grid_anchors_on_spacing(w in 0u32..2000, h in 0u32..2000, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let spacing = 25;
            let grid = ParticleGrid::build(w, h, spacing, &mut rng);

            prop_assert_eq!(grid.len(), ParticleGrid::expected_len(w, h, spacing));
            for p in grid.iter() {
                prop_assert_eq!(p.base.x as u32 % spacing, 0);
                prop_assert_eq!(p.base.y as u32 % spacing, 0);
                prop_assert!(p.base.x >= 0.0 && p.base.x < (w + spacing) as f32);
                prop_assert!(p.base.y >= 0.0 && p.base.y < (h + spacing) as f32);
                prop_assert!((0.0..TAU).contains(&p.phase));
                prop_assert!((SPEED_MIN..SPEED_MAX).contains(&p.speed));
                prop_assert!(GLYPHS.contains(&p.glyph));
                prop_assert_eq!(p.pos, p.base);
            }
        }
    }
}
