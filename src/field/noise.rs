//! Layered trigonometric noise for the wave field
//!
//! Not gradient noise: two products of sines/cosines with unrelated
//! frequencies, which is enough to hide the period over a page session.

/// Scalar noise at `(x, y)` and time `t`, in [-2, 2]
#[inline]
pub fn noise(x: f32, y: f32, t: f32) -> f32 {
    (x * 0.02 + t).sin() * (y * 0.02 + t * 0.7).cos() * ((x + y) * 0.01 + t * 0.5).sin()
        + (x * 0.05 - t * 1.3).sin() * (y * 0.03 + t).cos()
}
