//! Rendering module
//!
//! The field produces a `DrawList` per frame; a `Surface` replays it. On the
//! web that is a 2D canvas, natively a character grid for headless previews.

pub mod ascii;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod commands;

pub use ascii::AsciiSurface;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use commands::{DrawCommand, DrawList, Font, Rgba, TextAlign, TextRun, colors};

/// Something draw commands can be replayed onto
pub trait Surface {
    /// Size in px
    fn size(&self) -> (u32, u32);

    /// Resize (clears the contents)
    fn resize(&mut self, width: u32, height: u32);

    /// Replay commands in order
    fn present(&mut self, list: &DrawList);
}
