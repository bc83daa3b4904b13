//! 2D canvas surface (WASM only)
//!
//! Replays draw commands with `fill_rect`/`fill_text`. Style strings are
//! cached so a frame of same-colored glyphs doesn't re-set them per call.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use super::commands::{DrawCommand, DrawList, Font, Rgba, TextAlign, colors};

/// A `<canvas>` with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    font_family: String,
    fill: Option<Rgba>,
    font: Option<Font>,
    align: Option<TextAlign>,
}

impl CanvasSurface {
    /// Wrap a canvas; `None` if it has no 2D context
    pub fn new(canvas: HtmlCanvasElement, font_family: &str) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            canvas,
            ctx,
            font_family: font_family.to_string(),
            fill: None,
            font: None,
            align: None,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Paint the whole surface opaque black
    pub fn clear(&mut self) {
        let (w, h) = self.size();
        self.set_fill(colors::BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn set_fill(&mut self, color: Rgba) {
        if self.fill != Some(color) {
            self.ctx.set_fill_style_str(&color.to_string());
            self.fill = Some(color);
        }
    }

    fn set_font(&mut self, font: Font) {
        if self.font != Some(font) {
            self.ctx.set_font(&font.css(&self.font_family));
            self.font = Some(font);
        }
    }

    fn set_align(&mut self, align: TextAlign) {
        if self.align != Some(align) {
            self.ctx.set_text_align(align.as_str());
            self.align = Some(align);
        }
    }

    /// Context state resets when the canvas is resized
    fn forget_styles(&mut self) {
        self.fill = None;
        self.font = None;
        self.align = None;
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.forget_styles();
    }

    fn present(&mut self, list: &DrawList) {
        let mut buf = [0u8; 4];
        for command in list.iter() {
            match command {
                DrawCommand::FillRect { origin, size, color } => {
                    self.set_fill(*color);
                    self.ctx.fill_rect(
                        origin.x as f64,
                        origin.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                }
                DrawCommand::Text {
                    text,
                    pos,
                    font,
                    align,
                    color,
                } => {
                    self.set_font(*font);
                    self.set_align(*align);
                    self.set_fill(*color);
                    if let Err(e) =
                        self.ctx
                            .fill_text(text.as_str(&mut buf), pos.x as f64, pos.y as f64)
                    {
                        log::warn!("fill_text failed: {:?}", e);
                    }
                }
            }
        }
    }
}
