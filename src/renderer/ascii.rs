//! Character-grid surface for native previews and tests
//!
//! Each cell covers `cell_w x cell_h` px and keeps a char plus a brightness.
//! Rectangles blend brightness by the fraction of the cell they cover, so
//! the trail fade and scanlines dim the grid the way they dim a canvas.

use glam::Vec2;

use super::Surface;
use super::commands::{DrawCommand, DrawList, Rgba, TextAlign};

/// Cells dimmer than this print as blanks
pub const VISIBLE_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    level: f32,
}

impl Cell {
    const EMPTY: Cell = Cell { ch: ' ', level: 0.0 };

    fn blend(&mut self, color: Rgba, alpha: f32) {
        let target = (color.r as f32 + color.g as f32 + color.b as f32) / (3.0 * 255.0);
        self.level = self.level * (1.0 - alpha) + target * alpha;
    }
}

/// Brightness-aware character grid
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    width: u32,
    height: u32,
    cell_w: u32,
    cell_h: u32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl AsciiSurface {
    /// Surface of `width x height` px with the given cell size
    pub fn new(width: u32, height: u32, cell_w: u32, cell_h: u32) -> Self {
        let mut surface = Self {
            width: 0,
            height: 0,
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        surface.resize(width, height);
        surface
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Char at a cell, blank when too dim
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        let cell = self.cells.get(row * self.cols + col)?;
        Some(if cell.level >= VISIBLE_THRESHOLD { cell.ch } else { ' ' })
    }

    /// Text of one row
    pub fn row_text(&self, row: usize) -> String {
        (0..self.cols)
            .filter_map(|col| self.char_at(col, row))
            .collect()
    }

    /// Number of visible (non-blank) cells
    pub fn visible_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.ch != ' ' && c.level >= VISIBLE_THRESHOLD)
            .count()
    }

    /// Whole grid, one line per row
    pub fn to_text(&self) -> String {
        (0..self.rows)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let cell = Vec2::new(self.cell_w as f32, self.cell_h as f32);
        let lo = origin.max(Vec2::ZERO);
        let hi = (origin + size).min(Vec2::new(self.width as f32, self.height as f32));
        if hi.x <= lo.x || hi.y <= lo.y {
            return;
        }

        let col_range = (lo.x / cell.x) as usize..((hi.x / cell.x).ceil() as usize).min(self.cols);
        let row_range = (lo.y / cell.y) as usize..((hi.y / cell.y).ceil() as usize).min(self.rows);

        for row in row_range {
            let top = row as f32 * cell.y;
            let cover_y = (hi.y.min(top + cell.y) - lo.y.max(top)).max(0.0) / cell.y;
            for col in col_range.clone() {
                let left = col as f32 * cell.x;
                let cover_x = (hi.x.min(left + cell.x) - lo.x.max(left)).max(0.0) / cell.x;
                let alpha = color.a.clamp(0.0, 1.0) * cover_x * cover_y;
                self.cells[row * self.cols + col].blend(color, alpha);
            }
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, align: TextAlign, color: Rgba) {
        if pos.y < 0.0 || pos.x < -(self.width as f32) {
            return;
        }
        let row = (pos.y / self.cell_h as f32) as usize;
        if row >= self.rows {
            return;
        }

        let len = text.chars().count() as isize;
        let anchor = (pos.x / self.cell_w as f32).floor() as isize;
        let start = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
        };

        let alpha = color.a.clamp(0.0, 1.0);
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as isize;
            if col < 0 || col as usize >= self.cols {
                continue;
            }
            let cell = &mut self.cells[row * self.cols + col as usize];
            cell.ch = ch;
            cell.blend(color, alpha);
        }
    }
}

impl Surface for AsciiSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.cols = width.div_ceil(self.cell_w) as usize;
        self.rows = height.div_ceil(self.cell_h) as usize;
        self.cells = vec![Cell::EMPTY; self.cols * self.rows];
    }

    fn present(&mut self, list: &DrawList) {
        let mut buf = [0u8; 4];
        for command in list.iter() {
            match command {
                DrawCommand::FillRect { origin, size, color } => {
                    self.fill_rect(*origin, *size, *color);
                }
                DrawCommand::Text {
                    text,
                    pos,
                    align,
                    color,
                    ..
                } => {
                    self.fill_text(text.as_str(&mut buf), *pos, *align, *color);
                }
            }
        }
    }
}
