/// ASCII surface for terminal rendering
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use painter3d_core::{Color, Surface, Viewport};
use std::io::Write;

/// Character luminosity ramp for fills (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used when an outline crosses an empty cell
const EDGE_GLYPH: char = '\'';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::BLACK,
    };
}

/// Cell grid that rasterizes paths in the order they arrive.
///
/// There is no depth buffer: later polygons overwrite earlier ones, so the
/// caller's back-to-front order decides what stays visible.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    /// Row height relative to column width
    cell_aspect: f64,
    cells: Vec<Cell>,
    path: Vec<(f64, f64)>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, cell_aspect: f64) -> Self {
        Self {
            width,
            height,
            cell_aspect,
            cells: vec![Cell::BLANK; width * height],
            path: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.path.clear();
    }

    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        self.cell(col, row).map(|c| c.glyph)
    }

    pub fn color_at(&self, col: usize, row: usize) -> Option<Color> {
        self.cell(col, row).map(|c| c.color)
    }

    fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.width && row < self.height {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        self.cells.get_mut(row as usize * self.width + col as usize)
    }

    fn glyph_for(color: Color) -> char {
        let index = (color.luminance() * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
        LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    /// Closed polygon edges of the current path in cell coordinates
    fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        let n = self.path.len();
        (0..n).map(move |i| (self.path[i], self.path[(i + 1) % n]))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(TermColor::Rgb {
                    r: cell.color.r,
                    g: cell.color.g,
                    b: cell.color.b,
                }))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for AsciiRenderer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.height as f64)
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = self.viewport().to_screen(x, y, self.cell_aspect);
        self.path.push(point);
    }

    fn close_path(&mut self) {}

    /// Even-odd scanline fill sampled at cell centers
    fn fill(&mut self, color: Color) {
        if self.path.len() < 3 || color.a == 0 {
            return;
        }
        let glyph = Self::glyph_for(color);

        for row in 0..self.height {
            let y = row as f64 + 0.5;
            let mut crossings: Vec<f64> = self
                .edges()
                .filter(|((_, y0), (_, y1))| (*y0 <= y) != (*y1 <= y))
                .map(|((x0, y0), (x1, y1))| x0 + (y - y0) * (x1 - x0) / (y1 - y0))
                .collect();
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let first = (span[0] - 0.5).ceil().max(0.0) as i64;
                let last = (span[1] - 0.5).floor().min(self.width as f64 - 1.0) as i64;
                for col in first..=last {
                    if let Some(cell) = self.cell_mut(col, row as i64) {
                        cell.glyph = glyph;
                        cell.color = color.over(cell.color);
                    }
                }
            }
        }
    }

    /// Bresenham outline, blended over whatever the cells already hold
    fn stroke(&mut self, color: Color) {
        if self.path.len() < 2 || color.a == 0 {
            return;
        }
        let edges: Vec<_> = self.edges().collect();

        let bounds = (-1.0, self.width as f64 + 1.0, -1.0, self.height as f64 + 1.0);
        for edge in edges {
            let Some(((x0, y0), (x1, y1))) = clip_segment(edge, bounds) else {
                continue;
            };
            let (mut x, mut y) = (x0.floor() as i64, y0.floor() as i64);
            let (x_end, y_end) = (x1.floor() as i64, y1.floor() as i64);
            let dx = (x_end - x).abs();
            let dy = -(y_end - y).abs();
            let sx = if x < x_end { 1 } else { -1 };
            let sy = if y < y_end { 1 } else { -1 };
            let mut err = dx + dy;

            loop {
                if let Some(cell) = self.cell_mut(x, y) {
                    if cell.glyph == ' ' {
                        cell.glyph = EDGE_GLYPH;
                    }
                    cell.color = color.over(cell.color);
                }
                if x == x_end && y == y_end {
                    break;
                }
                let e2 = 2 * err;
                if e2 >= dy {
                    err += dy;
                    x += sx;
                }
                if e2 <= dx {
                    err += dx;
                    y += sy;
                }
            }
        }
    }
}

/// Liang-Barsky clip of a segment to `(x_min, x_max, y_min, y_max)`
fn clip_segment(
    ((x0, y0), (x1, y1)): ((f64, f64), (f64, f64)),
    (x_min, x_max, y_min, y_max): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [(-dx, x0 - x_min), (dx, x_max - x0), (-dy, y0 - y_min), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(((x0 + t0 * dx, y0 + t0 * dy), (x0 + t1 * dx, y0 + t1 * dy)))
}
