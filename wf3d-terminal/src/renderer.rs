/// Wireframe line rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use wf3d_core::{Mesh, Rgb, ViewContext};

/// Device pixels covered by one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    /// Middle of a `cols` x `rows` grid in device pixels
    pub fn canvas_center(&self, cols: usize, rows: usize) -> Point2<f64> {
        Point2::new(cols as f64 * self.width / 2.0, rows as f64 * self.height / 2.0)
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

/// Renders meshes as colored line art into a character grid
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    cell: CellSize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize, cell: CellSize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            cell,
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::WHITE; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    pub fn canvas_center(&self) -> Point2<f64> {
        self.cell.canvas_center(self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Rgb::WHITE);
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Transform the whole mesh in one batch and draw every triangle edge
    pub fn render_mesh(&mut self, mesh: &Mesh, view: &ViewContext) {
        if mesh.triangles.is_empty() {
            return;
        }
        let device = view.model_to_device(&mesh.to_batch());
        let cell = self.cell;

        for (i, triangle) in mesh.triangles.iter().enumerate() {
            let corner = |k: usize| {
                let col = device.column(i * 3 + k);
                (col[0] / cell.width, col[1] / cell.height)
            };
            let (a, b, c) = (corner(0), corner(1), corner(2));
            self.draw_line(a, b, triangle.color);
            self.draw_line(b, c, triangle.color);
            self.draw_line(c, a, triangle.color);
        }
    }

    /// Draw a segment given in cell coordinates, clipped to the grid
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        let Some(((x0, y0), (x1, y1))) = self.clip(from, to) else {
            return;
        };

        let (x0, y0) = (x0.round() as i64, y0.round() as i64);
        let (x1, y1) = (x1.round() as i64, y1.round() as i64);
        let glyph = line_glyph(x1 - x0, y1 - y0);

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.plot(x, y, glyph, color);
            if x == x1 && y == y1 {
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

    fn plot(&mut self, x: i64, y: i64, glyph: char, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = glyph;
        self.color_buffer[idx] = color;
    }

    /// Liang-Barsky clip against the grid bounds
    fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return None;
        }

        let (max_x, max_y) = ((self.width - 1) as f64, (self.height - 1) as f64);
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-dx, from.0),
            (dx, max_x - from.0),
            (-dy, from.1),
            (dy, max_y - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }

        if t0 > t1 {
            return None;
        }
        Some((
            (from.0 + t0 * dx, from.1 + t0 * dy),
            (from.0 + t1 * dx, from.1 + t1 * dy),
        ))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Rgb> = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];
                let color = self.color_buffer[idx];

                if c != ' ' && current != Some(color) {
                    let Rgb(r, g, b) = color;
                    writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a character that follows the slope of a segment (y grows downward)
fn line_glyph(dx: i64, dy: i64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax == 0 && ay == 0 {
        '+'
    } else if ay * 2 < ax {
        '-'
    } else if ax * 2 < ay {
        '|'
    } else if (dx > 0) == (dy > 0) {
        '\\'
    } else {
        '/'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf3d_core::ViewConfig;

    fn drawn(renderer: &WireframeRenderer) -> usize {
        renderer.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    #[test]
    fn test_horizontal_line() {
        let mut renderer = WireframeRenderer::new(10, 5, CellSize::default());
        renderer.draw_line((1.0, 2.0), (8.0, 2.0), Rgb::WHITE);
        for x in 1..=8 {
            assert_eq!(renderer.cell_at(x, 2), Some('-'));
        }
        assert_eq!(renderer.cell_at(0, 2), Some(' '));
        assert_eq!(drawn(&renderer), 8);
    }

    #[test]
    fn test_line_glyphs() {
        assert_eq!(line_glyph(0, 5), '|');
        assert_eq!(line_glyph(4, 4), '\\');
        assert_eq!(line_glyph(-4, 4), '/');
        assert_eq!(line_glyph(0, 0), '+');
    }

    #[test]
    fn test_clipping() {
        let mut renderer = WireframeRenderer::new(10, 5, CellSize::default());
        // huge segment crossing the grid diagonally
        renderer.draw_line((-1e9, -1e9), (1e9, 1e9), Rgb::WHITE);
        assert!(drawn(&renderer) > 0);
        assert!(drawn(&renderer) <= 10);

        renderer.clear();
        renderer.draw_line((-5.0, -5.0), (-1.0, 20.0), Rgb::WHITE);
        renderer.draw_line((0.0, f64::NAN), (3.0, 3.0), Rgb::WHITE);
        assert_eq!(drawn(&renderer), 0);
    }

    #[test]
    fn test_render_cube() {
        let (cols, rows) = (100usize, 50usize);
        let cell = CellSize::default();
        let mut renderer = WireframeRenderer::new(cols, rows, cell);
        let config = ViewConfig::default().with_screen_center(renderer.canvas_center());
        let view = ViewContext::new(config).unwrap();

        renderer.render_mesh(&Mesh::cube(100.0), &view);
        assert!(drawn(&renderer) > 0);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn test_render_empty_mesh() {
        let view = ViewContext::new(ViewConfig::default()).unwrap();
        let mut renderer = WireframeRenderer::new(10, 5, CellSize::default());
        renderer.render_mesh(&Mesh::new(), &view);
        assert_eq!(drawn(&renderer), 0);
    }
}
