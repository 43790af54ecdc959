use core::f32::consts::TAU;

use crate::{
    renderer::Renderer,
    surface::{Paint, RasterSurface},
    types::AmplitudeBuffer,
};

pub const GRID_COLUMNS: usize = 10;
pub const GRID_ROWS: usize = 10;
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;
/// Cells sample every other bin.
pub const BIN_STRIDE: usize = 2;

/// Hexagonally offset 10×10 grid of circles sized by amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    radius: f32,
    line_width: f32,
    stroke: Paint,
    row_pitch: f32,
}

impl HexGrid {
    pub fn new(radius: f32, line_width: f32, stroke: Paint) -> Self {
        let half = radius / 2.0;
        Self {
            radius,
            line_width,
            stroke,
            row_pitch: 2.0 * libm::sqrtf(radius * radius - half * half),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Buffer index driving the cell at `(col, row)`.
    pub const fn bin_index(col: usize, row: usize) -> usize {
        (col + GRID_COLUMNS * row) * BIN_STRIDE
    }

    /// Centre of `(col, row)` in logical pixels. Odd rows shift right by one
    /// radius; row 0 sits at the bottom.
    pub fn cell_center(&self, col: usize, row: usize) -> (f32, f32) {
        let x = (col + 1) as f32 * 2.0 * self.radius + (row % 2) as f32 * self.radius;
        let y = (GRID_ROWS - row) as f32 * self.row_pitch;
        (x, y)
    }

    pub fn cell_radius(&self, buffer: &AmplitudeBuffer, col: usize, row: usize) -> f32 {
        buffer.get(Self::bin_index(col, row)) as f32 * self.radius / 255.0
    }

    /// Radius of every cell, row-major from the bottom row.
    pub fn radii(&self, buffer: &AmplitudeBuffer) -> [f32; GRID_CELLS] {
        let mut radii = [0.0; GRID_CELLS];
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                radii[col + GRID_COLUMNS * row] = self.cell_radius(buffer, col, row);
            }
        }
        radii
    }
}

impl Renderer for HexGrid {
    fn render<R: RasterSurface + ?Sized>(&self, surface: &mut R, amplitudes: &AmplitudeBuffer, scale: f32) {
        surface.set_line_width(self.line_width * scale);
        surface.set_stroke_style(self.stroke);
        surface.begin_path();
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                let (x, y) = self.cell_center(col, row);
                let r = self.cell_radius(amplitudes, col, row) * scale;
                let (cx, cy) = (x * scale, y * scale);
                // Start on the rim so circles are not joined to each other.
                surface.move_to(cx + r, cy);
                surface.arc(cx, cy, r, 0.0, TAU);
            }
        }
        surface.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use alloc::vec;
    use approx::assert_relative_eq;

    fn grid() -> HexGrid {
        HexGrid::new(31.0, 0.5, Paint::BLACK)
    }

    #[test]
    fn test_cell_geometry() {
        let grid = grid();
        assert_eq!(grid.cell_center(0, 0).0, 62.0);
        assert_eq!(grid.cell_center(0, 1).0, 93.0);
        assert_relative_eq!(grid.cell_center(0, 0).1, 10.0 * 2.0 * libm::sqrtf(31.0 * 31.0 - 15.5 * 15.5));
        assert_relative_eq!(grid.cell_center(3, 9).1, 2.0 * libm::sqrtf(31.0 * 31.0 - 15.5 * 15.5));
        assert_eq!(HexGrid::bin_index(9, 9), 198);
    }

    #[test]
    fn test_same_buffer_same_radii() {
        let grid = grid();
        let buffer = AmplitudeBuffer::from((0..512).map(|i| (i * 7 % 256) as u8).collect::<alloc::vec::Vec<_>>());
        assert_eq!(grid.radii(&buffer), grid.radii(&buffer));

        let mut first = RecordingSurface::new();
        let mut second = RecordingSurface::new();
        grid.render(&mut first, &buffer, 2.0);
        grid.render(&mut second, &buffer, 2.0);
        assert_eq!(first.commands(), second.commands());
    }

    #[test]
    fn test_block_of_full_amplitude() {
        let grid = grid();
        let mut bins = vec![0u8; 1024];
        for bin in &mut bins[40..80] {
            *bin = 255;
        }
        let buffer = AmplitudeBuffer::from(bins);

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                let index = HexGrid::bin_index(col, row);
                let expected = if (40..80).contains(&index) { 31.0 } else { 0.0 };
                assert_eq!(grid.cell_radius(&buffer, col, row), expected, "cell ({}, {})", col, row);
            }
        }
    }

    #[test]
    fn test_single_batched_stroke() {
        let grid = grid();
        let buffer = AmplitudeBuffer::new(512);
        let mut surface = RecordingSurface::new();
        grid.render(&mut surface, &buffer, 1.0);

        let commands = surface.commands();
        let begins = commands.iter().filter(|c| matches!(c, DrawCommand::BeginPath)).count();
        let strokes = commands.iter().filter(|c| matches!(c, DrawCommand::Stroke)).count();
        let arcs = commands.iter().filter(|c| matches!(c, DrawCommand::Arc { .. })).count();
        assert_eq!((begins, strokes, arcs), (1, 1, GRID_CELLS));
    }

    #[test]
    fn test_short_buffer_reads_zero() {
        let grid = grid();
        let buffer = AmplitudeBuffer::from(vec![255u8; 16]);
        assert_eq!(grid.cell_radius(&buffer, 7, 0), 31.0);
        assert_eq!(grid.cell_radius(&buffer, 8, 0), 0.0);
    }
}
