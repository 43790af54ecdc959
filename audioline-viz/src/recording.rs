//! Surfaces that remember what was drawn on them.

use alloc::{string::String, vec::Vec};

use crate::surface::{Paint, RasterSurface, VectorSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    BezierCurveTo {
        cp1x: f32,
        cp1y: f32,
        cp2x: f32,
        cp2y: f32,
        x: f32,
        y: f32,
    },
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    ClosePath,
    Stroke,
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    SetStrokeStyle(Paint),
    SetFillStyle(Paint),
    SetLineWidth(f32),
}

/// Raster surface that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of `stroke` calls so far.
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke))
            .count()
    }
}

impl RasterSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.commands.push(DrawCommand::BezierCurveTo {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        });
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, width, height });
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.commands.push(DrawCommand::SetStrokeStyle(paint));
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.commands.push(DrawCommand::SetFillStyle(paint));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }
}

/// Vector surface keeping every path it was given, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RecordingVectorSurface {
    paths: Vec<String>,
}

impl RecordingVectorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn current(&self) -> Option<&str> {
        self.paths.last().map(String::as_str)
    }
}

impl VectorSurface for RecordingVectorSurface {
    fn set_path(&mut self, description: &str) {
        self.paths.push(String::from(description));
    }
}
