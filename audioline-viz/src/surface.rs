use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// A colour with opacity, the way stroke and fill styles are set on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb888,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f32,
}

impl Paint {
    pub const BLACK: Paint = Paint::opaque(Rgb888::BLACK);
    pub const RED: Paint = Paint::opaque(Rgb888::RED);

    pub const fn new(color: Rgb888, opacity: f32) -> Self {
        Self { color, opacity }
    }

    pub const fn opaque(color: Rgb888) -> Self {
        Self::new(color, 1.0)
    }
}

/// Immediate-mode 2D drawing target, modelled on a canvas context.
///
/// Coordinates are in device pixels. Paths accumulate between `begin_path`
/// and `stroke`; prior content is only replaced by drawing over it.
pub trait RasterSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32);
    /// Clockwise arc around `(x, y)`, angles in radians.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_stroke_style(&mut self, paint: Paint);
    fn set_fill_style(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f32);
}

/// Retained-mode target holding one path, replaced wholesale.
pub trait VectorSurface {
    /// `description` is SVG path data (`M0,0C...`).
    fn set_path(&mut self, description: &str);
}
