//! Software raster surface backed by an RGB pixel buffer.

use alloc::{vec, vec::Vec};
use core::{convert::Infallible, f32::consts::TAU};

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle},
};

use crate::surface::{Paint, RasterSurface};

/// Line segments used to approximate one cubic bezier.
const BEZIER_STEPS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
    Arc {
        center: (f32, f32),
        radius: f32,
        start: f32,
        sweep: f32,
    },
}

/// Pixel buffer that can be drawn on as a [`RasterSurface`] and shown on any
/// `DrawTarget` with [`Framebuffer::blit`].
///
/// Fills and strokes are alpha blended with the current paint's opacity, so a
/// translucent full-surface fill fades earlier frames instead of erasing them.
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb888>,
    stroke: Paint,
    fill: Paint,
    line_width: f32,
    segments: Vec<Segment>,
    cursor: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
}

impl Framebuffer {
    pub fn new(size: Size, background: Rgb888) -> Self {
        Self {
            size,
            pixels: vec![background; (size.width * size.height) as usize],
            stroke: Paint::BLACK,
            fill: Paint::BLACK,
            line_width: 1.0,
            segments: Vec::new(),
            cursor: None,
            subpath_start: None,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.size.width && y < self.size.height {
            Some(self.pixels[(y * self.size.width + x) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Paint every pixel `color`, ignoring the current fill style.
    pub fn reset(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    /// Copy the whole buffer to `target`, top-left aligned.
    pub fn blit<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        target.fill_contiguous(
            &Rectangle::new(Point::zero(), self.size),
            self.pixels.iter().copied(),
        )
    }

    fn blend_target(&mut self, opacity: f32) -> Blend<'_> {
        Blend {
            pixels: &mut self.pixels,
            size: self.size,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    fn push_line(&mut self, to: (f32, f32)) {
        if let Some(from) = self.cursor {
            self.segments.push(Segment::Line { from, to });
        } else {
            self.subpath_start = Some(to);
        }
        self.cursor = Some(to);
    }
}

impl RasterSurface for Framebuffer {
    fn begin_path(&mut self) {
        self.segments.clear();
        self.cursor = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
        self.subpath_start = Some((x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push_line((x, y));
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        let (x0, y0) = match self.cursor {
            Some(point) => point,
            None => {
                self.move_to(cp1x, cp1y);
                (cp1x, cp1y)
            }
        };
        for step in 1..=BEZIER_STEPS {
            let t = step as f32 / BEZIER_STEPS as f32;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            self.push_line((
                a * x0 + b * cp1x + c * cp2x + d * x,
                a * y0 + b * cp1y + c * cp2y + d * y,
            ));
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let start = (x + radius * libm::cosf(start_angle), y + radius * libm::sinf(start_angle));
        let end = (x + radius * libm::cosf(end_angle), y + radius * libm::sinf(end_angle));
        // Joins the current point to the arc, as a canvas would.
        match self.cursor {
            Some(cursor) if cursor != start => self.push_line(start),
            Some(_) => {}
            None => self.move_to(start.0, start.1),
        }
        self.segments.push(Segment::Arc {
            center: (x, y),
            radius,
            start: start_angle,
            sweep: (end_angle - start_angle).clamp(-TAU, TAU),
        });
        self.cursor = Some(end);
    }

    fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.push_line(start);
        }
    }

    fn stroke(&mut self) {
        let width = libm::roundf(self.line_width).max(1.0) as u32;
        let style = PrimitiveStyle::with_stroke(self.stroke.color, width);
        let segments = core::mem::take(&mut self.segments);
        let mut target = self.blend_target(self.stroke.opacity);

        for segment in &segments {
            let drawn = match *segment {
                Segment::Line { from, to } => Line::new(to_point(from), to_point(to))
                    .into_styled(style)
                    .draw(&mut target),
                Segment::Arc {
                    center,
                    radius,
                    start,
                    sweep,
                } => {
                    let diameter = libm::roundf(radius * 2.0).max(0.0) as u32;
                    if sweep.abs() >= TAU {
                        Circle::with_center(to_point(center), diameter)
                            .into_styled(style)
                            .draw(&mut target)
                    } else {
                        Arc::with_center(
                            to_point(center),
                            diameter,
                            Angle::from_radians(start),
                            Angle::from_radians(sweep),
                        )
                        .into_styled(style)
                        .draw(&mut target)
                    }
                }
            };
            infallible(drawn);
        }
        // The path stays current until the next begin_path.
        self.segments = segments;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let style = PrimitiveStyle::with_fill(self.fill.color);
        let area = Rectangle::new(
            to_point((x, y)),
            Size::new(
                libm::ceilf(width).max(0.0) as u32,
                libm::ceilf(height).max(0.0) as u32,
            ),
        );
        let mut target = self.blend_target(self.fill.opacity);
        infallible(area.into_styled(style).draw(&mut target));
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.stroke = paint;
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.fill = paint;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.blend_target(1.0).draw_iter(pixels)
    }
}

/// Draw target writing into a framebuffer's pixels at a fixed opacity.
struct Blend<'a> {
    pixels: &'a mut [Rgb888],
    size: Size,
    opacity: f32,
}

impl OriginDimensions for Blend<'_> {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Blend<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= self.size.width || y >= self.size.height {
                continue;
            }
            let index = (y * self.size.width + x) as usize;
            self.pixels[index] = blend(self.pixels[index], color, self.opacity);
        }
        Ok(())
    }
}

fn blend(under: Rgb888, over: Rgb888, opacity: f32) -> Rgb888 {
    if opacity >= 1.0 {
        return over;
    }
    let mix = |a: u8, b: u8| libm::roundf(a as f32 * (1.0 - opacity) + b as f32 * opacity) as u8;
    Rgb888::new(
        mix(under.r(), over.r()),
        mix(under.g(), over.g()),
        mix(under.b(), over.b()),
    )
}

fn to_point((x, y): (f32, f32)) -> Point {
    Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32)
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
