use embedded_graphics::pixelcolor::Rgb888;

use crate::{
    surface::{Paint, RasterSurface},
    types::AmplitudeBuffer,
};

/// Draws one frame of amplitudes onto a raster surface.
///
/// `scale` is the device-pixel multiplier; implementors work in logical pixels
/// and multiply on the way out.
pub trait Renderer {
    fn render<R: RasterSurface + ?Sized>(&self, surface: &mut R, amplitudes: &AmplitudeBuffer, scale: f32);
}

/// What happens to the previous frame before a new one is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation {
    /// Translucent full-surface fill, leaving a motion trail.
    Fade(Paint),
    /// Opaque full-surface fill.
    Clear(Rgb888),
    /// Draw straight over the previous frame.
    Keep,
}

impl Presentation {
    /// White at 10% opacity.
    pub const DEFAULT_FADE: Presentation = Presentation::Fade(Paint::new(Rgb888::new(255, 255, 255), 0.1));

    /// `width` and `height` are device pixels.
    pub fn apply<R: RasterSurface + ?Sized>(&self, surface: &mut R, width: f32, height: f32) {
        match *self {
            Presentation::Fade(paint) => {
                surface.set_fill_style(paint);
                surface.fill_rect(0.0, 0.0, width, height);
            }
            Presentation::Clear(color) => {
                surface.set_fill_style(Paint::opaque(color));
                surface.fill_rect(0.0, 0.0, width, height);
            }
            Presentation::Keep => {}
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::DEFAULT_FADE
    }
}
