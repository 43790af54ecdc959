use embedded_graphics::pixelcolor::Rgb888;

use crate::{
    curve::CurveConfig,
    driver::{FrameDriver, Layers},
    error::SetupError,
    renderer::Presentation,
    sampler::FrequencySource,
    surface::Paint,
    types::Viewport,
};

/// Everything a session needs besides the surfaces and the audio source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Analysis window size. The amplitude buffer holds half as many bins.
    pub fft_size: usize,
    /// Leading bins drawn by the curve.
    pub bin_count: usize,
    /// Base circle radius of the grid, logical pixels.
    pub grid_radius: f32,
    pub grid_line_width: f32,
    pub grid_stroke: Paint,
    pub curve: CurveConfig,
    pub curve_stroke: Paint,
    pub curve_line_width: f32,
    /// Curve y for amplitude 0 and 255, as fractions of the height.
    pub amplitude_band: (f32, f32),
    pub presentation: Presentation,
    pub layers: Layers,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            bin_count: 100,
            grid_radius: 31.0,
            grid_line_width: 0.5,
            grid_stroke: Paint::opaque(Rgb888::new(0, 0, 0)),
            curve: CurveConfig::default(),
            curve_stroke: Paint::opaque(Rgb888::new(0, 0, 0)),
            curve_line_width: 0.5,
            amplitude_band: (0.75, 0.25),
            presentation: Presentation::default(),
            layers: Layers::default(),
        }
    }
}

impl SessionConfig {
    pub fn buffer_len(&self) -> usize {
        self.fft_size / 2
    }

    /// Checks that do not depend on the surface.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(SetupError::InvalidFftSize(self.fft_size));
        }
        if self.bin_count > self.buffer_len() {
            return Err(SetupError::BinCountExceedsBuffer {
                bin_count: self.bin_count,
                buffer_len: self.buffer_len(),
            });
        }
        Ok(())
    }
}

/// Result of [`setup`]: a driver ready to tick, or nothing at all when there
/// is no surface to draw on.
pub enum Visualization<S> {
    Active(FrameDriver<S>),
    Inert,
}

impl<S> Visualization<S> {
    pub fn is_inert(&self) -> bool {
        matches!(self, Visualization::Inert)
    }
}

/// Builds a session for `viewport`. The driver starts idle; attach a source
/// or poll an acquisition to start it.
///
/// `None` means there is no visual host, which is not an error.
pub fn setup<S: FrequencySource>(
    config: &SessionConfig,
    viewport: Option<Viewport>,
) -> Result<Visualization<S>, SetupError> {
    config.validate()?;

    let Some(viewport) = viewport else {
        viz_log!(info, "no visual host, visualization disabled");
        return Ok(Visualization::Inert);
    };
    if !viewport.is_valid() {
        return Err(SetupError::InvalidViewport);
    }

    viz_log!(
        info,
        "session ready: {}x{} @{}, {} bins, curve over {}",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio,
        config.buffer_len(),
        config.bin_count
    );
    Ok(Visualization::Active(FrameDriver::new(config, viewport)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silence;

    impl FrequencySource for Silence {
        fn bin_count(&self) -> usize {
            512
        }

        fn get_snapshot(&mut self, out: &mut [u8]) {
            out.fill(0);
        }
    }

    #[test]
    fn test_no_viewport_is_inert() {
        let visualization = setup::<Silence>(&SessionConfig::default(), None).unwrap();
        assert!(visualization.is_inert());
    }

    #[test]
    fn test_bad_config_fails_even_without_viewport() {
        let config = SessionConfig {
            bin_count: 600,
            ..SessionConfig::default()
        };
        assert!(matches!(
            setup::<Silence>(&config, None),
            Err(SetupError::BinCountExceedsBuffer {
                bin_count: 600,
                buffer_len: 512
            })
        ));
    }

    #[test]
    fn test_invalid_viewport() {
        let result = setup::<Silence>(&SessionConfig::default(), Some(Viewport::new(0.0, 10.0, 1.0)));
        assert!(matches!(result, Err(SetupError::InvalidViewport)));
    }

    #[test]
    fn test_fft_size_must_be_power_of_two() {
        let config = SessionConfig {
            fft_size: 1000,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(SetupError::InvalidFftSize(1000)));
    }

    #[test]
    fn test_active_driver_has_half_window_buffer() {
        let viewport = Viewport::new(320.0, 240.0, 1.0);
        match setup::<Silence>(&SessionConfig::default(), Some(viewport)).unwrap() {
            Visualization::Active(driver) => assert_eq!(driver.amplitudes().len(), 512),
            Visualization::Inert => panic!("expected an active driver"),
        }
    }
}
