use alloc::{string::String, vec::Vec};

use crate::{
    acquisition::Acquisition,
    curve::{build_path_into, CurveConfig, Path},
    error::SetupError,
    grid::HexGrid,
    renderer::{Presentation, Renderer},
    sampler::{FrequencySampler, FrequencySource},
    scale::CoordinateMapper,
    session::SessionConfig,
    surface::{Paint, RasterSurface, VectorSurface},
    types::{AmplitudeBuffer, Viewport},
};

const LOG_EVERY_FRAMES: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum DriverState {
    /// No source attached; ticks draw nothing.
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// `frame` counts rendered ticks, starting at 1.
    Rendered { frame: u64 },
}

/// Which parts of the picture are drawn each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    pub grid: bool,
    pub curve: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            grid: true,
            curve: true,
        }
    }
}

/// Per-frame pipeline: sample, draw the grid, build the curve for both
/// surfaces.
///
/// All buffers are sized in [`crate::session::setup`]; ticking does not
/// allocate once the first frame has grown the path storage.
pub struct FrameDriver<S> {
    sampler: Option<FrequencySampler<S>>,
    amplitudes: AmplitudeBuffer,
    viewport: Viewport,
    bin_count: usize,
    mapper: CoordinateMapper,
    grid: HexGrid,
    curve: CurveConfig,
    curve_stroke: Paint,
    curve_line_width: f32,
    presentation: Presentation,
    layers: Layers,
    // Logical coordinates for the vector surface.
    xs: Vec<f32>,
    ys: Vec<f32>,
    // Device-pixel coordinates for the raster surface.
    raster_xs: Vec<f32>,
    raster_ys: Vec<f32>,
    raster_path: Path,
    vector_path: Path,
    description: String,
    frame: u64,
}

impl<S: FrequencySource> FrameDriver<S> {
    /// `config` must already be validated against `viewport`.
    pub(crate) fn new(config: &SessionConfig, viewport: Viewport) -> Self {
        let bin_count = config.bin_count;
        Self {
            sampler: None,
            amplitudes: AmplitudeBuffer::new(config.buffer_len()),
            viewport,
            bin_count,
            mapper: CoordinateMapper::with_band(
                bin_count,
                viewport.width,
                viewport.height,
                config.amplitude_band,
            ),
            grid: HexGrid::new(config.grid_radius, config.grid_line_width, config.grid_stroke),
            curve: config.curve,
            curve_stroke: config.curve_stroke,
            curve_line_width: config.curve_line_width,
            presentation: config.presentation,
            layers: config.layers,
            xs: Vec::with_capacity(bin_count),
            ys: Vec::with_capacity(bin_count),
            raster_xs: Vec::with_capacity(bin_count),
            raster_ys: Vec::with_capacity(bin_count),
            raster_path: Path::with_capacity(bin_count + 1),
            vector_path: Path::with_capacity(bin_count + 1),
            description: String::new(),
            frame: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        if self.sampler.is_some() {
            DriverState::Running
        } else {
            DriverState::Idle
        }
    }

    /// Start ticking from `source`. A source whose bin count does not match
    /// the amplitude buffer is rejected and the driver stays as it was.
    pub fn attach(&mut self, source: S) -> Result<(), SetupError> {
        let sampler = FrequencySampler::new(source, self.amplitudes.len())?;
        self.sampler = Some(sampler);
        viz_log!(info, "audio source attached, {} bins", self.amplitudes.len());
        Ok(())
    }

    /// Attach the source from `acquisition` if it has resolved. Failures are
    /// logged and leave the driver idle; nothing is retried.
    pub fn poll_acquisition(&mut self, acquisition: &Acquisition<S>) -> DriverState {
        if self.sampler.is_none() {
            match acquisition.try_take() {
                Some(Ok(source)) => {
                    if let Err(e) = self.attach(source) {
                        viz_log!(error, "acquired source rejected: {}", e);
                    }
                }
                Some(Err(e)) => {
                    viz_log!(warn, "audio acquisition failed: {}", e);
                }
                None => {}
            }
        }
        self.state()
    }

    /// Stop ticking and hand back the source.
    pub fn detach(&mut self) -> Option<S> {
        self.sampler.take().map(FrequencySampler::into_source)
    }

    pub fn tick<R, V>(&mut self, raster: &mut R, vector: &mut V) -> TickOutcome
    where
        R: RasterSurface + ?Sized,
        V: VectorSurface + ?Sized,
    {
        let Some(sampler) = self.sampler.as_mut() else {
            return TickOutcome::Idle;
        };
        sampler.sample(&mut self.amplitudes);

        let scale = self.viewport.pixel_ratio;
        self.presentation.apply(
            raster,
            self.viewport.width * scale,
            self.viewport.height * scale,
        );

        if self.layers.grid {
            self.grid.render(raster, &self.amplitudes, scale);
        }

        if self.layers.curve {
            self.map_curve_points(scale);

            build_path_into(&self.raster_xs, &self.raster_ys, &self.curve, &mut self.raster_path);
            raster.set_line_width(self.curve_line_width * scale);
            raster.set_stroke_style(self.curve_stroke);
            self.raster_path.replay(raster);

            build_path_into(&self.xs, &self.ys, &self.curve, &mut self.vector_path);
            self.vector_path.write_svg(&mut self.description);
            vector.set_path(&self.description);
        }

        self.frame += 1;
        if self.frame % LOG_EVERY_FRAMES == 0 {
            viz_log!(debug, "rendered {} frames", self.frame);
        }
        TickOutcome::Rendered { frame: self.frame }
    }

    fn map_curve_points(&mut self, scale: f32) {
        self.xs.clear();
        self.ys.clear();
        self.raster_xs.clear();
        self.raster_ys.clear();
        for i in 0..self.bin_count {
            let x = self.mapper.map_index_to_x(i);
            let y = self.mapper.map_amplitude_to_y(self.amplitudes.get(i));
            self.xs.push(x);
            self.ys.push(y);
            self.raster_xs.push(x * scale);
            self.raster_ys.push(y * scale);
        }
    }

    /// Amplitudes from the most recent tick.
    pub fn amplitudes(&self) -> &AmplitudeBuffer {
        &self.amplitudes
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Path data last pushed to the vector surface.
    pub fn path_description(&self) -> &str {
        &self.description
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
