mod config;
mod microphone;
mod svg;
mod synthetic;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context};
use audioline_dsp::AnalyserConfig;
use audioline_viz::{
    setup, Acquisition, DriverState, FrameDriver, Framebuffer, FrequencySource, Presentation,
    SessionConfig, TickOutcome, Viewport, Visualization,
};
use clap::{Parser, ValueEnum};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Alignment, Text},
};
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::{info, warn};

use crate::{config::*, svg::SvgSurface, synthetic::SyntheticSource};

pub type BoxedSource = Box<dyn FrequencySource + Send>;

const WHITE: Rgb888 = Rgb888::new(255, 255, 255);
const BLACK: Rgb888 = Rgb888::new(0, 0, 0);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresentationArg {
    /// Translucent white overlay leaving a trail.
    Fade,
    /// Opaque white background every frame.
    Clear,
    /// Draw over the previous frame.
    None,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    Microphone,
    Synthetic,
}

#[derive(Parser, Debug)]
#[command(about = "Live spectrum grid and curve from the default microphone")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: f32,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: f32,
    /// Device pixels per logical pixel.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,
    #[arg(long, default_value_t = 0.9)]
    smoothing: f32,
    /// Bins drawn by the curve.
    #[arg(long, default_value_t = 100)]
    bin_count: usize,
    /// Base radius of the grid circles.
    #[arg(long, default_value_t = 31.0)]
    radius: f32,
    #[arg(long, value_enum, default_value_t = PresentationArg::Fade)]
    presentation: PresentationArg,
    #[arg(long, value_enum, default_value_t = SourceArg::Microphone)]
    source: SourceArg,
    /// Run without a window. The visualization stays inert.
    #[arg(long)]
    headless: bool,
    /// Write the last curve as an SVG document on exit.
    #[arg(long)]
    svg_out: Option<PathBuf>,
}

impl Args {
    fn analyser_config(&self) -> AnalyserConfig {
        AnalyserConfig {
            fft_size: self.fft_size,
            smoothing_time_constant: self.smoothing,
            ..AnalyserConfig::default()
        }
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            fft_size: self.fft_size,
            bin_count: self.bin_count,
            grid_radius: self.radius,
            presentation: match self.presentation {
                PresentationArg::Fade => Presentation::default(),
                PresentationArg::Clear => Presentation::Clear(WHITE),
                PresentationArg::None => Presentation::Keep,
            },
            ..SessionConfig::default()
        }
    }

    fn viewport(&self) -> Option<Viewport> {
        if self.headless {
            None
        } else {
            Some(Viewport::new(self.width, self.height, self.pixel_ratio))
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let analyser_config = args.analyser_config();
    analyser_config
        .validate()
        .map_err(|e| anyhow!("invalid analyser settings: {}", e))?;

    let visualization = setup::<BoxedSource>(&args.session_config(), args.viewport())
        .context("setting up visualization")?;
    let mut driver = match visualization {
        Visualization::Active(driver) => driver,
        Visualization::Inert => {
            info!("no display available, nothing to draw");
            return Ok(());
        }
    };

    let acquisition: Arc<Acquisition<BoxedSource>> = Arc::new(Acquisition::new());
    let shutdown = Arc::new(AtomicBool::new(false));
    let audio_thread = match args.source {
        SourceArg::Microphone => Some(microphone::spawn(
            analyser_config,
            Arc::clone(&acquisition),
            Arc::clone(&shutdown),
        )),
        SourceArg::Synthetic => {
            let source = SyntheticSource::new(analyser_config)
                .map_err(|e| anyhow!("invalid analyser settings: {}", e))?;
            acquisition.resolve(Ok(Box::new(source)));
            None
        }
    };

    let mut svg = SvgSurface::new(args.width, args.height);
    let result = run(&mut driver, &acquisition, &mut svg);

    shutdown.store(true, Ordering::Relaxed);
    if let Some(handle) = audio_thread {
        if handle.join().is_err() {
            warn!("audio thread panicked");
        }
    }
    result?;

    if let Some(path) = &args.svg_out {
        svg.write_to(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("curve written to {}", path.display());
    }
    Ok(())
}

fn run(
    driver: &mut FrameDriver<BoxedSource>,
    acquisition: &Acquisition<BoxedSource>,
    svg: &mut SvgSurface,
) -> anyhow::Result<()> {
    let (width, height) = driver.viewport().raster_size();
    let size = Size::new(width, height);
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(size);
    let mut framebuffer = Framebuffer::new(size, WHITE);
    let mut window = Window::new(
        WINDOW_TITLE,
        &OutputSettingsBuilder::new()
            .theme(BinaryColorTheme::Default)
            .build(),
    );

    let mut state = DriverState::Idle;
    loop {
        let polled = driver.poll_acquisition(acquisition);
        if polled != state {
            info!("visualization {:?}", polled);
            state = polled;
        }

        match driver.tick(&mut framebuffer, svg) {
            TickOutcome::Rendered { .. } => framebuffer.blit(&mut display)?,
            TickOutcome::Idle => {
                display.clear(WHITE)?;
                Text::with_alignment(
                    IDLE_MESSAGE,
                    Point::new(width as i32 / 2, height as i32 / 2),
                    MonoTextStyle::new(&FONT_6X10, BLACK),
                    Alignment::Center,
                )
                .draw(&mut display)?;
            }
        }

        window.update(&display);
        if window.events().any(|event| matches!(event, SimulatorEvent::Quit)) {
            break;
        }

        thread::sleep(Duration::from_millis(FRAME_DELAY_MS));
    }

    info!("stopped after {} frames", driver.frame_count());
    Ok(())
}
