pub const WINDOW_TITLE: &str = "Audioline Simulator";

pub const DEFAULT_WIDTH: f32 = 960.0;
pub const DEFAULT_HEIGHT: f32 = 540.0;
pub const FRAME_DELAY_MS: u64 = 16;

/// Ring buffer between the audio callback and the analyser, in analysis windows.
pub const RING_WINDOWS: usize = 8;
/// How often the audio thread checks for shutdown.
pub const SHUTDOWN_POLL_MS: u64 = 50;

pub const SYNTHETIC_SAMPLE_RATE: f32 = 48_000.0;
/// Samples generated per displayed frame (48 kHz at 60 fps).
pub const SYNTHETIC_SAMPLES_PER_FRAME: usize = 800;

pub const IDLE_MESSAGE: &str = "waiting for audio input";
