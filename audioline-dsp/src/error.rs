use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyserError {
    /// Window size is not a supported power of two.
    InvalidFftSize(usize),
    /// Smoothing time constant outside `[0, 1)`.
    InvalidSmoothing(f32),
    /// `min_decibels` must be strictly below `max_decibels`.
    InvalidDecibelRange { min: f32, max: f32 },
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for AnalyserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyserError::InvalidFftSize(size) => write!(
                f,
                "FFT size must be a power of two between {} and {}, got {}",
                crate::MIN_FFT_SIZE,
                crate::MAX_FFT_SIZE,
                size
            ),
            AnalyserError::InvalidSmoothing(value) => {
                write!(f, "smoothing time constant must be in [0, 1), got {}", value)
            }
            AnalyserError::InvalidDecibelRange { min, max } => write!(
                f,
                "min_decibels ({}) must be below max_decibels ({})",
                min, max
            ),
            AnalyserError::LengthMismatch { expected, actual } => write!(
                f,
                "buffer must contain exactly {} values, got {}",
                expected, actual
            ),
        }
    }
}
