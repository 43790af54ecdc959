use core::fmt;

/// Configuration problems detected while setting up a session. These are fatal
/// for the session; nothing is ever reported per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum SetupError {
    /// Width, height or pixel ratio is zero, negative or not finite.
    InvalidViewport,
    /// Analysis window is not a power of two of at least 2 samples.
    InvalidFftSize(usize),
    /// More curve bins requested than the amplitude buffer holds.
    BinCountExceedsBuffer { bin_count: usize, buffer_len: usize },
    /// Amplitude buffer length differs from the source's bin count.
    BufferLengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::InvalidViewport => {
                write!(f, "viewport dimensions must be positive and finite")
            }
            SetupError::InvalidFftSize(size) => {
                write!(f, "FFT size must be a power of two, got {}", size)
            }
            SetupError::BinCountExceedsBuffer {
                bin_count,
                buffer_len,
            } => write!(
                f,
                "bin count {} exceeds amplitude buffer length {}",
                bin_count, buffer_len
            ),
            SetupError::BufferLengthMismatch { expected, actual } => write!(
                f,
                "amplitude buffer holds {} bins but the source produces {}",
                actual, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SetupError {}
