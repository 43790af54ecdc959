use core::fmt;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// Why an audio source could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum AcquireError {
    NoInputDevice,
    PermissionDenied,
    UnsupportedFormat,
    /// The device exists but its stream could not be built or started.
    StreamFailed,
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AcquireError::NoInputDevice => "no audio input device available",
            AcquireError::PermissionDenied => "access to the audio input was denied",
            AcquireError::UnsupportedFormat => "audio input sample format is not supported",
            AcquireError::StreamFailed => "audio input stream could not be started",
        };
        f.write_str(message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AcquireError {}

/// One-shot handoff of an acquired source from whoever opens the device to the
/// frame driver.
///
/// The acquiring side calls [`resolve`](Self::resolve) once; the driver polls
/// with [`try_take`](Self::try_take) between ticks, or an async task can
/// [`wait`](Self::wait).
pub struct Acquisition<S> {
    signal: Signal<CriticalSectionRawMutex, Result<S, AcquireError>>,
}

impl<S> Acquisition<S> {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    pub fn resolve(&self, result: Result<S, AcquireError>) {
        self.signal.signal(result);
    }

    /// Takes the result if it has arrived. Never blocks.
    pub fn try_take(&self) -> Option<Result<S, AcquireError>> {
        self.signal.try_take()
    }

    pub async fn wait(&self) -> Result<S, AcquireError> {
        self.signal.wait().await
    }

    pub fn is_resolved(&self) -> bool {
        self.signal.signaled()
    }
}

impl<S> Default for Acquisition<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_resolved() {
        let acquisition: Acquisition<u32> = Acquisition::new();
        assert!(!acquisition.is_resolved());
        assert_eq!(acquisition.try_take(), None);

        acquisition.resolve(Ok(7));
        assert!(acquisition.is_resolved());
        assert_eq!(acquisition.try_take(), Some(Ok(7)));
        assert_eq!(acquisition.try_take(), None);
    }

    #[test]
    fn test_error_is_delivered() {
        let acquisition: Acquisition<u32> = Acquisition::new();
        acquisition.resolve(Err(AcquireError::PermissionDenied));
        assert_eq!(acquisition.try_take(), Some(Err(AcquireError::PermissionDenied)));
    }
}
