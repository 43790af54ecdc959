use alloc::boxed::Box;

use crate::{error::SetupError, types::AmplitudeBuffer};

/// A live analyser that can report its current spectrum as bytes.
pub trait FrequencySource {
    /// Length of every snapshot.
    fn bin_count(&self) -> usize;

    /// Overwrite `out` with the most recent per-bin amplitudes. `out` is
    /// exactly `bin_count()` long. Must not block.
    fn get_snapshot(&mut self, out: &mut [u8]);
}

impl<T: FrequencySource + ?Sized> FrequencySource for Box<T> {
    fn bin_count(&self) -> usize {
        (**self).bin_count()
    }

    fn get_snapshot(&mut self, out: &mut [u8]) {
        (**self).get_snapshot(out)
    }
}

/// Reads a [`FrequencySource`] into a caller-owned [`AmplitudeBuffer`].
pub struct FrequencySampler<S> {
    source: S,
}

impl<S: FrequencySource> FrequencySampler<S> {
    /// Fails when `buffer_len` does not match what the source produces, so
    /// `sample` never has to check.
    pub fn new(source: S, buffer_len: usize) -> Result<Self, SetupError> {
        let expected = source.bin_count();
        if expected != buffer_len {
            return Err(SetupError::BufferLengthMismatch {
                expected,
                actual: buffer_len,
            });
        }
        Ok(Self { source })
    }

    pub fn sample(&mut self, buffer: &mut AmplitudeBuffer) {
        self.source.get_snapshot(buffer.as_mut_slice());
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
