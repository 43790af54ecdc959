#![no_std]
extern crate alloc;

mod analyser;
mod error;

pub use analyser::{AnalyserConfig, FrequencyAnalyser};
pub use error::AnalyserError;

use microdsp::common::{apply_window_function, real_fft, WindowFunctionType::Hann};
use microfft::Complex32;
#[allow(unused_imports)]
use micromath::F32Ext;

/// Smallest supported analysis window.
pub const MIN_FFT_SIZE: usize = 32;
/// Largest supported analysis window.
pub const MAX_FFT_SIZE: usize = 2048;

/// Returns true for power-of-two window sizes the FFT backend supports.
pub fn is_valid_fft_size(size: usize) -> bool {
    size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&size)
}

/// Normalize a single sample from i16 to f32.
pub fn normalize_sample(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

/// Normalize a slice of i16 samples to a slice of f32 samples.
pub fn normalize_samples(samples: &[i16], normalized_samples: &mut [f32]) {
    for (out, &sample) in normalized_samples.iter_mut().zip(samples) {
        *out = normalize_sample(sample);
    }
}

/// Apply a Hann window to a slice of f32 samples.
pub fn apply_hann_window(samples: &mut [f32]) {
    apply_window_function(Hann, samples);
}

/// Compute the magnitude of each bin of a real FFT output.
pub fn compute_magnitude(fft_output: &[Complex32], magnitude: &mut [f32]) -> Result<(), AnalyserError> {
    if magnitude.len() != fft_output.len() {
        return Err(AnalyserError::LengthMismatch {
            expected: fft_output.len(),
            actual: magnitude.len(),
        });
    }
    fill_magnitude(fft_output, magnitude);
    Ok(())
}

/// Window `samples` in place, transform them and write `samples.len() / 2`
/// bin magnitudes into `magnitude`.
pub fn magnitude_spectrum(samples: &mut [f32], magnitude: &mut [f32]) -> Result<(), AnalyserError> {
    if !is_valid_fft_size(samples.len()) {
        return Err(AnalyserError::InvalidFftSize(samples.len()));
    }
    if magnitude.len() != samples.len() / 2 {
        return Err(AnalyserError::LengthMismatch {
            expected: samples.len() / 2,
            actual: magnitude.len(),
        });
    }

    apply_hann_window(samples);
    let spectrum = real_fft(samples);
    fill_magnitude(spectrum, magnitude);
    Ok(())
}

// The real FFT packs the Nyquist term into the imaginary part of bin 0.
fn fill_magnitude(fft_output: &[Complex32], magnitude: &mut [f32]) {
    for (i, (out, component)) in magnitude.iter_mut().zip(fft_output).enumerate() {
        *out = if i == 0 {
            component.re.abs()
        } else {
            (component.re * component.re + component.im * component.im).sqrt()
        };
    }
}
