use alloc::{vec, vec::Vec};

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::{apply_hann_window, fill_magnitude, is_valid_fft_size, normalize_sample, AnalyserError};
use microdsp::common::real_fft;

/// Settings for a [`FrequencyAnalyser`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserConfig {
    /// Number of time-domain samples per transform. Bins = `fft_size / 2`.
    pub fft_size: usize,
    /// Weight of the previous spectrum when blending in a new one.
    /// Higher values respond more slowly to transients.
    pub smoothing_time_constant: f32,
    /// Level mapped to byte value 0.
    pub min_decibels: f32,
    /// Level mapped to byte value 255.
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            smoothing_time_constant: 0.9,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> Result<(), AnalyserError> {
        if !is_valid_fft_size(self.fft_size) {
            return Err(AnalyserError::InvalidFftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(AnalyserError::InvalidSmoothing(self.smoothing_time_constant));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(AnalyserError::InvalidDecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

/// Streaming spectrum analyser.
///
/// Samples are appended to a circular window of `fft_size` samples. Reading the
/// spectrum transforms the most recent window, but only when new samples have
/// arrived since the previous read; otherwise the last smoothed spectrum is
/// returned unchanged. All buffers are allocated in [`FrequencyAnalyser::new`].
pub struct FrequencyAnalyser {
    config: AnalyserConfig,
    /// Circular time-domain window.
    window: Vec<f32>,
    write_pos: usize,
    /// Chronologically ordered copy of `window`, transformed in place.
    scratch: Vec<f32>,
    magnitude: Vec<f32>,
    smoothed: Vec<f32>,
    pending: bool,
}

impl FrequencyAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, AnalyserError> {
        config.validate()?;
        let bins = config.frequency_bin_count();
        Ok(Self {
            config,
            window: vec![0.0; config.fft_size],
            write_pos: 0,
            scratch: vec![0.0; config.fft_size],
            magnitude: vec![0.0; bins],
            smoothed: vec![0.0; bins],
            pending: false,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.config.frequency_bin_count()
    }

    /// Append samples, overwriting the oldest ones once the window is full.
    pub fn write_samples(&mut self, samples: &[f32]) {
        let len = self.window.len();
        for &sample in samples {
            self.window[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % len;
        }
        if !samples.is_empty() {
            self.pending = true;
        }
    }

    pub fn write_samples_i16(&mut self, samples: &[i16]) {
        let len = self.window.len();
        for &sample in samples {
            self.window[self.write_pos] = normalize_sample(sample);
            self.write_pos = (self.write_pos + 1) % len;
        }
        if !samples.is_empty() {
            self.pending = true;
        }
    }

    /// Spectrum in decibels, one value per bin. Extra output slots are left untouched.
    pub fn float_frequency_data(&mut self, out: &mut [f32]) {
        self.analyse();
        for (value, &smoothed) in out.iter_mut().zip(&self.smoothed) {
            *value = to_decibels(smoothed);
        }
    }

    /// Spectrum scaled so `min_decibels` is 0 and `max_decibels` is 255.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        let min = self.config.min_decibels;
        let scale = 255.0 / (self.config.max_decibels - min);
        for (value, &smoothed) in out.iter_mut().zip(&self.smoothed) {
            let scaled = (to_decibels(smoothed) - min) * scale;
            *value = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }
    }

    fn analyse(&mut self) {
        if !self.pending {
            return;
        }
        self.pending = false;

        let tail = self.window.len() - self.write_pos;
        self.scratch[..tail].copy_from_slice(&self.window[self.write_pos..]);
        self.scratch[tail..].copy_from_slice(&self.window[..self.write_pos]);

        apply_hann_window(&mut self.scratch);
        let spectrum = real_fft(&mut self.scratch);
        fill_magnitude(spectrum, &mut self.magnitude);

        let tau = self.config.smoothing_time_constant;
        let norm = 1.0 / self.config.fft_size as f32;
        for (smoothed, &magnitude) in self.smoothed.iter_mut().zip(&self.magnitude) {
            let next = tau * *smoothed + (1.0 - tau) * magnitude * norm;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }
    }
}

fn to_decibels(linear: f32) -> f32 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f32::NEG_INFINITY
    }
}
