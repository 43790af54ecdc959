use audioline_dsp::{
    apply_hann_window, magnitude_spectrum, normalize_samples, AnalyserConfig, AnalyserError,
    FrequencyAnalyser,
};
use approx::assert_abs_diff_eq;
use rand::Rng;
pub mod common;
use common::*;

const TOLERANCE: f32 = 1e-3;

#[test]
fn test_normalize_samples_real_world() {
    let sine_i16 = generate_sine_samples_i16(BIN_32_HZ, FFT_SIZE);
    let expected_output = generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE);
    let mut normalized_samples = [0.0; FFT_SIZE];
    normalize_samples(&sine_i16, &mut normalized_samples);
    for (i, &normalized) in normalized_samples.iter().enumerate() {
        assert!(
            (normalized - expected_output[i]).abs() < TOLERANCE,
            "Expected {}, got {} at index {}",
            expected_output[i],
            normalized,
            i
        );
    }
}

#[test]
fn test_apply_hann_window_tapers_edges() {
    let mut samples = [1.0f32; FFT_SIZE];
    apply_hann_window(&mut samples);

    assert_abs_diff_eq!(samples[0], 0.0, epsilon = 0.01);
    assert_abs_diff_eq!(samples[FFT_SIZE / 2], 1.0, epsilon = 0.01);
    assert!(samples[FFT_SIZE / 4] < samples[FFT_SIZE / 2]);
}

#[test]
fn test_magnitude_spectrum_peaks_at_sine_bin() {
    let mut samples = generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE);
    let mut magnitude = [0.0; FFT_SIZE / 2];
    magnitude_spectrum(&mut samples, &mut magnitude).unwrap();

    assert_eq!(peak_bin(&magnitude), 32);
}

#[test]
fn test_magnitude_spectrum_rejects_bad_lengths() {
    let mut samples = [0.0f32; 1000];
    let mut magnitude = [0.0f32; 500];
    assert_eq!(
        magnitude_spectrum(&mut samples, &mut magnitude),
        Err(AnalyserError::InvalidFftSize(1000))
    );

    let mut samples = [0.0f32; FFT_SIZE];
    let mut magnitude = [0.0f32; 100];
    assert_eq!(
        magnitude_spectrum(&mut samples, &mut magnitude),
        Err(AnalyserError::LengthMismatch {
            expected: 512,
            actual: 100
        })
    );
}

#[test]
fn test_analyser_bytes_follow_sine() {
    let config = AnalyserConfig {
        smoothing_time_constant: 0.0,
        ..AnalyserConfig::default()
    };
    let mut analyser = FrequencyAnalyser::new(config).unwrap();
    analyser.write_samples(&generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE));

    let mut bytes = [0u8; FFT_SIZE / 2];
    analyser.byte_frequency_data(&mut bytes);

    assert_eq!(bytes[32], 255);
    assert!(bytes[300] < bytes[32]);
    assert!(bytes[300] < 200, "far bin too loud: {}", bytes[300]);
}

#[test]
fn test_analyser_i16_input_matches_f32_peak() {
    let config = AnalyserConfig {
        smoothing_time_constant: 0.0,
        ..AnalyserConfig::default()
    };
    let mut analyser = FrequencyAnalyser::new(config).unwrap();
    analyser.write_samples_i16(&generate_sine_samples_i16(BIN_32_HZ, FFT_SIZE));

    let mut decibels = [0.0f32; FFT_SIZE / 2];
    analyser.float_frequency_data(&mut decibels);
    assert_eq!(peak_bin(&decibels), 32);
}

#[test]
fn test_smoothing_slows_response() {
    let sine = generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE);

    let mut fast = FrequencyAnalyser::new(AnalyserConfig {
        smoothing_time_constant: 0.0,
        ..AnalyserConfig::default()
    })
    .unwrap();
    let mut slow = FrequencyAnalyser::new(AnalyserConfig {
        smoothing_time_constant: 0.9,
        ..AnalyserConfig::default()
    })
    .unwrap();
    fast.write_samples(&sine);
    slow.write_samples(&sine);

    let mut fast_db = [0.0f32; FFT_SIZE / 2];
    let mut slow_db = [0.0f32; FFT_SIZE / 2];
    fast.float_frequency_data(&mut fast_db);
    slow.float_frequency_data(&mut slow_db);

    // One frame at tau = 0.9 carries a tenth of the energy: 20 dB down.
    assert_abs_diff_eq!(fast_db[32] - slow_db[32], 20.0, epsilon = 0.5);
}

#[test]
fn test_reads_without_new_samples_are_stale() {
    let mut analyser = FrequencyAnalyser::new(AnalyserConfig::default()).unwrap();
    analyser.write_samples(&generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE));

    let mut first = [0.0f32; FFT_SIZE / 2];
    let mut second = [0.0f32; FFT_SIZE / 2];
    analyser.float_frequency_data(&mut first);
    analyser.float_frequency_data(&mut second);
    assert_eq!(first, second);

    // New audio moves the smoothed spectrum again.
    analyser.write_samples(&generate_sine_samples_f32(BIN_32_HZ, FFT_SIZE));
    analyser.float_frequency_data(&mut second);
    assert!(second[32] > first[32]);
}

#[test]
fn test_noise_produces_finite_spectrum() {
    let mut rng = rand::rng();
    let noise: Vec<f32> = (0..FFT_SIZE * 3)
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect();

    let mut analyser = FrequencyAnalyser::new(AnalyserConfig::default()).unwrap();
    for chunk in noise.chunks(256) {
        analyser.write_samples(chunk);
        let mut decibels = [0.0f32; FFT_SIZE / 2];
        analyser.float_frequency_data(&mut decibels);
        assert!(decibels.iter().all(|db| !db.is_nan()));
    }
}
