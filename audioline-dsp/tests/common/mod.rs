use wavegen::{sine, wf};

pub const SAMPLE_RATE: f32 = 48_000.0;
pub const FFT_SIZE: usize = 1024;
/// Lands exactly on the centre of bin 32 for a 1024-point window at 48 kHz.
pub const BIN_32_HZ: f32 = 1_500.0;

pub fn generate_sine_samples_f32(frequency: f32, len: usize) -> Vec<f32> {
    let waveform = wf!(f32, SAMPLE_RATE, sine!(frequency));
    waveform.iter().take(len).collect()
}

pub fn generate_sine_samples_i16(frequency: f32, len: usize) -> Vec<i16> {
    generate_sine_samples_f32(frequency, len)
        .into_iter()
        .map(|s| (s * i16::MAX as f32) as i16)
        .collect()
}

pub fn peak_bin(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}
