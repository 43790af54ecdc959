use core::f32::consts::TAU;

use audioline_dsp::{AnalyserConfig, AnalyserError, FrequencyAnalyser};
use audioline_viz::FrequencySource;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{SYNTHETIC_SAMPLES_PER_FRAME, SYNTHETIC_SAMPLE_RATE};

/// Base frequencies of the generated tones, in Hz.
const TONES: [f32; 3] = [220.0, 880.0, 2_640.0];

/// Gain of tone `index` at `time`, between 0 and 1.
pub fn calculate_amplitude(index: f32, time: f32, frequency: f32) -> f32 {
    let phase = time + index * frequency * TAU;
    phase.sin() * 0.5 + 0.5
}

/// Stand-in for a microphone: a few slowly wobbling tones fed through the
/// same analyser, one display frame of audio per snapshot.
pub struct SyntheticSource {
    analyser: FrequencyAnalyser,
    phases: [f32; TONES.len()],
    time: f32,
    block: Vec<f32>,
}

impl SyntheticSource {
    pub fn new(config: AnalyserConfig) -> Result<Self, AnalyserError> {
        Ok(Self {
            analyser: FrequencyAnalyser::new(config)?,
            phases: [0.0; TONES.len()],
            time: 0.0,
            block: vec![0.0; SYNTHETIC_SAMPLES_PER_FRAME],
        })
    }

    fn generate(&mut self) {
        let wobble = (self.time * 0.7).sin();
        for sample in self.block.iter_mut() {
            let mut value = 0.0;
            for (i, (&base, phase)) in TONES.iter().zip(self.phases.iter_mut()).enumerate() {
                let frequency = base * (1.0 + 0.25 * wobble);
                *phase = (*phase + TAU * frequency / SYNTHETIC_SAMPLE_RATE) % TAU;
                value += calculate_amplitude(i as f32, self.time, 0.3) * phase.sin();
            }
            *sample = value / TONES.len() as f32;
        }
        self.time += SYNTHETIC_SAMPLES_PER_FRAME as f32 / SYNTHETIC_SAMPLE_RATE;
    }
}

impl FrequencySource for SyntheticSource {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    fn get_snapshot(&mut self, out: &mut [u8]) {
        self.generate();
        self.analyser.write_samples(&self.block);
        self.analyser.byte_frequency_data(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_stays_in_unit_range() {
        for step in 0..200 {
            let a = calculate_amplitude(step as f32 * 0.1, step as f32 * 0.05, 1.0);
            assert!((0.0..=1.0).contains(&a), "{}", a);
        }
    }

    #[test]
    fn test_snapshots_show_energy() {
        let mut source = SyntheticSource::new(AnalyserConfig::default()).unwrap();
        let mut bins = vec![0u8; source.bin_count()];
        for _ in 0..10 {
            source.get_snapshot(&mut bins);
        }
        assert_eq!(bins.len(), 512);
        assert!(bins.iter().any(|&b| b > 0));
    }
}
