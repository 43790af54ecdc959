use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use audioline_dsp::{normalize_sample, AnalyserConfig, FrequencyAnalyser};
use audioline_viz::{AcquireError, Acquisition, FrequencySource};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BuildStreamError, DefaultStreamConfigError, Device, SampleFormat, Stream, StreamConfig,
};
use log::{error, info, warn};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    config::{RING_WINDOWS, SHUTDOWN_POLL_MS},
    BoxedSource,
};

/// Live microphone spectrum. Samples arrive from the audio thread through a
/// ring buffer and are drained on every snapshot.
pub struct MicrophoneSource {
    consumer: Consumer<f32>,
    analyser: FrequencyAnalyser,
}

impl FrequencySource for MicrophoneSource {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    fn get_snapshot(&mut self, out: &mut [u8]) {
        let available = self.consumer.slots();
        if available > 0 {
            if let Ok(chunk) = self.consumer.read_chunk(available) {
                let (first, second) = chunk.as_slices();
                self.analyser.write_samples(first);
                self.analyser.write_samples(second);
                chunk.commit_all();
            }
        }
        self.analyser.byte_frequency_data(out);
    }
}

/// Opens the default input device on its own thread and publishes the result
/// on `acquisition`. The stream lives on that thread until `shutdown` is set.
pub fn spawn(
    config: AnalyserConfig,
    acquisition: Arc<Acquisition<BoxedSource>>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || match open(config) {
        Ok((stream, source)) => {
            acquisition.resolve(Ok(Box::new(source)));
            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(SHUTDOWN_POLL_MS));
            }
            drop(stream);
            info!("microphone stream closed");
        }
        Err(e) => acquisition.resolve(Err(e)),
    })
}

fn open(config: AnalyserConfig) -> Result<(Stream, MicrophoneSource), AcquireError> {
    let analyser = FrequencyAnalyser::new(config).map_err(|e| {
        error!("invalid analyser settings: {}", e);
        AcquireError::UnsupportedFormat
    })?;

    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(AcquireError::NoInputDevice)?;
    let supported = device.default_input_config().map_err(|e| {
        error!("no usable input configuration: {}", e);
        match e {
            DefaultStreamConfigError::DeviceNotAvailable => AcquireError::NoInputDevice,
            DefaultStreamConfigError::StreamTypeNotSupported => AcquireError::UnsupportedFormat,
            // Backends report a refused microphone as a backend-specific error.
            _ => AcquireError::PermissionDenied,
        }
    })?;

    let stream_config: StreamConfig = supported.config();
    info!(
        "input device {:?}: {} Hz, {} channel(s), {:?}",
        device.name().unwrap_or_default(),
        stream_config.sample_rate.0,
        stream_config.channels,
        supported.sample_format()
    );

    let (producer, consumer) = RingBuffer::new(config.fft_size * RING_WINDOWS);
    let stream = build_stream(&device, &stream_config, supported.sample_format(), producer)?;
    stream.play().map_err(|e| {
        error!("failed to start input stream: {}", e);
        AcquireError::StreamFailed
    })?;

    Ok((stream, MicrophoneSource { consumer, analyser }))
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    mut producer: Producer<f32>,
) -> Result<Stream, AcquireError> {
    let channels = config.channels.max(1) as usize;
    let on_error = |e: cpal::StreamError| warn!("audio stream error: {}", e);

    // Only the first channel of each frame is analysed.
    let stream = match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &_| push_frames(&mut producer, data, channels, |s| s),
            on_error,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &_| push_frames(&mut producer, data, channels, normalize_sample),
            on_error,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &_| {
                push_frames(&mut producer, data, channels, |s| (s as f32 - 32768.0) / 32768.0)
            },
            on_error,
            None,
        ),
        other => {
            error!("unsupported sample format {:?}", other);
            return Err(AcquireError::UnsupportedFormat);
        }
    };

    stream.map_err(|e| {
        error!("failed to build input stream: {}", e);
        match e {
            BuildStreamError::DeviceNotAvailable => AcquireError::NoInputDevice,
            BuildStreamError::StreamConfigNotSupported => AcquireError::UnsupportedFormat,
            _ => AcquireError::StreamFailed,
        }
    })
}

fn push_frames<T: Copy>(
    producer: &mut Producer<f32>,
    data: &[T],
    channels: usize,
    convert: impl Fn(T) -> f32,
) {
    for frame in data.chunks(channels) {
        // A full ring means the UI is behind; newer audio will follow.
        if let Err(PushError::Full(_)) = producer.push(convert(frame[0])) {
            break;
        }
    }
}
