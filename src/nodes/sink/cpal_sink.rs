//! CPAL audio output sink

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::{debug, error};

use crate::device::AudioSink;
use crate::error::SinkError;

/// An [`AudioSink`] that plays through a CPAL device.
///
/// The CPAL stream runs on its own thread; `feed_sample` pushes into a ring
/// buffer that the stream consumes. When the buffer is full the render loop
/// waits for the device, so rendering runs at playback speed. Each mono
/// sample is copied to every device channel.
pub struct CpalSink {
    device: cpal::Device,
    channels: u16,
    sample_rate: u32,

    buffer: Option<Producer<f32>>,
    status: StreamStatus,
    running: Arc<AtomicBool>,
    stream_thread: Option<JoinHandle<()>>,
}

impl CpalSink {
    /// Create a sink for `device`; nothing is opened until [`AudioSink::init`].
    pub fn new(device: cpal::Device, channels: u16, sample_rate: u32) -> Self {
        Self {
            device,
            channels: channels.max(1),
            sample_rate,
            buffer: None,
            status: StreamStatus::default(),
            running: Arc::new(AtomicBool::new(false)),
            stream_thread: None,
        }
    }

    /// Open the system's default output device.
    pub fn default_output(sample_rate: u32) -> Result<Self, SinkError> {
        use cpal::traits::HostTrait;

        let device = cpal::default_host()
            .default_output_device()
            .ok_or(SinkError::Unavailable)?;
        let channels = device
            .default_output_config()
            .map_err(|e| SinkError::Stream(e.to_string()))?
            .channels();
        Ok(Self::new(device, channels, sample_rate))
    }

}

/// First error reported by the stream callback, shared with the render thread.
#[derive(Clone, Debug, Default)]
struct StreamStatus(Arc<Mutex<Option<String>>>);

impl StreamStatus {
    /// Keep the first error; later ones are usually fallout from it.
    fn report(&self, message: String) {
        if let Ok(mut slot) = self.0.lock() {
            slot.get_or_insert(message);
        }
    }

    fn check(&self) -> Result<(), SinkError> {
        match self.0.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(message) => Err(SinkError::Stream(message.clone())),
                None => Ok(()),
            },
            Err(_) => Err(SinkError::Stream("stream error state poisoned".into())),
        }
    }

    /// Forget errors from a previous stream.
    fn clear(&self) {
        match self.0.lock() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl AudioSink for CpalSink {
    fn init(&mut self) -> Result<(), SinkError> {
        if self.buffer.is_some() {
            return Ok(());
        }
        self.status.clear();

        let sample_format = self
            .device
            .default_output_config()
            .map_err(|e| SinkError::Stream(e.to_string()))?
            .sample_format();
        let config = cpal::StreamConfig {
            channels: self.channels,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        // Ring buffer sized for ~100ms of audio to handle scheduling jitter
        let buffer_size = ((self.sample_rate as f32 * 0.1) as usize)
            .next_power_of_two()
            .max(8192);
        let (producer, consumer) = RingBuffer::<f32>::new(buffer_size);

        let (ready_tx, ready_rx) = mpsc::channel();
        let device = self.device.clone();
        let status = self.status.clone();
        let running = self.running.clone();
        running.store(true, Ordering::Release);

        // The stream lives as long as this thread
        let handle = thread::spawn(move || {
            let stream = match build_stream(&device, sample_format, &config, consumer, status) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(e.to_string()));
                return;
            }

            let _ = ready_tx.send(Ok(()));
            while running.load(Ordering::Acquire) {
                thread::park();
            }
            drop(stream);
        });

        match ready_rx.recv() {
            Ok(Ok(())) => {
                debug!(
                    channels = self.channels,
                    sample_rate = self.sample_rate,
                    buffer_size,
                    "cpal stream started"
                );
                self.buffer = Some(producer);
                self.stream_thread = Some(handle);
                Ok(())
            }
            Ok(Err(message)) => {
                self.running.store(false, Ordering::Release);
                let _ = handle.join();
                Err(SinkError::Stream(message))
            }
            Err(_) => {
                self.running.store(false, Ordering::Release);
                let _ = handle.join();
                Err(SinkError::Stream("stream thread exited".into()))
            }
        }
    }

    fn feed_sample(&mut self, sample: f32) -> Result<(), SinkError> {
        self.status.check()?;
        let buffer = self.buffer.as_mut().ok_or(SinkError::Closed)?;

        let mut sample = sample;
        loop {
            match buffer.push(sample) {
                Ok(()) => return Ok(()),
                Err(PushError::Full(rejected)) => {
                    sample = rejected;
                    thread::sleep(Duration::from_millis(1));
                    self.status.check()?;
                }
            }
        }
    }

    fn sleep(&mut self, seconds: f64) {
        thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
    }

    fn deinit(&mut self) {
        self.buffer = None;
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.stream_thread.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }

    fn latency(&self) -> f64 {
        match &self.buffer {
            Some(buffer) => {
                let queued = buffer.buffer().capacity() - buffer.slots();
                queued as f64 / self.sample_rate as f64
            }
            None => 0.0,
        }
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.deinit();
    }
}

fn build_stream(
    device: &cpal::Device,
    sample_format: SampleFormat,
    config: &cpal::StreamConfig,
    consumer: Consumer<f32>,
    status: StreamStatus,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    match sample_format {
        SampleFormat::F32 => build_typed::<f32>(device, config, consumer, status),
        SampleFormat::I16 => build_typed::<i16>(device, config, consumer, status),
        SampleFormat::U16 => build_typed::<u16>(device, config, consumer, status),
        _ => Err(cpal::BuildStreamError::StreamConfigNotSupported),
    }
}

fn build_typed<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: Consumer<f32>,
    status: StreamStatus,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                // Underruns play silence
                let value = T::from_sample(consumer.pop().unwrap_or(0.0));
                frame.iter_mut().for_each(|d| *d = value);
            }
        },
        move |err| {
            error!(%err, "cpal stream error");
            status.report(err.to_string());
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_status_keeps_the_first_error_until_cleared() {
        let status = StreamStatus::default();
        let shared = status.clone();
        assert!(status.check().is_ok());

        shared.report("device unplugged".into());
        shared.report("buffer underrun".into());
        match status.check() {
            Err(SinkError::Stream(message)) => assert_eq!(message, "device unplugged"),
            other => panic!("expected a stream error, got {other:?}"),
        }

        // A reopened sink starts from a clean slate
        status.clear();
        assert!(shared.check().is_ok());
    }
}
