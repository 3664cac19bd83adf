//! Audio sink boundary and CPAL device discovery.
//!
//! The render scheduler never talks to hardware directly. A
//! [`DeviceSink`](crate::nodes::DeviceSink) node forwards each sample to an
//! [`AudioSink`], which is the only place playback happens.
//!
//! # Example: List and Select a Device
//!
//! ```no_run
//! # #[cfg(feature = "cpal_sink")]
//! # {
//! use klangwerk::{CpalDevice, ProcessContext};
//! use klangwerk::nodes::DeviceSink;
//!
//! // List all available output devices
//! let devices = CpalDevice::list_outputs();
//! for (i, device) in devices.iter().enumerate() {
//!     println!("[{}] {} ({} Hz, {} ch)",
//!         i, device.name(), device.sample_rate(), device.channels());
//! }
//!
//! // Play through a specific device at the graph's rate
//! let ctx = ProcessContext::default();
//! let sink = DeviceSink::new(devices[0].create_sink(&ctx));
//! # let _ = sink;
//! # }
//! ```

use crate::error::SinkError;

/// Where rendered samples go.
///
/// Mirrors a minimal playback device: it is initialised once, fed one sample
/// per tick, given time to play out what it has buffered, then shut down.
/// Failures are reported to the caller; a sink never retries on its own.
pub trait AudioSink: Send {
    /// Acquire the device. Called before the first sample.
    fn init(&mut self) -> Result<(), SinkError>;

    /// Queue one mono sample for playback.
    fn feed_sample(&mut self, sample: f32) -> Result<(), SinkError>;

    /// Block the caller for `seconds` while playback continues.
    fn sleep(&mut self, seconds: f64);

    /// Release the device. Further samples fail with [`SinkError::Closed`].
    fn deinit(&mut self);

    /// Seconds of audio queued but not yet played.
    fn latency(&self) -> f64 {
        0.0
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn init(&mut self) -> Result<(), SinkError> {
        (**self).init()
    }

    fn feed_sample(&mut self, sample: f32) -> Result<(), SinkError> {
        (**self).feed_sample(sample)
    }

    fn sleep(&mut self, seconds: f64) {
        (**self).sleep(seconds)
    }

    fn deinit(&mut self) {
        (**self).deinit()
    }

    fn latency(&self) -> f64 {
        (**self).latency()
    }
}

#[cfg(feature = "cpal_sink")]
pub use self::cpal_device::CpalDevice;

#[cfg(feature = "cpal_sink")]
mod cpal_device {
    use cpal::traits::{DeviceTrait, HostTrait};

    use crate::node::ProcessContext;
    use crate::nodes::CpalSink;

    /// A discovered audio output device.
    ///
    /// Use [`CpalDevice::default_output`] to get the system default, or
    /// [`CpalDevice::list_outputs`] to enumerate all available devices.
    pub struct CpalDevice {
        device: cpal::Device,
        name: String,
        sample_rate: u32,
        channels: u16,
    }

    impl CpalDevice {
        /// Get the system's default output device.
        ///
        /// Returns `None` if no audio device is available.
        pub fn default_output() -> Option<Self> {
            let host = cpal::default_host();
            let device = host.default_output_device()?;
            Self::describe(device)
        }

        /// List all available audio output devices.
        ///
        /// Returns an empty list if no devices are found or if enumeration fails.
        pub fn list_outputs() -> Vec<Self> {
            let host = cpal::default_host();
            host.output_devices()
                .map(|devices| devices.filter_map(Self::describe).collect())
                .unwrap_or_default()
        }

        fn describe(device: cpal::Device) -> Option<Self> {
            let config = device.default_output_config().ok()?;
            let name = device.name().unwrap_or_else(|_| "Unknown".into());
            Some(Self {
                sample_rate: config.sample_rate().0,
                channels: config.channels(),
                name,
                device,
            })
        }

        /// Get the device name.
        pub fn name(&self) -> &str {
            &self.name
        }

        /// Get the device's default sample rate in Hz.
        pub fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        /// Get the number of output channels.
        pub fn channels(&self) -> u16 {
            self.channels
        }

        /// Create a sink that plays this device at the graph's sample rate.
        ///
        /// The stream is not opened until the sink is initialised; a device
        /// that can't run at `ctx.sample_rate` fails then.
        pub fn create_sink(&self, ctx: &ProcessContext) -> CpalSink {
            CpalSink::new(self.device.clone(), self.channels, ctx.sample_rate)
        }
    }
}
