//! Built-in audio nodes.
//!
//! Nodes are organized into three categories:
//!
//! ## Sources ([`source`])
//!
//! Generate audio with no audio inputs:
//! - [`Oscillator`] - Sine wave at a fixed frequency
//! - [`SampleSource`] - Loop over pre-decoded samples
//!
//! ## Effects ([`effect`])
//!
//! Process audio (inputs → outputs):
//! - [`Mixer`] - Linear crossfade between two inputs under a control input
//! - [`Combiner`] - Weighted sum of two inputs
//! - [`Delay`] - Fixed delay line
//! - [`LowPass`] - Resonant biquad low-pass filter
//!
//! ## Sinks ([`sink`])
//!
//! Consume audio with no audio outputs:
//! - [`DeviceSink`] - Forward samples to an [`AudioSink`](crate::AudioSink)
//! - [`RtrbSink`] - Write to a ring buffer
//! - [`CpalSink`] - Output to a system audio device (requires `cpal_sink` feature)
//!
//! # Ports
//!
//! Each node kind adds named port accessors to its [`Handle`](crate::Handle),
//! e.g. `mixer.mix()` or `delay.audio_out()`. Unconnected inputs read 0.0.

pub mod source;
pub mod effect;
pub mod sink;

// Re-export common types at the top level for convenience
pub use source::{Oscillator, SampleSource};
pub use effect::{Combiner, Delay, LowPass, Mixer};
pub use sink::{DeviceSink, RtrbSink};

#[cfg(feature = "cpal_sink")]
pub use sink::CpalSink;
