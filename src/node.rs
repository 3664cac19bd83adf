//! Core node trait and context types.

use crate::error::SinkError;
use crate::nodes::{Combiner, Delay, DeviceSink, LowPass, Mixer, Oscillator, SampleSource};

/// Sample rate every built-in node assumes unless told otherwise.
pub const SAMPLE_RATE: u32 = 44100;

/// Graph-wide configuration handed to node constructors.
///
/// Nodes that depend on the sample rate (oscillators, delays, filters) derive
/// their constants from this once, at construction. Changing the rate means
/// building the nodes again with a different context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz (one tick per sample)
    pub sample_rate: u32,
}

impl ProcessContext {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Replace the sample rate (builder pattern).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Number of ticks covering `seconds` of audio, rounded to the nearest tick.
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        (seconds * self.sample_rate as f64).round().max(0.0) as u64
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new(SAMPLE_RATE)
    }
}

/// Unique identifier for a node within a graph.
///
/// You typically don't interact with this directly - use [`Handle`](crate::Handle) instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: u32,
    pub(crate) index: u32,
}

impl NodeId {
    /// Position of the node in its graph's insertion order.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// The per-tick processing capability every node provides.
///
/// `render` is called exactly once per tick, after every node feeding it has
/// rendered that tick. `inputs` holds the current value of each input port's
/// mapped source (silence for unconnected inputs), `outputs` holds the node's
/// output port values from the previous tick and must be overwritten.
///
/// Nodes own any multi-tick memory they need; the scheduler keeps nothing
/// besides the port values.
pub trait Render {
    /// Compute one sample.
    ///
    /// Only sinks can fail, and only because the device behind them did.
    fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError>;

    /// Number of input ports.
    fn num_inputs(&self) -> usize;

    /// Number of output ports.
    fn num_outputs(&self) -> usize;

    /// Called once before the first tick of a program.
    fn open(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called once after the last tick of a program.
    fn close(&mut self) {}

    /// Short name used in logs and errors.
    fn kind(&self) -> &'static str;
}

/// Every node kind the graph can hold.
///
/// `From` conversions exist for each variant, so [`Graph::add`](crate::Graph::add)
/// accepts the concrete node types directly.
#[enum_delegate::implement(Render,
    pub trait Render {
        fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError>;
        fn num_inputs(&self) -> usize;
        fn num_outputs(&self) -> usize;
        fn open(&mut self) -> Result<(), SinkError>;
        fn close(&mut self);
        fn kind(&self) -> &'static str;
    }
)]
pub enum Node {
    DeviceSink(DeviceSink),
    SampleSource(SampleSource),
    Oscillator(Oscillator),
    Mixer(Mixer),
    Combiner(Combiner),
    Delay(Delay),
    LowPass(LowPass),
}
