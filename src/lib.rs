//! A small dataflow engine for per-sample audio synthesis.
//!
//! Build a [`Graph`] of nodes, wire output ports to input ports, and
//! [`compile`](Graph::compile) it once into a [`RenderProgram`]. Every tick the
//! program renders each node exactly once, in an order where every node comes
//! after the nodes feeding it, producing one output sample.
//!
//! ```
//! use klangwerk::{Graph, ProcessContext};
//! use klangwerk::nodes::{Delay, DeviceSink, LowPass, Oscillator, RtrbSink};
//!
//! let ctx = ProcessContext::default();
//! let (producer, mut consumer) = rtrb::RingBuffer::new(4410);
//!
//! let mut graph = Graph::with_context(ctx);
//! let osc = graph.add(Oscillator::new(&ctx, 220.0)?);
//! let filter = graph.add(LowPass::new(&ctx, 800.0)?);
//! let echo = graph.add(Delay::new(&ctx, 0.01)?);
//! let out = graph.add(DeviceSink::new(RtrbSink::new(producer)));
//!
//! graph.connect(osc.audio_out(), filter.audio_in())?;
//! graph.connect(filter.audio_out(), echo.audio_in())?;
//! graph.connect(echo.audio_out(), out.audio_in())?;
//!
//! let mut program = graph.compile()?;
//! program.run_for(0.1)?;
//! assert_eq!(consumer.slots(), 4410);
//! # Ok::<(), klangwerk::Error>(())
//! ```
//!
//! Rendering is single threaded and synchronous. Nodes keep their own history
//! (delay lines, filter state); the only state shared between nodes is the
//! current value of each output port.

pub mod device;
pub mod error;
pub mod node;
pub mod nodes;
pub mod port;
pub mod samples;

mod graph;
mod program;

pub use device::AudioSink;
#[cfg(feature = "cpal_sink")]
pub use device::CpalDevice;
pub use error::{CycleError, Error, Result, SinkError};
pub use graph::{Graph, Handle};
pub use node::{Node, NodeId, ProcessContext, Render, SAMPLE_RATE};
pub use port::{Connection, InputRef, OutputRef};
pub use program::{RenderProgram, StopSignal};
