//! Node that hands the graph's output to an audio sink.

use crate::device::AudioSink;
use crate::error::SinkError;
use crate::graph::Handle;
use crate::node::Render;
use crate::port::InputRef;

/// Terminal node: forwards its single input to an [`AudioSink`] every tick.
///
/// The sink is initialised when the render program starts and drained then
/// de-initialised when it finishes. A sink error stops rendering.
pub struct DeviceSink {
    sink: Box<dyn AudioSink>,
}

impl DeviceSink {
    pub fn new(sink: impl AudioSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl Render for DeviceSink {
    fn render(&mut self, inputs: &[f32], _outputs: &mut [f32]) -> Result<(), SinkError> {
        self.sink.feed_sample(inputs[0])
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }

    fn open(&mut self) -> Result<(), SinkError> {
        self.sink.init()
    }

    fn close(&mut self) {
        let latency = self.sink.latency();
        if latency > 0.0 {
            self.sink.sleep(latency);
        }
        self.sink.deinit();
    }

    fn kind(&self) -> &'static str {
        "device sink"
    }
}

impl Handle<DeviceSink> {
    pub fn audio_in(&self) -> InputRef {
        self.input(0)
    }
}
