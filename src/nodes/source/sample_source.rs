//! Looping playback of an in-memory sample buffer.

use std::path::Path;

use crate::error::{Error, Result, SinkError};
use crate::graph::Handle;
use crate::node::Render;
use crate::port::OutputRef;
use crate::samples;

/// Plays a mono sample buffer in a loop, one sample per tick.
///
/// After the last sample it wraps back to the first without a gap. The buffer
/// is assumed to be at the graph's sample rate; nothing is resampled.
///
/// # Example
///
/// ```no_run
/// use klangwerk::Graph;
/// use klangwerk::nodes::SampleSource;
///
/// let mut graph = Graph::new();
/// let music = graph.add(SampleSource::from_file("music.f32")?);
/// # let _ = music;
/// # Ok::<(), klangwerk::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct SampleSource {
    samples: Vec<f32>,
    position: usize,
}

impl SampleSource {
    /// Create a source from decoded samples.
    ///
    /// An empty buffer has nothing to loop over and is rejected.
    pub fn new(samples: Vec<f32>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::invalid("sample source", "sample buffer is empty"));
        }
        Ok(Self {
            samples,
            position: 0,
        })
    }

    /// Load a raw little-endian `f32` file (see [`samples::read_f32_file`]).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(samples::read_f32_file(path)?)
    }

    /// Number of samples in one loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; empty buffers are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the sample the next tick will emit.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Render for SampleSource {
    fn render(&mut self, _inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        outputs[0] = self.samples[self.position];
        self.position = (self.position + 1) % self.samples.len();
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 0 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "sample source"
    }
}

impl Handle<SampleSource> {
    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}
