//! Ring buffer sink for recording, analysis, or another thread

use rtrb::Producer;

use crate::device::AudioSink;
use crate::error::SinkError;

/// An [`AudioSink`] that pushes samples into an rtrb ring buffer.
///
/// Useful for:
/// - Capturing a render for tests or offline analysis
/// - Sending audio to another thread
///
/// The ring buffer is never waited on: a full buffer fails the tick with
/// [`SinkError::Full`], so size it for the render or drain it concurrently.
///
/// ```
/// use klangwerk::nodes::RtrbSink;
///
/// let (producer, mut consumer) = rtrb::RingBuffer::new(1024);
/// let sink = RtrbSink::new(producer);
/// # let _ = (sink, consumer.pop());
/// ```
#[derive(Debug)]
pub struct RtrbSink {
    producer: Producer<f32>,
    open: bool,
}

impl RtrbSink {
    pub fn new(producer: Producer<f32>) -> Self {
        Self {
            producer,
            open: false,
        }
    }

    /// Returns how many sample slots are available
    #[inline]
    pub fn available(&self) -> usize {
        self.producer.slots()
    }
}

impl AudioSink for RtrbSink {
    fn init(&mut self) -> Result<(), SinkError> {
        self.open = true;
        Ok(())
    }

    fn feed_sample(&mut self, sample: f32) -> Result<(), SinkError> {
        if !self.open {
            return Err(SinkError::Closed);
        }
        self.producer.push(sample).map_err(|_| SinkError::Full)
    }

    fn sleep(&mut self, seconds: f64) {
        std::thread::sleep(std::time::Duration::from_secs_f64(seconds.max(0.0)));
    }

    fn deinit(&mut self) {
        self.open = false;
    }
}
