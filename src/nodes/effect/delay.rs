//! Fixed delay line.

use dasp_ring_buffer::Fixed;

use crate::error::{Error, Result, SinkError};
use crate::graph::Handle;
use crate::node::{ProcessContext, Render};
use crate::port::{InputRef, OutputRef};

/// Delays its input by a whole number of ticks.
///
/// The line starts out silent, so the first `len()` outputs are 0.0; after
/// that, every output is the input from exactly `len()` ticks earlier.
pub struct Delay {
    line: Fixed<Vec<f32>>,
}

impl Delay {
    /// Delay by `seconds`, rounded to the nearest tick.
    ///
    /// A delay that rounds to zero ticks is rejected.
    pub fn new(ctx: &ProcessContext, seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(Error::invalid(
                "delay",
                format!("delay must be positive, got {seconds}s"),
            ));
        }

        let ticks = ctx.ticks_for(seconds);
        if ticks == 0 {
            return Err(Error::invalid(
                "delay",
                format!(
                    "{seconds}s is shorter than one tick at {} Hz",
                    ctx.sample_rate
                ),
            ));
        }
        Self::with_length(ticks as usize)
    }

    /// Delay by exactly `ticks` ticks.
    pub fn with_length(ticks: usize) -> Result<Self> {
        if ticks == 0 {
            return Err(Error::invalid("delay", "delay line needs at least one tick"));
        }
        Ok(Self {
            line: Fixed::from(vec![0.0; ticks]),
        })
    }

    /// Delay length in ticks.
    #[inline]
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Always false; zero-length lines are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line.len() == 0
    }
}

impl Render for Delay {
    fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        // The slot under the cursor holds the input from `len` ticks ago.
        outputs[0] = self.line.push(inputs[0]);
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "delay"
    }
}

impl Handle<Delay> {
    pub fn audio_in(&self) -> InputRef {
        self.input(0)
    }

    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}
