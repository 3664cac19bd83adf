//! Sine wave oscillator

use crate::error::{Error, Result, SinkError};
use crate::graph::Handle;
use crate::node::{ProcessContext, Render};
use crate::port::OutputRef;

/// A pure sine source: `sin(ω·t)` with `ω = 2π·f / sample_rate`.
///
/// `t` counts ticks and is kept in double precision so the phase doesn't
/// drift over long renders; the emitted sample is single precision like the
/// rest of the signal path. There is no band limiting.
#[derive(Clone, Debug)]
pub struct Oscillator {
    frequency: f32,
    omega: f64,
    t: f64,
}

impl Oscillator {
    /// Create an oscillator at `frequency` Hz.
    ///
    /// Fails with [`Error::InvalidConfiguration`] for a non-positive or
    /// non-finite frequency.
    pub fn new(ctx: &ProcessContext, frequency: f32) -> Result<Self> {
        if ctx.sample_rate == 0 {
            return Err(Error::invalid("oscillator", "sample rate must be positive"));
        }
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(Error::invalid(
                "oscillator",
                format!("frequency must be positive, got {frequency}"),
            ));
        }

        Ok(Self {
            frequency,
            omega: core::f64::consts::TAU * frequency as f64 / ctx.sample_rate as f64,
            t: 0.0,
        })
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl Render for Oscillator {
    fn render(&mut self, _inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        outputs[0] = (self.omega * self.t).sin() as f32;
        self.t += 1.0;
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 0 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "oscillator"
    }
}

impl Handle<Oscillator> {
    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}
