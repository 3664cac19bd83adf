//! Mixer effect - crossfades between two inputs under a control signal

use crate::error::{Result, SinkError};
use crate::graph::Handle;
use crate::node::Render;
use crate::port::{InputRef, OutputRef};

/// A linear crossfade between two signals.
///
/// The control input runs from -1.0 (only the first signal) to 1.0 (only the
/// second); 0.0 is an even blend. It maps to a blend factor
/// `m = control * 0.5 + 0.5` and the output is `first * (1 - m) + second * m`.
/// This is not an equal-power law, and the control is not clamped: values
/// outside [-1, 1] extrapolate.
///
/// An unconnected control input reads silence, which gives the even blend.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mixer;

impl Mixer {
    pub const FIRST: usize = 0;
    pub const SECOND: usize = 1;
    pub const MIX: usize = 2;

    pub fn new() -> Self {
        Self
    }

    /// The blend factor for a control value.
    #[inline]
    pub fn blend(control: f32) -> f32 {
        control * 0.5 + 0.5
    }
}

impl Render for Mixer {
    fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        let mix = Self::blend(inputs[Self::MIX]);
        outputs[0] = inputs[Self::FIRST] * (1.0 - mix) + inputs[Self::SECOND] * mix;
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 3 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "mixer"
    }
}

impl Handle<Mixer> {
    pub fn first(&self) -> InputRef {
        self.input(Mixer::FIRST)
    }

    pub fn second(&self) -> InputRef {
        self.input(Mixer::SECOND)
    }

    /// Control input in [-1, 1].
    pub fn mix(&self) -> InputRef {
        self.input(Mixer::MIX)
    }

    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}
