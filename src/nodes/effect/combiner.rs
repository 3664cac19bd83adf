//! Weighted sum of two signals.

use crate::error::{Error, Result, SinkError};
use crate::graph::Handle;
use crate::node::Render;
use crate::port::{InputRef, OutputRef};

/// Combines and attenuates two signals: `first_level * first + second_level * second`.
///
/// No clipping is applied; levels above 1.0 or sums outside [-1, 1] pass through.
#[derive(Clone, Copy, Debug)]
pub struct Combiner {
    first_level: f32,
    second_level: f32,
}

impl Combiner {
    pub const FIRST: usize = 0;
    pub const SECOND: usize = 1;

    pub fn new(first_level: f32, second_level: f32) -> Result<Self> {
        if !first_level.is_finite() || !second_level.is_finite() {
            return Err(Error::invalid(
                "combiner",
                format!("levels must be finite, got {first_level} and {second_level}"),
            ));
        }
        Ok(Self {
            first_level,
            second_level,
        })
    }

    #[inline]
    pub fn levels(&self) -> (f32, f32) {
        (self.first_level, self.second_level)
    }
}

impl Render for Combiner {
    fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        outputs[0] =
            self.first_level * inputs[Self::FIRST] + self.second_level * inputs[Self::SECOND];
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 2 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "combiner"
    }
}

impl Handle<Combiner> {
    pub fn first(&self) -> InputRef {
        self.input(Combiner::FIRST)
    }

    pub fn second(&self) -> InputRef {
        self.input(Combiner::SECOND)
    }

    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}
