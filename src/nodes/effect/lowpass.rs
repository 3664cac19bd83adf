//! 12 dB/octave biquad low-pass filter.

use crate::error::{Error, Result, SinkError};
use crate::graph::Handle;
use crate::node::{ProcessContext, Render};
use crate::port::{InputRef, OutputRef};

/// Biquad low-pass with a fixed quality factor, evaluated in direct form I.
///
/// Coefficients come from the audio EQ cookbook low-pass design and are
/// computed once at construction:
///
/// ```text
/// ω = 2π·fc / sample_rate    α = sin ω / (2Q)    s = 1 / (1 + α)
/// b0 = b2 = s·(1 - cos ω) / 2    b1 = s·(1 - cos ω)
/// a1 = -2s·cos ω                 a2 = s·(1 - α)
/// ```
///
/// The design math runs in `f64`; coefficients, history, and the per-tick
/// evaluation are `f32` like the rest of the signal path.
#[derive(Clone, Debug)]
pub struct LowPass {
    cutoff: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl LowPass {
    /// Resonance of every filter built by [`LowPass::new`].
    pub const Q: f64 = 7.0;

    pub fn new(ctx: &ProcessContext, cutoff: f32) -> Result<Self> {
        if ctx.sample_rate == 0 {
            return Err(Error::invalid("low-pass", "sample rate must be positive"));
        }
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(Error::invalid(
                "low-pass",
                format!("cutoff must be positive, got {cutoff} Hz"),
            ));
        }

        let omega = core::f64::consts::TAU * cutoff as f64 / ctx.sample_rate as f64;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * Self::Q);
        let scale = 1.0 / (1.0 + alpha);

        let b1 = scale * (1.0 - cos_omega);
        let b0 = b1 * 0.5;

        Ok(Self {
            cutoff,
            b0: b0 as f32,
            b1: b1 as f32,
            b2: b0 as f32,
            a1: (-scale * 2.0 * cos_omega) as f32,
            a2: (scale * (1.0 - alpha)) as f32,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    #[inline]
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// `[b0, b1, b2, a1, a2]`, normalised so that a0 = 1.
    pub fn coefficients(&self) -> [f32; 5] {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }
}

impl Render for LowPass {
    fn render(&mut self, inputs: &[f32], outputs: &mut [f32]) -> Result<(), SinkError> {
        let x0 = inputs[0];
        let y0 = self.b0 * x0 + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        outputs[0] = y0;
        Ok(())
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }

    fn kind(&self) -> &'static str {
        "low-pass"
    }
}

impl Handle<LowPass> {
    pub fn audio_in(&self) -> InputRef {
        self.input(0)
    }

    pub fn audio_out(&self) -> OutputRef {
        self.output(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookbook_coefficients() {
        let lp = LowPass::new(&ProcessContext::default(), 800.0).unwrap();
        let [b0, b1, b2, a1, a2] = lp.coefficients();

        let w = core::f64::consts::TAU * 800.0 / 44100.0;
        let alpha = w.sin() / 14.0;
        let a0 = 1.0 + alpha;

        assert!((b0 as f64 - (1.0 - w.cos()) / 2.0 / a0).abs() < 1e-7);
        assert_eq!(b0, b2);
        assert_eq!(b1, 2.0 * b0);
        assert!((a1 as f64 + 2.0 * w.cos() / a0).abs() < 1e-6);
        assert!((a2 as f64 - (1.0 - alpha) / a0).abs() < 1e-6);
    }

    #[test]
    fn impulse_response_starts_with_b0() {
        let mut lp = LowPass::new(&ProcessContext::default(), 1000.0).unwrap();
        let [b0, b1, _, a1, _] = lp.coefficients();
        let mut out = [0.0];

        lp.render(&[1.0], &mut out).unwrap();
        assert_eq!(out[0], b0);

        lp.render(&[0.0], &mut out).unwrap();
        assert_eq!(out[0], b1 - a1 * b0);
    }

    #[test]
    fn rejects_bad_cutoff() {
        let ctx = ProcessContext::default();
        assert!(LowPass::new(&ctx, 0.0).is_err());
        assert!(LowPass::new(&ctx, -200.0).is_err());
        assert!(LowPass::new(&ctx, f32::NAN).is_err());
        assert!(LowPass::new(&ProcessContext::new(0), 800.0).is_err());
    }
}
