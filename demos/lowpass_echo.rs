//! Example: a looping sample, crossfaded with a filtered copy of itself, plus an echo
//!
//! Run with: cargo run --example lowpass_echo --features cpal_sink -- music.f32 [seconds]
//!
//! `music.f32` is raw mono little-endian f32 at 44.1kHz, e.g. from
//! `ffmpeg -i song.mp3 -ac 1 -ar 44100 -f f32le music.f32`.
//!
//! ```text
//!  samples ──┬──────────────► mixer.first
//!            └─► low-pass ──► mixer.second        ┌──────────► combiner.first (1.0)
//!  0.1 Hz sine ─────────────► mixer.mix ──► mixer ┤
//!                                                 └─► delay ─► combiner.second (0.7) ──► device
//! ```

use std::env;
use std::process::ExitCode;

use klangwerk::nodes::{Combiner, Delay, DeviceSink, LowPass, Mixer, Oscillator, SampleSource};
use klangwerk::{CpalDevice, Graph, ProcessContext, RenderProgram};
use tracing::{error, info};

fn build(path: &str, ctx: ProcessContext, device: &CpalDevice) -> klangwerk::Result<RenderProgram> {
    let mut graph = Graph::with_context(ctx);

    let output = graph.add(DeviceSink::new(device.create_sink(&ctx)));
    let oscillator = graph.add(Oscillator::new(&ctx, 0.1)?);
    let samples = graph.add(SampleSource::from_file(path)?);
    let lowpass = graph.add(LowPass::new(&ctx, 800.0)?);
    let mixer = graph.add(Mixer::new());
    let delay = graph.add(Delay::new(&ctx, 0.3)?);
    let echo = graph.add(Combiner::new(1.0, 0.7)?);

    graph.connect(samples.audio_out(), lowpass.audio_in())?;
    graph.connect(samples.audio_out(), mixer.first())?;
    graph.connect(lowpass.audio_out(), mixer.second())?;
    graph.connect(oscillator.audio_out(), mixer.mix())?;
    graph.connect(mixer.audio_out(), delay.audio_in())?;
    graph.connect(delay.audio_out(), echo.second())?;
    graph.connect(mixer.audio_out(), echo.first())?;
    graph.connect(echo.audio_out(), output.audio_in())?;

    graph.compile()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: lowpass_echo <samples.f32> [seconds]");
        return ExitCode::FAILURE;
    };
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let Some(device) = CpalDevice::default_output() else {
        error!("no audio output device found");
        return ExitCode::FAILURE;
    };
    info!(device = device.name(), "using output device");

    let ctx = ProcessContext::default();
    let mut program = match build(&path, ctx, &device) {
        Ok(program) => program,
        Err(err) => {
            error!(%err, "could not build the graph");
            return ExitCode::FAILURE;
        }
    };

    let result = program.play(seconds);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "playback failed");
            ExitCode::FAILURE
        }
    }
}
