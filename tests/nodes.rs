use approx::assert_relative_eq;
use klangwerk::nodes::{Combiner, Delay, LowPass, Mixer, Oscillator, SampleSource};
use klangwerk::{Error, Graph, OutputRef, ProcessContext, RenderProgram};

fn collect(program: &mut RenderProgram, output: OutputRef, ticks: usize) -> Vec<f32> {
    (0..ticks)
        .map(|_| {
            program.tick().unwrap();
            program.output_value(output).unwrap()
        })
        .collect()
}

fn impulse(len: usize) -> SampleSource {
    let mut samples = vec![0.0; len];
    samples[0] = 1.0;
    SampleSource::new(samples).unwrap()
}

fn constant(value: f32) -> SampleSource {
    SampleSource::new(vec![value]).unwrap()
}

#[test]
fn sample_source_loops() {
    let mut graph = Graph::new();
    let source = graph.add(SampleSource::new(vec![0.1, 0.2, 0.3]).unwrap());
    let mut program = graph.compile().unwrap();

    assert_eq!(
        collect(&mut program, source.audio_out(), 7),
        vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]
    );
}

#[test]
fn sample_source_rejects_empty_buffer() {
    assert!(matches!(
        SampleSource::new(Vec::new()),
        Err(Error::InvalidConfiguration { node: "sample source", .. })
    ));
}

#[test]
fn delay_outputs_impulse_after_exactly_its_length() {
    const LEN: usize = 5;
    let mut graph = Graph::new();
    let source = graph.add(impulse(64));
    let delay = graph.add(Delay::with_length(LEN).unwrap());
    graph.connect(source.audio_out(), delay.audio_in()).unwrap();
    let mut program = graph.compile().unwrap();

    let out = collect(&mut program, delay.audio_out(), 40);
    for (tick, value) in out.iter().enumerate() {
        let expected = if tick == LEN { 1.0 } else { 0.0 };
        assert_eq!(*value, expected, "tick {tick}");
    }
}

#[test]
fn delay_repeats_a_looping_impulse() {
    let ctx = ProcessContext::new(1000);
    let mut graph = Graph::with_context(ctx);
    let source = graph.add(impulse(8));
    let delay = graph.add(Delay::new(&ctx, 0.005).unwrap());
    graph.connect(source.audio_out(), delay.audio_in()).unwrap();
    let mut program = graph.compile().unwrap();

    let out = collect(&mut program, delay.audio_out(), 24);
    let hits: Vec<usize> = (0..out.len()).filter(|&t| out[t] == 1.0).collect();
    assert_eq!(hits, vec![5, 13, 21]);
    assert_eq!(out.iter().filter(|&&v| v != 0.0 && v != 1.0).count(), 0);
}

#[test]
fn delay_of_one_tick() {
    let mut graph = Graph::new();
    let source = graph.add(SampleSource::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap());
    let delay = graph.add(Delay::with_length(1).unwrap());
    graph.connect(source.audio_out(), delay.audio_in()).unwrap();
    let mut program = graph.compile().unwrap();

    assert_eq!(
        collect(&mut program, delay.audio_out(), 5),
        vec![0.0, 1.0, 2.0, 3.0, 4.0]
    );
}

fn mixer_run(control: Option<f32>, first: &[f32], second: &[f32]) -> Vec<f32> {
    let mut graph = Graph::new();
    let a = graph.add(SampleSource::new(first.to_vec()).unwrap());
    let b = graph.add(SampleSource::new(second.to_vec()).unwrap());
    let mixer = graph.add(Mixer::new());
    graph.connect(a.audio_out(), mixer.first()).unwrap();
    graph.connect(b.audio_out(), mixer.second()).unwrap();
    if let Some(value) = control {
        let c = graph.add(constant(value));
        graph.connect(c.audio_out(), mixer.mix()).unwrap();
    }
    let mut program = graph.compile().unwrap();
    collect(&mut program, mixer.audio_out(), first.len())
}

#[test]
fn mixer_endpoints_and_midpoint() {
    let first = [0.3, -0.7, 0.9, 0.1, 1.7];
    let second = [-0.2, 0.5, 0.25, -1.0, 0.0];

    assert_eq!(mixer_run(Some(-1.0), &first, &second), first.to_vec());
    assert_eq!(mixer_run(Some(1.0), &first, &second), second.to_vec());

    let mean: Vec<f32> = first
        .iter()
        .zip(second.iter())
        .map(|(a, b)| (a + b) / 2.0)
        .collect();
    assert_eq!(mixer_run(Some(0.0), &first, &second), mean);
    // An unconnected control reads silence: an even blend
    assert_eq!(mixer_run(None, &first, &second), mean);
}

#[test]
fn mixer_is_a_linear_crossfade() {
    let out = mixer_run(Some(0.5), &[1.0], &[0.0]);
    assert_relative_eq!(out[0], 0.25);
    assert_eq!(Mixer::blend(-1.0), 0.0);
    assert_eq!(Mixer::blend(0.0), 0.5);
    assert_eq!(Mixer::blend(1.0), 1.0);
}

#[test]
fn combiner_is_a_weighted_sum() {
    let (g1, g2) = (0.5_f32, -1.5_f32);
    let first = [0.2, -1.0, 3.0, 0.0];
    let second = [0.4, 0.25, -2.0, 0.8];

    let mut graph = Graph::new();
    let a = graph.add(SampleSource::new(first.to_vec()).unwrap());
    let b = graph.add(SampleSource::new(second.to_vec()).unwrap());
    let sum = graph.add(Combiner::new(g1, g2).unwrap());
    graph.connect(a.audio_out(), sum.first()).unwrap();
    graph.connect(b.audio_out(), sum.second()).unwrap();
    let mut program = graph.compile().unwrap();

    let out = collect(&mut program, sum.audio_out(), first.len());
    assert_relative_eq!(out[0], -0.5);
    for i in 0..first.len() {
        assert_eq!(out[i], g1 * first[i] + g2 * second[i]);
    }
}

#[test]
fn combiner_does_not_clip() {
    let mut graph = Graph::new();
    let a = graph.add(constant(0.9));
    let sum = graph.add(Combiner::new(2.0, 1.0).unwrap());
    graph.connect(a.audio_out(), sum.first()).unwrap();
    let mut program = graph.compile().unwrap();

    assert_eq!(collect(&mut program, sum.audio_out(), 1), vec![1.8]);
    assert!(Combiner::new(f32::INFINITY, 1.0).is_err());
}

#[test]
fn oscillator_emits_sine_of_tick_count() {
    let ctx = ProcessContext::default();
    let mut graph = Graph::with_context(ctx);
    let osc = graph.add(Oscillator::new(&ctx, 1000.0).unwrap());
    let mut program = graph.compile().unwrap();

    let out = collect(&mut program, osc.audio_out(), 200);
    assert_eq!(out[0], 0.0);
    let omega = std::f64::consts::TAU * 1000.0 / 44100.0;
    for (t, value) in out.iter().enumerate() {
        assert!(((*value as f64) - (omega * t as f64).sin()).abs() < 1e-6);
    }
}

#[test]
fn oscillator_quarter_rate_hits_the_peaks() {
    let ctx = ProcessContext::default();
    let mut graph = Graph::with_context(ctx);
    let osc = graph.add(Oscillator::new(&ctx, 44100.0 / 4.0).unwrap());
    let mut program = graph.compile().unwrap();

    let out = collect(&mut program, osc.audio_out(), 4);
    assert_relative_eq!(out[1], 1.0);
    assert_relative_eq!(out[3], -1.0);
    assert!(out[2].abs() < 1e-6);
}

#[test]
fn oscillator_rejects_non_positive_frequency() {
    let ctx = ProcessContext::default();
    assert!(Oscillator::new(&ctx, 0.0).is_err());
    assert!(Oscillator::new(&ctx, -440.0).is_err());
    assert!(Oscillator::new(&ctx, f32::NAN).is_err());
    assert!(Oscillator::new(&ProcessContext::new(0), 440.0).is_err());
}

#[test]
fn lowpass_passes_dc_at_unity_gain() {
    let ctx = ProcessContext::default();
    for cutoff in [800.0, 2000.0, 5000.0, 15000.0] {
        for level in [0.5, -0.8, 2.0] {
            let mut graph = Graph::with_context(ctx);
            let dc = graph.add(constant(level));
            let lowpass = graph.add(LowPass::new(&ctx, cutoff).unwrap());
            graph.connect(dc.audio_out(), lowpass.audio_in()).unwrap();
            let mut program = graph.compile().unwrap();

            program.run(44100).unwrap();
            let settled = program.output_value(lowpass.audio_out()).unwrap();
            assert_relative_eq!(settled, level, max_relative = 1e-4);
        }
    }
}

#[test]
fn lowpass_attenuates_far_above_cutoff() {
    let ctx = ProcessContext::default();
    let mut graph = Graph::with_context(ctx);
    let tone = graph.add(Oscillator::new(&ctx, 10000.0).unwrap());
    let lowpass = graph.add(LowPass::new(&ctx, 200.0).unwrap());
    graph.connect(tone.audio_out(), lowpass.audio_in()).unwrap();
    let mut program = graph.compile().unwrap();

    program.run(4410).unwrap();
    let peak = collect(&mut program, lowpass.audio_out(), 441)
        .into_iter()
        .fold(0.0_f32, |peak, v| peak.max(v.abs()));
    assert!(peak < 0.01, "peak {peak}");
}
