use criterion::{black_box, criterion_group, criterion_main, Criterion};
use klangwerk::nodes::{Combiner, Delay, LowPass, Mixer, Oscillator, SampleSource};
use klangwerk::{Graph, ProcessContext, Render};

pub fn criterion_benchmark(c: &mut Criterion) {
    let ctx = ProcessContext::default();

    c.bench_function("LowPass.render()", |b| {
        let mut filter = LowPass::new(&ctx, 800.0).unwrap();
        let mut output = [0.0];
        let mut x = 0.0_f32;

        b.iter(|| {
            x = -x + 0.5;
            filter.render(black_box(&[x]), &mut output).unwrap();
            black_box(output[0])
        })
    });

    c.bench_function("RenderProgram.tick() lowpass echo", |b| {
        let samples: Vec<f32> = (0..4096).map(|i| ((i % 64) as f32 / 32.0) - 1.0).collect();

        let mut graph = Graph::with_context(ctx);
        let osc = graph.add(Oscillator::new(&ctx, 0.1).unwrap());
        let source = graph.add(SampleSource::new(samples).unwrap());
        let filter = graph.add(LowPass::new(&ctx, 800.0).unwrap());
        let mixer = graph.add(Mixer::new());
        let delay = graph.add(Delay::new(&ctx, 0.3).unwrap());
        let echo = graph.add(Combiner::new(1.0, 0.7).unwrap());

        graph.connect(source.audio_out(), filter.audio_in()).unwrap();
        graph.connect(source.audio_out(), mixer.first()).unwrap();
        graph.connect(filter.audio_out(), mixer.second()).unwrap();
        graph.connect(osc.audio_out(), mixer.mix()).unwrap();
        graph.connect(mixer.audio_out(), delay.audio_in()).unwrap();
        graph.connect(mixer.audio_out(), echo.first()).unwrap();
        graph.connect(delay.audio_out(), echo.second()).unwrap();

        let mut program = graph.compile().unwrap();
        b.iter(|| program.tick().unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
