use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

use covergen_media::config::ScoreWeights;
use covergen_media::sampler::Frame;
use covergen_media::{FrameScorer, NoopFaceDetector, SkinToneFaceDetector};

fn analysis_frame() -> Frame {
    let image = RgbImage::from_fn(720, 404, |x, y| {
        let r = ((x * 3 + y) % 256) as u8;
        let g = ((x + y * 5) % 256) as u8;
        let b = ((x / 2 + y / 2) % 256) as u8;
        Rgb([r, g, b])
    });
    Frame {
        frame_index: 0,
        timestamp: 0.0,
        image,
    }
}

fn bench_frame_scoring(c: &mut Criterion) {
    let frame = analysis_frame();

    let scorer = FrameScorer::new(ScoreWeights::default(), Arc::new(NoopFaceDetector));
    c.bench_function("score_720p_noop_detector", |b| {
        b.iter(|| scorer.score(black_box(&frame)))
    });

    let scorer = FrameScorer::new(ScoreWeights::default(), Arc::new(SkinToneFaceDetector::new()));
    c.bench_function("score_720p_skin_detector", |b| {
        b.iter(|| scorer.score(black_box(&frame)))
    });
}

criterion_group!(benches, bench_frame_scoring);
criterion_main!(benches);
