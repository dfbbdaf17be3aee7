use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cramr_foundation::{classify, SheetBounds, SnapAnchors, FLICK_VELOCITY_THRESHOLD};

fn bench_classify(c: &mut Criterion) {
    let bounds = SheetBounds::new(-330.0, 50.0, 290.0).expect("valid bounds");
    let anchors = SnapAnchors::new([-400.0, -200.0, 0.0, 150.0, 290.0, 500.0]).expect("valid anchors");

    c.bench_function("classify_three_stops", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            let mut offset = -330.0f32;
            while offset < 690.0 {
                acc += classify(black_box(offset), black_box(-450.0), &bounds).index();
                offset += 10.0;
            }
            acc
        })
    });

    c.bench_function("classify_six_anchors", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            let mut offset = -400.0f32;
            while offset < 900.0 {
                acc += anchors.classify(black_box(offset), black_box(450.0), FLICK_VELOCITY_THRESHOLD);
                offset += 10.0;
            }
            acc
        })
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
