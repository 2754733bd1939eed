//! Benchmarks for the block transforms and full-frame encoding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swapcodec::{forward_dct_8x8, inverse_dct_8x8, format_block, Encoder, QuantTables};

fn create_test_frame(width: usize, height: usize) -> Vec<u8> {
    (0..width * height * 3 / 2)
        .map(|i| ((i * 31 + i / width * 7) % 256) as u8)
        .collect()
}

fn bench_block_transforms(c: &mut Criterion) {
    let tables = QuantTables::default();
    let pixels: Vec<u8> = (0..64).map(|i| (i * 37 % 256) as u8).collect();
    let mut coeffs = [0i16; 64];

    c.bench_function("forward_dct_8x8", |b| {
        b.iter(|| {
            let mut block = [0i16; 64];
            format_block(&mut block, black_box(&pixels), 8, 8, 8);
            forward_dct_8x8(&mut block, &tables.luma.reciprocal, &mut coeffs);
            black_box(coeffs[0])
        })
    });

    let mut block = [0i16; 64];
    format_block(&mut block, &pixels, 8, 8, 8);
    forward_dct_8x8(&mut block, &tables.luma.reciprocal, &mut coeffs);

    c.bench_function("inverse_dct_8x8", |b| {
        let mut out = [0u8; 64];
        b.iter(|| {
            inverse_dct_8x8(black_box(&coeffs), &tables.luma.forward, &mut out, 8, 8, 8);
            black_box(out[0])
        })
    });
}

fn bench_frame_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    group.sample_size(20);

    for (width, height) in [(640, 512), (1920, 1088)] {
        let frame = create_test_frame(width, height);
        let label = format!("{width}x{height}");

        let mut pooled = Encoder::create("bench", width, height).unwrap();
        group.bench_with_input(BenchmarkId::new("pool", &label), &frame, |b, frame| {
            let mut buf = frame.clone();
            b.iter(|| {
                buf.copy_from_slice(frame);
                pooled.add_frame_yuv420(black_box(&mut buf)).unwrap();
            })
        });

        let mut inline = Encoder::builder("bench", width, height)
            .inline()
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("inline", &label), &frame, |b, frame| {
            let mut buf = frame.clone();
            b.iter(|| {
                buf.copy_from_slice(frame);
                inline.add_frame_yuv420(black_box(&mut buf)).unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block_transforms, bench_frame_encode);
criterion_main!(benches);
