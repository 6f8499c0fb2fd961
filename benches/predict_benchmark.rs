//! Criterion benchmarks for the prediction kernels.
//!
//! Run with: cargo bench --bench predict_benchmark
//! Run with native: RUSTFLAGS="-C target-cpu=native" cargo bench --bench predict_benchmark

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use zenraster::{AboveRight, MacroblockMode, MotionVector, Neighbors, Plane, Raster, SubblockMode};

fn textured_plane(width: usize, height: usize) -> Plane {
    let mut plane = Plane::new(width, height).unwrap();
    for r in 0..height {
        for c in 0..width {
            plane.put(c, r, ((r * 89 + c * 47) ^ (r >> 2)) as u8);
        }
    }
    plane
}

fn bench_intra_luma(c: &mut Criterion) {
    let mut group = c.benchmark_group("intra_luma_16x16");
    group.throughput(Throughput::Bytes(16 * 16));

    for mode in [
        MacroblockMode::DC,
        MacroblockMode::V,
        MacroblockMode::H,
        MacroblockMode::TM,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &mode,
            |b, &mode| {
                let mut raster = Raster::new(256, 256).unwrap();
                b.iter(|| {
                    raster.for_each_macroblock_mut(|raster, column, row| {
                        let nb = Neighbors::gather(
                            raster.y(),
                            column * 16,
                            row * 16,
                            16,
                            AboveRight::Replicate,
                        );
                        let mut mb = raster.macroblock_mut(column, row);
                        mb.y.intra_predict(black_box(mode), &nb);
                    });
                });
            },
        );
    }
    group.finish();
}

fn bench_intra_subblock(c: &mut Criterion) {
    let mut group = c.benchmark_group("intra_subblock_4x4");
    group.throughput(Throughput::Bytes(4 * 4));

    for mode in [
        SubblockMode::DC,
        SubblockMode::TM,
        SubblockMode::VE,
        SubblockMode::LD,
        SubblockMode::RD,
        SubblockMode::VR,
        SubblockMode::HU,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &mode,
            |b, &mode| {
                let mut plane = textured_plane(64, 64);
                b.iter(|| {
                    let nb = Neighbors::gather(&plane, 16, 16, 4, AboveRight::FromFrame);
                    let mut block = plane.block_mut(16, 16, 4).unwrap();
                    block.intra_predict_sub(black_box(mode), &nb);
                });
            },
        );
    }
    group.finish();
}

fn bench_inter(c: &mut Criterion) {
    let mut group = c.benchmark_group("inter_16x16");
    group.throughput(Throughput::Bytes(16 * 16));

    let cases = [
        ("integer", MotionVector::new(3 * 8, -2 * 8)),
        ("half_pel_h", MotionVector::new(4, 0)),
        ("half_pel_hv", MotionVector::new(4, 4)),
        ("eighth_pel_hv", MotionVector::new(11, 13)),
    ];

    for (name, mv) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &mv, |b, &mv| {
            let reference = textured_plane(256, 256);
            let mut dst = Plane::new(256, 256).unwrap();
            b.iter(|| {
                for row in 0..16 {
                    for column in 0..16 {
                        let mut block = dst.block_mut(column * 16, row * 16, 16).unwrap();
                        block.inter_predict(black_box(mv), &reference);
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_inter_border(c: &mut Criterion) {
    let mut group = c.benchmark_group("inter_border_clamped");
    group.throughput(Throughput::Bytes(16 * 16));

    group.bench_function("corner_out_of_frame", |b| {
        let reference = textured_plane(64, 64);
        let mut dst = Plane::new(64, 64).unwrap();
        let mv = MotionVector::new(-9 * 8 + 4, -9 * 8 + 4);
        b.iter(|| {
            let mut block = dst.block_mut(0, 0, 16).unwrap();
            block.inter_predict(black_box(mv), &reference);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_intra_luma,
    bench_intra_subblock,
    bench_inter,
    bench_inter_border
);
criterion_main!(benches);
