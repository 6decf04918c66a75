//! Benchmarks for tinct conversions.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use tinct_color::{ConversionPlan, Luma8, Rgb, Rgb8, Rgba8, Rgba16, RgbaF32, TypedPlan, layout};
use tinct_core::{AcesCg, ImageView, LinearSrgb, PixelFormat};
use tinct_transfer::{Transfer, srgb};

/// Benchmark transfer curves.
fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for size in [1000, 10000, 100000].iter() {
        let values: Vec<f64> = (0..*size).map(|i| i as f64 / *size as f64).collect();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("srgb_eotf", size), &values, |b, v| {
            b.iter(|| v.iter().map(|&x| srgb::eotf(black_box(x))).collect::<Vec<_>>())
        });

        let gamma = Transfer::resolve("2.2").unwrap();
        group.bench_with_input(BenchmarkId::new("gamma_2.2", size), &values, |b, v| {
            b.iter(|| v.iter().map(|&x| gamma.to_linear(black_box(x))).collect::<Vec<_>>())
        });
    }

    group.finish();
}

/// Benchmark the statically typed engine.
fn bench_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("static");

    let pixels: Vec<Rgba8> = (0..10000u32)
        .map(|i| Rgba8::from_rgba(i as u8, (i >> 3) as u8, (i >> 6) as u8, 0xFF))
        .collect();
    group.throughput(Throughput::Elements(pixels.len() as u64));

    group.bench_function("reencode_u8_u16", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|p| black_box(p).convert::<layout::Rgba, u16, tinct_core::Srgb>())
                .collect::<Result<Vec<Rgba16>, _>>()
        })
    });

    group.bench_function("linearize_f32", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|p| black_box(p).convert::<layout::Rgba, f32, LinearSrgb>())
                .collect::<Result<Vec<_>, _>>()
        })
    });

    group.bench_function("gamut_acescg", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|p| black_box(p).convert::<layout::Rgba, f32, AcesCg>())
                .collect::<Result<Vec<_>, _>>()
        })
    });

    group.bench_function("to_luma", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|p| black_box(p).convert())
                .collect::<Result<Vec<Luma8>, _>>()
        })
    });

    let floats: Vec<RgbaF32> = pixels.iter().filter_map(|p| p.convert().ok()).collect();
    group.bench_function("float_to_u8", |b| {
        b.iter(|| {
            floats
                .iter()
                .map(|p| black_box(p).convert())
                .collect::<Result<Vec<Rgb8>, _>>()
        })
    });

    group.finish();
}

/// Benchmark plan-driven image conversion, serial and parallel.
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    let source = PixelFormat::parse("rgb:b8g8r8a8").unwrap();
    for size in [64u32, 256, 1024].iter() {
        let data: Vec<u8> = (0..size * size * 4).map(|i| (i % 251) as u8).collect();
        let image = ImageView::new(&data, source.clone(), *size, *size).unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        for target in ["rgb:r16g16b16a16@sRGB^1", "rgb:r32g32b32_float@ACEScg", "rgb:l8"] {
            let plan = ConversionPlan::new(&source, &PixelFormat::parse(target).unwrap()).unwrap();
            group.bench_with_input(BenchmarkId::new(target, size), &image, |b, img| {
                b.iter(|| plan.convert_image(black_box(img)).unwrap())
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{target} par"), size),
                &image,
                |b, img| b.iter(|| plan.convert_image_par(black_box(img)).unwrap()),
            );
        }

        let typed = TypedPlan::<Rgb<layout::Rgba, f32, AcesCg>>::new(&source).unwrap();
        group.bench_with_input(BenchmarkId::new("typed_acescg", size), &image, |b, img| {
            b.iter(|| typed.convert_image(black_box(img)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transfer, bench_static, bench_plan);
criterion_main!(benches);
