use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use draw_heatmap::colormap;
use draw_heatmap::competition::Competition;
use draw_heatmap::heatmap::{self, DEFAULT_LABEL_THRESHOLD};
use draw_heatmap::matrix::{PairObservation, ProbMatrix};

fn full_league_observations() -> Vec<PairObservation> {
    let mut obs = Vec::new();
    for i in 0..36i64 {
        for j in (i + 1)..36 {
            obs.push(PairObservation {
                t1: i,
                t2: j,
                total: (i * 31 + j * 17) % 4000,
            });
        }
    }
    obs
}

fn bench_matrix_build(c: &mut Criterion) {
    let obs = full_league_observations();
    c.bench_function("matrix_build_36", |b| {
        b.iter(|| {
            let m = ProbMatrix::build(black_box(&obs), 36, 10_000).unwrap();
            black_box(m.get(0, 1));
        })
    });
}

fn bench_label_planning(c: &mut Criterion) {
    let obs = full_league_observations();
    let m = ProbMatrix::build(&obs, 36, 10_000).unwrap();
    c.bench_function("plan_cell_labels_36", |b| {
        b.iter(|| {
            let labels = heatmap::plan_cell_labels(black_box(&m), DEFAULT_LABEL_THRESHOLD);
            black_box(labels.len());
        })
    });
}

fn bench_scale_sampling(c: &mut Criterion) {
    let scale = colormap::competition_scale(Competition::Ucl);
    c.bench_function("color_scale_sample", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for i in 0..=100u32 {
                let color = scale.sample(black_box(i as f32 / 100.0));
                acc = acc.wrapping_add(color[0] as u32);
            }
            black_box(acc);
        })
    });
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_label_planning,
    bench_scale_sampling
);
criterion_main!(benches);
