use analemma::analemma::sample;
use analemma::{solve_kepler, BodyFrame, OrbitParameters, Simulation};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point3;

fn bench_solve_kepler(c: &mut Criterion) {
    c.bench_function("solve_kepler_earth", |b| {
        b.iter(|| solve_kepler(black_box(1.234), black_box(0.0167), black_box(90.0)))
    });

    c.bench_function("solve_kepler_high_eccentricity", |b| {
        b.iter(|| solve_kepler(black_box(0.05), black_box(0.95), black_box(90.0)))
    });
}

fn bench_analemma(c: &mut Criterion) {
    let params = OrbitParameters::default();
    let frame = BodyFrame::new(&params);
    let star = Point3::origin();

    c.bench_function("sample_analemma_366", |b| {
        b.iter(|| sample(black_box(&params), &frame, &star, black_box(1.0), 5.0))
    });
}

fn bench_advance(c: &mut Criterion) {
    let mut sim = Simulation::new(Default::default()).unwrap();

    c.bench_function("advance_one_frame", |b| {
        b.iter(|| sim.advance(black_box(1.0 / 60.0), black_box(10.0), false))
    });
}

criterion_group!(benches, bench_solve_kepler, bench_analemma, bench_advance);
criterion_main!(benches);
