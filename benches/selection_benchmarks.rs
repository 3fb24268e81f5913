use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizwheel::bank::QuestionBank;
use quizwheel::engine::wheel::{Spinner, segment_at};

fn bench_segment_at(c: &mut Criterion) {
    let angles: Vec<f64> = (0..1000).map(|i| i as f64 * 7.3 - 2000.0).collect();

    c.bench_function("segment_at (1000 angles)", |b| {
        b.iter(|| {
            angles
                .iter()
                .map(|&a| segment_at(black_box(a), 10))
                .sum::<usize>()
        })
    });
}

fn bench_pick_unused(c: &mut Criterion) {
    let bank = QuestionBank::bundled().expect("bundled bank");
    let categories: Vec<String> = bank.categories().map(|c| c.to_string()).collect();

    c.bench_function("pick_unused (100 picks across categories)", |b| {
        b.iter(|| {
            let mut bank = bank.clone();
            let mut rng = SmallRng::seed_from_u64(42);
            for i in 0..100 {
                let category = &categories[i % categories.len()];
                black_box(bank.pick_unused(category, &mut rng).ok());
            }
        })
    });
}

fn bench_spin_cycle(c: &mut Criterion) {
    c.bench_function("spin + complete", |b| {
        let mut spinner = Spinner::new(10, 10, Duration::from_millis(4000));
        let mut rng = SmallRng::seed_from_u64(7);
        b.iter(|| {
            let ticket = spinner.spin(&mut rng).expect("idle spinner");
            black_box(spinner.complete(ticket))
        })
    });
}

criterion_group!(benches, bench_segment_at, bench_pick_unused, bench_spin_cycle);
criterion_main!(benches);
