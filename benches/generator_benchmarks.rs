use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use mathdrill::generator::{self, Operation, arithmetic};
use mathdrill::preset::Preset;
use mathdrill::session::input::validate;

fn bench_generate_for_preset(c: &mut Criterion) {
    let preset = Preset::quick_drill();
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("generate_for (quick drill)", |b| {
        b.iter(|| generator::generate_for(black_box(&preset), &mut rng))
    });
}

fn bench_each_operation(c: &mut Criterion) {
    let ranges = Preset::quick_drill().ranges;
    let mut rng = SmallRng::seed_from_u64(11);

    for op in Operation::ALL {
        c.bench_function(&format!("arithmetic::generate ({op:?})"), |b| {
            b.iter(|| arithmetic::generate(black_box(op), &ranges, &mut rng))
        });
    }
}

fn bench_validate(c: &mut Criterion) {
    let inputs = ["144", "  -12 ", "17.00001", "42abc", "", "nope"];

    c.bench_function("validate (mixed inputs)", |b| {
        b.iter(|| {
            for raw in inputs {
                black_box(validate(black_box(raw), 144));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_generate_for_preset,
    bench_each_operation,
    bench_validate
);
criterion_main!(benches);
