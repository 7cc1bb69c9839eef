use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use idxalgebra::{find_free_and_dummy, index_set_difference, Idx, Variance};
use symbolica::{atom::Atom, parse};

fn lorentz(name: &str, variance: Variance) -> Idx {
    Idx::variant(parse!(name), Atom::num(4), variance).unwrap()
}

/// Index slots of a typical term such as `g(mu,nu) p(~mu) q(~rho) T(a,b) T(b,c)`.
fn term() -> Vec<Idx> {
    vec![
        lorentz("mu", Variance::Covariant),
        lorentz("nu", Variance::Covariant),
        lorentz("mu", Variance::Contravariant),
        lorentz("rho", Variance::Contravariant),
        Idx::new(parse!("a"), Atom::num(8)).unwrap(),
        Idx::new(parse!("b"), Atom::num(8)).unwrap(),
        Idx::new(parse!("b"), Atom::num(8)).unwrap(),
        Idx::new(parse!("c"), Atom::num(8)).unwrap(),
    ]
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("index algebra");
    group.measurement_time(Duration::from_secs(5));

    let indices = term();
    group.bench_function("find_free_and_dummy", |b| {
        b.iter(|| find_free_and_dummy(black_box(&indices)))
    });

    let res = find_free_and_dummy(&indices);
    group.bench_function("index_set_difference", |b| {
        b.iter(|| index_set_difference(black_box(&indices), black_box(&res.dummy)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
