use automata_minimization::{
    prelude::*,
    random::{generate_random_dfa, generate_random_nfa},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn random_dfas(count: usize, max_states: usize) -> Vec<Dfa> {
    let mut rng = fastrand::Rng::with_seed(0xdfa);
    (0..count)
        .map(|_| generate_random_dfa(&mut rng, 4, max_states, 0.05))
        .collect()
}

fn minimize_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize_random");
    for max_states in [16, 64, 256] {
        let dfas = random_dfas(10, max_states);
        for algorithm in Algorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), max_states),
                &dfas,
                |b, dfas| {
                    b.iter(|| {
                        for dfa in dfas {
                            black_box(minimize(dfa, algorithm).unwrap());
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

fn minimize_determinized(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(0x4fa);
    let dfas = (0..10)
        .map(|_| {
            generate_random_nfa(&mut rng, 12, 2, 2, 2, 0.1)
                .determinize()
                .unwrap()
        })
        .collect::<Vec<_>>();

    let mut group = c.benchmark_group("minimize_determinized");
    for algorithm in Algorithm::ALL {
        group.bench_function(algorithm.name(), |b| {
            b.iter(|| {
                for dfa in &dfas {
                    black_box(minimize(dfa, algorithm).unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, minimize_random, minimize_determinized);
criterion_main!(benches);
