use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evosearch::candidate::Candidate;
use evosearch::fitness::Comparer;
use evosearch::pool::Pool;
use evosearch::rng::unit_rng;
use evosearch::Genome;
use rand::Rng;

fn random_candidates(count: usize, length: usize) -> Vec<Candidate> {
    let mut rng = unit_rng(Some(5), 0);
    (0..count)
        .map(|_| {
            let genes: Vec<char> = (0..length)
                .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
                .collect();
            let fitness = rng.gen_range(0..1_000);
            Candidate::seed(Genome::new(genes), fitness)
        })
        .collect()
}

fn bench_pool_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_admission");
    for size in [100, 1_000, 10_000].iter() {
        let candidates = random_candidates(*size, 20);
        group.bench_function(&format!("admit_{}", size), |b| {
            b.iter(|| {
                let mut pool = Pool::new(500, Comparer::direct(false));
                for candidate in &candidates {
                    black_box(pool.try_add(black_box(candidate.clone())));
                }
                pool.len()
            })
        });
    }
    group.finish();
}

fn bench_pool_duplicate_lookup(c: &mut Criterion) {
    let candidates = random_candidates(500, 20);
    let mut pool = Pool::new(500, Comparer::direct(false));
    for candidate in candidates.iter().cloned() {
        pool.try_add(candidate);
    }
    c.bench_function("duplicate_lookup_500", |b| {
        b.iter(|| {
            let mut hits = 0;
            for candidate in &candidates {
                if pool.contains(black_box(&candidate.genome)) {
                    hits += 1;
                }
            }
            hits
        })
    });
}

criterion_group!(benches, bench_pool_admission, bench_pool_duplicate_lookup);
criterion_main!(benches);
