use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_rwmh::distributions::{GaussianRandomWalk, IsotropicGaussian};
use mini_rwmh::metropolis_hastings::MetropolisHastings;
use mini_rwmh::mnl::{simulate_conjoint, ConjointConfig, GaussianPrior, MnlPosterior};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn criterion_benchmark(c: &mut Criterion) {
    for dim in [1, 10, 100] {
        let proposal = GaussianRandomWalk::isotropic(2.4 / (dim as f64).sqrt(), dim).unwrap();
        let mh = MetropolisHastings::new(IsotropicGaussian::new(1.0), proposal, &vec![0.0; dim])
            .set_seed(42);
        c.bench_function(&format!("rwmh gaussian dim {dim}"), |b| {
            b.iter(|| black_box(mh.run(1_000).unwrap()))
        });
    }

    let config = ConjointConfig::default();
    let data = simulate_conjoint(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
    let prior = GaussianPrior::new(vec![5.0, 5.0, 5.0, 1.0]).unwrap();
    let posterior = MnlPosterior::new(data, prior).unwrap();
    let proposal = GaussianRandomWalk::new(vec![0.05, 0.05, 0.05, 0.005]).unwrap();
    let mh = MetropolisHastings::new(posterior, proposal, &[0.0; 4]).set_seed(42);
    c.bench_function("rwmh mnl conjoint", |b| {
        b.iter(|| black_box(mh.run(200).unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
