//! Bayesian MNL on simulated conjoint data: the posterior should sit near the part-worths
//! that generated the choices.

use mini_rwmh::distributions::GaussianRandomWalk;
use mini_rwmh::metropolis_hastings::MetropolisHastings;
use mini_rwmh::mnl::{simulate_conjoint, ConjointConfig, GaussianPrior, MnlPosterior};
use mini_rwmh::stats::histogram;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn posterior_recovers_true_partworths() {
    const N_STEPS: usize = 12_000;
    const BURNIN: usize = 2_000;

    let config = ConjointConfig::default();
    let data = simulate_conjoint(&config, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    // Wide priors for the binary attributes, a narrow one for price.
    let prior = GaussianPrior::new(vec![5.0, 5.0, 5.0, 1.0]).unwrap();
    let posterior = MnlPosterior::new(data, prior).unwrap();

    let proposal = GaussianRandomWalk::new(vec![0.05, 0.05, 0.05, 0.005]).unwrap();
    let mh = MetropolisHastings::new(posterior, proposal, &[0.0; 4]).set_seed(42);
    let trace = mh.run(N_STEPS).unwrap();

    assert_eq!(trace.n_draws(), N_STEPS);
    let rate = trace.acceptance_rate();
    assert!(rate > 0.05 && rate < 0.95, "acceptance rate {rate}");

    let summary = trace
        .summary(BURNIN, 0.95)
        .unwrap()
        .with_names(&config.coefficient_names())
        .unwrap();
    let truth = config.true_coefficients();
    for k in 0..3 {
        assert!(
            (summary.mean[k] - truth[k]).abs() < 0.35,
            "coefficient {k}: {} vs {}\n{summary}",
            summary.mean[k],
            truth[k]
        );
    }
    assert!(
        (summary.mean[3] - truth[3]).abs() < 0.03,
        "price: {}\n{summary}",
        summary.mean[3]
    );
    for k in 0..4 {
        assert!(summary.lower[k] < summary.mean[k] && summary.mean[k] < summary.upper[k]);
    }

    let price_draws = trace.discard(BURNIN).unwrap().column(3).to_owned();
    let hist = histogram(price_draws.view(), 20).unwrap();
    assert_eq!(hist.total(), N_STEPS - BURNIN);
}
