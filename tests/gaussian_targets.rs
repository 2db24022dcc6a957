//! Checks that the sampler's post-burn-in draws reproduce known Gaussian targets.

use approx::assert_relative_eq;
use mini_rwmh::distributions::{GaussianRandomWalk, IsotropicGaussian};
use mini_rwmh::metropolis_hastings::{run, MetropolisHastings};
use ndarray::Axis;

/// Independent Gaussians with standard deviations 5 and 1.
fn wide_and_narrow(theta: &[f64]) -> f64 {
    -0.5 * (theta[0] * theta[0] / 25.0 + theta[1] * theta[1])
}

#[test]
fn standard_normal_is_stationary_across_seeds() {
    const N_STEPS: usize = 100_000;
    const BURNIN: usize = 5_000;

    for seed in [1, 2, 3] {
        let trace = run(&[0.0], IsotropicGaussian::new(1.0), &[1.0], N_STEPS, seed).unwrap();
        let post = trace.discard(BURNIN).unwrap();
        let mean = post.mean_axis(Axis(0)).unwrap()[0];
        let sd = post.std_axis(Axis(0), 1.0)[0];
        assert!(mean.abs() < 0.05, "seed {seed}: mean {mean}");
        assert!((sd - 1.0).abs() < 0.05, "seed {seed}: sd {sd}");
    }
}

#[test]
fn two_d_scenario_recovers_scales() {
    const N_STEPS: usize = 20_000;
    const BURNIN: usize = 2_000;

    let proposal = GaussianRandomWalk::new(vec![2.5, 0.5]).unwrap();
    let mh = MetropolisHastings::new(wide_and_narrow, proposal, &[0.0, 0.0]).set_seed(42);
    let summary = mh.run(N_STEPS).unwrap().summary(BURNIN, 0.95).unwrap();

    assert_eq!(summary.n_draws, N_STEPS - BURNIN);
    assert_relative_eq!(summary.std[0], 5.0, max_relative = 0.15);
    assert_relative_eq!(summary.std[1], 1.0, max_relative = 0.15);
    assert!(summary.lower[0] < -5.0 && summary.upper[0] > 5.0);
}

#[test]
fn two_d_scenario_with_small_steps_mostly_accepts() {
    let trace = run(&[0.0, 0.0], wide_and_narrow, &[0.1, 0.1], 20_000, 42).unwrap();
    assert_eq!(trace.n_draws(), 20_000);
    assert!(trace.is_complete());
    assert!(
        trace.acceptance_rate() > 0.8,
        "acceptance rate {}",
        trace.acceptance_rate()
    );
}

#[test]
fn wrong_target_gives_wrong_scale() {
    // Sampling the isotropic unit Gaussian must not look like the sd-5 coordinate.
    let trace = run(&[0.0, 0.0], IsotropicGaussian::new(1.0), &[1.0, 1.0], 20_000, 7).unwrap();
    let sd = trace.discard(2_000).unwrap().std_axis(Axis(0), 1.0);
    assert!(sd[0] < 2.0, "sd {}", sd[0]);
}
