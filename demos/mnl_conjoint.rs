//! Simulates conjoint choice data from a multinomial logit model and estimates the
//! part-worths with random-walk Metropolis-Hastings.

use mini_rwmh::distributions::GaussianRandomWalk;
use mini_rwmh::metropolis_hastings::MetropolisHastings;
use mini_rwmh::mnl::{simulate_conjoint, ConjointConfig, GaussianPrior, MnlPosterior};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_STEPS: usize = 11_000;
    const BURNIN: usize = 1_000;

    let config = ConjointConfig::default();
    let data = simulate_conjoint(&config, &mut ChaCha8Rng::seed_from_u64(123))?;
    println!(
        "Simulated {} respondents x {} tasks x {} alternatives",
        config.n_respondents, config.n_tasks, config.n_alternatives
    );

    // N(0, 5^2) for the binary attributes, N(0, 1) for price.
    let prior = GaussianPrior::new(vec![5.0, 5.0, 5.0, 1.0])?;
    let posterior = MnlPosterior::new(data, prior)?;
    let proposal = GaussianRandomWalk::new(vec![0.05, 0.05, 0.05, 0.005])?;
    let mh = MetropolisHastings::new(posterior, proposal, &[0.0; 4]).set_seed(42);

    let trace = mh.run_progress(N_STEPS)?;
    println!("Acceptance rate: {:.3}", trace.acceptance_rate());

    let names = config.coefficient_names();
    let summary = trace.summary(BURNIN, 0.95)?.with_names(&names)?;
    println!("{summary}");

    println!("\nTrue part-worths:");
    for (name, value) in names.iter().zip(config.true_coefficients()) {
        println!("{name:<9} {value:>10.4}");
    }

    Ok(())
}
