//! Samples a 2D Gaussian with independent coordinates (sd 5 and 1) using random-walk
//! Metropolis-Hastings, then prints a posterior summary and a text histogram.

use mini_rwmh::distributions::GaussianRandomWalk;
use mini_rwmh::metropolis_hastings::MetropolisHastings;
use mini_rwmh::stats::histogram;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_STEPS: usize = 20_000;
    const BURNIN: usize = 2_000;
    const SEED: u64 = 42;

    let target = |theta: &[f64]| -0.5 * (theta[0] * theta[0] / 25.0 + theta[1] * theta[1]);
    let proposal = GaussianRandomWalk::new(vec![2.5, 0.5])?;
    let mh = MetropolisHastings::new(target, proposal, &[0.0, 0.0]).set_seed(SEED);

    let trace = mh.run_progress(N_STEPS)?;
    println!(
        "Generated {} draws, acceptance rate {:.3}",
        trace.n_draws(),
        trace.acceptance_rate()
    );

    let summary = trace.summary(BURNIN, 0.95)?.with_names(&["wide", "narrow"])?;
    println!("{summary}");

    let post = trace.discard(BURNIN)?;
    let hist = histogram(post.column(0), 25)?;
    let peak = hist.counts.iter().copied().max().unwrap_or(1).max(1);
    println!("\nHistogram of the wide coordinate:");
    for (center, &count) in hist.centers().iter().zip(&hist.counts) {
        println!("{center:>7.2} | {}", "#".repeat(60 * count / peak));
    }

    #[cfg(feature = "csv")]
    {
        mini_rwmh::io::csv::save_trace_csv(
            trace.draws.view(),
            Some(&["wide", "narrow"][..]),
            "/tmp/gauss_mh.csv",
        )?;
        println!("Saved trace to /tmp/gauss_mh.csv");
    }

    Ok(())
}
