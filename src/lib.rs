//! # mini-rwmh
//!
//! A compact random-walk **Metropolis–Hastings** sampler for posteriors known up to a
//! normalizing constant, together with posterior summaries and a Bayesian
//! multinomial-logit model for conjoint choice data.
//!
//! ## Example: sampling a 2D Gaussian
//!
//! ```rust
//! use mini_rwmh::metropolis_hastings::run;
//!
//! // Independent Gaussians with standard deviations 5 and 1.
//! let log_posterior = |t: &[f64]| -0.5 * (t[0] * t[0] / 25.0 + t[1] * t[1]);
//! let trace = run(&[0.0, 0.0], log_posterior, &[2.5, 0.5], 5_000, 42).unwrap();
//!
//! assert_eq!(trace.n_draws(), 5_000);
//! let summary = trace.summary(1_000, 0.95).unwrap();
//! println!("{summary}");
//! ```
//!
//! ## Example: Bayesian MNL
//!
//! ```rust
//! use mini_rwmh::distributions::GaussianRandomWalk;
//! use mini_rwmh::metropolis_hastings::MetropolisHastings;
//! use mini_rwmh::mnl::{simulate_conjoint, ConjointConfig, GaussianPrior, MnlPosterior};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = ConjointConfig { n_respondents: 20, ..ConjointConfig::default() };
//! let data = simulate_conjoint(&config, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
//! let posterior = MnlPosterior::new(data, GaussianPrior::new(vec![5.0, 5.0, 5.0, 1.0]).unwrap()).unwrap();
//!
//! let proposal = GaussianRandomWalk::new(vec![0.05, 0.05, 0.05, 0.005]).unwrap();
//! let mh = MetropolisHastings::new(posterior, proposal, &[0.0; 4]).set_seed(42);
//! let trace = mh.run(1_000).unwrap();
//! assert_eq!(trace.dim(), 4);
//! ```
//!
//! Enable the `csv` feature to write traces with [`io::csv::save_trace_csv`](crate::io).

pub mod core;
pub mod distributions;
pub mod error;
pub mod io;
pub mod metropolis_hastings;
pub mod mnl;
pub mod stats;
