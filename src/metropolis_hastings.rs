/*!
# Random-Walk Metropolis–Hastings Sampler

This module implements a Metropolis–Hastings sampler for any target `D` implementing
[`Target`] and proposal `Q` implementing [`Proposal`]. The default proposal is a
[`GaussianRandomWalk`] with a fixed step size per coordinate.

## Overview

- **Chain state**: [`ChainState`] holds the current parameter vector and its log-posterior.
  It is owned by exactly one [`MHMarkovChain`], which also owns its random stream.
- **Sampler**: [`MetropolisHastings`] keeps the configuration (target, proposal, initial state,
  seed, optional time limit) and builds a fresh chain for every run.
- **Output**: every run returns a [`Trace`] with one row per iteration. Rejected proposals
  repeat the previous row, so a complete trace always has exactly `n_steps` rows.
- **Reproducibility**: chains draw from a `ChaCha8Rng` seeded with the sampler's seed, so equal
  seeds give bit-identical traces on every platform.

## Example Usage

```rust
use mini_rwmh::distributions::GaussianRandomWalk;
use mini_rwmh::metropolis_hastings::MetropolisHastings;

let target = |theta: &[f64]| -0.5 * (theta[0] * theta[0] / 25.0 + theta[1] * theta[1]);
let proposal = GaussianRandomWalk::new(vec![2.5, 0.5]).unwrap();
let mh = MetropolisHastings::new(target, proposal, &[0.0, 0.0]).set_seed(42);

let trace = mh.run(2_000).unwrap();
assert_eq!(trace.n_draws(), 2_000);
assert!(trace.is_complete());

let summary = trace.summary(500, 0.95).unwrap();
assert_eq!(summary.n_draws, 1_500);
```
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::core::{run_chain_until, run_chain_with_progress, ChainHistory, MarkovChain};
use crate::distributions::{GaussianRandomWalk, Proposal, Target};
use crate::error::{ConfigError, SamplerError};
use crate::stats::{summarize, PosteriorSummary, StatsError};

/// Draws `num_iterations` states from the posterior defined by `log_posterior`,
/// using a Gaussian random walk with the given per-coordinate `proposal_scales`.
///
/// All inputs are validated before any random number is drawn.
///
/// ```rust
/// use mini_rwmh::metropolis_hastings::run;
///
/// let trace = run(&[0.0], |t: &[f64]| -0.5 * t[0] * t[0], &[1.0], 1_000, 7).unwrap();
/// assert_eq!(trace.draws.shape(), &[1_000, 1]);
/// ```
pub fn run<D: Target>(
    initial_parameters: &[f64],
    log_posterior: D,
    proposal_scales: &[f64],
    num_iterations: usize,
    random_seed: u64,
) -> Result<Trace, SamplerError> {
    let proposal = GaussianRandomWalk::new(proposal_scales.to_vec())?;
    MetropolisHastings::new(log_posterior, proposal, initial_parameters)
        .set_seed(random_seed)
        .run(num_iterations)
}

/// The current position of a chain and the log-posterior evaluated there.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState {
    pub position: Vec<f64>,
    pub log_posterior: f64,
}

/// Whether a run produced every requested draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Complete,
    /// Stopped early by cancellation or the time limit. The trace holds a valid prefix.
    Truncated { requested: usize },
}

/// The draw history of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Shape `(n_draws, dim)`. Row `i` is the chain state after iteration `i`.
    pub draws: Array2<f64>,
    /// `accepted[i]` is `true` if the proposal in iteration `i` was accepted.
    pub accepted: Vec<bool>,
    pub n_accepted: usize,
    pub status: RunStatus,
}

impl Trace {
    fn from_history(history: ChainHistory, requested: usize) -> Self {
        let n_accepted = history.moved.iter().filter(|&&a| a).count();
        let status = if history.len() == requested {
            RunStatus::Complete
        } else {
            RunStatus::Truncated { requested }
        };
        Self {
            draws: history.draws,
            accepted: history.moved,
            n_accepted,
            status,
        }
    }

    pub fn n_draws(&self) -> usize {
        self.draws.nrows()
    }

    pub fn dim(&self) -> usize {
        self.draws.ncols()
    }

    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }

    /// Fraction of iterations whose proposal was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.accepted.is_empty() {
            0.0
        } else {
            self.n_accepted as f64 / self.accepted.len() as f64
        }
    }

    /// Draw `i`, if it exists.
    pub fn draw(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.n_draws()).then(|| self.draws.row(i))
    }

    /// The draws left after dropping the first `burn_in` rows.
    pub fn discard(&self, burn_in: usize) -> Result<ArrayView2<'_, f64>, StatsError> {
        if burn_in >= self.n_draws() {
            return Err(StatsError::BurnInTooLong {
                burn_in,
                n_draws: self.n_draws(),
            });
        }
        Ok(self.draws.slice_axis(Axis(0), (burn_in..).into()))
    }

    /// Posterior summary of the post-burn-in draws.
    pub fn summary(&self, burn_in: usize, level: f64) -> Result<PosteriorSummary, StatsError> {
        summarize(self.discard(burn_in)?, level)
    }
}

/**
A single random-walk Metropolis–Hastings chain.

The chain borrows the target and proposal and owns its [`ChainState`] and random number
generator. Creating a chain validates the configuration and evaluates the target at the
initial state; neither consumes any randomness.

# Examples

```rust
use mini_rwmh::core::MarkovChain;
use mini_rwmh::distributions::{GaussianRandomWalk, IsotropicGaussian};
use mini_rwmh::metropolis_hastings::MHMarkovChain;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

let target = IsotropicGaussian::new(1.0);
let proposal = GaussianRandomWalk::isotropic(1.0, 2).unwrap();
let rng = ChaCha8Rng::seed_from_u64(1);
let mut chain = MHMarkovChain::new(&target, &proposal, &[0.0, 0.0], rng).unwrap();
chain.step().unwrap();
assert_eq!(chain.current_state().len(), 2);
```
*/
#[derive(Debug, Clone)]
pub struct MHMarkovChain<'a, D, Q, R = ChaCha8Rng> {
    target: &'a D,
    proposal: &'a Q,
    state: ChainState,
    rng: R,
    iteration: usize,
    n_accepted: usize,
}

impl<'a, D, Q, R> MHMarkovChain<'a, D, Q, R>
where
    D: Target,
    Q: Proposal,
    R: RngCore,
{
    pub fn new(
        target: &'a D,
        proposal: &'a Q,
        initial_state: &[f64],
        rng: R,
    ) -> Result<Self, SamplerError> {
        validate_state(initial_state, proposal.dim(), target.dim())?;

        let log_posterior = target
            .log_posterior(initial_state)
            .map_err(|e| SamplerError::evaluation(None, e))?;
        if !log_posterior.is_finite() {
            return Err(SamplerError::InvalidStart { log_posterior });
        }

        Ok(Self {
            target,
            proposal,
            state: ChainState {
                position: initial_state.to_vec(),
                log_posterior,
            },
            rng,
            iteration: 0,
            n_accepted: 0,
        })
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Number of iterations run so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn n_accepted(&self) -> usize {
        self.n_accepted
    }
}

impl<D, Q, R> MarkovChain for MHMarkovChain<'_, D, Q, R>
where
    D: Target,
    Q: Proposal,
    R: RngCore,
{
    type Error = SamplerError;

    /**
    Performs one Metropolis–Hastings update.

    A candidate is drawn from the proposal and the target is evaluated there. The
    acceptance ratio in log-space is

    \[
    \log r = \log p(\text{proposed}) - \log p(\text{current})
             + \log q(\text{current} \mid \text{proposed}) - \log q(\text{proposed} \mid \text{current}),
    \]

    where the proposal terms are skipped for symmetric proposals. A uniform `u` is drawn
    every iteration and the candidate is accepted iff `u < min(1, r)`. A candidate with
    log-posterior `-inf` is always rejected.
    */
    fn step(&mut self) -> Result<bool, SamplerError> {
        let iteration = self.iteration;
        self.iteration += 1;

        let proposed = self.proposal.sample(&self.state.position, &mut self.rng);
        let proposed_lp = self
            .target
            .log_posterior(&proposed)
            .map_err(|e| SamplerError::evaluation(Some(iteration), e))?;
        if proposed_lp.is_nan() || proposed_lp == f64::INFINITY {
            return Err(SamplerError::NonFiniteLogPosterior {
                iteration,
                value: proposed_lp,
            });
        }

        let u: f64 = self.rng.gen();
        let accept = if proposed_lp == f64::NEG_INFINITY {
            false
        } else {
            let mut log_ratio = proposed_lp - self.state.log_posterior;
            if !self.proposal.is_symmetric() {
                log_ratio += self.proposal.log_prob(&proposed, &self.state.position)
                    - self.proposal.log_prob(&self.state.position, &proposed);
            }
            log_ratio >= 0.0 || u < log_ratio.exp()
        };

        if accept {
            self.state = ChainState {
                position: proposed,
                log_posterior: proposed_lp,
            };
            self.n_accepted += 1;
        }
        // On rejection the state is left as is and gets recorded again.
        Ok(accept)
    }

    fn current_state(&self) -> &[f64] {
        &self.state.position
    }
}

fn validate_state(
    initial_state: &[f64],
    proposal_dim: usize,
    target_dim: Option<usize>,
) -> Result<(), ConfigError> {
    if initial_state.is_empty() {
        return Err(ConfigError::EmptyState);
    }
    for expected in std::iter::once(proposal_dim).chain(target_dim) {
        if initial_state.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                expected,
                found: initial_state.len(),
            });
        }
    }
    if let Some(index) = initial_state.iter().position(|x| !x.is_finite()) {
        return Err(ConfigError::NonFiniteInitialState { index });
    }
    Ok(())
}

/**
The Metropolis–Hastings sampler.

Holds a target `D`, a proposal `Q` (a [`GaussianRandomWalk`] by default), the initial
state and a seed. Each `run*` method builds a new [`MHMarkovChain`] from this
configuration, so running twice with the same seed gives the same trace.

# Examples

```rust
use mini_rwmh::distributions::{GaussianRandomWalk, IsotropicGaussian};
use mini_rwmh::metropolis_hastings::MetropolisHastings;

let mh = MetropolisHastings::new(
    IsotropicGaussian::new(1.0),
    GaussianRandomWalk::isotropic(1.0, 2).unwrap(),
    &[0.0, 0.0],
)
.set_seed(42);
assert_eq!(mh.seed, 42);
assert_eq!(mh.run(100).unwrap(), mh.run(100).unwrap());
```
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastings<D, Q = GaussianRandomWalk> {
    /// The target distribution we want to sample from.
    pub target: D,
    /// The proposal distribution used to generate candidate states.
    pub proposal: Q,
    /// The state every run starts from.
    pub initial_state: Vec<f64>,
    /// Seed of the chain's random stream.
    pub seed: u64,
    /// Optional wall-clock budget per run, checked between iterations.
    pub time_limit: Option<Duration>,
}

impl<D, Q> MetropolisHastings<D, Q>
where
    D: Target,
    Q: Proposal,
{
    /// Creates a sampler with a random seed; use [`Self::set_seed`] for reproducible runs.
    pub fn new(target: D, proposal: Q, initial_state: &[f64]) -> Self {
        Self {
            target,
            proposal,
            initial_state: initial_state.to_vec(),
            seed: thread_rng().gen::<u64>(),
            time_limit: None,
        }
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Stops runs that take longer than `limit`; the trace is then marked truncated.
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// A fresh chain at the initial state, seeded with [`Self::seed`].
    pub fn chain(&self) -> Result<MHMarkovChain<'_, D, Q>, SamplerError> {
        self.chain_with_rng(ChaCha8Rng::seed_from_u64(self.seed))
    }

    fn chain_with_rng<R: RngCore>(&self, rng: R) -> Result<MHMarkovChain<'_, D, Q, R>, SamplerError> {
        MHMarkovChain::new(&self.target, &self.proposal, &self.initial_state, rng)
    }

    /// Runs the chain for `n_steps` iterations.
    pub fn run(&self, n_steps: usize) -> Result<Trace, SamplerError> {
        self.run_with_rng(n_steps, ChaCha8Rng::seed_from_u64(self.seed))
    }

    /// Runs the chain with a caller-supplied random number generator.
    pub fn run_with_rng<R: RngCore>(&self, n_steps: usize, rng: R) -> Result<Trace, SamplerError> {
        let never = AtomicBool::new(false);
        self.run_inner(n_steps, rng, &never, None)
    }

    /// Runs the chain until `n_steps` draws are collected or `cancel` is set.
    ///
    /// `cancel` is checked between iterations. A cancelled run returns the draws
    /// collected so far with [`RunStatus::Truncated`].
    pub fn run_until(&self, n_steps: usize, cancel: &AtomicBool) -> Result<Trace, SamplerError> {
        self.run_inner(n_steps, ChaCha8Rng::seed_from_u64(self.seed), cancel, None)
    }

    /// Runs the chain while showing a progress bar with the running acceptance rate.
    pub fn run_progress(&self, n_steps: usize) -> Result<Trace, SamplerError> {
        let pb = ProgressBar::new(n_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb.set_prefix("RW-MH");
        let never = AtomicBool::new(false);
        let trace = self.run_inner(n_steps, ChaCha8Rng::seed_from_u64(self.seed), &never, Some(&pb))?;
        pb.finish_with_message(format!("Done! p(accept)={:.2}", trace.acceptance_rate()));
        Ok(trace)
    }

    fn run_inner<R: RngCore>(
        &self,
        n_steps: usize,
        rng: R,
        cancel: &AtomicBool,
        pb: Option<&ProgressBar>,
    ) -> Result<Trace, SamplerError> {
        if n_steps == 0 {
            return Err(ConfigError::ZeroIterations.into());
        }
        let mut chain = self.chain_with_rng(rng)?;
        log::debug!(
            "starting RW-MH chain: dim={}, n_steps={}, seed={}",
            self.initial_state.len(),
            n_steps,
            self.seed
        );

        let start = Instant::now();
        let deadline = self.time_limit;
        let should_stop = |_: usize| {
            cancel.load(Ordering::Relaxed) || deadline.is_some_and(|limit| start.elapsed() >= limit)
        };
        let history = match pb {
            Some(pb) => run_chain_with_progress(&mut chain, n_steps, pb, should_stop)?,
            None => run_chain_until(&mut chain, n_steps, should_stop)?,
        };

        let trace = Trace::from_history(history, n_steps);
        match trace.status {
            RunStatus::Complete => log::info!(
                "RW-MH finished: {} draws, acceptance rate {:.3}",
                trace.n_draws(),
                trace.acceptance_rate()
            ),
            RunStatus::Truncated { requested } => log::warn!(
                "RW-MH stopped early after {} of {} draws",
                trace.n_draws(),
                requested
            ),
        }
        Ok(trace)
    }
}
