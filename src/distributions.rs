/*!
Target and proposal distributions for random-walk Metropolis–Hastings.

A target only needs to report its (unnormalized) log-posterior. A proposal generates
a candidate from the current state using a random number generator it is handed, so
the chain stays the sole owner of its random stream.

# Examples

```rust
use mini_rwmh::distributions::{GaussianRandomWalk, Proposal, Target};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Any `Fn(&[f64]) -> f64` is a target.
let target = |theta: &[f64]| -0.5 * theta[0] * theta[0];
assert_eq!(target.log_posterior(&[0.0]).unwrap(), 0.0);

let proposal = GaussianRandomWalk::new(vec![0.5]).unwrap();
let mut rng = ChaCha8Rng::seed_from_u64(42);
let candidate = proposal.sample(&[0.0], &mut rng);
assert_eq!(candidate.len(), 1);
```
*/

use std::convert::Infallible;
use std::error::Error;
use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::ConfigError;

/// A distribution we want to sample from, known up to a normalizing constant.
///
/// Implementations should be total over the real parameter space: return
/// `f64::NEG_INFINITY` for parameter vectors outside the model's domain and keep
/// `Err` for genuine failures, which abort the run.
pub trait Target {
    type Error: Error + Send + Sync + 'static;

    /// Returns the log of the unnormalized posterior density at `theta`.
    fn log_posterior(&self, theta: &[f64]) -> Result<f64, Self::Error>;

    /// The dimension this target expects, if it knows it.
    fn dim(&self) -> Option<usize> {
        None
    }
}

impl<F> Target for F
where
    F: Fn(&[f64]) -> f64,
{
    type Error = Infallible;

    fn log_posterior(&self, theta: &[f64]) -> Result<f64, Infallible> {
        Ok(self(theta))
    }
}

/**
Adapts a fallible closure `Fn(&[f64]) -> Result<f64, E>` into a [`Target`].

```rust
use mini_rwmh::distributions::{Target, TryLogDensity};

#[derive(Debug)]
struct Overflow;
impl std::fmt::Display for Overflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overflow")
    }
}
impl std::error::Error for Overflow {}

let target = TryLogDensity(|theta: &[f64]| {
    if theta[0] > 1e6 { Err(Overflow) } else { Ok(-theta[0].abs()) }
});
assert!(target.log_posterior(&[1e7]).is_err());
```
*/
#[derive(Debug, Clone, Copy)]
pub struct TryLogDensity<F>(pub F);

impl<F, E> Target for TryLogDensity<F>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    fn log_posterior(&self, theta: &[f64]) -> Result<f64, E> {
        (self.0)(theta)
    }
}

/// A trait for generating proposals in Metropolis–Hastings.
pub trait Proposal {
    /// Samples a new point from q(x' | x).
    fn sample<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Vec<f64>;

    /// Evaluates log q(to | from).
    fn log_prob(&self, from: &[f64], to: &[f64]) -> f64;

    /// Number of coordinates the proposal moves.
    fn dim(&self) -> usize;

    /// Whether q(x' | x) = q(x | x'). Symmetric proposals skip the Hastings correction.
    fn is_symmetric(&self) -> bool {
        false
    }
}

/**
A Gaussian random-walk proposal with one fixed standard deviation per coordinate.

Each coordinate `k` of the current state is moved by an independent draw from
`Normal(0, scales[k])`, in coordinate order. The proposal is symmetric.

# Examples

```rust
use mini_rwmh::distributions::GaussianRandomWalk;
use mini_rwmh::error::ConfigError;

let rw = GaussianRandomWalk::new(vec![0.05, 0.05, 0.05, 0.005]).unwrap();
assert_eq!(rw.scales(), &[0.05, 0.05, 0.05, 0.005]);

let err = GaussianRandomWalk::new(vec![1.0, 0.0]).unwrap_err();
assert_eq!(err, ConfigError::NonPositiveScale { index: 1, scale: 0.0 });
```
*/
#[derive(Debug, Clone)]
pub struct GaussianRandomWalk {
    scales: Vec<f64>,
    steps: Vec<Normal<f64>>,
}

impl GaussianRandomWalk {
    /// Creates a random walk with the given per-coordinate step sizes.
    pub fn new(scales: Vec<f64>) -> Result<Self, ConfigError> {
        if scales.is_empty() {
            return Err(ConfigError::EmptyState);
        }
        let steps = scales
            .iter()
            .enumerate()
            .map(|(index, &scale)| {
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(ConfigError::NonPositiveScale { index, scale });
                }
                Normal::new(0.0, scale).map_err(|_| ConfigError::NonPositiveScale { index, scale })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { scales, steps })
    }

    /// Convenience constructor using the same step size in every coordinate.
    pub fn isotropic(scale: f64, dim: usize) -> Result<Self, ConfigError> {
        Self::new(vec![scale; dim])
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

impl Proposal for GaussianRandomWalk {
    fn sample<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Vec<f64> {
        current
            .iter()
            .zip(&self.steps)
            .map(|(&x, step)| x + step.sample(rng))
            .collect()
    }

    fn log_prob(&self, from: &[f64], to: &[f64]) -> f64 {
        from.iter()
            .zip(to)
            .zip(&self.scales)
            .map(|((&f, &t), &s)| {
                let z = (t - f) / s;
                -0.5 * z * z - s.ln() - 0.5 * (2.0 * PI).ln()
            })
            .sum()
    }

    fn dim(&self) -> usize {
        self.scales.len()
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/**
An isotropic, zero-mean Gaussian target with standard deviation `std`.

Used as a known reference distribution when checking the sampler.

```rust
use mini_rwmh::distributions::{IsotropicGaussian, Target};

let target = IsotropicGaussian::new(1.0);
assert_eq!(target.log_posterior(&[1.0, 1.0]).unwrap(), -1.0);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian {
    pub std: f64,
}

impl IsotropicGaussian {
    pub fn new(std: f64) -> Self {
        Self { std }
    }
}

impl Target for IsotropicGaussian {
    type Error = Infallible;

    fn log_posterior(&self, theta: &[f64]) -> Result<f64, Infallible> {
        let sum: f64 = theta.iter().map(|x| x * x).sum();
        Ok(-0.5 * sum / (self.std * self.std))
    }
}

/// A Gaussian target with independent coordinates, each with its own mean and standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalGaussian {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl DiagonalGaussian {
    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Self {
        Self { mean, std }
    }
}

impl Target for DiagonalGaussian {
    type Error = Infallible;

    fn log_posterior(&self, theta: &[f64]) -> Result<f64, Infallible> {
        let lp = theta
            .iter()
            .zip(&self.mean)
            .zip(&self.std)
            .map(|((&x, &m), &s)| {
                let z = (x - m) / s;
                -0.5 * z * z
            })
            .sum();
        Ok(lp)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.mean.len())
    }
}
