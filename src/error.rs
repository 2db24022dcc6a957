//! Error types shared by the sampler.

use std::error::Error;
use thiserror::Error;

/// Problems with the sampler inputs, detected before any iteration runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the initial state must have at least one coordinate")]
    EmptyState,
    #[error("expected {expected} coordinates, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("initial coordinate {index} is not finite")]
    NonFiniteInitialState { index: usize },
    #[error("number of iterations must be positive")]
    ZeroIterations,
    #[error("proposal scale {index} must be finite and positive, got {scale}")]
    NonPositiveScale { index: usize, scale: f64 },
}

/// Errors returned by [`crate::metropolis_hastings`].
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("invalid sampler configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The log-posterior at the initial state was `-inf`, `+inf` or `NaN`.
    #[error("log-posterior at the initial state is not finite ({log_posterior})")]
    InvalidStart { log_posterior: f64 },

    /// The target returned an error. `iteration` is `None` for the initial state.
    #[error("log-posterior evaluation failed {}", at_iteration(.iteration))]
    Evaluation {
        iteration: Option<usize>,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The target returned `NaN` or `+inf` for a proposal.
    #[error("log-posterior returned {value} at iteration {iteration}")]
    NonFiniteLogPosterior { iteration: usize, value: f64 },
}

fn at_iteration(iteration: &Option<usize>) -> String {
    match iteration {
        Some(i) => format!("at iteration {i}"),
        None => "at the initial state".to_string(),
    }
}

impl SamplerError {
    pub(crate) fn evaluation<E>(iteration: Option<usize>, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        SamplerError::Evaluation {
            iteration,
            source: Box::new(err),
        }
    }
}
