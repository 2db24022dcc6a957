/*!
Bayesian multinomial logit (MNL) over conjoint choice data.

Choice data is a design matrix with one row per alternative, grouped into
consecutive choice tasks of `n_alternatives` rows, and a 0/1 choice vector with
exactly one chosen alternative per task. [`MnlPosterior`] combines the MNL
log-likelihood with an independent Gaussian prior and implements [`Target`], so it
can be sampled directly with [`crate::metropolis_hastings::MetropolisHastings`].

```rust
use mini_rwmh::mnl::{simulate_conjoint, ConjointConfig, GaussianPrior, MnlPosterior};
use mini_rwmh::distributions::Target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

let config = ConjointConfig { n_respondents: 5, ..ConjointConfig::default() };
let data = simulate_conjoint(&config, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
assert_eq!(data.n_tasks(), 50);

let prior = GaussianPrior::new(vec![5.0, 5.0, 5.0, 1.0]).unwrap();
let posterior = MnlPosterior::new(data, prior).unwrap();
assert_eq!(posterior.dim(), Some(4));
assert!(posterior.log_posterior(&[0.0; 4]).unwrap().is_finite());
```
*/

use std::f64::consts::PI;

use ndarray::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Gumbel};
use thiserror::Error;

use crate::distributions::Target;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MnlError {
    #[error("design has {design_rows} rows but choice vector has {choice_rows}")]
    RowMismatch { design_rows: usize, choice_rows: usize },
    #[error("number of alternatives per task must be positive")]
    ZeroAlternatives,
    #[error("{rows} rows cannot be split into tasks of {n_alternatives} alternatives")]
    RaggedTasks { rows: usize, n_alternatives: usize },
    #[error("task {task} must have exactly one chosen alternative")]
    InvalidChoice { task: usize },
    #[error("expected {expected} coefficients, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("prior standard deviation {index} must be finite and positive, got {sd}")]
    NonPositivePriorScale { index: usize, sd: f64 },
    #[error("invalid conjoint configuration: {0}")]
    InvalidConjoint(&'static str),
}

/// Choice tasks stacked row-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceData {
    design: Array2<f64>,
    choice: Array1<f64>,
    n_alternatives: usize,
}

impl ChoiceData {
    pub fn new(
        design: Array2<f64>,
        choice: Array1<f64>,
        n_alternatives: usize,
    ) -> Result<Self, MnlError> {
        if design.nrows() != choice.len() {
            return Err(MnlError::RowMismatch {
                design_rows: design.nrows(),
                choice_rows: choice.len(),
            });
        }
        if n_alternatives == 0 {
            return Err(MnlError::ZeroAlternatives);
        }
        if choice.is_empty() || choice.len() % n_alternatives != 0 {
            return Err(MnlError::RaggedTasks {
                rows: choice.len(),
                n_alternatives,
            });
        }
        for (task, y) in choice.exact_chunks(n_alternatives).into_iter().enumerate() {
            let binary = y.iter().all(|&v| v == 0.0 || v == 1.0);
            if !binary || y.sum() != 1.0 {
                return Err(MnlError::InvalidChoice { task });
            }
        }
        Ok(Self {
            design,
            choice,
            n_alternatives,
        })
    }

    pub fn design(&self) -> ArrayView2<'_, f64> {
        self.design.view()
    }

    pub fn choice(&self) -> ArrayView1<'_, f64> {
        self.choice.view()
    }

    pub fn n_alternatives(&self) -> usize {
        self.n_alternatives
    }

    pub fn n_tasks(&self) -> usize {
        self.choice.len() / self.n_alternatives
    }

    pub fn n_coefficients(&self) -> usize {
        self.design.ncols()
    }

    /**
    MNL log-likelihood of the coefficients `beta`:
    `Σ_tasks Σ_j y_ij (v_ij − log Σ_k exp v_ik)` with utilities `v = Xβ`.

    Returns `-inf` when the utilities overflow.
    */
    pub fn log_likelihood(&self, beta: &[f64]) -> Result<f64, MnlError> {
        if beta.len() != self.n_coefficients() {
            return Err(MnlError::DimensionMismatch {
                expected: self.n_coefficients(),
                found: beta.len(),
            });
        }
        let utility = self.design.dot(&ArrayView1::from(beta));
        let ll: f64 = utility
            .exact_chunks(self.n_alternatives)
            .into_iter()
            .zip(self.choice.exact_chunks(self.n_alternatives))
            .map(|(v, y)| {
                let max = v.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
                let log_denom = max + v.mapv(|x| (x - max).exp()).sum().ln();
                v.iter()
                    .zip(y)
                    .map(|(&vj, &yj)| yj * (vj - log_denom))
                    .sum::<f64>()
            })
            .sum();
        Ok(if ll.is_nan() { f64::NEG_INFINITY } else { ll })
    }
}

/// Independent zero-mean Gaussian prior, one standard deviation per coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianPrior {
    sds: Vec<f64>,
}

impl GaussianPrior {
    pub fn new(sds: Vec<f64>) -> Result<Self, MnlError> {
        if let Some((index, &sd)) = sds
            .iter()
            .enumerate()
            .find(|(_, sd)| !(sd.is_finite() && **sd > 0.0))
        {
            return Err(MnlError::NonPositivePriorScale { index, sd });
        }
        Ok(Self { sds })
    }

    pub fn sds(&self) -> &[f64] {
        &self.sds
    }

    /// Normalized log density at `beta`.
    pub fn log_density(&self, beta: &[f64]) -> Result<f64, MnlError> {
        if beta.len() != self.sds.len() {
            return Err(MnlError::DimensionMismatch {
                expected: self.sds.len(),
                found: beta.len(),
            });
        }
        Ok(beta
            .iter()
            .zip(&self.sds)
            .map(|(&b, &s)| {
                let z = b / s;
                -0.5 * z * z - s.ln() - 0.5 * (2.0 * PI).ln()
            })
            .sum())
    }
}

/// MNL log-likelihood plus Gaussian log-prior.
#[derive(Debug, Clone, PartialEq)]
pub struct MnlPosterior {
    pub data: ChoiceData,
    pub prior: GaussianPrior,
}

impl MnlPosterior {
    pub fn new(data: ChoiceData, prior: GaussianPrior) -> Result<Self, MnlError> {
        if prior.sds.len() != data.n_coefficients() {
            return Err(MnlError::DimensionMismatch {
                expected: data.n_coefficients(),
                found: prior.sds.len(),
            });
        }
        Ok(Self { data, prior })
    }
}

impl Target for MnlPosterior {
    type Error = MnlError;

    fn log_posterior(&self, beta: &[f64]) -> Result<f64, MnlError> {
        Ok(self.data.log_likelihood(beta)? + self.prior.log_density(beta)?)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.data.n_coefficients())
    }
}

/// Settings for [`simulate_conjoint`].
///
/// Every alternative gets a brand, an ad flag and a price drawn uniformly.
/// Brands are dummy-coded against the last brand.
#[derive(Debug, Clone, PartialEq)]
pub struct ConjointConfig {
    pub n_respondents: usize,
    pub n_tasks: usize,
    pub n_alternatives: usize,
    /// Part-worth of each brand level.
    pub brand_partworths: Vec<f64>,
    /// Part-worth of showing an ad.
    pub ad_partworth: f64,
    /// Utility change per unit of price.
    pub price_partworth: f64,
    pub prices: Vec<f64>,
}

impl Default for ConjointConfig {
    fn default() -> Self {
        Self {
            n_respondents: 100,
            n_tasks: 10,
            n_alternatives: 3,
            brand_partworths: vec![1.0, 0.5, 0.0],
            ad_partworth: -0.8,
            price_partworth: -0.1,
            prices: (8..=32).step_by(4).map(|p| p as f64).collect(),
        }
    }
}

impl ConjointConfig {
    /// Number of design columns: brand dummies, ad flag, price.
    pub fn n_coefficients(&self) -> usize {
        self.brand_partworths.len().saturating_sub(1) + 2
    }

    /// The coefficients that generated the data, in design-column order.
    pub fn true_coefficients(&self) -> Vec<f64> {
        let baseline = self.brand_partworths.last().copied().unwrap_or(0.0);
        let n_dummies = self.brand_partworths.len().saturating_sub(1);
        self.brand_partworths[..n_dummies]
            .iter()
            .map(|b| b - baseline)
            .chain([self.ad_partworth, self.price_partworth])
            .collect()
    }

    /// Column labels matching [`Self::true_coefficients`].
    pub fn coefficient_names(&self) -> Vec<String> {
        let n_dummies = self.brand_partworths.len().saturating_sub(1);
        (0..n_dummies)
            .map(|b| format!("brand_{b}"))
            .chain(["ad".to_string(), "price".to_string()])
            .collect()
    }

    fn validate(&self) -> Result<(), MnlError> {
        if self.n_respondents == 0 || self.n_tasks == 0 {
            return Err(MnlError::InvalidConjoint("need at least one task"));
        }
        if self.n_alternatives == 0 {
            return Err(MnlError::ZeroAlternatives);
        }
        if self.brand_partworths.is_empty() {
            return Err(MnlError::InvalidConjoint("need at least one brand"));
        }
        if self.prices.is_empty() {
            return Err(MnlError::InvalidConjoint("need at least one price level"));
        }
        Ok(())
    }
}

/// Simulates choices of `n_respondents × n_tasks` tasks from the MNL model in `config`.
pub fn simulate_conjoint<R: Rng + ?Sized>(
    config: &ConjointConfig,
    rng: &mut R,
) -> Result<ChoiceData, MnlError> {
    config.validate()?;

    let n_brands = config.brand_partworths.len();
    let n_cols = config.n_coefficients();
    let n_tasks = config.n_respondents * config.n_tasks;
    let n_rows = n_tasks * config.n_alternatives;
    let noise = Gumbel::new(0.0, 1.0).map_err(|_| MnlError::InvalidConjoint("gumbel noise"))?;

    let mut design = Array2::<f64>::zeros((n_rows, n_cols));
    let mut choice = Array1::<f64>::zeros(n_rows);
    let mut utility = vec![0.0; config.n_alternatives];

    for task in 0..n_tasks {
        let first = task * config.n_alternatives;
        for (j, u) in utility.iter_mut().enumerate() {
            let brand = rng.gen_range(0..n_brands);
            let ad = rng.gen_bool(0.5);
            let price = config.prices[rng.gen_range(0..config.prices.len())];

            let mut row = design.row_mut(first + j);
            if brand + 1 < n_brands {
                row[brand] = 1.0;
            }
            row[n_cols - 2] = if ad { 1.0 } else { 0.0 };
            row[n_cols - 1] = price;

            *u = config.brand_partworths[brand]
                + if ad { config.ad_partworth } else { 0.0 }
                + config.price_partworth * price
                + noise.sample(rng);
        }
        let chosen = utility
            .iter()
            .enumerate()
            .fold(0, |best, (j, &u)| if u > utility[best] { j } else { best });
        choice[first + chosen] = 1.0;
    }

    ChoiceData::new(design, choice, config.n_alternatives)
}
