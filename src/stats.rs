//! Posterior summaries and histogram binning for post-burn-in draws.
//!
//! All functions take draws laid out as `(n_draws, n_params)`, the shape
//! [`crate::metropolis_hastings::Trace::discard`] returns.

use std::fmt;

use ndarray::prelude::*;
use ndarray_stats::{CorrelationExt, QuantileExt};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("no draws to summarize")]
    EmptyDraws,
    #[error("burn-in of {burn_in} leaves no draws out of {n_draws}")]
    BurnInTooLong { burn_in: usize, n_draws: usize },
    #[error("credible level must lie strictly between 0 and 1, got {0}")]
    InvalidLevel(f64),
    #[error("histogram needs at least one bin")]
    ZeroBins,
    #[error("names given for {names} parameters, draws have {params}")]
    NameMismatch { names: usize, params: usize },
}

/// Per-parameter posterior summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorSummary {
    pub names: Vec<String>,
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    /// Credible level of `[lower, upper]`, e.g. `0.95`.
    pub level: f64,
    pub n_draws: usize,
}

impl PosteriorSummary {
    /// Replaces the default `theta[k]` labels used by the `Display` table.
    pub fn with_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, StatsError> {
        if names.len() != self.mean.len() {
            return Err(StatsError::NameMismatch {
                names: names.len(),
                params: self.mean.len(),
            });
        }
        self.names = names.iter().map(|n| n.as_ref().to_string()).collect();
        Ok(self)
    }
}

impl fmt::Display for PosteriorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(String::len).max().unwrap_or(0).max(9);
        let lo = format!("{:.1}%", 50.0 * (1.0 - self.level));
        let hi = format!("{:.1}%", 100.0 - 50.0 * (1.0 - self.level));
        writeln!(
            f,
            "{:<width$} {:>10} {:>10} {:>10} {:>10}",
            "parameter", "mean", "sd", lo, hi
        )?;
        for (k, name) in self.names.iter().enumerate() {
            writeln!(
                f,
                "{:<width$} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                name, self.mean[k], self.std[k], self.lower[k], self.upper[k]
            )?;
        }
        write!(f, "({} draws)", self.n_draws)
    }
}

/**
Summarizes each column of `draws`: mean, sample standard deviation and the
equal-tailed credible interval at `level`.

```rust
use mini_rwmh::stats::summarize;
use ndarray::array;

let draws = array![[0.0, 10.0], [1.0, 20.0], [2.0, 30.0]];
let summary = summarize(draws.view(), 0.5).unwrap();
assert_eq!(summary.mean.to_vec(), vec![1.0, 20.0]);
assert_eq!(summary.lower.to_vec(), vec![0.5, 15.0]);
assert_eq!(summary.upper.to_vec(), vec![1.5, 25.0]);
```
*/
pub fn summarize(draws: ArrayView2<f64>, level: f64) -> Result<PosteriorSummary, StatsError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidLevel(level));
    }
    let n_draws = draws.nrows();
    if n_draws == 0 || draws.ncols() == 0 {
        return Err(StatsError::EmptyDraws);
    }

    let mean = draws.mean_axis(Axis(0)).ok_or(StatsError::EmptyDraws)?;
    let ddof = if n_draws > 1 { 1.0 } else { 0.0 };
    let std = draws.std_axis(Axis(0), ddof);

    let tail = 0.5 * (1.0 - level);
    let mut lower = Array1::zeros(draws.ncols());
    let mut upper = Array1::zeros(draws.ncols());
    for (k, column) in draws.axis_iter(Axis(1)).enumerate() {
        let mut sorted = column.to_vec();
        sorted.sort_by(f64::total_cmp);
        lower[k] = percentile(&sorted, tail);
        upper[k] = percentile(&sorted, 1.0 - tail);
    }

    Ok(PosteriorSummary {
        names: (0..draws.ncols()).map(|k| format!("theta[{k}]")).collect(),
        mean,
        std,
        lower,
        upper,
        level,
        n_draws,
    })
}

/// Sample covariance matrix of the columns of `draws`.
pub fn covariance(draws: ArrayView2<f64>) -> Result<Array2<f64>, StatsError> {
    if draws.nrows() < 2 {
        return Err(StatsError::EmptyDraws);
    }
    draws.t().cov(1.0).map_err(|_| StatsError::EmptyDraws)
}

/// Linear interpolation between order statistics of an ascending slice.
fn percentile(sorted: &[f64], probability: f64) -> f64 {
    let last = sorted.len() - 1;
    let position = probability.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        (1.0 - weight) * sorted[lower] + weight * sorted[upper]
    }
}

/// Equal-width histogram counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Array1<f64>,
    pub counts: Array1<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Bin midpoints.
    pub fn centers(&self) -> Array1<f64> {
        (&self.edges.slice(s![..-1]) + &self.edges.slice(s![1..])) / 2.0
    }
}

/**
Bins `values` into `bins` equal-width bins spanning `[min, max]`.

The maximum falls into the last bin. A constant input gets a single unit-wide range
centred on the value.

```rust
use mini_rwmh::stats::histogram;
use ndarray::array;

let h = histogram(array![0.0, 0.1, 0.5, 0.9, 1.0].view(), 2).unwrap();
assert_eq!(h.counts.to_vec(), vec![2, 3]);
assert_eq!(h.edges.to_vec(), vec![0.0, 0.5, 1.0]);
```
*/
pub fn histogram(values: ArrayView1<f64>, bins: usize) -> Result<Histogram, StatsError> {
    if bins == 0 {
        return Err(StatsError::ZeroBins);
    }
    let min = *values.min().map_err(|_| StatsError::EmptyDraws)?;
    let max = *values.max().map_err(|_| StatsError::EmptyDraws)?;
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };

    let width = (hi - lo) / bins as f64;
    let edges = Array1::from_shape_fn(bins + 1, |i| {
        if i == bins {
            hi
        } else {
            lo + width * i as f64
        }
    });
    let mut counts = Array1::<usize>::zeros(bins);
    for &v in values {
        let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Ok(Histogram { edges, counts })
}
