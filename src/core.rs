//! Chain abstraction and the loops that drive a chain and record its history.

use indicatif::ProgressBar;
use ndarray::{s, Array2};

pub trait MarkovChain {
    type Error;

    /// Does one iteration of the chain. Returns `true` if the state moved.
    fn step(&mut self) -> Result<bool, Self::Error>;

    /// The current state, without stepping.
    fn current_state(&self) -> &[f64];
}

/// The recorded output of driving a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainHistory {
    /// One row per completed iteration.
    pub draws: Array2<f64>,
    /// Whether iteration `i` moved the chain.
    pub moved: Vec<bool>,
}

impl ChainHistory {
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}

/// Runs `chain` for exactly `n_steps` iterations, recording every state.
pub fn run_chain<M: MarkovChain>(chain: &mut M, n_steps: usize) -> Result<ChainHistory, M::Error> {
    drive(chain, n_steps, |_| false, |_, _| {})
}

/// Like [`run_chain_until`], advancing `pb` and showing the running acceptance rate.
pub fn run_chain_with_progress<M, F>(
    chain: &mut M,
    n_steps: usize,
    pb: &ProgressBar,
    should_stop: F,
) -> Result<ChainHistory, M::Error>
where
    M: MarkovChain,
    F: FnMut(usize) -> bool,
{
    pb.set_length(n_steps as u64);
    let mut n_moved = 0usize;
    let history = drive(
        chain,
        n_steps,
        should_stop,
        |i, moved| {
            n_moved += moved as usize;
            if (i + 1) % 100 == 0 || i + 1 == n_steps {
                pb.set_message(format!("p(accept)≈{:.2}", n_moved as f64 / (i + 1) as f64));
            }
            pb.inc(1);
        },
    )?;
    Ok(history)
}

/// Runs `chain` for at most `n_steps` iterations.
///
/// `should_stop` is called with the number of completed iterations before each step.
/// Once it returns `true` the loop ends and the recorded prefix is returned.
pub fn run_chain_until<M, F>(
    chain: &mut M,
    n_steps: usize,
    should_stop: F,
) -> Result<ChainHistory, M::Error>
where
    M: MarkovChain,
    F: FnMut(usize) -> bool,
{
    drive(chain, n_steps, should_stop, |_, _| {})
}

fn drive<M, F, G>(
    chain: &mut M,
    n_steps: usize,
    mut should_stop: F,
    mut on_step: G,
) -> Result<ChainHistory, M::Error>
where
    M: MarkovChain,
    F: FnMut(usize) -> bool,
    G: FnMut(usize, bool),
{
    let dim = chain.current_state().len();
    let mut draws = Array2::<f64>::zeros((n_steps, dim));
    let mut moved = Vec::with_capacity(n_steps);

    for i in 0..n_steps {
        if should_stop(i) {
            break;
        }
        let accepted = chain.step()?;
        draws
            .row_mut(i)
            .iter_mut()
            .zip(chain.current_state())
            .for_each(|(dst, &src)| *dst = src);
        moved.push(accepted);
        on_step(i, accepted);
    }

    let completed = moved.len();
    if completed < n_steps {
        draws = draws.slice(s![..completed, ..]).to_owned();
    }
    Ok(ChainHistory { draws, moved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Deterministic counter chain: moves by +1 on even steps, stays on odd ones.
    struct Staircase {
        state: Vec<f64>,
        t: usize,
    }

    impl MarkovChain for Staircase {
        type Error = Infallible;

        fn step(&mut self) -> Result<bool, Infallible> {
            let moved = self.t % 2 == 0;
            if moved {
                self.state[0] += 1.0;
            }
            self.t += 1;
            Ok(moved)
        }

        fn current_state(&self) -> &[f64] {
            &self.state
        }
    }

    #[test]
    fn records_every_step() {
        let mut chain = Staircase {
            state: vec![0.0, 5.0],
            t: 0,
        };
        let history = run_chain(&mut chain, 4).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history.draws.column(0).to_vec(), vec![1.0, 1.0, 2.0, 2.0]);
        assert_eq!(history.draws.column(1).to_vec(), vec![5.0; 4]);
        assert_eq!(history.moved, vec![true, false, true, false]);
    }

    #[test]
    fn stops_early_with_prefix() {
        let mut chain = Staircase {
            state: vec![0.0],
            t: 0,
        };
        let history = run_chain_until(&mut chain, 10, |done| done == 3).unwrap();
        assert_eq!(history.draws.shape(), &[3, 1]);
        assert_eq!(history.moved.len(), 3);
        assert_eq!(chain.t, 3);
    }

    #[test]
    fn progress_bar_tracks_steps() {
        let mut chain = Staircase {
            state: vec![0.0],
            t: 0,
        };
        let pb = ProgressBar::hidden();
        let history = run_chain_with_progress(&mut chain, 250, &pb, |_| false).unwrap();
        assert_eq!(history.len(), 250);
        assert_eq!(pb.position(), 250);
        assert_eq!(pb.length(), Some(250));
    }
}
