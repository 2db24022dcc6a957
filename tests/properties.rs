//! Property tests for the invariants every trace must satisfy.

use mini_rwmh::distributions::IsotropicGaussian;
use mini_rwmh::metropolis_hastings::{run, RunStatus};
use proptest::prelude::*;

proptest! {
    #[test]
    fn trace_length_matches_iterations(
        seed in any::<u64>(),
        dim in 1usize..4,
        n_steps in 1usize..300,
        scale in 0.05f64..4.0,
    ) {
        let initial = vec![0.5; dim];
        let trace = run(&initial, IsotropicGaussian::new(1.0), &vec![scale; dim], n_steps, seed).unwrap();
        prop_assert_eq!(trace.n_draws(), n_steps);
        prop_assert_eq!(trace.accepted.len(), n_steps);
        prop_assert_eq!(trace.dim(), dim);
        prop_assert_eq!(trace.status, RunStatus::Complete);
    }

    #[test]
    fn rejected_iterations_repeat_the_previous_draw(
        seed in any::<u64>(),
        start in -3.0f64..3.0,
        scale in 0.5f64..5.0,
    ) {
        let initial = [start, -start];
        let trace = run(&initial, IsotropicGaussian::new(1.0), &[scale, scale], 200, seed).unwrap();
        let mut previous = initial.to_vec();
        for (i, row) in trace.draws.rows().into_iter().enumerate() {
            let row = row.to_vec();
            if !trace.accepted[i] {
                prop_assert_eq!(&row, &previous);
            }
            previous = row;
        }
    }

    #[test]
    fn equal_seeds_give_equal_traces(seed in any::<u64>(), n_steps in 1usize..200) {
        let a = run(&[1.0, 2.0], IsotropicGaussian::new(2.0), &[0.7, 0.7], n_steps, seed).unwrap();
        let b = run(&[1.0, 2.0], IsotropicGaussian::new(2.0), &[0.7, 0.7], n_steps, seed).unwrap();
        prop_assert_eq!(a, b);
    }
}
