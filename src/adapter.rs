//! Solver adapter.
//!
//! Bridges the encoder's generic boolean model to a [`CpSolver`] engine and
//! translates the engine's verdict back into the instance vocabulary. A
//! timeout is a valid non-error outcome, kept distinct from unsatisfiability
//! in every layer above.

use crate::cp::{CpSolver, SolverConfig, SolverStatus};
use crate::encoder::{encode, EncoderVariant};
use crate::error::WspError;
use crate::instance::{Instance, Solution};
use std::time::Duration;
use tracing::debug;

/// Outcome of one solve attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A satisfying assignment was found.
    Sat(Solution),
    /// No satisfying assignment exists.
    Unsat {
        /// Wall-clock solve time.
        time: Duration,
    },
    /// No verdict within the time budget. Never conflated with
    /// [`SolveOutcome::Unsat`], and never serialized or verified.
    Unknown {
        /// Wall-clock time spent before giving up.
        time: Duration,
    },
}

/// Verdict of a solve attempt, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
}

impl SolveOutcome {
    /// The verdict of this outcome.
    pub fn verdict(&self) -> Verdict {
        match self {
            SolveOutcome::Sat(_) => Verdict::Sat,
            SolveOutcome::Unsat { .. } => Verdict::Unsat,
            SolveOutcome::Unknown { .. } => Verdict::Unknown,
        }
    }

    /// Converts a decided outcome into its serializable [`Solution`].
    ///
    /// `Unknown` has no representation in the solution text format and
    /// yields `None`.
    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SolveOutcome::Sat(solution) => Some(solution),
            SolveOutcome::Unsat { time } => Some(Solution::unsat(time)),
            SolveOutcome::Unknown { .. } => None,
        }
    }
}

/// Encodes `instance` with the chosen variant, runs the engine under its
/// time budget, and reads the valuation back.
///
/// The engine's `Optimal`/`Feasible` map to [`SolveOutcome::Sat`],
/// `Infeasible` to [`SolveOutcome::Unsat`], and `Timeout`/`Unknown` to
/// [`SolveOutcome::Unknown`]. A `ModelInvalid` verdict means the encoder
/// emitted a broken model — an invariant breach, surfaced as
/// [`WspError::Encoding`] — as is a satisfying valuation in which some step
/// does not have exactly one assigned user.
pub fn solve_instance(
    instance: &Instance,
    variant: EncoderVariant,
    solver: &dyn CpSolver,
    config: &SolverConfig,
) -> Result<SolveOutcome, WspError> {
    let encoding = encode(instance, variant);
    let cp_solution = solver.solve(encoding.model(), config);
    debug!(status = ?cp_solution.status, time = ?cp_solution.solve_time, "engine returned");

    match cp_solution.status {
        SolverStatus::Optimal | SolverStatus::Feasible => {
            let assignment = encoding.decode(&cp_solution)?;
            Ok(SolveOutcome::Sat(Solution::sat(
                assignment,
                cp_solution.solve_time,
            )))
        }
        SolverStatus::Infeasible => Ok(SolveOutcome::Unsat {
            time: cp_solution.solve_time,
        }),
        SolverStatus::Timeout | SolverStatus::Unknown => Ok(SolveOutcome::Unknown {
            time: cp_solution.solve_time,
        }),
        SolverStatus::ModelInvalid => Err(WspError::Encoding(
            "encoder produced an invalid model".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BacktrackSolver, CpModel, CpSolution};
    use crate::instance::{Authorisation, Constraint, GeneratorConfig};
    use crate::verify::{verify, verify_assignment};
    use proptest::prelude::*;

    fn solve(instance: &Instance, variant: EncoderVariant) -> SolveOutcome {
        solve_instance(
            instance,
            variant,
            &BacktrackSolver::new(),
            &SolverConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_sat_outcome_verifies() {
        let mut instance = Instance::new(2, 2).unwrap();
        instance
            .push_authorisation(Authorisation::new(0, vec![true, true]))
            .unwrap();
        instance
            .push_authorisation(Authorisation::new(1, vec![true, true]))
            .unwrap();
        instance
            .push_constraint(Constraint::NotEquals { s1: 0, s2: 1 })
            .unwrap();

        let outcome = solve(&instance, EncoderVariant::Direct);
        let solution = match outcome {
            SolveOutcome::Sat(solution) => solution,
            other => panic!("expected sat, got {other:?}"),
        };
        assert!(verify(&instance, &solution));
        assert!(!verify_assignment(&instance, &[0, 0]));
    }

    #[test]
    fn test_unsat_outcome() {
        let mut instance = Instance::new(2, 1).unwrap();
        instance
            .push_authorisation(Authorisation::new(0, vec![true, true]))
            .unwrap();
        instance
            .push_constraint(Constraint::NotEquals { s1: 0, s2: 1 })
            .unwrap();

        let outcome = solve(&instance, EncoderVariant::Relational);
        assert_eq!(outcome.verdict(), Verdict::Unsat);
        let solution = outcome.into_solution().unwrap();
        assert!(!solution.is_sat());
    }

    #[test]
    fn test_timeout_maps_to_unknown() {
        struct StallingSolver;
        impl CpSolver for StallingSolver {
            fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
                CpSolution::empty(SolverStatus::Timeout)
            }
        }

        let mut instance = Instance::new(1, 1).unwrap();
        instance
            .push_authorisation(Authorisation::new(0, vec![true]))
            .unwrap();

        let outcome = solve_instance(
            &instance,
            EncoderVariant::Direct,
            &StallingSolver,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.verdict(), Verdict::Unknown);
        assert!(outcome.into_solution().is_none());
    }

    #[test]
    fn test_solution_round_trip_preserves_verdict() {
        let mut instance = Instance::new(2, 2).unwrap();
        instance
            .push_authorisation(Authorisation::new(0, vec![true, true]))
            .unwrap();
        instance
            .push_authorisation(Authorisation::new(1, vec![true, true]))
            .unwrap();
        instance
            .push_constraint(Constraint::NotEquals { s1: 0, s2: 1 })
            .unwrap();

        let solution = solve(&instance, EncoderVariant::Direct)
            .into_solution()
            .unwrap();
        let reparsed = Solution::from_text(&solution.to_text()).unwrap();
        assert_eq!(verify(&instance, &reparsed), verify(&instance, &solution));
        assert!(verify(&instance, &reparsed));
    }

    fn differential_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig::default()
            .with_steps(4)
            .with_users(3)
            .with_density(0.6)
            .with_not_equals(2)
            .with_at_most(1)
            .with_sual(1)
            .with_wang_li(1)
            .with_assignment_dependent(1)
            .with_seed(seed)
    }

    #[test]
    fn test_differential_fixed_corpus() {
        for seed in 0..50 {
            let instance = differential_config(seed).generate();
            let direct = solve(&instance, EncoderVariant::Direct);
            let relational = solve(&instance, EncoderVariant::Relational);
            assert_eq!(
                direct.verdict(),
                relational.verdict(),
                "variants disagree on seed {seed}"
            );
            if let SolveOutcome::Sat(solution) = direct {
                assert!(verify(&instance, &solution), "unverified sat on seed {seed}");
            }
            if let SolveOutcome::Sat(solution) = relational {
                assert!(verify(&instance, &solution), "unverified sat on seed {seed}");
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_variants_agree_and_sat_verifies(seed in any::<u64>()) {
            let instance = differential_config(seed).generate();
            let direct = solve(&instance, EncoderVariant::Direct);
            let relational = solve(&instance, EncoderVariant::Relational);
            prop_assert_eq!(direct.verdict(), relational.verdict());
            if let SolveOutcome::Sat(solution) = direct {
                prop_assert!(verify(&instance, &solution));
            }
        }

        #[test]
        fn prop_instance_text_round_trip(seed in any::<u64>()) {
            let instance = differential_config(seed).generate();
            let reparsed = Instance::parse(&instance.to_text()).unwrap();
            prop_assert_eq!(instance, reparsed);
        }
    }
}
