//! Solution verification.
//!
//! Re-checks a concrete assignment against each constraint's native
//! satisfaction predicate, written independently of the encoder's lowering
//! rules: a bug in a lowering shows up as a disagreement between the solver
//! adapter's verdict and this module. Used as the oracle in the differential
//! tests against both encoder variants and against external candidate
//! solvers. Never invoked on an `Unknown` outcome.

use crate::instance::{Constraint, Instance, Solution};
use std::collections::HashSet;

/// Checks a step-to-user assignment against an instance.
///
/// Every step's user must be authorised for it, and every constraint's
/// predicate must hold.
pub fn verify_assignment(instance: &Instance, assignment: &[usize]) -> bool {
    if assignment.len() != instance.k() {
        return false;
    }
    for (s, &u) in assignment.iter().enumerate() {
        if !instance.user_may_perform(u, s) {
            return false;
        }
    }
    instance
        .constraints()
        .iter()
        .all(|c| constraint_holds(c, assignment))
}

/// Checks a [`Solution`] against an instance.
///
/// A solution without an assignment verifies nothing and yields `false`.
pub fn verify(instance: &Instance, solution: &Solution) -> bool {
    solution
        .assignment
        .as_deref()
        .is_some_and(|assignment| verify_assignment(instance, assignment))
}

fn distinct_users(assignment: &[usize], scope: &[usize]) -> HashSet<usize> {
    scope.iter().map(|&s| assignment[s]).collect()
}

fn constraint_holds(constraint: &Constraint, assignment: &[usize]) -> bool {
    match constraint {
        Constraint::NotEquals { s1, s2 } => assignment[*s1] != assignment[*s2],

        Constraint::AtMost { limit, scope } => {
            distinct_users(assignment, scope).len() <= *limit
        }

        Constraint::Sual {
            scope,
            limit,
            user_group,
        } => {
            let users = distinct_users(assignment, scope);
            users.len() >= *limit || users.iter().all(|u| user_group.contains(u))
        }

        Constraint::WangLi { steps, user_groups } => {
            let users = distinct_users(assignment, steps);
            user_groups
                .iter()
                .any(|group| users.iter().all(|u| group.contains(u)))
        }

        Constraint::AssignmentDependent { s1, s2, u1, u2 } => {
            // The single law: u1 not triggered, or u2 satisfied.
            !u1.contains(&assignment[*s1]) || u2.contains(&assignment[*s2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Authorisation;
    use std::time::Duration;

    fn instance_from_rows(rows: &[&[bool]], constraints: Vec<Constraint>) -> Instance {
        let k = rows[0].len();
        let mut instance = Instance::new(k, rows.len()).unwrap();
        for (u, row) in rows.iter().enumerate() {
            instance
                .push_authorisation(Authorisation::new(u, row.to_vec()))
                .unwrap();
        }
        for c in constraints {
            instance.push_constraint(c).unwrap();
        }
        instance
    }

    #[test]
    fn test_authorisation_checked_first() {
        let instance = instance_from_rows(&[&[true, false], &[false, true]], vec![]);
        assert!(verify_assignment(&instance, &[0, 1]));
        assert!(!verify_assignment(&instance, &[1, 0]));
        assert!(!verify_assignment(&instance, &[0, 2]));
        assert!(!verify_assignment(&instance, &[0]));
    }

    #[test]
    fn test_not_equals_predicate() {
        let instance = instance_from_rows(
            &[&[true, true], &[true, true]],
            vec![Constraint::NotEquals { s1: 0, s2: 1 }],
        );
        assert!(verify_assignment(&instance, &[0, 1]));
        assert!(verify_assignment(&instance, &[1, 0]));
        assert!(!verify_assignment(&instance, &[0, 0]));
        assert!(!verify_assignment(&instance, &[1, 1]));
    }

    #[test]
    fn test_at_most_predicate() {
        let instance = instance_from_rows(
            &[
                &[true, true, true],
                &[true, true, true],
                &[true, true, true],
            ],
            vec![Constraint::AtMost {
                limit: 2,
                scope: vec![0, 1, 2],
            }],
        );
        assert!(verify_assignment(&instance, &[0, 0, 0]));
        assert!(verify_assignment(&instance, &[0, 1, 0]));
        assert!(!verify_assignment(&instance, &[0, 1, 2]));
    }

    #[test]
    fn test_sual_predicate() {
        let instance = instance_from_rows(
            &[&[true, true], &[true, true], &[true, true]],
            vec![Constraint::Sual {
                scope: vec![0, 1],
                limit: 2,
                user_group: vec![2],
            }],
        );
        // Two distinct users: first branch.
        assert!(verify_assignment(&instance, &[0, 1]));
        // One user, inside the group: second branch.
        assert!(verify_assignment(&instance, &[2, 2]));
        // One user, outside the group: neither branch.
        assert!(!verify_assignment(&instance, &[0, 0]));
    }

    #[test]
    fn test_wang_li_predicate() {
        let instance = instance_from_rows(
            &[&[true, true], &[true, true]],
            vec![Constraint::WangLi {
                steps: vec![0, 1],
                user_groups: vec![vec![0], vec![1]],
            }],
        );
        assert!(verify_assignment(&instance, &[0, 0]));
        assert!(verify_assignment(&instance, &[1, 1]));
        // Split across both groups must fail.
        assert!(!verify_assignment(&instance, &[0, 1]));
        assert!(!verify_assignment(&instance, &[1, 0]));
    }

    #[test]
    fn test_assignment_dependent_predicate() {
        let instance = instance_from_rows(
            &[&[true, true], &[true, true], &[true, true]],
            vec![Constraint::AssignmentDependent {
                s1: 0,
                s2: 1,
                u1: vec![0],
                u2: vec![1],
            }],
        );
        // Triggered and satisfied.
        assert!(verify_assignment(&instance, &[0, 1]));
        // Triggered and violated.
        assert!(!verify_assignment(&instance, &[0, 0]));
        assert!(!verify_assignment(&instance, &[0, 2]));
        // Not triggered: s2 unconstrained.
        assert!(verify_assignment(&instance, &[2, 2]));
    }

    #[test]
    fn test_solution_without_assignment_never_verifies() {
        let instance = instance_from_rows(&[&[true]], vec![]);
        assert!(!verify(&instance, &Solution::unsat(Duration::ZERO)));
        assert!(verify(
            &instance,
            &Solution::sat(vec![0], Duration::ZERO)
        ));
    }
}
