//! WSP instance data model.
//!
//! An [`Instance`] is immutable after construction. The push API exists so
//! the parser can validate each entity against the partially built instance
//! and abort on the first infeasible one; feasibility checks here return
//! `Result<(), String>` and the parser attaches line diagnostics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Authorisation profile of a single user: which steps the user may perform.
///
/// The vector has length `k` (the step count); entry `s` is `true` iff the
/// user may perform step `s`. The user index equals the authorisation's
/// position inside its instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Authorisation {
    user: usize,
    steps: Vec<bool>,
}

impl Authorisation {
    /// Creates an authorisation from a per-step boolean vector.
    pub fn new(user: usize, steps: Vec<bool>) -> Self {
        Self { user, steps }
    }

    /// Creates an authorisation from the list of authorised step indices.
    ///
    /// Fails when any index is outside `0..k`; indices are never silently
    /// dropped.
    pub fn from_steps(user: usize, authorised: &[usize], k: usize) -> Result<Self, String> {
        let mut steps = vec![false; k];
        for &s in authorised {
            if s >= k {
                return Err(format!("step index {} out of range 1..={k}", s + 1));
            }
            steps[s] = true;
        }
        Ok(Self { user, steps })
    }

    /// The user this profile belongs to.
    pub fn user(&self) -> usize {
        self.user
    }

    /// Whether the user may perform `step`.
    pub fn may_perform(&self, step: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }

    /// Iterator over the authorised step indices, ascending.
    pub fn authorised_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(s, _)| s)
    }

    fn check_feasibility(&self, k: usize, n: usize) -> Result<(), String> {
        if self.user >= n {
            return Err(format!("user index {} out of range 1..={n}", self.user + 1));
        }
        if self.steps.len() != k {
            return Err(format!(
                "authorisation vector has length {}, expected {k}",
                self.steps.len()
            ));
        }
        Ok(())
    }
}

/// A security constraint over a workflow assignment.
///
/// A closed set of variants; adding a kind is a compile-time exhaustiveness
/// failure in the feasibility check below, in each encoder lowering, and in
/// the verifier's predicate dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constraint {
    /// Separation of duty: steps `s1` and `s2` must receive different users.
    NotEquals { s1: usize, s2: usize },

    /// At most `limit` distinct users across the scope.
    AtMost { limit: usize, scope: Vec<usize> },

    /// Scope has at least `limit` distinct users, or every scope step is
    /// assigned a user from `user_group`.
    Sual {
        scope: Vec<usize>,
        limit: usize,
        user_group: Vec<usize>,
    },

    /// Every step in `steps` is assigned a user from exactly one group among
    /// `user_groups`.
    WangLi {
        steps: Vec<usize>,
        user_groups: Vec<Vec<usize>>,
    },

    /// If `s1`'s user is in `u1`, then `s2`'s user must be in `u2`.
    AssignmentDependent {
        s1: usize,
        s2: usize,
        u1: Vec<usize>,
        u2: Vec<usize>,
    },
}

fn unique_sorted(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

fn all_in_range(indices: &[usize], max: usize) -> bool {
    indices.iter().all(|&i| i < max)
}

impl Constraint {
    /// Sorts and deduplicates every scope and group.
    ///
    /// All five satisfaction predicates are set-based, so duplicates are
    /// semantically inert; normalising keeps the pigeonhole combination
    /// counts in the encoder honest.
    pub fn normalised(self) -> Self {
        match self {
            Constraint::NotEquals { s1, s2 } => Constraint::NotEquals { s1, s2 },
            Constraint::AtMost { limit, scope } => Constraint::AtMost {
                limit,
                scope: unique_sorted(scope),
            },
            Constraint::Sual {
                scope,
                limit,
                user_group,
            } => Constraint::Sual {
                scope: unique_sorted(scope),
                limit,
                user_group: unique_sorted(user_group),
            },
            Constraint::WangLi { steps, user_groups } => Constraint::WangLi {
                steps: unique_sorted(steps),
                user_groups: user_groups.into_iter().map(unique_sorted).collect(),
            },
            Constraint::AssignmentDependent { s1, s2, u1, u2 } => {
                Constraint::AssignmentDependent {
                    s1,
                    s2,
                    u1: unique_sorted(u1),
                    u2: unique_sorted(u2),
                }
            }
        }
    }

    /// Checks this constraint's own invariants against the declared step and
    /// user counts.
    pub fn check_feasibility(&self, k: usize, n: usize) -> Result<(), String> {
        match self {
            Constraint::NotEquals { s1, s2 } => {
                if *s1 >= k || *s2 >= k {
                    return Err(format!("step index out of range 1..={k}"));
                }
                // The same-user indicator is only defined on distinct pairs.
                if s1 == s2 {
                    return Err("separation of duty needs two distinct steps".into());
                }
                Ok(())
            }
            Constraint::AtMost { limit, scope } => {
                if scope.is_empty() {
                    return Err("empty scope".into());
                }
                if !all_in_range(scope, k) {
                    return Err(format!("step index out of range 1..={k}"));
                }
                if *limit == 0 || *limit > k {
                    return Err(format!("limit {limit} out of range 1..={k}"));
                }
                Ok(())
            }
            Constraint::Sual {
                scope,
                limit,
                user_group,
            } => {
                if scope.is_empty() {
                    return Err("empty scope".into());
                }
                if user_group.is_empty() {
                    return Err("empty user group".into());
                }
                if !all_in_range(scope, k) {
                    return Err(format!("step index out of range 1..={k}"));
                }
                if !all_in_range(user_group, n) {
                    return Err(format!("user index out of range 1..={n}"));
                }
                if *limit == 0 || *limit > k {
                    return Err(format!("limit {limit} out of range 1..={k}"));
                }
                Ok(())
            }
            Constraint::WangLi { steps, user_groups } => {
                if steps.is_empty() {
                    return Err("empty scope".into());
                }
                if user_groups.is_empty() {
                    return Err("no user groups".into());
                }
                if !all_in_range(steps, k) {
                    return Err(format!("step index out of range 1..={k}"));
                }
                for group in user_groups {
                    if group.is_empty() {
                        return Err("empty user group".into());
                    }
                    if !all_in_range(group, n) {
                        return Err(format!("user index out of range 1..={n}"));
                    }
                }
                Ok(())
            }
            Constraint::AssignmentDependent { s1, s2, u1, u2 } => {
                if *s1 >= k || *s2 >= k {
                    return Err(format!("step index out of range 1..={k}"));
                }
                if u1.is_empty() || u2.is_empty() {
                    return Err("empty user group".into());
                }
                if !all_in_range(u1, n) || !all_in_range(u2, n) {
                    return Err(format!("user index out of range 1..={n}"));
                }
                Ok(())
            }
        }
    }
}

/// A Workflow Satisfiability Problem instance.
///
/// `k` steps, `n` users, one [`Authorisation`] per user, and a conjunction of
/// [`Constraint`]s. Owns all of its entities by value; nothing is shared or
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instance {
    k: usize,
    n: usize,
    authorisations: Vec<Authorisation>,
    constraints: Vec<Constraint>,
}

impl Instance {
    /// Creates an empty instance with the given step and user counts.
    pub fn new(k: usize, n: usize) -> Result<Self, String> {
        if k == 0 {
            return Err("step count must be positive".into());
        }
        if n == 0 {
            return Err("user count must be positive".into());
        }
        Ok(Self {
            k,
            n,
            authorisations: Vec::with_capacity(n),
            constraints: Vec::new(),
        })
    }

    /// Number of steps.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of users.
    pub fn n(&self) -> usize {
        self.n
    }

    /// All authorisations, one per user, in user order.
    pub fn authorisations(&self) -> &[Authorisation] {
        &self.authorisations
    }

    /// All constraints, in input order (semantically an AND).
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether user `u` may perform step `s`.
    pub fn user_may_perform(&self, u: usize, s: usize) -> bool {
        self.authorisations
            .get(u)
            .map(|a| a.may_perform(s))
            .unwrap_or(false)
    }

    /// Iterator over the users authorised for step `s`, ascending.
    pub fn authorised_users(&self, s: usize) -> impl Iterator<Item = usize> + '_ {
        self.authorisations
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.may_perform(s))
            .map(|(u, _)| u)
    }

    /// Appends the next user's authorisation, validating it against this
    /// partially built instance.
    pub fn push_authorisation(&mut self, authorisation: Authorisation) -> Result<(), String> {
        authorisation.check_feasibility(self.k, self.n)?;
        if authorisation.user() != self.authorisations.len() {
            return Err(format!(
                "expected authorisation for user {}, found user {}",
                self.authorisations.len() + 1,
                authorisation.user() + 1
            ));
        }
        self.authorisations.push(authorisation);
        Ok(())
    }

    /// Appends a constraint after normalising and validating it.
    pub fn push_constraint(&mut self, constraint: Constraint) -> Result<(), String> {
        let constraint = constraint.normalised();
        constraint.check_feasibility(self.k, self.n)?;
        self.constraints.push(constraint);
        Ok(())
    }
}
