//! Constraint lowering rules.
//!
//! Every rule is expressed over the `x` decision variables and the
//! same-user indicators `M`; an "enforce only if" construct becomes a
//! clause carrying the negated enforcement literal. The rules are identical
//! for both encoder variants.

use super::WspEncoding;
use crate::cp::Literal;
use crate::instance::Constraint;
use itertools::Itertools;

impl WspEncoding {
    /// Ties every same-user indicator to user identity.
    ///
    /// For a user authorised at both steps, `M` true forces the two `x`
    /// variables equal and `M` false forbids both being true. A user
    /// authorised at exactly one of the two steps can never witness
    /// equality, so `M` true forces that variable false.
    pub(super) fn tie_same_user(&mut self) {
        for s1 in 0..self.k {
            for s2 in s1 + 1..self.k {
                let m = self.same_user(s1, s2);
                for u in 0..self.n {
                    match (self.x[s1][u], self.x[s2][u]) {
                        (Some(a), Some(b)) => {
                            self.model.add_clause(vec![!m, !a, b.lit()]);
                            self.model.add_clause(vec![!m, a.lit(), !b]);
                            self.model.add_clause(vec![m.lit(), !a, !b]);
                        }
                        (Some(a), None) => self.model.add_implication(m.lit(), !a),
                        (None, Some(b)) => self.model.add_implication(m.lit(), !b),
                        (None, None) => {}
                    }
                }
            }
        }
    }

    /// Forces `M` to be an equivalence relation over the step set.
    ///
    /// For every unordered triple: if two of the three indicators hold the
    /// third must hold (transitivity), and if exactly one of the two
    /// indicators through a common step holds the remaining one must not.
    pub(super) fn add_triple_consistency(&mut self) {
        for s1 in 0..self.k {
            for s2 in s1 + 1..self.k {
                for s3 in 0..self.k {
                    if s3 == s1 || s3 == s2 {
                        continue;
                    }
                    let m12 = self.same_user(s1, s2);
                    let m13 = self.same_user(s1, s3);
                    let m23 = self.same_user(s2, s3);
                    self.model.add_clause(vec![!m13, !m23, m12.lit()]);
                    self.model.add_clause(vec![!m13, m23.lit(), !m12]);
                    self.model.add_clause(vec![m13.lit(), !m23, !m12]);
                }
            }
        }
    }

    /// Literals "step `s` is assigned a user from `group`", restricted to
    /// authorised users.
    fn served_by(&self, s: usize, group: &[usize]) -> Vec<Literal> {
        group
            .iter()
            .filter_map(|&u| self.x[s][u])
            .map(|v| v.lit())
            .collect()
    }

    /// Lowers one constraint into the model.
    pub(super) fn lower_constraint(&mut self, constraint: &Constraint) {
        match constraint {
            Constraint::NotEquals { s1, s2 } => {
                let m = self.same_user(*s1, *s2);
                self.model.add_clause(vec![!m]);
            }

            Constraint::AtMost { limit, scope } => {
                // Pigeonhole: any limit+1 steps from the scope cannot be
                // pairwise distinct, so some pair shares a user.
                for subset in scope.iter().copied().combinations(limit + 1) {
                    let clause: Vec<Literal> = subset
                        .iter()
                        .copied()
                        .tuple_combinations()
                        .map(|(a, b)| self.same_user(a, b).lit())
                        .collect();
                    self.model.add_clause(clause);
                }
            }

            Constraint::Sual {
                scope,
                limit,
                user_group,
            } => {
                // The gate may only be true when some `limit` steps of the
                // scope are pairwise distinct; a false gate confines every
                // scope step to the user group.
                let mut witnesses = Vec::new();
                for subset in scope.iter().copied().combinations(*limit) {
                    let witness = self
                        .model
                        .new_var(format!("sual_witness{}", witnesses.len()));
                    for (a, b) in subset.iter().copied().tuple_combinations() {
                        let m = self.same_user(a, b);
                        self.model.add_implication(witness.lit(), !m);
                    }
                    witnesses.push(witness.lit());
                }
                let gate = self.model.new_var("sual_gate");
                self.model.add_clause_if(&[gate.lit()], witnesses);
                for &s in scope {
                    let in_group = self.served_by(s, user_group);
                    self.model.add_clause_if(&[!gate], in_group);
                }
            }

            Constraint::WangLi { steps, user_groups } => {
                let mut indicators = Vec::new();
                for (i, group) in user_groups.iter().enumerate() {
                    let indicator = self.model.new_var(format!("wl_group{i}"));
                    for &s in steps {
                        let served = self.served_by(s, group);
                        self.model.add_clause_if(&[indicator.lit()], served);
                    }
                    indicators.push(indicator.lit());
                }
                self.model.add_exactly_one(indicators);
            }

            Constraint::AssignmentDependent { s1, s2, u1, u2 } => {
                // gate <-> s1's user is in u1; gate -> s2's user is in u2.
                let gate = self.model.new_var("ad_gate");
                let trigger = self.served_by(*s1, u1);
                self.model.add_clause_if(&[gate.lit()], trigger.clone());
                for lit in trigger {
                    self.model.add_implication(!gate, !lit);
                }
                let target = self.served_by(*s2, u2);
                self.model.add_clause_if(&[gate.lit()], target);
            }
        }
    }
}
