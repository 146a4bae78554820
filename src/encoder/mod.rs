//! Boolean encodings of WSP instances.
//!
//! Lowers an [`Instance`] into a [`CpModel`]: one decision variable
//! `x[s][u]` per authorised (step, user) pair, a same-user indicator
//! `M[s1][s2]` per unordered step pair, and clause-level lowerings of the
//! five constraint families. The encoder performs no search and never
//! references a solving engine; the produced model is handed to a
//! [`CpSolver`] by the adapter layer.
//!
//! Two interchangeable variants are exposed and must agree on every
//! instance's verdict:
//!
//! - [`EncoderVariant::Direct`] ties `M` to user identity pair by pair: for
//!   each user authorised at both steps, `M` true forces the two `x`
//!   variables equal and `M` false forbids them from both being true; a user
//!   authorised at only one of the steps can never witness equality, so `M`
//!   true forces that variable false.
//! - [`EncoderVariant::Relational`] additionally constrains `M` to be a
//!   genuine equivalence relation over the steps via a triple-consistency
//!   rule on every unordered triple. The per-user tie is kept on every pair,
//!   which more than covers the required witness pairing per equivalence
//!   class. Preferred when constraints speak about "same/different user"
//!   independent of which concrete user, as the relational skeleton stays
//!   uniform while the user count grows.
//!
//! [`CpSolver`]: crate::cp::CpSolver

mod lowering;

use crate::cp::{BoolVar, CpModel, CpSolution};
use crate::error::WspError;
use crate::instance::Instance;
use tracing::debug;

/// Which lowering style to use for the same-user indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderVariant {
    /// Per-user ties only.
    Direct,
    /// Per-user ties plus equivalence-relation triple consistency.
    Relational,
}

/// A lowered instance: the boolean model plus the variable maps needed to
/// read a valuation back.
///
/// `x` cells exist only where the user is authorised for the step —
/// structurally absent pairs are `None` and never become variables, keeping
/// the model proportional to the authorisation relation rather than `k * n`.
#[derive(Debug)]
pub struct WspEncoding {
    model: CpModel,
    k: usize,
    n: usize,
    x: Vec<Vec<Option<BoolVar>>>,
    m: Vec<BoolVar>,
}

/// Encodes an instance with the chosen variant.
pub fn encode(instance: &Instance, variant: EncoderVariant) -> WspEncoding {
    let k = instance.k();
    let n = instance.n();
    let mut model = CpModel::new(match variant {
        EncoderVariant::Direct => "wsp-direct",
        EncoderVariant::Relational => "wsp-relational",
    });

    // Decision variables, sparse over the authorisation relation, with the
    // exactly-one coverage constraint per step. A step nobody may perform
    // yields an empty group, i.e. an unsatisfiable model.
    let mut x: Vec<Vec<Option<BoolVar>>> = Vec::with_capacity(k);
    for s in 0..k {
        let mut row: Vec<Option<BoolVar>> = vec![None; n];
        for u in instance.authorised_users(s) {
            row[u] = Some(model.new_var(format!("x[{s},{u}]")));
        }
        model.add_exactly_one(row.iter().flatten().map(|v| v.lit()).collect());
        x.push(row);
    }

    // Same-user indicators, one per unordered pair of distinct steps.
    let mut m = Vec::with_capacity(k * k.saturating_sub(1) / 2);
    for s1 in 0..k {
        for s2 in s1 + 1..k {
            m.push(model.new_var(format!("m[{s1},{s2}]")));
        }
    }

    let mut encoding = WspEncoding { model, k, n, x, m };

    encoding.tie_same_user();
    if variant == EncoderVariant::Relational {
        encoding.add_triple_consistency();
    }
    for constraint in instance.constraints() {
        encoding.lower_constraint(constraint);
    }

    debug!(
        variant = ?variant,
        vars = encoding.model.var_count(),
        constraints = encoding.model.constraint_count(),
        "encoded instance"
    );
    encoding
}

impl WspEncoding {
    /// The lowered boolean model.
    pub fn model(&self) -> &CpModel {
        &self.model
    }

    /// Number of steps.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of users.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The decision variable for (step, user), if the user is authorised.
    pub fn x(&self, step: usize, user: usize) -> Option<BoolVar> {
        self.x[step][user]
    }

    /// The same-user indicator for two distinct steps, in either order.
    ///
    /// # Panics
    ///
    /// Panics if `s1 == s2`; the indicator is only defined on distinct
    /// pairs.
    pub fn same_user(&self, s1: usize, s2: usize) -> BoolVar {
        assert_ne!(s1, s2, "same-user indicator needs two distinct steps");
        let (lo, hi) = if s1 < s2 { (s1, s2) } else { (s2, s1) };
        // Row-major upper triangle.
        let index = lo * (2 * self.k - lo - 1) / 2 + (hi - lo - 1);
        self.m[index]
    }

    /// Reads a satisfying valuation back into a step-to-user assignment.
    ///
    /// For every step exactly one authorised user's variable must be true;
    /// anything else is an encoder invariant breach and fatal.
    pub fn decode(&self, solution: &CpSolution) -> Result<Vec<usize>, WspError> {
        let mut assignment = Vec::with_capacity(self.k);
        for s in 0..self.k {
            let assigned: Vec<usize> = (0..self.n)
                .filter(|&u| {
                    self.x[s][u]
                        .map(|var| solution.value(var))
                        .unwrap_or(false)
                })
                .collect();
            match assigned.as_slice() {
                [user] => assignment.push(*user),
                _ => {
                    return Err(WspError::Encoding(format!(
                        "step {} has {} assigned users in a satisfying valuation",
                        s + 1,
                        assigned.len()
                    )))
                }
            }
        }
        Ok(assignment)
    }
}
