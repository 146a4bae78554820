//! CP model definition.

use super::variables::{BoolVar, Literal};

/// A constraint in the boolean CP model.
///
/// These are engine-agnostic boolean constraints. Domain-specific structure
/// (e.g., workflow authorisations) is lowered into this form at the consumer
/// layer and never appears here.
#[derive(Debug, Clone)]
pub enum BoolConstraint {
    /// Disjunction: at least one literal must hold.
    ///
    /// An empty clause is legal and unsatisfiable; consumers may emit it to
    /// mark a model infeasible by construction.
    Clause {
        /// Literals of the disjunction.
        literals: Vec<Literal>,
    },

    /// Exactly one of the literals must hold (coverage and uniqueness in a
    /// single constraint).
    ///
    /// An empty group is unsatisfiable, like an empty clause.
    ExactlyOne {
        /// Literals of the group.
        literals: Vec<Literal>,
    },
}

impl BoolConstraint {
    /// Literals referenced by this constraint.
    pub fn literals(&self) -> &[Literal] {
        match self {
            BoolConstraint::Clause { literals } | BoolConstraint::ExactlyOne { literals } => {
                literals
            }
        }
    }
}

/// A boolean constraint-programming model.
///
/// Contains variables and constraints; no search is performed here. The
/// model is handed to a [`CpSolver`] implementation.
///
/// # Examples
///
/// ```
/// use wsp_kit::cp::CpModel;
///
/// let mut model = CpModel::new("example");
/// let a = model.new_var("a");
/// let b = model.new_var("b");
/// model.add_exactly_one(vec![a.lit(), b.lit()]);
/// model.add_clause(vec![!a, b.lit()]);
/// assert!(model.validate().is_ok());
/// ```
///
/// [`CpSolver`]: super::solver::CpSolver
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Variable names, indexed by [`BoolVar::index`].
    var_names: Vec<String>,
    /// Constraints.
    pub constraints: Vec<BoolConstraint>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_names: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Creates a fresh boolean variable and returns its handle.
    pub fn new_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.var_names.push(name.into());
        BoolVar(self.var_names.len() - 1)
    }

    /// Name of a variable.
    pub fn var_name(&self, var: BoolVar) -> &str {
        &self.var_names[var.0]
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.var_names.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: BoolConstraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add a clause (disjunction of literals).
    pub fn add_clause(&mut self, literals: Vec<Literal>) {
        self.constraints.push(BoolConstraint::Clause { literals });
    }

    /// Convenience: add an exactly-one group.
    pub fn add_exactly_one(&mut self, literals: Vec<Literal>) {
        self.constraints.push(BoolConstraint::ExactlyOne { literals });
    }

    /// Convenience: add the implication `premise -> conclusion`.
    pub fn add_implication(&mut self, premise: Literal, conclusion: Literal) {
        self.add_clause(vec![!premise, conclusion]);
    }

    /// Convenience: add a clause enforced only when all `enforcers` hold.
    ///
    /// `enforcers -> (l1 v l2 v ...)`, the clause form of an
    /// enforcement-literal ("only enforce if") construct.
    pub fn add_clause_if(&mut self, enforcers: &[Literal], mut literals: Vec<Literal>) {
        for &e in enforcers {
            literals.push(!e);
        }
        self.add_clause(literals);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists. Empty clauses and
    /// exactly-one groups are allowed (they make the model unsatisfiable,
    /// which is a verdict, not a modelling error).
    pub fn validate(&self) -> Result<(), String> {
        for constraint in &self.constraints {
            for lit in constraint.literals() {
                if lit.var.0 >= self.var_names.len() {
                    return Err(format!("undefined variable index: {}", lit.var.0));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let mut model = CpModel::new("test");
        let a = model.new_var("a");
        let b = model.new_var("b");
        model.add_exactly_one(vec![a.lit(), b.lit()]);
        model.add_clause(vec![!a, b.lit()]);

        assert_eq!(model.var_count(), 2);
        assert_eq!(model.constraint_count(), 2);
        assert_eq!(model.var_name(a), "a");
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = CpModel::new("test");
        let a = model.new_var("a");
        let mut other = CpModel::new("other");
        for _ in 0..5 {
            other.new_var("x");
        }
        let foreign = other.new_var("y");
        model.add_clause(vec![a.lit(), foreign.lit()]);

        assert!(model.validate().is_err());
    }

    #[test]
    fn test_empty_clause_is_valid_model() {
        let mut model = CpModel::new("test");
        model.add_clause(vec![]);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_clause_if_appends_negated_enforcers() {
        let mut model = CpModel::new("test");
        let a = model.new_var("a");
        let b = model.new_var("b");
        let e = model.new_var("e");
        model.add_clause_if(&[e.lit()], vec![a.lit(), b.lit()]);

        match &model.constraints[0] {
            BoolConstraint::Clause { literals } => {
                assert_eq!(literals.len(), 3);
                assert!(literals.contains(&!e));
            }
            other => panic!("expected clause, got {other:?}"),
        }
    }

    #[test]
    fn test_implication_is_binary_clause() {
        let mut model = CpModel::new("test");
        let a = model.new_var("a");
        let b = model.new_var("b");
        model.add_implication(a.lit(), b.lit());

        match &model.constraints[0] {
            BoolConstraint::Clause { literals } => {
                assert_eq!(literals, &vec![!a, b.lit()]);
            }
            other => panic!("expected clause, got {other:?}"),
        }
    }
}
