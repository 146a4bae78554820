//! CP variable types.

use std::ops::Not;

/// A boolean decision variable.
///
/// `BoolVar` is a lightweight handle into the model that created it; the
/// model owns the variable's name and the solver owns its value. Handles are
/// only meaningful together with their model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(pub(crate) usize);

impl BoolVar {
    /// Index of this variable inside its model.
    pub fn index(self) -> usize {
        self.0
    }

    /// The positive literal of this variable.
    pub fn lit(self) -> Literal {
        Literal {
            var: self,
            positive: true,
        }
    }
}

impl Not for BoolVar {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self,
            positive: false,
        }
    }
}

/// A literal: a boolean variable or its negation.
///
/// # Examples
///
/// ```
/// use wsp_kit::cp::CpModel;
///
/// let mut model = CpModel::new("example");
/// let a = model.new_var("a");
/// let lit = !a;
/// assert_eq!(lit.var, a);
/// assert!(!lit.positive);
/// assert_eq!(!lit, a.lit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The underlying variable.
    pub var: BoolVar,
    /// `true` for the variable itself, `false` for its negation.
    pub positive: bool,
}

impl Literal {
    /// Evaluates this literal under a value for its variable.
    pub fn eval(self, value: bool) -> bool {
        value == self.positive
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self.var,
            positive: !self.positive,
        }
    }
}

impl From<BoolVar> for Literal {
    fn from(var: BoolVar) -> Self {
        var.lit()
    }
}
