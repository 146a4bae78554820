//! CP solver interface and a reference implementation.

use super::model::{BoolConstraint, CpModel};
use super::variables::{BoolVar, Literal};
use std::time::{Duration, Instant};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded its time budget. Never conflated with [`Infeasible`].
    ///
    /// [`Infeasible`]: SolverStatus::Infeasible
    Timeout,
    /// No verdict for unknown reasons.
    Unknown,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Variable valuation, indexed by [`BoolVar::index`]. Only meaningful
    /// when a solution was found.
    pub values: Vec<bool>,
    /// Wall-clock solve time.
    pub solve_time: Duration,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            solve_time: Duration::ZERO,
        }
    }

    /// Whether a feasible valuation was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a variable in the valuation.
    pub fn value(&self, var: BoolVar) -> bool {
        self.values[var.index()]
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: i64,
}

impl SolverConfig {
    /// Sets the time budget.
    pub fn with_time_limit_ms(mut self, time_limit_ms: i64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
        }
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual search. This can wrap external engines
/// (e.g., OR-Tools CP-SAT) or provide a native search; the modelling layer
/// never depends on a specific engine.
pub trait CpSolver {
    /// Solves the model within the configured time budget.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// A DPLL-style backtracking solver.
///
/// Expands exactly-one groups into clauses, then searches with unit
/// propagation and chronological backtracking. Complete: it returns
/// [`SolverStatus::Feasible`] or [`SolverStatus::Infeasible`] whenever it
/// finishes within the time budget, and [`SolverStatus::Timeout`] otherwise.
///
/// Not industrial strength (no learning, no restarts); intended as the
/// built-in engine for moderate instances and as the reference against which
/// external engines are checked.
pub struct BacktrackSolver;

impl BacktrackSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BacktrackSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for BacktrackSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if model.validate().is_err() {
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start = Instant::now();
        let deadline = start + Duration::from_millis(config.time_limit_ms.max(0) as u64);

        let mut search = Search::new(model, deadline);
        let status = match search.run() {
            Ok(true) => SolverStatus::Feasible,
            Ok(false) => SolverStatus::Infeasible,
            Err(DeadlineExceeded) => SolverStatus::Timeout,
        };

        CpSolution {
            status,
            values: search
                .values
                .iter()
                .map(|v| v.unwrap_or(false))
                .collect(),
            solve_time: start.elapsed(),
        }
    }
}

struct DeadlineExceeded;

struct Search {
    clauses: Vec<Vec<Literal>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    deadline: Instant,
}

impl Search {
    fn new(model: &CpModel, deadline: Instant) -> Self {
        // Exactly-one groups become one coverage clause plus pairwise
        // exclusion clauses.
        let mut clauses = Vec::new();
        for constraint in &model.constraints {
            match constraint {
                BoolConstraint::Clause { literals } => clauses.push(literals.clone()),
                BoolConstraint::ExactlyOne { literals } => {
                    clauses.push(literals.clone());
                    for i in 0..literals.len() {
                        for j in i + 1..literals.len() {
                            clauses.push(vec![!literals[i], !literals[j]]);
                        }
                    }
                }
            }
        }

        Self {
            clauses,
            values: vec![None; model.var_count()],
            trail: Vec::new(),
            deadline,
        }
    }

    fn run(&mut self) -> Result<bool, DeadlineExceeded> {
        if !self.propagate() {
            return Ok(false);
        }
        self.search()
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = self.trail.pop().unwrap();
            self.values[var] = None;
        }
    }

    /// Unit propagation to fixpoint. Returns false on conflict.
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;
            for ci in 0..self.clauses.len() {
                let mut satisfied = false;
                let mut unassigned: Option<Literal> = None;
                let mut unassigned_count = 0;
                for &lit in &self.clauses[ci] {
                    match self.values[lit.var.index()] {
                        Some(v) => {
                            if lit.eval(v) {
                                satisfied = true;
                                break;
                            }
                        }
                        None => {
                            unassigned = Some(lit);
                            unassigned_count += 1;
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match unassigned_count {
                    0 => return false,
                    1 => {
                        let lit = unassigned.unwrap();
                        self.assign(lit.var.index(), lit.positive);
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    fn search(&mut self) -> Result<bool, DeadlineExceeded> {
        if Instant::now() >= self.deadline {
            return Err(DeadlineExceeded);
        }

        let var = match self.values.iter().position(|v| v.is_none()) {
            Some(v) => v,
            None => return Ok(true),
        };

        for value in [true, false] {
            let mark = self.trail.len();
            self.assign(var, value);
            if self.propagate() && self.search()? {
                return Ok(true);
            }
            self.undo_to(mark);
        }

        Ok(false)
    }
}
