//! Boolean constraint-programming layer.
//!
//! A small engine-agnostic modelling surface for boolean satisfaction
//! problems, plus a pluggable solver boundary.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`], [`Literal`] — boolean decision variables
//! - **Model**: [`CpModel`] — container for variables and [`BoolConstraint`]s
//! - **Solver**: [`CpSolver`] trait — interface for solver implementations
//! - **Reference engine**: [`BacktrackSolver`] — complete DPLL-style search
//!
//! # Design
//!
//! This module defines the modelling layer and one native engine. The
//! [`CpSolver`] trait allows plugging in external solvers (OR-Tools CP-SAT,
//! a SAT solver behind an adapter) without touching the consumers: the
//! encoder only ever produces a [`CpModel`].

mod model;
mod solver;
mod variables;

pub use model::{BoolConstraint, CpModel};
pub use solver::{BacktrackSolver, CpSolution, CpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, Literal};
