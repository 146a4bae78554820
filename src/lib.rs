//! Workflow Satisfiability Problem toolkit.
//!
//! The Workflow Satisfiability Problem (WSP): assign exactly one authorised
//! user to each step of a workflow, subject to security constraints
//! (separation of duty, cardinality limits, group-scoped limits,
//! team coverage, assignment-dependent rules). This crate provides:
//!
//! - **Instance layer**: the data model, the one-based text format with a
//!   line-precise validating parser, and a seedable instance generator.
//! - **CP layer**: an engine-agnostic boolean model plus a pluggable
//!   [`CpSolver`] boundary with a built-in DPLL reference engine.
//! - **Encoder**: lowers an instance into the boolean model in two
//!   interchangeable styles — direct per-user ties and a relational
//!   equivalence encoding — that must agree on every verdict.
//! - **Adapter**: runs an engine under a time budget and maps its verdict
//!   back to sat/unsat/unknown, where unknown is never conflated with
//!   unsat.
//! - **Verifier**: re-checks solutions with each constraint's native
//!   predicate, independently of the encoder, as the differential oracle.
//! - **Candidate runner**: drives an external solver binary under the same
//!   timeout contract for cross-checking.
//!
//! # Example
//!
//! ```
//! use wsp_kit::adapter::{solve_instance, SolveOutcome};
//! use wsp_kit::cp::{BacktrackSolver, SolverConfig};
//! use wsp_kit::encoder::EncoderVariant;
//! use wsp_kit::instance::Instance;
//! use wsp_kit::verify::verify;
//!
//! let instance = Instance::parse(
//!     "#Steps: 2\n#Users: 2\n#Constraints: 1\n\
//!      Authorizations:\nUser 1: 1 2\nUser 2: 1 2\n\
//!      Constraints:\nSoD scope 1 2\n",
//! )?;
//!
//! let outcome = solve_instance(
//!     &instance,
//!     EncoderVariant::Relational,
//!     &BacktrackSolver::new(),
//!     &SolverConfig::default(),
//! )?;
//! match outcome {
//!     SolveOutcome::Sat(solution) => assert!(verify(&instance, &solution)),
//!     other => panic!("expected sat, got {other:?}"),
//! }
//! # Ok::<(), wsp_kit::WspError>(())
//! ```
//!
//! [`CpSolver`]: cp::CpSolver

pub mod adapter;
pub mod candidate;
pub mod cp;
pub mod encoder;
pub mod error;
pub mod instance;
pub mod verify;

pub use error::WspError;
