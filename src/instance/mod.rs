//! WSP instance layer.
//!
//! # Key Components
//!
//! - **Data model**: [`Instance`], [`Authorisation`], [`Constraint`] — pure
//!   data with local feasibility invariants
//! - **Solutions**: [`Solution`] — per-solve result with text round-trip
//! - **Parsing**: [`Instance::parse`] / [`Instance::to_text`] — the one-based
//!   text format, validated line by line
//! - **Generation**: [`GeneratorConfig`] — seedable random instances for
//!   benches and differential tests

mod generate;
mod model;
mod parser;
mod solution;

pub use generate::GeneratorConfig;
pub use model::{Authorisation, Constraint, Instance};
pub use solution::Solution;
