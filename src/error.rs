//! Error taxonomy.
//!
//! Parsing aborts on the first error; no partially built [`Instance`] is ever
//! returned. Encoding errors are invariant breaches that should be unreachable
//! by construction.
//!
//! [`Instance`]: crate::instance::Instance

use thiserror::Error;

/// Errors produced while parsing, validating, encoding, or running
/// external processes.
#[derive(Debug, Error)]
pub enum WspError {
    /// A header, section keyword, or constraint line did not match the
    /// expected grammar.
    #[error("malformed input at line {line}: {content:?}")]
    Format {
        /// One-based line number in the input text.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// An entity was well-formed but violated an index/scope/group invariant
    /// against the declared step and user counts.
    #[error("infeasible entity at line {line}: {reason} in {content:?}")]
    Feasibility {
        /// One-based line number in the input text.
        line: usize,
        /// The offending line.
        content: String,
        /// Which invariant failed.
        reason: String,
    },

    /// A constraint line whose leading keyword matches none of the known
    /// constraint kinds.
    #[error("unknown constraint kind at line {line}: {content:?}")]
    UnknownConstraintKind {
        /// One-based line number in the input text.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// An encoder-internal invariant was broken (e.g. a satisfying valuation
    /// without exactly one assigned user per step). Fatal, not recoverable.
    #[error("encoding invariant violated: {0}")]
    Encoding(String),

    /// I/O failure while reading or writing instance/solution files or
    /// spawning a candidate solver process.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
