// Path: crates/types/src/error/mod.rs
//! Core error types for proof verification.

use thiserror::Error;

/// Errors surfaced while evaluating or verifying a commitment proof.
///
/// Core routines fail hard with a specific kind; the top-level membership
/// API catches every kind and reduces it to a boolean decision.
#[derive(Error, Debug)]
pub enum ProofError {
    /// A required field is missing or the proof is structurally invalid.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// An operator does not conform to the tree's proof spec.
    #[error("spec violation: {0}")]
    SpecViolation(String),
    /// The recomputed root does not match the committed root.
    #[error("computed root does not match the committed root")]
    RootMismatch,
    /// The proof's key or value differs from the queried key or value.
    #[error("key/value mismatch: {0}")]
    KeyValueMismatch(String),
    /// Non-existence neighbor ordering or tree adjacency failed.
    #[error("ordering violation: {0}")]
    OrderingViolation(String),
    /// An operator is unknown or not supported by this verifier.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Input bytes are not valid for the expected encoding.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
