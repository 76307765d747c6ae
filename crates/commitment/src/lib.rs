// Path: crates/commitment/src/lib.rs

#![forbid(unsafe_code)]
//! # Tessera Commitment
//!
//! A verifier for vector-commitment membership and non-membership proofs
//! against a Merkle commitment root. The proof model is an operator replay:
//! a leaf operator hashes the queried `(key, value)` pair, a bottom-up
//! sequence of inner operators folds the result up to the root, and a
//! per-tree [`proof::ProofSpec`] pins the hashing and encoding choices so a
//! proof cannot equivocate between tree formats.
//!
//! Verification is purely CPU-bound and stateless: no I/O, no globals, and
//! deterministic output for fixed inputs.

pub mod proof;
pub mod spec;
pub mod webcat;

/// A prelude for easily importing the most common entry points.
pub mod prelude {
    pub use crate::proof::api::{
        batch_verify_membership, batch_verify_non_membership, verify_membership,
        verify_non_membership,
    };
    pub use crate::proof::compress::{compress, decompress};
    pub use crate::proof::verify::{
        calculate_existence_root, ensure_spec, verify_existence, verify_non_existence,
    };
    pub use crate::spec::{iavl_spec, smt_spec, tendermint_spec, webcat_spec};
    pub use crate::webcat::verify_webcat_proof;
}
