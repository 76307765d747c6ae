// Path: crates/commitment/src/proof/api.rs
//! Boolean membership API over the generic proof envelope.
//!
//! Everything here catches the fail-hard errors of the core verifiers and
//! reduces them to a decision. Callers that need to distinguish a malformed
//! proof from a merely non-matching one use [`super::verify`] directly.

use log::debug;

use super::compress::decompress;
use super::verify::{key_for_comparison, verify_existence, verify_non_existence};
use super::{BatchEntry, CommitmentProof, ExistenceProof, NonExistenceProof, ProofSpec};

/// Returns `true` iff `proof` contains an existence witness for `key` that
/// verifies `key -> value` under `root` and conforms to `spec`.
pub fn verify_membership(
    proof: &CommitmentProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
    value: &[u8],
) -> bool {
    let normalized = match decompress(proof) {
        Ok(normalized) => normalized,
        Err(e) => {
            debug!("membership check rejected proof: {e}");
            return false;
        }
    };
    match find_exist_proof(&normalized, key) {
        Some(exist) => match verify_existence(exist, spec, root, key, value) {
            Ok(()) => true,
            Err(e) => {
                debug!("membership verification failed: {e}");
                false
            }
        },
        None => false,
    }
}

/// Returns `true` iff `proof` contains a non-existence witness bracketing
/// `key` that verifies under `root` and conforms to `spec`.
pub fn verify_non_membership(
    proof: &CommitmentProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
) -> bool {
    let normalized = match decompress(proof) {
        Ok(normalized) => normalized,
        Err(e) => {
            debug!("non-membership check rejected proof: {e}");
            return false;
        }
    };
    match find_nonexist_proof(&normalized, spec, key) {
        Some(nonexist) => match verify_non_existence(nonexist, spec, root, key) {
            Ok(()) => true,
            Err(e) => {
                debug!("non-membership verification failed: {e}");
                false
            }
        },
        None => false,
    }
}

/// Verifies every `(key, value)` item against a single batch proof.
/// Short-circuits on the first failure; there is no partial success.
pub fn batch_verify_membership(
    proof: &CommitmentProof,
    spec: &ProofSpec,
    root: &[u8],
    items: &[(&[u8], &[u8])],
) -> bool {
    // Decompress once up front so per-item lookups touch plain paths.
    let normalized = match decompress(proof) {
        Ok(normalized) => normalized,
        Err(e) => {
            debug!("batch membership check rejected proof: {e}");
            return false;
        }
    };
    items
        .iter()
        .all(|(key, value)| verify_membership(&normalized, spec, root, key, value))
}

/// Verifies the absence of every key against a single batch proof.
/// Short-circuits on the first failure; there is no partial success.
pub fn batch_verify_non_membership(
    proof: &CommitmentProof,
    spec: &ProofSpec,
    root: &[u8],
    keys: &[&[u8]],
) -> bool {
    let normalized = match decompress(proof) {
        Ok(normalized) => normalized,
        Err(e) => {
            debug!("batch non-membership check rejected proof: {e}");
            return false;
        }
    };
    keys.iter()
        .all(|key| verify_non_membership(&normalized, spec, root, key))
}

/// Locates the existence proof applicable to `key`: the direct variant, or
/// the first matching batch entry.
fn find_exist_proof<'a>(proof: &'a CommitmentProof, key: &[u8]) -> Option<&'a ExistenceProof> {
    match proof {
        CommitmentProof::Exist(exist) if exist.key == key => Some(exist),
        CommitmentProof::Batch(batch) => batch.entries.iter().find_map(|entry| match entry {
            BatchEntry::Exist(exist) if exist.key == key => Some(exist),
            _ => None,
        }),
        _ => None,
    }
}

/// Locates the non-existence proof applicable to `key`: the direct variant,
/// or the first batch entry whose neighbors bracket `key` under the spec's
/// comparison mapping.
fn find_nonexist_proof<'a>(
    proof: &'a CommitmentProof,
    spec: &ProofSpec,
    key: &[u8],
) -> Option<&'a NonExistenceProof> {
    match proof {
        CommitmentProof::Nonexist(nonexist) => Some(nonexist),
        CommitmentProof::Batch(batch) => batch.entries.iter().find_map(|entry| match entry {
            BatchEntry::Nonexist(nonexist) if brackets(spec, nonexist, key) => Some(nonexist),
            _ => None,
        }),
        _ => None,
    }
}

/// True when `key` falls strictly between the witness's present neighbors.
fn brackets(spec: &ProofSpec, nonexist: &NonExistenceProof, key: &[u8]) -> bool {
    let Ok(target) = key_for_comparison(spec, key) else {
        return false;
    };
    if nonexist.left.is_none() && nonexist.right.is_none() {
        return false;
    }
    if let Some(left) = &nonexist.left {
        match key_for_comparison(spec, &left.key) {
            Ok(left_key) if left_key < target => {}
            _ => return false,
        }
    }
    if let Some(right) = &nonexist.right {
        match key_for_comparison(spec, &right.key) {
            Ok(right_key) if target < right_key => {}
            _ => return false,
        }
    }
    true
}
