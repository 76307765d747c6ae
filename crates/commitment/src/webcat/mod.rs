// Path: crates/commitment/src/webcat/mod.rs
//! Sidecar verifier for webcat canonical-mapping bundles.
//!
//! A bundle carries the full leaf set of a sparse Merkle tree, the root it
//! claims for that set, and a chain of commitment proofs ending in an
//! existence proof that binds the canonical root to the application hash.
//! Verification rebuilds the sparse-Merkle root from the raw leaves with
//! bitwise key-hash steering, compares it to the declared root, and then
//! replays the chain proof through the generic existence verifier.

use log::debug;
use parity_scale_codec::Decode;
use serde::{Deserialize, Serialize};
use tessera_types::error::ProofError;

use crate::proof::ops::sha256;
use crate::proof::verify::verify_existence;
use crate::proof::CommitmentProof;
use crate::spec::webcat_spec;

/// Domain tag of a leaf-node preimage.
pub const LEAF_DOMAIN: &[u8] = b"JMT::LeafNode";
/// Domain tag of an internal-node preimage.
pub const INNER_DOMAIN: &[u8] = b"JMT::InternalNode";

const PLACEHOLDER_PREIMAGE: &[u8] = b"SPARSE_MERKLE_PLACEHOLDER_HASH__";
const CANONICAL_KEY_PREFIX: &str = "canonical/";
const CHAIN_KEY: &[u8] = b"canonical";
const MAX_TREE_DEPTH: usize = 256;

/// Digest committed for an empty subtree.
pub fn placeholder_hash() -> [u8; 32] {
    sha256(PLACEHOLDER_PREIMAGE)
}

/// One raw `(key, value)` pair from a sidecar bundle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLeaf {
    /// Mapping key, optionally carrying the `canonical/` namespace prefix.
    pub key: String,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

impl CanonicalLeaf {
    /// The key with the `canonical/` namespace stripped; this is the form
    /// that is hashed into the tree.
    pub fn canonical_key(&self) -> &str {
        self.key
            .strip_prefix(CANONICAL_KEY_PREFIX)
            .unwrap_or(&self.key)
    }
}

/// A sidecar bundle as handed over by the host: the leaf set, the declared
/// roots in hex, and the proof chain whose last element binds the canonical
/// root to the application hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SidecarBundle {
    /// Full leaf set of the canonical mapping.
    pub leaves: Vec<CanonicalLeaf>,
    /// Hex-encoded sparse-Merkle root claimed for `leaves`.
    pub canonical_root_hash: String,
    /// Hex-encoded application root the chain proof commits to.
    pub app_hash: String,
    /// Encoded commitment proofs; only the last element is the chain link.
    pub proof_bytes: Vec<Vec<u8>>,
}

/// A leaf with its steering hash and node digest precomputed.
struct HashedLeaf {
    key_hash: [u8; 32],
    node_hash: [u8; 32],
}

/// Verifies a sidecar bundle end to end.
///
/// On success returns the normalized leaf list (keys stripped of their
/// namespace prefix); on any failure returns `None`. Errors never
/// propagate out of this entry point.
pub fn verify_webcat_proof(bundle: &SidecarBundle) -> Option<Vec<CanonicalLeaf>> {
    match check_bundle(bundle) {
        Ok(leaves) => Some(leaves),
        Err(e) => {
            debug!("webcat bundle rejected: {e}");
            None
        }
    }
}

/// Rebuilds the sparse-Merkle root committed by `leaves`.
///
/// Zero leaves yield the placeholder digest.
pub fn reconstruct_canonical_root(leaves: &[CanonicalLeaf]) -> [u8; 32] {
    let hashed: Vec<HashedLeaf> = leaves.iter().map(hash_leaf).collect();
    let refs: Vec<&HashedLeaf> = hashed.iter().collect();
    build_subtree(&refs, 0)
}

fn check_bundle(bundle: &SidecarBundle) -> Result<Vec<CanonicalLeaf>, ProofError> {
    let declared_root = decode_digest(&bundle.canonical_root_hash)?;
    let app_hash = decode_digest(&bundle.app_hash)?;

    let computed_root = reconstruct_canonical_root(&bundle.leaves);
    if computed_root != declared_root {
        debug!(
            "canonical root mismatch: computed {} declared {}",
            hex::encode(computed_root),
            hex::encode(declared_root)
        );
        return Err(ProofError::RootMismatch);
    }

    let chain_bytes = bundle.proof_bytes.last().ok_or_else(|| {
        ProofError::MalformedProof("bundle carries no chain proof".into())
    })?;
    let chain = CommitmentProof::decode(&mut chain_bytes.as_slice())
        .map_err(|e| ProofError::MalformedProof(format!("chain proof does not decode: {e}")))?;
    let CommitmentProof::Exist(exist) = &chain else {
        return Err(ProofError::MalformedProof(
            "chain proof is not an existence proof".into(),
        ));
    };
    verify_existence(exist, &webcat_spec(), &app_hash, CHAIN_KEY, &declared_root)?;

    Ok(bundle
        .leaves
        .iter()
        .map(|leaf| CanonicalLeaf {
            key: leaf.canonical_key().to_string(),
            value: leaf.value.clone(),
        })
        .collect())
}

fn decode_digest(hex_digest: &str) -> Result<[u8; 32], ProofError> {
    let bytes = hex::decode(hex_digest)
        .map_err(|e| ProofError::InvalidEncoding(format!("digest is not hex: {e}")))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        ProofError::InvalidEncoding(format!("digest is {} bytes, expected 32", bytes.len()))
    })
}

fn hash_leaf(leaf: &CanonicalLeaf) -> HashedLeaf {
    let key_hash = sha256(leaf.canonical_key().as_bytes());
    let value_hash = sha256(&leaf.value);

    let mut preimage = Vec::with_capacity(LEAF_DOMAIN.len() + 64);
    preimage.extend_from_slice(LEAF_DOMAIN);
    preimage.extend_from_slice(&key_hash);
    preimage.extend_from_slice(&value_hash);
    HashedLeaf {
        key_hash,
        node_hash: sha256(&preimage),
    }
}

/// Bit `position` of `hash`, MSB-first within each byte.
fn key_bit(hash: &[u8; 32], position: usize) -> bool {
    let byte = hash[position / 8];
    (byte >> (7 - position % 8)) & 1 == 1
}

fn build_subtree(leaves: &[&HashedLeaf], depth: usize) -> [u8; 32] {
    if leaves.is_empty() {
        return placeholder_hash();
    }
    if leaves.len() == 1 || depth >= MAX_TREE_DEPTH {
        return leaves[0].node_hash;
    }

    let (left, right): (Vec<&HashedLeaf>, Vec<&HashedLeaf>) = leaves
        .iter()
        .copied()
        .partition(|leaf| !key_bit(&leaf.key_hash, depth));
    let left_hash = build_subtree(&left, depth + 1);
    let right_hash = build_subtree(&right, depth + 1);

    let mut preimage = Vec::with_capacity(INNER_DOMAIN.len() + 64);
    preimage.extend_from_slice(INNER_DOMAIN);
    preimage.extend_from_slice(&left_hash);
    preimage.extend_from_slice(&right_hash);
    sha256(&preimage)
}
