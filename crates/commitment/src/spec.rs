// Path: crates/commitment/src/spec.rs
//! Built-in proof specs for the supported tree formats.
//!
//! Each constructor pins the byte-exact hashing and encoding parameters of
//! one tree family; a proof that deviates from them in any field is
//! rejected by the conformance checker before any hashing happens.

use crate::proof::{HashOp, InnerSpec, LeafOp, LengthOp, ProofSpec};
use crate::webcat;

/// Spec for Cosmos IAVL tree proofs.
///
/// Inner-node preimages carry a height/size/version varint header of 4 to
/// 12 bytes, and serialized children are length-prefixed 32-byte digests
/// (33 bytes on the wire).
pub fn iavl_spec() -> ProofSpec {
    ProofSpec {
        leaf_spec: LeafOp {
            hash: HashOp::Sha256,
            prehash_key: HashOp::NoHash,
            prehash_value: HashOp::Sha256,
            length: LengthOp::VarProto,
            prefix: vec![0x00],
        },
        inner_spec: InnerSpec {
            child_order: vec![0, 1],
            child_size: 33,
            min_prefix_length: 4,
            max_prefix_length: 12,
            empty_child: Vec::new(),
            hash: HashOp::Sha256,
        },
        min_depth: 0,
        max_depth: 0,
        prehash_key_before_comparison: false,
    }
}

/// Spec for Tendermint simple-merkle proofs.
pub fn tendermint_spec() -> ProofSpec {
    ProofSpec {
        leaf_spec: LeafOp {
            hash: HashOp::Sha256,
            prehash_key: HashOp::NoHash,
            prehash_value: HashOp::Sha256,
            length: LengthOp::VarProto,
            prefix: vec![0x00],
        },
        inner_spec: InnerSpec {
            child_order: vec![0, 1],
            child_size: 32,
            min_prefix_length: 1,
            max_prefix_length: 1,
            empty_child: Vec::new(),
            hash: HashOp::Sha256,
        },
        min_depth: 0,
        max_depth: 0,
        prehash_key_before_comparison: false,
    }
}

/// Spec for sparse Merkle tree proofs.
///
/// Keys are steered by their hash, so neighbor ordering compares pre-hashed
/// keys, and absent subtrees commit an all-zero child digest.
pub fn smt_spec() -> ProofSpec {
    ProofSpec {
        leaf_spec: LeafOp {
            hash: HashOp::Sha256,
            prehash_key: HashOp::Sha256,
            prehash_value: HashOp::Sha256,
            length: LengthOp::NoPrefix,
            prefix: vec![0x00],
        },
        inner_spec: InnerSpec {
            child_order: vec![0, 1],
            child_size: 32,
            min_prefix_length: 1,
            max_prefix_length: 1,
            empty_child: vec![0x00; 32],
            hash: HashOp::Sha256,
        },
        min_depth: 0,
        max_depth: 256,
        prehash_key_before_comparison: true,
    }
}

/// Spec for the webcat sidecar's Jellyfish-style sparse Merkle tree.
///
/// The inner prefix bounds tolerate a one-byte-short domain tag emitted by
/// a historical producer spelling; everything this crate computes itself
/// uses the full `"JMT::InternalNode"` tag.
pub fn webcat_spec() -> ProofSpec {
    ProofSpec {
        leaf_spec: LeafOp {
            hash: HashOp::Sha256,
            prehash_key: HashOp::Sha256,
            prehash_value: HashOp::Sha256,
            length: LengthOp::NoPrefix,
            prefix: webcat::LEAF_DOMAIN.to_vec(),
        },
        inner_spec: InnerSpec {
            child_order: vec![0, 1],
            child_size: 32,
            min_prefix_length: webcat::INNER_DOMAIN.len() - 1,
            max_prefix_length: webcat::INNER_DOMAIN.len(),
            empty_child: webcat::placeholder_hash().to_vec(),
            hash: HashOp::Sha256,
        },
        min_depth: 0,
        max_depth: 256,
        prehash_key_before_comparison: true,
    }
}
