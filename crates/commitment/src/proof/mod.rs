// Path: crates/commitment/src/proof/mod.rs
//! Commitment proof data model and the stateless verifier built on it.
//!
//! All structures are immutable once decoded. The wire decoder that turns a
//! protobuf blob into these records lives outside this crate; the SCALE
//! derives below give every record a canonical byte encoding, which the
//! batch compressor uses as its deduplication key and the sidecar uses to
//! materialize chain proofs.

pub mod api;
pub mod compress;
pub mod ops;
pub mod verify;

#[cfg(test)]
mod tests;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Hash function applied at a proof step.
///
/// Only [`HashOp::Sha256`] is ever computed; [`HashOp::NoHash`] is the
/// identity where a pre-hash position allows it. Every other variant is
/// recognized on the wire but rejected when used as an active hash.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum HashOp {
    /// Use the data unchanged.
    NoHash,
    /// SHA-256, the only computed hash.
    Sha256,
    /// SHA-512 (recognized, not computed).
    Sha512,
    /// Keccak-256 (recognized, not computed).
    Keccak,
    /// RIPEMD-160 (recognized, not computed).
    Ripemd160,
    /// Double SHA-256 (recognized, not computed).
    Bitcoin,
    /// SHA-512/256 (recognized, not computed).
    Sha512256,
    /// BLAKE2b-512 (recognized, not computed).
    Blake2b512,
    /// BLAKE2s-256 (recognized, not computed).
    Blake2s256,
    /// BLAKE3 (recognized, not computed).
    Blake3,
}

/// Length encoding applied to a pre-hashed key or value before it enters a
/// leaf preimage.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum LengthOp {
    /// No length prefix.
    NoPrefix,
    /// Protobuf-style varint prefix, low-order group first.
    VarProto,
    /// RLP length header (recognized, not supported).
    VarRlp,
    /// 4-byte big-endian prefix (recognized, not supported).
    Fixed32Big,
    /// 4-byte little-endian prefix.
    Fixed32Little,
    /// 8-byte big-endian prefix (recognized, not supported).
    Fixed64Big,
    /// 8-byte little-endian prefix (recognized, not supported).
    Fixed64Little,
    /// Assert the data is exactly 32 bytes; no prefix emitted.
    Require32Bytes,
    /// Assert the data is exactly 64 bytes; no prefix emitted.
    Require64Bytes,
}

/// How a leaf node's digest is formed from the `(key, value)` pair.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeafOp {
    /// Hash over the assembled preimage.
    pub hash: HashOp,
    /// Hash applied to the key before length encoding.
    pub prehash_key: HashOp,
    /// Hash applied to the value before length encoding.
    pub prehash_value: HashOp,
    /// Length encoding for both the prepared key and the prepared value.
    pub length: LengthOp,
    /// Domain-separation prefix placed before the prepared key.
    pub prefix: Vec<u8>,
}

/// One step up the tree: the child digest is framed by `prefix` and
/// `suffix` and hashed. Sibling digests live inside the framing bytes.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct InnerOp {
    /// Hash over `prefix || child || suffix`.
    pub hash: HashOp,
    /// Bytes before the child digest.
    pub prefix: Vec<u8>,
    /// Bytes after the child digest.
    pub suffix: Vec<u8>,
}

/// Witness that `key` maps to `value` under the committed root.
///
/// `path` is ordered bottom-up: `path[0]` is applied to the leaf digest
/// first, the last element yields the root.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ExistenceProof {
    /// The committed key.
    pub key: Vec<u8>,
    /// The committed value.
    pub value: Vec<u8>,
    /// Leaf operator; absent only in malformed proofs.
    pub leaf: Option<LeafOp>,
    /// Inner operators, leaf-adjacent first.
    pub path: Vec<InnerOp>,
}

/// Witness that `key` is absent, by exhibiting its committed neighbors.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct NonExistenceProof {
    /// The absent key.
    pub key: Vec<u8>,
    /// Closest committed key below `key`, if any.
    pub left: Option<ExistenceProof>,
    /// Closest committed key above `key`, if any.
    pub right: Option<ExistenceProof>,
}

/// The generic proof envelope: exactly one of the four shapes.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentProof {
    /// A single membership witness.
    Exist(ExistenceProof),
    /// A single non-membership witness.
    Nonexist(NonExistenceProof),
    /// Several witnesses sharing one root.
    Batch(BatchProof),
    /// A batch with deduplicated inner operators.
    Compressed(CompressedBatchProof),
}

/// One entry of a [`BatchProof`].
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    /// Membership witness.
    Exist(ExistenceProof),
    /// Non-membership witness.
    Nonexist(NonExistenceProof),
}

/// An ordered collection of witnesses against a single root.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct BatchProof {
    /// The witnesses, in producer order.
    pub entries: Vec<BatchEntry>,
}

/// One entry of a [`CompressedBatchProof`].
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub enum CompressedBatchEntry {
    /// Membership witness with an index-compressed path.
    Exist(CompressedExistenceProof),
    /// Non-membership witness with index-compressed neighbor paths.
    Nonexist(CompressedNonExistenceProof),
}

/// A batch whose inner operators are stored once in `lookup_inners` and
/// referenced by index from each entry's path.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct CompressedBatchProof {
    /// The witnesses, in producer order.
    pub entries: Vec<CompressedBatchEntry>,
    /// Deduplicated inner operators, in first-appearance order.
    pub lookup_inners: Vec<InnerOp>,
}

/// [`ExistenceProof`] with `path` replaced by indices into the batch's
/// lookup table.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct CompressedExistenceProof {
    /// The committed key.
    pub key: Vec<u8>,
    /// The committed value.
    pub value: Vec<u8>,
    /// Leaf operator; absent only in malformed proofs.
    pub leaf: Option<LeafOp>,
    /// Indices into [`CompressedBatchProof::lookup_inners`].
    pub path: Vec<i32>,
}

/// [`NonExistenceProof`] over index-compressed neighbors.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct CompressedNonExistenceProof {
    /// The absent key.
    pub key: Vec<u8>,
    /// Closest committed key below `key`, if any.
    pub left: Option<CompressedExistenceProof>,
    /// Closest committed key above `key`, if any.
    pub right: Option<CompressedExistenceProof>,
}

/// Parameters pinning a tree's hashing and encoding choices.
///
/// Specs are constructed in-process (see [`crate::spec`]), so the leaf and
/// inner sub-specs are not optional here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProofSpec {
    /// Required shape of every leaf operator.
    pub leaf_spec: LeafOp,
    /// Required shape of every inner operator.
    pub inner_spec: InnerSpec,
    /// Minimum path length; `0` means unbounded below.
    pub min_depth: usize,
    /// Maximum path length; `0` means unbounded above.
    pub max_depth: usize,
    /// Compare non-existence neighbor keys by their pre-hashed form rather
    /// than their raw bytes.
    pub prehash_key_before_comparison: bool,
}

/// Structure of the tree's inner nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InnerSpec {
    /// Serialization order of the branches: a permutation of
    /// `0..child_order.len()`.
    pub child_order: Vec<usize>,
    /// Byte width of one serialized child digest.
    pub child_size: usize,
    /// Minimum framing bytes before the first child.
    pub min_prefix_length: usize,
    /// Maximum framing bytes before the first child.
    pub max_prefix_length: usize,
    /// Digest committed for an empty subtree; empty when the tree never
    /// commits empty children.
    pub empty_child: Vec<u8>,
    /// Hash over every inner-node preimage.
    pub hash: HashOp,
}
