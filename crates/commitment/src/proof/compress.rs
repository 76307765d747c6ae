// Path: crates/commitment/src/proof/compress.rs
//! Batch compression: deduplicate inner operators across a batch by their
//! canonical encoded bytes and replace each path with lookup indices.

use std::collections::HashMap;

use parity_scale_codec::Encode;
use tessera_types::error::ProofError;

use super::{
    BatchEntry, BatchProof, CommitmentProof, CompressedBatchEntry, CompressedBatchProof,
    CompressedExistenceProof, CompressedNonExistenceProof, ExistenceProof, InnerOp,
    NonExistenceProof,
};

/// Replaces a batch proof with its compressed form. Non-batch proofs pass
/// through unchanged.
pub fn compress(proof: &CommitmentProof) -> CommitmentProof {
    match proof {
        CommitmentProof::Batch(batch) => compress_batch(batch),
        other => other.clone(),
    }
}

/// Inverse of [`compress`]: rebuilds plain paths from the lookup table.
/// Non-compressed proofs pass through unchanged.
pub fn decompress(proof: &CommitmentProof) -> Result<CommitmentProof, ProofError> {
    match proof {
        CommitmentProof::Compressed(compressed) => decompress_batch(compressed),
        other => Ok(other.clone()),
    }
}

/// Registry from an inner op's canonical encoded bytes to its index in the
/// lookup table. Keying on bytes, not identity, is what makes equal ops
/// collapse to one table entry.
struct InnerRegistry {
    lookup: Vec<InnerOp>,
    by_encoding: HashMap<Vec<u8>, i32>,
}

impl InnerRegistry {
    fn new() -> Self {
        Self {
            lookup: Vec::new(),
            by_encoding: HashMap::new(),
        }
    }

    fn index_of(&mut self, op: &InnerOp) -> i32 {
        let Self {
            lookup,
            by_encoding,
        } = self;
        let encoded = op.encode();
        *by_encoding.entry(encoded).or_insert_with(|| {
            lookup.push(op.clone());
            (lookup.len() - 1) as i32
        })
    }
}

fn compress_batch(batch: &BatchProof) -> CommitmentProof {
    let mut registry = InnerRegistry::new();
    let entries = batch
        .entries
        .iter()
        .map(|entry| match entry {
            BatchEntry::Exist(exist) => {
                CompressedBatchEntry::Exist(compress_exist(exist, &mut registry))
            }
            BatchEntry::Nonexist(nonexist) => {
                CompressedBatchEntry::Nonexist(CompressedNonExistenceProof {
                    key: nonexist.key.clone(),
                    left: nonexist
                        .left
                        .as_ref()
                        .map(|exist| compress_exist(exist, &mut registry)),
                    right: nonexist
                        .right
                        .as_ref()
                        .map(|exist| compress_exist(exist, &mut registry)),
                })
            }
        })
        .collect();

    CommitmentProof::Compressed(CompressedBatchProof {
        entries,
        lookup_inners: registry.lookup,
    })
}

fn compress_exist(exist: &ExistenceProof, registry: &mut InnerRegistry) -> CompressedExistenceProof {
    CompressedExistenceProof {
        key: exist.key.clone(),
        value: exist.value.clone(),
        leaf: exist.leaf.clone(),
        path: exist.path.iter().map(|op| registry.index_of(op)).collect(),
    }
}

fn decompress_batch(compressed: &CompressedBatchProof) -> Result<CommitmentProof, ProofError> {
    let entries = compressed
        .entries
        .iter()
        .map(|entry| match entry {
            CompressedBatchEntry::Exist(exist) => Ok(BatchEntry::Exist(decompress_exist(
                exist,
                &compressed.lookup_inners,
            )?)),
            CompressedBatchEntry::Nonexist(nonexist) => {
                Ok(BatchEntry::Nonexist(NonExistenceProof {
                    key: nonexist.key.clone(),
                    left: nonexist
                        .left
                        .as_ref()
                        .map(|exist| decompress_exist(exist, &compressed.lookup_inners))
                        .transpose()?,
                    right: nonexist
                        .right
                        .as_ref()
                        .map(|exist| decompress_exist(exist, &compressed.lookup_inners))
                        .transpose()?,
                }))
            }
        })
        .collect::<Result<Vec<_>, ProofError>>()?;

    Ok(CommitmentProof::Batch(BatchProof { entries }))
}

fn decompress_exist(
    exist: &CompressedExistenceProof,
    lookup: &[InnerOp],
) -> Result<ExistenceProof, ProofError> {
    let path = exist
        .path
        .iter()
        .map(|&idx| {
            usize::try_from(idx)
                .ok()
                .and_then(|i| lookup.get(i))
                .cloned()
                .ok_or_else(|| {
                    ProofError::MalformedProof(format!(
                        "compressed path index {idx} is outside the lookup table"
                    ))
                })
        })
        .collect::<Result<Vec<_>, ProofError>>()?;

    Ok(ExistenceProof {
        key: exist.key.clone(),
        value: exist.value.clone(),
        leaf: exist.leaf.clone(),
        path,
    })
}
