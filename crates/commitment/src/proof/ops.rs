// Path: crates/commitment/src/proof/ops.rs
//! Operator evaluation: replaying leaf and inner hashing steps.

use sha2::{Digest, Sha256};
use tessera_types::error::ProofError;

use super::{HashOp, InnerOp, LeafOp, LengthOp};

/// The canonical hash function used by every built-in spec.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the leaf digest for `(key, value)` under `op`.
///
/// Preimage layout: `prefix || length(prehash(key)) || length(prehash(value))`.
pub fn apply_leaf(op: &LeafOp, key: &[u8], value: &[u8]) -> Result<Vec<u8>, ProofError> {
    if key.is_empty() {
        return Err(ProofError::MalformedProof(
            "leaf op applied to an empty key".into(),
        ));
    }
    if value.is_empty() {
        return Err(ProofError::MalformedProof(
            "leaf op applied to an empty value".into(),
        ));
    }

    let pkey = do_length_op(&op.length, do_hash_or_noop(&op.prehash_key, key)?)?;
    let pvalue = do_length_op(&op.length, do_hash_or_noop(&op.prehash_value, value)?)?;

    let mut data = Vec::with_capacity(op.prefix.len() + pkey.len() + pvalue.len());
    data.extend_from_slice(&op.prefix);
    data.extend_from_slice(&pkey);
    data.extend_from_slice(&pvalue);
    do_hash(&op.hash, &data)
}

/// Computes one inner step: hash of `prefix || child || suffix`.
pub fn apply_inner(op: &InnerOp, child: &[u8]) -> Result<Vec<u8>, ProofError> {
    if child.is_empty() {
        return Err(ProofError::MalformedProof(
            "inner op applied to an empty child".into(),
        ));
    }

    let mut data = Vec::with_capacity(op.prefix.len() + child.len() + op.suffix.len());
    data.extend_from_slice(&op.prefix);
    data.extend_from_slice(child);
    data.extend_from_slice(&op.suffix);
    do_hash(&op.hash, &data)
}

/// Applies an active hash. Only SHA-256 is computed; every other operator,
/// including `NoHash` in an active position, is rejected.
pub(crate) fn do_hash(op: &HashOp, data: &[u8]) -> Result<Vec<u8>, ProofError> {
    match op {
        HashOp::Sha256 => Ok(sha256(data).to_vec()),
        other => Err(ProofError::UnsupportedOperator(format!(
            "hash op {other:?} is not supported"
        ))),
    }
}

/// Like [`do_hash`], but `NoHash` passes the data through unchanged.
pub(crate) fn do_hash_or_noop(op: &HashOp, data: &[u8]) -> Result<Vec<u8>, ProofError> {
    match op {
        HashOp::NoHash => Ok(data.to_vec()),
        other => do_hash(other, data),
    }
}

/// Applies a length operator to already pre-hashed data.
pub(crate) fn do_length_op(op: &LengthOp, data: Vec<u8>) -> Result<Vec<u8>, ProofError> {
    match op {
        LengthOp::NoPrefix => Ok(data),
        LengthOp::VarProto => {
            let mut out = Vec::with_capacity(prost::length_delimiter_len(data.len()) + data.len());
            prost::encode_length_delimiter(data.len(), &mut out).map_err(|e| {
                ProofError::UnsupportedOperator(format!("varint length prefix failed: {e}"))
            })?;
            out.extend_from_slice(&data);
            Ok(out)
        }
        LengthOp::Fixed32Little => {
            let len = u32::try_from(data.len()).map_err(|_| {
                ProofError::UnsupportedOperator("data length exceeds a 32-bit prefix".into())
            })?;
            let mut out = Vec::with_capacity(4 + data.len());
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&data);
            Ok(out)
        }
        LengthOp::Require32Bytes => require_len(data, 32),
        LengthOp::Require64Bytes => require_len(data, 64),
        other => Err(ProofError::UnsupportedOperator(format!(
            "length op {other:?} is not supported"
        ))),
    }
}

fn require_len(data: Vec<u8>, want: usize) -> Result<Vec<u8>, ProofError> {
    if data.len() != want {
        return Err(ProofError::UnsupportedOperator(format!(
            "expected exactly {want} bytes, got {}",
            data.len()
        )));
    }
    Ok(data)
}
