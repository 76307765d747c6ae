// Path: crates/commitment/src/proof/verify.rs
//! Stateless proof verification: operator replay, spec conformance, and the
//! ordering/adjacency checks behind non-existence witnesses.

use log::debug;
use tessera_types::error::ProofError;

use super::ops::{apply_inner, apply_leaf, do_hash_or_noop};
use super::{ExistenceProof, InnerOp, InnerSpec, LeafOp, NonExistenceProof, ProofSpec};

/// Replays the leaf operator and then every inner operator bottom-up,
/// returning the recomputed root digest.
pub fn calculate_existence_root(proof: &ExistenceProof) -> Result<Vec<u8>, ProofError> {
    if proof.key.is_empty() {
        return Err(ProofError::MalformedProof(
            "existence proof is missing its key".into(),
        ));
    }
    if proof.value.is_empty() {
        return Err(ProofError::MalformedProof(
            "existence proof is missing its value".into(),
        ));
    }
    let leaf = proof.leaf.as_ref().ok_or_else(|| {
        ProofError::MalformedProof("existence proof is missing its leaf op".into())
    })?;

    let mut acc = apply_leaf(leaf, &proof.key, &proof.value)?;
    for op in &proof.path {
        acc = apply_inner(op, &acc)?;
    }
    Ok(acc)
}

/// Verifies that `proof` witnesses `key -> value` under `root` and conforms
/// to `spec`. Fails hard; the boolean API maps failures to `false`.
pub fn verify_existence(
    proof: &ExistenceProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
    value: &[u8],
) -> Result<(), ProofError> {
    ensure_spec(proof, spec)?;

    let calculated = calculate_existence_root(proof)?;
    if calculated != root {
        debug!(
            "existence root mismatch: computed {} expected {}",
            hex::encode(&calculated),
            hex::encode(root)
        );
        return Err(ProofError::RootMismatch);
    }
    if proof.key != key {
        return Err(ProofError::KeyValueMismatch(
            "proof is for a different key".into(),
        ));
    }
    if proof.value != value {
        return Err(ProofError::KeyValueMismatch(
            "proof is for a different value".into(),
        ));
    }
    Ok(())
}

/// Verifies that `proof` witnesses the absence of `key` under `root`.
///
/// Each present neighbor must itself verify as an existence proof; the
/// neighbors must strictly bracket `key` under the spec's comparison
/// mapping; and the neighbor paths must be adjacent in the tree.
pub fn verify_non_existence(
    proof: &NonExistenceProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
) -> Result<(), ProofError> {
    if let Some(left) = &proof.left {
        verify_existence(left, spec, root, &left.key, &left.value)?;
    }
    if let Some(right) = &proof.right {
        verify_existence(right, spec, root, &right.key, &right.value)?;
    }

    let target = key_for_comparison(spec, key)?;
    if let Some(left) = &proof.left {
        if key_for_comparison(spec, &left.key)? >= target {
            return Err(ProofError::OrderingViolation(
                "left neighbor key is not below the queried key".into(),
            ));
        }
    }
    if let Some(right) = &proof.right {
        if key_for_comparison(spec, &right.key)? <= target {
            return Err(ProofError::OrderingViolation(
                "right neighbor key is not above the queried key".into(),
            ));
        }
    }

    match (&proof.left, &proof.right) {
        (None, None) => Err(ProofError::MalformedProof(
            "non-existence proof has neither neighbor".into(),
        )),
        (None, Some(right)) => ensure_left_most(&spec.inner_spec, &right.path),
        (Some(left), None) => ensure_right_most(&spec.inner_spec, &left.path),
        (Some(left), Some(right)) => {
            ensure_left_neighbor(&spec.inner_spec, &left.path, &right.path)
        }
    }
}

/// The key image used for neighbor ordering: raw bytes, or the leaf spec's
/// key pre-hash when the spec compares hashed keys.
pub(crate) fn key_for_comparison(spec: &ProofSpec, key: &[u8]) -> Result<Vec<u8>, ProofError> {
    if !spec.prehash_key_before_comparison {
        return Ok(key.to_vec());
    }
    do_hash_or_noop(&spec.leaf_spec.prehash_key, key)
}

/// Checks that every operator of `proof` conforms to `spec`.
pub fn ensure_spec(proof: &ExistenceProof, spec: &ProofSpec) -> Result<(), ProofError> {
    let leaf = proof.leaf.as_ref().ok_or_else(|| {
        ProofError::MalformedProof("existence proof is missing its leaf op".into())
    })?;
    ensure_leaf(leaf, &spec.leaf_spec)?;

    if spec.min_depth > 0 && proof.path.len() < spec.min_depth {
        return Err(ProofError::SpecViolation(format!(
            "path depth {} is below the spec minimum {}",
            proof.path.len(),
            spec.min_depth
        )));
    }
    if spec.max_depth > 0 && proof.path.len() > spec.max_depth {
        return Err(ProofError::SpecViolation(format!(
            "path depth {} exceeds the spec maximum {}",
            proof.path.len(),
            spec.max_depth
        )));
    }

    for op in &proof.path {
        ensure_inner(op, &spec.leaf_spec.prefix, &spec.inner_spec)?;
    }
    Ok(())
}

fn ensure_leaf(leaf: &LeafOp, leaf_spec: &LeafOp) -> Result<(), ProofError> {
    if leaf.hash != leaf_spec.hash {
        return Err(ProofError::SpecViolation(format!(
            "leaf hash {:?} differs from spec {:?}",
            leaf.hash, leaf_spec.hash
        )));
    }
    if leaf.prehash_key != leaf_spec.prehash_key {
        return Err(ProofError::SpecViolation(format!(
            "leaf prehash_key {:?} differs from spec {:?}",
            leaf.prehash_key, leaf_spec.prehash_key
        )));
    }
    if leaf.prehash_value != leaf_spec.prehash_value {
        return Err(ProofError::SpecViolation(format!(
            "leaf prehash_value {:?} differs from spec {:?}",
            leaf.prehash_value, leaf_spec.prehash_value
        )));
    }
    if leaf.length != leaf_spec.length {
        return Err(ProofError::SpecViolation(format!(
            "leaf length op {:?} differs from spec {:?}",
            leaf.length, leaf_spec.length
        )));
    }
    if leaf.prefix != leaf_spec.prefix {
        return Err(ProofError::SpecViolation(
            "leaf prefix differs from spec".into(),
        ));
    }
    Ok(())
}

fn ensure_inner(op: &InnerOp, leaf_prefix: &[u8], spec: &InnerSpec) -> Result<(), ProofError> {
    if op.hash != spec.hash {
        return Err(ProofError::SpecViolation(format!(
            "inner hash {:?} differs from spec {:?}",
            op.hash, spec.hash
        )));
    }
    // An inner preimage that opens like a leaf preimage would let a forged
    // leaf masquerade as an inner node.
    if !leaf_prefix.is_empty() && op.prefix.starts_with(leaf_prefix) {
        return Err(ProofError::SpecViolation(
            "inner op prefix collides with the leaf prefix".into(),
        ));
    }
    if op.prefix.len() < spec.min_prefix_length {
        return Err(ProofError::SpecViolation(format!(
            "inner prefix length {} is below the spec minimum {}",
            op.prefix.len(),
            spec.min_prefix_length
        )));
    }
    let branching = spec.child_order.len();
    if branching == 0 {
        return Err(ProofError::SpecViolation(
            "inner spec has an empty child order".into(),
        ));
    }
    // The prefix may carry every earlier sibling, so the hard ceiling is the
    // spec maximum plus all-but-one serialized children.
    let max_prefix = spec.max_prefix_length + (branching - 1) * spec.child_size;
    if op.prefix.len() > max_prefix {
        return Err(ProofError::SpecViolation(format!(
            "inner prefix length {} exceeds the padding ceiling {max_prefix}",
            op.prefix.len()
        )));
    }
    if spec.child_size > 0 && op.suffix.len() % spec.child_size != 0 {
        return Err(ProofError::SpecViolation(format!(
            "inner suffix length {} is not a whole number of {}-byte children",
            op.suffix.len(),
            spec.child_size
        )));
    }
    Ok(())
}

/// Prefix/suffix byte counts that identify one branch position.
struct Padding {
    min_prefix: usize,
    max_prefix: usize,
    suffix: usize,
}

/// Index of branch `b` in the serialization order.
fn get_position(child_order: &[usize], branch: usize) -> Result<usize, ProofError> {
    child_order
        .iter()
        .position(|&c| c == branch)
        .ok_or_else(|| {
            ProofError::SpecViolation(format!("branch {branch} does not appear in the child order"))
        })
}

fn get_padding(spec: &InnerSpec, branch: usize) -> Result<Padding, ProofError> {
    let idx = get_position(&spec.child_order, branch)?;
    let sibling_bytes = idx * spec.child_size;
    Ok(Padding {
        min_prefix: sibling_bytes + spec.min_prefix_length,
        max_prefix: sibling_bytes + spec.max_prefix_length,
        suffix: (spec.child_order.len() - 1 - idx) * spec.child_size,
    })
}

fn has_padding(op: &InnerOp, pad: &Padding) -> bool {
    op.prefix.len() >= pad.min_prefix
        && op.prefix.len() <= pad.max_prefix
        && op.suffix.len() == pad.suffix
}

/// The unique branch whose padding signature matches `op`.
fn order_from_padding(spec: &InnerSpec, op: &InnerOp) -> Result<usize, ProofError> {
    for branch in 0..spec.child_order.len() {
        if has_padding(op, &get_padding(spec, branch)?) {
            return Ok(branch);
        }
    }
    Err(ProofError::OrderingViolation(
        "inner op padding does not match any branch".into(),
    ))
}

/// True when every branch left of `op`'s position carries the spec's
/// empty-child digest inside the prefix bytes.
fn left_branches_are_empty(spec: &InnerSpec, op: &InnerOp) -> bool {
    if spec.empty_child.is_empty() {
        return false;
    }
    let left_branches = match order_from_padding(spec, op) {
        Ok(branch) => branch,
        Err(_) => return false,
    };
    if left_branches == 0 {
        return false;
    }
    let Some(actual_prefix) = op.prefix.len().checked_sub(left_branches * spec.child_size) else {
        return false;
    };
    for i in 0..left_branches {
        let Ok(idx) = get_position(&spec.child_order, i) else {
            return false;
        };
        let from = actual_prefix + idx * spec.child_size;
        match op.prefix.get(from..from + spec.child_size) {
            Some(child) if child == spec.empty_child.as_slice() => {}
            _ => return false,
        }
    }
    true
}

/// True when every branch right of `op`'s position carries the spec's
/// empty-child digest inside the suffix bytes.
fn right_branches_are_empty(spec: &InnerSpec, op: &InnerOp) -> bool {
    if spec.empty_child.is_empty() {
        return false;
    }
    let branch = match order_from_padding(spec, op) {
        Ok(branch) => branch,
        Err(_) => return false,
    };
    let right_branches = spec.child_order.len() - 1 - branch;
    if right_branches == 0 {
        return false;
    }
    if op.suffix.len() != right_branches * spec.child_size {
        return false;
    }
    for i in 0..right_branches {
        let Ok(idx) = get_position(&spec.child_order, branch + 1 + i) else {
            return false;
        };
        // Suffix children are laid out relative to the positions after ours.
        let from = (idx - branch - 1) * spec.child_size;
        match op.suffix.get(from..from + spec.child_size) {
            Some(child) if child == spec.empty_child.as_slice() => {}
            _ => return false,
        }
    }
    true
}

/// Every step of `path` must hug the left edge of its subtree: either the
/// leftmost branch padding, or only empty children to its left.
fn ensure_left_most(spec: &InnerSpec, path: &[InnerOp]) -> Result<(), ProofError> {
    let pad = get_padding(spec, 0)?;
    for op in path {
        if !has_padding(op, &pad) && !left_branches_are_empty(spec, op) {
            return Err(ProofError::OrderingViolation(
                "path step is not leftmost in its subtree".into(),
            ));
        }
    }
    Ok(())
}

/// Mirror of [`ensure_left_most`] for the right edge.
fn ensure_right_most(spec: &InnerSpec, path: &[InnerOp]) -> Result<(), ProofError> {
    let last = spec.child_order.len().checked_sub(1).ok_or_else(|| {
        ProofError::SpecViolation("inner spec has an empty child order".into())
    })?;
    let pad = get_padding(spec, last)?;
    for op in path {
        if !has_padding(op, &pad) && !right_branches_are_empty(spec, op) {
            return Err(ProofError::OrderingViolation(
                "path step is not rightmost in its subtree".into(),
            ));
        }
    }
    Ok(())
}

/// Checks that `left` and `right` are adjacent leaves: identical above their
/// lowest common ancestor, consecutive siblings at it, and hugging the
/// facing edges below it.
fn ensure_left_neighbor(
    spec: &InnerSpec,
    left: &[InnerOp],
    right: &[InnerOp],
) -> Result<(), ProofError> {
    let mut left = left.to_vec();
    let mut right = right.to_vec();

    let mut top_left = left.pop().ok_or_else(|| {
        ProofError::OrderingViolation("left neighbor path is empty".into())
    })?;
    let mut top_right = right.pop().ok_or_else(|| {
        ProofError::OrderingViolation("right neighbor path is empty".into())
    })?;

    // Pop the shared ancestry; the first divergent steps are the two
    // children of the lowest common ancestor.
    while top_left.prefix == top_right.prefix && top_left.suffix == top_right.suffix {
        top_left = left.pop().ok_or_else(|| {
            ProofError::OrderingViolation("neighbor paths never diverge".into())
        })?;
        top_right = right.pop().ok_or_else(|| {
            ProofError::OrderingViolation("neighbor paths never diverge".into())
        })?;
    }

    if !is_left_step(spec, &top_left, &top_right)? {
        return Err(ProofError::OrderingViolation(
            "divergent steps are not consecutive siblings".into(),
        ));
    }

    ensure_right_most(spec, &left)?;
    ensure_left_most(spec, &right)?;
    Ok(())
}

/// True when `right` sits exactly one branch after `left` under the same
/// parent.
fn is_left_step(spec: &InnerSpec, left: &InnerOp, right: &InnerOp) -> Result<bool, ProofError> {
    let left_branch = order_from_padding(spec, left)?;
    let right_branch = order_from_padding(spec, right)?;
    Ok(left_branch + 1 == right_branch)
}
