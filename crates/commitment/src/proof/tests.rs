// Path: crates/commitment/src/proof/tests.rs

#[cfg(test)]
mod proof_tests {
    use crate::proof::api::{
        batch_verify_membership, batch_verify_non_membership, verify_membership,
        verify_non_membership,
    };
    use crate::proof::compress::{compress, decompress};
    use crate::proof::ops::{apply_inner, apply_leaf};
    use crate::proof::verify::{
        calculate_existence_root, ensure_spec, verify_existence, verify_non_existence,
    };
    use crate::proof::{
        BatchEntry, BatchProof, CommitmentProof, ExistenceProof, HashOp, InnerOp,
        NonExistenceProof, ProofSpec,
    };
    use crate::spec::{smt_spec, tendermint_spec};
    use tessera_types::error::ProofError;

    /// A hand-built two-level balanced tree in the Tendermint format:
    /// four sorted leaves, two inner nodes, one root.
    struct FourLeafTree {
        root: Vec<u8>,
        keys: Vec<Vec<u8>>,
        values: Vec<Vec<u8>>,
        proofs: Vec<ExistenceProof>,
    }

    fn four_leaf_tree() -> FourLeafTree {
        let spec = tendermint_spec();
        let keys: Vec<Vec<u8>> = [b"ka", b"kc", b"ke", b"kg"]
            .iter()
            .map(|k| k.to_vec())
            .collect();
        let values: Vec<Vec<u8>> = (0..4).map(|i| format!("value-{i}").into_bytes()).collect();

        let leaves: Vec<Vec<u8>> = keys
            .iter()
            .zip(&values)
            .map(|(k, v)| apply_leaf(&spec.leaf_spec, k, v).unwrap())
            .collect();

        let left_step = |sibling: &[u8]| InnerOp {
            hash: HashOp::Sha256,
            prefix: vec![0x01],
            suffix: sibling.to_vec(),
        };
        let right_step = |sibling: &[u8]| InnerOp {
            hash: HashOp::Sha256,
            prefix: [&[0x01][..], sibling].concat(),
            suffix: Vec::new(),
        };

        let n1 = apply_inner(&left_step(&leaves[1]), &leaves[0]).unwrap();
        let n2 = apply_inner(&left_step(&leaves[3]), &leaves[2]).unwrap();
        let root = apply_inner(&left_step(&n2), &n1).unwrap();

        let paths = vec![
            vec![left_step(&leaves[1]), left_step(&n2)],
            vec![right_step(&leaves[0]), left_step(&n2)],
            vec![left_step(&leaves[3]), right_step(&n1)],
            vec![right_step(&leaves[2]), right_step(&n1)],
        ];

        let proofs = keys
            .iter()
            .zip(&values)
            .zip(paths)
            .map(|((key, value), path)| ExistenceProof {
                key: key.clone(),
                value: value.clone(),
                leaf: Some(spec.leaf_spec.clone()),
                path,
            })
            .collect();

        FourLeafTree {
            root,
            keys,
            values,
            proofs,
        }
    }

    fn nonexist(
        key: &[u8],
        left: Option<&ExistenceProof>,
        right: Option<&ExistenceProof>,
    ) -> NonExistenceProof {
        NonExistenceProof {
            key: key.to_vec(),
            left: left.cloned(),
            right: right.cloned(),
        }
    }

    #[test]
    fn every_leaf_of_the_tree_is_provable() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();
        for (i, proof) in tree.proofs.iter().enumerate() {
            assert_eq!(calculate_existence_root(proof).unwrap(), tree.root);
            verify_existence(proof, &spec, &tree.root, &tree.keys[i], &tree.values[i])
                .unwrap_or_else(|e| panic!("leaf {i} failed to verify: {e}"));
            assert!(verify_membership(
                &CommitmentProof::Exist(proof.clone()),
                &spec,
                &tree.root,
                &tree.keys[i],
                &tree.values[i],
            ));
        }
    }

    #[test]
    fn leaf_only_proof_is_a_valid_one_element_tree() {
        let spec = tendermint_spec();
        let proof = ExistenceProof {
            key: b"solo".to_vec(),
            value: b"value".to_vec(),
            leaf: Some(spec.leaf_spec.clone()),
            path: Vec::new(),
        };
        let root = calculate_existence_root(&proof).unwrap();
        assert!(verify_existence(&proof, &spec, &root, b"solo", b"value").is_ok());
    }

    #[test]
    fn wrong_value_or_key_is_rejected() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();
        let proof = CommitmentProof::Exist(tree.proofs[0].clone());

        assert!(!verify_membership(
            &proof,
            &spec,
            &tree.root,
            &tree.keys[0],
            b"forged-value",
        ));
        // No existence proof for an unknown key.
        assert!(!verify_membership(
            &proof,
            &spec,
            &tree.root,
            b"kb",
            &tree.values[0],
        ));

        // The fail-hard layer distinguishes the two outcomes.
        assert!(matches!(
            verify_existence(&tree.proofs[0], &spec, &tree.root, &tree.keys[0], b"forged"),
            Err(ProofError::KeyValueMismatch(_))
        ));
    }

    #[test]
    fn any_single_bit_flip_invalidates_membership() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();
        let proof = &tree.proofs[1];
        let verify =
            |p: &ExistenceProof, root: &[u8]| verify_existence(p, &spec, root, &p.key, &p.value);

        let mut bad_root = tree.root.clone();
        bad_root[7] ^= 0x40;
        assert!(matches!(
            verify(proof, &bad_root),
            Err(ProofError::RootMismatch)
        ));

        let mut bad_prefix = proof.clone();
        bad_prefix.path[0].prefix[0] ^= 0x02;
        assert!(verify(&bad_prefix, &tree.root).is_err());

        let mut bad_suffix = proof.clone();
        bad_suffix.path[1].suffix[3] ^= 0x80;
        assert!(matches!(
            verify(&bad_suffix, &tree.root),
            Err(ProofError::RootMismatch)
        ));

        let mut bad_value = proof.clone();
        bad_value.value[0] ^= 0x01;
        assert!(matches!(
            verify(&bad_value, &tree.root),
            Err(ProofError::RootMismatch)
        ));

        let mut bad_hash = proof.clone();
        bad_hash.path[0].hash = HashOp::Sha512;
        assert!(matches!(
            verify(&bad_hash, &tree.root),
            Err(ProofError::SpecViolation(_))
        ));
    }

    #[test]
    fn truncated_or_padded_paths_are_rejected() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        let mut truncated = tree.proofs[0].clone();
        truncated.path.pop();
        assert!(matches!(
            verify_existence(&truncated, &spec, &tree.root, &truncated.key.clone(), &truncated.value.clone()),
            Err(ProofError::RootMismatch)
        ));

        let mut padded = tree.proofs[0].clone();
        let extra = padded.path[1].clone();
        padded.path.push(extra);
        assert!(verify_existence(&padded, &spec, &tree.root, &padded.key.clone(), &padded.value.clone()).is_err());
    }

    #[test]
    fn depth_bounds_are_enforced_when_set() {
        let tree = four_leaf_tree();
        let proof = &tree.proofs[0]; // depth 2

        let deep_only = ProofSpec {
            min_depth: 3,
            ..tendermint_spec()
        };
        assert!(matches!(
            ensure_spec(proof, &deep_only),
            Err(ProofError::SpecViolation(_))
        ));

        let shallow_only = ProofSpec {
            max_depth: 1,
            ..tendermint_spec()
        };
        assert!(matches!(
            ensure_spec(proof, &shallow_only),
            Err(ProofError::SpecViolation(_))
        ));

        // Zero bounds mean unbounded on that side.
        assert!(ensure_spec(proof, &tendermint_spec()).is_ok());
    }

    #[test]
    fn leaf_op_must_match_the_spec_exactly() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        let mut wrong_prefix = tree.proofs[0].clone();
        wrong_prefix.leaf.as_mut().unwrap().prefix = vec![0x01];
        assert!(matches!(
            ensure_spec(&wrong_prefix, &spec),
            Err(ProofError::SpecViolation(_))
        ));

        let mut wrong_hash = tree.proofs[0].clone();
        wrong_hash.leaf.as_mut().unwrap().prehash_value = HashOp::NoHash;
        assert!(matches!(
            ensure_spec(&wrong_hash, &spec),
            Err(ProofError::SpecViolation(_))
        ));

        let mut missing_leaf = tree.proofs[0].clone();
        missing_leaf.leaf = None;
        assert!(matches!(
            ensure_spec(&missing_leaf, &spec),
            Err(ProofError::MalformedProof(_))
        ));
    }

    #[test]
    fn non_existence_with_both_neighbors() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        // "kd" sits between the committed "kc" and "ke".
        let proof = nonexist(b"kd", Some(&tree.proofs[1]), Some(&tree.proofs[2]));
        assert!(verify_non_existence(&proof, &spec, &tree.root, b"kd").is_ok());
        assert!(verify_non_membership(
            &CommitmentProof::Nonexist(proof),
            &spec,
            &tree.root,
            b"kd",
        ));
    }

    #[test]
    fn non_existence_at_the_edges() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        // Below the first committed key: only a right neighbor, which must
        // hug the left edge of the tree.
        let before_all = nonexist(b"k!", None, Some(&tree.proofs[0]));
        assert!(verify_non_existence(&before_all, &spec, &tree.root, b"k!").is_ok());

        // Beyond the last committed key: only a left neighbor.
        let after_all = nonexist(b"kz", Some(&tree.proofs[3]), None);
        assert!(verify_non_existence(&after_all, &spec, &tree.root, b"kz").is_ok());

        // A non-extremal neighbor cannot stand alone.
        let not_leftmost = nonexist(b"k!", None, Some(&tree.proofs[1]));
        assert!(matches!(
            verify_non_existence(&not_leftmost, &spec, &tree.root, b"k!"),
            Err(ProofError::OrderingViolation(_))
        ));
    }

    #[test]
    fn non_existence_rejects_bad_witnesses() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        // Neither neighbor present.
        assert!(matches!(
            verify_non_existence(&nonexist(b"kd", None, None), &spec, &tree.root, b"kd"),
            Err(ProofError::MalformedProof(_))
        ));

        // Key not inside the bracket.
        let proof = nonexist(b"kg", Some(&tree.proofs[1]), Some(&tree.proofs[2]));
        assert!(matches!(
            verify_non_existence(&proof, &spec, &tree.root, b"kg"),
            Err(ProofError::OrderingViolation(_))
        ));

        // A committed key is never absent: ordering is strict.
        let on_boundary = nonexist(b"kc", Some(&tree.proofs[1]), Some(&tree.proofs[2]));
        assert!(verify_non_existence(&on_boundary, &spec, &tree.root, b"kc").is_err());

        // Ordered but non-adjacent neighbors leave a committed key between
        // them; the facing-edge check catches it.
        let gapped = nonexist(b"kb", Some(&tree.proofs[0]), Some(&tree.proofs[2]));
        assert!(matches!(
            verify_non_existence(&gapped, &spec, &tree.root, b"kb"),
            Err(ProofError::OrderingViolation(_))
        ));
    }

    #[test]
    fn smt_specs_compare_prehashed_keys() {
        let spec = smt_spec();

        // Leaf digests live at hashed-key positions: sha256("b") < sha256("a"),
        // so "b" is the left leaf even though it is the larger raw key.
        let leaf_b = apply_leaf(&spec.leaf_spec, b"b", b"value-b").unwrap();
        let leaf_a = apply_leaf(&spec.leaf_spec, b"a", b"value-a").unwrap();
        let root = apply_inner(
            &InnerOp {
                hash: HashOp::Sha256,
                prefix: vec![0x01],
                suffix: leaf_a.clone(),
            },
            &leaf_b,
        )
        .unwrap();

        let proof_b = ExistenceProof {
            key: b"b".to_vec(),
            value: b"value-b".to_vec(),
            leaf: Some(spec.leaf_spec.clone()),
            path: vec![InnerOp {
                hash: HashOp::Sha256,
                prefix: vec![0x01],
                suffix: leaf_a.clone(),
            }],
        };
        let proof_a = ExistenceProof {
            key: b"a".to_vec(),
            value: b"value-a".to_vec(),
            leaf: Some(spec.leaf_spec.clone()),
            path: vec![InnerOp {
                hash: HashOp::Sha256,
                prefix: [&[0x01][..], &leaf_b].concat(),
                suffix: Vec::new(),
            }],
        };

        // sha256("e") falls between sha256("b") and sha256("a").
        let absent = nonexist(b"e", Some(&proof_b), Some(&proof_a));
        assert!(verify_non_existence(&absent, &spec, &root, b"e").is_ok());

        // sha256("f") sorts below both neighbors, so the same witness does
        // not cover it.
        let outside = nonexist(b"f", Some(&proof_b), Some(&proof_a));
        assert!(matches!(
            verify_non_existence(&outside, &spec, &root, b"f"),
            Err(ProofError::OrderingViolation(_))
        ));
    }

    #[test]
    fn batch_proofs_verify_per_entry() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        let mut entries: Vec<BatchEntry> = tree
            .proofs
            .iter()
            .map(|p| BatchEntry::Exist(p.clone()))
            .collect();
        entries.push(BatchEntry::Nonexist(nonexist(
            b"kd",
            Some(&tree.proofs[1]),
            Some(&tree.proofs[2]),
        )));
        let batch = CommitmentProof::Batch(BatchProof { entries });

        let items: Vec<(&[u8], &[u8])> = tree
            .keys
            .iter()
            .zip(&tree.values)
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        assert!(batch_verify_membership(&batch, &spec, &tree.root, &items));
        assert!(batch_verify_non_membership(
            &batch,
            &spec,
            &tree.root,
            &[b"kd".as_slice()],
        ));

        // One bad item fails the whole batch.
        let mut bad_items = items.clone();
        bad_items[2].1 = b"forged";
        assert!(!batch_verify_membership(
            &batch,
            &spec,
            &tree.root,
            &bad_items,
        ));
        assert!(!batch_verify_non_membership(
            &batch,
            &spec,
            &tree.root,
            &[b"kd".as_slice(), b"ka".as_slice()],
        ));
    }

    #[test]
    fn compressed_batches_verify_identically() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();

        let batch = CommitmentProof::Batch(BatchProof {
            entries: tree
                .proofs
                .iter()
                .map(|p| BatchEntry::Exist(p.clone()))
                .collect(),
        });
        let compressed = compress(&batch);
        assert!(matches!(compressed, CommitmentProof::Compressed(_)));

        for (i, key) in tree.keys.iter().enumerate() {
            let plain = verify_membership(&batch, &spec, &tree.root, key, &tree.values[i]);
            let packed = verify_membership(&compressed, &spec, &tree.root, key, &tree.values[i]);
            assert_eq!(plain, packed);
            assert!(plain);
        }
        assert_eq!(decompress(&compressed).unwrap(), batch);

        // The four proofs share their upper steps: fewer lookup entries
        // than total step occurrences.
        if let CommitmentProof::Compressed(inner) = &compressed {
            let occurrences: usize = tree.proofs.iter().map(|p| p.path.len()).sum();
            assert!(inner.lookup_inners.len() < occurrences);
        }
    }

    #[test]
    fn batch_entries_are_located_by_key() {
        let spec = tendermint_spec();
        let tree = four_leaf_tree();
        let batch = CommitmentProof::Batch(BatchProof {
            entries: vec![
                BatchEntry::Exist(tree.proofs[2].clone()),
                BatchEntry::Nonexist(nonexist(b"kd", Some(&tree.proofs[1]), Some(&tree.proofs[2]))),
            ],
        });

        assert!(verify_membership(
            &batch,
            &spec,
            &tree.root,
            &tree.keys[2],
            &tree.values[2],
        ));
        // The non-existence bracket covers any key in ("kc", "ke"), not
        // just the one it was produced for.
        assert!(verify_non_membership(&batch, &spec, &tree.root, b"kca"));
        // Keys outside every bracket find no applicable entry.
        assert!(!verify_non_membership(&batch, &spec, &tree.root, b"kz"));
    }
}
