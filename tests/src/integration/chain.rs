//! Multi-block scenarios: state carried across blocks, replay protection,
//! aborted sessions, tampering and predicate rotation.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_tracing, key, Script, ScriptVm, TestChain};
    use qc_08_consensus::{
        validate_against_previous, validate_signatures, BlockValidationError, BlockValidator,
        ValidationOptions,
    };
    use qc_17_block_production::{
        sign_block, sign_with_keys, BlockBuilder, BuildError, BuilderConfig, SignError,
    };
    use shared_crypto::{merkle_root, Ed25519Signature};
    use shared_types::SignatureSlot;

    const CONTRACT_A: [u8; 32] = [0xA1; 32];
    const CONTRACT_B: [u8; 32] = [0xB2; 32];
    const NONCE_1: [u8; 32] = [0x01; 32];

    // =============================================================================
    // STATE ACROSS BLOCKS
    // =============================================================================

    #[test]
    fn test_three_block_chain() {
        init_tracing();
        let mut chain = TestChain::genesis(3, 2, 1_000).unwrap();

        let b2 = chain
            .extend(
                vec![
                    Script::cost(10).create(CONTRACT_A).into_tx(10),
                    Script::cost(5).nonce(NONCE_1, 50_000).into_tx(20),
                ],
                2_000,
                &[0, 1],
            )
            .unwrap();
        assert_eq!(b2.header().height, 2);
        assert_eq!(b2.header().refs_count, 2);
        assert_eq!(b2.header().runlimit, 15);
        assert_eq!(
            b2.header().transactions_root,
            merkle_root(&b2.block.transaction_ids())
        );

        chain
            .extend(
                vec![Script::cost(1)
                    .consume(CONTRACT_A)
                    .create(CONTRACT_B)
                    .into_tx(1)],
                3_000,
                &[1, 2],
            )
            .unwrap();

        assert_eq!(chain.snapshot.height(), 3);
        assert!(!chain.snapshot.contains_contract(&CONTRACT_A));
        assert!(chain.snapshot.contains_contract(&CONTRACT_B));
        assert_eq!(chain.snapshot.nonce_expiry(&NONCE_1), Some(50_000));
        assert_eq!(chain.snapshot.last_block_id(), Some(chain.tip().hash()));
    }

    #[test]
    fn test_chain_linkage_breaks_when_predecessor_changes() {
        let mut chain = TestChain::genesis(1, 1, 1_000).unwrap();
        chain.extend(vec![], 2_000, &[0]).unwrap();

        let mut h1 = chain.blocks[0].header().clone();
        let h2 = chain.blocks[1].header().clone();
        assert!(validate_against_previous(&h2, &h1).is_ok());

        h1.height += 1;
        assert!(validate_against_previous(&h2, &h1).is_err());
    }

    // =============================================================================
    // REPLAY PROTECTION
    // =============================================================================

    #[test]
    fn test_nonce_blocks_replay_until_expiry() {
        let mut chain = TestChain::genesis(1, 1, 1_000).unwrap();
        let tx = Script::cost(1).nonce(NONCE_1, 10_000).into_tx(1);
        chain.extend(vec![tx.clone()], 2_000, &[0]).unwrap();

        let replay = chain.extend(vec![tx.clone()], 3_000, &[0]);
        assert!(matches!(
            replay,
            Err(crate::fixtures::ChainError::Build(BuildError::DuplicateNonce { id })) if id == NONCE_1
        ));

        // Pruned at start once the expiry has passed; the old tx is stale.
        assert!(matches!(
            chain.extend(vec![tx], 20_000, &[0]),
            Err(crate::fixtures::ChainError::Build(BuildError::NonceExpired { .. }))
        ));
        let fresh = Script::cost(1).nonce(NONCE_1, 30_000).into_tx(1);
        chain.extend(vec![fresh], 20_000, &[0]).unwrap();
        assert_eq!(chain.snapshot.nonce_expiry(&NONCE_1), Some(30_000));
    }

    // =============================================================================
    // ABORTED SESSIONS
    // =============================================================================

    #[test]
    fn test_aborted_session_leaves_snapshot_usable() {
        let mut chain = TestChain::genesis(1, 1, 1_000).unwrap();
        let before = chain.snapshot.clone();

        let config = BuilderConfig::default();
        let mut builder = BlockBuilder::start(&chain.snapshot, 2_000, &config, &ScriptVm).unwrap();
        builder
            .add_tx(Script::cost(1).create(CONTRACT_A).into_tx(1))
            .unwrap();
        assert!(matches!(
            builder.add_tx(Script::failing("bad opcode").into_tx(1)),
            Err(BuildError::VmError { index: 1, .. })
        ));
        assert_eq!(
            builder.add_tx(Script::cost(1).into_tx(1)),
            Err(BuildError::SessionAborted)
        );
        drop(builder);

        assert_eq!(chain.snapshot, before);
        chain
            .extend(vec![Script::cost(1).create(CONTRACT_A).into_tx(1)], 2_000, &[0])
            .unwrap();
    }

    #[test]
    fn test_block_runlimit_ceiling() {
        let mut chain = TestChain::genesis(1, 1, 1_000).unwrap();
        let config = BuilderConfig {
            max_block_runlimit: 10,
            ..Default::default()
        };
        let result = chain.extend_with(
            vec![Script::cost(6).into_tx(6), Script::cost(6).into_tx(6)],
            2_000,
            &[0],
            config,
            None,
        );
        assert!(matches!(
            result,
            Err(crate::fixtures::ChainError::Build(BuildError::RuntimeExceeded {
                used: 6,
                cost: 6,
                limit: 10
            }))
        ));
        assert_eq!(chain.blocks.len(), 1);
    }

    // =============================================================================
    // TAMPERING
    // =============================================================================

    #[test]
    fn test_tampered_block_rejected() {
        let mut chain = TestChain::genesis(3, 2, 1_000).unwrap();
        chain.extend(vec![], 2_000, &[0, 1, 2]).unwrap();

        let parent = chain.blocks[0].header().clone();
        let mut tampered = chain.blocks[1].clone();
        tampered.block.header.timestamp_ms += 1;

        let validator = BlockValidator::with_defaults();
        assert_eq!(
            validator.validate_block(&tampered, Some(&parent), ValidationOptions::default()),
            Err(BlockValidationError::InvalidSignature { index: 0 })
        );
    }

    #[test]
    fn test_forged_slot_is_not_an_abstention() {
        let mut chain = TestChain::genesis(3, 1, 1_000).unwrap();
        chain.extend(vec![], 2_000, &[0]).unwrap();

        let predicate = chain.blocks[0].header().next_predicate.clone();
        let mut forged = chain.blocks[1].clone();
        forged.signatures[2] = SignatureSlot::Present(Ed25519Signature::from_bytes([7; 64]));
        assert_eq!(
            validate_signatures(&forged, &predicate),
            Err(BlockValidationError::InvalidSignature { index: 2 })
        );
    }

    // =============================================================================
    // PREDICATE ROTATION
    // =============================================================================

    #[test]
    fn test_predicate_rotation() {
        let mut chain = TestChain::genesis(3, 2, 1_000).unwrap();
        chain
            .extend_with(
                vec![],
                2_000,
                &[0, 1],
                BuilderConfig::default(),
                Some((vec![5, 6], 2)),
            )
            .unwrap();
        assert_eq!(chain.next_predicate().pubkeys, vec![key(5).public_key(), key(6).public_key()]);

        // Old signers no longer authorize.
        let config = BuilderConfig::default();
        let builder = BlockBuilder::start(&chain.snapshot, 3_000, &config, &ScriptVm).unwrap();
        let (block, _) = builder.build().unwrap();
        let stale_keys = vec![Some(key(0)), Some(key(1))];
        assert_eq!(
            sign_with_keys(block.clone(), chain.next_predicate(), &stale_keys).unwrap_err(),
            SignError::KeyMismatch { index: 0 }
        );
        let forged = sign_block(block, chain.next_predicate(), |index, id| {
            Ok(Some(key(index as u8).sign(id)))
        })
        .unwrap();
        assert!(matches!(
            validate_signatures(&forged, chain.next_predicate()),
            Err(BlockValidationError::InvalidSignature { index: 0 })
        ));

        // New signers do.
        chain.extend(vec![], 3_000, &[0, 1]).unwrap();
        assert_eq!(chain.snapshot.height(), 3);
    }

    #[test]
    fn test_builder_determinism_across_sessions() {
        let chain = TestChain::genesis(2, 1, 1_000).unwrap();
        let txs = vec![
            Script::cost(2).create(CONTRACT_A).into_tx(2),
            Script::cost(3).nonce(NONCE_1, 9_000).into_tx(3),
        ];
        let config = BuilderConfig::default();

        let run = || {
            let mut builder =
                BlockBuilder::start(&chain.snapshot, 4_000, &config, &ScriptVm).unwrap();
            for tx in txs.clone() {
                builder.add_tx(tx).unwrap();
            }
            builder.build().unwrap()
        };
        let (a, snap_a) = run();
        let (b, snap_b) = run();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(snap_a, snap_b);
    }
}
