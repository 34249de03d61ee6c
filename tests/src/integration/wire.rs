//! Blocks and snapshots crossing the wire boundary.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Script, ScriptVm, TestChain};
    use qc_04_state_management::Snapshot;
    use qc_08_consensus::{BlockValidator, ValidationOptions};
    use qc_17_block_production::{BlockBuilder, BuilderConfig};
    use shared_types::{CodecError, SignedBlock, UnsignedBlockHeader, WireCodec};

    fn two_block_chain() -> TestChain {
        let mut chain = TestChain::genesis(3, 2, 1_000).unwrap();
        chain
            .extend(
                vec![
                    Script::cost(4).create([0xC0; 32]).into_tx(4),
                    Script::cost(2).nonce([0x0E; 32], 60_000).into_tx(2),
                ],
                2_000,
                &[0, 2],
            )
            .unwrap();
        chain
    }

    #[test]
    fn test_signed_block_validates_after_decoding() {
        let chain = two_block_chain();
        let bytes = chain.blocks[1].to_bytes().unwrap();
        let decoded = SignedBlock::from_bytes(&bytes).unwrap();

        let parent_bytes = chain.blocks[0].header().to_bytes().unwrap();
        let parent = UnsignedBlockHeader::from_bytes(&parent_bytes).unwrap();

        let validator = BlockValidator::with_defaults();
        assert!(validator
            .validate_block(&decoded, Some(&parent), ValidationOptions::default())
            .is_ok());
        assert_eq!(decoded.block_id(), chain.blocks[1].block_id());
        assert_eq!(decoded.transaction(1), chain.blocks[1].transaction(1));
    }

    #[test]
    fn test_snapshot_blob_resumes_building() {
        let chain = two_block_chain();
        let blob = chain.snapshot.to_bytes().unwrap();
        let restored = Snapshot::from_bytes(&blob).unwrap();
        assert_eq!(restored, chain.snapshot);

        let config = BuilderConfig::default();
        let next = |snapshot: &Snapshot| {
            let mut builder = BlockBuilder::start(snapshot, 3_000, &config, &ScriptVm).unwrap();
            builder
                .add_tx(Script::cost(1).consume([0xC0; 32]).into_tx(1))
                .unwrap();
            builder.build().unwrap()
        };
        assert_eq!(next(&chain.snapshot), next(&restored));
    }

    #[test]
    fn test_corrupt_blob_rejected() {
        let chain = two_block_chain();
        let mut bytes = chain.blocks[1].to_bytes().unwrap();
        bytes.truncate(bytes.len() / 2);
        assert!(matches!(
            SignedBlock::from_bytes(&bytes),
            Err(CodecError::Deserialize(_))
        ));
        assert!(Snapshot::from_bytes(&[0xFF; 3]).is_err());
    }
}
