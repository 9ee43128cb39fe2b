//! # Registration Validation Flows
//!
//! OPEN and SPV registrations validated against an in-memory chain through
//! `ServiceNodeValidationService`.

#[cfg(test)]
mod tests {
    use crate::fixtures::{open_registration, spv_registration, TestChain, STALE_BLOCKS};
    use servicenode::{
        p2pkh_script, RejectReason, ServiceNode, ServiceNodeParams, ServiceNodeValidationApi,
        ServiceNodeValidationService, Tier,
    };
    use shared_crypto::{Secp256k1KeyPair, Secp256k1PublicKey};
    use shared_types::{BlockAnchor, OutPoint, Transaction, TxOut, COIN};
    use std::sync::Arc;

    // =========================================================================
    // OPEN TIER
    // =========================================================================

    #[test]
    fn test_open_tier_self_signed_is_valid() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.tip());

        assert_eq!(chain.service().validate_service_node(&node, true), Ok(()));
    }

    #[test]
    fn test_open_tier_resigned_by_other_key_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let mut node = open_registration(&key, chain.tip());
        assert!(node.sign(&Secp256k1KeyPair::generate()));

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::SignerMismatch)
        );
    }

    #[test]
    fn test_open_tier_uncompressed_signer_does_not_match_identity() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::from_bytes([0x31; 32])
            .unwrap()
            .with_compression(false);
        let node = open_registration(&key, chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::SignerMismatch)
        );
    }

    // =========================================================================
    // SPV TIER
    // =========================================================================

    #[test]
    fn test_spv_sufficient_stake_is_valid() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let mut collateral = chain.fund(&owner.key_id(), &[3000 * COIN]);
        collateral.extend(chain.fund(&owner.key_id(), &[1500 * COIN, 500 * COIN]));
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert_eq!(chain.service().validate_service_node(&node, true), Ok(()));
    }

    #[test]
    fn test_spv_shared_destination_counts_every_output() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[1000 * COIN; 5]);
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert!(chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_spv_uncompressed_owner_key() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate().with_compression(false);
        let collateral = chain.fund(&owner.key_id(), &[5000 * COIN]);
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert!(chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_spv_duplicate_collateral_fails_despite_double_count() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let op = chain.fund(&owner.key_id(), &[2500 * COIN])[0];
        let node = spv_registration(&snode, &owner, vec![op, op], chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::DuplicateCollateral(op))
        );
    }

    #[test]
    fn test_spv_insufficient_stake_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[2500 * COIN, 2499 * COIN]);
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::InsufficientStake {
                total: 4999 * COIN,
                required: 5000 * COIN,
            })
        );
    }

    #[test]
    fn test_spv_spent_collateral_fails_whole_record() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let rich = chain.fund(&owner.key_id(), &[6000 * COIN])[0];
        let spent = chain.fund(&owner.key_id(), &[100 * COIN])[0];
        chain.spend(spent);
        let node = spv_registration(&snode, &owner, vec![rich, spent], chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::UnresolvableOrSpentCollateral(spent))
        );
    }

    #[test]
    fn test_spv_mempool_spent_collateral_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[5000 * COIN]);
        chain.spend_in_mempool(collateral[0]);
        let node = spv_registration(&snode, &owner, collateral.clone(), chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::UnresolvableOrSpentCollateral(collateral[0]))
        );
    }

    #[test]
    fn test_spv_unconfirmed_collateral_is_accepted() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund_in_mempool(&owner.key_id(), &[5000 * COIN]);
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert!(chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_spv_unknown_collateral_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let unknown = OutPoint::new([0x77; 32], 0);
        let node = spv_registration(&snode, &owner, vec![unknown], chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::UnresolvableOrSpentCollateral(unknown))
        );
    }

    #[test]
    fn test_spv_collateral_owned_by_someone_else_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let thief = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[5000 * COIN]);
        let node = spv_registration(&snode, &thief, collateral.clone(), chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::DestinationMismatch(collateral[0]))
        );
    }

    #[test]
    fn test_spv_output_index_out_of_range() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let funded = chain.fund(&owner.key_id(), &[5000 * COIN])[0];
        let bad = OutPoint::new(funded.txid, 1);
        let node = spv_registration(&snode, &owner, vec![bad], chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::CollateralIndexOutOfRange(bad))
        );
    }

    #[test]
    fn test_spv_non_standard_output_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let mut script = p2pkh_script(&owner.key_id());
        script.push(0x51);
        let txid = chain.view.connect_transaction(Transaction::new(
            1,
            vec![OutPoint::new([0x5A; 32], 0)],
            vec![TxOut::new(5000 * COIN, script)],
        ));
        let op = OutPoint::new(txid, 0);
        let node = spv_registration(&snode, &owner, vec![op], chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::DestinationMismatch(op))
        );
    }

    #[test]
    fn test_spv_too_many_collateral_inputs() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[500 * COIN; 11]);
        let node = spv_registration(&snode, &owner, collateral, chain.tip());

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::EmptyOrExcessiveCollateral { count: 11, max: 10 })
        );

        let relaxed = ServiceNodeValidationService::with_params(
            Arc::clone(&chain.view),
            Arc::clone(&chain.view),
            ServiceNodeParams {
                max_collateral_count: 11,
                ..Default::default()
            },
        );
        assert_eq!(relaxed.validate_service_node(&node, true), Ok(()));
    }

    #[test]
    fn test_spv_empty_collateral_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let node = spv_registration(&snode, &owner, vec![], chain.tip());

        assert!(!chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_spv_compact_tagged_identity_key_fails() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[5000 * COIN]);
        let mut compact = *snode.public_key().as_bytes();
        compact[0] = 0x05;
        let mut node = ServiceNode::new(
            Secp256k1PublicKey::from_raw(compact),
            Tier::Spv,
            owner.key_id(),
            collateral,
            chain.tip(),
            vec![],
        );
        assert!(node.sign(&owner));

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::InvalidKey)
        );
    }

    #[test]
    fn test_unrecognized_tier_fails_closed() {
        let chain = TestChain::with_tip(200);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[50_000 * COIN]);
        let mut node = ServiceNode::new(
            snode.public_key(),
            Tier::Unrecognized(0xff),
            owner.key_id(),
            collateral,
            chain.tip(),
            vec![],
        );
        assert!(node.sign(&owner));

        assert_eq!(
            chain.service().validate_service_node(&node, true),
            Err(RejectReason::UnrecognizedTier(0xff))
        );
    }

    // =========================================================================
    // ANCHOR FRESHNESS
    // =========================================================================

    #[test]
    fn test_stale_anchor_fails_only_when_enforced() {
        let chain = TestChain::with_tip(2000);
        let key = Secp256k1KeyPair::generate();
        let stale_height = chain.tip_height() - STALE_BLOCKS - 1;
        let node = open_registration(&key, chain.anchor_at(stale_height));
        let service = chain.service();

        assert_eq!(
            service.validate_service_node(&node, true),
            Err(RejectReason::StaleOrUnknownAnchor {
                height: stale_height
            })
        );
        assert_eq!(service.validate_service_node(&node, false), Ok(()));
    }

    #[test]
    fn test_anchor_at_window_edge_is_fresh() {
        let chain = TestChain::with_tip(2000);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.anchor_at(chain.tip_height() - STALE_BLOCKS));

        assert!(chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_unknown_anchor_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, BlockAnchor::new(0, [0u8; 32]));

        assert!(!chain.service().is_valid_service_node(&node, false));
    }

    #[test]
    fn test_future_anchor_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let future = BlockAnchor::new(chain.tip_height() + 5, chain.anchor_at(5).hash);
        let node = open_registration(&key, future);

        assert!(!chain.service().is_valid_service_node(&node, true));
    }

    #[test]
    fn test_reorged_anchor_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.tip());
        assert!(chain.service().is_valid_service_node(&node, true));

        chain.view.rewind_to(99);
        chain.view.push_block([0xEE; 32]);
        assert!(!chain.service().is_valid_service_node(&node, false));
    }
}
