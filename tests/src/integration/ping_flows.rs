//! # Ping Validation Flows
//!
//! Pings travel over the wire, are decoded with reconciliation, and are
//! validated together with their embedded registration.

#[cfg(test)]
mod tests {
    use crate::fixtures::{open_registration, signed_ping, spv_registration, TestChain, STALE_BLOCKS};
    use servicenode::{
        ConfigError, RejectReason, ServiceNodePing, ServiceNodeValidationApi,
    };
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{WireEncode, COIN};

    fn relay(ping: &ServiceNodePing) -> ServiceNodePing {
        ServiceNodePing::from_wire(&ping.to_wire_bytes()).unwrap()
    }

    #[test]
    fn test_fresh_ping_over_old_registration() {
        let chain = TestChain::with_tip(5000);
        let key = Secp256k1KeyPair::generate();
        // Registration anchor is far outside the staleness window.
        let node = open_registration(&key, chain.anchor_at(100));
        let ping = relay(&signed_ping(&key, node.clone(), chain.tip(), "1,BTC,LTC"));
        let service = chain.service();

        assert_eq!(service.validate_ping(&ping), Ok(()));
        assert!(!service.is_valid_service_node(&node, true));

        let embedded = ping.service_node();
        assert_eq!(embedded.last_seen_anchor(), &chain.tip());
        assert_eq!(embedded.service_list(), ["BTC", "LTC"]);
        // Reconciled snapshot is fresh on its own.
        assert!(service.is_valid_service_node(embedded, true));
    }

    #[test]
    fn test_stale_ping_fails() {
        let chain = TestChain::with_tip(3000);
        let key = Secp256k1KeyPair::generate();
        let old = chain.anchor_at(chain.tip_height() - STALE_BLOCKS - 1);
        let node = open_registration(&key, old);
        let ping = relay(&signed_ping(&key, node, old, "1"));

        assert_eq!(
            chain.service().validate_ping(&ping),
            Err(RejectReason::StaleOrUnknownAnchor { height: old.height })
        );
    }

    #[test]
    fn test_ping_identity_must_match_embedded_record() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let impostor = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.tip());
        // Signature is valid for the impostor's key; identity binding still fails.
        let ping = relay(&signed_ping(&impostor, node, chain.tip(), "1"));

        assert_eq!(
            chain.service().validate_ping(&ping),
            Err(RejectReason::IdentityMismatch)
        );
    }

    #[test]
    fn test_ping_signed_by_other_key_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.tip());
        let mut ping = ServiceNodePing::new(key.public_key(), chain.tip(), "1", node);
        assert!(ping.sign(&Secp256k1KeyPair::generate()));

        assert_eq!(
            chain.service().validate_ping(&relay(&ping)),
            Err(RejectReason::SignerMismatch)
        );
    }

    #[test]
    fn test_malformed_config_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let service = chain.service();

        let cases = [
            ("xbridge,BTC", ConfigError::InvalidProtocolVersion("xbridge".into())),
            ("-1,BTC", ConfigError::InvalidProtocolVersion("-1".into())),
            ("0", ConfigError::NonPositiveProtocolVersion),
            ("", ConfigError::Empty),
        ];
        for (config, expected) in cases {
            let node = open_registration(&key, chain.tip());
            let ping = relay(&signed_ping(&key, node, chain.tip(), config));
            assert_eq!(
                service.validate_ping(&ping),
                Err(RejectReason::MalformedConfig(expected)),
                "config {config:?}"
            );
            // Assigning the same config to a record is tolerated.
            assert_eq!(ping.service_node().protocol_version(), 0);
        }
    }

    #[test]
    fn test_leading_delimiter_config_fails() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let service = chain.service();

        for config in [",1", " 1,BTC", ",,7"] {
            let node = open_registration(&key, chain.tip());
            let ping = relay(&signed_ping(&key, node, chain.tip(), config));
            assert_eq!(
                service.validate_ping(&ping),
                Err(RejectReason::MalformedConfig(
                    ConfigError::InvalidProtocolVersion(String::new())
                )),
                "config {config:?}"
            );
        }
    }

    #[test]
    fn test_ping_fails_when_collateral_is_spent() {
        let chain = TestChain::with_tip(300);
        let snode = Secp256k1KeyPair::generate();
        let owner = Secp256k1KeyPair::generate();
        let collateral = chain.fund(&owner.key_id(), &[5000 * COIN]);
        let node = spv_registration(&snode, &owner, collateral.clone(), chain.anchor_at(250));
        let ping = relay(&signed_ping(&snode, node, chain.tip(), "2,SYS"));
        let service = chain.service();

        assert_eq!(service.validate_ping(&ping), Ok(()));

        chain.spend(collateral[0]);
        assert_eq!(
            service.validate_ping(&ping),
            Err(RejectReason::UnresolvableOrSpentCollateral(collateral[0]))
        );
    }

    #[test]
    fn test_tampered_config_breaks_signature() {
        let chain = TestChain::with_tip(100);
        let key = Secp256k1KeyPair::generate();
        let node = open_registration(&key, chain.tip());
        let ping = signed_ping(&key, node.clone(), chain.tip(), "1,BTC");
        let forged = ServiceNodePing::new(key.public_key(), chain.tip(), "1,BTC,ETH", node)
            .with_signature(ping.signature().to_vec());

        assert!(!chain.service().is_valid_ping(&relay(&forged)));
    }

    #[test]
    fn test_batch_validation() {
        let chain = TestChain::with_tip(100);
        let service = chain.service();
        let pings: Vec<_> = (0..8)
            .map(|i| {
                let key = Secp256k1KeyPair::generate();
                let node = open_registration(&key, chain.tip());
                let config = if i == 3 { "none" } else { "1,BTC" };
                relay(&signed_ping(&key, node, chain.tip(), config))
            })
            .collect();

        let batch = service.batch_validate_pings(&pings);
        assert_eq!(batch.valid_count, 7);
        assert_eq!(batch.invalid_count, 1);
        assert!(matches!(
            batch.results[3],
            Err(RejectReason::MalformedConfig(_))
        ));
    }
}
