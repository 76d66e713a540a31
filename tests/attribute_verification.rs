use witness_core::types::attributes::{Conflicts, HighPriority, NotValidBefore};
use witness_core::{
    attribute_network_fee, verify_attributes, ChainViews, Clock, CommitteeView, Decodable,
    Encodable, Hash160, Hash256, LedgerView, OracleState, ProtocolSettings, Signer, Transaction,
    TransactionAttribute, Witness,
};

#[derive(Default)]
struct TestChain {
    on_chain: Vec<Hash256>,
    committee: Vec<Hash160>,
    pending_requests: Vec<u64>,
    height: u32,
}

impl LedgerView for TestChain {
    fn contains_transaction(&self, hash: &Hash256) -> bool {
        self.on_chain.contains(hash)
    }
}

impl CommitteeView for TestChain {
    fn is_committee_member(&self, account: &Hash160) -> bool {
        self.committee.contains(account)
    }
}

impl OracleState for TestChain {
    fn has_pending_request(&self, id: u64) -> bool {
        self.pending_requests.contains(&id)
    }
}

impl Clock for TestChain {
    fn current_height(&self) -> u32 {
        self.height
    }
}

impl TestChain {
    fn views(&self) -> ChainViews<'_> {
        ChainViews {
            ledger: self,
            committee: self,
            oracle: self,
            clock: self,
        }
    }
}

fn two_signer_transaction(attributes: Vec<TransactionAttribute>) -> Transaction {
    let first_verification = vec![0x51];
    let second_verification = vec![0x52];
    Transaction {
        version: 0,
        nonce: 1,
        system_fee: 0,
        network_fee: 0,
        valid_until_block: 500,
        signers: vec![
            Signer::called_by_entry(Hash160::from_script(&first_verification)),
            Signer::called_by_entry(Hash160::from_script(&second_verification)),
        ],
        attributes,
        script: vec![0x40],
        witnesses: vec![
            Witness::new(Vec::new(), first_verification),
            Witness::new(Vec::new(), second_verification),
        ],
    }
}

#[test]
fn conflicts_scenario_fee_and_validity() {
    let settings = ProtocolSettings::default();
    let attributes: Vec<TransactionAttribute> = (0u8..3)
        .map(|seed| {
            TransactionAttribute::Conflicts(Conflicts {
                hash: Hash256::double_sha256(&[seed]),
            })
        })
        .collect();
    let tx = two_signer_transaction(attributes);
    tx.validate().expect("well formed");

    let chain = TestChain::default();
    assert!(verify_attributes(&tx, &chain.views(), &settings).is_valid());
    // Three records, two signers.
    assert_eq!(
        attribute_network_fee(&tx, &chain.views(), &settings),
        3 * 2 * settings.base_attribute_fee
    );

    let conflicted = TestChain {
        on_chain: vec![Hash256::double_sha256(&[1u8])],
        ..TestChain::default()
    };
    assert!(!verify_attributes(&tx, &conflicted.views(), &settings).is_valid());
}

#[test]
fn fee_payer_binding_travels_with_the_first_witness() {
    let tx = two_signer_transaction(Vec::new());
    assert_eq!(tx.sender(), tx.signers[0].account);
    assert_eq!(tx.witnesses[0].script_hash(), tx.sender());

    let mut broken = tx.clone();
    broken.witnesses.swap(0, 1);
    assert!(broken.validate().is_err());
}

#[test]
fn transaction_round_trip_carries_attributes() {
    let tx = two_signer_transaction(vec![TransactionAttribute::NotValidBefore(
        NotValidBefore { height: 77 },
    )]);
    let decoded = Transaction::from_bytes(&tx.to_bytes()).expect("round trip");
    assert_eq!(decoded, tx);
    assert_eq!(decoded.hash(), tx.hash());
}

#[test]
fn duplicate_high_priority_fails_decode() {
    let mut tx = two_signer_transaction(vec![
        TransactionAttribute::HighPriority(HighPriority {}),
    ]);
    tx.attributes
        .push(TransactionAttribute::HighPriority(HighPriority {}));
    assert!(Transaction::from_bytes(&tx.to_bytes()).is_err());
}

#[test]
fn attribute_checks_run_in_transaction_order() {
    let settings = ProtocolSettings::default();
    let confirmed = Hash256::double_sha256(b"confirmed");
    let tx = two_signer_transaction(vec![
        TransactionAttribute::NotValidBefore(NotValidBefore { height: 10 }),
        TransactionAttribute::Conflicts(Conflicts { hash: confirmed }),
    ]);

    // Both attributes would fail; the earlier one's reason wins.
    let chain = TestChain {
        on_chain: vec![confirmed],
        height: 5,
        ..TestChain::default()
    };
    match verify_attributes(&tx, &chain.views(), &settings) {
        witness_core::VerificationResult::Invalid(reason) => {
            assert!(reason.contains("NotValidBefore"));
        }
        other => panic!("expected invalid result, got {other:?}"),
    }
}
