use crate::mock::{Event, MockBackend, MockDeployment, REGISTRY, Script, naming_error, settings};
use alloy_primitives::B256;
use ens_admin::{NamingError, RegistryCall, Step, tld::assign_tld_owner};
use ens_admin_common::labelhash;
use std::time::Duration;

#[tokio::test]
async fn assigns_tld_to_domain_owner() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::new();
    let mut out = Vec::new();

    let report =
        assign_tld_owner(&deployment, &backend, &settings(), &mut out, "eth").await.unwrap();

    let tx_hash = backend.tx_hash(0);
    similar_asserts::assert_eq!(
        backend.events(),
        vec![
            Event::FeeQuery,
            Event::Submit {
                step: Step::AssignTldOwner,
                from: deployment.registry_owner(),
                to: REGISTRY,
                call: RegistryCall::SetSubnodeOwner {
                    node: B256::ZERO,
                    label: labelhash("eth"),
                    owner: deployment.domain_owner(),
                },
                overrides: MockBackend::overrides_for(1),
            },
            Event::Confirm(tx_hash),
        ]
    );

    let step = report.get(Step::AssignTldOwner).unwrap();
    assert_eq!(step.tx_hash, tx_hash);
    assert_eq!(step.url, format!("https://sepolia.etherscan.io/tx/{tx_hash}"));
    assert!(report.skipped.is_empty());

    similar_asserts::assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "ENSRegistry contract on explorer: https://sepolia.etherscan.io/address/{REGISTRY}\n\
             Set TLD \"eth\" owner, TX: https://sepolia.etherscan.io/tx/{tx_hash}\n"
        )
    );
}

#[tokio::test]
async fn custom_label_and_gas_limit() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::new();
    let mut settings = settings();
    settings.gas_limit = 250_000;

    assign_tld_owner(&deployment, &backend, &settings, std::io::sink(), "test").await.unwrap();

    let submits = backend.submits();
    let [Event::Submit { call, overrides, .. }] = &submits[..] else {
        panic!("expected a single submission: {:?}", backend.events());
    };
    assert_eq!(
        *call,
        RegistryCall::SetSubnodeOwner {
            node: B256::ZERO,
            label: labelhash("test"),
            owner: deployment.domain_owner(),
        }
    );
    assert_eq!(overrides.gas_limit, 250_000);
}

#[tokio::test]
async fn rejected_submission_is_not_awaited() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::scripted(Script { reject: Some(0), ..Default::default() });
    let mut out = Vec::new();

    let err =
        assign_tld_owner(&deployment, &backend, &settings(), &mut out, "eth").await.unwrap_err();

    match naming_error(&err) {
        NamingError::Submission { step, source } => {
            assert_eq!(*step, Step::AssignTldOwner);
            assert!(source.to_string().contains("not authorised"), "{source}");
        }
        err => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(backend.events(), vec![Event::FeeQuery]);
    assert_eq!(backend.confirms(), 0);
    assert!(!String::from_utf8(out).unwrap().contains("TX:"));
}

#[tokio::test]
async fn fee_failure_aborts_before_submission() {
    let deployment = MockDeployment::new();

    let backend = MockBackend::scripted(Script { fee_error: true, ..Default::default() });
    let err = assign_tld_owner(&deployment, &backend, &settings(), std::io::sink(), "eth")
        .await
        .unwrap_err();
    assert!(matches!(naming_error(&err), NamingError::FeeData(_)));
    assert!(backend.submits().is_empty());

    let backend = MockBackend::scripted(Script { incomplete_fees: true, ..Default::default() });
    let err = assign_tld_owner(&deployment, &backend, &settings(), std::io::sink(), "eth")
        .await
        .unwrap_err();
    assert!(matches!(
        naming_error(&err),
        NamingError::IncompleteFeeData { max_fee_per_gas: 0, .. }
    ));
    assert!(backend.submits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn confirmation_wait_is_bounded() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::scripted(Script { hang: Some(0), ..Default::default() });
    let mut settings = settings();
    settings.confirmation_timeout = Duration::from_secs(30);

    let err = assign_tld_owner(&deployment, &backend, &settings, std::io::sink(), "eth")
        .await
        .unwrap_err();

    match naming_error(&err) {
        NamingError::ConfirmationTimeout { step, tx_hash, timeout } => {
            assert_eq!(*step, Step::AssignTldOwner);
            assert_eq!(*tx_hash, backend.tx_hash(0));
            assert_eq!(*timeout, Duration::from_secs(30));
        }
        err => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(backend.confirms(), 0);
}

#[tokio::test]
async fn reverted_transaction_fails() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::scripted(Script { revert: Some(0), ..Default::default() });
    let mut out = Vec::new();

    let err =
        assign_tld_owner(&deployment, &backend, &settings(), &mut out, "eth").await.unwrap_err();

    let err = naming_error(&err);
    assert!(matches!(err, NamingError::Reverted { .. }));
    assert_eq!(err.step(), Some(Step::AssignTldOwner));
    assert!(!String::from_utf8(out).unwrap().contains("TX:"));
}

#[tokio::test]
async fn invalid_label_touches_nothing() {
    let deployment = MockDeployment::new();
    let backend = MockBackend::new();

    for label in ["", "token.eth", "ETH"] {
        let err = assign_tld_owner(&deployment, &backend, &settings(), std::io::sink(), label)
            .await
            .unwrap_err();
        assert!(matches!(naming_error(&err), NamingError::InvalidLabel(_)), "{label:?}");
    }
    assert!(backend.events().is_empty());
}
