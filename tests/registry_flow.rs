//! End-to-end flows against the mock fullnode and pinning service.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use cert_registry::chain::{ChainError, ChainSlot, EntryFunctionPayload, Ledger};
use cert_registry::gateway::{CertificateDetails, Course, GatewayError, SearchCriteria};
use cert_registry::config::{ContractConfig, StorageConfig};
use cert_registry::storage::{DocumentFile, DocumentStore, PinningClient, StoreError};
use cert_registry::views::{
    FormPhase, HolderForm, HolderView, IssuerForm, IssuerView, VerifierForm, VerifierView,
};
use cert_registry::wallet::{Network, WalletProvider};

mod common;

fn details(name: &str, roll: &str) -> CertificateDetails {
    CertificateDetails {
        student_name: name.to_string(),
        roll_number: roll.to_string(),
        course: Course::Cse,
        year_of_passing: 2024,
    }
}

fn criteria(roll: &str) -> SearchCriteria {
    SearchCriteria {
        roll_number: roll.to_string(),
        course: Course::Cse,
        year_of_passing: 2024,
    }
}

fn pdf() -> DocumentFile {
    DocumentFile::new("degree.pdf", Bytes::from_static(b"%PDF-1.7 mock certificate")).unwrap()
}

#[tokio::test]
async fn test_issue_verify_retrieve() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();

    // College mints.
    let mut issuer = IssuerView::new();
    issuer.form = IssuerForm {
        student_name: "Jane Doe".to_string(),
        roll_number: "21CS001".to_string(),
        course: Course::Cse,
        year_of_passing: 2024,
    };
    issuer.select_file(pdf());
    let phase = issuer.submit(&h.gateway).await.clone();
    assert_eq!(phase, FormPhase::Success("Certificate uploaded successfully!".to_string()));
    assert_eq!(
        issuer.receipt().unwrap().document_url,
        "https://gateway.pinata.cloud/ipfs/QmMockDocument1"
    );
    assert_eq!(h.pinning.uploads.load(Ordering::SeqCst), 1);

    // Company finds and verifies it.
    let mut verifier = VerifierView::new();
    verifier.form = VerifierForm {
        roll_number: "21CS001".to_string(),
        course: Course::Cse,
        year_of_passing: Some(2024),
        certificate_id: None,
    };
    verifier.search(&h.gateway).await;
    let found = verifier.result().unwrap();
    assert_eq!(found.id, "1");
    assert!(!found.is_verified);
    assert_eq!(found.document_url, "https://gateway.pinata.cloud/ipfs/QmMockDocument1");

    let phase = verifier.verify_selected(&h.gateway).await.clone();
    assert_eq!(phase, FormPhase::Success("Certificate verified successfully!".to_string()));
    assert!(verifier.verification_hash().is_some());

    // Student sees it verified.
    let mut holder = HolderView::new();
    holder.form = HolderForm {
        name: "JANE DOE".to_string(),
        roll_number: "21CS001".to_string(),
        course: Course::Cse,
        year_of_passing: Some(2024),
    };
    holder.search(&h.gateway).await;
    let record = holder.result().unwrap();
    assert!(record.is_verified);
    assert_eq!(record.verified_by, Some(h.provider.address()));
    assert!(holder.render().contains("Verified At:     2025-01-02"));

    let functions = h.node.submitted_functions();
    assert_eq!(functions.len(), 2);
    assert!(functions[0].ends_with("::certificate_nft::mint_certificate"));
    assert!(functions[1].ends_with("::certificate_nft::verify_certificate"));
    assert_eq!(h.gateway.certificate_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_mint_arguments_in_order() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();

    h.gateway.mint(&details("Jane Doe", "21CS001"), &pdf()).await.unwrap();

    let submitted = h.node.submitted.lock().unwrap().clone();
    let payload = &submitted[0]["payload"];
    assert_eq!(payload["type"], "entry_function_payload");
    assert_eq!(payload["type_arguments"], serde_json::json!([]));
    assert_eq!(
        payload["arguments"],
        serde_json::json!([
            "Jane Doe",
            "21CS001",
            "CSE",
            "2024",
            "https://gateway.pinata.cloud/ipfs/QmMockDocument1"
        ])
    );
    assert_eq!(submitted[0]["signature"]["type"], "ed25519_signature");
}

#[tokio::test]
async fn test_search_drops_unreadable_certificates() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();

    for name in ["Jane Doe", "John Roe", "Ann Poe"] {
        h.gateway.mint(&details(name, "21CS001"), &pdf()).await.unwrap();
    }
    h.node.unreadable.lock().unwrap().push("2".to_string());

    let records = h.gateway.search(&criteria("21CS001")).await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(records[1].student_name, "Ann Poe");
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();

    let records = h.gateway.search(&criteria("99XX999")).await.unwrap();
    assert!(records.is_empty());
    assert!(h.node.submitted_functions().is_empty());
}

#[tokio::test]
async fn test_fetch_unknown_id() {
    let h = common::harness().await;
    let result = h.gateway.fetch_by_id("42").await;
    assert!(matches!(result, Err(GatewayError::Chain(ChainError::View { .. }))));
}

#[tokio::test]
async fn test_upload_rejection_surfaces_status_text() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    h.pinning.reject.store(true, Ordering::SeqCst);

    let mut issuer = IssuerView::new();
    issuer.form.student_name = "Jane Doe".to_string();
    issuer.form.roll_number = "21CS001".to_string();
    issuer.form.year_of_passing = 2024;
    issuer.select_file(pdf());

    let phase = issuer.submit(&h.gateway).await.clone();
    assert_eq!(phase.status(), Some("Error: IPFS upload failed: Unauthorized"));
    assert!(h.node.submitted_functions().is_empty());
}

#[tokio::test]
async fn test_oversized_document_never_uploaded() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();

    let big = DocumentFile::new("scan.png", vec![0u8; 11 * 1024 * 1024]).unwrap();
    let result = h.gateway.mint(&details("Jane Doe", "21CS001"), &big).await;

    assert!(matches!(
        result,
        Err(GatewayError::Store(StoreError::FileTooLarge { .. }))
    ));
    assert_eq!(h.pinning.uploads.load(Ordering::SeqCst), 0);
    assert!(h.node.submitted_functions().is_empty());
}

#[tokio::test]
async fn test_mint_without_wallet_touches_nothing() {
    let h = common::harness().await;

    let result = h.gateway.mint(&details("Jane Doe", "21CS001"), &pdf()).await;
    assert!(matches!(result, Err(GatewayError::WalletNotConnected)));
    assert_eq!(h.pinning.uploads.load(Ordering::SeqCst), 0);

    let result = h.gateway.verify("1").await;
    assert!(matches!(result, Err(GatewayError::WalletNotConnected)));
    assert!(h.node.submitted_functions().is_empty());
}

#[tokio::test]
async fn test_declined_signature() {
    let h = common::harness_with(Arc::new(|_: &EntryFunctionPayload| false)).await;
    h.adapter.connect().await.unwrap();

    let result = h.gateway.verify("1").await;
    assert!(matches!(
        result,
        Err(GatewayError::Chain(ChainError::SubmissionRejected(_)))
    ));
    assert!(h.node.submitted_functions().is_empty());
}

#[tokio::test]
async fn test_aborted_transaction() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    *h.node.abort_with.lock().unwrap() = Some("Move abort: E_ALREADY_VERIFIED".to_string());

    match h.gateway.verify("1").await {
        Err(GatewayError::Chain(ChainError::Aborted { vm_status, .. })) => {
            assert_eq!(vm_status, "Move abort: E_ALREADY_VERIFIED");
        }
        other => panic!("expected abort, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wallet_events_update_session_and_client() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    let session = h.adapter.session().clone();
    let mut changes = session.subscribe();

    h.provider.switch_network(Network::Mainnet);
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.network(), Some(Network::Mainnet));
    assert_eq!(h.provider.network(), Network::Mainnet);

    h.provider.lock();
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(!session.is_connected());
    assert_eq!(session.account(), None);
    assert_eq!(session.network(), Some(Network::Mainnet));
}

#[tokio::test]
async fn test_upload_without_credentials() {
    let state = Arc::new(common::PinState::default());
    let url = common::start_mock_pinning(state.clone()).await;
    let store = PinningClient::new(
        StorageConfig {
            pin_url: url,
            ..Default::default()
        },
        None,
    )
    .unwrap();

    let result = store.upload(&pdf()).await;
    assert!(matches!(result, Err(StoreError::MissingCredentials(_))));
    assert_eq!(state.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_slot_follows_session_network() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    h.gateway.mint(&details("Jane Doe", "21CS001"), &pdf()).await.unwrap();

    let slot = ChainSlot::new(common::chain_config(&h.node_url), h.adapter.clone());
    assert_eq!(slot.client().unwrap().network(), Network::Testnet);

    let count = slot
        .view(&ContractConfig::default().function_id("get_certificate_count"), vec![])
        .await
        .unwrap();
    assert_eq!(count, vec![serde_json::json!("1")]);

    let mut changes = h.adapter.session().subscribe();
    h.provider.switch_network(Network::Mainnet);
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(slot.client().unwrap().network(), Network::Mainnet);
}

#[tokio::test]
async fn test_confirmation_times_out_while_pending() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    h.node.pending_lookups.store(u64::MAX, Ordering::SeqCst);

    match h.gateway.verify("1").await {
        Err(GatewayError::Chain(ChainError::ConfirmationTimeout { secs, .. })) => {
            assert_eq!(secs, 2);
        }
        other => panic!("expected confirmation timeout, got {:?}", other),
    }
    assert!(h.node.lookups.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_confirmation_times_out_for_unknown_hash() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    h.node.forget_transactions.store(true, Ordering::SeqCst);

    let result = h.gateway.verify("1").await;
    assert!(matches!(
        result,
        Err(GatewayError::Chain(ChainError::ConfirmationTimeout { .. }))
    ));
    assert!(h.node.lookups.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_pending_then_committed() {
    let h = common::harness().await;
    h.adapter.connect().await.unwrap();
    h.node.pending_lookups.store(3, Ordering::SeqCst);

    let client = ChainSlot::new(common::chain_config(&h.node_url), h.adapter.clone())
        .client()
        .unwrap();
    let function = ContractConfig::default().function_id("verify_certificate");
    let hash = client.submit(&function, vec!["1".to_string()]).await.unwrap();

    assert!(hash.as_str().starts_with("0x"));
    assert_eq!(h.node.lookups.load(Ordering::SeqCst), 4);
}

