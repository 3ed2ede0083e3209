//! Mock fullnode and pinning service for integration tests.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use cert_registry::chain::ChainSlot;
use cert_registry::config::{ChainConfig, ContractConfig, StorageConfig, WalletConfig};
use cert_registry::gateway::CertificateGateway;
use cert_registry::storage::{PinningClient, PinningCredentials};
use cert_registry::wallet::{
    auto_approve, AccountAddress, Approver, KeystoreProvider, Network, WalletAdapter, WalletProvider,
};

pub const ISSUER: &str = "0xa11ce";
pub const PRIVATE_KEY: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";

/// Ledger state behind the mock fullnode.
#[derive(Default)]
pub struct NodeState {
    pub certificates: Mutex<Vec<Value>>,
    pub submitted: Mutex<Vec<Value>>,
    pub unreadable: Mutex<Vec<String>>,
    pub abort_with: Mutex<Option<String>>,
    /// Lookups answered `pending_transaction` before the commit shows up.
    pub pending_lookups: AtomicU64,
    /// Answer every lookup with 404, as if the hash were unknown.
    pub forget_transactions: AtomicBool,
    pub lookups: AtomicU64,
    sequence: AtomicU64,
}

impl NodeState {
    pub fn submitted_functions(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|tx| tx["payload"]["function"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn apply(&self, sender: &str, payload: &Value) {
        let function = payload["function"].as_str().unwrap_or_default();
        let args: Vec<String> = payload["arguments"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();
        let mut certificates = self.certificates.lock().unwrap();

        if function.ends_with("::mint_certificate") {
            certificates.push(json!({
                "student_name": args[0],
                "roll_number": args[1],
                "course": args[2],
                "year_of_passing": args[3],
                "ipfs_url": args[4],
                "is_verified": false,
                "issuer": sender,
                "mint_time": "1735689600",
                "verified_by": "0x0",
                "verified_time": "0"
            }));
        } else if function.ends_with("::verify_certificate") {
            let index = args[0].parse::<usize>().ok().and_then(|i| i.checked_sub(1));
            if let Some(cert) = index.and_then(|i| certificates.get_mut(i)) {
                cert["is_verified"] = json!(true);
                cert["verified_by"] = json!(sender);
                cert["verified_time"] = json!("1735776000");
            }
        }
    }
}

async fn account(State(state): State<Arc<NodeState>>, Path(_addr): Path<String>) -> Json<Value> {
    let seq = state.sequence.load(Ordering::SeqCst);
    Json(json!({ "sequence_number": seq.to_string(), "authentication_key": "0x00" }))
}

async fn encode_submission(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!("0xb5e97db07fa0bd0e5598aa3643a9bc6f6693bddc1a9fec9e674a461eaa00b193"))
}

async fn submit(
    State(state): State<Arc<NodeState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body["signature"]["type"] != "ed25519_signature" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "missing signature", "error_code": "invalid_input" })),
        );
    }
    let seq = state.sequence.fetch_add(1, Ordering::SeqCst);
    let hash = format!("0x{:064x}", seq + 1);
    if state.abort_with.lock().unwrap().is_none() {
        state.apply(body["sender"].as_str().unwrap_or_default(), &body["payload"]);
    }
    state.submitted.lock().unwrap().push(body);
    (StatusCode::ACCEPTED, Json(json!({ "hash": hash })))
}

async fn transaction_by_hash(
    State(state): State<Arc<NodeState>>,
    Path(hash): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.lookups.fetch_add(1, Ordering::SeqCst);
    if state.forget_transactions.load(Ordering::SeqCst) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found", "error_code": "transaction_not_found" })),
        );
    }
    let still_pending = state
        .pending_lookups
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if still_pending {
        return (
            StatusCode::OK,
            Json(json!({ "type": "pending_transaction", "hash": hash })),
        );
    }

    let body = match state.abort_with.lock().unwrap().clone() {
        Some(vm_status) => json!({
            "type": "user_transaction",
            "hash": hash,
            "version": "7",
            "success": false,
            "vm_status": vm_status
        }),
        None => json!({
            "type": "user_transaction",
            "hash": hash,
            "version": "7",
            "success": true,
            "vm_status": "Executed successfully"
        }),
    };
    (StatusCode::OK, Json(body))
}

async fn view(
    State(state): State<Arc<NodeState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let function = body["function"].as_str().unwrap_or_default().to_string();
    let args: Vec<String> = body["arguments"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();
    let certificates = state.certificates.lock().unwrap();

    if function.ends_with("::get_certificate_count") {
        return (StatusCode::OK, Json(json!([certificates.len().to_string()])));
    }
    if function.ends_with("::search_certificates") {
        let ids: Vec<String> = certificates
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c["roll_number"] == args[0] && c["course"] == args[1] && c["year_of_passing"] == args[2]
            })
            .map(|(i, _)| (i + 1).to_string())
            .collect();
        return (StatusCode::OK, Json(json!([ids])));
    }
    if function.ends_with("::get_certificate") {
        let id = &args[0];
        if state.unreadable.lock().unwrap().contains(id) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "storage read failed", "error_code": "internal_error" })),
            );
        }
        let found = id
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| certificates.get(i).cloned());
        return match found {
            Some(cert) => (StatusCode::OK, Json(json!([cert]))),
            None => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Move abort: E_NOT_FOUND", "error_code": "vm_error" })),
            ),
        };
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "function not found", "error_code": "function_not_found" })),
    )
}

/// Start the mock fullnode; returns its `/v1` base URL.
pub async fn start_mock_node(state: Arc<NodeState>) -> String {
    let app = Router::new()
        .route("/v1/accounts/{addr}", get(account))
        .route("/v1/transactions/encode_submission", post(encode_submission))
        .route("/v1/transactions", post(submit))
        .route("/v1/transactions/by_hash/{hash}", get(transaction_by_hash))
        .route("/v1/view", post(view))
        .with_state(state);
    format!("http://{}/v1", serve(app).await)
}

/// Pinning service state.
#[derive(Default)]
pub struct PinState {
    pub uploads: AtomicU64,
    pub reject: AtomicBool,
}

async fn pin_file(
    State(state): State<Arc<PinState>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> (StatusCode, Json<Value>) {
    let authorized = headers.contains_key("pinata_api_key") && headers.contains_key("pinata_secret_api_key");
    if state.reject.load(Ordering::SeqCst) || !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid authentication" })));
    }
    let n = state.uploads.fetch_add(1, Ordering::SeqCst) + 1;
    (
        StatusCode::OK,
        Json(json!({
            "IpfsHash": format!("QmMockDocument{}", n),
            "PinSize": body.len(),
            "Timestamp": "2025-01-01T00:00:00Z"
        })),
    )
}

/// Start the mock pinning service; returns the upload URL.
pub async fn start_mock_pinning(state: Arc<PinState>) -> String {
    let app = Router::new()
        .route("/pinning/pinFileToIPFS", post(pin_file))
        .with_state(state);
    format!("http://{}/pinning/pinFileToIPFS", serve(app).await)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Everything a test needs to drive the registry end to end.
pub struct Harness {
    pub node: Arc<NodeState>,
    pub node_url: String,
    pub pinning: Arc<PinState>,
    pub provider: Arc<KeystoreProvider>,
    pub adapter: WalletAdapter,
    pub gateway: CertificateGateway<ChainSlot, PinningClient>,
}

pub fn chain_config(node_url: &str) -> ChainConfig {
    ChainConfig {
        mainnet_url: node_url.to_string(),
        testnet_url: node_url.to_string(),
        request_timeout_secs: 5,
        confirmation_timeout_secs: 2,
        poll_interval_ms: 10,
    }
}

pub async fn harness() -> Harness {
    harness_with(auto_approve()).await
}

/// Harness whose wallet asks `approver` before signing.
pub async fn harness_with(approver: Approver) -> Harness {
    let node = Arc::new(NodeState::default());
    let pinning = Arc::new(PinState::default());
    let node_url = start_mock_node(node.clone()).await;
    let pin_url = start_mock_pinning(pinning.clone()).await;

    let chain = chain_config(&node_url);
    let address: AccountAddress = ISSUER.parse().unwrap();
    let provider = Arc::new(
        KeystoreProvider::from_private_key(
            PRIVATE_KEY,
            address,
            Network::Testnet,
            chain.clone(),
            WalletConfig::default(),
        )
        .unwrap()
        .with_approver(approver),
    );

    let dyn_provider: Arc<dyn WalletProvider> = provider.clone();
    let adapter = WalletAdapter::new(Some(dyn_provider), Network::Testnet);
    adapter.spawn_event_listener();

    let storage = StorageConfig {
        pin_url,
        ..StorageConfig::default()
    };
    let store = PinningClient::new(storage.clone(), Some(PinningCredentials::new("key", "secret"))).unwrap();
    let gateway = CertificateGateway::new(
        ContractConfig::default(),
        storage.gateway_prefix,
        adapter.session().clone(),
        ChainSlot::new(chain, adapter.clone()),
        store,
    );

    Harness {
        node,
        node_url,
        pinning,
        provider,
        adapter,
        gateway,
    }
}
