//! Local keystore wallet.
//!
//! Signs with an Ed25519 key held on disk and submits through the fullnode's
//! REST API, so the registry can be driven without a browser extension.
//!
//! # Security
//! - Keys are never logged or serialized
//! - Every payload passes through the [`Approver`] before it is signed

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::chain::types::{EntryFunctionPayload, NodeErrorBody, TxHash};
use crate::config::{ChainConfig, WalletConfig};
use crate::wallet::provider::WalletProvider;
use crate::wallet::types::{AccountAddress, Network, WalletError, WalletEvent, WalletResult};

/// Decides whether a payload may be signed.
pub type Approver = Arc<dyn Fn(&EntryFunctionPayload) -> bool + Send + Sync>;

/// Approve everything.
pub fn auto_approve() -> Approver {
    Arc::new(|_| true)
}

#[derive(Debug, Deserialize)]
struct AccountResource {
    sequence_number: String,
}

#[derive(Debug, Serialize)]
struct UnsignedSubmission<'a> {
    sender: String,
    sequence_number: String,
    max_gas_amount: String,
    gas_unit_price: String,
    expiration_timestamp_secs: String,
    payload: &'a EntryFunctionPayload,
}

#[derive(Debug, Serialize)]
struct SignedSubmission<'a> {
    #[serde(flatten)]
    unsigned: &'a UnsignedSubmission<'a>,
    signature: TransactionSignature,
}

#[derive(Debug, Serialize)]
struct TransactionSignature {
    #[serde(rename = "type")]
    kind: &'static str,
    public_key: String,
    signature: String,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    hash: String,
}

/// Wallet provider backed by a local Ed25519 key.
pub struct KeystoreProvider {
    signing_key: SigningKey,
    address: AccountAddress,
    network: Mutex<Network>,
    unlocked: AtomicBool,
    http: reqwest::Client,
    chain: ChainConfig,
    wallet: WalletConfig,
    approver: Approver,
    events: broadcast::Sender<WalletEvent>,
}

impl KeystoreProvider {
    /// Create a provider from a hex-encoded private key.
    ///
    /// Accepts the key with or without a `0x` or `ed25519-priv-` prefix.
    pub fn from_private_key(
        private_key_hex: &str,
        address: AccountAddress,
        network: Network,
        chain: ChainConfig,
        wallet: WalletConfig,
    ) -> WalletResult<Self> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed.strip_prefix("ed25519-priv-").unwrap_or(trimmed);
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let mut secret = [0u8; 32];
        hex::decode_to_slice(key_hex, &mut secret)
            .map_err(|e| WalletError::Key(format!("Invalid private key format: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(chain.request_timeout_secs))
            .build()
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        let (events, _) = broadcast::channel(16);

        tracing::info!(address = %address, network = %network, "Keystore wallet loaded");

        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret),
            address,
            network: Mutex::new(network),
            unlocked: AtomicBool::new(false),
            http,
            chain,
            wallet,
            approver: auto_approve(),
            events,
        })
    }

    /// Load the key from a file containing the hex private key.
    pub fn from_key_file(
        path: &Path,
        address: AccountAddress,
        network: Network,
        chain: ChainConfig,
        wallet: WalletConfig,
    ) -> WalletResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WalletError::Key(format!("Cannot read key file {}: {}", path.display(), e))
        })?;
        Self::from_private_key(&contents, address, network, chain, wallet)
    }

    /// Replace the approval policy.
    pub fn with_approver(mut self, approver: Approver) -> Self {
        self.approver = approver;
        self
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Hex-encoded public key, `0x`-prefixed.
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Point the wallet at another network and notify subscribers.
    pub fn switch_network(&self, network: Network) {
        *self.network.lock().unwrap_or_else(PoisonError::into_inner) = network;
        let _ = self
            .events
            .send(WalletEvent::NetworkChanged(network.as_str().to_string()));
    }

    /// Stop exposing the account until the next `connect`.
    pub fn lock(&self) {
        self.unlocked.store(false, Ordering::SeqCst);
        let _ = self.events.send(WalletEvent::AccountChanged(None));
    }

    fn node_url(&self) -> String {
        self.chain
            .node_url(self.network())
            .trim_end_matches('/')
            .to_string()
    }

    async fn sequence_number(&self, node: &str) -> WalletResult<String> {
        let resp = self
            .http
            .get(format!("{}/accounts/{}", node, self.address))
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(WalletError::Rejected(node_error(resp).await));
        }
        let account: AccountResource = resp
            .json()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        Ok(account.sequence_number)
    }

    fn sign_hex(&self, signing_message_hex: &str) -> WalletResult<TransactionSignature> {
        let digits = signing_message_hex
            .strip_prefix("0x")
            .unwrap_or(signing_message_hex);
        let message = hex::decode(digits)
            .map_err(|e| WalletError::Key(format!("Malformed signing message: {}", e)))?;
        let signature = self.signing_key.sign(&message);
        Ok(TransactionSignature {
            kind: "ed25519_signature",
            public_key: self.public_key_hex(),
            signature: format!("0x{}", hex::encode(signature.to_bytes())),
        })
    }
}

#[async_trait]
impl WalletProvider for KeystoreProvider {
    async fn connect(&self) -> WalletResult<AccountAddress> {
        self.unlocked.store(true, Ordering::SeqCst);
        Ok(self.address)
    }

    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> WalletResult<TxHash> {
        if !self.unlocked.load(Ordering::SeqCst) {
            return Err(WalletError::NotConnected);
        }
        if !(self.approver)(payload) {
            tracing::info!(function = %payload.function, "Signature request declined");
            return Err(WalletError::UserRejected);
        }

        let node = self.node_url();
        let sequence_number = self.sequence_number(&node).await?;
        let expiration = chrono::Utc::now().timestamp() as u64 + self.wallet.expiration_secs;

        let unsigned = UnsignedSubmission {
            sender: self.address.to_string(),
            sequence_number,
            max_gas_amount: self.wallet.max_gas_amount.to_string(),
            gas_unit_price: self.wallet.gas_unit_price.to_string(),
            expiration_timestamp_secs: expiration.to_string(),
            payload,
        };

        let resp = self
            .http
            .post(format!("{}/transactions/encode_submission", node))
            .json(&unsigned)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(WalletError::Rejected(node_error(resp).await));
        }
        let signing_message: String = resp
            .json()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        let signed = SignedSubmission {
            unsigned: &unsigned,
            signature: self.sign_hex(&signing_message)?,
        };

        let resp = self
            .http
            .post(format!("{}/transactions", node))
            .json(&signed)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(WalletError::Rejected(node_error(resp).await));
        }
        let pending: PendingTransaction = resp
            .json()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        tracing::info!(
            hash = %pending.hash,
            function = %payload.function,
            "Transaction submitted"
        );
        Ok(TxHash::new(pending.hash))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn network(&self) -> Network {
        *self.network.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn name(&self) -> &str {
        "keystore"
    }
}

impl std::fmt::Debug for KeystoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreProvider")
            .field("address", &self.address)
            .field("network", &self.network())
            .finish()
    }
}

/// Best-effort message from a fullnode error response.
async fn node_error(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<NodeErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
