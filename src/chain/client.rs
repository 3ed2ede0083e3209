//! Fullnode REST client with confirmation polling.
//!
//! # Responsibilities
//! - Evaluate read-only view functions
//! - Hand entry function payloads to the wallet for signing
//! - Poll submitted transactions until they commit or time out

use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::chain::types::{
    ChainError, ChainResult, EntryFunctionPayload, NodeErrorBody, TransactionStatus,
    TransactionView, TxHash, ViewRequest,
};
use crate::config::ChainConfig;
use crate::wallet::{Network, WalletAdapter};

/// Read/write handle bound to one network's fullnode.
#[derive(Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    node_url: String,
    network: Network,
    wallet: WalletAdapter,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl ChainClient {
    /// Create a client for `network`. The endpoint is fixed for the
    /// client's lifetime; a network change means building a new one.
    pub fn new(network: Network, config: &ChainConfig, wallet: WalletAdapter) -> ChainResult<Self> {
        let node_url = config.node_url(network).trim_end_matches('/').to_string();
        url::Url::parse(&node_url).map_err(|e| {
            ChainError::Transport(format!("Invalid node URL '{}': {}", node_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::debug!(network = %network, node_url = %node_url, "Chain client created");

        Ok(Self {
            http,
            node_url,
            network,
            wallet,
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Have the wallet sign and submit a call to `function`, then wait for
    /// the transaction to commit.
    pub async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash> {
        let payload = EntryFunctionPayload::new(function, arguments);
        let hash = self.wallet.sign_and_submit(&payload).await?;

        tracing::info!(hash = %hash, function = %function, "Awaiting confirmation");

        match self.wait_for_transaction(&hash).await? {
            TransactionStatus::Committed { version } => {
                tracing::info!(hash = %hash, version = version, "Transaction committed");
                Ok(hash)
            }
            TransactionStatus::Failed { vm_status } => {
                tracing::warn!(hash = %hash, vm_status = %vm_status, "Transaction failed");
                Err(ChainError::Aborted { hash, vm_status })
            }
            TransactionStatus::Pending => Err(ChainError::ConfirmationTimeout {
                hash,
                secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }

    /// Poll until the transaction leaves the pending state.
    pub async fn wait_for_transaction(&self, hash: &TxHash) -> ChainResult<TransactionStatus> {
        let result = timeout(self.confirmation_timeout, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                match self.transaction_status(hash).await? {
                    TransactionStatus::Pending => {
                        tracing::debug!(hash = %hash, "Transaction pending");
                    }
                    status => return Ok(status),
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(ChainError::ConfirmationTimeout {
                hash: hash.clone(),
                secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }

    /// Look a transaction up once. Unknown hashes count as pending.
    pub async fn transaction_status(&self, hash: &TxHash) -> ChainResult<TransactionStatus> {
        let resp = self
            .http
            .get(format!("{}/transactions/by_hash/{}", self.node_url, hash))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(TransactionStatus::Pending);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ChainError::Transport(format!(
                "transaction lookup returned {}",
                status
            )));
        }

        let view: TransactionView = resp.json().await?;
        Ok(view.status())
    }

    /// Evaluate a view function and return its result tuple.
    pub async fn view(
        &self,
        function: &str,
        arguments: Vec<String>,
    ) -> ChainResult<Vec<serde_json::Value>> {
        let request = ViewRequest::new(function, arguments);
        let resp = self
            .http
            .post(format!("{}/view", self.node_url))
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = match resp.json::<NodeErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status.to_string(),
            };
            return Err(ChainError::View {
                function: function.to_string(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Check the fullnode answers its ledger-info endpoint.
    pub async fn is_healthy(&self) -> bool {
        match self.http.get(format!("{}/", self.node_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(node_url = %self.node_url, error = %e, "Fullnode unreachable");
                false
            }
        }
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("node_url", &self.node_url)
            .field("network", &self.network)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}
