//! Per-network client holder.
//!
//! The slot hands out the [`ChainClient`] for whatever network the session
//! currently reports, building a fresh one when the network has changed.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;

use crate::chain::client::ChainClient;
use crate::chain::ledger::Ledger;
use crate::chain::types::{ChainError, ChainResult, TxHash};
use crate::config::ChainConfig;
use crate::wallet::WalletAdapter;

pub struct ChainSlot {
    current: ArcSwapOption<ChainClient>,
    config: ChainConfig,
    wallet: WalletAdapter,
}

impl ChainSlot {
    pub fn new(config: ChainConfig, wallet: WalletAdapter) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            config,
            wallet,
        }
    }

    /// Client for the session's network.
    ///
    /// Fails with `ClientNotInitialized` while the session has no network
    /// we can reach.
    pub fn client(&self) -> ChainResult<Arc<ChainClient>> {
        let network = self
            .wallet
            .session()
            .network()
            .ok_or(ChainError::ClientNotInitialized)?;

        if let Some(client) = self.current.load_full() {
            if client.network() == network {
                return Ok(client);
            }
        }

        let client = Arc::new(ChainClient::new(network, &self.config, self.wallet.clone())?);
        tracing::info!(network = %network, node_url = %client.node_url(), "Chain client initialized");
        self.current.store(Some(client.clone()));
        Ok(client)
    }
}

#[async_trait]
impl Ledger for ChainSlot {
    async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash> {
        self.client()?.submit(function, arguments).await
    }

    async fn view(
        &self,
        function: &str,
        arguments: Vec<String>,
    ) -> ChainResult<Vec<serde_json::Value>> {
        self.client()?.view(function, arguments).await
    }
}

impl std::fmt::Debug for ChainSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainSlot")
            .field("current", &self.current.load().as_ref().map(|c| c.network()))
            .finish()
    }
}
