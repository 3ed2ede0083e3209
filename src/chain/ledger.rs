//! The seam between the certificate gateway and the chain.

use async_trait::async_trait;
use std::sync::Arc;

use crate::chain::client::ChainClient;
use crate::chain::types::{ChainResult, TxHash};

/// Signed submissions and read-only views against the active network.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submit an entry function call and wait for it to commit.
    async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash>;

    /// Evaluate a view function.
    async fn view(&self, function: &str, arguments: Vec<String>)
        -> ChainResult<Vec<serde_json::Value>>;
}

#[async_trait]
impl Ledger for ChainClient {
    async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash> {
        ChainClient::submit(self, function, arguments).await
    }

    async fn view(
        &self,
        function: &str,
        arguments: Vec<String>,
    ) -> ChainResult<Vec<serde_json::Value>> {
        ChainClient::view(self, function, arguments).await
    }
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash> {
        (**self).submit(function, arguments).await
    }

    async fn view(
        &self,
        function: &str,
        arguments: Vec<String>,
    ) -> ChainResult<Vec<serde_json::Value>> {
        (**self).view(function, arguments).await
    }
}
