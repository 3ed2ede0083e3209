//! The wallet provider seam.
//!
//! A provider is whatever holds the user's keys: a browser extension bridge,
//! a hardware signer, or the local [`KeystoreProvider`](crate::wallet::KeystoreProvider).

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::chain::types::{EntryFunctionPayload, TxHash};
use crate::wallet::types::{AccountAddress, Network, WalletEvent, WalletResult};

/// An injected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access.
    async fn connect(&self) -> WalletResult<AccountAddress>;

    /// Sign the payload and submit it to the wallet's network.
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> WalletResult<TxHash>;

    /// Receive account and network change notifications.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;

    /// Network the wallet is currently pointed at.
    fn network(&self) -> Network;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}
