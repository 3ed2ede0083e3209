//! Wallet adapter: connection lifecycle and session bookkeeping.
//!
//! # Responsibilities
//! - Request account access from the injected provider
//! - Keep the shared [`Session`] in step with provider notifications
//! - Gate signing on an active session

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::chain::types::{EntryFunctionPayload, TxHash};
use crate::wallet::provider::WalletProvider;
use crate::wallet::session::Session;
use crate::wallet::types::{AccountAddress, Network, WalletError, WalletEvent, WalletResult};

/// Connects a wallet provider to the session.
#[derive(Clone)]
pub struct WalletAdapter {
    provider: Option<Arc<dyn WalletProvider>>,
    session: Session,
}

impl WalletAdapter {
    /// Create an adapter. `provider` is `None` when no wallet is injected.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, default_network: Network) -> Self {
        let network = provider
            .as_ref()
            .map(|p| p.network())
            .unwrap_or(default_network);
        Self {
            provider,
            session: Session::new(network),
        }
    }

    /// The session this adapter maintains.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Request account access.
    ///
    /// Fails without touching the session when no provider is injected or
    /// the user declines.
    pub async fn connect(&self) -> WalletResult<AccountAddress> {
        let provider = self.provider.as_ref().ok_or(WalletError::ProviderUnavailable)?;

        let account = match provider.connect().await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Wallet connection failed");
                return Err(e);
            }
        };
        let network = provider.network();
        self.session.set_connected(account, network);

        tracing::info!(
            provider = provider.name(),
            account = %account,
            network = %network,
            "Wallet connected"
        );
        Ok(account)
    }

    /// Forget the connected account. Local only; nothing happens on chain.
    pub fn disconnect(&self) {
        self.session.clear();
        tracing::info!("Wallet disconnected");
    }

    /// Apply a provider-pushed notification to the session.
    pub fn apply_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountChanged(Some(account)) => {
                tracing::info!(account = %account, "Wallet account changed");
                self.session.set_account(account);
            }
            WalletEvent::AccountChanged(None) => {
                tracing::info!("Wallet reported no account");
                self.disconnect();
            }
            WalletEvent::NetworkChanged(name) => {
                let network = Network::from_name(&name);
                if network.is_none() {
                    tracing::warn!(network = %name, "Wallet switched to an unsupported network");
                } else {
                    tracing::info!(network = %name, "Wallet network changed");
                }
                self.session.set_network(network);
            }
        }
    }

    /// Listen for provider notifications until the provider goes away.
    ///
    /// Returns `None` when no provider is injected.
    pub fn spawn_event_listener(&self) -> Option<JoinHandle<()>> {
        let provider = self.provider.as_ref()?;
        let mut events = provider.subscribe();
        let adapter = self.clone();

        Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => adapter.apply_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped = skipped, "Dropped wallet notifications");
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Wallet notification channel closed");
                        break;
                    }
                }
            }
        }))
    }

    /// Sign and submit through the provider. Requires an active session.
    pub async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> WalletResult<TxHash> {
        let provider = self.provider.as_ref().ok_or(WalletError::ProviderUnavailable)?;
        if !self.session.is_connected() {
            return Err(WalletError::NotConnected);
        }
        provider.sign_and_submit(payload).await
    }
}

impl std::fmt::Debug for WalletAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletAdapter")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("session", &self.session.snapshot())
            .finish()
    }
}
