//! Shared session state.
//!
//! A single `Session` is created by the wallet adapter and handed to every
//! component that needs to know who is connected. Only the adapter mutates it.

use std::sync::Arc;
use tokio::sync::watch;

use crate::wallet::types::{AccountAddress, Network};

/// Snapshot of the wallet session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Connected account address.
    pub account: Option<AccountAddress>,
    /// Whether a wallet connection is active.
    pub connected: bool,
    /// Active network; `None` when the wallet reports one we cannot reach.
    pub network: Option<Network>,
}

/// Cheaply cloneable handle to the session state.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<watch::Sender<SessionState>>,
}

impl Session {
    /// Create a disconnected session on the given network.
    pub fn new(network: Network) -> Self {
        let (state, _) = watch::channel(SessionState {
            account: None,
            connected: false,
            network: Some(network),
        });
        Self {
            state: Arc::new(state),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        let state = self.state.borrow();
        state.connected && state.account.is_some()
    }

    pub fn account(&self) -> Option<AccountAddress> {
        self.state.borrow().account
    }

    pub fn network(&self) -> Option<Network> {
        self.state.borrow().network
    }

    /// Watch for session transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub(crate) fn set_connected(&self, account: AccountAddress, network: Network) {
        self.state.send_modify(|state| {
            state.account = Some(account);
            state.connected = true;
            state.network = Some(network);
        });
    }

    pub(crate) fn set_account(&self, account: AccountAddress) {
        self.state.send_modify(|state| {
            state.account = Some(account);
        });
    }

    pub(crate) fn set_network(&self, network: Option<Network>) {
        self.state.send_modify(|state| {
            state.network = network;
        });
    }

    /// Clear account and connection flag. The network is left as is.
    pub(crate) fn clear(&self) {
        self.state.send_modify(|state| {
            state.account = None;
            state.connected = false;
        });
    }
}
