//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::wallet::WalletError;

/// Payload type tag understood by wallets and fullnodes.
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// An entry function call. Every argument travels as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub fn new(function: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            kind: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// Body of a `/view` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl ViewRequest {
    pub fn new(function: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// Transaction hash as returned by the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet committed.
    Pending,
    /// Committed and executed successfully.
    Committed { version: u64 },
    /// Committed but execution failed.
    Failed { vm_status: String },
}

/// Shape of `/transactions/by_hash/{hash}` responses we care about.
#[derive(Debug, Deserialize)]
pub(crate) struct TransactionView {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

impl TransactionView {
    pub(crate) fn status(&self) -> TransactionStatus {
        if self.kind == "pending_transaction" {
            return TransactionStatus::Pending;
        }
        match self.success {
            Some(true) => TransactionStatus::Committed {
                version: self
                    .version
                    .as_deref()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_default(),
            },
            Some(false) => TransactionStatus::Failed {
                vm_status: self.vm_status.clone().unwrap_or_default(),
            },
            None => TransactionStatus::Pending,
        }
    }
}

/// Error body returned by the fullnode.
#[derive(Debug, Deserialize)]
pub struct NodeErrorBody {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No wallet session to sign with.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// No wallet provider is injected.
    #[error("Wallet provider not found")]
    ProviderUnavailable,

    /// The wallet or the network refused the transaction.
    #[error("Transaction rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction did not commit in time.
    #[error("Transaction {hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { hash: TxHash, secs: u64 },

    /// The transaction committed but execution failed.
    #[error("Transaction {hash} failed: {vm_status}")]
    Aborted { hash: TxHash, vm_status: String },

    /// No client exists for the active network.
    #[error("Chain client not initialized")]
    ClientNotInitialized,

    /// A view function returned an error.
    #[error("View {function} failed: {message}")]
    View { function: String, message: String },

    /// The fullnode answered with something we could not decode.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<WalletError> for ChainError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NotConnected => ChainError::WalletNotConnected,
            WalletError::ProviderUnavailable => ChainError::ProviderUnavailable,
            WalletError::UserRejected => {
                ChainError::SubmissionRejected("user rejected the request".to_string())
            }
            WalletError::Rejected(msg) | WalletError::Key(msg) => {
                ChainError::SubmissionRejected(msg)
            }
            WalletError::Transport(msg) => ChainError::Transport(msg),
        }
    }
}

impl From<reqwest::Error> for ChainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChainError::Decode(e.to_string())
        } else {
            ChainError::Transport(e.to_string())
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
