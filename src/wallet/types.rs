//! Wallet-facing types and error definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Networks the registry knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Map a wallet-reported network name. Unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte account address.
///
/// Parses both the long form and the short form (`0x1`), always displays
/// the long form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const ZERO: AccountAddress = AccountAddress([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Abbreviated form for display, e.g. `0x2351...9bb1`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

/// Error returned when an address string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid account address: {0}")]
pub struct AddressParseError(pub String);

impl FromStr for AccountAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        if digits.is_empty() || digits.len() > 64 {
            return Err(AddressParseError(s.to_string()));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|_| AddressParseError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Change notifications pushed by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The active account changed; `None` means the wallet no longer exposes one.
    AccountChanged(Option<AccountAddress>),
    /// The wallet switched networks. Carries the wallet's own network name.
    NetworkChanged(String),
}

/// Errors that can occur while talking to a wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet provider is injected.
    #[error("wallet provider not found, install or configure a wallet")]
    ProviderUnavailable,

    /// The user declined the request.
    #[error("user rejected the request")]
    UserRejected,

    /// No account is connected.
    #[error("wallet not connected")]
    NotConnected,

    /// The network refused the signed transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Key loading or signing failed.
    #[error("key error: {0}")]
    Key(String),

    /// The wallet could not reach its node.
    #[error("wallet transport error: {0}")]
    Transport(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;
