//! Wallet adapter and session state.
//!
//! # Data Flow
//! ```text
//! WalletProvider ──connect()──▶ WalletAdapter ──▶ Session (watch)
//!        │                            ▲
//!        └── WalletEvent (broadcast) ─┘  spawn_event_listener()
//! ```
//!
//! The adapter is the only writer of the session; everything else holds a
//! cloned [`Session`] handle and reads it.

pub mod adapter;
pub mod keystore;
pub mod provider;
pub mod session;
pub mod types;

pub use adapter::WalletAdapter;
pub use keystore::{auto_approve, Approver, KeystoreProvider};
pub use provider::WalletProvider;
pub use session::{Session, SessionState};
pub use types::{AccountAddress, Network, WalletError, WalletEvent, WalletResult};
