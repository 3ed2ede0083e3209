//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Session network
//!     → slot.rs (pick or rebuild the client for that network)
//!     → client.rs (view calls; submissions signed by the wallet adapter)
//!     → confirmation polling on /transactions/by_hash
//! ```
//!
//! # Constraints
//! - Every contract argument is passed as a string
//! - Only the confirmation poll carries its own deadline; other calls rely
//!   on the HTTP client's request timeout
//! - Nothing is retried

pub mod client;
pub mod ledger;
pub mod slot;
pub mod types;

pub use client::ChainClient;
pub use ledger::Ledger;
pub use slot::ChainSlot;
pub use types::{ChainError, ChainResult, EntryFunctionPayload, TransactionStatus, TxHash};
