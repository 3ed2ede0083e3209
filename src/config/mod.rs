//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//!     → cloned into the chain client, pinning client and keystore wallet
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running without a file
//! - Pinning credentials never live in the file; they come from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::RegistryConfig;
pub use schema::{ChainConfig, ContractConfig, StorageConfig, WalletConfig};
