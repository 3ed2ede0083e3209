//! Certificate registry client.
//!
//! Lets a college mint academic certificates, a company verify them and a
//! student retrieve them, against a certificate Move module on Aptos with
//! documents pinned on IPFS.

pub mod chain;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod storage;
pub mod views;
pub mod wallet;

pub use config::schema::RegistryConfig;
pub use gateway::CertificateGateway;
pub use wallet::WalletAdapter;
