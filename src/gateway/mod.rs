//! Certificate gateway subsystem.
//!
//! # Data Flow
//! ```text
//! mint:   session check → storage upload → mint_certificate submission
//! verify: session check → verify_certificate submission
//! fetch:  get_certificate view → decode.rs
//! search: search_certificates view → one fetch per id, in order
//! ```

pub mod decode;
pub mod service;
pub mod types;

pub use service::CertificateGateway;
pub use types::{
    CertificateDetails, CertificateRecord, Course, GatewayError, GatewayResult, MintReceipt,
    SearchCriteria, VerifyReceipt,
};
