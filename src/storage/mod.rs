//! Document storage subsystem.
//!
//! # Data Flow
//! ```text
//! DocumentFile (pdf/png/jpeg, ≤ max_file_size)
//!     → pinning.rs preflight (no network on rejection)
//!     → multipart POST to the pinning endpoint
//!     → content identifier → <gateway_prefix>/<cid>
//! ```

pub mod pinning;
pub mod types;

pub use pinning::{DocumentStore, PinningClient, PinningCredentials};
pub use types::{DocumentFile, DocumentKind, PinnedDocument, StoreError, MAX_DOCUMENT_SIZE};
