//! Document types and storage errors.

use bytes::Bytes;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Largest document the registry accepts, in bytes.
pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Accepted document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    /// Infer the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "png" => Some(DocumentKind::Png),
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Png => "image/png",
            DocumentKind::Jpeg => "image/jpeg",
        }
    }
}

/// A certificate document ready for upload.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    name: String,
    kind: DocumentKind,
    bytes: Bytes,
}

impl DocumentFile {
    /// Wrap in-memory contents. The kind comes from the name's extension.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, StoreError> {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name)
            .ok_or_else(|| StoreError::UnsupportedType(name.clone()))?;
        Ok(Self {
            name,
            kind,
            bytes: bytes.into(),
        })
    }

    /// Read a document from disk, refusing files larger than `max_size`
    /// before reading them.
    pub async fn from_path(path: &Path, max_size: u64) -> Result<Self, StoreError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        DocumentKind::from_file_name(&name)
            .ok_or_else(|| StoreError::UnsupportedType(name.clone()))?;
        let size = tokio::fs::metadata(path).await?.len();
        if size > max_size {
            return Err(StoreError::FileTooLarge {
                size,
                max: max_size,
            });
        }
        let bytes = tokio::fs::read(path).await?;
        Self::new(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A pinned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDocument {
    /// Content identifier returned by the pinning service.
    pub cid: String,
    /// Public retrieval URL embedding the cid.
    pub url: String,
    /// Size reported by the pinning service, in bytes.
    pub size: u64,
}

/// Pinning service success response.
#[derive(Debug, Deserialize)]
pub(crate) struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
}

/// Errors that can occur while storing documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document exceeds the size limit.
    #[error("File is {size} bytes, the limit is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// The document is not a PDF, PNG or JPEG.
    #[error("Unsupported document type: {0} (expected pdf, png or jpeg)")]
    UnsupportedType(String),

    /// The document has no content.
    #[error("File is empty")]
    Empty,

    /// Pinning credentials are not configured.
    #[error("Pinning credential not configured: {0}")]
    MissingCredentials(&'static str),

    /// The pinning service answered with a non-success status.
    #[error("IPFS upload failed: {0}")]
    UploadRejected(String),

    /// The pinning service answered with something we could not decode.
    #[error("Unexpected pinning response: {0}")]
    Decode(String),

    /// The request never got an answer.
    #[error("Upload transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
