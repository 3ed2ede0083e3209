//! Pinning service client.
//!
//! Uploads certificate documents as multipart form data and turns the
//! returned content identifier into a public gateway URL.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::config::StorageConfig;
use crate::observability::metrics;
use crate::storage::types::{DocumentFile, PinResponse, PinnedDocument, StoreError};

/// Environment variable holding the pinning API key.
pub const API_KEY_ENV_VAR: &str = "PINATA_API_KEY";

/// Environment variable holding the pinning API secret.
pub const API_SECRET_ENV_VAR: &str = "PINATA_SECRET_API_KEY";

/// Content-addressed document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store the document and return where it can be fetched.
    async fn upload(&self, file: &DocumentFile) -> Result<PinnedDocument, StoreError>;
}

#[async_trait]
impl<D: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<D> {
    async fn upload(&self, file: &DocumentFile) -> Result<PinnedDocument, StoreError> {
        (**self).upload(file).await
    }
}

/// Pinning API credentials.
#[derive(Clone)]
pub struct PinningCredentials {
    api_key: String,
    api_secret: String,
}

impl PinningCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read both credentials from the environment.
    pub fn from_env() -> Result<Self, StoreError> {
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .map_err(|_| StoreError::MissingCredentials(API_KEY_ENV_VAR))?;
        let api_secret = std::env::var(API_SECRET_ENV_VAR)
            .map_err(|_| StoreError::MissingCredentials(API_SECRET_ENV_VAR))?;
        Ok(Self::new(api_key, api_secret))
    }
}

impl std::fmt::Debug for PinningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PinningCredentials(..)")
    }
}

/// Client for the pinning HTTP endpoint.
#[derive(Debug, Clone)]
pub struct PinningClient {
    http: reqwest::Client,
    config: StorageConfig,
    /// The credentials, or the name of what was missing when building.
    credentials: Result<PinningCredentials, &'static str>,
}

/// Reported when a client is built without credentials at all.
const CREDENTIALS_NOT_GIVEN: &str = "API key and secret";

impl PinningClient {
    /// Create a client. Without credentials every upload fails with
    /// `MissingCredentials`, so read-only flows can still build one.
    pub fn new(
        config: StorageConfig,
        credentials: Option<PinningCredentials>,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            config,
            credentials: credentials.ok_or(CREDENTIALS_NOT_GIVEN),
        })
    }

    /// Create a client with credentials taken from the environment, if present.
    pub fn from_env(config: StorageConfig) -> Result<Self, StoreError> {
        let credentials = PinningCredentials::from_env();
        let mut client = Self::new(config, None)?;
        client.credentials = credentials.map_err(|e| {
            tracing::debug!(error = %e, "Pinning credentials not configured");
            match e {
                StoreError::MissingCredentials(var) => var,
                _ => CREDENTIALS_NOT_GIVEN,
            }
        });
        Ok(client)
    }

    /// Reject documents that must never reach the network.
    pub fn preflight(&self, file: &DocumentFile) -> Result<(), StoreError> {
        if file.is_empty() {
            return Err(StoreError::Empty);
        }
        if file.len() > self.config.max_file_size {
            return Err(StoreError::FileTooLarge {
                size: file.len(),
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Public URL for a content identifier.
    pub fn gateway_url(&self, cid: &str) -> String {
        let prefix = self.config.gateway_prefix.trim_end_matches('/');
        format!("{}/{}", prefix, cid)
    }
}

#[async_trait]
impl DocumentStore for PinningClient {
    async fn upload(&self, file: &DocumentFile) -> Result<PinnedDocument, StoreError> {
        self.preflight(file)?;
        let credentials = self
            .credentials
            .as_ref()
            .map_err(|missing| StoreError::MissingCredentials(*missing))?;

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.kind().mime())
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::info!(file = %file.name(), size = file.len(), "Uploading document");

        let resp = self
            .http
            .post(&self.config.pin_url)
            .header("pinata_api_key", &credentials.api_key)
            .header("pinata_secret_api_key", &credentials.api_secret)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            tracing::warn!(status = status.as_u16(), "Pinning service rejected upload");
            return Err(StoreError::UploadRejected(reason.to_string()));
        }

        let pinned: PinResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        metrics::record_upload_bytes(file.len());

        let url = self.gateway_url(&pinned.ipfs_hash);
        tracing::info!(cid = %pinned.ipfs_hash, url = %url, "Document pinned");

        Ok(PinnedDocument {
            size: if pinned.pin_size > 0 { pinned.pin_size } else { file.len() },
            cid: pinned.ipfs_hash,
            url,
        })
    }
}
