//! Certificate gateway: mint, verify, fetch and search.
//!
//! # Responsibilities
//! - Check the session before anything that needs a signature
//! - Pin documents before minting
//! - Resolve search hits into full records, dropping ids that fail to load
//!
//! # Design Decisions
//! - Every operation is a plain sequence of awaits; nothing runs in parallel
//! - No caching: every read goes back to the chain
//! - Nothing is retried; a failed step fails the operation

use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::chain::Ledger;
use crate::config::ContractConfig;
use crate::gateway::decode::{decode_certificate, decode_count, decode_id_list};
use crate::gateway::types::{
    CertificateDetails, CertificateRecord, GatewayError, GatewayResult, MintReceipt,
    SearchCriteria, VerifyReceipt,
};
use crate::observability::metrics;
use crate::storage::{DocumentFile, DocumentStore};
use crate::wallet::Session;

/// Entry point minting a new certificate.
pub const MINT_CERTIFICATE: &str = "mint_certificate";
/// Entry point marking a certificate verified.
pub const VERIFY_CERTIFICATE: &str = "verify_certificate";
/// View returning one certificate.
pub const GET_CERTIFICATE: &str = "get_certificate";
/// View returning certificate ids matching roll number, course and year.
pub const SEARCH_CERTIFICATES: &str = "search_certificates";
/// View returning the number of certificates minted.
pub const GET_CERTIFICATE_COUNT: &str = "get_certificate_count";

/// Composes the wallet session, chain and document store.
pub struct CertificateGateway<L, D> {
    contract: ContractConfig,
    document_gateway: String,
    session: Session,
    ledger: L,
    store: D,
}

impl<L: Ledger, D: DocumentStore> CertificateGateway<L, D> {
    /// `document_gateway` is the prefix used to resolve bare content
    /// identifiers found on chain.
    pub fn new(
        contract: ContractConfig,
        document_gateway: impl Into<String>,
        session: Session,
        ledger: L,
        store: D,
    ) -> Self {
        Self {
            contract,
            document_gateway: document_gateway.into(),
            session,
            ledger,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Pin the document and mint a certificate pointing at it.
    pub async fn mint(
        &self,
        details: &CertificateDetails,
        file: &DocumentFile,
    ) -> GatewayResult<MintReceipt> {
        let span = tracing::info_span!("mint", op_id = %Uuid::new_v4(), roll = %details.roll_number);
        let started = Instant::now();
        let result: GatewayResult<MintReceipt> = async {
            if !self.session.is_connected() {
                return Err(GatewayError::WalletNotConnected);
            }
            details.validate()?;

            let pinned = self.store.upload(file).await?;
            let arguments = details.to_arguments(&pinned.url);
            let hash = self
                .ledger
                .submit(&self.contract.function_id(MINT_CERTIFICATE), arguments)
                .await?;

            tracing::info!(hash = %hash, document_url = %pinned.url, "Certificate minted");
            Ok(MintReceipt {
                transaction_hash: hash,
                document_url: pinned.url,
            })
        }
        .instrument(span)
        .await;

        metrics::record_operation("mint", result.is_ok(), started);
        result
    }

    /// Mark a certificate verified. Issues exactly one submission.
    pub async fn verify(&self, certificate_id: &str) -> GatewayResult<VerifyReceipt> {
        let span = tracing::info_span!("verify", op_id = %Uuid::new_v4(), certificate_id = %certificate_id);
        let started = Instant::now();
        let result: GatewayResult<VerifyReceipt> = async {
            if !self.session.is_connected() {
                return Err(GatewayError::WalletNotConnected);
            }
            let hash = self
                .ledger
                .submit(
                    &self.contract.function_id(VERIFY_CERTIFICATE),
                    vec![certificate_id.to_string()],
                )
                .await?;

            tracing::info!(hash = %hash, "Certificate verified");
            Ok(VerifyReceipt {
                transaction_hash: hash,
            })
        }
        .instrument(span)
        .await;

        metrics::record_operation("verify", result.is_ok(), started);
        result
    }

    /// Load one certificate.
    pub async fn fetch_by_id(&self, certificate_id: &str) -> GatewayResult<CertificateRecord> {
        let result = self
            .ledger
            .view(
                &self.contract.function_id(GET_CERTIFICATE),
                vec![certificate_id.to_string()],
            )
            .await?;

        decode_certificate(certificate_id, &result, &self.document_gateway)?
            .ok_or_else(|| GatewayError::NotFound(certificate_id.to_string()))
    }

    /// Find certificates by roll number, course and year.
    ///
    /// Records come back in the order the contract listed their ids. An id
    /// whose fetch fails is logged and left out.
    pub async fn search(&self, criteria: &SearchCriteria) -> GatewayResult<Vec<CertificateRecord>> {
        let span = tracing::info_span!("search", op_id = %Uuid::new_v4(), roll = %criteria.roll_number);
        let started = Instant::now();
        let result: GatewayResult<Vec<CertificateRecord>> = async {
            let result = self
                .ledger
                .view(
                    &self.contract.function_id(SEARCH_CERTIFICATES),
                    criteria.to_arguments(),
                )
                .await?;
            let ids = decode_id_list(&result)?;
            tracing::debug!(candidates = ids.len(), "Search returned candidates");

            let mut records = Vec::with_capacity(ids.len());
            for id in ids {
                match self.fetch_by_id(&id).await {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(certificate_id = %id, error = %e, "Dropping certificate from results");
                        metrics::record_search_fetch_failure();
                    }
                }
            }
            Ok::<_, GatewayError>(records)
        }
        .instrument(span)
        .await;

        metrics::record_operation("search", result.is_ok(), started);
        result
    }

    /// Number of certificates minted so far.
    pub async fn certificate_count(&self) -> GatewayResult<u64> {
        let result = self
            .ledger
            .view(&self.contract.function_id(GET_CERTIFICATE_COUNT), Vec::new())
            .await?;
        Ok(decode_count(&result)?)
    }
}
