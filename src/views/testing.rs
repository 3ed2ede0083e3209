//! In-memory ledger and store shared by the view tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::chain::{ChainError, ChainResult, Ledger, TxHash};
use crate::config::ContractConfig;
use crate::gateway::CertificateGateway;
use crate::storage::{DocumentFile, DocumentStore, PinnedDocument, StoreError};
use crate::wallet::{AccountAddress, Network, Session};

#[derive(Default)]
pub struct FakeLedger {
    pub submissions: Mutex<Vec<(String, Vec<String>)>>,
    pub ids: Vec<String>,
    pub certificates: HashMap<String, Value>,
    pub reject_submissions: bool,
    /// While set, every call waits forever.
    pub hang: AtomicBool,
}

impl FakeLedger {
    pub fn with(certificates: &[(&str, Value)]) -> Self {
        Self {
            ids: certificates.iter().map(|(id, _)| id.to_string()).collect(),
            certificates: certificates
                .iter()
                .map(|(id, value)| (id.to_string(), value.clone()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn set_hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    async fn maybe_hang(&self) {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    pub fn submitted(&self) -> Vec<(String, Vec<String>)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn submit(&self, function: &str, arguments: Vec<String>) -> ChainResult<TxHash> {
        self.maybe_hang().await;
        if self.reject_submissions {
            return Err(ChainError::SubmissionRejected("User rejected the request".into()));
        }
        self.submissions
            .lock()
            .unwrap()
            .push((function.to_string(), arguments));
        Ok(TxHash::new("0xfeed"))
    }

    async fn view(&self, function: &str, arguments: Vec<String>) -> ChainResult<Vec<Value>> {
        self.maybe_hang().await;
        if function.ends_with("::search_certificates") {
            return Ok(vec![json!(self.ids)]);
        }
        Ok(self.certificates.get(&arguments[0]).cloned().into_iter().collect())
    }
}

pub struct FakeStore {
    pub uploads: Mutex<u32>,
    pub fail_with: Option<String>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            uploads: Mutex::new(0),
            fail_with: None,
        }
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn upload(&self, file: &DocumentFile) -> Result<PinnedDocument, StoreError> {
        *self.uploads.lock().unwrap() += 1;
        if let Some(reason) = &self.fail_with {
            return Err(StoreError::UploadRejected(reason.clone()));
        }
        Ok(PinnedDocument {
            cid: "QmFake".to_string(),
            url: "https://gateway.pinata.cloud/ipfs/QmFake".to_string(),
            size: file.len(),
        })
    }
}

pub fn certificate(name: &str, verified: bool) -> Value {
    json!({
        "student_name": name,
        "roll_number": "21CS001",
        "course": "CSE",
        "year_of_passing": "2024",
        "ipfs_cid": "QmFake",
        "is_verified": verified,
        "issuer": "0xa11ce",
        "mint_time": "1735689600",
        "verified_by": if verified { "0xb0b" } else { "0x0" },
        "verified_time": if verified { "1735776000" } else { "0" }
    })
}

pub fn connected() -> Session {
    let session = Session::new(Network::Testnet);
    session.set_connected(AccountAddress::new([7u8; 32]), Network::Testnet);
    session
}

pub fn gateway(
    session: Session,
    ledger: Arc<FakeLedger>,
    store: Arc<FakeStore>,
) -> CertificateGateway<Arc<FakeLedger>, Arc<FakeStore>> {
    CertificateGateway::new(
        ContractConfig::default(),
        "https://gateway.pinata.cloud/ipfs/",
        session,
        ledger,
        store,
    )
}

pub fn pdf() -> DocumentFile {
    DocumentFile::new("degree.pdf", bytes::Bytes::from_static(b"%PDF-1.7")).unwrap()
}
