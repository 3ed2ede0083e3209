//! College view: mint certificates.

use std::fmt::Write;

use crate::chain::Ledger;
use crate::gateway::types::current_year;
use crate::gateway::{CertificateDetails, CertificateGateway, Course, MintReceipt};
use crate::storage::{DocumentFile, DocumentStore};
use crate::views::form::{render_status, FormPhase, InFlight, CONNECT_FIRST};

/// Mint form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerForm {
    pub student_name: String,
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: u32,
}

impl Default for IssuerForm {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            roll_number: String::new(),
            course: Course::Cse,
            year_of_passing: current_year(),
        }
    }
}

impl IssuerForm {
    fn details(&self) -> CertificateDetails {
        CertificateDetails {
            student_name: self.student_name.clone(),
            roll_number: self.roll_number.clone(),
            course: self.course.clone(),
            year_of_passing: self.year_of_passing,
        }
    }
}

/// State of the college upload form.
#[derive(Debug, Default)]
pub struct IssuerView {
    pub form: IssuerForm,
    file: Option<DocumentFile>,
    phase: FormPhase,
    receipt: Option<MintReceipt>,
}

impl IssuerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, file: DocumentFile) {
        self.phase = FormPhase::Idle;
        self.file = Some(file);
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn receipt(&self) -> Option<&MintReceipt> {
        self.receipt.as_ref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit<L: Ledger, D: DocumentStore>(&self, gateway: &CertificateGateway<L, D>) -> bool {
        gateway.session().is_connected() && !self.phase.is_busy()
    }

    /// Upload the selected file and mint. The form resets on success.
    pub async fn submit<L: Ledger, D: DocumentStore>(
        &mut self,
        gateway: &CertificateGateway<L, D>,
    ) -> &FormPhase {
        if self.phase.is_busy() {
            return &self.phase;
        }
        if !gateway.session().is_connected() {
            self.phase = FormPhase::Error(CONNECT_FIRST.to_string());
            return &self.phase;
        }
        let Some(file) = self.file.as_ref() else {
            self.phase = FormPhase::Error("Please select a certificate file".to_string());
            return &self.phase;
        };

        let details = self.form.details();
        let in_flight = InFlight::begin(
            &mut self.phase,
            "Uploading certificate to IPFS and the blockchain...",
        );
        match gateway.mint(&details, file).await {
            Ok(receipt) => {
                in_flight.settle(FormPhase::Success(
                    "Certificate uploaded successfully!".to_string(),
                ));
                self.receipt = Some(receipt);
                self.form = IssuerForm::default();
                self.file = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Certificate upload failed");
                in_flight.settle(FormPhase::failed(e));
            }
        }
        &self.phase
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(file) = &self.file {
            let _ = writeln!(out, "Selected: {}", file.name());
        }
        render_status(&mut out, &self.phase);
        if let Some(receipt) = &self.receipt {
            let _ = writeln!(out, "Transaction Hash: {}", receipt.transaction_hash);
            let _ = writeln!(out, "Document URL:     {}", receipt.document_url);
        }
        out
    }
}
