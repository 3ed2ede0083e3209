//! Company view: look a certificate up and attest it.

use std::fmt::Write;

use crate::chain::{Ledger, TxHash};
use crate::gateway::{CertificateGateway, CertificateRecord, Course, SearchCriteria};
use crate::storage::DocumentStore;
use crate::views::form::{render_record, render_status, FormPhase, InFlight, CONNECT_FIRST};

/// Search form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifierForm {
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: Option<u32>,
    /// Pick this certificate among the matches instead of the first one.
    pub certificate_id: Option<String>,
}

/// State of the company verification page.
#[derive(Debug, Default)]
pub struct VerifierView {
    pub form: VerifierForm,
    search_phase: FormPhase,
    result: Option<CertificateRecord>,
    verification_phase: FormPhase,
    verification_hash: Option<TxHash>,
}

impl VerifierView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_phase(&self) -> &FormPhase {
        &self.search_phase
    }

    pub fn verification_phase(&self) -> &FormPhase {
        &self.verification_phase
    }

    pub fn result(&self) -> Option<&CertificateRecord> {
        self.result.as_ref()
    }

    pub fn verification_hash(&self) -> Option<&TxHash> {
        self.verification_hash.as_ref()
    }

    /// Search by the form criteria and select one certificate.
    pub async fn search<L: Ledger, D: DocumentStore>(
        &mut self,
        gateway: &CertificateGateway<L, D>,
    ) -> &FormPhase {
        if self.search_phase.is_busy() {
            return &self.search_phase;
        }
        if !gateway.session().is_connected() {
            self.search_phase = FormPhase::Error(CONNECT_FIRST.to_string());
            return &self.search_phase;
        }
        let (roll_number, year) = match (self.form.roll_number.trim(), self.form.year_of_passing) {
            (roll, Some(year)) if !roll.is_empty() => (roll.to_string(), year),
            _ => {
                self.search_phase = FormPhase::Error("Please fill in all required fields".to_string());
                return &self.search_phase;
            }
        };
        let criteria = SearchCriteria {
            roll_number,
            course: self.form.course.clone(),
            year_of_passing: year,
        };
        if let Err(e) = criteria.validate() {
            self.search_phase = FormPhase::failed(e);
            return &self.search_phase;
        }

        self.verification_phase = FormPhase::Idle;
        self.verification_hash = None;
        let in_flight = InFlight::begin(
            &mut self.search_phase,
            "Searching for certificate on chain...",
        );

        let (outcome, result) = match gateway.search(&criteria).await {
            Ok(certificates) => select(certificates, self.form.certificate_id.as_deref()),
            Err(e) => {
                tracing::error!(error = %e, "Certificate search failed");
                (FormPhase::failed(e), None)
            }
        };
        self.result = result;
        in_flight.settle(outcome);
        &self.search_phase
    }

    /// Attest the selected certificate.
    pub async fn verify_selected<L: Ledger, D: DocumentStore>(
        &mut self,
        gateway: &CertificateGateway<L, D>,
    ) -> &FormPhase {
        if self.verification_phase.is_busy() {
            return &self.verification_phase;
        }
        let id = match &self.result {
            Some(record) if gateway.session().is_connected() => {
                if record.is_verified {
                    self.verification_phase =
                        FormPhase::Error("Certificate is already verified".to_string());
                    return &self.verification_phase;
                }
                record.id.clone()
            }
            _ => {
                self.verification_phase = FormPhase::Error(
                    "Please search for a certificate first and ensure wallet is connected"
                        .to_string(),
                );
                return &self.verification_phase;
            }
        };

        let in_flight = InFlight::begin(
            &mut self.verification_phase,
            "Verifying certificate on chain...",
        );
        match gateway.verify(&id).await {
            Ok(receipt) => {
                if let Some(record) = self.result.as_mut() {
                    record.is_verified = true;
                    record.verified_by = gateway.session().account();
                }
                self.verification_hash = Some(receipt.transaction_hash);
                in_flight.settle(FormPhase::Success(
                    "Certificate verified successfully!".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, certificate_id = %id, "Verification failed");
                in_flight.settle(FormPhase::failed(e));
            }
        }
        &self.verification_phase
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        render_status(&mut out, &self.search_phase);
        if let Some(record) = &self.result {
            out.push('\n');
            render_record(&mut out, record);
        }
        render_status(&mut out, &self.verification_phase);
        if let Some(hash) = &self.verification_hash {
            let _ = writeln!(out, "Verification Hash: {}", hash);
        }
        out
    }
}

/// Pick the requested certificate, or the first one when no id is given.
fn select(
    certificates: Vec<CertificateRecord>,
    wanted: Option<&str>,
) -> (FormPhase, Option<CertificateRecord>) {
    if certificates.is_empty() {
        return (
            FormPhase::Error("No certificates found for the given criteria".to_string()),
            None,
        );
    }
    let selected = match wanted.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => certificates.into_iter().find(|c| c.id == id),
        None => certificates.into_iter().next(),
    };
    match selected {
        Some(record) => (FormPhase::Success("Certificate found!".to_string()), Some(record)),
        None => (
            FormPhase::Error("Certificate ID does not match any found certificates".to_string()),
            None,
        ),
    }
}
