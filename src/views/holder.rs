//! Student view: retrieve your own certificate.

use std::fmt::Write;

use crate::chain::Ledger;
use crate::gateway::{CertificateGateway, CertificateRecord, Course, SearchCriteria};
use crate::storage::DocumentStore;
use crate::views::form::{
    format_date, render_record, render_status, FormPhase, InFlight, CONNECT_FIRST,
};

/// Retrieval form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderForm {
    pub name: String,
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: Option<u32>,
}

/// State of the student retrieval page.
#[derive(Debug, Default)]
pub struct HolderView {
    pub form: HolderForm,
    phase: FormPhase,
    result: Option<CertificateRecord>,
}

impl HolderView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn result(&self) -> Option<&CertificateRecord> {
        self.result.as_ref()
    }

    /// Search by criteria and keep the match whose name equals the form's,
    /// ignoring case.
    pub async fn search<L: Ledger, D: DocumentStore>(
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
        let name = self.form.name.trim().to_lowercase();
        let roll_number = self.form.roll_number.trim().to_string();
        let year = match self.form.year_of_passing {
            Some(year) if !name.is_empty() && !roll_number.is_empty() => year,
            _ => {
                self.phase = FormPhase::Error("Please fill in all required fields".to_string());
                return &self.phase;
            }
        };
        let criteria = SearchCriteria {
            roll_number,
            course: self.form.course.clone(),
            year_of_passing: year,
        };
        if let Err(e) = criteria.validate() {
            self.phase = FormPhase::failed(e);
            return &self.phase;
        }

        self.result = None;
        let in_flight = InFlight::begin(
            &mut self.phase,
            "Searching for your certificate on chain...",
        );

        let outcome = match gateway.search(&criteria).await {
            Ok(certificates) if certificates.is_empty() => {
                FormPhase::Error("No certificates found for the given criteria".to_string())
            }
            Ok(certificates) => {
                match certificates
                    .into_iter()
                    .find(|c| c.student_name.trim().to_lowercase() == name)
                {
                    Some(record) => {
                        self.result = Some(record);
                        FormPhase::Success("Certificate found!".to_string())
                    }
                    None => FormPhase::Error(
                        "No certificate found for the given name and details".to_string(),
                    ),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Certificate search failed");
                FormPhase::failed(e)
            }
        };
        in_flight.settle(outcome);
        &self.phase
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        render_status(&mut out, &self.phase);
        if let Some(record) = &self.result {
            out.push('\n');
            render_record(&mut out, record);
            if record.is_verified {
                let _ = writeln!(out, "\nVerification History");
                let _ = writeln!(out, "  Verified By: on-chain attestation");
                let _ = writeln!(out, "  Verified At: {}", format_date(record.verified_at));
                let _ = writeln!(out, "  Method:      blockchain");
                let _ = writeln!(
                    out,
                    "\nYour certificate has been verified and is recorded on chain."
                );
            }
        }
        out
    }
}
