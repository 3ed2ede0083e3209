//! Form state shared by the role views.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::gateway::CertificateRecord;

/// Message shown when an action needs a wallet.
pub const CONNECT_FIRST: &str = "Please connect your wallet first";

/// Lifecycle of a form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    /// An operation is in flight; the triggering control stays disabled.
    Submitting(String),
    Success(String),
    Error(String),
}

impl FormPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, FormPhase::Submitting(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormPhase::Error(_))
    }

    /// The status line, if there is one.
    pub fn status(&self) -> Option<&str> {
        match self {
            FormPhase::Idle => None,
            FormPhase::Submitting(msg) | FormPhase::Success(msg) | FormPhase::Error(msg) => {
                Some(msg)
            }
        }
    }

    /// Error phase for a failed operation.
    pub(crate) fn failed(error: impl std::fmt::Display) -> Self {
        FormPhase::Error(format!("Error: {}", error))
    }
}

/// Holds a phase at `Submitting` while an operation runs.
///
/// If the operation's future is dropped before [`InFlight::settle`] the
/// phase goes back to `Idle`, so the form is usable again.
pub(crate) struct InFlight<'a> {
    phase: &'a mut FormPhase,
    settled: bool,
}

impl<'a> InFlight<'a> {
    pub(crate) fn begin(phase: &'a mut FormPhase, message: &str) -> Self {
        *phase = FormPhase::Submitting(message.to_string());
        Self {
            phase,
            settled: false,
        }
    }

    pub(crate) fn settle(mut self, outcome: FormPhase) {
        *self.phase = outcome;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.phase = FormPhase::Idle;
        }
    }
}

pub(crate) fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Certificate details block shared by the verifier and holder views.
pub(crate) fn render_record(out: &mut String, record: &CertificateRecord) {
    let _ = writeln!(out, "Certificate ID:  {}", record.id);
    let _ = writeln!(out, "Student Name:    {}", record.student_name);
    let _ = writeln!(out, "Roll Number:     {}", record.roll_number);
    let _ = writeln!(out, "Course:          {}", record.course);
    let _ = writeln!(out, "Year of Passing: {}", record.year_of_passing);
    let _ = writeln!(out, "Status:          {}", record.status());
    let _ = writeln!(out, "Document:        {}", record.document_url);
    if let Some(issuer) = record.issuer {
        let _ = writeln!(out, "Uploaded By:     {}", issuer.short());
    }
    let _ = writeln!(out, "Uploaded At:     {}", format_date(record.minted_at));
    if let Some(verifier) = record.verified_by {
        let _ = writeln!(out, "Verified By:     {}", verifier.short());
    }
    if record.verified_at.is_some() {
        let _ = writeln!(out, "Verified At:     {}", format_date(record.verified_at));
    }
}

pub(crate) fn render_status(out: &mut String, phase: &FormPhase) {
    if let Some(status) = phase.status() {
        let _ = writeln!(out, "{}", status);
    }
}
