//! Certificate domain types and gateway errors.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::chain::{ChainError, TxHash};
use crate::storage::StoreError;
use crate::wallet::AccountAddress;

/// Earliest accepted year of passing.
pub const MIN_YEAR: u32 = 2000;

/// How far into the future a year of passing may be minted.
pub const FUTURE_YEARS: u32 = 5;

/// Courses offered by issuing colleges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[default]
    Cse,
    It,
    Eee,
    Ece,
    Me,
    Ce,
    /// A course string stored on chain that this client does not know.
    Other(String),
}

impl Course {
    /// The courses offered in forms.
    pub const ALL: [Course; 6] = [
        Course::Cse,
        Course::It,
        Course::Eee,
        Course::Ece,
        Course::Me,
        Course::Ce,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Course::Cse => "CSE",
            Course::It => "IT",
            Course::Eee => "EEE",
            Course::Ece => "ECE",
            Course::Me => "ME",
            Course::Ce => "CE",
            Course::Other(code) => code,
        }
    }

    /// Decode an on-chain course code, keeping unknown codes verbatim.
    pub fn from_chain(code: &str) -> Self {
        code.parse().unwrap_or_else(|_| Course::Other(code.to_string()))
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for course codes outside the offered set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown course '{0}' (expected one of CSE, IT, EEE, ECE, ME, CE)")]
pub struct UnknownCourse(pub String);

impl FromStr for Course {
    type Err = UnknownCourse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CSE" => Ok(Course::Cse),
            "IT" => Ok(Course::It),
            "EEE" => Ok(Course::Eee),
            "ECE" => Ok(Course::Ece),
            "ME" => Ok(Course::Me),
            "CE" => Ok(Course::Ce),
            _ => Err(UnknownCourse(s.to_string())),
        }
    }
}

/// Input for minting a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    pub student_name: String,
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: u32,
}

impl CertificateDetails {
    /// Check the details against the accepted ranges.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.student_name.trim().is_empty() {
            return Err(GatewayError::InvalidInput("student name is required".into()));
        }
        if self.roll_number.trim().is_empty() {
            return Err(GatewayError::InvalidInput("roll number is required".into()));
        }
        if let Course::Other(code) = &self.course {
            return Err(GatewayError::InvalidInput(UnknownCourse(code.clone()).to_string()));
        }
        let max = current_year() + FUTURE_YEARS;
        if !(MIN_YEAR..=max).contains(&self.year_of_passing) {
            return Err(GatewayError::InvalidInput(format!(
                "year of passing must be between {} and {}",
                MIN_YEAR, max
            )));
        }
        Ok(())
    }

    /// Contract arguments, in the order the mint entry point expects.
    pub fn to_arguments(&self, document_url: &str) -> Vec<String> {
        vec![
            self.student_name.trim().to_string(),
            self.roll_number.trim().to_string(),
            self.course.as_str().to_string(),
            self.year_of_passing.to_string(),
            document_url.to_string(),
        ]
    }
}

/// Search input shared by the verifier and holder views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: u32,
}

impl SearchCriteria {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.roll_number.trim().is_empty() {
            return Err(GatewayError::InvalidInput("roll number is required".into()));
        }
        let max = current_year();
        if !(MIN_YEAR..=max).contains(&self.year_of_passing) {
            return Err(GatewayError::InvalidInput(format!(
                "year of passing must be between {} and {}",
                MIN_YEAR, max
            )));
        }
        Ok(())
    }

    pub fn to_arguments(&self) -> Vec<String> {
        vec![
            self.roll_number.trim().to_string(),
            self.course.as_str().to_string(),
            self.year_of_passing.to_string(),
        ]
    }
}

/// A certificate as stored on chain, annotated with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub id: String,
    pub student_name: String,
    pub roll_number: String,
    pub course: Course,
    pub year_of_passing: u32,
    pub document_url: String,
    pub is_verified: bool,
    pub issuer: Option<AccountAddress>,
    pub minted_at: Option<DateTime<Utc>>,
    pub verified_by: Option<AccountAddress>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl CertificateRecord {
    /// "verified" or "minted".
    pub fn status(&self) -> &'static str {
        if self.is_verified {
            "verified"
        } else {
            "minted"
        }
    }
}

/// Result of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintReceipt {
    pub transaction_hash: TxHash,
    pub document_url: String,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReceipt {
    pub transaction_hash: TxHash,
}

/// Errors surfaced by gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Certificate {0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

pub(crate) fn current_year() -> u32 {
    Utc::now().year() as u32
}
