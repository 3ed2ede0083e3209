//! Decoding of view-function results into certificate records.
//!
//! The fullnode renders `u64` values as decimal strings, Move `Option`s as
//! `{"vec": [...]}`, and unset addresses as `"0x0"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::chain::ChainError;
use crate::gateway::types::{CertificateRecord, Course};
use crate::wallet::AccountAddress;

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Value {
    Number(u64),
    Text(String),
}

impl U64Value {
    fn get(self) -> Result<u64, String> {
        match self {
            U64Value::Number(n) => Ok(n),
            U64Value::Text(s) => s.trim().parse().map_err(|_| format!("not an integer: {}", s)),
        }
    }
}

fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    U64Value::deserialize(deserializer)?
        .get()
        .map_err(serde::de::Error::custom)
}

fn de_opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<U64Value>::deserialize(deserializer)? {
        Some(value) => value.get().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
struct RawCertificate {
    student_name: String,
    roll_number: String,
    course: String,
    #[serde(deserialize_with = "de_u64")]
    year_of_passing: u64,
    #[serde(alias = "ipfs_url", alias = "document_url")]
    ipfs_cid: String,
    #[serde(default)]
    is_verified: bool,
    #[serde(default, alias = "uploaded_by")]
    issuer: Option<String>,
    #[serde(default, alias = "uploaded_at", deserialize_with = "de_opt_u64")]
    mint_time: Option<u64>,
    #[serde(default)]
    verified_by: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    verified_time: Option<u64>,
}

/// Unwrap a Move `Option` rendered as `{"vec": [...]}`.
fn unwrap_option(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.len() == 1 && map.contains_key("vec") => {
            map.get("vec")?.as_array()?.first()
        }
        other => Some(other),
    }
}

/// An address field, with the zero address meaning "unset".
fn address(value: Option<String>) -> Option<AccountAddress> {
    value
        .and_then(|s| s.parse::<AccountAddress>().ok())
        .filter(|a| !a.is_zero())
}

/// A seconds timestamp, with zero meaning "unset".
fn timestamp(secs: Option<u64>) -> Option<DateTime<Utc>> {
    secs.filter(|s| *s > 0)
        .and_then(|s| DateTime::from_timestamp(s as i64, 0))
}

/// Build a retrieval URL from a stored reference that is either a full
/// URL or a bare content identifier.
pub fn document_url(reference: &str, gateway_prefix: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        reference.to_string()
    } else {
        format!("{}/{}", gateway_prefix.trim_end_matches('/'), reference)
    }
}

/// Decode the result of `get_certificate`. `Ok(None)` for empty results.
pub fn decode_certificate(
    id: &str,
    result: &[Value],
    gateway_prefix: &str,
) -> Result<Option<CertificateRecord>, ChainError> {
    let Some(value) = result.first().and_then(unwrap_option) else {
        return Ok(None);
    };

    let raw: RawCertificate = serde_json::from_value(value.clone())
        .map_err(|e| ChainError::Decode(format!("certificate {}: {}", id, e)))?;

    if raw.student_name.is_empty() && raw.roll_number.is_empty() {
        return Ok(None);
    }

    let year_of_passing = u32::try_from(raw.year_of_passing)
        .map_err(|_| ChainError::Decode(format!("certificate {}: year out of range", id)))?;

    Ok(Some(CertificateRecord {
        id: id.to_string(),
        student_name: raw.student_name,
        roll_number: raw.roll_number,
        course: Course::from_chain(&raw.course),
        year_of_passing,
        document_url: document_url(&raw.ipfs_cid, gateway_prefix),
        is_verified: raw.is_verified,
        issuer: address(raw.issuer),
        minted_at: timestamp(raw.mint_time),
        verified_by: address(raw.verified_by),
        verified_at: timestamp(raw.verified_time),
    }))
}

/// Decode the identifier list returned by `search_certificates`.
pub fn decode_id_list(result: &[Value]) -> Result<Vec<String>, ChainError> {
    let Some(first) = result.first() else {
        return Ok(Vec::new());
    };
    let items = first
        .as_array()
        .ok_or_else(|| ChainError::Decode(format!("expected an id list, got {}", first)))?;

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(ChainError::Decode(format!("unexpected certificate id {}", other))),
        })
        .collect()
}

/// Decode a single `u64` result such as `get_certificate_count`.
pub fn decode_count(result: &[Value]) -> Result<u64, ChainError> {
    let first = result
        .first()
        .ok_or_else(|| ChainError::Decode("empty view result".to_string()))?;
    U64Value::deserialize(first)
        .map_err(|e| ChainError::Decode(e.to_string()))?
        .get()
        .map_err(ChainError::Decode)
}
