//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, document size within 1..=10 MiB)
//! - Check URLs and addresses are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegistryConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::RegistryConfig;
use crate::storage::MAX_DOCUMENT_SIZE;
use crate::wallet::AccountAddress;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is {value}, the limit is {max}")]
    AboveLimit {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("{field}: invalid account address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("contract.module_name must not be empty")]
    EmptyModuleName,

    #[error("wallet.key_file and wallet.account_address must be set together")]
    IncompleteKeystore,

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let urls = [
        ("chain.mainnet_url", &config.chain.mainnet_url),
        ("chain.testnet_url", &config.chain.testnet_url),
        ("storage.pin_url", &config.storage.pin_url),
        ("storage.gateway_prefix", &config.storage.gateway_prefix),
    ];
    for (field, value) in urls {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    let positives = [
        ("chain.request_timeout_secs", config.chain.request_timeout_secs),
        ("chain.confirmation_timeout_secs", config.chain.confirmation_timeout_secs),
        ("chain.poll_interval_ms", config.chain.poll_interval_ms),
        ("storage.max_file_size", config.storage.max_file_size),
        ("storage.upload_timeout_secs", config.storage.upload_timeout_secs),
        ("wallet.max_gas_amount", config.wallet.max_gas_amount),
        ("wallet.expiration_secs", config.wallet.expiration_secs),
    ];
    for (field, value) in positives {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.storage.max_file_size > MAX_DOCUMENT_SIZE {
        errors.push(ValidationError::AboveLimit {
            field: "storage.max_file_size",
            value: config.storage.max_file_size,
            max: MAX_DOCUMENT_SIZE,
        });
    }

    if config.contract.module_address.parse::<AccountAddress>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "contract.module_address",
            value: config.contract.module_address.clone(),
        });
    }
    if config.contract.module_name.trim().is_empty() {
        errors.push(ValidationError::EmptyModuleName);
    }

    match (&config.wallet.key_file, &config.wallet.account_address) {
        (Some(_), Some(address)) => {
            if address.parse::<AccountAddress>().is_err() {
                errors.push(ValidationError::InvalidAddress {
                    field: "wallet.account_address",
                    value: address.clone(),
                });
            }
        }
        (None, None) => {}
        _ => errors.push(ValidationError::IncompleteKeystore),
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
