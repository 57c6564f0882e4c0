//! Error types for aztfmove
//!
//! This module defines the error handling strategy for aztfmove. There are two
//! error types: `MoveError` (main error enum) and `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `MoveError`.
//! The binary uses `anyhow::Result<T>` for top-level error handling. The conversion
//! happens at the CLI boundary so the error chain is kept intact.
//!
//! ## Selection Errors
//!
//! Five variants describe a selection that cannot be moved as a whole:
//! `MissingSubscriptionId`, `SubscriptionMismatch`, `MissingResourceGroup`,
//! `ResourceGroupConflict` and `AlreadyInTargetResourceGroup`. Each one aborts the
//! entire filtering pass and names the offending instance by its Terraform address.
//! They are data-consistency problems in the state file or in the flags passed in,
//! so nothing is ever retried.
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: Configuration parsing and validation issues
//!   - Automatically converted to `MoveError::Config` via `#[from]`
//!
//! - `Validation`: CLI input validation failures (subscription IDs, group names)
//!
//! - `BlockingResources`: the selection contains resources that must be removed
//!   from the state before Azure accepts the move

use thiserror::Error;

/// Main error type for aztfmove
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("subscription ID is not found for {terraform_id}, its ID does not start with /subscriptions/<id>")]
    MissingSubscriptionId { terraform_id: String },

    #[error("resource instance `{terraform_id}` has a different subscription specified, unable to start moving. Resource instance subscription ID: {found}, specified subscription ID: {expected}")]
    SubscriptionMismatch {
        terraform_id: String,
        found: String,
        expected: String,
    },

    #[error("resource group is not found for {terraform_id}, its ID does not contain a resourceGroups segment")]
    MissingResourceGroup { terraform_id: String },

    #[error("multiple resource groups found within your selection, unable to start moving. Resource groups found: [{first}, {second}] (at {terraform_id})")]
    ResourceGroupConflict {
        terraform_id: String,
        first: String,
        second: String,
    },

    #[error("the selected resource {terraform_id} is already in the target resource group")]
    AlreadyInTargetResourceGroup { terraform_id: String },

    #[error("resources blocking the movement must be removed from the state first: {}", terraform_ids.join(", "))]
    BlockingResources { terraform_ids: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MoveError {
    /// True for the errors produced by the filtering pass itself.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            MoveError::MissingSubscriptionId { .. }
                | MoveError::SubscriptionMismatch { .. }
                | MoveError::MissingResourceGroup { .. }
                | MoveError::ResourceGroupConflict { .. }
                | MoveError::AlreadyInTargetResourceGroup { .. }
        )
    }

    /// Terraform address of the instance that caused a selection error.
    pub fn terraform_id(&self) -> Option<&str> {
        match self {
            MoveError::MissingSubscriptionId { terraform_id }
            | MoveError::SubscriptionMismatch { terraform_id, .. }
            | MoveError::MissingResourceGroup { terraform_id }
            | MoveError::ResourceGroupConflict { terraform_id, .. }
            | MoveError::AlreadyInTargetResourceGroup { terraform_id } => Some(terraform_id),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MoveError>;
