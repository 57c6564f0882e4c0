//! Input validation utilities
//!
//! Checks the values passed on the command line before the state is filtered,
//! so a typo fails with a clear message instead of an empty or surprising plan.

use crate::error::{MoveError, Result};
use crate::filter::WILDCARD;
use regex::Regex;

/// Validate Azure subscription ID format
///
/// Subscription IDs are GUIDs: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` (hexadecimal).
pub fn validate_subscription_id(subscription_id: &str) -> Result<()> {
    let guid = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .map_err(|e| MoveError::Validation {
        field: "subscription_id".to_string(),
        reason: e.to_string(),
    })?;

    if !guid.is_match(subscription_id) {
        return Err(MoveError::Validation {
            field: "subscription_id".to_string(),
            reason: format!(
                "Subscription ID must be a GUID like 00000000-0000-0000-0000-000000000000, got: {}",
                subscription_id
            ),
        });
    }

    Ok(())
}

/// Validate resource group name
///
/// Resource group names are 1-90 characters of letters, digits, `-`, `_`, `.`,
/// `(` and `)`, and cannot end with a period.
pub fn validate_resource_group_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MoveError::Validation {
            field: field.to_string(),
            reason: "Resource group name cannot be empty".to_string(),
        });
    }

    if name.chars().count() > 90 {
        return Err(MoveError::Validation {
            field: field.to_string(),
            reason: format!(
                "Resource group name must be <= 90 characters, got: {} (len: {})",
                name,
                name.chars().count()
            ),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
    {
        return Err(MoveError::Validation {
            field: field.to_string(),
            reason: format!("Resource group name can only contain letters, digits, hyphens, underscores, periods and parentheses, got: {}", name),
        });
    }

    if name.ends_with('.') {
        return Err(MoveError::Validation {
            field: field.to_string(),
            reason: format!("Resource group name cannot end with a period, got: {}", name),
        });
    }

    Ok(())
}

/// Validate the `--resource-group` filter, which also accepts `*`.
pub fn validate_resource_group_filter(filter: &str) -> Result<()> {
    if filter == WILDCARD {
        return Ok(());
    }
    validate_resource_group_name("resource_group", filter)
}

/// Validate a module filter
///
/// Module paths look like `module.network` or `module.app.module.db`.
pub fn validate_module_filter(filter: &str) -> Result<()> {
    if filter.is_empty() || filter == WILDCARD || filter.starts_with("module.") {
        return Ok(());
    }

    Err(MoveError::Validation {
        field: "module".to_string(),
        reason: format!(
            "Module filter must start with 'module.', got: {} (for example: module.network)",
            filter
        ),
    })
}
