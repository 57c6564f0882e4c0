//! aztfmove library
//!
//! Decides which Azure resources in a Terraform state can be moved to another
//! resource group, and which IDs in the state have to change afterwards.

pub mod azure_id;
pub mod classification;
pub mod commands;
pub mod config;
pub mod correction;
pub mod error;
pub mod filter;
pub mod report;
pub mod state;
pub mod summary;
pub mod validation;

// Re-export commonly used types
pub use error::{MoveError, Result};
pub use filter::{FilterOptions, FilterOutcome, WILDCARD};
pub use state::TerraformState;
pub use summary::{ResourceInstanceSummaries, ResourceInstanceSummary};
