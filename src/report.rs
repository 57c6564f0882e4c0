//! Rendering of a move plan
//!
//! A `MovePlan` gathers every summary view of a filtering pass. It is printed as
//! tables for people or as JSON for scripts.

use crate::error::Result;
use crate::filter::{FilterOptions, FilterOutcome};
use comfy_table::{Cell, Table};
use console::style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingResource {
    pub terraform_id: String,
    pub azure_id: String,
}

/// Everything a caller needs to decide on and carry out a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub source_subscription_id: String,
    pub source_resource_group: Option<String>,
    pub target_subscription_id: String,
    pub target_resource_group: String,
    pub not_supported: Vec<String>,
    pub no_movement_needed: Vec<String>,
    pub blocking: Vec<BlockingResource>,
    pub movable_on_azure: Vec<String>,
    pub to_correct: BTreeMap<String, String>,
}

impl MovePlan {
    pub fn new(options: &FilterOptions, outcome: &FilterOutcome) -> Self {
        let summaries = &outcome.summaries;
        let (blocking_tf, blocking_azure) = summaries.blocking_movement();
        Self {
            source_subscription_id: options.source_subscription_id.clone(),
            source_resource_group: outcome.source_resource_group.clone(),
            target_subscription_id: options.target_subscription_id.clone(),
            target_resource_group: options.target_resource_group.clone(),
            not_supported: summaries.not_supported(),
            no_movement_needed: summaries.no_movement_needed(),
            blocking: blocking_tf
                .into_iter()
                .zip(blocking_azure)
                .map(|(terraform_id, azure_id)| BlockingResource {
                    terraform_id,
                    azure_id,
                })
                .collect(),
            movable_on_azure: summaries.movable_on_azure(),
            to_correct: summaries.to_correct_in_tf_state(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }

    /// Nothing to move on Azure and nothing to correct in the state.
    pub fn is_empty(&self) -> bool {
        self.movable_on_azure.is_empty() && self.to_correct.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Text rendering with tables and colored warnings.
impl fmt::Display for MovePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source_resource_group.as_deref().unwrap_or("*");

        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "Move Plan")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(
            f,
            "From: {} / {}",
            style(&self.source_subscription_id).dim(),
            style(source).bold().cyan()
        )?;
        writeln!(
            f,
            "To:   {} / {}",
            style(&self.target_subscription_id).dim(),
            style(&self.target_resource_group).bold().cyan()
        )?;
        writeln!(f)?;

        if !self.not_supported.is_empty() {
            writeln!(
                f,
                "{} not supported for movement, these stay where they are:",
                style("WARNING:").yellow().bold()
            )?;
            for id in &self.not_supported {
                writeln!(f, "  - {}", id)?;
            }
            writeln!(f)?;
        }

        if !self.no_movement_needed.is_empty() {
            writeln!(f, "No movement needed:")?;
            for id in &self.no_movement_needed {
                writeln!(f, "  - {}", id)?;
            }
            writeln!(f)?;
        }

        if self.is_blocked() {
            writeln!(
                f,
                "{} these resources block the movement, remove them from the state first:",
                style("ERROR:").red().bold()
            )?;
            let mut table = Table::new();
            table.set_header(vec!["Terraform ID", "Azure ID"]);
            for b in &self.blocking {
                table.add_row(vec![
                    Cell::new(&b.terraform_id).fg(comfy_table::Color::Red),
                    Cell::new(&b.azure_id),
                ]);
            }
            writeln!(f, "{}", table)?;
            writeln!(f)?;
        }

        writeln!(
            f,
            "Resources to move on Azure: {}",
            self.movable_on_azure.len()
        )?;
        for id in &self.movable_on_azure {
            writeln!(f, "  - {}", id)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "IDs to correct in the Terraform state: {}",
            self.to_correct.len()
        )?;
        if !self.to_correct.is_empty() {
            let mut table = Table::new();
            table.set_header(vec!["Terraform ID", "New Azure ID"]);
            for (terraform_id, future_id) in &self.to_correct {
                table.add_row(vec![Cell::new(terraform_id), Cell::new(future_id)]);
            }
            writeln!(f, "{}", table)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{ResourceInstanceSummaries, ResourceInstanceSummary};

    fn summary(
        resource_type: &str,
        name: &str,
        azure_id: &str,
        future_azure_id: &str,
    ) -> ResourceInstanceSummary {
        ResourceInstanceSummary {
            azure_id: azure_id.to_string(),
            future_azure_id: future_azure_id.to_string(),
            terraform_id: format!("{}.{}", resource_type, name),
            resource_type: resource_type.to_string(),
        }
    }

    fn plan() -> MovePlan {
        let options = FilterOptions {
            source_subscription_id: "s1".to_string(),
            target_resource_group: "output-rg".to_string(),
            target_subscription_id: "s1".to_string(),
            ..Default::default()
        };
        let outcome = FilterOutcome {
            summaries: ResourceInstanceSummaries::new(vec![
                summary(
                    "azurerm_virtual_machine",
                    "vm",
                    "/subscriptions/s1/resourceGroups/input-rg/p/vm1",
                    "/subscriptions/s1/resourceGroups/output-rg/p/vm1",
                ),
                summary(
                    "azurerm_app_service_virtual_network_swift_connection",
                    "c",
                    "/subscriptions/s1/resourceGroups/input-rg/p/app/c",
                    "/subscriptions/s1/resourceGroups/output-rg/p/app/c",
                ),
            ]),
            source_resource_group: Some("input-rg".to_string()),
        };
        MovePlan::new(&options, &outcome)
    }

    #[test]
    fn test_plan_collects_views() {
        let plan = plan();
        assert!(plan.is_blocked());
        assert!(!plan.is_empty());
        assert_eq!(plan.movable_on_azure.len(), 1);
        assert_eq!(
            plan.blocking[0].terraform_id,
            "azurerm_app_service_virtual_network_swift_connection.c"
        );
        assert_eq!(
            plan.to_correct.get("azurerm_virtual_machine.vm").map(String::as_str),
            Some("/subscriptions/s1/resourceGroups/output-rg/p/vm1")
        );
    }

    #[test]
    fn test_render_text_mentions_everything() {
        let text = plan().to_string();
        assert!(text.contains("input-rg"));
        assert!(text.contains("output-rg"));
        assert!(text.contains("azurerm_app_service_virtual_network_swift_connection.c"));
        assert!(text.contains("Resources to move on Azure: 1"));
        assert!(text.contains("IDs to correct in the Terraform state: 1"));
    }

    #[test]
    fn test_json_round_trip() {
        let plan = plan();
        let parsed: MovePlan = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(parsed, plan);
    }
}
