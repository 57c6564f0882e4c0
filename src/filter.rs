//! Selection of the resource instances to move
//!
//! `TerraformState::filter` walks the state once, keeps the azurerm instances
//! matching the resource, module and resource group filters, checks that the
//! selection lives in a single subscription and a single source resource group,
//! and predicts the Azure ID each instance will have after the move.
//!
//! Any inconsistency aborts the whole pass. A partially validated selection is
//! never returned.

use crate::azure_id;
use crate::classification::{is_movement_eligible, is_not_needing_movement};
use crate::error::{MoveError, Result};
use crate::state::TerraformState;
use crate::summary::{ResourceInstanceSummaries, ResourceInstanceSummary};
use tracing::{debug, info};

/// Matches every resource, module or resource group.
pub const WILDCARD: &str = "*";

/// Parameters of a single filtering pass.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Resource address (`azurerm_virtual_network.main`), empty or `*` for all.
    pub resource_filter: String,
    /// Module path (`module.network`), empty or `*` for all.
    pub module_filter: String,
    /// Source resource group, `*` to take it from the selected resources.
    pub resource_group_filter: String,
    pub source_subscription_id: String,
    pub target_resource_group: String,
    pub target_subscription_id: String,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            resource_filter: WILDCARD.to_string(),
            module_filter: WILDCARD.to_string(),
            resource_group_filter: WILDCARD.to_string(),
            source_subscription_id: String::new(),
            target_resource_group: String::new(),
            target_subscription_id: String::new(),
        }
    }
}

/// Result of a successful filtering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub summaries: ResourceInstanceSummaries,
    /// The resource group everything is moved out of. `None` when the resource
    /// group filter was `*` and no movement-eligible instance was selected.
    pub source_resource_group: Option<String>,
}

fn matches_filter(filter: &str, value: &str) -> bool {
    filter.is_empty() || filter == WILDCARD || filter == value
}

impl TerraformState {
    /// Select the instances to move and predict their IDs after the move.
    pub fn filter(&self, options: &FilterOptions) -> Result<FilterOutcome> {
        let mut source_resource_group: Option<String> =
            if options.resource_group_filter == WILDCARD {
                None
            } else {
                Some(options.resource_group_filter.clone())
            };
        let target_prefix = azure_id::resource_group_prefix(
            &options.target_subscription_id,
            &options.target_resource_group,
        );
        let mut summaries = Vec::new();

        for resource in &self.resources {
            if !resource.is_azurerm() || !resource.is_managed() {
                continue;
            }

            let resource_id = resource.id();
            if !matches_filter(&options.resource_filter, &resource_id) {
                debug!("Skipping {}: does not match resource filter", resource_id);
                continue;
            }
            if !matches_filter(&options.module_filter, &resource.module) {
                debug!("Skipping {}: does not match module filter", resource_id);
                continue;
            }

            let resource_type = resource.resource_type.as_str();

            // Their IDs carry no subscription or resource group to check
            if is_not_needing_movement(resource_type) {
                for instance in &resource.instances {
                    summaries.push(ResourceInstanceSummary {
                        azure_id: instance.azure_id().to_string(),
                        future_azure_id: instance.azure_id().to_string(),
                        terraform_id: instance.id(resource),
                        resource_type: resource_type.to_string(),
                    });
                }
                continue;
            }

            let eligible = is_movement_eligible(resource_type);

            for instance in &resource.instances {
                let terraform_id = instance.id(resource);

                let subscription_id = instance.subscription_id().ok_or_else(|| {
                    MoveError::MissingSubscriptionId {
                        terraform_id: terraform_id.clone(),
                    }
                })?;

                if subscription_id != options.source_subscription_id {
                    return Err(MoveError::SubscriptionMismatch {
                        terraform_id,
                        found: subscription_id.to_string(),
                        expected: options.source_subscription_id.clone(),
                    });
                }

                let instance_resource_group = instance.resource_group();
                if instance_resource_group.is_none() && eligible {
                    return Err(MoveError::MissingResourceGroup { terraform_id });
                }
                let instance_resource_group = instance_resource_group.unwrap_or_default();

                if options.resource_group_filter != WILDCARD
                    && instance_resource_group != options.resource_group_filter
                {
                    debug!(
                        "Skipping {}: resource group {} does not match filter",
                        terraform_id, instance_resource_group
                    );
                    continue;
                }

                if eligible {
                    match &source_resource_group {
                        None => {
                            info!(
                                "Using resource group {} of {} as source",
                                instance_resource_group, terraform_id
                            );
                            source_resource_group = Some(instance_resource_group.to_string());
                        }
                        Some(resolved) if resolved != instance_resource_group => {
                            return Err(MoveError::ResourceGroupConflict {
                                terraform_id,
                                first: resolved.clone(),
                                second: instance_resource_group.to_string(),
                            });
                        }
                        Some(_) => {}
                    }

                    if subscription_id == options.target_subscription_id
                        && instance_resource_group == options.target_resource_group
                    {
                        return Err(MoveError::AlreadyInTargetResourceGroup { terraform_id });
                    }
                }

                let future_azure_id = match &source_resource_group {
                    Some(group) => azure_id::rewrite(
                        instance.azure_id(),
                        &azure_id::resource_group_prefix(&options.source_subscription_id, group),
                        &target_prefix,
                    ),
                    None => instance.azure_id().to_string(),
                };

                summaries.push(ResourceInstanceSummary {
                    azure_id: instance.azure_id().to_string(),
                    future_azure_id,
                    terraform_id,
                    resource_type: resource_type.to_string(),
                });
            }
        }

        Ok(FilterOutcome {
            summaries: summaries.into(),
            source_resource_group,
        })
    }
}
