//! Correction of Azure IDs in the Terraform state
//!
//! After Azure has moved the resources, every instance listed by
//! `to_correct_in_tf_state` still points at the old resource group. The
//! corrected copy carries the predicted IDs and a bumped `serial`, so it can be
//! pushed with `terraform state push`.

use crate::state::TerraformState;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of applying corrections to a state.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedState {
    pub state: TerraformState,
    /// Terraform addresses whose ID was changed.
    pub corrected: Vec<String>,
}

/// Return a copy of `state` with the IDs from `corrections` applied.
///
/// `corrections` maps a Terraform address to its new Azure ID. Only managed
/// azurerm instances are corrected. Instances not in the map, or already
/// carrying the new ID, are left untouched. The `serial` is only incremented
/// when at least one ID changed.
pub fn apply_corrections(
    state: &TerraformState,
    corrections: &BTreeMap<String, String>,
) -> CorrectedState {
    let mut corrected_state = state.clone();
    let mut corrected = Vec::new();

    for resource in &mut corrected_state.resources {
        if !resource.is_azurerm() || !resource.is_managed() {
            continue;
        }
        let terraform_ids: Vec<String> = resource
            .instances
            .iter()
            .map(|instance| instance.id(resource))
            .collect();
        for (instance, terraform_id) in resource.instances.iter_mut().zip(terraform_ids) {
            if let Some(future_id) = corrections.get(&terraform_id) {
                if instance.attributes.id != *future_id {
                    debug!(
                        "Correcting {}: {} -> {}",
                        terraform_id, instance.attributes.id, future_id
                    );
                    instance.attributes.id = future_id.clone();
                    corrected.push(terraform_id);
                }
            }
        }
    }

    if !corrected.is_empty() {
        if let Some(serial) = corrected_state.serial() {
            corrected_state
                .extra
                .insert("serial".to_string(), Value::from(serial + 1));
        }
    }

    CorrectedState {
        state: corrected_state,
        corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attributes, IndexKey, Instance, Resource, AZURERM_PROVIDER};

    fn state() -> TerraformState {
        let mut extra = serde_json::Map::new();
        extra.insert("serial".to_string(), Value::from(7));
        TerraformState {
            resources: vec![Resource {
                mode: "managed".to_string(),
                resource_type: "azurerm_subnet".to_string(),
                name: "s".to_string(),
                provider: AZURERM_PROVIDER.to_string(),
                instances: vec![
                    Instance {
                        index_key: Some(IndexKey::Int(0)),
                        attributes: Attributes {
                            id: "/subscriptions/s/resourceGroups/a/x/0".to_string(),
                            ..Default::default()
                        },
                        ..Default::default()
                    },
                    Instance {
                        index_key: Some(IndexKey::Int(1)),
                        attributes: Attributes {
                            id: "/subscriptions/s/resourceGroups/a/x/1".to_string(),
                            ..Default::default()
                        },
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            extra,
        }
    }

    #[test]
    fn test_apply_corrections_only_touches_listed_instances() {
        let original = state();
        let mut corrections = BTreeMap::new();
        corrections.insert(
            "azurerm_subnet.s[1]".to_string(),
            "/subscriptions/s/resourceGroups/b/x/1".to_string(),
        );

        let result = apply_corrections(&original, &corrections);
        assert_eq!(result.corrected, vec!["azurerm_subnet.s[1]"]);
        let instances = &result.state.resources[0].instances;
        assert_eq!(instances[0].attributes.id, "/subscriptions/s/resourceGroups/a/x/0");
        assert_eq!(instances[1].attributes.id, "/subscriptions/s/resourceGroups/b/x/1");
        assert_eq!(result.state.serial(), Some(8));

        // input is not modified
        assert_eq!(original.serial(), Some(7));
        assert_eq!(
            original.resources[0].instances[1].attributes.id,
            "/subscriptions/s/resourceGroups/a/x/1"
        );
    }

    #[test]
    fn test_no_changes_keeps_serial() {
        let original = state();
        let mut corrections = BTreeMap::new();
        corrections.insert(
            "azurerm_subnet.s[0]".to_string(),
            "/subscriptions/s/resourceGroups/a/x/0".to_string(),
        );

        let result = apply_corrections(&original, &corrections);
        assert!(result.corrected.is_empty());
        assert_eq!(result.state, original);
    }

    #[test]
    fn test_data_source_with_same_name_is_not_corrected() {
        let hub_subnet = "/subscriptions/S1/resourceGroups/shared-rg/providers/Microsoft.Network/virtualNetworks/hub/subnets/s";
        let json = serde_json::json!({
            "version": 4,
            "serial": 3,
            "resources": [
                {
                    "mode": "data",
                    "type": "azurerm_subnet",
                    "name": "s",
                    "provider": AZURERM_PROVIDER,
                    "instances": [{ "attributes": { "id": hub_subnet } }]
                },
                {
                    "mode": "managed",
                    "type": "azurerm_virtual_network",
                    "name": "v",
                    "provider": AZURERM_PROVIDER,
                    "instances": [{ "attributes": {
                        "id": "/subscriptions/S1/resourceGroups/input-rg/providers/Microsoft.Network/virtualNetworks/v"
                    } }]
                },
                {
                    "mode": "managed",
                    "type": "azurerm_subnet",
                    "name": "s",
                    "provider": AZURERM_PROVIDER,
                    "instances": [{ "attributes": {
                        "id": "/subscriptions/S1/resourceGroups/input-rg/providers/Microsoft.Network/virtualNetworks/v/subnets/s"
                    } }]
                }
            ]
        });
        let original = TerraformState::from_json(&json.to_string()).unwrap();
        let outcome = original
            .filter(&crate::FilterOptions {
                source_subscription_id: "S1".to_string(),
                target_resource_group: "output-rg".to_string(),
                target_subscription_id: "S1".to_string(),
                ..Default::default()
            })
            .unwrap();

        let result = apply_corrections(&original, &outcome.summaries.to_correct_in_tf_state());
        assert_eq!(
            result.corrected,
            vec!["azurerm_virtual_network.v", "azurerm_subnet.s"]
        );
        assert_eq!(result.state.resources[0].instances[0].attributes.id, hub_subnet);
        assert_eq!(
            result.state.resources[2].instances[0].attributes.id,
            "/subscriptions/S1/resourceGroups/output-rg/providers/Microsoft.Network/virtualNetworks/v/subnets/s"
        );
    }

    #[test]
    fn test_other_providers_are_not_corrected() {
        let mut original = state();
        original.resources[0].provider =
            "provider[\"registry.terraform.io/hashicorp/random\"]".to_string();
        let mut corrections = BTreeMap::new();
        corrections.insert(
            "azurerm_subnet.s[0]".to_string(),
            "/subscriptions/s/resourceGroups/b/x/0".to_string(),
        );

        let result = apply_corrections(&original, &corrections);
        assert!(result.corrected.is_empty());
        assert_eq!(result.state.serial(), Some(7));
    }
}
