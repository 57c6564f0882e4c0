//! Move behavior of azurerm resource types
//!
//! Four tables describe how a resource type behaves when its resource group is
//! moved. A type may sit in more than one table, so every table is queried on its
//! own and callers check them in the order the filter does.

/// No Azure move exists for these types. They are reported but never moved or corrected.
const NOT_SUPPORTED_IN_AZURE: &[&str] = &[
    "azurerm_client_config",
    "azurerm_kubernetes_cluster",
    "azurerm_monitor_diagnostic_setting",
    "azurerm_monitor_metric_alert",
    "azurerm_resource_group",
];

/// IDs derived from a parent resource. Azure moves them with the parent, the state still needs the new ID.
const ONLY_MOVED_IN_TF: &[&str] = &[
    "azurerm_app_service_slot",
    "azurerm_app_service_slot_virtual_network_swift_connection",
    "azurerm_key_vault_access_policy",
    "azurerm_key_vault_secret",
    "azurerm_mssql_database",
    "azurerm_mssql_database_extended_auditing_policy",
    "azurerm_mysql_firewall_rule",
    "azurerm_sql_firewall_rule",
    "azurerm_storage_container",
    "azurerm_storage_share",
    "azurerm_subnet",
    "azurerm_subnet_network_security_group_association",
];

/// Azure refuses the move while any of these exist in the selection.
const BLOCKING_MOVEMENT: &[&str] = &[
    "azurerm_app_service_virtual_network_swift_connection",
    "azurerm_app_service_slot_virtual_network_swift_connection",
];

/// Child resources without any subscription or resource group in their ID.
const NOT_NEEDING_MOVEMENT: &[&str] = &["azurerm_storage_share_file", "azurerm_storage_blob"];

pub fn is_not_supported_in_azure(resource_type: &str) -> bool {
    NOT_SUPPORTED_IN_AZURE.contains(&resource_type)
}

pub fn is_only_moved_in_tf(resource_type: &str) -> bool {
    ONLY_MOVED_IN_TF.contains(&resource_type)
}

pub fn is_blocking_movement(resource_type: &str) -> bool {
    BLOCKING_MOVEMENT.contains(&resource_type)
}

pub fn is_not_needing_movement(resource_type: &str) -> bool {
    NOT_NEEDING_MOVEMENT.contains(&resource_type)
}

/// Types that go through full validation and take part in resolving the source group.
pub fn is_movement_eligible(resource_type: &str) -> bool {
    !is_not_supported_in_azure(resource_type) && !is_blocking_movement(resource_type)
}
