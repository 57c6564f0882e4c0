//! Terraform state model
//!
//! A typed view over the parts of a `terraform.tfstate` (format version 4) that
//! the move planner reads. Everything else in the file is kept in `extra` maps so
//! a corrected state can be written back without losing fields.

use crate::azure_id;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Provider address of the azurerm provider as written in the state.
pub const AZURERM_PROVIDER: &str = "provider[\"registry.terraform.io/hashicorp/azurerm\"]";

/// A parsed Terraform state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformState {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `resource` or `data` block, possibly expanded by `count`/`for_each`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single deployed instance of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_key: Option<IndexKey>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `count` instances are keyed by number, `for_each` instances by string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexKey {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Int(i) => write!(f, "[{}]", i),
            IndexKey::Str(s) => {
                f.write_str("[\"")?;
                for c in s.chars() {
                    match c {
                        '"' | '\\' => write!(f, "\\{}", c)?,
                        _ => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"]")
            }
        }
    }
}

impl TerraformState {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a state file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let state = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded {} resources from {}",
            state.resources.len(),
            path.display()
        );
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// The state `serial`, if present.
    pub fn serial(&self) -> Option<u64> {
        self.extra.get("serial").and_then(|s| s.as_u64())
    }
}

impl Resource {
    /// Resource address: `<type>.<name>`, or `data.<type>.<name>` for data
    /// sources, prefixed by the module path when not in the root module.
    pub fn id(&self) -> String {
        let local = if self.is_managed() {
            format!("{}.{}", self.resource_type, self.name)
        } else {
            format!("{}.{}.{}", self.mode, self.resource_type, self.name)
        };
        if self.module.is_empty() {
            local
        } else {
            format!("{}.{}", self.module, local)
        }
    }

    pub fn is_azurerm(&self) -> bool {
        self.provider.contains(AZURERM_PROVIDER)
    }

    pub fn is_managed(&self) -> bool {
        self.mode == "managed"
    }
}

impl Instance {
    /// Instance address, e.g. `module.net.azurerm_subnet.this["web"]`.
    pub fn id(&self, resource: &Resource) -> String {
        match &self.index_key {
            Some(key) => format!("{}{}", resource.id(), key),
            None => resource.id(),
        }
    }

    pub fn azure_id(&self) -> &str {
        &self.attributes.id
    }

    pub fn subscription_id(&self) -> Option<&str> {
        azure_id::subscription_id(&self.attributes.id)
    }

    pub fn resource_group(&self) -> Option<&str> {
        azure_id::resource_group(&self.attributes.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: &str = r#"{
      "version": 4,
      "terraform_version": "1.5.7",
      "serial": 12,
      "lineage": "abc",
      "outputs": {},
      "resources": [
        {
          "mode": "managed",
          "type": "azurerm_resource_group",
          "name": "input",
          "provider": "provider[\"registry.terraform.io/hashicorp/azurerm\"]",
          "instances": [
            {
              "schema_version": 0,
              "attributes": {
                "id": "/subscriptions/s1/resourceGroups/input-rg",
                "location": "westeurope",
                "name": "input-rg"
              },
              "sensitive_attributes": []
            }
          ]
        },
        {
          "module": "module.net",
          "mode": "managed",
          "type": "azurerm_subnet",
          "name": "this",
          "provider": "module.net.provider[\"registry.terraform.io/hashicorp/azurerm\"]",
          "instances": [
            {
              "index_key": "web",
              "attributes": { "id": "/subscriptions/s1/resourceGroups/input-rg/providers/Microsoft.Network/virtualNetworks/v/subnets/web" }
            },
            {
              "index_key": 1,
              "attributes": { "id": "/subscriptions/s1/resourceGroups/input-rg/providers/Microsoft.Network/virtualNetworks/v/subnets/db" }
            }
          ]
        }
      ]
    }"#;

    #[test]
    fn test_parse_state() {
        let state = TerraformState::from_json(STATE).unwrap();
        assert_eq!(state.resources.len(), 2);
        assert_eq!(state.serial(), Some(12));

        let rg = &state.resources[0];
        assert!(rg.is_azurerm());
        assert!(rg.is_managed());
        assert_eq!(rg.module, "");
        assert_eq!(rg.id(), "azurerm_resource_group.input");
        assert_eq!(rg.instances[0].id(rg), "azurerm_resource_group.input");
        assert_eq!(rg.instances[0].subscription_id(), Some("s1"));
        assert_eq!(rg.instances[0].resource_group(), Some("input-rg"));
    }

    #[test]
    fn test_instance_ids_with_index_keys() {
        let state = TerraformState::from_json(STATE).unwrap();
        let subnet = &state.resources[1];
        assert!(subnet.is_azurerm());
        assert_eq!(subnet.id(), "module.net.azurerm_subnet.this");
        assert_eq!(
            subnet.instances[0].id(subnet),
            "module.net.azurerm_subnet.this[\"web\"]"
        );
        assert_eq!(subnet.instances[1].id(subnet), "module.net.azurerm_subnet.this[1]");
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let state = TerraformState::from_json(STATE).unwrap();
        let reparsed = TerraformState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(state, reparsed);
        assert_eq!(reparsed.extra.get("lineage"), Some(&Value::from("abc")));
        assert_eq!(
            reparsed.resources[0].instances[0].attributes.other.get("location"),
            Some(&Value::from("westeurope"))
        );
        assert!(reparsed.resources[0].instances[0]
            .extra
            .contains_key("sensitive_attributes"));
    }

    #[test]
    fn test_data_sources_are_not_managed() {
        let resource = Resource {
            mode: "data".to_string(),
            resource_type: "azurerm_client_config".to_string(),
            name: "current".to_string(),
            provider: AZURERM_PROVIDER.to_string(),
            ..Default::default()
        };
        assert!(!resource.is_managed());
        assert_eq!(resource.id(), "data.azurerm_client_config.current");

        let in_module = Resource {
            module: "module.net".to_string(),
            ..resource
        };
        assert_eq!(in_module.id(), "module.net.data.azurerm_client_config.current");
    }

    #[test]
    fn test_string_index_key_is_escaped() {
        assert_eq!(IndexKey::Str("web".to_string()).to_string(), "[\"web\"]");
        assert_eq!(
            IndexKey::Str(r#"a"b\c"#.to_string()).to_string(),
            r#"["a\"b\\c"]"#
        );
        assert_eq!(IndexKey::Int(3).to_string(), "[3]");
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terraform.tfstate");
        std::fs::write(&path, STATE).unwrap();

        let state = TerraformState::load(&path).unwrap();
        let out = dir.path().join("out.tfstate");
        state.save(&out).unwrap();
        assert_eq!(TerraformState::load(&out).unwrap(), state);
    }

    #[test]
    fn test_invalid_json() {
        assert!(TerraformState::from_json("{ not json").is_err());
    }
}
