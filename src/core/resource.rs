use serde::{Deserialize, Deserializer};

/// One infrastructure item from a submitted inventory.
///
/// Every field has a "secure" default: an all-default resource trips no rule.
/// `encryption` and `mfa_enabled` are tri-state; `None` means the inventory
/// did not say, which is not the same as an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub resource_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub open_ports: Vec<Option<i64>>,
    #[serde(deserialize_with = "null_as_default")]
    pub password: String,
    pub encryption: Option<bool>,
    pub mfa_enabled: Option<bool>,
    #[serde(alias = "azure_specific", deserialize_with = "null_as_default")]
    pub cloud_specific: CloudSpecific,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CloudSpecific {
    #[serde(deserialize_with = "null_as_default")]
    pub resource_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vm_size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account_tier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub replication: String,
    #[serde(deserialize_with = "null_as_default")]
    pub db_service: String,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Non-null ports in input order.
    pub fn ports(&self) -> impl Iterator<Item = i64> + '_ {
        self.open_ports.iter().flatten().copied()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
