//! Fixed VLAN id -> subnet mask mapping for Inter templates.

use crate::error::GenError;
use crate::models::ipv4::parse_mask;
use serde::Serialize;
use std::collections::BTreeMap;

/// VLAN ids and masks shipped with the tool.
const DEFAULT_VLAN_MASKS: [(&str, &str); 6] = [
    ("3100", "255.255.255.240"), // /28
    ("3137", "255.255.255.240"),
    ("3138", "255.255.255.224"), // /27
    ("3139", "255.255.255.224"),
    ("3140", "255.255.255.224"),
    ("3141", "255.255.255.128"), // /25
];

/// Column prefix for per-VLAN addresses, e.g. `VLAN3100`.
pub const VLAN_COLUMN_PREFIX: &str = "VLAN";

/// VLAN id -> dotted mask, iterated in ascending VLAN id order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VlanMaskTable {
    masks: BTreeMap<String, String>,
}

impl Default for VlanMaskTable {
    fn default() -> Self {
        VlanMaskTable {
            masks: DEFAULT_VLAN_MASKS
                .iter()
                .map(|(vlan, mask)| (vlan.to_string(), mask.to_string()))
                .collect(),
        }
    }
}

impl VlanMaskTable {
    /// Parse an override such as `{"3100": "255.255.255.240"}`.
    ///
    /// Every key must be numeric and every mask a valid netmask.
    pub fn from_json(json: &str) -> Result<VlanMaskTable, GenError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let masks: BTreeMap<String, String> = serde_path_to_error::deserialize(de)
            .map_err(|e| GenError::Config(format!("VLAN mask override at {}: {}", e.path(), e)))?;

        for (vlan, mask) in masks.iter() {
            if vlan.is_empty() || !vlan.chars().all(|c| c.is_ascii_digit()) {
                return Err(GenError::Config(format!("VLAN id '{vlan}' is not numeric")));
            }
            parse_mask(mask)
                .map_err(|e| GenError::Config(format!("VLAN {vlan} mask {mask}: {e}")))?;
        }
        Ok(VlanMaskTable { masks })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.masks.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn mask(&self, vlan: &str) -> Option<&str> {
        self.masks.get(vlan).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

/// Table column carrying the address for `vlan`.
pub fn vlan_column(vlan: &str) -> String {
    format!("{VLAN_COLUMN_PREFIX}{vlan}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = VlanMaskTable::default();
        let vlans: Vec<&str> = table.iter().map(|(v, _)| v).collect();
        assert_eq!(vlans, vec!["3100", "3137", "3138", "3139", "3140", "3141"]);
        assert_eq!(table.mask("3141"), Some("255.255.255.128"));
        assert_eq!(table.mask("9999"), None);
    }

    #[test]
    fn test_from_json() {
        let table = VlanMaskTable::from_json(r#"{"200": "255.255.255.0", "100": "/26"}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next(), Some(("100", "/26")));
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(VlanMaskTable::from_json(r#"{"abc": "255.255.255.0"}"#).is_err());
        assert!(VlanMaskTable::from_json(r#"{"100": "255.0.255.0"}"#).is_err());
        let err = VlanMaskTable::from_json(r#"{"100": 24}"#).unwrap_err();
        assert!(err.to_string().contains("100"), "path missing: {err}");
    }

    #[test]
    fn test_vlan_column() {
        assert_eq!(vlan_column("3137"), "VLAN3137");
    }
}
