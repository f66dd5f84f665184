//! Defaults and environment driven settings.
//!
//! Compile-time defaults live as constants; [`Settings::from_env`] overlays
//! `TELDAT_*` environment variables (a `.env` file is honoured).

use crate::error::GenError;
use crate::models::VlanMaskTable;
use std::env;
use std::path::PathBuf;

/// Usable addresses withheld from the tail of every DHCP range.
pub const DEFAULT_RESERVE_COUNT: usize = 2;
/// Mask used for a Flat LAN when the record leaves the mask column blank.
pub const DEFAULT_FALLBACK_MASK: &str = "255.255.255.0";
pub const DEFAULT_OUTPUT_DIR: &str = "output_configs";
pub const OUTPUT_FILE_SUFFIX: &str = "_TELDAT_CONFIG.txt";

pub const ENV_RESERVE_COUNT: &str = "TELDAT_RESERVE_COUNT";
pub const ENV_FALLBACK_MASK: &str = "TELDAT_FALLBACK_MASK";
pub const ENV_OUTPUT_DIR: &str = "TELDAT_OUTPUT_DIR";
pub const ENV_VLAN_MASKS: &str = "TELDAT_VLAN_MASKS";

/// Run settings shared by the renderer and the binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub reserve_count: usize,
    pub fallback_mask: String,
    pub output_dir: PathBuf,
    pub vlan_masks: VlanMaskTable,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            reserve_count: DEFAULT_RESERVE_COUNT,
            fallback_mask: DEFAULT_FALLBACK_MASK.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            vlan_masks: VlanMaskTable::default(),
        }
    }
}

impl Settings {
    /// Build settings from defaults plus any `TELDAT_*` variables.
    pub fn from_env() -> Result<Settings, GenError> {
        dotenv::dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, GenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(ENV_RESERVE_COUNT) {
            settings.reserve_count = raw.trim().parse().map_err(|_| {
                GenError::Config(format!("{ENV_RESERVE_COUNT} is not a number: {raw}"))
            })?;
        }
        if let Some(mask) = lookup(ENV_FALLBACK_MASK) {
            if !mask.trim().is_empty() {
                settings.fallback_mask = mask.trim().to_string();
            }
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_VLAN_MASKS) {
            log::info!("Loading VLAN mask override from {path}");
            let json = std::fs::read_to_string(&path)
                .map_err(|e| GenError::Config(format!("Error reading {path}: {e}")))?;
            settings.vlan_masks = VlanMaskTable::from_json(&json)?;
        }

        log::debug!("settings={:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.reserve_count, 2);
        assert_eq!(settings.fallback_mask, "255.255.255.0");
        assert_eq!(settings.output_dir, PathBuf::from("output_configs"));
        assert_eq!(settings.vlan_masks.len(), 6);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_RESERVE_COUNT, " 5 "),
            (ENV_FALLBACK_MASK, "255.255.255.192"),
            (ENV_OUTPUT_DIR, "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(settings.reserve_count, 5);
        assert_eq!(settings.fallback_mask, "255.255.255.192");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_bad_reserve_count() {
        let err = Settings::from_lookup(lookup_from(&[(ENV_RESERVE_COUNT, "two")])).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_missing_vlan_mask_file() {
        let err = Settings::from_lookup(lookup_from(&[(ENV_VLAN_MASKS, "/no/such/file.json")]))
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/file.json"));
    }
}
