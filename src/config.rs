//! Configuration types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a sync pass does with an item whose linked task no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Keep the link and the last derived state; report it as orphaned.
    #[default]
    KeepStale,
    /// Unlink the item and hand completion back to the manual flag.
    Unlink,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_stale" => Ok(Self::KeepStale),
            "unlink" => Ok(Self::Unlink),
            _ => Err(format!("Unknown orphan policy: {}", s)),
        }
    }
}

/// Checklist behaviour configuration.
#[derive(Debug, Clone)]
pub struct ChecklistConfig {
    /// Handling of links whose task was deleted upstream.
    pub orphan_policy: OrphanPolicy,
    /// Reset `manual_completed` to false when an item is unlinked.
    pub reset_manual_on_unlink: bool,
    /// chrono format used to display and parse item due dates.
    pub date_display_format: String,
    /// Capacity of the checklist event broadcast channel.
    pub event_capacity: usize,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            orphan_policy: OrphanPolicy::KeepStale,
            reset_manual_on_unlink: false,
            date_display_format: "%d/%m/%Y".to_string(),
            event_capacity: 256,
        }
    }
}

impl ChecklistConfig {
    /// Build a config from `CHECKLIST_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("CHECKLIST_ORPHAN_POLICY") {
            config.orphan_policy = raw
                .parse::<OrphanPolicy>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "CHECKLIST_ORPHAN_POLICY".into(),
                    message,
                })?;
        }

        if let Some(raw) = lookup("CHECKLIST_RESET_MANUAL_ON_UNLINK") {
            config.reset_manual_on_unlink = match raw.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "CHECKLIST_RESET_MANUAL_ON_UNLINK".into(),
                        message: format!("expected true/false, got {other}"),
                    });
                }
            };
        }

        if let Some(raw) = lookup("CHECKLIST_DATE_FORMAT") {
            if raw.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "CHECKLIST_DATE_FORMAT".into(),
                    message: "must not be empty".into(),
                });
            }
            config.date_display_format = raw;
        }

        if let Some(raw) = lookup("CHECKLIST_EVENT_CAPACITY") {
            config.event_capacity = match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "CHECKLIST_EVENT_CAPACITY".into(),
                        message: format!("expected a positive integer, got {raw}"),
                    });
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ChecklistConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.orphan_policy, OrphanPolicy::KeepStale);
        assert!(!config.reset_manual_on_unlink);
        assert_eq!(config.date_display_format, "%d/%m/%Y");
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn overrides_from_env() {
        let config = ChecklistConfig::from_lookup(lookup_from(&[
            ("CHECKLIST_ORPHAN_POLICY", "unlink"),
            ("CHECKLIST_RESET_MANUAL_ON_UNLINK", "true"),
            ("CHECKLIST_DATE_FORMAT", "%Y-%m-%d"),
            ("CHECKLIST_EVENT_CAPACITY", "16"),
        ]))
        .unwrap();
        assert_eq!(config.orphan_policy, OrphanPolicy::Unlink);
        assert!(config.reset_manual_on_unlink);
        assert_eq!(config.date_display_format, "%Y-%m-%d");
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn rejects_unknown_orphan_policy() {
        let err = ChecklistConfig::from_lookup(lookup_from(&[("CHECKLIST_ORPHAN_POLICY", "warn")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHECKLIST_ORPHAN_POLICY"));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(
            ChecklistConfig::from_lookup(lookup_from(&[("CHECKLIST_EVENT_CAPACITY", "0")])).is_err()
        );
    }
}
