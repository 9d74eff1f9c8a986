//! Fusion configuration that downstream crates can serialize/deserialize.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do when an accumulator is attached to a group whose elements have
/// already been streamed into other accumulators without being buffered.
///
/// Such an accumulator can only be replayed the group's first element; the
/// elements routed in between are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateRegistration {
    /// Replay the first element, keep going, and log a warning.
    #[default]
    Tolerate,
    /// Fail the aggregate with `Error::LateRegistration`.
    Reject,
}

impl FromStr for LateRegistration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tolerate" => Ok(LateRegistration::Tolerate),
            "reject" => Ok(LateRegistration::Reject),
            other => Err(Error::Config(format!(
                "unknown late registration policy '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Policy for accumulators attached after elements streamed past them.
    pub late_registration: LateRegistration,

    /// Initial capacity of the group table (distinct keys expected).
    pub group_capacity_hint: usize,

    /// Initial capacity of a grouping's materialization buffer.
    pub buffer_capacity_hint: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            late_registration: LateRegistration::Tolerate,
            group_capacity_hint: 16,
            buffer_capacity_hint: 4,
        }
    }
}

impl FusionConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SEQFUSE_LATE_REGISTRATION`: `tolerate` or `reject`
    /// - `SEQFUSE_GROUP_CAPACITY`: group table capacity hint
    /// - `SEQFUSE_BUFFER_CAPACITY`: materialization buffer capacity hint
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`FusionConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("SEQFUSE_LATE_REGISTRATION") {
            if let Ok(v) = s.parse::<LateRegistration>() {
                cfg.late_registration = v;
            }
        }

        if let Some(s) = lookup("SEQFUSE_GROUP_CAPACITY") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.group_capacity_hint = v;
            }
        }

        if let Some(s) = lookup("SEQFUSE_BUFFER_CAPACITY") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.buffer_capacity_hint = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg = serde_json::from_str(json)?;
        Ok(cfg)
    }

    pub fn with_late_registration(mut self, policy: LateRegistration) -> Self {
        self.late_registration = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("SEQFUSE_LATE_REGISTRATION", "Reject"),
            ("SEQFUSE_GROUP_CAPACITY", "128"),
            ("SEQFUSE_BUFFER_CAPACITY", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let cfg = FusionConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.late_registration, LateRegistration::Reject);
        assert_eq!(cfg.group_capacity_hint, 128);
        assert_eq!(
            cfg.buffer_capacity_hint,
            FusionConfig::default().buffer_capacity_hint
        );
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = FusionConfig::from_json(r#"{"late_registration":"reject"}"#).unwrap();
        assert_eq!(cfg.late_registration, LateRegistration::Reject);
        assert_eq!(cfg.group_capacity_hint, 16);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = FusionConfig::from_json(r#"{"late_registration":"sometimes"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
