//! Requirement configuration: the built-in default rule set, YAML
//! override loading, and the merge that resolves the two into the
//! configuration an analysis actually runs against.

use crate::types::{section, TOTAL_COUNT_KEY};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Tolerance applied to ratio rules that do not specify one.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// One named requirement. All fields optional: a rule with a `ratio` is a
/// ratio rule, one with `sub_sections` aggregates its children, anything
/// else is an absolute bound check. Missing bounds simply skip the
/// corresponding check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Section whose count the ratio is measured against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Child sections whose counts are summed into this section's count
    /// when at least one of them is found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_sections: Option<Vec<String>>,
}

impl RequirementRule {
    pub fn is_ratio(&self) -> bool {
        self.ratio.is_some()
    }

    /// Compact single-line description for findings that could not be
    /// checked against their bounds.
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn bounded(min: Option<u64>, max: Option<u64>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }
}

/// Rule name to rule, in stable (name) order.
pub type RuleMap = BTreeMap<String, RequirementRule>;

/// How the effective configuration was arrived at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// No override supplied; built-in defaults apply.
    Defaults,
    /// A valid override mapping was merged over the defaults.
    MergedOverride { origin: String },
    /// The override was rejected; defaults apply. The reason is kept for
    /// display.
    DefaultsAfterInvalidOverride { reason: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "built-in defaults"),
            ConfigSource::MergedOverride { origin } => {
                write!(f, "defaults merged with override ({origin})")
            }
            ConfigSource::DefaultsAfterInvalidOverride { reason } => {
                write!(f, "built-in defaults (override rejected: {reason})")
            }
        }
    }
}

/// The built-in requirement set: standard Chinese patent-office filing
/// length limits.
pub fn default_requirements() -> RuleMap {
    let mut rules = RuleMap::new();
    rules.insert(
        section::ABSTRACT.into(),
        RequirementRule::bounded(None, Some(300)),
    );
    rules.insert(
        section::CLAIMS.into(),
        RequirementRule::bounded(Some(1500), Some(2000)),
    );
    rules.insert(
        section::SPEC_ABSTRACT.into(),
        RequirementRule::bounded(None, Some(300)),
    );
    rules.insert(
        section::SPEC_BODY.into(),
        RequirementRule {
            min: Some(6000),
            max: Some(10000),
            sub_sections: Some(vec![
                section::TECHNICAL_FIELD.into(),
                section::BACKGROUND_ART.into(),
                section::INVENTION_SUMMARY.into(),
                section::DETAILED_DESCRIPTION.into(),
                section::BENEFICIAL_EFFECTS.into(),
                section::DRAWINGS_DESCRIPTION.into(),
            ]),
            ..RequirementRule::default()
        },
    );
    rules.insert(
        section::TECHNICAL_FIELD.into(),
        RequirementRule::bounded(Some(50), Some(300)),
    );
    rules.insert(
        section::BACKGROUND_ART.into(),
        RequirementRule::bounded(Some(300), Some(1000)),
    );
    rules.insert(
        section::INVENTION_SUMMARY.into(),
        RequirementRule::bounded(Some(500), Some(1500)),
    );
    rules.insert(
        section::DETAILED_DESCRIPTION.into(),
        RequirementRule {
            ratio: Some(2.0),
            reference: Some(section::CLAIMS.into()),
            tolerance: Some(0.3),
            min: Some(3000),
            ..RequirementRule::default()
        },
    );
    rules.insert(
        section::BENEFICIAL_EFFECTS.into(),
        RequirementRule::bounded(Some(300), Some(800)),
    );
    rules.insert(
        section::DRAWINGS_DESCRIPTION.into(),
        RequirementRule::bounded(Some(50), Some(500)),
    );
    rules.insert(
        TOTAL_COUNT_KEY.into(),
        RequirementRule::bounded(Some(9000), Some(12000)),
    );
    rules
}

/// Default requirement set rendered as YAML, for display and as a
/// starting point for user overrides.
pub fn default_config_yaml() -> Result<String> {
    serde_yaml::to_string(&default_requirements()).context("serialize default requirements")
}

/// Resolve the effective configuration from an optional override payload.
///
/// Merge is shallow per top-level key: when both the default and the
/// override value for a key are mappings, the merge is key-wise with
/// override precedence (an override `{max: 2500}` keeps the default
/// `min`); otherwise the override value replaces the default wholesale.
/// Unknown top-level keys are accepted verbatim as new rules. A
/// non-mapping payload is rejected and defaults apply.
pub fn resolve(override_value: Option<serde_yaml::Value>) -> (RuleMap, ConfigSource) {
    let Some(value) = override_value else {
        return (default_requirements(), ConfigSource::Defaults);
    };

    let serde_yaml::Value::Mapping(override_map) = value else {
        return (
            default_requirements(),
            ConfigSource::DefaultsAfterInvalidOverride {
                reason: "configuration payload is not a mapping".to_string(),
            },
        );
    };

    let mut merged: BTreeMap<String, serde_yaml::Value> = default_requirements()
        .into_iter()
        .map(|(name, rule)| {
            let value = serde_yaml::to_value(rule).unwrap_or(serde_yaml::Value::Null);
            (name, value)
        })
        .collect();

    for (key, value) in override_map {
        let Some(name) = key.as_str().map(str::to_string) else {
            continue;
        };
        // Both sides mappings: key-wise merge, override wins. Anything
        // else replaces wholesale (including new rule names).
        if let serde_yaml::Value::Mapping(update) = value {
            if let Some(serde_yaml::Value::Mapping(existing)) = merged.get_mut(&name) {
                for (k, v) in update {
                    existing.insert(k, v);
                }
            } else {
                merged.insert(name, serde_yaml::Value::Mapping(update));
            }
        } else {
            merged.insert(name, value);
        }
    }

    // Malformed rule entries degrade to an empty rule rather than failing
    // the whole configuration.
    let rules = merged
        .into_iter()
        .map(|(name, value)| {
            let rule = serde_yaml::from_value(value).unwrap_or_default();
            (name, rule)
        })
        .collect();

    (rules, ConfigSource::MergedOverride {
        origin: "user configuration".to_string(),
    })
}

/// Resolve from an optional YAML file path. Read or parse failures fall
/// back to defaults with the reason recorded, matching the permissive
/// config policy: a bad override never aborts an analysis.
pub fn resolve_from_file(path: Option<&Path>) -> (RuleMap, ConfigSource) {
    let Some(path) = path else {
        return resolve(None);
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            return (
                default_requirements(),
                ConfigSource::DefaultsAfterInvalidOverride {
                    reason: format!("cannot read {}: {err}", path.display()),
                },
            );
        }
    };

    match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(value) => {
            let (rules, source) = resolve(Some(value));
            match source {
                ConfigSource::MergedOverride { .. } => (
                    rules,
                    ConfigSource::MergedOverride {
                        origin: path.display().to_string(),
                    },
                ),
                other => (rules, other),
            }
        }
        Err(err) => (
            default_requirements(),
            ConfigSource::DefaultsAfterInvalidOverride {
                reason: format!("invalid YAML in {}: {err}", path.display()),
            },
        ),
    }
}
