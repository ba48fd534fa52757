//! Requirement evaluation: sub-section aggregation followed by the main
//! check pass over the configuration.
//!
//! Every rule produces exactly one finding. Unresolvable conditions
//! (missing sections, zero-valued ratio references) become distinct
//! finding statuses; one bad rule never blocks the rest.

use crate::config::{RequirementRule, RuleMap, DEFAULT_TOLERANCE};
use crate::types::{CheckFinding, CheckStatus};
use std::collections::BTreeMap;

/// Section counts keyed by name, including the reserved total key.
pub type CountMap = BTreeMap<String, u64>;

/// Result of aggregating one parent section from its sub-sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub count: u64,
    /// Children that were actually found, in configured order.
    pub contributing: Vec<String>,
}

/// Aggregation pre-step: for every rule carrying `sub_sections`, sum the
/// counts of the children that are present. When at least one child is
/// found the parent's count is set (or overwritten) with the sum, even if
/// the parent also had a directly-detected heading: aggregation wins.
/// Returns the updated counts and the per-parent aggregation record.
pub fn aggregate_sub_sections(
    counts: &CountMap,
    rules: &RuleMap,
) -> (CountMap, BTreeMap<String, Aggregation>) {
    let mut updated = counts.clone();
    let mut aggregates = BTreeMap::new();

    for (name, rule) in rules {
        let Some(children) = &rule.sub_sections else {
            continue;
        };
        let mut sum = 0u64;
        let mut contributing = Vec::new();
        for child in children {
            if let Some(child_count) = counts.get(child) {
                sum += child_count;
                contributing.push(child.clone());
            }
        }
        if !contributing.is_empty() {
            updated.insert(name.clone(), sum);
            aggregates.insert(name.clone(), Aggregation { count: sum, contributing });
        }
    }

    (updated, aggregates)
}

/// Evaluate every configured rule against the counts. Rules are visited
/// in stable name order; the returned findings are sorted for
/// presentation (failures first, then unresolved, then pass and
/// informational; ties by name).
pub fn evaluate(
    counts: &CountMap,
    aggregates: &BTreeMap<String, Aggregation>,
    rules: &RuleMap,
) -> Vec<CheckFinding> {
    let mut findings: Vec<CheckFinding> = rules
        .iter()
        .map(|(name, rule)| {
            if rule.is_ratio() {
                check_ratio(name, rule, counts)
            } else {
                check_absolute(name, rule, counts, aggregates)
            }
        })
        .collect();

    findings.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.name.cmp(&b.name))
    });
    findings
}

fn check_ratio(name: &str, rule: &RequirementRule, counts: &CountMap) -> CheckFinding {
    let reference = rule.reference.as_deref().unwrap_or_default();
    let finding_name = format!("{name}/{reference} ratio");

    if reference.is_empty() {
        return CheckFinding {
            name: finding_name,
            actual: "N/A".to_string(),
            expected: rule.describe(),
            status: CheckStatus::ReferenceUnresolved,
            message: format!("ratio rule for '{name}' does not name a reference section"),
        };
    }

    let target_count = counts.get(name).copied();
    let reference_count = counts.get(reference).copied();

    let Some(target_count) = target_count else {
        return CheckFinding {
            name: finding_name,
            actual: "N/A".to_string(),
            expected: rule.describe(),
            status: CheckStatus::TargetUnresolved,
            message: format!("cannot compute ratio: section '{name}' was not recognized"),
        };
    };

    let reference_count = match reference_count {
        Some(count) if count > 0 => count,
        _ => {
            return CheckFinding {
                name: finding_name,
                actual: "N/A".to_string(),
                expected: rule.describe(),
                status: CheckStatus::ReferenceUnresolved,
                message: format!(
                    "cannot compute ratio: reference section '{reference}' was not \
                     recognized or has zero count"
                ),
            };
        }
    };

    // Both sides resolved; the acceptance interval lives in ratio space.
    let actual_ratio = target_count as f64 / reference_count as f64;
    let target_ratio = rule.ratio.unwrap_or_default();
    let tolerance = rule.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    let lower = target_ratio * (1.0 - tolerance);
    let upper = target_ratio * (1.0 + tolerance);

    let mut status = if actual_ratio >= lower && actual_ratio <= upper {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let expected = format!(
        "{target_ratio:.2} (±{:.0}%, i.e. {lower:.2}-{upper:.2})",
        tolerance * 100.0
    );
    let mut message = format!("{finding_name}: {actual_ratio:.2} (target: {expected})");

    // An absolute floor on the target's raw count overrides a passing
    // ratio.
    if let Some(min) = rule.min {
        if target_count < min {
            status = CheckStatus::Fail;
            message.push_str(&format!(
                "; section '{name}' count {target_count} is below the minimum {min}"
            ));
        }
    }

    CheckFinding {
        name: finding_name,
        actual: format!("{actual_ratio:.2}"),
        expected,
        status,
        message,
    }
}

fn check_absolute(
    name: &str,
    rule: &RequirementRule,
    counts: &CountMap,
    aggregates: &BTreeMap<String, Aggregation>,
) -> CheckFinding {
    let count = match counts.get(name) {
        Some(count) => *count,
        None => {
            // Not counted and not aggregated. Distinguish a rule whose
            // configured sub-sections all went unrecognized.
            let (status, message) = if rule.sub_sections.is_some() {
                (
                    CheckStatus::SubSectionsNotFound,
                    format!("{name}: none of its sub-sections were recognized"),
                )
            } else {
                (
                    CheckStatus::SectionNotFound,
                    format!("{name}: section was not recognized in the document"),
                )
            };
            return CheckFinding {
                name: name.to_string(),
                actual: "N/A".to_string(),
                expected: rule.describe(),
                status,
                message,
            };
        }
    };

    let (status, expected) = match (rule.min, rule.max) {
        (Some(min), Some(max)) => {
            let pass = count >= min && count <= max;
            (status_of(pass), format!("{min}-{max}"))
        }
        (Some(min), None) => (status_of(count >= min), format!("at least {min}")),
        (None, Some(max)) => (status_of(count <= max), format!("no more than {max}")),
        (None, None) => (CheckStatus::Informational, "no specific bound".to_string()),
    };

    let mut message = format!("{name}: count {count} (requirement: {expected})");
    if status == CheckStatus::Fail {
        if let Some(min) = rule.min {
            if count < min {
                message.push_str(&format!(" (short by {})", min - count));
            }
        }
        if let Some(max) = rule.max {
            if count > max {
                message.push_str(&format!(" (over by {})", count - max));
            }
        }
    }
    if aggregates.contains_key(name) {
        message.push_str(" [aggregated from sub-sections]");
    }

    CheckFinding {
        name: name.to_string(),
        actual: count.to_string(),
        expected,
        status,
        message,
    }
}

fn status_of(pass: bool) -> CheckStatus {
    if pass {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    }
}
