use crate::config::RequirementRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ===== SECTION NAMES =====
// Canonical keys shared by the pattern table, the default requirement set
// and the analysis result. Pattern matching recognizes both the Chinese
// patent-office heading forms and their English equivalents under these
// names.

pub mod section {
    pub const CLAIMS: &str = "Claims";
    pub const SPEC_ABSTRACT: &str = "Specification-Abstract";
    pub const SPEC_BODY: &str = "Specification-Body";
    pub const ABSTRACT: &str = "Abstract";
    pub const TECHNICAL_FIELD: &str = "TechnicalField";
    pub const BACKGROUND_ART: &str = "BackgroundArt";
    pub const INVENTION_SUMMARY: &str = "InventionSummary";
    pub const DETAILED_DESCRIPTION: &str = "DetailedDescription";
    pub const BENEFICIAL_EFFECTS: &str = "BeneficialEffects";
    pub const DRAWINGS_DESCRIPTION: &str = "DrawingsDescription";
}

/// Reserved key in the count mapping for the whole-document count.
/// Never produced by extraction; requirement rules may target it directly.
pub const TOTAL_COUNT_KEY: &str = "TotalCharacterCount";

/// Synthetic section name used when no configured heading matches any
/// paragraph of a non-empty document.
pub const UNSECTIONED_NAME: &str = "Whole Document (unsectioned)";

// ===== COUNTING MODE =====

/// Counting semantics applied to every text span in an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    /// Count only CJK ideographs; Latin letters, digits, punctuation and
    /// whitespace contribute zero. The metric used by patent-office
    /// Chinese word-count rules.
    #[default]
    ScriptAware,
    /// CJK ideographs one-by-one, plus each Latin-letter run as one word,
    /// each digit run as one token, and each punctuation character.
    MixedWord,
    /// Every non-whitespace character, regardless of script.
    All,
}

impl CountMode {
    pub fn label(&self) -> &'static str {
        match self {
            CountMode::ScriptAware => "script-aware",
            CountMode::MixedWord => "mixed-word",
            CountMode::All => "all",
        }
    }
}

impl fmt::Display for CountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "chinese" and "word" are accepted as aliases.
        match s.trim().to_ascii_lowercase().as_str() {
            "script-aware" | "chinese" => Ok(CountMode::ScriptAware),
            "mixed-word" | "word" => Ok(CountMode::MixedWord),
            "all" => Ok(CountMode::All),
            other => Err(format!(
                "unknown count mode '{other}' (expected script-aware, mixed-word or all)"
            )),
        }
    }
}

// ===== EXTRACTION OUTPUT =====

/// One extracted section: the heading paragraph that named it and the
/// content paragraphs strictly after it, up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub name: String,
    /// Index of the heading paragraph in the document sequence.
    pub heading_index: usize,
    /// Original text of the heading paragraph.
    pub heading_text: String,
    /// Content paragraphs, exclusive of the heading itself. Empty when a
    /// heading is immediately followed by another heading.
    pub content: Vec<String>,
}

/// Result of segmenting a paragraph sequence into section spans.
/// Conflicts are data, not log output; the caller decides what to surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub spans: BTreeMap<String, SectionSpan>,
    pub notes: Vec<ExtractionNote>,
}

/// Ambiguities observed during extraction. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionNote {
    /// The same section name matched more than one heading paragraph;
    /// the later span overwrote the earlier one.
    DuplicateHeading {
        name: String,
        first_index: usize,
        second_index: usize,
        heading_text: String,
    },
    /// No configured heading matched; the whole document was wrapped in a
    /// single synthetic span.
    UnsectionedFallback,
}

impl fmt::Display for ExtractionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionNote::DuplicateHeading {
                name,
                first_index,
                second_index,
                heading_text,
            } => write!(
                f,
                "section '{name}' matched more than once (paragraphs {first_index} and \
                 {second_index}, heading '{heading_text}'); the later occurrence wins"
            ),
            ExtractionNote::UnsectionedFallback => write!(
                f,
                "no recognizable section heading found; treating the whole document as one section"
            ),
        }
    }
}

// ===== ANALYSIS RESULT =====

/// Per-section entry of the analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub count: u64,
    /// The heading paragraph as it appeared in the document, or a
    /// synthetic label for aggregated-only sections.
    pub heading: String,
    /// True when the count was recomputed as the sum of sub-sections.
    #[serde(default)]
    pub aggregated: bool,
    /// Sub-sections that contributed to an aggregated count.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_sections: Vec<String>,
}

/// Outcome class of one evaluated requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Rule carries no bound; the finding only reports the count.
    Informational,
    /// The named section was not recognized in the document.
    SectionNotFound,
    /// Rule defines sub-sections but none were recognized.
    SubSectionsNotFound,
    /// Ratio rule: the target section could not be resolved.
    TargetUnresolved,
    /// Ratio rule: the reference section is missing or has zero count.
    ReferenceUnresolved,
}

impl CheckStatus {
    /// Presentation rank: failures first, unresolved next, pass and
    /// informational last.
    pub fn rank(&self) -> u8 {
        match self {
            CheckStatus::Fail => 0,
            CheckStatus::SectionNotFound
            | CheckStatus::SubSectionsNotFound
            | CheckStatus::TargetUnresolved
            | CheckStatus::ReferenceUnresolved => 1,
            CheckStatus::Pass | CheckStatus::Informational => 2,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }
}

/// One evaluated requirement's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckFinding {
    /// Rule name, or "target/reference ratio" for ratio rules.
    pub name: String,
    /// Formatted actual value: a count, a ratio, or "N/A".
    pub actual: String,
    /// Human-readable description of the requirement.
    pub expected: String,
    pub status: CheckStatus,
    pub message: String,
}

/// Immutable result of one document analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub filename: String,
    pub count_mode: CountMode,
    pub total_count: u64,
    pub sections: BTreeMap<String, SectionReport>,
    /// Findings in presentation order: failing first, ties by rule name.
    pub findings: Vec<CheckFinding>,
    /// Extraction ambiguities (duplicate headings, unsectioned fallback).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// The configuration the checks actually ran against, for audit.
    pub applied_config: BTreeMap<String, RequirementRule>,
    /// How the configuration was resolved (defaults, merged override, ...).
    pub config_source: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Count of findings with a hard fail verdict.
    pub fn failure_count(&self) -> usize {
        self.findings.iter().filter(|f| f.status.is_fail()).count()
    }
}
