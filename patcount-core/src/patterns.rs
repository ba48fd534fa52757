//! Section heading patterns and the heading matcher.
//!
//! The table is an explicit ordered list of (name, compiled pattern set)
//! pairs: table order is priority order, and a fixed set of primary names
//! is always tested first. First match wins per paragraph, so more
//! specific names must precede general ones whose patterns could also
//! match (the Specification-Abstract forms include the bare "摘要" that a
//! generic abstract heading would otherwise claim).

use crate::types::section;
use anyhow::{Context, Result};
use regex::Regex;

/// Names tested before everything else, in this order.
const PRIMARY_NAMES: [&str; 3] = [
    section::CLAIMS,
    section::SPEC_ABSTRACT,
    section::SPEC_BODY,
];

/// Built-in heading forms. Chinese patterns follow common filing
/// conventions: optional whitespace interleaved between ideographs, and
/// the numbered "一、"/"1." chapter variants. English equivalents are
/// listed alongside. Patterns are compiled case-insensitive and anchored
/// to the full paragraph.
const DEFAULT_PATTERNS: &[(&str, &[&str])] = &[
    (
        section::CLAIMS,
        &[
            r"权\s*利\s*要\s*求\s*书",
            r"权\s*利\s*要\s*求",
            r"claims?",
        ],
    ),
    (
        section::SPEC_ABSTRACT,
        &[
            r"说\s*明\s*书\s*摘\s*要",
            r"摘\s*要",
            r"abstract(?:\s+of\s+the\s+disclosure)?",
        ],
    ),
    (
        section::TECHNICAL_FIELD,
        &[
            r"技\s*术\s*领\s*域",
            r"一、\s*技\s*术\s*领\s*域",
            r"1\.\s*技\s*术\s*领\s*域",
            r"(?:1\s*[.、]\s*)?technical\s*field",
        ],
    ),
    (
        section::BACKGROUND_ART,
        &[
            r"背\s*景\s*技\s*术",
            r"二、\s*背\s*景\s*技\s*术",
            r"2\.\s*背\s*景\s*技\s*术",
            r"(?:2\s*[.、]\s*)?background(?:\s*art)?",
        ],
    ),
    (
        section::INVENTION_SUMMARY,
        &[
            r"发\s*明\s*内\s*容",
            r"三、\s*发\s*明\s*内\s*容",
            r"3\.\s*发\s*明\s*内\s*容",
            r"(?:3\s*[.、]\s*)?summary(?:\s*of\s*the\s*invention)?",
        ],
    ),
    (
        section::DETAILED_DESCRIPTION,
        &[
            r"具\s*体\s*实\s*施\s*方\s*式",
            r"四、\s*具\s*体\s*实\s*施\s*方\s*式",
            r"4\.\s*具\s*体\s*实\s*施\s*方\s*式",
            r"(?:4\s*[.、]\s*)?detailed\s*description(?:\s*of\s*the\s*embodiments)?",
        ],
    ),
    (
        section::BENEFICIAL_EFFECTS,
        &[
            r"有\s*益\s*效\s*果",
            r"五、\s*有\s*益\s*效\s*果",
            r"5\.\s*有\s*益\s*效\s*果",
            r"(?:5\s*[.、]\s*)?beneficial\s*effects?",
        ],
    ),
    (
        section::DRAWINGS_DESCRIPTION,
        &[
            r"附\s*图\s*说\s*明",
            r"六、\s*附\s*图\s*说\s*明",
            r"6\.\s*附\s*图\s*说\s*明",
            r"(?:6\s*[.、]\s*)?(?:brief\s*)?description\s*of\s*(?:the\s*)?drawings",
        ],
    ),
    (
        section::SPEC_BODY,
        &[r"说\s*明\s*书", r"specification"],
    ),
];

/// One section's compiled heading pattern set.
#[derive(Debug, Clone)]
pub struct SectionPatterns {
    pub name: String,
    patterns: Vec<Regex>,
}

impl SectionPatterns {
    pub fn compile(name: &str, raw_patterns: &[&str]) -> Result<Self> {
        let patterns = raw_patterns
            .iter()
            .map(|raw| {
                // Full-match semantics: the whole trimmed paragraph must
                // match, case-insensitively.
                Regex::new(&format!(r"(?i)\A(?:{raw})\z"))
                    .with_context(|| format!("invalid heading pattern for '{name}': {raw}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

/// Decide whether a paragraph is a heading for a section with the given
/// pattern set. Purely a function of the paragraph text and the patterns.
pub fn is_heading(paragraph: &str, patterns: &[Regex]) -> bool {
    let trimmed = paragraph.trim();
    if trimmed.is_empty() {
        return false;
    }
    patterns.iter().any(|p| p.is_match(trimmed))
}

/// Ordered section pattern table. Iteration via [`priority_order`] tests
/// the primary names first, then the rest in table order.
///
/// [`priority_order`]: SectionPatternTable::priority_order
#[derive(Debug, Clone)]
pub struct SectionPatternTable {
    entries: Vec<SectionPatterns>,
}

impl SectionPatternTable {
    /// Compile the built-in table.
    pub fn builtin() -> Result<Self> {
        Self::from_raw(DEFAULT_PATTERNS)
    }

    /// Compile a table from (name, raw pattern list) pairs, preserving
    /// the given order.
    pub fn from_raw(raw: &[(&str, &[&str])]) -> Result<Self> {
        let entries = raw
            .iter()
            .map(|&(name, patterns)| SectionPatterns::compile(name, patterns))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SectionPatterns] {
        &self.entries
    }

    /// Entries in matching priority: primary names first (in their fixed
    /// order), then all remaining entries in table order.
    pub fn priority_order(&self) -> Vec<&SectionPatterns> {
        let mut ordered = Vec::with_capacity(self.entries.len());
        for name in PRIMARY_NAMES {
            if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
                ordered.push(entry);
            }
        }
        for entry in &self.entries {
            if !PRIMARY_NAMES.contains(&entry.name.as_str()) {
                ordered.push(entry);
            }
        }
        ordered
    }

    /// First-match-wins heading identity for one paragraph, or None when
    /// no section claims it.
    pub fn match_heading(&self, paragraph: &str) -> Option<&str> {
        self.priority_order()
            .into_iter()
            .find(|entry| is_heading(paragraph, entry.patterns()))
            .map(|entry| entry.name.as_str())
    }
}

impl Default for SectionPatternTable {
    fn default() -> Self {
        Self::builtin().expect("built-in section patterns compile")
    }
}
