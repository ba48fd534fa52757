//! The analysis pipeline: extraction, counting, aggregation and
//! evaluation assembled into one immutable result.

use crate::config::{self, ConfigSource, RuleMap};
use crate::counter;
use crate::document::PatentDocument;
use crate::evaluator::{self, CountMap};
use crate::extractor::SectionExtractor;
use crate::patterns::SectionPatternTable;
use crate::types::{AnalysisResult, CountMode, SectionReport, TOTAL_COUNT_KEY};
use anyhow::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;

/// Analyzer for one document. Captures the document, the resolved
/// configuration and the counting mode at construction; `analyze` is then
/// a pure function of that state, so analyzers can run in parallel with
/// no coordination.
pub struct PatentAnalyzer {
    document: PatentDocument,
    extractor: SectionExtractor,
    rules: RuleMap,
    config_source: ConfigSource,
    mode: CountMode,
}

impl PatentAnalyzer {
    pub fn new(
        document: PatentDocument,
        rules: RuleMap,
        config_source: ConfigSource,
        mode: CountMode,
    ) -> Self {
        Self {
            document,
            extractor: SectionExtractor::default(),
            rules,
            config_source,
            mode,
        }
    }

    /// Replace the built-in section pattern table.
    pub fn with_pattern_table(mut self, table: SectionPatternTable) -> Self {
        self.extractor = SectionExtractor::new(table);
        self
    }

    /// Convenience: load the document and resolve the configuration from
    /// an optional YAML file, then analyze.
    pub fn analyze_file(
        path: impl AsRef<Path>,
        config_path: Option<&Path>,
        mode: CountMode,
    ) -> Result<AnalysisResult> {
        let document = PatentDocument::load(path)?;
        let (rules, source) = config::resolve_from_file(config_path);
        Ok(Self::new(document, rules, source, mode).analyze())
    }

    /// Run the pipeline. Each stage produces an immutable value consumed
    /// by the next; nothing here can fail, only report.
    pub fn analyze(&self) -> AnalysisResult {
        // Stage 1: segmentation.
        let extraction = self.extractor.extract(self.document.paragraphs());

        // Stage 2: counting. The reserved total key covers the whole
        // document, including paragraphs outside any recognized section.
        let total_count = counter::count(&self.document.full_text(), self.mode);
        let mut counts = CountMap::new();
        counts.insert(TOTAL_COUNT_KEY.to_string(), total_count);

        let mut sections: BTreeMap<String, SectionReport> = BTreeMap::new();
        for (name, span) in &extraction.spans {
            let count = counter::count(&span.content.join("\n"), self.mode);
            counts.insert(name.clone(), count);
            sections.insert(
                name.clone(),
                SectionReport {
                    count,
                    heading: span.heading_text.clone(),
                    aggregated: false,
                    sub_sections: Vec::new(),
                },
            );
        }

        // Stage 3: sub-section aggregation.
        let (counts, aggregates) = evaluator::aggregate_sub_sections(&counts, &self.rules);
        for (name, aggregation) in &aggregates {
            let report = sections
                .entry(name.clone())
                .or_insert_with(|| SectionReport {
                    count: 0,
                    heading: format!("{name} (aggregated)"),
                    aggregated: false,
                    sub_sections: Vec::new(),
                });
            report.count = aggregation.count;
            report.aggregated = true;
            report.sub_sections = aggregation.contributing.clone();
        }

        // Stage 4: requirement checks.
        let findings = evaluator::evaluate(&counts, &aggregates, &self.rules);

        AnalysisResult {
            filename: self.document.filename(),
            count_mode: self.mode,
            total_count,
            sections,
            findings,
            notes: extraction.notes.iter().map(|n| n.to_string()).collect(),
            applied_config: self.rules.clone(),
            config_source: self.config_source.to_string(),
            analyzed_at: Utc::now(),
        }
    }
}
