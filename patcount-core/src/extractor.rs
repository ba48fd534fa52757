//! Section extraction: segment an ordered paragraph sequence into named
//! section spans.
//!
//! A single forward scan assigns each paragraph at most one heading
//! identity (first match in priority order). The heading indices are
//! strictly increasing by construction, so span contents never overlap:
//! each span runs from just after its heading to just before the next.

use crate::patterns::SectionPatternTable;
use crate::types::{Extraction, ExtractionNote, SectionSpan, UNSECTIONED_NAME};

pub struct SectionExtractor {
    table: SectionPatternTable,
}

impl SectionExtractor {
    pub fn new(table: SectionPatternTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SectionPatternTable {
        &self.table
    }

    /// Extract section spans from the document's paragraph sequence.
    /// Pure: same paragraphs, same spans.
    pub fn extract(&self, paragraphs: &[String]) -> Extraction {
        let mut extraction = Extraction::default();
        if paragraphs.is_empty() {
            return extraction;
        }

        // One pass: at most one heading identity per paragraph.
        let mut headings: Vec<(usize, &str, &str)> = Vec::new();
        for (index, paragraph) in paragraphs.iter().enumerate() {
            if let Some(name) = self.table.match_heading(paragraph) {
                headings.push((index, name, paragraph.as_str()));
            }
        }

        if headings.is_empty() {
            // No recognizable structure: one synthetic span over the
            // whole document, content includes every paragraph.
            extraction.spans.insert(
                UNSECTIONED_NAME.to_string(),
                SectionSpan {
                    name: UNSECTIONED_NAME.to_string(),
                    heading_index: 0,
                    heading_text: UNSECTIONED_NAME.to_string(),
                    content: paragraphs.to_vec(),
                },
            );
            extraction.notes.push(ExtractionNote::UnsectionedFallback);
            return extraction;
        }

        for (position, (index, name, heading_text)) in headings.iter().enumerate() {
            let content_start = index + 1;
            let content_end = headings
                .get(position + 1)
                .map(|(next_index, _, _)| *next_index)
                .unwrap_or(paragraphs.len());
            let span = SectionSpan {
                name: name.to_string(),
                heading_index: *index,
                heading_text: heading_text.to_string(),
                content: paragraphs[content_start..content_end].to_vec(),
            };

            // Later occurrence of the same name overwrites the earlier
            // span; recorded as a conflict, not treated as an error.
            if let Some(previous) = extraction.spans.insert(name.to_string(), span) {
                extraction.notes.push(ExtractionNote::DuplicateHeading {
                    name: name.to_string(),
                    first_index: previous.heading_index,
                    second_index: *index,
                    heading_text: heading_text.to_string(),
                });
            }
        }

        extraction
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(SectionPatternTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::SectionPatternTable;
    use crate::types::section;

    fn paragraphs(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn test_extractor() -> SectionExtractor {
        let table = SectionPatternTable::from_raw(&[
            ("Claims", &["claims"]),
            ("TechnicalField", &["technical\\s*field"]),
        ])
        .unwrap();
        SectionExtractor::new(table)
    }

    #[test]
    fn splits_content_between_headings() {
        let extractor = test_extractor();
        let doc = paragraphs(&["Claims", "abc", "TechnicalField", "xyz123"]);
        let extraction = extractor.extract(&doc);

        assert_eq!(extraction.spans.len(), 2);
        assert_eq!(extraction.spans["Claims"].content, vec!["abc"]);
        assert_eq!(extraction.spans["TechnicalField"].content, vec!["xyz123"]);
        assert!(extraction.notes.is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = test_extractor();
        let doc = paragraphs(&["Claims", "abc", "TechnicalField", "xyz123"]);
        assert_eq!(extractor.extract(&doc), extractor.extract(&doc));
    }

    #[test]
    fn spans_never_overlap() {
        let extractor = test_extractor();
        let doc = paragraphs(&["intro", "Claims", "a", "b", "TechnicalField", "c"]);
        let extraction = extractor.extract(&doc);

        let claims = &extraction.spans["Claims"];
        let field = &extraction.spans["TechnicalField"];
        assert_eq!(claims.heading_index, 1);
        assert_eq!(field.heading_index, 4);
        // Claims content stops before the next heading paragraph.
        assert_eq!(claims.content, vec!["a", "b"]);
        assert!(!claims.content.iter().any(|p| p == "TechnicalField" || p == "c"));
    }

    #[test]
    fn back_to_back_headings_give_empty_span() {
        let extractor = test_extractor();
        let doc = paragraphs(&["Claims", "TechnicalField", "content"]);
        let extraction = extractor.extract(&doc);

        assert!(extraction.spans["Claims"].content.is_empty());
        assert_eq!(extraction.spans["TechnicalField"].content, vec!["content"]);
    }

    #[test]
    fn last_heading_runs_to_end_of_document() {
        let extractor = test_extractor();
        let doc = paragraphs(&["Claims", "a", "b", "c"]);
        let extraction = extractor.extract(&doc);
        assert_eq!(extraction.spans["Claims"].content, vec!["a", "b", "c"]);
    }

    #[test]
    fn unsectioned_document_falls_back_to_single_span() {
        let extractor = test_extractor();
        let doc = paragraphs(&["no heading here", "just prose"]);
        let extraction = extractor.extract(&doc);

        assert_eq!(extraction.spans.len(), 1);
        let span = &extraction.spans[crate::types::UNSECTIONED_NAME];
        assert_eq!(span.heading_index, 0);
        assert_eq!(span.content, doc);
        assert_eq!(extraction.notes, vec![ExtractionNote::UnsectionedFallback]);
    }

    #[test]
    fn empty_document_yields_nothing() {
        let extractor = test_extractor();
        let extraction = extractor.extract(&[]);
        assert!(extraction.spans.is_empty());
        assert!(extraction.notes.is_empty());
    }

    #[test]
    fn duplicate_heading_overwrites_and_records_conflict() {
        let extractor = test_extractor();
        let doc = paragraphs(&["Claims", "first", "Claims", "second"]);
        let extraction = extractor.extract(&doc);

        assert_eq!(extraction.spans["Claims"].content, vec!["second"]);
        assert_eq!(extraction.spans["Claims"].heading_index, 2);
        assert_eq!(
            extraction.notes,
            vec![ExtractionNote::DuplicateHeading {
                name: "Claims".to_string(),
                first_index: 0,
                second_index: 2,
                heading_text: "Claims".to_string(),
            }]
        );
    }

    #[test]
    fn builtin_table_extracts_chinese_document() {
        let extractor = SectionExtractor::default();
        let doc = paragraphs(&[
            "权利要求书",
            "1. 一种装置。",
            "说明书摘要",
            "本发明公开了一种装置。",
            "技术领域",
            "本发明涉及机械领域。",
        ]);
        let extraction = extractor.extract(&doc);

        assert_eq!(
            extraction.spans[section::CLAIMS].content,
            vec!["1. 一种装置。"]
        );
        assert_eq!(
            extraction.spans[section::SPEC_ABSTRACT].content,
            vec!["本发明公开了一种装置。"]
        );
        assert_eq!(
            extraction.spans[section::TECHNICAL_FIELD].content,
            vec!["本发明涉及机械领域。"]
        );
    }
}
