//! Pipeline boundary tests.
//!
//! These drive the whole analysis over in-memory paragraph sequences and
//! real temp files, and assert the structural properties of the result at
//! the pipeline boundaries: extraction output, count mapping, findings
//! list, serialization surface.

use patcount_core::config;
use patcount_core::{
    section, CheckStatus, CountMode, PatentAnalyzer, PatentDocument, SectionExtractor,
    SectionPatternTable, TOTAL_COUNT_KEY, UNSECTIONED_NAME,
};
use std::io::Write;
use std::path::PathBuf;

fn paragraphs(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn default_analyzer(doc: PatentDocument, mode: CountMode) -> PatentAnalyzer {
    let (rules, source) = config::resolve(None);
    PatentAnalyzer::new(doc, rules, source, mode)
}

// ============================================================================
// End-to-end extraction + counting
// ============================================================================

mod extraction_boundary {
    use super::*;

    #[test]
    fn latin_document_with_custom_table() {
        // The two-section scenario: exact heading patterns, no CJK
        // content, so script-aware counts are zero.
        let table = SectionPatternTable::from_raw(&[
            ("Claims", &["claims"]),
            ("TechnicalField", &["technicalfield"]),
        ])
        .unwrap();
        let doc = PatentDocument::from_paragraphs(
            "latin.txt",
            paragraphs(&["Claims", "abc", "TechnicalField", "xyz123"]),
        );
        let (rules, source) = config::resolve(None);
        let result = PatentAnalyzer::new(doc, rules, source, CountMode::ScriptAware)
            .with_pattern_table(table)
            .analyze();

        assert_eq!(result.sections["Claims"].count, 0);
        assert_eq!(result.sections["TechnicalField"].count, 0);
        assert_eq!(result.total_count, 0);
    }

    #[test]
    fn extraction_is_pure_across_runs() {
        let extractor = SectionExtractor::default();
        let doc = paragraphs(&["权利要求书", "内容一", "说明书摘要", "内容二"]);
        let first = extractor.extract(&doc);
        let second = extractor.extract(&doc);
        assert_eq!(first, second);
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let extractor = SectionExtractor::default();
        let doc = paragraphs(&[
            "权利要求书",
            "第一项。",
            "第二项。",
            "技术领域",
            "领域说明。",
        ]);
        let extraction = extractor.extract(&doc);

        let mut spans: Vec<_> = extraction.spans.values().collect();
        spans.sort_by_key(|s| s.heading_index);
        for pair in spans.windows(2) {
            let end = pair[0].heading_index + 1 + pair[0].content.len();
            assert!(end <= pair[1].heading_index);
        }
    }

    #[test]
    fn whole_document_fallback_covers_everything() {
        let doc = PatentDocument::from_paragraphs(
            "prose.txt",
            paragraphs(&["这是一段普通文字。", "还是普通文字。"]),
        );
        let result = default_analyzer(doc, CountMode::ScriptAware).analyze();

        let unsectioned = &result.sections[UNSECTIONED_NAME];
        assert_eq!(unsectioned.count, result.total_count);
        assert_eq!(result.sections.len(), 1);
    }
}

// ============================================================================
// Requirement evaluation through the full pipeline
// ============================================================================

mod evaluation_boundary {
    use super::*;

    #[test]
    fn every_configured_rule_yields_exactly_one_finding() {
        let doc = PatentDocument::from_paragraphs("a.txt", paragraphs(&["权利要求书", "内容。"]));
        let result = default_analyzer(doc, CountMode::ScriptAware).analyze();

        assert_eq!(result.findings.len(), result.applied_config.len());
        // Presentation order: ranks never decrease.
        let ranks: Vec<u8> = result.findings.iter().map(|f| f.status.rank()).collect();
        for pair in ranks.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn ratio_rule_resolves_through_pipeline() {
        // Claims and DetailedDescription both present: the default 2.0
        // ratio rule must produce a resolved finding either way.
        let claims_body = "权利要求内容。".repeat(10);
        let description_body = "具体实施内容。".repeat(20);
        let doc = PatentDocument::from_paragraphs(
            "ratio.txt",
            paragraphs(&[
                "权利要求书",
                &claims_body,
                "具体实施方式",
                &description_body,
            ]),
        );
        let result = default_analyzer(doc, CountMode::ScriptAware).analyze();

        let finding = result
            .findings
            .iter()
            .find(|f| f.name.contains("ratio"))
            .expect("ratio finding");
        assert!(matches!(
            finding.status,
            CheckStatus::Pass | CheckStatus::Fail
        ));
        assert_ne!(finding.actual, "N/A");
    }

    #[test]
    fn missing_claims_makes_ratio_reference_unresolved() {
        let doc = PatentDocument::from_paragraphs(
            "noref.txt",
            paragraphs(&["具体实施方式", "实施内容。"]),
        );
        let result = default_analyzer(doc, CountMode::ScriptAware).analyze();

        let finding = result
            .findings
            .iter()
            .find(|f| f.name.contains("ratio"))
            .expect("ratio finding");
        assert_eq!(finding.status, CheckStatus::ReferenceUnresolved);
    }

    #[test]
    fn custom_override_drives_evaluation() {
        let override_value =
            serde_yaml::from_str("Claims:\n  min: 2\n  max: 4\nTotalCharacterCount:\n  min: 1\n")
                .unwrap();
        let (rules, source) = config::resolve(Some(override_value));
        let doc = PatentDocument::from_paragraphs(
            "override.txt",
            paragraphs(&["权利要求书", "装置权利。"]),
        );
        let result = PatentAnalyzer::new(doc, rules, source, CountMode::ScriptAware).analyze();

        let claims = result
            .findings
            .iter()
            .find(|f| f.name == section::CLAIMS)
            .unwrap();
        // Four ideographs inside the 2-4 band.
        assert_eq!(claims.status, CheckStatus::Pass);

        let total = result
            .findings
            .iter()
            .find(|f| f.name == TOTAL_COUNT_KEY)
            .unwrap();
        assert_eq!(total.status, CheckStatus::Pass);
    }
}

// ============================================================================
// File loading boundary
// ============================================================================

mod file_boundary {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("patcount_pipeline_{name}"))
    }

    #[test]
    fn txt_file_end_to_end() {
        let path = temp_path("doc.txt");
        std::fs::write(&path, "权利要求书\n一种装置。\n\n技术领域\n机械领域。\n").unwrap();

        let result =
            PatentAnalyzer::analyze_file(&path, None, CountMode::ScriptAware).unwrap();
        assert!(result.sections.contains_key(section::CLAIMS));
        assert!(result.sections.contains_key(section::TECHNICAL_FIELD));
        assert_eq!(result.config_source, "built-in defaults");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn docx_file_end_to_end() {
        let path = temp_path("doc.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer
            .write_all(
                concat!(
                    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                    "<w:body>",
                    "<w:p><w:r><w:t>权利要求书</w:t></w:r></w:p>",
                    "<w:p><w:r><w:t>一种装置。</w:t></w:r></w:p>",
                    "</w:body></w:document>",
                )
                .as_bytes(),
            )
            .unwrap();
        writer.finish().unwrap();

        let result =
            PatentAnalyzer::analyze_file(&path, None, CountMode::ScriptAware).unwrap();
        assert_eq!(result.sections[section::CLAIMS].count, 4);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unsupported_extension_fails_the_analysis() {
        let path = temp_path("doc.pdf");
        std::fs::write(&path, "data").unwrap();

        let err = PatentAnalyzer::analyze_file(&path, None, CountMode::ScriptAware).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_config_file_falls_back_to_defaults() {
        let doc_path = temp_path("fallback.txt");
        std::fs::write(&doc_path, "权利要求书\n内容。\n").unwrap();
        let config_path = temp_path("broken.yaml");
        std::fs::write(&config_path, "not: [valid").unwrap();

        let result = PatentAnalyzer::analyze_file(
            &doc_path,
            Some(config_path.as_path()),
            CountMode::ScriptAware,
        )
        .unwrap();
        assert!(result.config_source.contains("override rejected"));
        assert_eq!(result.applied_config, config::default_requirements());

        std::fs::remove_file(&doc_path).ok();
        std::fs::remove_file(&config_path).ok();
    }
}

// ============================================================================
// Serialization surface
// ============================================================================

mod result_surface {
    use super::*;

    #[test]
    fn result_serializes_to_json_and_yaml() {
        let doc = PatentDocument::from_paragraphs(
            "ser.txt",
            paragraphs(&["权利要求书", "一种装置。"]),
        );
        let result = default_analyzer(doc, CountMode::MixedWord).analyze();

        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("\"filename\": \"ser.txt\""));
        assert!(json.contains("\"count_mode\": \"mixed-word\""));
        assert!(json.contains("\"findings\""));

        let yaml = serde_yaml::to_string(&result).unwrap();
        assert!(yaml.contains("filename: ser.txt"));
    }

    #[test]
    fn plain_text_report_renders_without_recomputation() {
        let doc = PatentDocument::from_paragraphs(
            "report.txt",
            paragraphs(&["权利要求书", "一种装置。"]),
        );
        let result = default_analyzer(doc, CountMode::ScriptAware).analyze();
        let report = patcount_core::report::render_text(&result);

        assert!(report.contains("File: report.txt"));
        assert!(report.contains(&format!("Total count: {}", result.total_count)));
    }
}
