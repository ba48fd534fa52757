// patcount core library
//
// Section extraction and length-requirement checking for patent
// application documents. The pipeline is a pure function of
// (paragraph sequence, counting mode, configuration).

pub mod config;
pub mod counter;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod patterns;
pub mod processor;
pub mod report;
pub mod types;

// Re-export the main types and functions for easy use
pub use config::{default_config_yaml, default_requirements, ConfigSource, RequirementRule, RuleMap};
pub use document::PatentDocument;
pub use error::DocumentError;
pub use extractor::SectionExtractor;
pub use patterns::SectionPatternTable;
pub use processor::PatentAnalyzer;
pub use types::*;
