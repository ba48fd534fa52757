//! Document loading: turn a `.txt` or `.docx` file into the ordered,
//! trimmed, non-empty paragraph sequence the pipeline consumes.
//!
//! DOCX is an OOXML ZIP container; only the text runs of
//! `word/document.xml` are extracted. Formatting, tables and images are
//! ignored.

use crate::error::DocumentError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A loaded document: the source path and its paragraph sequence.
/// Paragraph order is significant; it defines section boundaries.
#[derive(Debug, Clone)]
pub struct PatentDocument {
    path: PathBuf,
    paragraphs: Vec<String>,
}

impl PatentDocument {
    /// Load a document from disk. Fails on missing files, unsupported
    /// extensions and documents with no text content; these are the only
    /// fatal conditions of an analysis.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let paragraphs = match extension.as_str() {
            "txt" => load_txt(path)?,
            "docx" => load_docx(path)?,
            _ => return Err(DocumentError::UnsupportedFormat { extension }),
        };

        if paragraphs.is_empty() {
            return Err(DocumentError::EmptyDocument(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            paragraphs,
        })
    }

    /// Build a document from paragraphs already in memory. Blank
    /// paragraphs are discarded, the rest trimmed, as with file loading.
    pub fn from_paragraphs(name: impl Into<PathBuf>, paragraphs: Vec<String>) -> Self {
        Self {
            path: name.into(),
            paragraphs: paragraphs
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// The whole document joined for the total count.
    pub fn full_text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

fn load_txt(path: &Path) -> Result<Vec<String>, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn load_docx(path: &Path) -> Result<Vec<String>, DocumentError> {
    let file = File::open(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|err| DocumentError::InvalidDocx(err.to_string()))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| DocumentError::InvalidDocx("missing word/document.xml".to_string()))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| DocumentError::InvalidDocx(err.to_string()))?;
    parse_document_xml(&xml)
}

/// Pull-parse the OOXML body: concatenate the `w:t` runs of each `w:p`
/// into one paragraph. Paragraphs inside `w:tbl` are skipped, matching
/// the tables-ignored contract.
fn parse_document_xml(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;
    let mut table_depth = 0u32;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if table_depth == 0 => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" if in_paragraph => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"p" if in_paragraph => {
                    in_paragraph = false;
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                }
                b"t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|err| DocumentError::InvalidDocx(err.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(DocumentError::InvalidDocx(err.to_string())),
        }
    }

    Ok(paragraphs)
}
