//! Text extraction from uploaded résumé documents (PDF and DOCX).
//!
//! Extraction works on in-memory bytes so it does not care whether the upload
//! lives on local disk or in S3. The file type is decided by extension, and
//! anything other than `.pdf` / `.docx` is rejected before extraction starts.

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("no text found in {0}")]
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Picks the extractor for a filename, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            _ => Err(ExtractError::UnsupportedExtension(filename.to_string())),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Extracts plain text from a document. CPU-bound; call from a blocking task.
pub fn extract_text(kind: DocumentKind, bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(format!("'{filename}': {e}")))?,
        DocumentKind::Docx => extract_docx(bytes)
            .map_err(|e| ExtractError::Docx(format!("'{filename}': {e}")))?,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty(filename.to_string()));
    }
    Ok(text)
}

/// Walks Document -> Paragraph -> Run -> Text, one output line per non-blank paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let docx = read_docx(bytes).map_err(|e| format!("{e:?}"))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Runs in a paragraph are parts of the same sentence and join without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text.trim_end().to_string()
}

/// Builds a DOCX in memory with one paragraph per entry.
#[cfg(test)]
pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
    let docx = paragraphs.iter().fold(docx_rs::Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(docx_rs::Run::new().add_text(*text)))
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut buf).expect("in-memory docx packs");
    buf.into_inner()
}
