//! Résumé text extraction. PDF via `pdf-extract`, DOCX by pulling
//! `word/document.xml` out of the zip container and stripping the markup.
//! Anything else is rejected up front — no candidate record is created for an
//! unsupported upload.

use std::io::{Cursor, Read};

use anyhow::anyhow;

use crate::errors::AppError;

pub const UNSUPPORTED_MESSAGE: &str = "Unsupported file type. Please upload a PDF or DOCX.";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Pdf,
    Docx,
}

impl ResumeKind {
    pub fn default_content_type(self) -> &'static str {
        match self {
            ResumeKind::Pdf => "application/pdf",
            ResumeKind::Docx => DOCX_CONTENT_TYPE,
        }
    }
}

/// Recognizes PDF/DOCX by content-type or extension. `None` means the upload
/// must be rejected with [`UNSUPPORTED_MESSAGE`].
pub fn detect_kind(file_name: &str, content_type: Option<&str>) -> Option<ResumeKind> {
    let lower_name = file_name.to_lowercase();
    if content_type == Some("application/pdf") || lower_name.ends_with(".pdf") {
        return Some(ResumeKind::Pdf);
    }
    if content_type == Some(DOCX_CONTENT_TYPE) || lower_name.ends_with(".docx") {
        return Some(ResumeKind::Docx);
    }
    None
}

/// Extracts plain text from an uploaded résumé. CPU-bound; callers run it on
/// a blocking thread and await the result before creating any record.
pub fn extract_text(kind: ResumeKind, data: &[u8]) -> Result<String, AppError> {
    match kind {
        ResumeKind::Pdf => extract_pdf(data),
        ResumeKind::Docx => extract_docx(data),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, AppError> {
    pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::UnprocessableEntity(format!("failed to parse PDF: {e}")))
}

fn extract_docx(data: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| AppError::UnprocessableEntity(format!("failed to open DOCX: {e}")))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|_| AppError::UnprocessableEntity("DOCX has no document body".to_string()))?;
    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Internal(anyhow!("reading DOCX body: {e}")))?;
    Ok(strip_document_xml(&xml))
}

/// Flattens WordprocessingML to plain text: paragraph ends become newlines,
/// all other tags are dropped, basic entities are decoded.
fn strip_document_xml(xml: &str) -> String {
    let with_breaks = xml.replace("</w:p>", "\n");

    let mut text = String::with_capacity(with_breaks.len() / 4);
    let mut in_tag = false;
    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .trim()
        .to_string()
}
