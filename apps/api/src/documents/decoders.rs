use std::io::{Cursor, Read};

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::documents::{DecodedDocument, DocumentDecoder, DocumentKind};
use crate::errors::AppError;

const DOCX_BODY_PART: &str = "word/document.xml";

static PARAGRAPH_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</w:p>").unwrap());
static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:(?:br|cr)\b[^>]*/>").unwrap());
static TAB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tab\b[^>]*/>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// PDF text via `pdf-extract`. Parsing is CPU-bound and can panic on malformed input,
/// so it runs on the blocking pool and a panicked task is reported as a decode error.
pub struct PdfDecoder;

#[async_trait]
impl DocumentDecoder for PdfDecoder {
    async fn decode(&self, bytes: Bytes) -> Result<DecodedDocument, AppError> {
        let byte_len = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::DocumentDecode(format!("PDF could not be parsed: {e}")))?
            .map_err(|e| {
                AppError::DocumentDecode(format!("Failed to extract text from PDF: {e}"))
            })?;

        DecodedDocument::new(DocumentKind::Pdf, byte_len, text)
    }
}

/// DOCX text from the main document part of the OOXML package.
pub struct DocxDecoder;

#[async_trait]
impl DocumentDecoder for DocxDecoder {
    async fn decode(&self, bytes: Bytes) -> Result<DecodedDocument, AppError> {
        let byte_len = bytes.len();
        let xml = tokio::task::spawn_blocking(move || read_docx_body(bytes))
            .await
            .map_err(|e| AppError::DocumentDecode(format!("DOCX could not be parsed: {e}")))??;

        DecodedDocument::new(DocumentKind::Docx, byte_len, docx_xml_to_text(&xml))
    }
}

fn read_docx_body(bytes: Bytes) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::DocumentDecode(format!("File is not a valid DOCX archive: {e}")))?;
    let mut part = archive.by_name(DOCX_BODY_PART).map_err(|e| {
        AppError::DocumentDecode(format!("DOCX archive has no {DOCX_BODY_PART}: {e}"))
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| AppError::DocumentDecode(format!("Failed to read DOCX body: {e}")))?;
    Ok(xml)
}

/// Paragraph ends and breaks become newlines, tabs become tabs, all other markup is dropped.
fn docx_xml_to_text(xml: &str) -> String {
    let text = PARAGRAPH_END_RE.replace_all(xml, "\n");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = TAB_RE.replace_all(&text, "\t");
    let text = TAG_RE.replace_all(&text, "");

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// UTF-8 text, invalid sequences replaced, leading BOM removed.
pub struct PlainTextDecoder;

#[async_trait]
impl DocumentDecoder for PlainTextDecoder {
    async fn decode(&self, bytes: Bytes) -> Result<DecodedDocument, AppError> {
        let text = String::from_utf8_lossy(&bytes)
            .trim_start_matches('\u{feff}')
            .to_string();
        DecodedDocument::new(DocumentKind::PlainText, bytes.len(), text)
    }
}
