//! Document decoding: uploaded bytes in, plain text out.
//!
//! The only stage of the pipeline that can fail. Unsupported kinds are rejected before
//! any decoder runs; decode failures are returned to the caller as-is, never retried.

mod decoders;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

pub use decoders::{DocxDecoder, PdfDecoder, PlainTextDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// File extension first, then the declared content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, AppError> {
        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        let by_extension = match extension.as_deref() {
            Some("pdf") => Some(Self::Pdf),
            Some("docx") => Some(Self::Docx),
            Some("txt") | Some("text") | Some("md") => Some(Self::PlainText),
            _ => None,
        };
        if let Some(kind) = by_extension {
            return Ok(kind);
        }

        match content_type.map(|c| c.split(';').next().unwrap_or("").trim()) {
            Some("application/pdf") => Ok(Self::Pdf),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Ok(Self::Docx)
            }
            Some("text/plain") | Some("text/markdown") => Ok(Self::PlainText),
            _ => Err(AppError::UnsupportedDocument(format!(
                "Unsupported file type for '{}'. Upload a PDF, DOCX or plain-text file.",
                file_name.unwrap_or("<unnamed>")
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub kind: DocumentKind,
    pub byte_len: usize,
    pub char_count: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedDocument {
    pub text: String,
    pub info: DocumentInfo,
}

impl DecodedDocument {
    /// Rejects text that is empty after trimming.
    pub(crate) fn new(kind: DocumentKind, byte_len: usize, text: String) -> Result<Self, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::DocumentDecode(format!(
                "No readable text found in {kind:?} document"
            )));
        }
        let info = DocumentInfo {
            kind,
            byte_len,
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
        };
        Ok(Self { text, info })
    }
}

/// Byte-to-text conversion for one document kind.
#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, bytes: Bytes) -> Result<DecodedDocument, AppError>;
}

pub fn decoder_for(kind: DocumentKind) -> Box<dyn DocumentDecoder> {
    match kind {
        DocumentKind::Pdf => Box::new(PdfDecoder),
        DocumentKind::Docx => Box::new(DocxDecoder),
        DocumentKind::PlainText => Box::new(PlainTextDecoder),
    }
}

/// Detects the kind and decodes. Empty uploads fail before any decoder runs.
pub async fn decode_document(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<DecodedDocument, AppError> {
    let kind = DocumentKind::detect(file_name, content_type)?;
    if bytes.is_empty() {
        return Err(AppError::DocumentDecode(format!(
            "Uploaded file '{}' is empty",
            file_name.unwrap_or("<unnamed>")
        )));
    }

    let decoded = decoder_for(kind).decode(bytes).await?;
    info!(
        kind = ?decoded.info.kind,
        bytes = decoded.info.byte_len,
        words = decoded.info.word_count,
        "Decoded document"
    );
    Ok(decoded)
}
