// Text extraction: uploaded resume bytes -> plain text.
// PDF parsing is delegated to pdf-extract; LaTeX is stripped with regexes.
// Only "cannot open the bytes at all" is an error. A document with no text
// layer extracts to an empty string and scores low downstream.

pub mod latex;
pub mod pdf;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Latex,
}

impl DocumentFormat {
    /// Resolves an explicit format tag (`pdf`, `latex`, `tex`), case-insensitive.
    pub fn from_tag(tag: &str) -> Result<Self, AppError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" | "application/pdf" => Ok(DocumentFormat::Pdf),
            "latex" | "tex" | "application/x-tex" | "text/x-tex" => Ok(DocumentFormat::Latex),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolves the format from an upload file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, AppError> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "tex" | "latex" => Ok(DocumentFormat::Latex),
            _ => Err(AppError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("pdf"),
            DocumentFormat::Latex => f.write_str("latex"),
        }
    }
}

/// Immutable plain-text content of one uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText(String);

impl DocumentText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Extracts plain text from raw document bytes.
///
/// Synchronous and CPU-bound; request handlers go through
/// [`extract_document`] which moves the work off the async executor.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<DocumentText, AppError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(bytes).map(DocumentText::from),
        DocumentFormat::Latex => {
            let source = std::str::from_utf8(bytes).map_err(|e| {
                AppError::CorruptDocument(format!("LaTeX source is not valid UTF-8: {e}"))
            })?;
            Ok(DocumentText::from(latex::latex_to_text(source)))
        }
    }
}

/// Runs [`extract_text`] inside `spawn_blocking`.
///
/// pdf-extract panics on some malformed inputs; a panicking task is
/// reported as `CorruptDocument` rather than tearing down the worker.
pub async fn extract_document(
    bytes: bytes::Bytes,
    format: DocumentFormat,
) -> Result<DocumentText, AppError> {
    match tokio::task::spawn_blocking(move || extract_text(&bytes, format)).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(AppError::CorruptDocument(format!(
            "{format} parser aborted while reading the document"
        ))),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "extraction task failed: {e}"
        ))),
    }
}
