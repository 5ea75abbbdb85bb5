//! PDF text extraction

use crate::core::ExtractionError;

/// Turns PDF bytes into plain text
pub trait PdfTextReader: Send + Sync {
    fn read_text(&self, pdf: &[u8]) -> Result<String, ExtractionError>;
}

/// [`PdfTextReader`] backed by the `pdf-extract` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractReader;

impl PdfTextReader for PdfExtractReader {
    fn read_text(&self, pdf: &[u8]) -> Result<String, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(pdf)
            .map_err(|e| ExtractionError::PdfText(e.to_string()))?;
        tracing::debug!(bytes = pdf.len(), chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}
