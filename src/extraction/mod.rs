//! PDF → invoice JSON extraction
//!
//! One upload goes through three steps, each failing with an
//! [`ExtractionError`]:
//!
//! 1. read the PDF text ([`PdfTextReader`])
//! 2. send [`build_prompt`] to the model ([`TextModel`])
//! 3. strip code fences and parse the reply ([`parse_model_reply`])
//!
//! Nothing is retried and nothing is persisted.

pub mod model;
pub mod pdf;
pub mod prompt;

pub use model::{GeminiModel, TextModel};
pub use pdf::{PdfExtractReader, PdfTextReader};
pub use prompt::{build_prompt, parse_model_reply, strip_code_fences};

use crate::core::ExtractionError;
use serde_json::Value;
use std::sync::Arc;

/// Runs the extraction pipeline
#[derive(Clone)]
pub struct Extractor {
    reader: Arc<dyn PdfTextReader>,
    model: Arc<dyn TextModel>,
}

impl Extractor {
    pub fn new(reader: impl PdfTextReader + 'static, model: impl TextModel + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
            model: Arc::new(model),
        }
    }

    /// Extract a structured invoice object from PDF bytes
    pub async fn extract(&self, pdf: Vec<u8>) -> Result<Value, ExtractionError> {
        if pdf.is_empty() {
            return Err(ExtractionError::MissingFile);
        }

        // pdf-extract is CPU-bound and may panic on malformed input
        let reader = self.reader.clone();
        let text = tokio::task::spawn_blocking(move || reader.read_text(&pdf))
            .await
            .map_err(|e| ExtractionError::PdfText(format!("PDF reader aborted: {}", e)))??;

        let reply = self.model.generate(&build_prompt(&text)).await?;
        let value = parse_model_reply(&reply)?;

        tracing::info!(text_chars = text.len(), "Extracted invoice fields");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedText(&'static str);

    impl PdfTextReader for FixedText {
        fn read_text(&self, _pdf: &[u8]) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    struct PanickingReader;

    impl PdfTextReader for PanickingReader {
        fn read_text(&self, _pdf: &[u8]) -> Result<String, ExtractionError> {
            panic!("malformed xref table")
        }
    }

    #[derive(Default)]
    struct RecordingModel {
        reply: String,
        calls: Arc<AtomicUsize>,
        last_prompt: std::sync::Mutex<Option<String>>,
    }

    #[async_trait]
    impl TextModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_extract_passes_text_to_model() {
        let model = Arc::new(RecordingModel {
            reply: "```json\n{\"vendor\":{\"name\":\"Acme\"}}\n```".into(),
            ..Default::default()
        });
        let extractor = Extractor {
            reader: Arc::new(FixedText("Invoice INV-7 from Acme")),
            model: model.clone(),
        };

        let value = extractor.extract(b"%PDF-1.4".to_vec()).await.unwrap();
        assert_eq!(value["vendor"]["name"], "Acme");
        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Invoice INV-7 from Acme"));
    }

    #[tokio::test]
    async fn test_empty_upload_skips_model() {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = Extractor::new(
            FixedText("unused"),
            RecordingModel {
                calls: calls.clone(),
                ..Default::default()
            },
        );

        let err = extractor.extract(Vec::new()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingFile));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reader_panic_becomes_pdf_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = Extractor::new(
            PanickingReader,
            RecordingModel {
                calls: calls.clone(),
                ..Default::default()
            },
        );

        let err = extractor.extract(b"%PDF".to_vec()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::PdfText(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_invalid() {
        let extractor = Extractor::new(
            FixedText("text"),
            RecordingModel {
                reply: "I could not find an invoice.".into(),
                ..Default::default()
            },
        );

        let err = extractor.extract(b"%PDF".to_vec()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidReply(_)));
    }
}
