//! Text extraction from raw input payloads.
//!
//! Plain text decodes directly; document formats go through an optional
//! `DocumentParser` capability. A missing capability is an explicit error,
//! never silently-empty text — the orchestrator decides what to do with it.

use std::sync::Arc;

use tracing::debug;

use crate::error::ExtractError;
use crate::pipeline::types::{ExtractedText, InputDocument, SourceKind};

/// Default input size cap: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// Parser capability for non-plain-text documents.
///
/// Implementations are pure byte-to-text converters; whether one is wired
/// in is decided at extractor construction time.
pub trait DocumentParser: Send + Sync {
    /// The source kind this parser handles.
    fn kind(&self) -> SourceKind;

    /// Extract plain text from raw document bytes.
    fn parse(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// PDF text extraction backed by the `pdf-extract` crate.
#[cfg(feature = "pdf")]
pub struct PdfParser;

#[cfg(feature = "pdf")]
impl DocumentParser for PdfParser {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    fn parse(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::ExtractionFailed {
            kind: SourceKind::Pdf,
            reason: e.to_string(),
        })
    }
}

/// Converts raw input payloads into plain text.
pub struct TextExtractor {
    pdf: Option<Arc<dyn DocumentParser>>,
    max_input_bytes: usize,
}

impl TextExtractor {
    /// Extractor with no document parser wired (plain text only).
    pub fn plain_only() -> Self {
        Self {
            pdf: None,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Extractor with a PDF parser capability.
    pub fn with_pdf(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            pdf: Some(parser),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Override the input size cap.
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Whether a parser for `kind` is available.
    pub fn supports(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::PlainText => true,
            SourceKind::Pdf => self.pdf.is_some(),
        }
    }

    /// Extract plain text from an input document.
    ///
    /// Plain text is decoded lossily: undecodable bytes are replaced rather
    /// than failing the call. Document kinds require a wired parser.
    pub fn extract(&self, input: &InputDocument) -> Result<ExtractedText, ExtractError> {
        if input.bytes.len() > self.max_input_bytes {
            return Err(ExtractError::InputTooLarge {
                size: input.bytes.len(),
                limit: self.max_input_bytes,
            });
        }

        let text = match input.kind {
            SourceKind::PlainText => String::from_utf8_lossy(&input.bytes).into_owned(),
            SourceKind::Pdf => match &self.pdf {
                Some(parser) => parser.parse(&input.bytes)?,
                None => {
                    return Err(ExtractError::CapabilityUnavailable {
                        kind: SourceKind::Pdf,
                    });
                }
            },
        };

        debug!(
            kind = input.kind.label(),
            chars = text.chars().count(),
            "Extracted text"
        );
        Ok(ExtractedText::new(text))
    }
}

/// Default extractor: PDF support when the `pdf` feature is enabled.
impl Default for TextExtractor {
    fn default() -> Self {
        #[cfg(feature = "pdf")]
        return Self::with_pdf(Arc::new(PdfParser));
        #[cfg(not(feature = "pdf"))]
        Self::plain_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub parser with a fixed outcome.
    struct StubParser {
        result: Result<String, String>,
    }

    impl DocumentParser for StubParser {
        fn kind(&self) -> SourceKind {
            SourceKind::Pdf
        }

        fn parse(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
            self.result
                .clone()
                .map_err(|reason| ExtractError::ExtractionFailed {
                    kind: SourceKind::Pdf,
                    reason,
                })
        }
    }

    #[test]
    fn plain_text_is_identity() {
        let extractor = TextExtractor::plain_only();
        let doc = InputDocument::text("Hello, inbox!");
        let extracted = extractor.extract(&doc).unwrap();
        assert_eq!(extracted.text, "Hello, inbox!");
        assert_eq!(extracted.char_count, 13);
    }

    #[test]
    fn plain_text_decodes_lossily() {
        let extractor = TextExtractor::plain_only();
        let doc = InputDocument::from_bytes(vec![b'h', b'i', 0xFF], SourceKind::PlainText);
        let extracted = extractor.extract(&doc).unwrap();
        assert!(extracted.text.starts_with("hi"));
    }

    #[test]
    fn empty_input_is_valid() {
        let extractor = TextExtractor::plain_only();
        let extracted = extractor.extract(&InputDocument::text("")).unwrap();
        assert!(extracted.is_empty());
    }

    #[test]
    fn pdf_without_parser_is_capability_unavailable() {
        let extractor = TextExtractor::plain_only();
        let doc = InputDocument::from_bytes(b"%PDF-1.4".to_vec(), SourceKind::Pdf);
        assert!(!extractor.supports(SourceKind::Pdf));
        assert!(matches!(
            extractor.extract(&doc),
            Err(ExtractError::CapabilityUnavailable { .. })
        ));
    }

    #[test]
    fn pdf_with_parser_extracts() {
        let extractor = TextExtractor::with_pdf(Arc::new(StubParser {
            result: Ok("parsed body".into()),
        }));
        let doc = InputDocument::from_bytes(b"%PDF-1.4".to_vec(), SourceKind::Pdf);
        assert!(extractor.supports(SourceKind::Pdf));
        assert_eq!(extractor.extract(&doc).unwrap().text, "parsed body");
    }

    #[test]
    fn corrupt_document_is_extraction_failed() {
        let extractor = TextExtractor::with_pdf(Arc::new(StubParser {
            result: Err("bad xref table".into()),
        }));
        let doc = InputDocument::from_bytes(b"garbage".to_vec(), SourceKind::Pdf);
        assert!(matches!(
            extractor.extract(&doc),
            Err(ExtractError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn oversized_input_is_rejected() {
        let extractor = TextExtractor::plain_only().with_max_input_bytes(8);
        let doc = InputDocument::text("nine chars");
        assert!(matches!(
            extractor.extract(&doc),
            Err(ExtractError::InputTooLarge { size: 10, limit: 8 })
        ));
    }
}
