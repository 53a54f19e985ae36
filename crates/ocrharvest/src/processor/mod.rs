pub mod ocr;
pub mod reading_order;
pub mod urls;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

pub use ocr::{BoundingBox, OcrEngine, OcrOutcome, TesseractEngine, TextRegion};
pub use reading_order::reconstruct;
pub use urls::extract_urls;

use crate::sanitize;

/// How recognition went for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionStatus {
    Recognized,
    NoText,
    Failed(String),
}

/// Text and links recovered from one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    /// File name without its extension.
    pub source_base_name: String,
    pub recognized_text: String,
    pub urls: Vec<String>,
    pub status: RecognitionStatus,
}

impl ImageResult {
    pub fn char_count(&self) -> usize {
        self.recognized_text.chars().count()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, RecognitionStatus::Failed(_))
    }
}

/// Runs OCR, reading-order reconstruction and link extraction for an image.
#[derive(Clone)]
pub struct ImageProcessor {
    engine: Arc<dyn OcrEngine>,
    language_hints: Arc<[String]>,
}

impl ImageProcessor {
    pub fn new(engine: Arc<dyn OcrEngine>, language_hints: &[String]) -> Self {
        Self {
            engine,
            language_hints: language_hints.into(),
        }
    }

    pub fn language_hints(&self) -> &[String] {
        &self.language_hints
    }

    /// Never fails: an engine failure yields an empty result marked `Failed`.
    pub fn process(&self, path: &Path) -> ImageResult {
        let _span = tracing::info_span!("processor.image", file = %sanitize::redact_path(path))
            .entered();

        let outcome = self.engine.recognize(path, &self.language_hints);
        let status = match &outcome {
            OcrOutcome::Recognized(_) => RecognitionStatus::Recognized,
            OcrOutcome::NoText => RecognitionStatus::NoText,
            OcrOutcome::Failed(e) => {
                warn!(
                    "OCR failed for {}, continuing with empty text: {}",
                    sanitize::redact_path(path),
                    e
                );
                RecognitionStatus::Failed(e.to_string())
            }
        };

        let recognized_text = reconstruct(outcome.into_regions());
        let urls = extract_urls(&recognized_text);

        ImageResult {
            source_base_name: base_name(path),
            recognized_text,
            urls,
            status,
        }
    }
}

/// File name with the last extension removed, as used for output names.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string())
}
