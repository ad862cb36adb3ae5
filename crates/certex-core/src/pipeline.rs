//! Per-document pipeline and batch bookkeeping.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::certificate::{CertificateParser, RecordExtractor, validate};
use crate::error::{ExtractionError, Result};
use crate::models::config::CertexConfig;
use crate::models::record::VehicleRecord;
use crate::reference::ReferenceEnricher;

/// Runs normalize, extract, enrich and validate for one document at a time.
///
/// The pipeline holds no per-document state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    extractor: RecordExtractor,
    enricher: ReferenceEnricher,
    min_text_length: usize,
}

impl DocumentPipeline {
    pub fn new(extractor: RecordExtractor, enricher: ReferenceEnricher) -> Self {
        Self {
            extractor,
            enricher,
            min_text_length: 50,
        }
    }

    /// Build extractor and enricher from configuration.
    pub fn from_config(config: &CertexConfig) -> Self {
        let extractor = RecordExtractor::new().with_category_inference(config.extraction.infer_category);
        Self::new(extractor, ReferenceEnricher::from_config(config))
            .with_min_text_length(config.pdf.min_text_length)
    }

    /// Minimum PDF text layer length accepted as a document.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    pub fn enricher(&self) -> &ReferenceEnricher {
        &self.enricher
    }

    /// Turn raw document text into a validated record.
    ///
    /// `source` is stored as the record's source document.
    pub fn process_text(
        &self,
        raw: &str,
        source: &str,
        category_hint: Option<&str>,
    ) -> Result<VehicleRecord> {
        let extraction = self.extractor.parse(raw, category_hint)?;
        let mut record = extraction.record;
        record.source_document = source.to_string();

        let record = self.enricher.enrich(record);
        let record = validate(record)?;

        info!(
            "Extracted {} {} ({}) from {} in {}ms",
            record.brand, record.vehicle_type, record.vin, source, extraction.processing_time_ms
        );
        Ok(record)
    }

    /// Process a UTF-8 text document given as bytes.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        source: &str,
        category_hint: Option<&str>,
    ) -> Result<VehicleRecord> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::InvalidEncoding(e.to_string()))?;
        self.process_text(text, source, category_hint)
    }

    /// Process a `.pdf` or text file.
    pub fn process_file(&self, path: &Path, category_hint: Option<&str>) -> Result<VehicleRecord> {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)?;

        if is_pdf(path) {
            let text = self.pdf_text(&bytes)?;
            self.process_text(&text, &source, category_hint)
        } else {
            self.process_bytes(&bytes, &source, category_hint)
        }
    }

    #[cfg(feature = "pdf")]
    fn pdf_text(&self, bytes: &[u8]) -> Result<String> {
        use crate::pdf::{PdfExtractor, PdfType};

        let content = PdfExtractor::read(bytes, self.min_text_length)?;
        if content.pdf_type == PdfType::Empty {
            warn!("PDF has no usable text layer ({} pages)", content.page_count);
            return Err(ExtractionError::EmptyInput.into());
        }
        Ok(content.text)
    }

    #[cfg(not(feature = "pdf"))]
    fn pdf_text(&self, _bytes: &[u8]) -> Result<String> {
        Err(crate::error::CertexError::Config(
            "PDF support is disabled; rebuild with the `pdf` feature".to_string(),
        ))
    }

    /// Process one file unless `cancel` is already set.
    ///
    /// Errors are folded into the outcome.
    pub fn outcome_for(
        &self,
        path: &Path,
        category_hint: Option<&str>,
        cancel: &AtomicBool,
    ) -> DocumentOutcome {
        let source = path.display().to_string();
        if cancel.load(Ordering::SeqCst) {
            return DocumentOutcome::Cancelled { source };
        }
        match self.process_file(path, category_hint) {
            Ok(record) => DocumentOutcome::Extracted { source, record },
            Err(e) => {
                warn!("Failed to process {}: {}", source, e);
                DocumentOutcome::Failed {
                    source,
                    error: e.to_string(),
                }
            }
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Result of processing one document in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Extracted { source: String, record: VehicleRecord },
    Failed { source: String, error: String },
    /// Skipped because the batch was cancelled before it started.
    Cancelled { source: String },
}

impl DocumentOutcome {
    pub fn source(&self) -> &str {
        match self {
            Self::Extracted { source, .. }
            | Self::Failed { source, .. }
            | Self::Cancelled { source } => source,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Extracted { .. } => "success",
            Self::Failed { .. } => "failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    pub fn record(&self) -> Option<&VehicleRecord> {
        match self {
            Self::Extracted { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub failed_sources: Vec<String>,
}

impl BatchSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a DocumentOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.add(outcome);
        }
        summary
    }

    pub fn add(&mut self, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Extracted { .. } => {
                self.processed += 1;
                self.succeeded += 1;
            }
            DocumentOutcome::Failed { source, .. } => {
                self.processed += 1;
                self.failed += 1;
                self.failed_sources.push(source.clone());
            }
            DocumentOutcome::Cancelled { .. } => self.cancelled += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::sample::{SAMPLE_N3, SAMPLE_PAGE_BREAK};
    use crate::error::{CertexError, ValidationError};
    use pretty_assertions::assert_eq;

    fn pipeline() -> DocumentPipeline {
        DocumentPipeline::new(RecordExtractor::new(), ReferenceEnricher::new())
    }

    #[test]
    fn test_process_text() {
        let record = pipeline()
            .process_text(SAMPLE_N3, "volvo.pdf", Some("N3"))
            .unwrap();

        assert_eq!(record.source_document, "volvo.pdf");
        assert_eq!(record.vin, "YV2RT40A5KB123456");
        assert_eq!(record.issue_date, "05.05.2025");
        assert_eq!(record.category_fields["payload"], "11150");
        assert!(record.registry.is_empty());
        assert_eq!(record.temperature, None);
    }

    #[test]
    fn test_page_boilerplate_does_not_leak_into_values() {
        let raw = SAMPLE_N3.replace(
            "Шины 315/70R22.5\n",
            &format!("Шины 315/70R22.5\n{}\n", SAMPLE_PAGE_BREAK),
        );
        let record = pipeline().process_text(&raw, "x", None).unwrap();

        assert_eq!(record.tires, "315/70R22.5");
        assert_eq!(record.equipment, "тахограф, система экстренного вызова");
    }

    #[test]
    fn test_blank_text_is_input_error() {
        let err = pipeline().process_text("   ", "empty.txt", None).unwrap_err();
        assert!(matches!(err, CertexError::Extraction(ExtractionError::EmptyInput)));
    }

    #[test]
    fn test_missing_mandatory_fields() {
        let err = pipeline()
            .process_text("МАРКА VOLVO\nКОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH", "x", None)
            .unwrap_err();
        match err {
            CertexError::Validation(ValidationError::MissingMandatoryFields { missing }) => {
                assert_eq!(missing.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_bytes_rejects_invalid_utf8() {
        let err = pipeline().process_bytes(&[0xc3, 0x28], "bad.txt", None).unwrap_err();
        assert!(matches!(
            err,
            CertexError::Extraction(ExtractionError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_outcomes_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        std::fs::write(&good, SAMPLE_N3).unwrap();
        std::fs::write(&bad, "МАРКА X").unwrap();

        let pipeline = pipeline();
        let running = AtomicBool::new(false);
        let cancelled = AtomicBool::new(true);
        let outcomes = vec![
            pipeline.outcome_for(&good, None, &running),
            pipeline.outcome_for(&bad, None, &running),
            pipeline.outcome_for(&good, None, &cancelled),
        ];

        assert_eq!(outcomes[0].status(), "success");
        assert_eq!(outcomes[0].record().unwrap().source_document, "good.txt");
        assert_eq!(outcomes[1].status(), "failed");
        assert!(outcomes[1].error().unwrap().contains("vin"));
        assert_eq!(outcomes[2].status(), "cancelled");

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.failed_sources, vec![bad.display().to_string()]);
    }
}
