//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// lopdf parses and, where needed, decrypts the document; pdf-extract reads
/// the text layer from the (decrypted) bytes.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Text content of a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub pdf_type: PdfType,
    pub page_count: u32,
    /// Concatenated text of all pages.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load `data` and read its text layer in one step.
    pub fn read(data: &[u8], min_text_length: usize) -> Result<PdfContent> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        extractor.extract_all(min_text_length)
    }

    /// Extract the text layer of the loaded document.
    pub fn extract_all(&self, min_text_length: usize) -> Result<PdfContent> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let text = self.extract_text()?;
        let pdf_type = classify(&text, min_text_length);
        let page_count = self.page_count();

        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            page_count,
            text.chars().count(),
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            page_count,
            text,
        })
    }
}

fn classify(text: &str, min_text_length: usize) -> PdfType {
    if text.trim().chars().count() >= min_text_length {
        PdfType::Text
    } else {
        PdfType::Empty
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self, min_text_length: usize) -> PdfType {
        let text = self.extract_text().unwrap_or_default();
        classify(&text, min_text_length)
    }

    fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}
