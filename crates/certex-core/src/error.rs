//! Error types for the certex-core library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the certex library.
#[derive(Error, Debug)]
pub enum CertexError {
    /// The supplied document text is unusable.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The extracted record failed the mandatory-field gate.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A reference dataset could not be loaded or understood.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The vehicle store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised before field extraction starts.
///
/// Missing optional fields are never an error; these variants only cover
/// input that cannot be treated as document text at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The document produced no text (empty or whitespace only).
    #[error("document text is empty")]
    EmptyInput,

    /// The document bytes are not valid UTF-8 text.
    #[error("document text is not valid UTF-8: {0}")]
    InvalidEncoding(String),
}

/// Mandatory record fields checked by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MandatoryField {
    Brand,
    Vin,
    Year,
}

impl MandatoryField {
    /// All mandatory fields in reporting order.
    pub const ALL: [MandatoryField; 3] = [Self::Brand, Self::Vin, Self::Year];

    /// Column name of the field in the flattened record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Vin => "vin",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by record validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more of brand, VIN and year are empty.
    #[error("missing mandatory fields: {}", join_fields(.missing))]
    MissingMandatoryFields { missing: Vec<MandatoryField> },
}

fn join_fields(fields: &[MandatoryField]) -> String {
    fields
        .iter()
        .map(MandatoryField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors related to reference datasets (climate table, certificate registry).
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file or sheet does not exist.
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read the dataset from disk.
    #[error("failed to read dataset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not well-formed CSV.
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be opened or a sheet could not be read.
    #[error("unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// The workbook has no sheet with the requested name.
    #[error("sheet {sheet:?} not found in {}", .path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    /// Required columns could not be identified from the header.
    #[error("could not identify columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

/// Errors raised by the SQLite vehicle store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Category fields could not be encoded or decoded.
    #[error("category fields: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the certex library.
pub type Result<T> = std::result::Result<T, CertexError>;
