//! Core library for vehicle safety certificate (СБКТС) processing.
//!
//! This crate provides:
//! - Page boilerplate removal for extracted certificate text
//! - A declarative catalog of field boundary rules, common and per category
//! - Record extraction into a fixed-shape vehicle record
//! - Enrichment from a climate table and the certificate registry journal
//! - The brand/VIN/year gate and a per-document pipeline
//! - A SQLite vehicle table with duplicate VIN flagging
//! - PDF text layer extraction (feature `pdf`)

pub mod certificate;
pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod pipeline;
pub mod reference;
pub mod storage;

pub use certificate::{
    CertificateParser, Category, ExtractionResult, FieldPatternCatalog, RecordExtractor, check,
    normalize, validate,
};
pub use error::{
    CertexError, DatasetError, ExtractionError, MandatoryField, Result, StorageError,
    ValidationError,
};
pub use models::{CertexConfig, DatasetConfig, VehicleRecord};
#[cfg(feature = "pdf")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use pipeline::{BatchSummary, DocumentOutcome, DocumentPipeline};
pub use reference::{
    ClimateLookup, ClimateTable, ReferenceEnricher, RegistryCache, RegistryLookup, RegistryTable,
    TableSource,
};
pub use storage::{StoredRow, StoredVehicle, VehicleStore};
