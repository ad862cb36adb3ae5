//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the certex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertexConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Climate-by-date reference table.
    pub climate: DatasetConfig,

    /// Certificate registry reference table.
    pub registry: DatasetConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Category code used when none is given on the command line.
    pub default_category: Option<String>,

    /// Pick the category rule set from the extracted category field when no
    /// category hint is supplied.
    pub infer_category: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_category: None,
            infer_category: true,
        }
    }
}

/// Location of a tabular reference dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Workbook, CSV file, or directory holding one CSV file per sheet.
    pub path: Option<PathBuf>,

    /// Worksheet name, or the file stem inside `path` when it is a directory.
    pub sheet: Option<String>,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF as carrying a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

impl CertexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
