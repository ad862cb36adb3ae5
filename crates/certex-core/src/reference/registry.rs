//! Certificate registry journal lookup.

use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use super::columns::{ColumnClassifier, ColumnRole, classify_registry_column, identify_columns};
use super::table::{Table, TableSource, parse_date_cell};
use crate::error::DatasetError;
use crate::models::record::RegistryEntry;

/// Source of registry entries by certificate registration number.
pub trait RegistryLookup: Send + Sync {
    /// Entry whose registration number cell contains `registration_number`.
    fn entry_for(&self, registration_number: &str) -> Option<RegistryEntry>;
}

#[derive(Debug, Clone)]
struct Row {
    /// Folded registration number cell.
    key: String,
    entry: RegistryEntry,
}

/// Registry journal indexed for substring lookup.
#[derive(Debug, Clone, Default)]
pub struct RegistryTable {
    rows: Vec<Row>,
}

impl RegistryTable {
    /// Load and index a registry journal.
    pub fn load(source: &TableSource) -> Result<Self, DatasetError> {
        let table = Table::load(source)?;
        let registry = Self::from_table(&table)?;
        info!(
            "Registry journal ready: {} rows from {}",
            registry.len(),
            source.path.display()
        );
        Ok(registry)
    }

    pub fn from_table(table: &Table) -> Result<Self, DatasetError> {
        Self::from_table_with(table, classify_registry_column)
    }

    /// Index a table using a custom column classifier.
    pub fn from_table_with(table: &Table, classifier: ColumnClassifier) -> Result<Self, DatasetError> {
        let columns = identify_columns(
            table,
            classifier,
            &[
                ColumnRole::RegistryKey,
                ColumnRole::SequenceNumber,
                ColumnRole::FilingDate,
                ColumnRole::Engineer,
            ],
        )?;
        let (key_col, seq_col, date_col, engineer_col) =
            (columns[0], columns[1], columns[2], columns[3]);

        let rows = (0..table.len())
            .filter(|&row| !table.cell(row, key_col).is_empty())
            .map(|row| Row {
                key: fold_registration(table.cell(row, key_col)),
                entry: RegistryEntry {
                    sequence_number: table.cell(row, seq_col).to_string(),
                    filing_date: render_date(table.cell(row, date_col)),
                    engineer: table.cell(row, engineer_col).to_string(),
                },
            })
            .collect();

        Ok(Self { rows })
    }

    /// First entry whose registration number cell contains `registration_number`,
    /// ignoring case and Cyrillic/Latin look-alike letters.
    pub fn lookup(&self, registration_number: &str) -> Option<RegistryEntry> {
        let needle = fold_registration(registration_number);
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.key.contains(&needle))
            .map(|row| row.entry.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RegistryLookup for RegistryTable {
    fn entry_for(&self, registration_number: &str) -> Option<RegistryEntry> {
        self.lookup(registration_number)
    }
}

fn render_date(cell: &str) -> String {
    parse_date_cell(cell)
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| cell.to_string())
}

/// Lower-case a registration number, map Cyrillic letters that look like
/// Latin ones to Latin and collapse whitespace.
pub fn fold_registration(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'а' => 'a',
            'в' => 'b',
            'е' => 'e',
            'к' => 'k',
            'м' => 'm',
            'н' => 'h',
            'о' => 'o',
            'р' => 'p',
            'с' => 'c',
            'т' => 't',
            'у' => 'y',
            'х' => 'x',
            c => c,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Registry journal loaded on first use and shared across documents.
///
/// A load failure is logged once; every later lookup then misses.
#[derive(Debug, Default)]
pub struct RegistryCache {
    source: Option<TableSource>,
    table: OnceLock<Option<Arc<RegistryTable>>>,
}

impl RegistryCache {
    pub fn new(source: Option<TableSource>) -> Self {
        Self {
            source,
            table: OnceLock::new(),
        }
    }

    /// Cache over an already loaded table.
    pub fn preloaded(table: RegistryTable) -> Self {
        Self {
            source: None,
            table: OnceLock::from(Some(Arc::new(table))),
        }
    }

    /// The journal, loading it on first call.
    pub fn get(&self) -> Option<Arc<RegistryTable>> {
        self.table
            .get_or_init(|| {
                let source = self.source.as_ref()?;
                match RegistryTable::load(source) {
                    Ok(table) => Some(Arc::new(table)),
                    Err(e) => {
                        warn!(
                            "Registry journal {} unavailable, registry enrichment disabled: {}",
                            source.path.display(),
                            e
                        );
                        None
                    }
                }
            })
            .clone()
    }

    /// Whether a load has been attempted.
    #[cfg(test)]
    fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }
}

impl RegistryLookup for RegistryCache {
    fn entry_for(&self, registration_number: &str) -> Option<RegistryEntry> {
        self.get()?.lookup(registration_number)
    }
}
