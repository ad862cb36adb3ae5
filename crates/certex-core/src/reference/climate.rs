//! Ambient climate by date.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use super::columns::{ColumnClassifier, ColumnRole, classify_climate_column, identify_columns};
use super::table::{Table, TableSource, parse_date_cell};
use crate::error::DatasetError;

/// Temperature and humidity recorded for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Climate {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Source of climate values by calendar date.
pub trait ClimateLookup: Send + Sync {
    /// Climate on `date`, or `None` when the date is not recorded.
    fn climate_on(&self, date: NaiveDate) -> Option<Climate>;
}

/// Climate table keyed by exact date.
#[derive(Debug, Clone, Default)]
pub struct ClimateTable {
    days: HashMap<NaiveDate, Climate>,
}

impl ClimateTable {
    /// Load and index a climate dataset.
    pub fn load(source: &TableSource) -> Result<Self, DatasetError> {
        let table = Table::load(source)?;
        let climate = Self::from_table(&table)?;
        info!(
            "Climate table ready: {} days from {}",
            climate.len(),
            source.path.display()
        );
        Ok(climate)
    }

    pub fn from_table(table: &Table) -> Result<Self, DatasetError> {
        Self::from_table_with(table, classify_climate_column)
    }

    /// Index a table using a custom column classifier.
    ///
    /// Rows whose date cell does not parse are skipped. When a date occurs
    /// twice the first row wins.
    pub fn from_table_with(table: &Table, classifier: ColumnClassifier) -> Result<Self, DatasetError> {
        let columns = identify_columns(
            table,
            classifier,
            &[ColumnRole::Date, ColumnRole::Temperature, ColumnRole::Humidity],
        )?;
        let (date_col, temp_col, humidity_col) = (columns[0], columns[1], columns[2]);

        let mut days = HashMap::new();
        for row in 0..table.len() {
            let Some(date) = parse_date_cell(table.cell(row, date_col)) else {
                continue;
            };
            days.entry(date).or_insert(Climate {
                temperature: parse_number(table.cell(row, temp_col)),
                humidity: parse_number(table.cell(row, humidity_col)),
            });
        }

        Ok(Self { days })
    }

    pub fn lookup(&self, date: NaiveDate) -> Option<Climate> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl ClimateLookup for ClimateTable {
    fn climate_on(&self, date: NaiveDate) -> Option<Climate> {
        self.lookup(date)
    }
}

/// Parse a numeric cell, accepting a decimal comma and spaces.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().ok()
}
