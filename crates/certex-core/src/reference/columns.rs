//! Column identification by header heuristics.

use std::fmt;

use tracing::debug;

use super::table::Table;
use crate::error::DatasetError;

/// Meaning of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Date,
    Temperature,
    Humidity,
    /// Registration number of the certificate.
    RegistryKey,
    /// Journal sequence number (`№ п/п`).
    SequenceNumber,
    /// Application filing date.
    FilingDate,
    Engineer,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::RegistryKey => "registration number",
            Self::SequenceNumber => "sequence number",
            Self::FilingDate => "filing date",
            Self::Engineer => "engineer",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a header name to the role it plays, if any.
pub type ColumnClassifier = fn(&str) -> Option<ColumnRole>;

/// Default classifier for the climate table.
pub fn classify_climate_column(name: &str) -> Option<ColumnRole> {
    let name = name.to_lowercase();
    if name.contains("дата") || name.contains("date") {
        Some(ColumnRole::Date)
    } else if name.contains("темп") || name.contains("temp") {
        Some(ColumnRole::Temperature)
    } else if name.contains("влаж") || name.contains("humid") {
        Some(ColumnRole::Humidity)
    } else {
        None
    }
}

/// Default classifier for the certificate registry journal.
pub fn classify_registry_column(name: &str) -> Option<ColumnRole> {
    let lower = name.to_lowercase();
    if lower.contains("регистрационный") && lower.contains("номер") && lower.contains("сбктс") {
        Some(ColumnRole::RegistryKey)
    } else if name.contains('№') && lower.contains("п/п") {
        Some(ColumnRole::SequenceNumber)
    } else if lower.contains("дата") && lower.contains("заяв") {
        Some(ColumnRole::FilingDate)
    } else if lower.contains("инженер") {
        Some(ColumnRole::Engineer)
    } else {
        None
    }
}

#[derive(Debug, Default)]
struct ColumnMap {
    assigned: Vec<(ColumnRole, usize)>,
}

impl ColumnMap {
    fn get(&self, role: ColumnRole) -> Option<usize> {
        self.assigned
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, i)| *i)
    }

    fn contains_column(&self, col: usize) -> bool {
        self.assigned.iter().any(|(_, i)| *i == col)
    }
}

/// Assign columns to roles.
///
/// The first column whose header maps to a role wins. When `Date` is required
/// but no header names it, the first unassigned column holding only dates is
/// used. Every role in `required` must be found; the returned indices follow
/// the order of `required`.
pub fn identify_columns(
    table: &Table,
    classifier: ColumnClassifier,
    required: &[ColumnRole],
) -> Result<Vec<usize>, DatasetError> {
    let mut map = ColumnMap::default();

    for (i, name) in table.columns().iter().enumerate() {
        if let Some(role) = classifier(name) {
            if map.get(role).is_none() {
                debug!("Column {:?} identified as {}", name, role);
                map.assigned.push((role, i));
            }
        }
    }

    if required.contains(&ColumnRole::Date) && map.get(ColumnRole::Date).is_none() {
        let typed = (0..table.columns().len())
            .find(|&i| !map.contains_column(i) && table.is_date_column(i));
        if let Some(i) = typed {
            debug!("Column {:?} identified as date by its cells", table.columns()[i]);
            map.assigned.push((ColumnRole::Date, i));
        }
    }

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|role| map.get(**role).is_none())
        .map(ColumnRole::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    Ok(required.iter().filter_map(|role| map.get(*role)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_climate_classifier() {
        assert_eq!(classify_climate_column("Дата"), Some(ColumnRole::Date));
        assert_eq!(classify_climate_column("Temperature, °C"), Some(ColumnRole::Temperature));
        assert_eq!(classify_climate_column("Относительная ВЛАЖНОСТЬ"), Some(ColumnRole::Humidity));
        assert_eq!(classify_climate_column("Примечание"), None);
    }

    #[test]
    fn test_registry_classifier() {
        assert_eq!(
            classify_registry_column("Регистрационный номер СБКТС"),
            Some(ColumnRole::RegistryKey)
        );
        assert_eq!(classify_registry_column("№ п/п"), Some(ColumnRole::SequenceNumber));
        assert_eq!(classify_registry_column("Дата заявки"), Some(ColumnRole::FilingDate));
        assert_eq!(classify_registry_column("Инженер"), Some(ColumnRole::Engineer));
        assert_eq!(classify_registry_column("Дата выдачи"), None);
    }

    #[test]
    fn test_first_matching_column_wins() {
        let table = Table::parse("Темп. утро;Темп. вечер;Влажность;Дата\n").unwrap();
        let columns = identify_columns(
            &table,
            classify_climate_column,
            &[ColumnRole::Date, ColumnRole::Temperature, ColumnRole::Humidity],
        )
        .unwrap();

        assert_eq!(columns, vec![3, 0, 2]);
    }

    #[test]
    fn test_date_column_found_by_content() {
        let table = Table::parse("День;Темп;Влаж\n01.03.2025;1;2\n").unwrap();
        let columns = identify_columns(
            &table,
            classify_climate_column,
            &[ColumnRole::Date, ColumnRole::Temperature, ColumnRole::Humidity],
        )
        .unwrap();
        assert_eq!(columns, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_columns_reported() {
        let table = Table::parse("Дата;Осадки\n").unwrap();
        let err = identify_columns(
            &table,
            classify_climate_column,
            &[ColumnRole::Date, ColumnRole::Temperature, ColumnRole::Humidity],
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "could not identify columns: temperature, humidity");
    }
}
