//! Merge reference data into extracted records.

use std::sync::Arc;

use tracing::{debug, warn};

use super::climate::{ClimateLookup, ClimateTable};
use super::registry::{RegistryCache, RegistryLookup};
use super::table::TableSource;
use crate::certificate::dates::parse_record_date;
use crate::models::config::CertexConfig;
use crate::models::record::VehicleRecord;

/// Adds climate and registry data to records.
///
/// Both sources are optional. A missing source, a miss, or an unparsable
/// issue date leaves the record's defaults in place.
#[derive(Clone, Default)]
pub struct ReferenceEnricher {
    climate: Option<Arc<dyn ClimateLookup>>,
    registry: Option<Arc<dyn RegistryLookup>>,
}

impl std::fmt::Debug for ReferenceEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceEnricher")
            .field("climate", &self.climate.is_some())
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

impl ReferenceEnricher {
    /// Enricher without reference data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_climate(mut self, climate: Arc<dyn ClimateLookup>) -> Self {
        self.climate = Some(climate);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistryLookup>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build from configuration.
    ///
    /// The climate table is read now; the registry journal is read on the
    /// first lookup. An unusable climate table is logged and skipped.
    pub fn from_config(config: &CertexConfig) -> Self {
        let mut enricher = Self::new();

        if let Some(source) = TableSource::from_config(&config.climate) {
            match ClimateTable::load(&source) {
                Ok(table) => enricher = enricher.with_climate(Arc::new(table)),
                Err(e) => warn!(
                    "Climate table {} unavailable, climate enrichment disabled: {}",
                    source.path.display(),
                    e
                ),
            }
        }

        if let Some(source) = TableSource::from_config(&config.registry) {
            enricher = enricher.with_registry(Arc::new(RegistryCache::new(Some(source))));
        }

        enricher
    }

    pub fn has_climate(&self) -> bool {
        self.climate.is_some()
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    /// Fill temperature, humidity and the registry group.
    pub fn enrich(&self, mut record: VehicleRecord) -> VehicleRecord {
        if let Some(climate) = &self.climate {
            match parse_record_date(&record.issue_date) {
                Some(date) => match climate.climate_on(date) {
                    Some(found) => {
                        if found.temperature.is_some() {
                            record.temperature = found.temperature;
                        }
                        if found.humidity.is_some() {
                            record.humidity = found.humidity;
                        }
                    }
                    None => debug!("No climate recorded for {}", date),
                },
                None => debug!("Issue date {:?} is not a date, climate skipped", record.issue_date),
            }
        }

        if let Some(registry) = &self.registry {
            if !record.registration_number.trim().is_empty() {
                match registry.entry_for(&record.registration_number) {
                    Some(entry) => record.registry = entry,
                    None => debug!("{} not found in registry journal", record.registration_number),
                }
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::climate::Climate;
    use crate::reference::registry::RegistryTable;
    use crate::reference::table::Table;
    use chrono::NaiveDate;

    struct FixedClimate;

    impl ClimateLookup for FixedClimate {
        fn climate_on(&self, date: NaiveDate) -> Option<Climate> {
            (date == NaiveDate::from_ymd_opt(2025, 5, 5)?).then_some(Climate {
                temperature: Some(22.0),
                humidity: Some(45.0),
            })
        }
    }

    fn registry() -> Arc<RegistryTable> {
        let table = Table::parse(
            "№ п/п,Регистрационный номер СБКТС,Дата заявки,Инженер\n3,BY A-BY.1739.14360,01.05.2025,Иванов\n",
        )
        .unwrap();
        Arc::new(RegistryTable::from_table(&table).unwrap())
    }

    fn record(issue_date: &str, number: &str) -> VehicleRecord {
        VehicleRecord {
            issue_date: issue_date.to_string(),
            registration_number: number.to_string(),
            ..VehicleRecord::new()
        }
    }

    #[test]
    fn test_enrich_hits() {
        let enricher = ReferenceEnricher::new()
            .with_climate(Arc::new(FixedClimate))
            .with_registry(registry());
        let record = enricher.enrich(record("05.05.2025", "BY А-BY.1739.14360"));

        assert_eq!(record.temperature, Some(22.0));
        assert_eq!(record.humidity, Some(45.0));
        assert_eq!(record.registry.sequence_number, "3");
        assert_eq!(record.registry.filing_date, "01.05.2025");
        assert_eq!(record.registry.engineer, "Иванов");
    }

    #[test]
    fn test_misses_leave_defaults() {
        let enricher = ReferenceEnricher::new()
            .with_climate(Arc::new(FixedClimate))
            .with_registry(registry());
        let input = record("06.05.2025", "BY A-BY.1.2");

        assert_eq!(enricher.enrich(input.clone()), input);
    }

    #[test]
    fn test_unparsable_date_and_empty_number() {
        let enricher = ReferenceEnricher::new()
            .with_climate(Arc::new(FixedClimate))
            .with_registry(registry());
        let input = record("", "");

        assert_eq!(enricher.enrich(input.clone()), input);
    }

    #[test]
    fn test_from_config_degrades_on_bad_climate() {
        let dir = tempfile::tempdir().unwrap();
        let climate = dir.path().join("climate.csv");
        std::fs::write(&climate, "Дата;Осадки\n05.05.2025;0\n").unwrap();

        let mut config = CertexConfig::default();
        config.climate.path = Some(climate);
        config.registry.path = Some(dir.path().join("journal.csv"));

        let enricher = ReferenceEnricher::from_config(&config);
        assert!(!enricher.has_climate());
        assert!(enricher.has_registry());

        let input = record("05.05.2025", "BY A-BY.1739.14360");
        assert_eq!(enricher.enrich(input.clone()), input);
    }
}
