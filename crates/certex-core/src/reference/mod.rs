//! Reference datasets: climate by date and the certificate registry journal.

pub mod climate;
pub mod columns;
mod enricher;
pub mod registry;
pub mod table;

pub use climate::{Climate, ClimateLookup, ClimateTable};
pub use columns::{ColumnClassifier, ColumnRole, classify_climate_column, classify_registry_column};
pub use enricher::ReferenceEnricher;
pub use registry::{RegistryCache, RegistryLookup, RegistryTable};
pub use table::{Table, TableSource};
