//! Data models for vehicle records and configuration.

pub mod config;
pub mod record;

pub use config::{CertexConfig, DatasetConfig, ExtractionConfig, PdfConfig};
pub use record::{
    BaseVehicle, BrakingSystem, Dimensions, Engine, FuelSystem, RegistryEntry, Slot, Suspension,
    Transmission, VehicleRecord,
};
