//! Vehicle record produced by one extraction pass.
//!
//! The record shape is fixed: every flat field and every member of every
//! nested group exists regardless of which rules matched, defaulting to an
//! empty string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete vehicle certificate record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleRecord {
    /// Brand (МАРКА).
    pub brand: String,
    /// Commercial name.
    pub commercial_name: String,
    /// Vehicle type designation (ТИП).
    pub vehicle_type: String,
    /// Chassis number.
    pub chassis: String,
    /// Vehicle identification number.
    pub vin: String,
    /// Year of manufacture.
    pub year: String,
    /// Vehicle category code as printed (M1, N3, O4, ...).
    pub category: String,
    /// Environmental class.
    pub eco_class: String,
    /// Certificate registration number (e.g. `BY A-BY.1739.14360`).
    pub registration_number: String,

    /// Issue date in `DD.MM.YYYY` form.
    pub issue_date: String,
    /// Zero-padded issue day.
    pub issue_day: String,
    /// Month-name token exactly as printed.
    pub issue_month: String,

    /// Applicant and its address.
    pub applicant: String,
    /// Manufacturer and its address.
    pub manufacturer: String,
    /// Assembly plant and its address.
    pub assembly_plant: String,

    pub wheel_formula: String,
    pub layout: String,
    pub cargo_space: String,
    pub cabin: String,
    /// Body type / number of doors.
    pub body_type: String,
    /// Seats front/rear.
    pub seats: String,

    /// Curb mass, kg.
    pub curb_mass: String,
    /// Technically permissible maximum mass, kg.
    pub max_mass: String,
    /// Wheelbase, mm.
    pub wheelbase: String,
    /// Front/rear track, mm.
    pub track: String,

    pub steering: String,
    pub tires: String,
    pub equipment: String,
    /// Emergency call device (УВЭОС) number.
    pub emergency_call_id: String,

    /// File the text was taken from.
    pub source_document: String,

    pub engine: Engine,
    pub fuel: FuelSystem,
    pub transmission: Transmission,
    pub suspension: Suspension,
    pub brakes: BrakingSystem,
    pub dimensions: Dimensions,
    pub base_vehicle: BaseVehicle,
    pub registry: RegistryEntry,

    /// Fields of the category-specific rule set, keyed by field id.
    pub category_fields: BTreeMap<String, String>,

    /// Ambient temperature on the issue date.
    pub temperature: Option<f64>,
    /// Ambient humidity on the issue date.
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    /// Make and type of the internal combustion engine.
    pub model: String,
    /// Number and arrangement of cylinders.
    pub cylinders: String,
    /// Maximum power, kW (min-1).
    pub power: String,
    /// Displacement, cm³.
    pub displacement: String,
    pub compression_ratio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelSystem {
    pub kind: String,
    pub supply_system: String,
    /// Exhaust and aftertreatment system.
    pub exhaust_system: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transmission {
    pub kind: String,
    pub clutch: String,
    pub gearbox: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suspension {
    pub front: String,
    pub rear: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakingSystem {
    pub service: String,
    pub backup: String,
    pub parking: String,
    /// Auxiliary (retarder) brake.
    pub auxiliary: String,
}

/// Overall dimensions, mm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub length: String,
    pub width: String,
    pub height: String,
}

/// Reference to the base vehicle a modified vehicle was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseVehicle {
    pub vin: String,
    pub modification: String,
}

/// Row of the certificate registry matched by registration number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    pub sequence_number: String,
    pub filing_date: String,
    pub engineer: String,
}

impl RegistryEntry {
    pub fn is_empty(&self) -> bool {
        self.sequence_number.is_empty() && self.filing_date.is_empty() && self.engineer.is_empty()
    }
}

/// Location inside a [`VehicleRecord`] that a single-value rule writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Brand,
    CommercialName,
    VehicleType,
    Chassis,
    Vin,
    Year,
    Category,
    EcoClass,
    RegistrationNumber,
    Applicant,
    Manufacturer,
    AssemblyPlant,
    WheelFormula,
    Layout,
    CargoSpace,
    Cabin,
    BodyType,
    Seats,
    CurbMass,
    MaxMass,
    Wheelbase,
    Track,
    Steering,
    Tires,
    Equipment,
    EmergencyCallId,
    Engine(EngineField),
    Fuel(FuelField),
    Transmission(TransmissionField),
    Suspension(SuspensionField),
    Brakes(BrakeField),
    BaseVehicle(BaseVehicleField),
    /// Category-specific field stored in `category_fields`.
    Extra(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineField {
    Model,
    Cylinders,
    Power,
    Displacement,
    CompressionRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelField {
    Kind,
    SupplySystem,
    ExhaustSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionField {
    Kind,
    Clutch,
    Gearbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspensionField {
    Front,
    Rear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrakeField {
    Service,
    Backup,
    Parking,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseVehicleField {
    Vin,
    Modification,
}

impl VehicleRecord {
    /// Create a new all-empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the string stored at `slot`.
    ///
    /// `Extra` slots are created on first access.
    pub fn slot_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Brand => &mut self.brand,
            Slot::CommercialName => &mut self.commercial_name,
            Slot::VehicleType => &mut self.vehicle_type,
            Slot::Chassis => &mut self.chassis,
            Slot::Vin => &mut self.vin,
            Slot::Year => &mut self.year,
            Slot::Category => &mut self.category,
            Slot::EcoClass => &mut self.eco_class,
            Slot::RegistrationNumber => &mut self.registration_number,
            Slot::Applicant => &mut self.applicant,
            Slot::Manufacturer => &mut self.manufacturer,
            Slot::AssemblyPlant => &mut self.assembly_plant,
            Slot::WheelFormula => &mut self.wheel_formula,
            Slot::Layout => &mut self.layout,
            Slot::CargoSpace => &mut self.cargo_space,
            Slot::Cabin => &mut self.cabin,
            Slot::BodyType => &mut self.body_type,
            Slot::Seats => &mut self.seats,
            Slot::CurbMass => &mut self.curb_mass,
            Slot::MaxMass => &mut self.max_mass,
            Slot::Wheelbase => &mut self.wheelbase,
            Slot::Track => &mut self.track,
            Slot::Steering => &mut self.steering,
            Slot::Tires => &mut self.tires,
            Slot::Equipment => &mut self.equipment,
            Slot::EmergencyCallId => &mut self.emergency_call_id,
            Slot::Engine(field) => match field {
                EngineField::Model => &mut self.engine.model,
                EngineField::Cylinders => &mut self.engine.cylinders,
                EngineField::Power => &mut self.engine.power,
                EngineField::Displacement => &mut self.engine.displacement,
                EngineField::CompressionRatio => &mut self.engine.compression_ratio,
            },
            Slot::Fuel(field) => match field {
                FuelField::Kind => &mut self.fuel.kind,
                FuelField::SupplySystem => &mut self.fuel.supply_system,
                FuelField::ExhaustSystem => &mut self.fuel.exhaust_system,
            },
            Slot::Transmission(field) => match field {
                TransmissionField::Kind => &mut self.transmission.kind,
                TransmissionField::Clutch => &mut self.transmission.clutch,
                TransmissionField::Gearbox => &mut self.transmission.gearbox,
            },
            Slot::Suspension(field) => match field {
                SuspensionField::Front => &mut self.suspension.front,
                SuspensionField::Rear => &mut self.suspension.rear,
            },
            Slot::Brakes(field) => match field {
                BrakeField::Service => &mut self.brakes.service,
                BrakeField::Backup => &mut self.brakes.backup,
                BrakeField::Parking => &mut self.brakes.parking,
                BrakeField::Auxiliary => &mut self.brakes.auxiliary,
            },
            Slot::BaseVehicle(field) => match field {
                BaseVehicleField::Vin => &mut self.base_vehicle.vin,
                BaseVehicleField::Modification => &mut self.base_vehicle.modification,
            },
            Slot::Extra(key) => self.category_fields.entry(key.to_string()).or_default(),
        }
    }

    /// Flatten the record into `(column, value)` pairs, one column per flat
    /// field and per group member, in a stable order.
    ///
    /// Category-specific fields follow the fixed columns, prefixed with `cat_`.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let opt = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();

        let fixed: [(&str, &str); 55] = [
            ("source_document", &self.source_document),
            ("brand", &self.brand),
            ("commercial_name", &self.commercial_name),
            ("vehicle_type", &self.vehicle_type),
            ("chassis", &self.chassis),
            ("vin", &self.vin),
            ("year", &self.year),
            ("category", &self.category),
            ("eco_class", &self.eco_class),
            ("registration_number", &self.registration_number),
            ("issue_date", &self.issue_date),
            ("issue_day", &self.issue_day),
            ("issue_month", &self.issue_month),
            ("applicant", &self.applicant),
            ("manufacturer", &self.manufacturer),
            ("assembly_plant", &self.assembly_plant),
            ("wheel_formula", &self.wheel_formula),
            ("layout", &self.layout),
            ("cargo_space", &self.cargo_space),
            ("cabin", &self.cabin),
            ("body_type", &self.body_type),
            ("seats", &self.seats),
            ("curb_mass", &self.curb_mass),
            ("max_mass", &self.max_mass),
            ("wheelbase", &self.wheelbase),
            ("track", &self.track),
            ("steering", &self.steering),
            ("tires", &self.tires),
            ("equipment", &self.equipment),
            ("emergency_call_id", &self.emergency_call_id),
            ("engine_model", &self.engine.model),
            ("engine_cylinders", &self.engine.cylinders),
            ("engine_power", &self.engine.power),
            ("engine_displacement", &self.engine.displacement),
            ("engine_compression_ratio", &self.engine.compression_ratio),
            ("fuel_kind", &self.fuel.kind),
            ("fuel_supply_system", &self.fuel.supply_system),
            ("fuel_exhaust_system", &self.fuel.exhaust_system),
            ("transmission_kind", &self.transmission.kind),
            ("transmission_clutch", &self.transmission.clutch),
            ("transmission_gearbox", &self.transmission.gearbox),
            ("suspension_front", &self.suspension.front),
            ("suspension_rear", &self.suspension.rear),
            ("brakes_service", &self.brakes.service),
            ("brakes_backup", &self.brakes.backup),
            ("brakes_parking", &self.brakes.parking),
            ("brakes_auxiliary", &self.brakes.auxiliary),
            ("dimensions_length", &self.dimensions.length),
            ("dimensions_width", &self.dimensions.width),
            ("dimensions_height", &self.dimensions.height),
            ("base_vehicle_vin", &self.base_vehicle.vin),
            ("base_vehicle_modification", &self.base_vehicle.modification),
            ("registry_sequence_number", &self.registry.sequence_number),
            ("registry_filing_date", &self.registry.filing_date),
            ("registry_engineer", &self.registry.engineer),
        ];

        let mut columns: Vec<(String, String)> = fixed
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        columns.push(("temperature".to_string(), opt(self.temperature)));
        columns.push(("humidity".to_string(), opt(self.humidity)));
        columns.extend(
            self.category_fields
                .iter()
                .map(|(k, v)| (format!("cat_{}", k), v.clone())),
        );
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_every_group_member_empty() {
        let record = VehicleRecord::new();
        let json = serde_json::to_value(&record).unwrap();

        let groups = [
            ("engine", 5),
            ("fuel", 3),
            ("transmission", 3),
            ("suspension", 2),
            ("brakes", 4),
            ("dimensions", 3),
            ("base_vehicle", 2),
            ("registry", 3),
        ];
        for (group, len) in groups {
            let members = json[group].as_object().unwrap();
            assert_eq!(members.len(), len, "group {group}");
            assert!(members.values().all(|v| v == ""), "group {group}");
        }
    }

    #[test]
    fn test_slot_mut_routes_group_members() {
        let mut record = VehicleRecord::new();
        *record.slot_mut(Slot::Brakes(BrakeField::Parking)) = "spring".to_string();
        *record.slot_mut(Slot::Engine(EngineField::Displacement)) = "12800".to_string();
        *record.slot_mut(Slot::Extra("payload")) = "18000".to_string();

        assert_eq!(record.brakes.parking, "spring");
        assert_eq!(record.engine.displacement, "12800");
        assert_eq!(record.category_fields["payload"], "18000");
    }

    #[test]
    fn test_flatten_has_column_per_group_member() {
        let mut record = VehicleRecord::new();
        record.dimensions.width = "2550".to_string();
        record.temperature = Some(21.5);
        record.category_fields.insert("axle_count".to_string(), "3".to_string());

        let columns = record.flatten();
        let get = |name: &str| {
            columns
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("dimensions_width"), Some("2550"));
        assert_eq!(get("temperature"), Some("21.5"));
        assert_eq!(get("humidity"), Some(""));
        assert_eq!(get("cat_axle_count"), Some("3"));
        assert_eq!(columns[0].0, "source_document");
    }
}
