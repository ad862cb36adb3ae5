//! Mandatory-field gate for extracted records.

use tracing::debug;

use crate::error::{MandatoryField, ValidationError};
use crate::models::record::VehicleRecord;

fn value(record: &VehicleRecord, field: MandatoryField) -> &str {
    match field {
        MandatoryField::Brand => &record.brand,
        MandatoryField::Vin => &record.vin,
        MandatoryField::Year => &record.year,
    }
}

/// Check that brand, VIN and year are present.
///
/// Whitespace-only values count as missing. The error lists every missing
/// field in the order brand, VIN, year.
pub fn check(record: &VehicleRecord) -> Result<(), ValidationError> {
    let missing: Vec<MandatoryField> = MandatoryField::ALL
        .into_iter()
        .filter(|&field| value(record, field).trim().is_empty())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        debug!("Record from {:?} is missing {:?}", record.source_document, missing);
        Err(ValidationError::MissingMandatoryFields { missing })
    }
}

/// Pass the record through unchanged if it carries every mandatory field.
pub fn validate(record: VehicleRecord) -> Result<VehicleRecord, ValidationError> {
    check(&record)?;
    Ok(record)
}
