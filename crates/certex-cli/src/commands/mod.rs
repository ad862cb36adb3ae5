//! Subcommands of the `certex` binary.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use certex_core::models::config::CertexConfig;
use certex_core::models::record::VehicleRecord;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("certex")
        .join("config.json")
}

/// Configuration file in effect: `-c` if given, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration from `-c`, the default location, or built-in defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<CertexConfig> {
    if let Some(path) = explicit {
        return Ok(CertexConfig::from_file(Path::new(path))?);
    }
    let path = default_config_path();
    if path.exists() {
        Ok(CertexConfig::from_file(&path)?)
    } else {
        Ok(CertexConfig::default())
    }
}

/// Output format of extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (flattened record)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub fn format_record(record: &VehicleRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_record_csv(record),
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_csv(record: &VehicleRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let columns = record.flatten();

    wtr.write_record(columns.iter().map(|(k, _)| k))?;
    wtr.write_record(columns.iter().map(|(_, v)| v))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &VehicleRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Vehicle: {} {} {}\n",
        record.brand, record.commercial_name, record.vehicle_type
    ));
    output.push_str(&format!("VIN: {}\n", record.vin));
    output.push_str(&format!("Year: {}\n", record.year));
    output.push_str(&format!("Category: {}\n", record.category));
    output.push_str(&format!(
        "Certificate: {} ({})\n",
        record.registration_number, record.issue_date
    ));
    output.push('\n');

    output.push_str(&format!("Manufacturer: {}\n", record.manufacturer));
    output.push_str(&format!("Applicant: {}\n", record.applicant));
    output.push('\n');

    output.push_str("Engine:\n");
    output.push_str(&format!("  {}\n", record.engine.model));
    if !record.engine.power.is_empty() {
        output.push_str(&format!("  Power: {}\n", record.engine.power));
    }
    output.push_str(&format!(
        "Dimensions: {} x {} x {}\n",
        record.dimensions.length, record.dimensions.width, record.dimensions.height
    ));

    if !record.category_fields.is_empty() {
        output.push('\n');
        for (key, value) in &record.category_fields {
            output.push_str(&format!("{}: {}\n", key, value));
        }
    }

    if !record.registry.is_empty() {
        output.push_str(&format!(
            "\nRegistry: #{} filed {} by {}\n",
            record.registry.sequence_number, record.registry.filing_date, record.registry.engineer
        ));
    }
    if let Some(t) = record.temperature {
        output.push_str(&format!("Temperature: {}\n", t));
    }
    if let Some(h) = record.humidity {
        output.push_str(&format!("Humidity: {}\n", h));
    }

    output
}
