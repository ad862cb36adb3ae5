//! Process command - extract a vehicle record from a single certificate.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use certex_core::models::config::CertexConfig;
use certex_core::{DocumentPipeline, ReferenceEnricher};

use super::{OutputFormat, format_record, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or UTF-8 text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    datasets: DatasetArgs,
}

/// Overrides shared by `process` and `batch`.
#[derive(Args)]
pub struct DatasetArgs {
    /// Vehicle category (M1, M3, N2, N3, O4); inferred from the text if omitted
    #[arg(long)]
    pub category: Option<String>,

    /// Climate table (xlsx/xls/ods workbook, CSV file or directory of CSV sheets)
    #[arg(long)]
    pub climate: Option<PathBuf>,

    /// Sheet of the climate table to read (default: the first)
    #[arg(long)]
    pub climate_sheet: Option<String>,

    /// Certificate registry journal (xlsx/xls/ods workbook, CSV file or directory of CSV sheets)
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Sheet of the registry journal to read (default: the first)
    #[arg(long)]
    pub registry_sheet: Option<String>,
}

impl DatasetArgs {
    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut CertexConfig) {
        if let Some(path) = &self.climate {
            config.climate.path = Some(path.clone());
        }
        if let Some(sheet) = &self.climate_sheet {
            config.climate.sheet = Some(sheet.clone());
        }
        if let Some(path) = &self.registry {
            config.registry.path = Some(path.clone());
        }
        if let Some(sheet) = &self.registry_sheet {
            config.registry.sheet = Some(sheet.clone());
        }
    }

    /// Category hint in effect: the flag, then the configured default.
    pub fn category_hint<'a>(&'a self, config: &'a CertexConfig) -> Option<&'a str> {
        self.category
            .as_deref()
            .or(config.extraction.default_category.as_deref())
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.datasets.apply(&mut config);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting fields...");

    let pipeline = DocumentPipeline::from_config(&config);
    let hint = args.datasets.category_hint(&config);
    let record = pipeline.process_file(&args.input, hint);

    pb.finish_and_clear();
    let record = record?;

    let mut output = format_record(&record, args.format)?;
    if matches!(args.format, OutputFormat::Text) {
        output.push_str(&reference_note(pipeline.enricher()));
    }

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    info!("Processed {} in {:?}", args.input.display(), start.elapsed());

    Ok(())
}

/// Which reference datasets were available for enrichment.
fn reference_note(enricher: &ReferenceEnricher) -> String {
    let state = |available: bool| if available { "available" } else { "not configured" };
    format!(
        "\nReference data: climate table {}, registry journal {}\n",
        state(enricher.has_climate()),
        state(enricher.has_registry())
    )
}
