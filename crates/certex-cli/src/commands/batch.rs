//! Batch processing command for multiple certificate files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use certex_core::models::record::VehicleRecord;
use certex_core::{BatchSummary, DocumentOutcome, DocumentPipeline, StoredRow, VehicleStore};

use super::process::DatasetArgs;
use super::{OutputFormat, format_record, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Store records in the vehicles table and export it to vehicles.csv
    #[arg(long)]
    table: bool,

    /// SQLite database holding the vehicles table (default: vehicles.db in the output directory)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Exit with an error status when any document failed
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    datasets: DatasetArgs,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.datasets.apply(&mut config);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing documents already started");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let pipeline = DocumentPipeline::from_config(&config);
    let hint = args.datasets.category_hint(&config).map(str::to_string);
    let jobs = args.jobs.max(1);

    let outcomes = {
        let cancel = Arc::clone(&cancel);
        let pb = overall_pb.clone();
        tokio::task::spawn_blocking(move || {
            process_files(&pipeline, &files, hint.as_deref(), jobs, &cancel, &pb)
        })
        .await??
    };

    overall_pb.finish_with_message("Complete");

    let summary = BatchSummary::from_outcomes(&outcomes);

    if let Some(output_dir) = &args.output_dir {
        for outcome in &outcomes {
            if let DocumentOutcome::Extracted { source, record } = outcome {
                let output_name = Path::new(source)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("certificate");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = output_path_for(&args.output_dir, "summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if args.table || args.database.is_some() {
        let db_path = args
            .database
            .clone()
            .unwrap_or_else(|| output_path_for(&args.output_dir, "vehicles.db"));
        let records: Vec<&VehicleRecord> = outcomes.iter().filter_map(|o| o.record()).collect();

        let store = VehicleStore::open(&db_path)?;
        let stored = store.insert_all(records.iter().copied())?;
        let suspicious = stored.iter().filter(|s| s.suspicious).count();
        info!("Stored {} records in {}", stored.len(), db_path.display());

        let table_path = output_path_for(&args.output_dir, "vehicles.csv");
        let rows = store.rows()?;
        write_table(&table_path, &rows)?;
        println!(
            "{} {} records stored in {} ({} with a duplicate VIN), {} rows exported to {}",
            style("✓").green(),
            stored.len(),
            db_path.display(),
            suspicious,
            rows.len(),
            table_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.processed,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} cancelled",
        style(summary.succeeded).green(),
        style(summary.failed).red(),
        style(summary.cancelled).yellow()
    );

    let failed: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, DocumentOutcome::Failed { .. }))
        .collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in failed {
            println!(
                "  - {}: {}",
                outcome.source(),
                outcome.error().unwrap_or("unknown error")
            );
        }

        if args.strict {
            anyhow::bail!("{} of {} documents failed", summary.failed, summary.processed);
        }
    }

    Ok(())
}

/// Run every file through the pipeline on a pool of `jobs` threads.
///
/// Outcomes keep the order of `files`. A failed document never stops the
/// others; only cancellation skips files not yet started.
fn process_files(
    pipeline: &DocumentPipeline,
    files: &[PathBuf],
    hint: Option<&str>,
    jobs: usize,
    cancel: &AtomicBool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<DocumentOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()?;

    let outcomes: Vec<DocumentOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let outcome = pipeline.outcome_for(path, hint, cancel);
                if let DocumentOutcome::Failed { source, error } = &outcome {
                    warn!("Failed to process {}: {}", source, error);
                }
                pb.inc(1);
                outcome
            })
            .collect()
    });

    Ok(outcomes)
}

fn output_path_for(output_dir: &Option<PathBuf>, name: &str) -> PathBuf {
    output_dir
        .as_ref()
        .map(|d| d.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn write_summary(path: &Path, outcomes: &[DocumentOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "brand",
        "vin",
        "year",
        "registration_number",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = Path::new(outcome.source())
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match outcome.record() {
            Some(record) => wtr.write_record([
                filename,
                outcome.status(),
                &record.brand,
                &record.vin,
                &record.year,
                &record.registration_number,
                "",
            ])?,
            None => wtr.write_record([
                filename,
                outcome.status(),
                "",
                "",
                "",
                "",
                outcome.error().unwrap_or(""),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Export stored rows: `id`, the flattened record columns, and the
/// `suspicious` duplicate-VIN flag.
///
/// Category columns are the union over all rows; a row lacking one leaves the
/// cell empty.
fn write_table(path: &Path, rows: &[StoredRow]) -> anyhow::Result<()> {
    let mut columns: Vec<String> = VehicleRecord::new()
        .flatten()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    let category_columns: BTreeSet<&String> = rows
        .iter()
        .flat_map(|row| row.columns.iter().map(|(k, _)| k))
        .filter(|k| k.starts_with("cat_"))
        .collect();
    columns.extend(category_columns.into_iter().cloned());

    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["id".to_string()];
    header.extend(columns.iter().cloned());
    header.push("suspicious".to_string());
    wtr.write_record(&header)?;

    for row in rows {
        let mut line = vec![row.id.to_string()];
        line.extend(columns.iter().map(|c| row.get(c).unwrap_or_default().to_string()));
        line.push(row.suspicious.to_string());
        wtr.write_record(&line)?;
    }

    wtr.flush()?;
    Ok(())
}
