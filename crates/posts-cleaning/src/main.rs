//! CLI entry point for the posts cleaning pipeline.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use posts_cleaning::io::{read_table, write_table};
use posts_cleaning::{
    CleanerConfig, CleaningError, CleaningOutcome, CleaningPipeline, CleaningStage, ProgressUpdate,
    QualityReport, UpdateKind,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Social media posts CSV cleaning pipeline",
    long_about = "Cleans a social media posts CSV export and writes a data quality report.\n\n\
                  The pipeline runs fourteen fixed steps: header cleanup, numeric\n\
                  de-quoting, boolean and date normalization, email repair, text\n\
                  sanitization, tag deduplication, engagement recalculation and\n\
                  range validation. Every fix is tallied in the JSON report.\n\n\
                  EXAMPLES:\n  \
                  # Clean the default export\n  \
                  posts-cleaning\n\n  \
                  # Custom paths\n  \
                  posts-cleaning -i export.csv -o cleaned.csv -r report.json\n\n  \
                  # Run all passes without writing any files\n  \
                  posts-cleaning --dry-run"
)]
struct Args {
    /// Path to the raw posts CSV export
    #[arg(short, long, default_value = "data/social_media_posts_data.csv")]
    input: PathBuf,

    /// Path for the cleaned CSV
    #[arg(short, long, default_value = "data/social_media_posts_data_clean.csv")]
    output: PathBuf,

    /// Path for the JSON data quality report
    #[arg(short, long, default_value = "data/data_quality_report.json")]
    report: PathBuf,

    /// Fallback date for unparseable post_date values (YYYY-MM-DD)
    #[arg(long)]
    fallback_date: Option<NaiveDate>,

    /// Run every cleaning pass but write neither the CSV nor the report
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress narration (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Diagnostics go to stderr so that stdout carries only the narration.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Render one progress update as console narration.
///
/// Note: this uses `println!` intentionally for user-facing CLI output.
/// Unlike logging (`info!`, `debug!`), narration must stay visible
/// regardless of log level settings.
fn render_update(update: ProgressUpdate) {
    match update.kind {
        UpdateKind::Started => {
            println!(
                "\n[{}/{}] {}",
                update.stage.step_number(),
                CleaningStage::TOTAL_STEPS,
                update.message
            );
        }
        UpdateKind::Success => {
            // Header results print flush with the step line like the
            // load/save results; the inner passes indent theirs.
            if matches!(
                update.stage,
                CleaningStage::ReadingInput
                    | CleaningStage::CleaningHeaders
                    | CleaningStage::SavingOutput
            ) {
                println!("✓ {}", update.message);
            } else {
                println!("  ✓ {}", update.message);
            }
        }
        UpdateKind::Warning => println!("  ⚠ {}", update.message),
        UpdateKind::Detail => println!("    - {}", update.message),
    }
}

fn print_banner() {
    println!("{}", "=".repeat(80));
    println!("CSV DATA CLEANING");
    println!("{}", "=".repeat(80));
}

fn print_summary(report: &QualityReport, output: &Path, report_path: &Path) {
    println!("\n{}", "=".repeat(80));
    println!("CLEANING SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Total rows processed: {}", report.total_rows_processed);
    println!(
        "Total issue categories fixed: {}",
        report.total_issue_categories_fixed
    );
    println!("Output file: {}", output.display());
    println!("Report file: {}", report_path.display());
    println!("{}", "=".repeat(80));
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);

    let narrate = !args.quiet;

    if narrate {
        print_banner();
        println!(
            "\n[1/{}] {}",
            CleaningStage::TOTAL_STEPS,
            CleaningStage::ReadingInput.display_name()
        );
    }

    let table = match read_table(&args.input) {
        Ok(table) => table,
        Err(CleaningError::InputNotFound(path)) => {
            eprintln!("✗ Error: Input CSV not found at {}", path);
            eprintln!("  Expected location: {}", path);
            std::process::exit(1);
        }
        Err(CleaningError::LoadFailed(reason)) => {
            eprintln!("✗ Error reading CSV: {}", reason);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if narrate {
        println!("✓ Loaded {} rows, {} columns", table.height(), table.width());
    }

    let mut config_builder = CleanerConfig::builder();
    if let Some(date) = args.fallback_date {
        config_builder = config_builder.fallback_date(date);
    }
    let config = config_builder.build()?;

    let mut pipeline_builder = CleaningPipeline::builder().config(config);
    if narrate {
        pipeline_builder = pipeline_builder.on_progress(render_update);
    }
    let pipeline = pipeline_builder.build()?;

    let CleaningOutcome { mut table, report } = pipeline.run(table)?;

    if narrate {
        println!(
            "\n[{}/{}] {}",
            CleaningStage::TOTAL_STEPS,
            CleaningStage::TOTAL_STEPS,
            CleaningStage::SavingOutput.display_name()
        );
    }

    if args.dry_run {
        info!("Dry run requested, skipping output writes");
        if narrate {
            println!("✓ Dry run: cleaned CSV and report were not written");
        }
    } else {
        write_table(&mut table, &args.output)?;
        if narrate {
            println!("✓ Cleaned CSV saved to: {}", args.output.display());
        }

        report.save(&args.report)?;
        if narrate {
            println!("\n✓ Data quality report saved to: {}", args.report.display());
        }
    }

    if narrate {
        print_summary(&report, &args.output, &args.report);
    }

    Ok(())
}
