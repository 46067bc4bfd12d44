use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use leads_cleaner::app::ports::ConfirmationPort;
use leads_cleaner::config::Config;
use leads_cleaner::infra::{
    print_counts, AssumeYesConfirmation, ConsoleConfirmation, JsonFileDocumentStore,
    TracingEventSink,
};
use leads_cleaner::observability::init_logging;
use leads_cleaner::{CleanLeadsUseCase, CleanOutcome, CleanRequest};

#[derive(Parser)]
#[command(name = "leads_cleaner")]
#[command(about = "Validate, deduplicate, and save lead records from a JSON document")]
#[command(version)]
#[command(after_help = "Examples:\n  \
    leads_cleaner --input-file data.json --output-file processed.json\n  \
    leads_cleaner --input-file data.json --output-file valid.json --log-file validation.log")]
struct Cli {
    /// Input JSON file path
    #[arg(long)]
    input_file: PathBuf,

    /// Output JSON file path
    #[arg(long)]
    output_file: PathBuf,

    /// Log file path [default: processing.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also write the records that failed validation, with their errors, to this path
    #[arg(long)]
    rejected_file: Option<PathBuf>,

    /// TOML config file [default: leads_cleaner.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Continue with only the valid records without asking
    #[arg(long, short = 'y')]
    yes: bool,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if !cli.input_file.exists() {
        eprintln!(
            "Error: Input file '{}' does not exist",
            cli.input_file.display()
        );
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error processing file: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log_file = cli.log_file.unwrap_or(config.logging.file);
    let _guard = init_logging(&log_file, &config.logging.filter)
        .with_context(|| format!("Failed to open log file '{}'", log_file.display()))?;
    info!("Log file: {}", log_file.display());

    let confirmation: Box<dyn ConfirmationPort> = if cli.yes || config.prompt.assume_yes {
        Box::new(AssumeYesConfirmation)
    } else {
        Box::new(ConsoleConfirmation)
    };
    let use_case = CleanLeadsUseCase::new(
        Box::new(JsonFileDocumentStore::new()),
        confirmation,
        Arc::new(TracingEventSink::new()),
    );

    let request = CleanRequest {
        input: cli.input_file,
        output: cli.output_file,
        rejected: cli.rejected_file,
    };

    let outcome = use_case
        .run(&request)
        .with_context(|| format!("Error processing file '{}'", request.input.display()))?;

    match outcome {
        CleanOutcome::Aborted(_) => {
            println!("Process cancelled.");
        }
        CleanOutcome::Completed(summary) => {
            // With invalid records the confirmation step has already shown these
            if summary.validation.invalid == 0 {
                print_counts(&summary.validation);
            }

            println!("\nFinal Results:");
            println!("Original records: {}", summary.original_count);
            println!("Final records: {}", summary.final_count);
            println!("Removed invalid: {}", summary.removed_invalid);
            println!("Removed duplicates: {}", summary.removed_duplicates);
            println!("Processed data saved to: {}", summary.output.display());
        }
    }

    Ok(())
}
