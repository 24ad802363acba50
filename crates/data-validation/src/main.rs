//! CLI entry point for the data validation stage.

use anyhow::{Context, Result};
use clap::Parser;
use data_validation::{
    RuleSet, ValidationConfig, ValidationError, ValidationSummary, Validator, run_validation,
};
use dotenv::dotenv;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data quality validation for tabular datasets",
    long_about = "Checks a raw CSV against declared column and table rules, writes the rows that \
                  passed to <data-to>/validated_data.csv and every failure to \
                  <log-to>/validation_errors.log.\n\n\
                  EXIT CODES:\n  \
                  0  validated (violations, if any, are in the log)\n  \
                  1  IO or internal failure\n  \
                  2  invalid configuration or rule file\n  \
                  3  structural failure (wrong file type or column set)\n\n\
                  EXAMPLES:\n  \
                  # Validate with the built-in maternal health rules\n  \
                  data-validation --raw-data data/raw/maternal_health_risk.csv\n\n  \
                  # Use a rule file and keep previous log entries\n  \
                  data-validation --raw-data raw.csv --rules config/maternal_health_rules.json --append-log"
)]
struct Args {
    /// Path to the raw CSV file
    #[arg(long)]
    raw_data: PathBuf,

    /// Directory for the validated dataset
    #[arg(long, default_value = "data/processed")]
    data_to: PathBuf,

    /// Directory for the validation log
    #[arg(long, default_value = "results/logs")]
    log_to: PathBuf,

    /// JSON rule file (defaults to the built-in maternal health rules)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Append to the validation log instead of truncating it
    #[arg(long)]
    append_log: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    #[arg(long)]
    json: bool,
}

/// Initialize diagnostic logging.
///
/// Disabled entirely with `--json` so stdout carries only the JSON summary.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_rules(path: Option<&PathBuf>) -> Result<RuleSet> {
    match path {
        Some(path) => {
            info!("Loading rules from {}", path.display());
            RuleSet::from_json_file(path)
                .with_context(|| format!("Failed to load rules from {}", path.display()))
        }
        None => {
            debug!("Using built-in maternal health rules");
            Ok(RuleSet::maternal_health().map_err(ValidationError::from)?)
        }
    }
}

fn run(args: &Args) -> Result<ValidationSummary> {
    let rules = load_rules(args.rules.as_ref())?;

    let config = ValidationConfig::builder()
        .raw_data(&args.raw_data)
        .data_to(&args.data_to)
        .log_to(&args.log_to)
        .append_log(args.append_log)
        .build()
        .map_err(ValidationError::from)?;

    let validator = Validator::builder()
        .rules(rules)
        .on_stage(|update| debug!("[{}] {}", update.stage.display_name(), update.message))
        .build()?;

    Ok(run_validation(&config, &validator)?)
}

/// Exit status for a failed run: the library's code when the error came
/// from validation, `1` otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ValidationError>())
        .map_or(1, ValidationError::exit_code)
}

fn print_error(err: &anyhow::Error, json_output: bool) {
    if json_output {
        let payload = match err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ValidationError>())
        {
            Some(validation) => json!({ "error": validation, "detail": format!("{err:#}") }),
            None => json!({ "error": { "code": "ERROR", "message": format!("{err:#}") } }),
        };
        println!("{payload:#}");
    } else {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    match run(&args) {
        Ok(summary) => {
            if args.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(text) => println!("{text}"),
                    Err(err) => {
                        eprintln!("Error: failed to serialize summary: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else if !args.quiet {
                println!("{summary}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err, args.json);
            ExitCode::from(exit_code(&err))
        }
    }
}
