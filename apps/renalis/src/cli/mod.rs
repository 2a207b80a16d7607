//! # Renalis CLI Module
//!
//! This module implements the CLI interface for Renalis.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `stage` - Stage a single measurement
//! - `stages` - Print the five-stage table
//! - `record` - Stage a measurement and append it to a patient's history
//! - `history` - List a patient's history
//! - `trend` - Show a patient's trend
//! - `status` - Show database status
//! - `export` - Export history to a snapshot file
//! - `import` - Import history from a snapshot file
//! - `init` - Initialize new database

mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use renalis_core::{CkdError, MeasurementInput, Sex};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Renalis - CKD Staging Engine
///
/// Estimates eGFR, assigns a CKD stage and returns stage guidance.
#[derive(Parser, Debug)]
#[command(name = "renalis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the history database
    #[arg(short = 'D', long, global = true, default_value = "renalis.db")]
    pub database: PathBuf,

    /// Storage backend: "file" (snapshot file) or "redb" (ACID database)
    #[arg(short = 'B', long, global = true, value_enum, default_value_t = Backend::Redb)]
    pub backend: Backend,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// History storage backend selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Whole history kept in a snapshot file, rewritten on change
    File,
    /// redb database, one transaction per append
    Redb,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Redb => "redb",
        }
    }
}

/// Measurement arguments shared by `stage` and `record`.
///
/// Either `--egfr`, or all of `--creatinine`, `--age` and `--sex`.
#[derive(Args, Debug, Clone, Default)]
pub struct MeasurementArgs {
    /// Directly measured eGFR (mL/min/1.73m2)
    #[arg(long, allow_negative_numbers = true)]
    pub egfr: Option<f64>,

    /// Serum creatinine (mg/dL)
    #[arg(long, allow_negative_numbers = true)]
    pub creatinine: Option<f64>,

    /// Age in whole years
    #[arg(long)]
    pub age: Option<u32>,

    /// Biological sex (male, female)
    #[arg(long)]
    pub sex: Option<String>,
}

impl MeasurementArgs {
    /// Build the measurement these arguments describe.
    pub fn to_input(&self) -> Result<MeasurementInput, CkdError> {
        let creatinine_given =
            self.creatinine.is_some() || self.age.is_some() || self.sex.is_some();

        match (self.egfr, creatinine_given) {
            (Some(_), true) => Err(CkdError::IncompleteMeasurement(
                "give either --egfr or --creatinine/--age/--sex, not both".to_string(),
            )),
            (Some(egfr), false) => Ok(MeasurementInput::egfr(egfr)),
            (None, false) => Err(CkdError::IncompleteMeasurement(
                "a measurement needs --egfr or --creatinine/--age/--sex".to_string(),
            )),
            (None, true) => match (self.creatinine, self.age, self.sex.as_deref()) {
                (Some(creatinine), Some(age), Some(sex)) => Ok(MeasurementInput::creatinine(
                    creatinine,
                    age,
                    sex.parse::<Sex>()?,
                )),
                _ => Err(CkdError::IncompleteMeasurement(
                    "--creatinine, --age and --sex must be given together".to_string(),
                )),
            },
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Stage a single measurement
    Stage {
        #[command(flatten)]
        measurement: MeasurementArgs,
    },

    /// Print the five-stage table
    Stages,

    /// Stage a measurement and append it to a patient's history
    Record {
        /// Patient identifier
        #[arg(short = 'P', long)]
        patient: u64,

        /// Unix timestamp of the measurement (defaults to now)
        #[arg(long)]
        at: Option<u64>,

        #[command(flatten)]
        measurement: MeasurementArgs,
    },

    /// List a patient's staging history
    History {
        /// Patient identifier
        #[arg(short = 'P', long)]
        patient: u64,
    },

    /// Show a patient's trend between the two latest stagings
    Trend {
        /// Patient identifier
        #[arg(short = 'P', long)]
        patient: u64,
    },

    /// Show database status
    Status,

    /// Export history to a snapshot file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace history from a snapshot file (file backend only)
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CkdError> {
    let backend = cli.backend;
    let json_mode = cli.json_mode;
    let db = cli.database.as_path();

    if cli.verbose {
        tracing::info!("Database: {} ({})", db.display(), backend.as_str());
    }

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(db, backend, cli.config.as_deref(), host, port).await
        }
        Some(Commands::Stage { measurement }) => cmd_stage(json_mode, &measurement),
        Some(Commands::Stages) => cmd_stages(json_mode),
        Some(Commands::Record {
            patient,
            at,
            measurement,
        }) => cmd_record(db, backend, json_mode, patient, at, &measurement),
        Some(Commands::History { patient }) => cmd_history(db, backend, json_mode, patient),
        Some(Commands::Trend { patient }) => cmd_trend(db, backend, json_mode, patient),
        Some(Commands::Status) => cmd_status(db, backend, json_mode),
        Some(Commands::Export { output }) => cmd_export(db, backend, &output),
        Some(Commands::Import { input }) => cmd_import(db, backend, &input),
        Some(Commands::Init { force }) => cmd_init(db, backend, force),
        None => {
            // No subcommand - show status by default
            cmd_status(db, backend, json_mode)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
