//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{Backend, MeasurementArgs};
use crate::api;
use crate::config::ServerConfig;
use renalis_core::{
    CkdError, CkdStage, HistoryEntry, MemoryHistory, PatientId, Session, StagingResult, Trend,
    history_from_bytes, history_to_bytes, stage_records,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for snapshot import (64 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), CkdError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CkdError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(CkdError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
///
/// Canonicalizing resolves ".." and symlinks before the file is read.
fn validate_file_path(path: &Path) -> Result<PathBuf, CkdError> {
    let canonical = path.canonicalize().map_err(|e| {
        CkdError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CkdError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, CkdError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        CkdError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(CkdError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| CkdError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &Path,
    backend: Backend,
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CkdError> {
    let config = ServerConfig::load(config_path)?.with_overrides(host, port);
    let session = load_or_create_session(db_path, backend)?;

    if backend == Backend::File {
        tracing::warn!("File backend: history recorded over HTTP is not written back to disk");
    }

    println!("Renalis CKD Staging Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.host);
    println!("  Port:     {}", config.port);
    println!("  Backend:  {}", backend.as_str());
    println!("  Database: {}", db_path.display());
    println!();
    println!("Endpoints:");
    println!("  GET  /health                - Health check");
    println!("  GET  /stages                - Stage table");
    println!("  GET  /stages/{{stage}}        - One stage record");
    println!("  POST /assess                - Stage a measurement");
    println!("  POST /patients/{{id}}/history - Record a measurement");
    println!("  GET  /patients/{{id}}/history - Patient history");
    println!("  GET  /patients/{{id}}/trend   - Patient trend");
    println!("  GET  /status                - History status");
    println!("  POST /export                - Export snapshot");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(session, &config).await
}

// =============================================================================
// STAGE COMMANDS
// =============================================================================

/// Extra line shown for kidney failure.
fn terminal_note(stage: CkdStage) -> Option<&'static str> {
    stage
        .is_terminal()
        .then_some("Kidney failure: contact your nephrology team about dialysis or transplant.")
}

fn print_staging(result: &StagingResult) {
    let record = result.record;
    println!("eGFR:  {}{}", result.egfr, if result.estimated { " (estimated)" } else { "" });
    println!("Stage: {} ({})", result.stage, record.egfr_range_label);
    if let Some(note) = terminal_note(result.stage) {
        println!("{}", note);
    }
    println!();
    println!("{}", record.description);
    for (title, items) in [
        ("Diet", record.recommendations.diet),
        ("Lifestyle", record.recommendations.lifestyle),
        ("Monitoring", record.recommendations.monitoring),
    ] {
        println!();
        println!("{}:", title);
        for item in items {
            println!("  - {}", item);
        }
    }
}

/// Stage a single measurement.
pub fn cmd_stage(json_mode: bool, measurement: &MeasurementArgs) -> Result<(), CkdError> {
    let input = measurement.to_input()?;
    let result = renalis_core::assess(&input)?;

    if json_mode {
        print_json(&serde_json::json!(result));
        return Ok(());
    }

    print_staging(&result);
    Ok(())
}

/// Print the five-stage table.
pub fn cmd_stages(json_mode: bool) -> Result<(), CkdError> {
    let records = stage_records();

    if json_mode {
        print_json(&serde_json::json!(records));
        return Ok(());
    }

    println!("CKD Stages");
    println!("==========");
    for record in records {
        println!(
            "  {}  {:<7} {}",
            record.stage, record.egfr_range_label, record.name
        );
    }
    Ok(())
}

// =============================================================================
// HISTORY COMMANDS
// =============================================================================

/// Stage a measurement and append it to a patient's history.
pub fn cmd_record(
    db_path: &Path,
    backend: Backend,
    json_mode: bool,
    patient: u64,
    at: Option<u64>,
    measurement: &MeasurementArgs,
) -> Result<(), CkdError> {
    let input = measurement.to_input()?;
    let mut session = load_or_create_session(db_path, backend)?;

    let recorded_at = at.unwrap_or_else(crate::unix_now);
    let (result, entry) = session.record(PatientId(patient), &input, recorded_at)?;
    save_session(&session, db_path)?;

    tracing::info!(
        "Recorded {} for {}: eGFR {} (stage {})",
        input,
        entry.patient,
        entry.egfr,
        entry.stage.number()
    );

    if json_mode {
        print_json(&serde_json::json!({
            "entry": entry,
            "result": result,
        }));
        return Ok(());
    }

    println!("Recorded for {} at {}", entry.patient, entry.recorded_at);
    println!();
    print_staging(&result);
    Ok(())
}

fn print_entry(entry: &HistoryEntry) {
    println!(
        "  {:>12}  eGFR {:>6}  stage {}  ({})",
        entry.recorded_at,
        entry.egfr,
        entry.stage.number(),
        entry.measurement
    );
}

/// List a patient's staging history.
pub fn cmd_history(
    db_path: &Path,
    backend: Backend,
    json_mode: bool,
    patient: u64,
) -> Result<(), CkdError> {
    let session = load_or_create_session(db_path, backend)?;
    let patient = PatientId(patient);
    let entries = session.history(patient)?;

    if json_mode {
        print_json(&serde_json::json!({
            "patient": patient.0,
            "entries": entries,
        }));
        return Ok(());
    }

    if entries.is_empty() {
        println!("No history for {}", patient);
        return Ok(());
    }

    println!("History for {} ({} entries)", patient, entries.len());
    for entry in &entries {
        print_entry(entry);
    }
    if let Some(latest) = session.latest(patient)? {
        println!();
        println!("Current: {}", latest.stage);
        if let Some(note) = terminal_note(latest.stage) {
            println!("{}", note);
        }
    }
    Ok(())
}

/// Show a patient's trend.
pub fn cmd_trend(
    db_path: &Path,
    backend: Backend,
    json_mode: bool,
    patient: u64,
) -> Result<(), CkdError> {
    let session = load_or_create_session(db_path, backend)?;
    let patient = PatientId(patient);
    let trend: Trend = session.trend(patient)?;

    if json_mode {
        print_json(&serde_json::json!({
            "patient": patient.0,
            "trend": trend,
        }));
        return Ok(());
    }

    println!("Trend for {}: {}", patient, trend.direction);
    if let Some(previous) = &trend.previous {
        print_entry(previous);
    }
    if let Some(latest) = &trend.latest {
        print_entry(latest);
    }
    if let Some(change) = trend.egfr_change {
        println!("eGFR change:  {:+}", change);
        println!("Stage change: {:+}", trend.stage_change);
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show database status.
pub fn cmd_status(db_path: &Path, backend: Backend, json_mode: bool) -> Result<(), CkdError> {
    let session = load_or_create_session(db_path, backend)?;
    let patient_count = session.patient_count()?;
    let entry_count = session.entry_count()?;

    if json_mode {
        print_json(&serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": session.backend_name(),
            "patient_count": patient_count,
            "entry_count": entry_count,
        }));
        return Ok(());
    }

    println!("Renalis Status");
    println!("==============");
    println!("Database: {}", db_path.display());
    println!("Backend:  {}", session.backend_name());
    println!();
    println!("Patients: {}", patient_count);
    println!("Entries:  {}", entry_count);
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export the whole history as a snapshot file. Works with both backends.
pub fn cmd_export(db_path: &Path, backend: Backend, output: &Path) -> Result<(), CkdError> {
    let validated_output = validate_output_path(output)?;

    let session = load_or_create_session(db_path, backend)?;
    let history = session.snapshot()?;
    let data = history_to_bytes(&history)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| CkdError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} entries ({} bytes) to {}",
        history.iter().count(),
        data.len(),
        validated_output.display()
    );
    Ok(())
}

/// Replace the history from a snapshot file (file backend only).
pub fn cmd_import(db_path: &Path, backend: Backend, input: &Path) -> Result<(), CkdError> {
    if backend == Backend::Redb {
        return Err(CkdError::IoError(
            "Import to redb not supported. Use the file backend.".to_string(),
        ));
    }

    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| CkdError::IoError(format!("Read file: {}", e)))?;

    let history = history_from_bytes(&data)?;
    let session = Session::with_history(history);
    save_session(&session, db_path)?;

    println!(
        "Imported history: {} patients, {} entries",
        session.patient_count()?,
        session.entry_count()?
    );
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(db_path: &Path, backend: Backend, force: bool) -> Result<(), CkdError> {
    if db_path.exists() {
        if !force {
            return Err(CkdError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| CkdError::IoError(format!("Remove existing database: {}", e)))?;
    }

    match backend {
        Backend::Redb => {
            let _session = Session::with_redb(db_path)?;
            println!("Initialized new redb database at {}", db_path.display());
        }
        Backend::File => {
            save_session(&Session::new(), db_path)?;
            println!("Initialized new file database at {}", db_path.display());
        }
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Load or create a session from a database path with specified backend.
pub fn load_or_create_session(db_path: &Path, backend: Backend) -> Result<Session, CkdError> {
    match backend {
        Backend::Redb => Session::with_redb(db_path),
        Backend::File => {
            if !db_path.exists() {
                return Ok(Session::new());
            }
            validate_file_size(db_path, MAX_IMPORT_FILE_SIZE)?;
            let data = std::fs::read(db_path)
                .map_err(|e| CkdError::IoError(format!("Read db: {}", e)))?;
            let history = if data.is_empty() {
                MemoryHistory::new()
            } else {
                history_from_bytes(&data)?
            };
            Ok(Session::with_history(history))
        }
    }
}

/// Save a session to a database path.
pub fn save_session(session: &Session, db_path: &Path) -> Result<(), CkdError> {
    if session.is_persistent() {
        // redb commits on every append
        return Ok(());
    }
    let data = history_to_bytes(&session.snapshot()?)?;
    std::fs::write(db_path, &data).map_err(|e| CkdError::IoError(format!("Write db: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
