//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
/// 
/// Records go to stdout and to the session's log file.
///
/// # Notes
/// 
/// - `min_level` must be `Info` or more verbose.
/// 
/// # Safety
/// 
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter, 
    session: &session::Session
) -> Result<(), LoggerInitError> {

    check_min_level(min_level)?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_line(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    message
                )
            ))
        })
        .level(min_level)
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;
    
    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Reject minimum levels which would hide `INFO` records.
fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }
    else {
        Ok(())
    }
}

/// Format a single log line.
///
/// Debug and trace lines include the record target, other levels don't.
fn format_line(
    elapsed_s: f64,
    level: log::Level,
    target: &str,
    message: &std::fmt::Arguments
) -> String {
    if level > log::Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            level_to_str(level),
            target,
            message
        )
    }
    else {
        format!(
            "[{:10.6} {}] {}",
            elapsed_s,
            level_to_str(level),
            message
        )
    }
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}
