//! Session management

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string which diplays a timestamp. See
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html for more
/// information.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (AUTO_DRIVER_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the \
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,

    #[error("Cannot write the session file: {0}")]
    CannotWriteFile(std::io::Error),

    #[error("Cannot serialise the session file: {0}")]
    CannotSerialise(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory.
    ///
    /// The directory is relative to the software root, and the session
    /// directory inside it is named `{exec_name}_{timestamp}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        // Set the session epoch
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        // Format the session epoch as a timestamp
        let timestamp = match SESSION_EPOCH.get() {
            Some(e) => e.format(TIMESTAMP_FORMAT).to_string(),
            None => return Err(SessionError::CannotGetEpoch),
        };

        // Get the root directory
        let mut root = crate::host::get_auto_driver_root()
            .map_err(|_| SessionError::SwRootNotSet)?;
        root.push(sessions_dir);

        Self::create_in(&root, exec_name, &timestamp)
    }

    /// Create the session directory structure under `root`.
    ///
    /// Does not touch the session epoch.
    pub fn create_in(
        root: &Path,
        exec_name: &str,
        timestamp: &str,
    ) -> Result<Self, SessionError> {
        // Create the session path
        let path = root.join(format!("{}_{}", exec_name, timestamp));
        fs::create_dir_all(&path).map_err(SessionError::CannotCreateDir)?;

        // Create the archive dir
        let arch_path = path.join("arch");
        fs::create_dir_all(&arch_path).map_err(SessionError::CannotCreateDir)?;

        // Create the log file path
        let log_file_path = path.join(format!("{}.log", exec_name));

        Ok(Session {
            session_root: path,
            arch_root: arch_path,
            log_file_path,
        })
    }

    /// Save the given data as pretty JSON into the session-relative path.
    ///
    /// Parent directories are created as needed.
    pub fn save<P: AsRef<Path>, T: Serialize>(&self, path: P, data: &T) -> Result<(), SessionError> {
        let full_path = self.session_root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(SessionError::CannotCreateDir)?;
        }

        let json = serde_json::to_string_pretty(data).map_err(SessionError::CannotSerialise)?;
        fs::write(&full_path, json).map_err(SessionError::CannotWriteFile)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns zero if no session has been started yet, so that the logger can
/// be used before (or without) a session.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => {
            let elapsed = Utc::now() - *e;
            match time::duration_to_seconds(elapsed) {
                Some(s) => s,
                None => std::f64::NAN,
            }
        }
        None => 0.0,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_in() {
        let root = std::env::temp_dir().join("auto_driver_session_test");
        let session = Session::create_in(&root, "drive_exec", "20260101_000000").unwrap();

        assert!(session.session_root.ends_with("drive_exec_20260101_000000"));
        assert!(session.arch_root.is_dir());
        assert_eq!(
            session.log_file_path.file_name().unwrap().to_str().unwrap(),
            "drive_exec.log"
        );

        session.save("summary/result.json", &vec![1, 2, 3]).unwrap();
        let saved = fs::read_to_string(session.session_root.join("summary/result.json")).unwrap();
        let parsed: Vec<i32> = serde_json::from_str(&saved).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);

        fs::remove_dir_all(root).unwrap();
    }
}
