//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.
//! Records must be flat structs (no nested structs or sequences) so that csv
//! can derive a header line from them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::File;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CannotCreateFile(std::io::Error),

    #[error("The archiver has not been initialised")]
    NotInitialised,

    #[error("Cannot write the record: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a timestamped csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// shall be ignored by Serde using `#[serde(skip_serializing)]. The archiver
/// member shall be setup in the struct's `init` or `new` functions. 
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        Self::from_file_path(session.arch_root.join(path))
    }

    /// Create a new archiver writing to an explicit file path.
    ///
    /// Any existing file at the path is truncated.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(ArchiveError::CannotCreateFile)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::WriteError)?;
                w.flush().map_err(ArchiveError::FlushError)
            },
            None => Err(ArchiveError::NotInitialised)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        time_s: f64,
        speed: i32,
        achieved: bool
    }

    #[test]
    fn test_archiver() {
        let path = std::env::temp_dir().join("auto_driver_archive_test.csv");

        let mut arch = Archiver::from_file_path(&path).unwrap();
        arch.serialise(Sample { time_s: 0.0, speed: -1000, achieved: false }).unwrap();
        arch.serialise(Sample { time_s: 0.1, speed: 0, achieved: true }).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time_s,speed,achieved");
        assert_eq!(lines[1], "0.0,-1000,false");
        assert_eq!(lines[2], "0.1,0,true");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_uninitialised() {
        let mut arch = Archiver::default();
        assert!(matches!(
            arch.serialise(Sample { time_s: 0.0, speed: 0, achieved: false }),
            Err(ArchiveError::NotInitialised)
        ));
    }
}
