//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (AUTO_DRIVER_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$AUTO_DRIVER_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError> 
where
    P: DeserializeOwned
{
    // Get the params dir
    let mut path = crate::host::get_auto_driver_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_file(path)
}

/// Load a parameter file from an explicit path.
pub fn load_file<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>
{
    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e))
    };

    parse(params_str.as_str())
}

/// Parse parameters from a TOML string.
pub fn parse<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Dummy {
        gain: f64,
        name: String
    }

    #[test]
    fn test_parse() {
        let d: Dummy = parse("gain = 0.5\nname = \"rover\"").unwrap();
        assert_eq!(d.gain, 0.5);
        assert_eq!(d.name, "rover");

        let bad: Result<Dummy, _> = parse("gain = \"fast\"");
        assert!(matches!(bad, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join("auto_driver_params_test.toml");
        std::fs::write(&path, "gain = 3.0\nname = \"sim\"").unwrap();

        let d: Dummy = load_file(&path).unwrap();
        assert_eq!(d.gain, 3.0);

        let missing: Result<Dummy, _> = load_file(path.with_extension("missing"));
        assert!(matches!(missing, Err(LoadError::FileLoadError(_))));

        std::fs::remove_file(path).unwrap();
    }
}
