//! # Drive Executable Parameters
//!
//! This module provides parameters for the drive executable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveExecParams {
    /// Simulated duration of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Seed for the random initial pose. The vehicle starts at the origin
    /// if not set.
    pub seed: Option<u64>,

    /// The run is stopped after this many cycles.
    pub max_num_cycles: u64,

    /// Drive script to run, relative to the software root. A path given on
    /// the command line takes precedence.
    pub script_path: String,

    /// If true each cycle is slowed down to take `cycle_period_s` of wall
    /// time.
    pub realtime: bool,
}

impl Default for DriveExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.1,
            seed: None,
            max_num_cycles: 10_000,
            script_path: "scripts/follow_path_then_point.drv".into(),
            realtime: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let p: DriveExecParams =
            util::params::parse("cycle_period_s = 0.05\nseed = 17\n").unwrap();

        assert_eq!(p.cycle_period_s, 0.05);
        assert_eq!(p.seed, Some(17));
        assert_eq!(p.max_num_cycles, 10_000);
        assert!(!p.realtime);
    }

    #[test]
    fn test_shipped_params() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../params/drive_exec.toml");
        let p: DriveExecParams = util::params::load_file(path).unwrap();

        assert_eq!(p.seed, None);
        assert_eq!(p.script_path, DriveExecParams::default().script_path);
    }
}
