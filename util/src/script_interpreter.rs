//! # Drive script interpreter module
//!
//! Scripts are text files made of timestamped JSON commands:
//!
//! ```text
//! 0.0: {"SetCtrlLaw": "FollowPath"};
//! 0.5: {"PushGoal": {"Pose": {"x": 2.0, "y": 2.0, "theta": 0.52}}};
//! ```
//!
//! The command type is chosen by the caller, any type implementing
//! `DeserializeOwned` can be scripted.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<C> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    cmd: C
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_cmds` to acquire the commands which need executing.
pub struct ScriptInterpreter<C> {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command<C>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, serde_json::Error),

    #[error("Script command at {0} s is earlier than the one before it")]
    OutOfOrder(f64)
}

pub enum PendingCmds<C> {
    None,
    Some(Vec<C>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> ScriptInterpreter<C> 
where
    C: DeserializeOwned
{

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());
        
        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command<C>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            // Parse the exec time. Both groups always participate in a match.
            let exec_time_s: f64 = cap[1]
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = cmd_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s))
                }
            }

            // Parse the command from the payload. The scripts contain JSON
            // only.
            let cmd = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidCmd(exec_time_s, e))?;

            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            cmds: cmd_queue
        })
    }
}

impl<C> ScriptInterpreter<C> {

    /// Return the commands which are due at `now_s`.
    ///
    /// Commands are due once `now_s` reaches their execution time.
    pub fn get_pending_cmds(&mut self, now_s: f64) -> PendingCmds<C> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingCmds::EndOfScript
        }

        let mut cmd_vec: Vec<C> = vec![];

        while let Some(front) = self.cmds.front() {
            if front.exec_time_s > now_s {
                break;
            }
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        if cmd_vec.is_empty() {
            PendingCmds::None
        }
        else {
            PendingCmds::Some(cmd_vec)
        }
    }

    /// Get the number of commands left in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}
