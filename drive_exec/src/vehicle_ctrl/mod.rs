//! # Vehicle control module
//!
//! The vehicle controller owns the kinematic state of the vehicle and the
//! selected control law. Every tick it evaluates the law against the current
//! pose and goal, maps the result into actuator units and holds the command
//! until the actuator interface collects it.
//!
//! Between ticks the pose is advanced either from localisation
//! (`update_pose_from_loc`) or by integrating the current velocity
//! (`update_velocity` then `update_pose`).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

use util::{archive::ArchiveError, params::LoadError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name given to the vehicle when none is configured.
pub const DEFAULT_NAME: &str = "AutoNOMOs Simulation";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during VehicleCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum VehicleCtrlError {
    #[error("Cannot load the vehicle control parameters: {0}")]
    ParamLoadError(#[from] LoadError),

    #[error("Invalid vehicle control parameters: {0}")]
    InvalidParams(String),

    #[error("Cannot create the vehicle control archive directory: {0}")]
    CannotCreateArchDir(std::io::Error),

    #[error("Cannot archive vehicle control data: {0}")]
    ArchiveError(#[from] ArchiveError),
}
