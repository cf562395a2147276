//! # Control law module
//!
//! Control laws turn the current pose and a goal into a physical control
//! output: a linear speed `v` and a turning rate `gamma`. Four laws are
//! provided:
//!
//! - `MoveToPoint` drives to a position.
//! - `FollowPath` follows a moving target position at a standoff distance,
//!   with an integral term so that the vehicle catches up.
//! - `MoveToPose` regulates to a position and heading.
//! - `FollowLine` drives along a line given in implicit form.
//!
//! Laws are selected through [`CtrlLawId`], either directly or by name with
//! [`CtrlLawId::from_name`]. Unknown names fall back on `MoveToPoint`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod laws;
pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

// Internal
use crate::kin_state::{Goal, Pose};
pub use params::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Output of a control law, in physical units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutput {
    /// Linear speed demand, positive forwards.
    ///
    /// Units: meters/second
    pub v: f64,

    /// Turning/heading correction demand.
    ///
    /// Units: radians
    pub gamma: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identifies one of the available control laws.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtrlLawId {
    MoveToPoint,
    FollowPath,
    MoveToPose,
    FollowLine,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CtrlLawId {
    /// Every available law.
    pub const ALL: [CtrlLawId; 4] = [
        CtrlLawId::MoveToPoint,
        CtrlLawId::FollowPath,
        CtrlLawId::MoveToPose,
        CtrlLawId::FollowLine,
    ];

    /// The law used when no law, or an unknown law, is requested.
    pub const FALLBACK: CtrlLawId = CtrlLawId::MoveToPoint;

    /// Select a law by name.
    ///
    /// Names are matched exactly (`"MoveToPoint"`, `"FollowPath"`,
    /// `"MoveToPose"`, `"FollowLine"`). Any other name selects `MoveToPoint`,
    /// this is not an error.
    pub fn from_name(name: &str) -> Self {
        match Self::ALL.iter().find(|l| l.name() == name) {
            Some(l) => *l,
            None => {
                warn!(
                    "Unknown control law \"{}\", falling back on {}",
                    name,
                    Self::FALLBACK
                );
                Self::FALLBACK
            }
        }
    }

    /// The canonical name of the law.
    pub fn name(&self) -> &'static str {
        match self {
            CtrlLawId::MoveToPoint => "MoveToPoint",
            CtrlLawId::FollowPath => "FollowPath",
            CtrlLawId::MoveToPose => "MoveToPose",
            CtrlLawId::FollowLine => "FollowLine",
        }
    }

    /// Evaluate the law.
    ///
    /// Returns `None` if the goal has been achieved, otherwise the control
    /// output for this cycle. `error_prev` is the integral accumulator, only
    /// `FollowPath` uses it.
    pub fn evaluate(
        &self,
        pose: &Pose,
        goal: &Goal,
        params: &CtrlParams,
        error_prev: &mut f64,
    ) -> Option<ControlOutput> {
        match self {
            CtrlLawId::MoveToPoint => laws::move_to_point(pose, goal, params, error_prev),
            CtrlLawId::FollowPath => laws::follow_path(pose, goal, params, error_prev),
            CtrlLawId::MoveToPose => laws::move_to_pose(pose, goal, params, error_prev),
            CtrlLawId::FollowLine => laws::follow_line(pose, goal, params, error_prev),
        }
    }
}

impl Default for CtrlLawId {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for CtrlLawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
