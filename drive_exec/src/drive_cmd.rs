//! # Drive commands
//!
//! Commands which can be scripted for the drive executable. In a script each
//! command is written as JSON:
//!
//! ```text
//! 0.0: {"SetCtrlLaw": "FollowPath"};
//! 0.0: {"PushGoal": {"Pose": {"x": 4.0, "y": 0.0, "theta": 0.0}}};
//! 3.0: "ResetPath";
//! 3.0: {"JumpTo": {"x": 0.0, "y": 0.0, "theta": 0.0}};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// Internal
use crate::{kin_state::Goal, vehicle_ctrl::VehicleCtrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Queue of goals waiting to be given to the vehicle, plus the goal it is
/// currently driving to.
#[derive(Debug, Clone, Default)]
pub struct GoalQueue {
    pending: VecDeque<Goal>,
    active: Option<Goal>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A scripted command for the drive executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriveCmd {
    /// Select a control law by name.
    SetCtrlLaw(String),

    /// Append a goal to the end of the goal queue.
    PushGoal(Goal),

    /// Clear the goal queue, including the active goal.
    ResetPath,

    /// Teleport the vehicle.
    JumpTo { x: f64, y: f64, theta: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GoalQueue {
    /// Execute a drive command against the queue and the vehicle.
    pub fn exec(&mut self, cmd: DriveCmd, ctrl: &mut VehicleCtrl) {
        debug!("Executing {:?}", cmd);

        match cmd {
            DriveCmd::SetCtrlLaw(name) => {
                ctrl.set_ctrl_law(&name);
            }
            DriveCmd::PushGoal(goal) => self.pending.push_back(goal),
            DriveCmd::ResetPath => {
                info!("Path reset, dropping {} goals", self.len());
                self.pending.clear();
                self.active = None;
            }
            DriveCmd::JumpTo { x, y, theta } => ctrl.jump_to(x, y, theta),
        }
    }

    /// If there is no active goal, make the next pending goal active and give
    /// it to the vehicle.
    ///
    /// Returns the active goal.
    pub fn activate_next(&mut self, ctrl: &mut VehicleCtrl) -> Option<Goal> {
        if self.active.is_none() {
            if let Some(goal) = self.pending.pop_front() {
                info!("Next goal: {:?}", goal);
                ctrl.set_goal(goal);
                self.active = Some(goal);
            }
        }

        self.active
    }

    /// Drop the active goal once it is achieved.
    pub fn complete_active(&mut self) -> Option<Goal> {
        self.active.take()
    }

    pub fn active(&self) -> Option<Goal> {
        self.active
    }

    /// Number of goals left, including the active one.
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.active.is_some())
    }

    /// True if there is nothing left to drive to.
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }
}
