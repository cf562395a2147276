//! # Drive library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to
//! access items defined inside the drive crate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Command mapper - converts physical controls into actuator units
pub mod cmd_map;

/// Control laws - turn a pose and a goal into a speed and turning demand
pub mod ctrl_law;

/// Drive commands - scriptable commands and the goal queue they feed
pub mod drive_cmd;

/// Kinematic state - pose, velocity and goal of the vehicle
pub mod kin_state;

/// Drive executable parameters
pub mod params;

/// Pose integrator - advances a pose by a velocity
pub mod pose_integrator;

/// Simulated plant - kinematic bicycle model of the vehicle
pub mod sim_plant;

/// Vehicle control module - ties the kinematic state, control laws and
/// command mapper together
pub mod vehicle_ctrl;
