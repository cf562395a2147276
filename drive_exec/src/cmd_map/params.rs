//! Parameters structure for the command mapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for mapping physical controls into actuator units.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CmdMapParams {

    // ---- SPEED ----

    /// Gain from linear speed to actuator speed units. Negative since the
    /// drive motor counts forwards as negative.
    ///
    /// Units: actuator units/(meters/second)
    pub speed_gain: f64,

    /// Lowest actuator speed demand.
    pub speed_min: f64,

    /// Highest actuator speed demand.
    pub speed_max: f64,

    // ---- STEERING ----

    /// Symmetric limit on the steering angle.
    ///
    /// Units: radians
    pub steer_angle_limit_rad: f64,

    /// Scale of the steering transform, the actuator units covered by one
    /// pi radians of demand before `steer_gain` is applied.
    pub steer_scale: f64,

    /// Gain of the steering transform.
    pub steer_gain: f64,

    /// Actuator steering value for a zero demand.
    pub steer_offset: f64,

    /// Lowest steering value the actuator accepts.
    pub steering_min: i32,

    /// Highest steering value the actuator accepts.
    pub steering_max: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CmdMapParams {
    fn default() -> Self {
        Self {
            speed_gain: -1000.0,
            speed_min: -1000.0,
            speed_max: 1000.0,
            steer_angle_limit_rad: std::f64::consts::PI,
            steer_scale: 90.0,
            steer_gain: 8.0,
            steer_offset: 90.0,
            steering_min: 0,
            steering_max: 180,
        }
    }
}
