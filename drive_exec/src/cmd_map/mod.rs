//! # Command mapping module
//!
//! Converts the physical control output of a control law into actuator
//! units:
//!
//! - speed is scaled by `speed_gain` and saturated to the actuator range,
//! - steering is an affine map of the turning demand.
//!
//! The steering angle is limited to `steer_angle_limit_rad` for reporting,
//! but the steering value itself is computed from the unlimited demand and is
//! not saturated. Steering values outside the actuator range are only flagged
//! in the report.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::f64::consts::PI;

// Internal
pub use params::*;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command in actuator units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActuatorCmd {
    /// Drive speed demand, within the configured speed range.
    pub speed: i32,

    /// Steering demand. Not limited to the steering range.
    pub steering: i32,
}

/// Status report of a single mapping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct CmdMapReport {
    /// The turning demand limited to the steering angle limit.
    ///
    /// Units: radians
    pub steer_angle_rad: f64,

    /// True if the speed demand was saturated.
    pub speed_limited: bool,

    /// True if the turning demand exceeded the steering angle limit.
    pub steer_angle_limited: bool,

    /// True if the steering demand is outside the range the actuator accepts.
    pub steering_out_of_range: bool,
}

/// Maps physical controls into actuator commands.
#[derive(Debug, Copy, Clone, Default)]
pub struct CmdMapper {
    params: CmdMapParams,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Interface to the drive actuators.
///
/// Implementations forward the command to the vehicle, the simulator, or
/// anywhere else.
pub trait ActuatorIf {
    fn send(&mut self, cmd: &ActuatorCmd);
}

/// An actuator interface which only logs the commands sent to it.
#[derive(Debug, Default)]
pub struct LogActuator {
    pub num_sent: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CmdMapper {
    pub fn new(params: CmdMapParams) -> Self {
        Self { params }
    }

    /// Map a speed and turning demand into an actuator command.
    ///
    /// Float values are truncated towards zero when converted into actuator
    /// units, saturating at the `i32` limits. NaN demands give zero, so a NaN
    /// `gamma` gives steering 0, which is full lock rather than the centre
    /// value. A non-finite steering demand is always reported as out of range.
    pub fn map(&self, v: f64, gamma: f64) -> (ActuatorCmd, CmdMapReport) {
        let p = &self.params;
        let mut report = CmdMapReport::default();

        // Speed
        let speed_raw = v * p.speed_gain;
        let speed = clamp(&speed_raw, &p.speed_min, &p.speed_max);
        report.speed_limited = speed != speed_raw && !speed_raw.is_nan();

        // Steering angle, reported only
        report.steer_angle_rad = clamp(
            &gamma,
            &-p.steer_angle_limit_rad,
            &p.steer_angle_limit_rad,
        );
        report.steer_angle_limited = report.steer_angle_rad != gamma && !gamma.is_nan();

        let steering = (p.steer_scale * p.steer_gain * gamma) / PI + p.steer_offset;

        let cmd = ActuatorCmd {
            speed: speed as i32,
            steering: steering as i32,
        };

        report.steering_out_of_range = !steering.is_finite()
            || cmd.steering < p.steering_min
            || cmd.steering > p.steering_max;

        trace!(
            "Mapped (v: {:.3}, gamma: {:.3}) to (speed: {}, steering: {})",
            v,
            gamma,
            cmd.speed,
            cmd.steering
        );

        (cmd, report)
    }
}

impl ActuatorIf for LogActuator {
    fn send(&mut self, cmd: &ActuatorCmd) {
        self.num_sent += 1;
        debug!("Actuator command: speed {}, steering {}", cmd.speed, cmd.steering);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_speed_saturation() {
        let mapper = CmdMapper::default();

        let (cmd, report) = mapper.map(1.5, 0.0);
        assert_eq!(cmd.speed, -1000);
        assert!(report.speed_limited);

        let (cmd, report) = mapper.map(-2.0, 0.0);
        assert_eq!(cmd.speed, 1000);
        assert!(report.speed_limited);

        // Forward speed maps to negative units, truncated towards zero
        let (cmd, report) = mapper.map(0.2505, 0.0);
        assert_eq!(cmd.speed, -250);
        assert!(!report.speed_limited);
    }

    #[test]
    fn test_speed_always_in_range() {
        let mapper = CmdMapper::default();

        for i in -200..=200 {
            let v = i as f64 * 0.0173;
            let (cmd, _) = mapper.map(v, 0.0);
            assert!(cmd.speed >= -1000 && cmd.speed <= 1000);
        }

        let (cmd, _) = mapper.map(f64::MAX, 0.0);
        assert_eq!(cmd.speed, -1000);
    }

    #[test]
    fn test_steering_transform() {
        let mapper = CmdMapper::default();

        // Zero demand gives the centre value
        let (cmd, report) = mapper.map(0.0, 0.0);
        assert_eq!(cmd.steering, 90);
        assert!(!report.steering_out_of_range);

        // 90 * 8 * 0.3 / pi + 90 = 158.75
        let (cmd, report) = mapper.map(0.0, 0.3);
        assert_eq!(cmd.steering, 158);
        assert!(!report.steering_out_of_range);

        // 90 - 72 / pi = 67.08
        let (cmd, _) = mapper.map(0.0, -0.1);
        assert_eq!(cmd.steering, 67);

        // 90 + 360 / pi = 204.59, past the actuator range but not saturated
        let (cmd, report) = mapper.map(0.0, 0.5);
        assert_eq!(cmd.steering, 204);
        assert!(report.steering_out_of_range);
        assert!(!report.steer_angle_limited);
    }

    #[test]
    fn test_steering_uses_unlimited_angle() {
        let mapper = CmdMapper::default();

        // 4 rad is beyond the pi limit, the steering value still uses 4 rad
        let (cmd, report) = mapper.map(0.0, 4.0);
        assert_eq!(cmd.steering, ((720.0 * 4.0) / PI + 90.0) as i32);
        assert_eq!(report.steer_angle_rad, PI);
        assert!(report.steer_angle_limited);
        assert!(report.steering_out_of_range);
    }

    #[test]
    fn test_custom_transform() {
        let mapper = CmdMapper::new(CmdMapParams {
            speed_gain: 500.0,
            speed_min: -500.0,
            speed_max: 500.0,
            steer_scale: 180.0,
            steer_gain: 1.0,
            steer_offset: 0.0,
            ..Default::default()
        });

        // 180 * 1 * 1 / pi = 57.3
        let (cmd, _) = mapper.map(0.5, 1.0);
        assert_eq!(cmd, ActuatorCmd { speed: 250, steering: 57 });
    }

    #[test]
    fn test_log_actuator() {
        let mut act = LogActuator::default();
        act.send(&ActuatorCmd::default());
        act.send(&ActuatorCmd { speed: -10, steering: 95 });
        assert_eq!(act.num_sent, 2);
    }

    #[test]
    fn test_non_finite_demands() {
        let mapper = CmdMapper::default();

        // NaN gives zero speed and steering 0, which is full lock
        let (cmd, report) = mapper.map(f64::NAN, f64::NAN);
        assert_eq!(cmd, ActuatorCmd { speed: 0, steering: 0 });
        assert!(!report.speed_limited);
        assert!(!report.steer_angle_limited);
        assert!(report.steering_out_of_range);

        // Infinite turning demand saturates the integer
        let (cmd, report) = mapper.map(10.0, f64::NEG_INFINITY);
        assert_eq!(cmd, ActuatorCmd { speed: -1000, steering: i32::MIN });
        assert!(report.speed_limited);
        assert!(report.steer_angle_limited);
        assert!(report.steering_out_of_range);
    }
}
