//! # Simulated plant
//!
//! A kinematic bicycle model standing in for the vehicle when running
//! without hardware. It turns a control output into the world frame velocity
//! which the pose integrator consumes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{
    ctrl_law::ControlOutput,
    kin_state::{Pose, Velocity},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic bicycle model of the vehicle.
#[derive(Debug, Copy, Clone)]
pub struct SimPlant {
    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub body_length_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimPlant {
    pub fn new(body_length_m: f64) -> Self {
        Self { body_length_m }
    }

    /// World frame velocity of the vehicle at `pose` executing `ctrl`.
    ///
    /// `gamma` is treated as the front wheel steering angle.
    pub fn velocity(&self, pose: &Pose, ctrl: &ControlOutput) -> Velocity {
        let theta = pose.theta();

        Velocity {
            x_dot: ctrl.v * theta.cos(),
            y_dot: ctrl.v * theta.sin(),
            theta_dot: ctrl.v * ctrl.gamma.tan() / self.body_length_m,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_straight() {
        let plant = SimPlant::new(0.15);
        let vel = plant.velocity(
            &Pose::new(0.0, 0.0, FRAC_PI_2),
            &ControlOutput { v: 2.0, gamma: 0.0 },
        );

        assert!(vel.x_dot.abs() < 1e-12);
        assert!((vel.y_dot - 2.0).abs() < 1e-12);
        assert_eq!(vel.theta_dot, 0.0);
    }

    #[test]
    fn test_turn_rate() {
        let plant = SimPlant::new(0.5);
        let vel = plant.velocity(
            &Pose::new(0.0, 0.0, 0.0),
            &ControlOutput { v: 1.0, gamma: 0.3 },
        );

        assert!((vel.theta_dot - 0.3f64.tan() / 0.5).abs() < 1e-12);

        // Reversing turns the other way
        let vel_rev = plant.velocity(
            &Pose::new(0.0, 0.0, 0.0),
            &ControlOutput { v: -1.0, gamma: 0.3 },
        );
        assert_eq!(vel_rev.theta_dot, -vel.theta_dot);
    }
}
