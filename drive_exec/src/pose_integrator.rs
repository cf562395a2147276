//! # Pose integrator
//!
//! Advances a pose by a world frame velocity over a time step using a single
//! Euler step. The heading is wrapped back into (-pi, pi] after each step.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::kin_state::{Pose, Velocity};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Integrate `pose` by `velocity` over `dt_s` seconds.
pub fn integrate(pose: &Pose, velocity: &Velocity, dt_s: f64) -> Pose {
    Pose::new(
        pose.x() + velocity.x_dot * dt_s,
        pose.y() + velocity.y_dot * dt_s,
        pose.theta() + velocity.theta_dot * dt_s,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_velocity() {
        let poses = [
            Pose::new(0.0, 0.0, 0.0),
            Pose::new(-3.2, 7.1, PI),
            Pose::new(1e6, -1e-6, -PI + 1e-9),
        ];

        for pose in poses.iter() {
            for dt in [0.0, 0.1, 1.0, 1e6].iter() {
                assert_eq!(integrate(pose, &Velocity::default(), *dt), *pose);
            }
        }
    }

    #[test]
    fn test_euler_step() {
        let pose = Pose::new(1.0, 2.0, 0.5);
        let vel = Velocity {
            x_dot: 0.5,
            y_dot: -1.0,
            theta_dot: 0.2,
        };

        let next = integrate(&pose, &vel, 0.5);
        assert!((next.x() - 1.25).abs() < 1e-12);
        assert!((next.y() - 1.5).abs() < 1e-12);
        assert!((next.theta() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_heading_wraps() {
        let pose = Pose::new(0.0, 0.0, 3.0);
        let vel = Velocity {
            theta_dot: 1.0,
            ..Default::default()
        };

        let next = integrate(&pose, &vel, 0.5);
        assert!((next.theta() - (3.5 - 2.0 * PI)).abs() < 1e-12);

        let vel = Velocity {
            theta_dot: -1.0,
            ..Default::default()
        };
        let next = integrate(&Pose::new(0.0, 0.0, -3.0), &vel, 0.5);
        assert!((next.theta() - (2.0 * PI - 3.5)).abs() < 1e-12);
    }
}
