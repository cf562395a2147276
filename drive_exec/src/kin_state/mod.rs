//! # Kinematic state module
//!
//! Holds the pose, velocity and goal of the vehicle. These are plain data
//! types, the only rule enforced here is that the heading of a [`Pose`] is
//! always kept in the range (-pi, pi].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{lin_map, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position and heading of the vehicle in the world frame.
///
/// The heading is normalised into (-pi, pi] every time it is set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct Pose {
    x: f64,
    y: f64,
    theta: f64,
}

/// Velocity of the vehicle in the world frame.
///
/// Units: meters/second for `x_dot` and `y_dot`, radians/second for
/// `theta_dot`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x_dot: f64,
    pub y_dot: f64,
    pub theta_dot: f64,
}

/// Rectangular region of the world used to draw random initial poses.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// The full kinematic state of the vehicle.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct KinState {
    pub pose: Pose,
    pub velocity: Velocity,
    pub goal: Goal,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A goal for a control law.
///
/// Both variants carry three numbers. A law which expects the other variant
/// reads the same three numbers in order, so a `Pose { x, y, theta }` given to
/// FollowLine is the line `x*X + y*Y + theta = 0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Goal {
    /// Target pose, `theta` in radians.
    Pose { x: f64, y: f64, theta: f64 },

    /// Target line in implicit form `a*x + b*y + c = 0`.
    Line { a: f64, b: f64, c: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose, normalising the heading.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: wrap_pi(theta),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Heading in radians, in (-pi, pi].
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Return the 2D position vector.
    pub fn position2(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Overwrite the pose.
    pub fn set(&mut self, x: f64, y: f64, theta: f64) {
        *self = Self::new(x, y, theta);
    }
}

impl Goal {
    /// A pose goal.
    pub fn pose(x: f64, y: f64, theta: f64) -> Self {
        Goal::Pose { x, y, theta }
    }

    /// A line goal.
    pub fn line(a: f64, b: f64, c: f64) -> Self {
        Goal::Line { a, b, c }
    }

    /// The raw three numbers of the goal.
    pub fn triple(&self) -> (f64, f64, f64) {
        match *self {
            Goal::Pose { x, y, theta } => (x, y, theta),
            Goal::Line { a, b, c } => (a, b, c),
        }
    }

    /// The goal position when read as a pose.
    pub fn position2(&self) -> Vector2<f64> {
        let (x, y, _) = self.triple();
        Vector2::new(x, y)
    }

    /// The goal coefficients when read as a line.
    pub fn line_coeffs(&self) -> (f64, f64, f64) {
        self.triple()
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal::pose(0.0, 0.0, 0.0)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl KinState {
    /// A state at the given pose with zero velocity.
    pub fn at(x: f64, y: f64, theta: f64) -> Self {
        Self {
            pose: Pose::new(x, y, theta),
            ..Default::default()
        }
    }

    /// A state with a uniformly random pose inside `bbox` and a heading in
    /// [0, pi), with zero velocity.
    pub fn random<R: Rng + ?Sized>(bbox: &BoundingBox, rng: &mut R) -> Self {
        let x = lin_map((0.0, 1.0), (bbox.x_min, bbox.x_max), rng.gen::<f64>());
        let y = lin_map((0.0, 1.0), (bbox.y_min, bbox.y_max), rng.gen::<f64>());
        let theta = rng.gen::<f64>() * std::f64::consts::PI;

        Self::at(x, y, theta)
    }

    /// Teleport to a new pose, clearing the velocity.
    pub fn set_pose(&mut self, x: f64, y: f64, theta: f64) {
        self.pose.set(x, y, theta);
        self.velocity = Velocity::default();
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = goal;
    }

    pub fn set_velocity(&mut self, x_dot: f64, y_dot: f64, theta_dot: f64) {
        self.velocity = Velocity {
            x_dot,
            y_dot,
            theta_dot,
        };
    }
}
