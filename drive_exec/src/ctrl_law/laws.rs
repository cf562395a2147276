//! # Control law implementations
//!
//! Each law follows the same shape: evaluate the termination test first, and
//! only compute an output when the goal has not been achieved. A law returns
//! `None` when the goal is achieved, in which case no output exists for that
//! cycle.
//!
//! The laws are stateless apart from `error_prev`, the integral accumulator,
//! which is owned by the caller and passed in mutably.
//!
//! None of the laws guard against degenerate geometry. A zero length line
//! normal (`a = b = 0`) or NaN pose produces non-finite output.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::f64::consts::PI;

// Internal
use super::{ControlOutput, CtrlParams};
use crate::kin_state::{Goal, Pose};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Drive towards the goal position, ignoring the goal heading.
///
/// Achieved when the distance to the goal is less than `epsilon`.
pub fn move_to_point(
    pose: &Pose,
    goal: &Goal,
    params: &CtrlParams,
    _error_prev: &mut f64,
) -> Option<ControlOutput> {
    let delta = goal.position2() - pose.position2();
    let distance = delta.norm();

    trace!("MoveToPoint: distance {:.3}", distance);

    if distance < params.epsilon {
        return None;
    }

    let theta_star = delta[1].atan2(delta[0]);
    let gamma = params.k_3 * (theta_star - pose.theta());
    let v = flip_on_overshoot(params.k_1 * distance, gamma, params.k_3);

    Some(ControlOutput { v, gamma })
}

/// Follow the goal position at a standoff distance of `epsilon`, with an
/// integral term on the distance error.
///
/// Achieved when the distance to the goal is less than the standoff distance,
/// which also resets the integral accumulator.
pub fn follow_path(
    pose: &Pose,
    goal: &Goal,
    params: &CtrlParams,
    error_prev: &mut f64,
) -> Option<ControlOutput> {
    let d_goal = params.epsilon;
    let delta = goal.position2() - pose.position2();
    let distance = delta.norm();

    trace!(
        "FollowPath: distance {:.3}, integral {:.3}",
        distance,
        *error_prev
    );

    if distance < d_goal {
        *error_prev = 0.0;
        return None;
    }

    let v = params.k_1 * (distance - d_goal) + params.k_2 * *error_prev;
    let theta_star = delta[1].atan2(delta[0]);
    let gamma = params.k_3 * (theta_star - pose.theta());

    *error_prev += distance - d_goal;

    let v = flip_on_overshoot(v, gamma, params.k_3);

    Some(ControlOutput { v, gamma })
}

/// Regulate to the goal pose using the polar (rho, alpha, beta) form.
///
/// Achieved when `rho <= epsilon`.
pub fn move_to_pose(
    pose: &Pose,
    goal: &Goal,
    params: &CtrlParams,
    _error_prev: &mut f64,
) -> Option<ControlOutput> {
    let delta = goal.position2() - pose.position2();
    let rho = delta.norm();

    trace!("MoveToPose: rho {:.3}", rho);

    if rho <= params.epsilon {
        return None;
    }

    let alpha = delta[1].atan2(delta[0]) - pose.theta();
    let beta = -pose.theta() - alpha;

    Some(ControlOutput {
        v: params.k_1 * rho,
        gamma: params.k_2 * alpha + params.k_3 * beta,
    })
}

/// Follow the line `a*x + b*y + c = 0` at a constant cruise speed.
///
/// Achieved when the signed distance to the line is less than `epsilon`.
/// Being on the negative side of the line therefore always counts as achieved.
pub fn follow_line(
    pose: &Pose,
    goal: &Goal,
    params: &CtrlParams,
    _error_prev: &mut f64,
) -> Option<ControlOutput> {
    let (a, b, c) = goal.line_coeffs();
    let distance = (a * pose.x() + b * pose.y() + c) / (a.powi(2) + b.powi(2)).sqrt();

    trace!("FollowLine: distance {:.3}", distance);

    if distance < params.epsilon {
        return None;
    }

    let heading_to_line = (-a).atan2(b);

    Some(ControlOutput {
        v: params.k_2 * 100.0,
        gamma: -params.k_1 * distance + params.k_3 * (heading_to_line - pose.theta()),
    })
}

/// Negate the speed demand when `tan(gamma / k_heading) > pi`.
///
/// `gamma / k_heading` recovers the raw heading error.
fn flip_on_overshoot(v: f64, gamma: f64, k_heading: f64) -> f64 {
    if (gamma / k_heading).tan() > PI {
        -v
    } else {
        v
    }
}
