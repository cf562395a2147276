//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle into the range (-pi, pi].
///
/// Takes the floating point remainder by 2pi (which keeps the sign of the
/// angle) and then applies a single 2pi correction. An exact -pi becomes pi.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    let pi = T::PI();
    let tau = pi + pi;

    let mut wrapped = angle % tau;

    if wrapped <= -pi {
        wrapped = wrapped + tau;
    }
    if wrapped > pi {
        wrapped = wrapped - tau;
    }

    wrapped
}
