//! Utility maths functions
//!
//! Guidance works in compass degrees, so the angle helpers here operate on
//! the [0, 360) range rather than radians.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::Sub + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

/// Wrap an angle in degrees into the compass range [0, 360).
pub fn wrap_360<T>(angle_deg: T) -> T
where
    T: Float
{
    rem_euclid(angle_deg, T::from(360.0).unwrap())
}

/// Get the signed angular delta in degrees needed to move from `from_deg` to
/// `to_deg` by the shortest route, accounting for wrapping at 360.
///
/// The result is in (-180, 180], positive for a clockwise (compass-increasing)
/// turn.
pub fn ang_delta_180<T>(from_deg: T, to_deg: T) -> T
where
    T: Float
{
    let full: T = T::from(360.0).unwrap();
    let half: T = T::from(180.0).unwrap();

    let delta = rem_euclid(to_deg - from_deg, full);

    if delta > half {
        delta - full
    }
    else {
        delta
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(0f64), 0f64);
        assert_eq!(wrap_360(360f64), 0f64);
        assert_eq!(wrap_360(-90f64), 270f64);
        assert_eq!(wrap_360(450f64), 90f64);
        assert_eq!(wrap_360(720f64), 0f64);
    }

    #[test]
    fn test_ang_delta_180() {
        assert_eq!(ang_delta_180(0f64, 90f64), 90f64);
        assert_eq!(ang_delta_180(90f64, 0f64), -90f64);
        assert_eq!(ang_delta_180(350f64, 10f64), 20f64);
        assert_eq!(ang_delta_180(10f64, 350f64), -20f64);
        assert_eq!(ang_delta_180(0f64, 180f64), 180f64);
        assert_eq!(ang_delta_180(45f64, 45f64), 0f64);
    }
}
