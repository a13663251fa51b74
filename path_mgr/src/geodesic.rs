//! # Geodesic engine
//!
//! Pure functions converting geographic coordinates into planar distances
//! relative to a fixed reference origin. The planar frame is x-east, y-north,
//! in meters.
//!
//! Both functions are degenerate at the poles and across the antimeridian -
//! callers must not rely on their output there.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the great-circle distance in meters between two points, via the
/// haversine formula.
///
/// The magnitude is always the haversine distance, but the result is negated
/// when the latitude delta and the longitude delta have opposite signs. This
/// lets [`planar_offset`] recover a signed planar coordinate from an
/// inherently unsigned distance by holding one axis fixed. The sign is NOT a
/// general bearing indicator and must not be interpreted as one.
pub fn signed_distance_m(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64
) -> f64 {
    let delta_lat_rad = (lat2_deg - lat1_deg).to_radians();
    let delta_lon_rad = (lon2_deg - lon1_deg).to_radians();

    let a = (delta_lat_rad / 2.0).sin().powi(2)
        + lat1_deg.to_radians().cos()
        * lat2_deg.to_radians().cos()
        * (delta_lon_rad / 2.0).sin().powi(2);

    let dist_m = EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    // Negate when the deltas have opposite signs
    if (delta_lat_rad >= 0.0 && delta_lon_rad >= 0.0)
        || (delta_lat_rad < 0.0 && delta_lon_rad < 0.0)
    {
        dist_m
    }
    else {
        -dist_m
    }
}

/// Get the east/north offset in meters of a point from the reference origin.
///
/// The offset is computed as two independent fixed-axis distances: x from the
/// longitude delta at the reference latitude, y from the latitude delta at
/// the reference longitude.
pub fn planar_offset(
    ref_lat_deg: f64,
    ref_lon_deg: f64,
    lat_deg: f64,
    lon_deg: f64
) -> Vector2<f64> {
    Vector2::new(
        signed_distance_m(ref_lat_deg, ref_lon_deg, ref_lat_deg, lon_deg),
        signed_distance_m(ref_lat_deg, ref_lon_deg, lat_deg, ref_lon_deg)
    )
}
