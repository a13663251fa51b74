//! Guidance engine parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the guidance engine
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Latitude of the planar reference origin in degrees.
    pub ref_lat_deg: f64,

    /// Longitude of the planar reference origin in degrees.
    pub ref_lon_deg: f64,

    /// Cross-track correction gain, degrees of heading per meter of
    /// cross-track error.
    pub k_xtrack_deg_per_m: f64,

    /// Orbit radial correction gain, degrees of heading per meter of radial
    /// error.
    pub k_orbit_deg_per_m: f64,

    /// Limit on the magnitude of any lateral correction, in degrees. Keeps
    /// the commanded heading within a bounded cone of the nominal course.
    pub max_correction_deg: f64,

    /// Distance to the active waypoint below which it is considered reached
    /// and the next waypoint becomes active, in meters.
    pub acceptance_radius_m: f64,

    /// Maximum change in commanded altitude per tick, in meters.
    pub max_alt_step_m: f64,

    /// Loiter radius used when holding if none has been commanded, in
    /// meters.
    pub default_loiter_radius_m: f64
}
