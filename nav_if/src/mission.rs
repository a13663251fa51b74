//! # Mission data definitions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The kind of a waypoint, which selects the guidance law applied while the
/// waypoint is the active target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointKind {
    /// An ordinary waypoint which is flown through on the way to the next one.
    FlyThrough,

    /// A waypoint which is orbited at the waypoint's turn radius.
    Orbit,

    /// The final waypoint of a mission, approached by direct pursuit.
    Terminal,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The uploadable description of a waypoint.
///
/// A spec carries no identifier - ids are assigned by the waypoint store when
/// the spec is turned into a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSpec {
    /// Latitude of the waypoint in degrees.
    pub lat_deg: f64,

    /// Longitude of the waypoint in degrees.
    pub lon_deg: f64,

    /// Target altitude for the leg ending at this waypoint in meters.
    pub alt_m: f64,

    /// The kind of the waypoint.
    pub kind: WaypointKind,

    /// Turn radius in meters. Only meaningful for `Orbit` waypoints.
    pub turn_radius_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for WaypointSpec {
    fn default() -> Self {
        Self {
            lat_deg: 0.0,
            lon_deg: 0.0,
            alt_m: 0.0,
            kind: WaypointKind::FlyThrough,
            turn_radius_m: 0.0,
        }
    }
}

impl WaypointSpec {
    /// Create a fly-through spec at the given position.
    pub fn fly_through(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
            kind: WaypointKind::FlyThrough,
            turn_radius_m: 0.0,
        }
    }

    /// Create an orbit spec at the given position and radius.
    pub fn orbit(lat_deg: f64, lon_deg: f64, alt_m: f64, turn_radius_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
            kind: WaypointKind::Orbit,
            turn_radius_m,
        }
    }

    /// Create a terminal spec at the given position.
    pub fn terminal(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
            kind: WaypointKind::Terminal,
            turn_radius_m: 0.0,
        }
    }
}
