//! # Guidance input/output definitions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The direction of a turn or orbit, as seen from above.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Compass-increasing turn (right hand down).
    Clockwise,

    /// Compass-decreasing turn (left hand down).
    CounterClockwise,
}

/// Status of the guidance output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidanceStatus {
    /// The output was produced from a valid target.
    Nominal,

    /// No active waypoint (or home base) was available, the output carries
    /// the last valid command.
    NoActiveWaypoint,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The vehicle state required by the path manager each control-loop tick.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Current estimated latitude in degrees.
    pub lat_deg: f64,

    /// Current estimated longitude in degrees.
    pub lon_deg: f64,

    /// Current estimated altitude in meters.
    pub alt_m: f64,

    /// Current estimated compass heading in degrees, [0, 360).
    pub heading_deg: f64,
}

/// The guidance command produced each tick, consumed by the lower-level
/// flight controllers.
///
/// The output is a single-slot handoff: `fresh` is set when new data is
/// produced and cleared as the struct is handed out, so a producer that
/// writes twice before the consumer reads once loses the first value.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceOutput {
    /// Desired compass heading in degrees, [0, 360).
    pub desired_heading_deg: f64,

    /// Desired altitude in meters.
    pub desired_alt_m: f64,

    /// Distance to the active target in meters.
    pub distance_to_target_m: f64,

    /// Loiter radius in meters. Only meaningful when orbiting.
    pub loiter_radius_m: f64,

    /// Direction of the loiter turn. Only meaningful when orbiting.
    pub turn_direction: TurnDirection,

    /// Status of this output.
    pub status: GuidanceStatus,

    /// True if this output has not been read since it was produced.
    pub fresh: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for TurnDirection {
    fn default() -> Self {
        TurnDirection::Clockwise
    }
}

impl Default for GuidanceOutput {
    fn default() -> Self {
        Self {
            desired_heading_deg: 0.0,
            desired_alt_m: 0.0,
            distance_to_target_m: 0.0,
            loiter_radius_m: 0.0,
            turn_direction: TurnDirection::Clockwise,
            status: GuidanceStatus::NoActiveWaypoint,
            fresh: false,
        }
    }
}
