//! # Mission-upload telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use crate::mission::WaypointSpec;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A structural edit to the flight path, issued by the mission planner while
/// the vehicle may be flying the path.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathNodeUpdate {
    /// Add a new waypoint at the end of the path.
    Append {
        /// Description of the waypoint to add.
        spec: WaypointSpec,
    },

    /// Insert a new waypoint between two currently adjacent waypoints.
    ///
    /// Rejected if the two ids are not currently adjacent in the path.
    Insert {
        /// Description of the waypoint to insert.
        spec: WaypointSpec,

        /// Id of the waypoint which will precede the new one.
        previous_id: u32,

        /// Id of the waypoint which will follow the new one.
        next_id: u32,
    },

    /// Replace the waypoint with the given id in place.
    ///
    /// The replacement is a new record with its own fresh id.
    Update {
        /// Description of the replacement waypoint.
        spec: WaypointSpec,

        /// Id of the waypoint to replace.
        id: u32,
    },

    /// Remove the waypoint with the given id from the path.
    Delete {
        /// Id of the waypoint to remove.
        id: u32,
    },
}
