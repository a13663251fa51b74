//! # Guidance engine module
//!
//! The guidance engine turns the active waypoint, the current position and
//! the current heading into a desired compass heading and altitude. Three
//! lateral laws are provided:
//!
//! - *Straight-segment tracking* - null the cross-track error to the line
//!   joining the previous waypoint to the active one.
//! - *Terminal-segment tracking* - direct pursuit of the final waypoint.
//! - *Orbit tracking* - converge onto a circle of the configured radius
//!   around a centre, flying tangentially once on-radius.
//!
//! Altitude is managed independently of the lateral laws, with a per-tick
//! rate cap so commands never step between waypoint altitudes.
//!
//! All laws work on planar east/north offsets from the reference origin (see
//! [`crate::geodesic`]) and emit headings wrapped to [0, 360).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod laws;
pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use laws::*;
pub use params::Params;
