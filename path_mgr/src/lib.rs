//! # Path manager library.
//!
//! The flight-path component of the Stratus autopilot. It stores the active
//! mission as an ordered sequence of waypoints, keeps that sequence
//! consistent under edits issued while the vehicle is flying it, and on every
//! control-loop tick produces a guidance command (desired heading, altitude,
//! loiter radius/direction) steering toward the current target.
//!
//! The host control loop calls [`nav_mgr::NavMgr::get_next_directions`] once
//! per tick, and routes mission-upload telecommands through
//! [`nav_mgr::NavMgr::update_path_nodes`]. Both entry points take `&mut self`
//! so cross-context access must be serialised by the host.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geodesic engine - converts geographic coordinates into planar distances
/// relative to a fixed reference origin
pub mod geodesic;

/// Guidance engine - computes desired heading and altitude toward the active
/// target using segment, pursuit and orbit tracking laws
pub mod guidance;

/// Navigation manager - composes the waypoint store, the guidance engine and
/// the mission state machine behind the per-tick facade
pub mod nav_mgr;

/// Waypoint store - fixed-capacity ordered mission storage with doubly-linked
/// adjacency
pub mod wp_store;
