//! # Navigation interface crate.
//!
//! Provides the common boundary types between the autopilot host and the
//! path manager: per-tick vehicle state in, guidance commands out, and the
//! mission-upload telecommands.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Guidance input/output definitions
pub mod guidance;

/// Mission data definitions (waypoint descriptions)
pub mod mission;

/// Telecommand definitions for the mission-upload path
pub mod tc;
