//! # Navigation manager module
//!
//! The navigation manager is the single entry point into the path manager.
//! It composes the waypoint store, the geodesic engine and the guidance
//! engine behind two surfaces:
//!
//! - the per-tick call [`NavMgr::get_next_directions`], which runs the
//!   mission state machine and the appropriate guidance law, and
//! - the mission-edit surface ([`NavMgr::update_path_nodes`],
//!   [`NavMgr::start_circling`], [`NavMgr::head_home`]), called between
//!   ticks.
//!
//! The mission state machine has three modes:
//!
//! - `Normal` - following the stored waypoint sequence.
//! - `Holding` - circling a fixed centre at the commanded radius and
//!   direction, mission suspended.
//! - `ReturningHome` - navigating back to the home position recorded at
//!   mission initialisation. Entering this mode clears the entire waypoint
//!   store; the mission planner must re-upload the mission to resume.
//!
//! The modes are a single enum, so "holding and returning home at once" is
//! unrepresentable; `head_home` wins from any mode and `start_circling` is
//! rejected while returning home.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
