//! Navigation manager state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use nalgebra::Vector2;

// Internal
use crate::guidance::Guidance;
use crate::wp_store::{Slot, SlotStatus, StoreError, Waypoint, WpStore};
use nav_if::{
    guidance::{GuidanceOutput, GuidanceStatus, TurnDirection, VehicleState},
    mission::{WaypointKind, WaypointSpec},
    tc::PathNodeUpdate,
};
use util::params;

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The navigation manager.
///
/// All entry points take `&mut self`: the guidance tick and the mission-edit
/// calls must be serialised by the host (single control task or an external
/// mutex). No call blocks or performs I/O - parameter file I/O happens only
/// in [`NavMgr::init`].
pub struct NavMgr {
    params: Params,

    /// The mission storage
    store: WpStore,

    /// The guidance engine
    guidance: Guidance,

    /// Current mission mode
    mode: MissionMode,

    /// Id of the active target waypoint. Re-resolved against the store each
    /// tick, falling back to the head if an edit removed it.
    active_id: Option<u32>,

    /// Loiter radius latched by the last `start_circling` call
    loiter_radius_m: f64,

    /// Loiter direction latched by the last `start_circling` call
    loiter_direction: TurnDirection,

    /// Centre of the current hold, latched from the vehicle position on the
    /// first holding tick
    hold_centre_m: Option<Vector2<f64>>,

    /// Single-slot output handoff. `fresh` is set when a tick produces new
    /// data and cleared as the struct is handed out.
    output: GuidanceOutput,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The mission modes. `Holding` and `ReturningHome` are mutually exclusive
/// by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MissionMode {
    /// Following the stored waypoint sequence.
    Normal,

    /// Circling a fixed centre, mission suspended.
    Holding,

    /// Navigating back to the home position, mission discarded.
    ReturningHome,
}

/// Possible errors raised by the navigation manager.
#[derive(Debug, thiserror::Error)]
pub enum NavMgrError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Waypoint store error: {0}")]
    StoreError(#[from] StoreError),

    /// `start_circling` was called while returning home. Returning home
    /// takes priority over holding, the hold request is rejected.
    #[error("Cannot start circling while returning home")]
    HoldWhileReturningHome,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavMgr {
    /// Initialise the navigation manager.
    ///
    /// Expected init data is a path to the parameter file, relative to the
    /// params directory.
    pub fn init(params_path: &str) -> Result<Self, NavMgrError> {
        let params: Params = match params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(NavMgrError::ParamLoadError(e)),
        };

        Ok(Self::from_params(params))
    }

    /// Build the manager directly from a parameter struct.
    pub fn from_params(params: Params) -> Self {
        Self {
            guidance: Guidance::new(&params.guidance),
            store: WpStore::new(),
            mode: MissionMode::Normal,
            active_id: None,
            loiter_radius_m: params.guidance.default_loiter_radius_m,
            loiter_direction: TurnDirection::Clockwise,
            hold_centre_m: None,
            output: GuidanceOutput::default(),
            params,
        }
    }

    /// Seed the store with an initial mission and record the home position.
    ///
    /// The head of the mission becomes the active target and the mode
    /// returns to `Normal`.
    pub fn initialise_mission(
        &mut self,
        initial: &[WaypointSpec],
        home: WaypointSpec,
    ) -> Result<(), NavMgrError> {
        self.store.initialise(initial, home)?;

        self.active_id = self.store.head().map(|wp| wp.id);
        self.guidance.reset_altitude();
        self.mode = MissionMode::Normal;
        self.hold_centre_m = None;

        info!(
            "Mission initialised with {} waypoints",
            self.store.num_waypoints()
        );

        Ok(())
    }

    /// Compute the guidance command for this control-loop tick.
    ///
    /// Mode dispatch checks `ReturningHome` before `Holding`. On success the
    /// returned output is fresh; if no valid target exists the output
    /// carries the last valid command with `fresh == false` and a
    /// `NoActiveWaypoint` status, never garbage.
    pub fn get_next_directions(&mut self, vehicle: &VehicleState) -> GuidanceOutput {
        match self.mode {
            MissionMode::ReturningHome => self.mode_return_home(vehicle),
            MissionMode::Holding => self.mode_hold(vehicle),
            MissionMode::Normal => self.mode_follow_waypoints(vehicle),
        }

        // Single-slot handoff: hand the output out and clear the internal
        // fresh flag
        let out = self.output;
        self.output.fresh = false;
        out
    }

    /// Apply a structural edit to the flight path.
    ///
    /// Rejected edits leave the store untouched; accepted edits may move the
    /// active target back to the head if it was removed or replaced.
    pub fn update_path_nodes(&mut self, update: PathNodeUpdate) -> Result<(), NavMgrError> {
        let result = match update {
            PathNodeUpdate::Append { spec } => {
                let wp = self.store.create(spec);
                self.store.append(wp)
            }
            PathNodeUpdate::Insert {
                spec,
                previous_id,
                next_id,
            } => {
                let wp = self.store.create(spec);
                self.store.insert(wp, previous_id, next_id)
            }
            PathNodeUpdate::Update { spec, id } => {
                let wp = self.store.create(spec);
                self.store.update(wp, id)
            }
            PathNodeUpdate::Delete { id } => self.store.delete(id),
        };

        match result {
            Ok(()) => {
                self.resync_active();
                info!("Path node update applied: {:?}", update);
                Ok(())
            }
            Err(e) => {
                warn!("Path node update rejected: {}", e);
                Err(e.into())
            }
        }
    }

    /// Create a new waypoint record with a fresh id.
    ///
    /// The record is not stored - pass it to the store through
    /// `update_path_nodes`, or use it as a template for one.
    pub fn create_waypoint(&mut self, spec: WaypointSpec) -> Waypoint {
        self.store.create(spec)
    }

    /// Enter or leave the holding pattern.
    ///
    /// The radius and direction are latched on every call, accepted or not.
    /// With `cancel == false` the vehicle enters `Holding`, unless it is
    /// returning home, in which case the request is rejected. With
    /// `cancel == true` an active hold ends; the mode is otherwise left
    /// unchanged, in particular a cancel does not leave `ReturningHome`.
    pub fn start_circling(
        &mut self,
        radius_m: f64,
        direction: TurnDirection,
        cancel: bool,
    ) -> Result<(), NavMgrError> {
        self.loiter_radius_m = radius_m;
        self.loiter_direction = direction;

        if cancel {
            if self.mode == MissionMode::Holding {
                self.mode = MissionMode::Normal;
                self.hold_centre_m = None;
                info!("Hold cancelled");
            }
            return Ok(());
        }

        match self.mode {
            MissionMode::ReturningHome => {
                warn!("Hold requested while returning home, rejected");
                Err(NavMgrError::HoldWhileReturningHome)
            }
            _ => {
                self.mode = MissionMode::Holding;
                info!(
                    "Entering hold, radius {} m, direction {:?}",
                    radius_m, direction
                );
                Ok(())
            }
        }
    }

    /// Toggle the return-to-home mode.
    ///
    /// Entering `ReturningHome` clears the ENTIRE waypoint store - the
    /// mission is discarded, not paused, and the id generator resets.
    /// Toggling back out only restores `Normal`; nothing is re-populated.
    pub fn head_home(&mut self) {
        match self.mode {
            MissionMode::ReturningHome => {
                self.mode = MissionMode::Normal;
                info!("Return to home cancelled");
            }
            _ => {
                self.store.clear();
                self.active_id = None;
                self.hold_centre_m = None;
                self.mode = MissionMode::ReturningHome;
                info!("Returning home, mission cleared");
            }
        }
    }

    // ---- INTROSPECTION ----

    /// Get the current mission mode.
    pub fn mode(&self) -> MissionMode {
        self.mode
    }

    /// Get the id of the active target waypoint, if any.
    pub fn active_waypoint_id(&self) -> Option<u32> {
        self.active_id
    }

    /// Find the slot index of the waypoint with the given id.
    pub fn find_index(&self, id: u32) -> Option<usize> {
        self.store.find_index(id)
    }

    /// Get the occupancy of the slot at the given index.
    pub fn status_of(&self, index: usize) -> SlotStatus {
        self.store.status_of(index)
    }

    /// Get a read-only view of the waypoint buffer.
    pub fn buffer(&self) -> &[Slot] {
        self.store.buffer()
    }

    /// Get the number of stored waypoints.
    pub fn num_waypoints(&self) -> usize {
        self.store.num_waypoints()
    }

    /// Get the home position, if a mission has been initialised.
    pub fn home_base(&self) -> Option<&WaypointSpec> {
        self.store.home_base()
    }
}

impl NavMgr {
    /// Mode returning home.
    ///
    /// Direct pursuit of the home position at the home altitude. The store
    /// is empty in this mode, so the target comes from the recorded home
    /// base.
    fn mode_return_home(&mut self, vehicle: &VehicleState) {
        let home = match self.store.home_base() {
            Some(h) => *h,
            None => return self.mark_stale(),
        };

        let position_m = self.guidance.to_planar(vehicle.lat_deg, vehicle.lon_deg);
        let target_m = self.guidance.to_planar(home.lat_deg, home.lon_deg);

        let heading_deg = self.guidance.follow_last_segment(target_m, position_m);
        let alt_m = self.guidance.maintain_altitude(home.alt_m, vehicle.alt_m);
        let distance_m = (target_m - position_m).norm();

        self.set_output(heading_deg, alt_m, distance_m, self.loiter_radius_m);
    }

    /// Mode holding.
    ///
    /// Orbit a fixed centre at the latched radius and direction. The centre
    /// is latched from the vehicle position on the first holding tick and
    /// forgotten when the hold ends.
    fn mode_hold(&mut self, vehicle: &VehicleState) {
        let position_m = self.guidance.to_planar(vehicle.lat_deg, vehicle.lon_deg);

        let centre_m = match self.hold_centre_m {
            Some(c) => c,
            None => {
                self.hold_centre_m = Some(position_m);
                position_m
            }
        };

        let radius_m = match self.loiter_radius_m > std::f64::EPSILON {
            true => self.loiter_radius_m,
            false => self.params.guidance.default_loiter_radius_m,
        };

        let heading_deg =
            self.guidance
                .follow_orbit(centre_m, radius_m, self.loiter_direction, position_m);
        let alt_m = self.guidance.hold_altitude(vehicle.alt_m);
        let distance_m = (centre_m - position_m).norm();

        self.set_output(heading_deg, alt_m, distance_m, radius_m);
    }

    /// Mode normal waypoint following.
    ///
    /// Resolves the active target (falling back to the head if an edit
    /// removed it), advances it when within the acceptance radius, and runs
    /// the law selected by the waypoint kind.
    fn mode_follow_waypoints(&mut self, vehicle: &VehicleState) {
        // Resolve the active target
        let active_id = self
            .active_id
            .filter(|id| self.store.get(*id).is_some())
            .or_else(|| self.store.head().map(|wp| wp.id));

        let active_id = match active_id {
            Some(id) => id,
            None => return self.mark_stale(),
        };
        self.active_id = Some(active_id);

        let mut wp = match self.store.get(active_id) {
            Some(wp) => wp.clone(),
            None => return self.mark_stale(),
        };

        let position_m = self.guidance.to_planar(vehicle.lat_deg, vehicle.lon_deg);
        let mut target_m = self.guidance.to_planar(wp.lat_deg, wp.lon_deg);
        let mut distance_m = (target_m - position_m).norm();

        // Advance to the next node once inside the acceptance radius. The
        // terminal waypoint stays active.
        if distance_m < self.params.guidance.acceptance_radius_m {
            if let Some(next_id) = wp.next {
                if let Some(next_wp) = self.store.get(next_id) {
                    info!("Waypoint {} reached, advancing to {}", active_id, next_id);

                    wp = next_wp.clone();
                    self.active_id = Some(wp.id);
                    target_m = self.guidance.to_planar(wp.lat_deg, wp.lon_deg);
                    distance_m = (target_m - position_m).norm();
                }
            }
        }

        // Law dispatch by waypoint kind and position in the path
        let (heading_deg, radius_m) = match wp.kind {
            WaypointKind::Orbit => {
                let radius_m = match wp.turn_radius_m > std::f64::EPSILON {
                    true => wp.turn_radius_m,
                    false => self.params.guidance.default_loiter_radius_m,
                };

                let heading_deg = self.guidance.follow_orbit(
                    target_m,
                    radius_m,
                    self.loiter_direction,
                    position_m,
                );

                (heading_deg, radius_m)
            }
            _ => {
                // The final leg, and a head with no previous waypoint, are
                // flown by direct pursuit; interior legs by segment tracking
                let previous_m = match wp.next {
                    None => None,
                    Some(_) => wp
                        .previous
                        .and_then(|id| self.store.get(id))
                        .map(|p| self.guidance.to_planar(p.lat_deg, p.lon_deg)),
                };

                let heading_deg = match previous_m {
                    Some(start_m) => {
                        self.guidance
                            .follow_line_segment(start_m, target_m, position_m)
                    }
                    None => self.guidance.follow_last_segment(target_m, position_m),
                };

                (heading_deg, self.loiter_radius_m)
            }
        };

        let alt_m = self.guidance.maintain_altitude(wp.alt_m, vehicle.alt_m);

        self.set_output(heading_deg, alt_m, distance_m, radius_m);
    }

    /// Write a fresh nominal output.
    fn set_output(
        &mut self,
        desired_heading_deg: f64,
        desired_alt_m: f64,
        distance_to_target_m: f64,
        loiter_radius_m: f64,
    ) {
        self.output = GuidanceOutput {
            desired_heading_deg,
            desired_alt_m,
            distance_to_target_m,
            loiter_radius_m,
            turn_direction: self.loiter_direction,
            status: GuidanceStatus::Nominal,
            fresh: true,
        };
    }

    /// Keep the last valid command but flag the output as stale.
    fn mark_stale(&mut self) {
        self.output.status = GuidanceStatus::NoActiveWaypoint;
        self.output.fresh = false;
    }

    /// Move the active target back to the head if an edit removed or
    /// replaced it.
    fn resync_active(&mut self) {
        let still_stored = self
            .active_id
            .map(|id| self.store.get(id).is_some())
            .unwrap_or(false);

        if !still_stored {
            self.active_id = self.store.head().map(|wp| wp.id);
        }
    }
}
