//! # Guidance laws
//!
//! This module provides the lateral tracking laws and the altitude manager.
//! The lateral laws are proportional with clamped authority: the commanded
//! heading is the nominal course (segment course, pursuit bearing or orbit
//! tangent) plus a correction proportional to the tracking error, limited to
//! `max_correction_deg`. The correction shrinks with the error, so the
//! command converges onto the nominal course as the error is nulled.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::geodesic;
use nav_if::guidance::TurnDirection;
use util::maths::wrap_360;

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The guidance engine.
///
/// Holds the guidance parameters and the altitude rate-limiter state. All
/// lateral laws are pure functions of their inputs.
pub struct Guidance {
    params: Params,

    /// Last commanded altitude, `None` until the first tick after a mission
    /// (re)initialisation.
    alt_cmd_m: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Guidance {

    /// Create a new guidance engine from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            params: params.clone(),
            alt_cmd_m: None,
        }
    }

    /// Get the planar east/north offset of a geographic point from the
    /// reference origin.
    pub fn to_planar(&self, lat_deg: f64, lon_deg: f64) -> Vector2<f64> {
        geodesic::planar_offset(
            self.params.ref_lat_deg,
            self.params.ref_lon_deg,
            lat_deg,
            lon_deg
        )
    }

    /// Straight-segment tracking law.
    ///
    /// Computes the desired heading which nulls the cross-track error to the
    /// segment from `start_m` to `target_m`. If the segment is degenerate
    /// (zero length) this falls back to direct pursuit of the target.
    pub fn follow_line_segment(
        &self,
        start_m: Vector2<f64>,
        target_m: Vector2<f64>,
        position_m: Vector2<f64>
    ) -> f64 {
        let seg = target_m - start_m;
        let length_m = seg.norm();

        if length_m <= std::f64::EPSILON {
            return self.follow_last_segment(target_m, position_m);
        }

        let course_deg = compass_bearing_deg(&seg);
        let direction = seg / length_m;

        // Cross-track error via the z component of the extended cross
        // product. Positive errors put the vehicle left of the segment, so a
        // positive (clockwise) heading correction steers back towards it.
        let rel = position_m - start_m;
        let xtrack_m = direction[0] * rel[1] - direction[1] * rel[0];

        let correction_deg = (self.params.k_xtrack_deg_per_m * xtrack_m).clamp(
            -self.params.max_correction_deg,
            self.params.max_correction_deg
        );

        wrap_360(course_deg + correction_deg)
    }

    /// Terminal-segment tracking law.
    ///
    /// Direct pursuit: the desired heading is the bearing from the current
    /// position to the target.
    pub fn follow_last_segment(
        &self,
        target_m: Vector2<f64>,
        position_m: Vector2<f64>
    ) -> f64 {
        compass_bearing_deg(&(target_m - position_m))
    }

    /// Orbit tracking law.
    ///
    /// The desired heading is tangential to the circle of `radius_m` around
    /// `centre_m` in the commanded direction, plus a radial correction
    /// proportional to the radial error. On-radius the command is exactly
    /// tangential; off-radius it points in towards (or out to) the circle.
    pub fn follow_orbit(
        &self,
        centre_m: Vector2<f64>,
        radius_m: f64,
        direction: TurnDirection,
        position_m: Vector2<f64>
    ) -> f64 {
        let radial = position_m - centre_m;
        let dist_m = radial.norm();

        // Directly over the centre the radial bearing is undefined, pick
        // north so the command is still bounded
        let radial_bearing_deg = match dist_m <= std::f64::EPSILON {
            true => 0.0,
            false => compass_bearing_deg(&radial),
        };

        let radial_error_m = dist_m - radius_m;

        // Positive radial error (outside the circle) must turn the nose in
        // towards the centre, which is a clockwise correction when orbiting
        // clockwise and a counter-clockwise one otherwise
        let (tangent_deg, correction_sign) = match direction {
            TurnDirection::Clockwise => (90.0, 1.0),
            TurnDirection::CounterClockwise => (-90.0, -1.0),
        };

        let correction_deg = correction_sign
            * (self.params.k_orbit_deg_per_m * radial_error_m).clamp(
                -self.params.max_correction_deg,
                self.params.max_correction_deg
            );

        wrap_360(radial_bearing_deg + tangent_deg + correction_deg)
    }

    /// Altitude management.
    ///
    /// Moves the commanded altitude towards `target_alt_m` by at most
    /// `max_alt_step_m` per call. The first call after a reset seeds the
    /// command from `current_alt_m` so the transition starts from where the
    /// vehicle actually is.
    pub fn maintain_altitude(&mut self, target_alt_m: f64, current_alt_m: f64) -> f64 {
        let cmd_m = self.alt_cmd_m.unwrap_or(current_alt_m);

        let step_m = (target_alt_m - cmd_m).clamp(
            -self.params.max_alt_step_m,
            self.params.max_alt_step_m
        );

        let cmd_m = cmd_m + step_m;
        self.alt_cmd_m = Some(cmd_m);

        cmd_m
    }

    /// Hold the current commanded altitude.
    ///
    /// Used while loitering: the command stays wherever it was, seeding from
    /// `current_alt_m` if no command has been issued yet.
    pub fn hold_altitude(&mut self, current_alt_m: f64) -> f64 {
        let cmd_m = self.alt_cmd_m.unwrap_or(current_alt_m);
        self.alt_cmd_m = Some(cmd_m);
        cmd_m
    }

    /// Forget the altitude rate-limiter state, so the next
    /// [`Guidance::maintain_altitude`] call seeds from the vehicle's actual
    /// altitude.
    pub fn reset_altitude(&mut self) {
        self.alt_cmd_m = None;
    }

    /// Get the guidance parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Get the compass bearing of a planar east/north vector, in degrees
/// [0, 360).
pub fn compass_bearing_deg(v: &Vector2<f64>) -> f64 {
    wrap_360(v[0].atan2(v[1]).to_degrees())
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> Params {
        Params {
            ref_lat_deg: 43.0,
            ref_lon_deg: -80.0,
            k_xtrack_deg_per_m: 1.0,
            k_orbit_deg_per_m: 1.0,
            max_correction_deg: 45.0,
            acceptance_radius_m: 10.0,
            max_alt_step_m: 2.0,
            default_loiter_radius_m: 60.0,
        }
    }

    #[test]
    fn test_compass_bearing() {
        assert_eq!(compass_bearing_deg(&Vector2::new(0.0, 1.0)), 0.0);
        assert_eq!(compass_bearing_deg(&Vector2::new(1.0, 0.0)), 90.0);
        assert_eq!(compass_bearing_deg(&Vector2::new(0.0, -1.0)), 180.0);
        assert_eq!(compass_bearing_deg(&Vector2::new(-1.0, 0.0)), 270.0);
    }

    #[test]
    fn test_line_segment_on_track() {
        let guidance = Guidance::new(&test_params());

        // Northbound segment, vehicle exactly on it
        let heading = guidance.follow_line_segment(
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 100.0),
            Vector2::new(0.0, 50.0)
        );

        assert!((heading - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_segment_corrects_towards_track() {
        let guidance = Guidance::new(&test_params());

        let start = Vector2::new(0.0, 0.0);
        let target = Vector2::new(0.0, 100.0);

        // Vehicle west (left) of the northbound segment: correction must be
        // clockwise (east of the course)
        let heading = guidance.follow_line_segment(
            start, target, Vector2::new(-5.0, 50.0));
        assert!(heading > 0.0 && heading <= 45.0, "heading {}", heading);

        // Vehicle east (right): correction counter-clockwise
        let heading = guidance.follow_line_segment(
            start, target, Vector2::new(5.0, 50.0));
        assert!(heading >= 315.0 && heading < 360.0, "heading {}", heading);
    }

    #[test]
    fn test_line_segment_correction_monotone_and_bounded() {
        let guidance = Guidance::new(&test_params());

        let start = Vector2::new(0.0, 0.0);
        let target = Vector2::new(0.0, 100.0);

        let near = guidance.follow_line_segment(
            start, target, Vector2::new(-2.0, 50.0));
        let far = guidance.follow_line_segment(
            start, target, Vector2::new(-20.0, 50.0));
        let very_far = guidance.follow_line_segment(
            start, target, Vector2::new(-2000.0, 50.0));

        // Larger errors command larger corrections, up to the clamp
        assert!(near < far);
        assert_eq!(far, 45.0);
        assert_eq!(very_far, 45.0);
    }

    #[test]
    fn test_degenerate_segment_falls_back_to_pursuit() {
        let guidance = Guidance::new(&test_params());

        let point = Vector2::new(10.0, 10.0);
        let heading = guidance.follow_line_segment(
            point, point, Vector2::new(10.0, 0.0));

        // Target is due north of the vehicle
        assert!((heading - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_segment_pursuit() {
        let guidance = Guidance::new(&test_params());

        let heading = guidance.follow_last_segment(
            Vector2::new(100.0, 100.0),
            Vector2::new(0.0, 0.0)
        );

        assert!((heading - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_tangential_on_radius() {
        let guidance = Guidance::new(&test_params());
        let centre = Vector2::new(0.0, 0.0);

        // Vehicle due north of the centre, exactly on the radius
        let position = Vector2::new(0.0, 60.0);

        let cw = guidance.follow_orbit(
            centre, 60.0, TurnDirection::Clockwise, position);
        assert!((cw - 90.0).abs() < 1e-9, "cw {}", cw);

        let ccw = guidance.follow_orbit(
            centre, 60.0, TurnDirection::CounterClockwise, position);
        assert!((ccw - 270.0).abs() < 1e-9, "ccw {}", ccw);
    }

    #[test]
    fn test_orbit_corrects_radially() {
        let guidance = Guidance::new(&test_params());
        let centre = Vector2::new(0.0, 0.0);

        // Outside the circle, due north of the centre, orbiting clockwise:
        // the command must point inside the tangent (between east and south)
        let outside = guidance.follow_orbit(
            centre, 60.0, TurnDirection::Clockwise, Vector2::new(0.0, 80.0));
        assert!(outside > 90.0 && outside <= 135.0, "outside {}", outside);

        // Inside the circle the command points outside the tangent
        let inside = guidance.follow_orbit(
            centre, 60.0, TurnDirection::Clockwise, Vector2::new(0.0, 40.0));
        assert!(inside < 90.0 && inside >= 45.0, "inside {}", inside);
    }

    #[test]
    fn test_orbit_over_centre_is_bounded() {
        let guidance = Guidance::new(&test_params());

        let heading = guidance.follow_orbit(
            Vector2::new(0.0, 0.0),
            60.0,
            TurnDirection::Clockwise,
            Vector2::new(0.0, 0.0)
        );

        assert!(heading >= 0.0 && heading < 360.0);
    }

    #[test]
    fn test_headings_always_in_compass_range() {
        let guidance = Guidance::new(&test_params());
        let start = Vector2::new(-50.0, -50.0);
        let target = Vector2::new(120.0, 80.0);

        for i in 0..36 {
            let angle = (i as f64 * 10.0).to_radians();
            let position = Vector2::new(
                200.0 * angle.cos(),
                200.0 * angle.sin()
            );

            let seg = guidance.follow_line_segment(start, target, position);
            assert!(seg >= 0.0 && seg < 360.0, "segment law {}", seg);

            let pursuit = guidance.follow_last_segment(target, position);
            assert!(pursuit >= 0.0 && pursuit < 360.0, "pursuit law {}", pursuit);

            let orbit = guidance.follow_orbit(
                target, 60.0, TurnDirection::CounterClockwise, position);
            assert!(orbit >= 0.0 && orbit < 360.0, "orbit law {}", orbit);
        }
    }

    #[test]
    fn test_altitude_seeds_from_vehicle() {
        let mut guidance = Guidance::new(&test_params());

        // First command steps from the vehicle's altitude, not from zero
        let cmd = guidance.maintain_altitude(120.0, 100.0);
        assert_eq!(cmd, 102.0);
    }

    #[test]
    fn test_altitude_steps_are_capped_and_monotone() {
        let mut guidance = Guidance::new(&test_params());

        let mut last_cmd = guidance.maintain_altitude(150.0, 100.0);
        for _ in 0..40 {
            let cmd = guidance.maintain_altitude(150.0, 100.0);
            assert!(cmd >= last_cmd, "command not monotone");
            assert!(cmd - last_cmd <= 2.0 + 1e-9, "step exceeds cap");
            last_cmd = cmd;
        }

        // Settles exactly on the target
        assert_eq!(last_cmd, 150.0);
    }

    #[test]
    fn test_altitude_descent() {
        let mut guidance = Guidance::new(&test_params());

        let cmd = guidance.maintain_altitude(80.0, 100.0);
        assert_eq!(cmd, 98.0);

        let mut cmd = cmd;
        for _ in 0..20 {
            cmd = guidance.maintain_altitude(80.0, 100.0);
        }
        assert_eq!(cmd, 80.0);
    }

    #[test]
    fn test_altitude_reset_reseeds() {
        let mut guidance = Guidance::new(&test_params());

        guidance.maintain_altitude(150.0, 100.0);
        guidance.reset_altitude();

        let cmd = guidance.maintain_altitude(150.0, 140.0);
        assert_eq!(cmd, 142.0);
    }
}
