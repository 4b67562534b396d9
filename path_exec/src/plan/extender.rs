//! # Single Side Extension
//!
//! Where cones are only known on one side of the track the path is continued by offsetting
//! sideways from each unmatched cone, into the track, keeping a fixed margin from the known
//! boundary.
//!
//! ```text
//!           anchor ──────────► cone (right)
//!                                 │
//!                                 │ lateral_offset_m, bearing rotated +90 deg
//!                                 ▼
//!                              waypoint
//! ```
//! (drawn with travel along +x, so +90 deg points up the page into the track for a right cone;
//! left cones are rotated -90 deg instead.)

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;
use track_if::Cone;

use super::{
    chain_sort::nearest_of,
    side::Side,
    waypoint::{Waypoint, WaypointSource, MIN_SEGMENT_LENGTH_M},
};

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Point `offset_m` from the cone, perpendicular to the bearing from `anchor_m`, towards the
/// inside of the track.
///
/// If the anchor is on top of the cone `fallback_heading_rad` is used in place of the bearing.
pub fn lateral_offset_point(
    anchor_m: &Vector2<f64>,
    cone: &Cone,
    offset_m: f64,
    fallback_heading_rad: f64,
) -> Vector2<f64> {
    let diff = cone.position_m - anchor_m;

    let dir = if diff.norm() < MIN_SEGMENT_LENGTH_M {
        Vector2::new(fallback_heading_rad.cos(), fallback_heading_rad.sin())
    } else {
        diff.normalize()
    };

    cone.position_m + offset_m * Side::of(cone).inward(&dir)
}

/// Synthesise a waypoint for each unmatched cone, in the given (chain) order.
///
/// Each cone is anchored on the waypoint nearest to it among those strictly closer to the vehicle
/// than the cone itself, including waypoints synthesised for earlier cones. The returned vector
/// holds only the new waypoints.
pub fn extend_single_side(
    existing: &[Waypoint],
    leftovers: &[Cone],
    vehicle_m: &Vector2<f64>,
    vehicle_heading_rad: f64,
    offset_m: f64,
) -> Vec<Waypoint> {
    let mut built: Vec<Waypoint> = existing.to_vec();
    let num_existing = built.len();

    for cone in leftovers {
        let cone_range_m = (cone.position_m - vehicle_m).norm();

        let anchor_idx = nearest_of(
            built
                .iter()
                .enumerate()
                .filter(|(_, w)| (w.position_m - vehicle_m).norm() < cone_range_m)
                .map(|(i, w)| (i, w.position_m)),
            &cone.position_m,
        );
        let anchor_m = anchor_idx
            .map(|i| built[i].position_m)
            .unwrap_or(*vehicle_m);

        let position_m =
            lateral_offset_point(&anchor_m, cone, offset_m, vehicle_heading_rad);

        trace!(
            "{:?} cone at ({:.3}, {:.3}) anchored on ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            Side::of(cone),
            cone.position_m.x,
            cone.position_m.y,
            anchor_m.x,
            anchor_m.y,
            position_m.x,
            position_m.y
        );

        built.push(Waypoint::new(position_m, WaypointSource::SingleSide));
    }

    built.split_off(num_existing)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plan::waypoint::bearing;
    use track_if::ConeColour;

    const OFFSET_M: f64 = 0.75;

    fn vehicle() -> Waypoint {
        Waypoint::new(Vector2::zeros(), WaypointSource::Vehicle)
    }

    /// Signed cross product of the segment from `from` to `to` with the vector to `point`.
    fn cross(from: &Vector2<f64>, to: &Vector2<f64>, point: &Vector2<f64>) -> f64 {
        let d = to - from;
        let v = point - from;
        d.x * v.y - d.y * v.x
    }

    #[test]
    fn test_lateral_offset_point() {
        let anchor = Vector2::zeros();

        let right = Cone::new(2.0, 0.0, ConeColour::Yellow);
        let p = lateral_offset_point(&anchor, &right, OFFSET_M, 0.0);
        assert!((p - Vector2::new(2.0, 0.75)).norm() < 1e-12);

        let left = Cone::new(2.0, 0.0, ConeColour::Blue);
        let p = lateral_offset_point(&anchor, &left, OFFSET_M, 0.0);
        assert!((p - Vector2::new(2.0, -0.75)).norm() < 1e-12);

        // Anchor on the cone uses the fallback heading
        let p = lateral_offset_point(&right.position_m, &right, OFFSET_M, 0.0);
        assert!((p - Vector2::new(2.0, 0.75)).norm() < 1e-12);
    }

    #[test]
    fn test_right_side_only() {
        let cones = [
            Cone::new(1.0, 1.0, ConeColour::Yellow),
            Cone::new(3.0, 1.5, ConeColour::Yellow),
            Cone::new(5.0, 2.0, ConeColour::Yellow),
        ];

        let new = extend_single_side(&[vehicle()], &cones, &Vector2::zeros(), 1.2, OFFSET_M);
        assert_eq!(new.len(), 3);

        let mut previous = Vector2::zeros();
        for (wp, cone) in new.iter().zip(cones.iter()) {
            assert_eq!(wp.source, WaypointSource::SingleSide);
            assert!(((wp.position_m - cone.position_m).norm() - OFFSET_M).abs() < 1e-9);

            // Travelling towards the new waypoint the cone must be on the right
            assert!(cross(&previous, &wp.position_m, &cone.position_m) < 0.0);
            previous = wp.position_m;
        }
    }

    #[test]
    fn test_left_side_only() {
        let cones = [
            Cone::new(1.0, 4.0, ConeColour::Blue),
            Cone::new(3.0, 4.5, ConeColour::Blue),
            Cone::new(5.0, 5.0, ConeColour::Blue),
        ];

        let new = extend_single_side(&[vehicle()], &cones, &Vector2::zeros(), 0.6, OFFSET_M);

        let mut previous = Vector2::zeros();
        for (wp, cone) in new.iter().zip(cones.iter()) {
            assert!(((wp.position_m - cone.position_m).norm() - OFFSET_M).abs() < 1e-9);
            assert!(cross(&previous, &wp.position_m, &cone.position_m) > 0.0);
            previous = wp.position_m;
        }
    }

    #[test]
    fn test_anchor_behind_cone() {
        // The midpoint at (3, 3) is further from the vehicle than the first leftover, so the
        // first leftover must be anchored on the vehicle, not the midpoint.
        let existing = [
            vehicle(),
            Waypoint::new(Vector2::new(3.0, 3.0), WaypointSource::Midpoint),
        ];
        let cones = [
            Cone::new(1.0, 3.5, ConeColour::Blue),
            Cone::new(5.0, 4.5, ConeColour::Blue),
        ];

        let new = extend_single_side(&existing, &cones, &Vector2::zeros(), 0.4, OFFSET_M);

        let expected_first = lateral_offset_point(&Vector2::zeros(), &cones[0], OFFSET_M, 0.4);
        assert!((new[0].position_m - expected_first).norm() < 1e-12);

        // Second is anchored on the midpoint, being nearer to it than the first new waypoint
        let expected_second =
            lateral_offset_point(&Vector2::new(3.0, 3.0), &cones[1], OFFSET_M, 0.4);
        assert!((new[1].position_m - expected_second).norm() < 1e-12);

        // Both end up inside the track, below the left hand cones
        assert!(new[0].position_m.y < 3.5);
        assert!(new[1].position_m.y < 4.5);
        assert!(bearing(&Vector2::zeros(), &new[0].position_m).is_some());
    }
}
