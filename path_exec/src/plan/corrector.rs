//! # Boundary Correction
//!
//! Once all waypoints are known they are re-chained from the vehicle and every segment is checked
//! against the cones. A cone inside a segment's bounding box that the segment passes on the wrong
//! side of (a left cone on the right of travel, or a right cone on the left) gets a corrective
//! waypoint inserted after the start of the segment, pushing the path back inside the track.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};
use nalgebra::Vector2;
use track_if::Cone;

use super::{
    chain_sort::{chain_sort, SortMode},
    extender::lateral_offset_point,
    side::Side,
    waypoint::{bearing, Waypoint, WaypointSource, MIN_SEGMENT_LENGTH_M},
};

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Re-sort the waypoints and insert corrections for every boundary violation.
///
/// `waypoints` must contain the vehicle waypoint, which remains first in the output. All cones
/// are checked, including any that were dropped by the forward filter.
///
/// Inserted corrections create new segments, so the whole sequence is checked again until a pass
/// inserts nothing, up to one pass per cone plus one. Layouts where cones of opposite sides
/// interleave closer than `offset_m` may still hold violations once the passes run out.
pub fn correct_boundaries(
    waypoints: &[Waypoint],
    cones: &[Cone],
    vehicle_m: &Vector2<f64>,
    vehicle_heading_rad: f64,
    offset_m: f64,
) -> Vec<Waypoint> {
    let mut corrected = chain_sort(waypoints, vehicle_m, vehicle_heading_rad, SortMode::All);
    let max_passes = cones.len() + 1;

    for pass in 0..max_passes {
        let (next, num_inserted) =
            correction_pass(&corrected, cones, vehicle_heading_rad, offset_m);
        corrected = next;

        if num_inserted == 0 {
            return corrected;
        }

        trace!(
            "Correction pass {} inserted {} waypoints",
            pass,
            num_inserted
        );
    }

    debug!(
        "Boundary corrections still changing after {} passes",
        max_passes
    );

    corrected
}

/// Returns true if the cone lies in the inclusive bounding box of the segment from `p1_m` to
/// `p2_m` and is not strictly on its own side of it.
///
/// Zero length segments never violate.
pub fn is_violation(p1_m: &Vector2<f64>, p2_m: &Vector2<f64>, cone: &Cone) -> bool {
    let d = p2_m - p1_m;
    if d.norm() < MIN_SEGMENT_LENGTH_M {
        return false;
    }

    let m = cone.position_m;
    let in_box = m.x >= p1_m.x.min(p2_m.x)
        && m.x <= p1_m.x.max(p2_m.x)
        && m.y >= p1_m.y.min(p2_m.y)
        && m.y <= p1_m.y.max(p2_m.y);

    if !in_box {
        return false;
    }

    let v = m - p1_m;
    let cross = d.x * v.y - d.y * v.x;

    Side::of(cone).is_wrong_side(cross)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check every segment once, inserting a correction after the start of the segment for each cone
/// it violates. Returns the new sequence and the number of corrections inserted.
fn correction_pass(
    waypoints: &[Waypoint],
    cones: &[Cone],
    vehicle_heading_rad: f64,
    offset_m: f64,
) -> (Vec<Waypoint>, usize) {
    let (mut corrected, num_inserted) = waypoints.windows(2).fold(
        (Vec::with_capacity(waypoints.len()), 0),
        |(mut acc, num): (Vec<Waypoint>, usize), seg| {
            let (p1, p2) = (&seg[0], &seg[1]);
            acc.push(*p1);

            let fallback_rad =
                bearing(&p1.position_m, &p2.position_m).unwrap_or(vehicle_heading_rad);
            let before = acc.len();

            acc.extend(
                cones
                    .iter()
                    .filter(|c| is_violation(&p1.position_m, &p2.position_m, c))
                    .map(|c| {
                        debug!(
                            "{:?} cone at ({:.3}, {:.3}) is on the wrong side of the path",
                            Side::of(c),
                            c.position_m.x,
                            c.position_m.y
                        );
                        Waypoint::new(
                            lateral_offset_point(&p1.position_m, c, offset_m, fallback_rad),
                            WaypointSource::Correction,
                        )
                    }),
            );

            let num = num + acc.len() - before;
            (acc, num)
        },
    );

    if let Some(last) = waypoints.last() {
        corrected.push(*last);
    }

    (corrected, num_inserted)
}
