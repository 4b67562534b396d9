//! # Arc Length Sampler
//!
//! Walks the headed waypoints at a fixed step, emitting path points until the distance budget is
//! used up. Each waypoint is walked along its own heading: inner waypoints for as many whole steps
//! as fit before the next waypoint, the final waypoint for as many as the remaining budget allows.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;

use super::waypoint::{WaypointPose, MIN_SEGMENT_LENGTH_M};
use crate::path::{Path, CONSTRAINT_TOLERANCE_M};

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sample the waypoints into a path starting from `origin_m`.
///
/// The origin is not emitted, and candidates within [`MIN_SEGMENT_LENGTH_M`] of the last emitted
/// point are skipped. Sampling stops as soon as the next point would take the driven length over
/// `max_dist_m`.
pub fn sample(
    poses: &[WaypointPose],
    origin_m: &Vector2<f64>,
    step_m: f64,
    max_dist_m: f64,
) -> Path {
    let mut path = Path::new_empty();
    let mut last_m = *origin_m;
    let mut length_m = 0.0;

    'waypoints: for (i, pose) in poses.iter().enumerate() {
        let num_steps = match poses.get(i + 1) {
            Some(next) => steps_in((next.position_m - pose.position_m).norm(), step_m),
            None => steps_in((max_dist_m - length_m).max(0.0), step_m),
        };

        let dir = pose.direction();

        for s in 0..=num_steps {
            let point_m = pose.position_m + dir * (step_m * s as f64);
            let inc_m = (point_m - last_m).norm();

            if inc_m < MIN_SEGMENT_LENGTH_M {
                continue;
            }

            if length_m + inc_m > max_dist_m + CONSTRAINT_TOLERANCE_M {
                trace!(
                    "Distance budget reached after {} points",
                    path.get_num_points()
                );
                break 'waypoints;
            }

            length_m += inc_m;
            last_m = point_m;
            path.points_m.push(point_m);
        }
    }

    path
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Number of whole steps that fit in `dist_m`.
fn steps_in(dist_m: f64, step_m: f64) -> usize {
    if dist_m < MIN_SEGMENT_LENGTH_M {
        0
    } else {
        (dist_m / step_m).floor() as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plan::waypoint::WaypointSource;

    fn pose(x: f64, y: f64, heading_rad: f64) -> WaypointPose {
        WaypointPose {
            position_m: Vector2::new(x, y),
            heading_rad,
            source: WaypointSource::Midpoint,
        }
    }

    #[test]
    fn test_straight_line() {
        let path = sample(&[pose(0.0, 0.0, 0.0)], &Vector2::zeros(), 0.1, 10.0);

        assert_eq!(path.get_num_points(), 100);
        assert!((path.points_m[0] - Vector2::new(0.1, 0.0)).norm() < 1e-9);
        assert!((path.points_m[99] - Vector2::new(10.0, 0.0)).norm() < 1e-9);
        assert!(path.points_m.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_through_waypoints() {
        let poses = [
            pose(0.0, 0.0, 0.0),
            pose(1.05, 0.0, std::f64::consts::FRAC_PI_2),
            pose(1.05, 2.0, std::f64::consts::FRAC_PI_2),
        ];
        let origin = Vector2::zeros();
        let path = sample(&poses, &origin, 0.1, 10.0);

        // The waypoints themselves are emitted
        assert!(path
            .points_m
            .iter()
            .any(|p| (p - Vector2::new(1.05, 0.0)).norm() < 1e-9));
        assert!(path
            .points_m
            .iter()
            .any(|p| (p - Vector2::new(1.05, 2.0)).norm() < 1e-9));

        assert!(path.length_from(&origin) <= 10.0 + 1e-6);
        assert!(path.max_separation_from(&origin) <= 0.1 + 1e-9);

        // The budget is used up to within a step
        assert!(path.length_from(&origin) > 10.0 - 0.1);
    }

    #[test]
    fn test_duplicates_skipped() {
        let poses = [
            pose(0.0, 0.0, 0.0),
            pose(1.0, 0.0, 0.0),
            pose(1.0, 0.0, 0.0),
        ];
        let path = sample(&poses, &Vector2::zeros(), 0.5, 3.0);

        let expected: Vec<_> = (1..=6).map(|i| Vector2::new(0.5 * i as f64, 0.0)).collect();
        assert_eq!(path.get_num_points(), expected.len());
        for (p, e) in path.points_m.iter().zip(expected.iter()) {
            assert!((p - e).norm() < 1e-9);
        }
    }

    #[test]
    fn test_budget_exhausted_before_last() {
        // Waypoints run much further than the budget
        let poses = [pose(0.0, 0.0, 0.0), pose(20.0, 0.0, 0.0)];
        let origin = Vector2::zeros();
        let path = sample(&poses, &origin, 0.5, 5.0);

        assert_eq!(path.get_num_points(), 10);
        assert!((path.length_from(&origin) - 5.0).abs() < 1e-9);
        assert!(path.points_m.iter().all(|p| p.x <= 5.0 + 1e-9));
    }

    #[test]
    fn test_steps_in() {
        assert_eq!(steps_in(0.0, 0.1), 0);
        assert_eq!(steps_in(0.25, 0.1), 2);
        assert_eq!(steps_in(1.0, 0.5), 2);
    }
}
