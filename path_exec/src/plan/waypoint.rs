//! # Waypoints
//!
//! Waypoints are built in two passes. The pipeline stages only decide *where* waypoints go
//! ([`Waypoint`]), and once the final order is known [`assign_headings`] turns them into
//! [`WaypointPose`]s, each heading pointing at its successor.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;
use track_if::Cone;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Segments shorter than this have no defined direction.
pub const MIN_SEGMENT_LENGTH_M: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Anything with a position in the world frame.
pub trait Positioned {
    fn position_m(&self) -> Vector2<f64>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A planning point without a heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub position_m: Vector2<f64>,

    /// The stage which created this waypoint
    pub source: WaypointSource,
}

/// A planning point with its outgoing heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaypointPose {
    pub position_m: Vector2<f64>,

    /// Outgoing heading, angle to the +ve x axis in radians
    pub heading_rad: f64,

    pub source: WaypointSource,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaypointSource {
    /// The vehicle's own position
    Vehicle,

    /// Midpoint of a matched left/right pair
    Midpoint,

    /// Lateral offset from an unmatched single side cone
    SingleSide,

    /// Lateral offset pushing the path clear of a cone it passed on the wrong side of
    Correction,
}

/// How the heading of the final waypoint is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TerminalHeading {
    /// Exit perpendicular to the closing gate, with the given heading
    GateNormal(f64),

    /// Keep the bearing of the last segment
    ContinueBearing,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    pub fn new(position_m: Vector2<f64>, source: WaypointSource) -> Self {
        Self { position_m, source }
    }
}

impl WaypointPose {
    /// Unit vector along the heading.
    pub fn direction(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }
}

impl Positioned for Waypoint {
    fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }
}

impl Positioned for WaypointPose {
    fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }
}

impl Positioned for Cone {
    fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Bearing from `from` to `to`, or `None` if the points coincide.
pub fn bearing(from: &Vector2<f64>, to: &Vector2<f64>) -> Option<f64> {
    let diff = to - from;
    if diff.norm() < MIN_SEGMENT_LENGTH_M {
        None
    } else {
        Some(diff.y.atan2(diff.x))
    }
}

/// Assign headings to the ordered waypoints.
///
/// Every waypoint but the last points at its successor. Duplicate waypoints inherit the heading
/// before them, the first falling back to `start_heading_rad`. The last waypoint's heading follows
/// `terminal`.
pub fn assign_headings(
    waypoints: &[Waypoint],
    terminal: TerminalHeading,
    start_heading_rad: f64,
) -> Vec<WaypointPose> {
    let mut poses: Vec<WaypointPose> = Vec::with_capacity(waypoints.len());
    let mut previous_rad = start_heading_rad;

    for (i, wp) in waypoints.iter().enumerate() {
        let heading_rad = match waypoints.get(i + 1) {
            Some(next) => bearing(&wp.position_m, &next.position_m).unwrap_or(previous_rad),
            None => match terminal {
                TerminalHeading::GateNormal(h) => h,
                TerminalHeading::ContinueBearing => previous_rad,
            },
        };

        poses.push(WaypointPose {
            position_m: wp.position_m,
            heading_rad,
            source: wp.source,
        });
        previous_rad = heading_rad;
    }

    poses
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn wp(x: f64, y: f64) -> Waypoint {
        Waypoint::new(Vector2::new(x, y), WaypointSource::Midpoint)
    }

    #[test]
    fn test_assign_headings() {
        let wps = [wp(0.0, 0.0), wp(1.0, 1.0), wp(1.0, 2.0)];

        let poses = assign_headings(&wps, TerminalHeading::ContinueBearing, 0.3);
        assert!((poses[0].heading_rad - FRAC_PI_4).abs() < 1e-12);
        assert!((poses[1].heading_rad - FRAC_PI_2).abs() < 1e-12);
        assert!((poses[2].heading_rad - FRAC_PI_2).abs() < 1e-12);

        let poses = assign_headings(&wps, TerminalHeading::GateNormal(0.0), 0.3);
        assert_eq!(poses[2].heading_rad, 0.0);
    }

    #[test]
    fn test_assign_headings_degenerate() {
        // A lone waypoint keeps the start heading
        let poses = assign_headings(&[wp(0.0, 0.0)], TerminalHeading::ContinueBearing, 0.3);
        assert_eq!(poses[0].heading_rad, 0.3);

        // Duplicates inherit the previous heading
        let poses = assign_headings(
            &[wp(0.0, 0.0), wp(0.0, 0.0), wp(0.0, 1.0)],
            TerminalHeading::ContinueBearing,
            0.3,
        );
        assert_eq!(poses[0].heading_rad, 0.3);
        assert!((poses[1].heading_rad - FRAC_PI_2).abs() < 1e-12);
        assert!((poses[2].heading_rad - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_bearing() {
        let o = Vector2::new(1.0, 1.0);
        assert_eq!(bearing(&o, &o), None);
        let b = bearing(&o, &Vector2::new(0.0, 1.0)).unwrap();
        assert!((b - std::f64::consts::PI).abs() < 1e-12);
    }
}
