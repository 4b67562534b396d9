//! # Path
//!
//! This module defines the path produced by the planner.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when checking the path length and spacing against their limits.
pub const CONSTRAINT_TOLERANCE_M: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the trajectory the vehicle should follow.
///
/// The vehicle position is the implicit start of the path and is not one of the points.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Path {
    pub points_m: Vec<Vector2<f64>>,
}

/// A segment between two path points
#[derive(Default, Serialize, Deserialize, Debug)]
pub struct PathSegment {
    /// The target of the segment
    pub target_m: Vector2<f64>,

    /// The start point of the segment
    pub start_m: Vector2<f64>,

    /// The length of the segment
    pub length_m: f64,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("The path is {0:.3} m long, longer than the {1:.3} m limit")]
    TooLong(f64, f64),

    #[error("Point {0} of the path is {1:.3} m from the previous point, more than the {2:.3} m limit")]
    PointsTooFarApart(usize, f64, f64),

    #[error("Point {0} of the path is not finite")]
    NonFinitePoint(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new empty path
    pub fn new_empty() -> Self {
        Path {
            points_m: Vec::new(),
        }
    }

    /// Returns the path segment connecting the target point and the previous
    /// point.
    ///
    /// If no segment exists (the target is the first point in the sequence or
    /// is beyond the end of the sequence) then `None` will be returned
    pub fn get_segment_to_target(&self, target_index: usize) -> Option<PathSegment> {
        // Catch invalid targets
        if target_index == 0 || target_index >= self.points_m.len() {
            return None;
        }

        Some(PathSegment::new(
            self.points_m[target_index - 1],
            self.points_m[target_index],
        ))
    }

    /// Return the length of the path in meters, not including the distance from the vehicle to
    /// the first point.
    ///
    /// If the path is empty (not enough points) then `None` is returned.
    pub fn get_length(&self) -> Option<f64> {
        // If the path is invalid (not enough points)
        if self.points_m.len() < 2 {
            return None;
        }

        Some(
            (1..self.points_m.len())
                .filter_map(|i| self.get_segment_to_target(i))
                .map(|s| s.length_m)
                .sum(),
        )
    }

    /// Length of the path as driven from `origin_m`, i.e. including the leg from the origin to the
    /// first point.
    pub fn length_from(&self, origin_m: &Vector2<f64>) -> f64 {
        match self.points_m.first() {
            Some(first) => (first - origin_m).norm() + self.get_length().unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Largest separation between consecutive points, including the leg from `origin_m` to the
    /// first point.
    pub fn max_separation_from(&self, origin_m: &Vector2<f64>) -> f64 {
        self.legs_from(origin_m)
            .map(|(_, sep)| sep)
            .fold(0.0, f64::max)
    }

    /// Check the path against a length budget and spacing limit as driven from `origin_m`.
    pub fn check_constraints(
        &self,
        origin_m: &Vector2<f64>,
        max_length_m: f64,
        max_sep_m: f64,
    ) -> Result<(), PathError> {
        if let Some(i) = self
            .points_m
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(PathError::NonFinitePoint(i));
        }

        if let Some((i, sep)) = self
            .legs_from(origin_m)
            .find(|(_, sep)| *sep > max_sep_m + CONSTRAINT_TOLERANCE_M)
        {
            return Err(PathError::PointsTooFarApart(i, sep, max_sep_m));
        }

        let length_m = self.length_from(origin_m);
        if length_m > max_length_m + CONSTRAINT_TOLERANCE_M {
            return Err(PathError::TooLong(length_m, max_length_m));
        }

        Ok(())
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Iterator over `(point index, distance from the previous point)`, with the origin standing
    /// in for the point before the first.
    fn legs_from<'a>(
        &'a self,
        origin_m: &'a Vector2<f64>,
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        std::iter::once(origin_m)
            .chain(self.points_m.iter())
            .zip(self.points_m.iter())
            .map(|(prev, next)| (next - prev).norm())
            .enumerate()
    }
}

impl PathSegment {
    pub fn new(start_m: Vector2<f64>, target_m: Vector2<f64>) -> Self {
        Self {
            target_m,
            start_m,
            length_m: (target_m - start_m).norm(),
        }
    }
}
