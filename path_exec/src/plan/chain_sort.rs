//! # Chain Sort
//!
//! Orders points front-to-back from the vehicle by greedily chaining nearest neighbours: starting
//! from the vehicle position the nearest unvisited point is taken next, and the search continues
//! from that point.
//!
//! The sort works on indices into the input slice with a visited mask, and all nearest-neighbour
//! queries break distance ties on the lower index, so the output is fully determined by the input
//! order.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::f64::consts::FRAC_PI_2;

use log::trace;
use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use util::maths::abs_ang_dist;

use super::waypoint::{bearing, Positioned};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Slack on the half-plane limit so that points exactly abeam of the vehicle are kept.
const HALF_PLANE_TOLERANCE_RAD: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Only sort points within +/-90 deg of the vehicle heading, falling back to all points if
    /// none are in front.
    FrontOnly,

    /// Sort every point.
    All,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sort `items` into a nearest-neighbour chain starting from `origin_m`.
///
/// In [`SortMode::FrontOnly`] points behind the vehicle are dropped from the output, unless that
/// would leave nothing to sort.
pub fn chain_sort<T>(
    items: &[T],
    origin_m: &Vector2<f64>,
    heading_rad: f64,
    mode: SortMode,
) -> Vec<T>
where
    T: Positioned + Clone,
{
    let mut candidates: Vec<usize> = match mode {
        SortMode::All => (0..items.len()).collect(),
        SortMode::FrontOnly => (0..items.len())
            .filter(|&i| is_in_front(origin_m, heading_rad, &items[i].position_m()))
            .collect(),
    };

    if candidates.is_empty() {
        candidates = (0..items.len()).collect();
    } else if candidates.len() < items.len() {
        trace!(
            "Dropped {} points behind the vehicle",
            items.len() - candidates.len()
        );
    }

    let mut visited = vec![false; items.len()];
    let mut sorted = Vec::with_capacity(candidates.len());
    let mut current_m = *origin_m;

    loop {
        let next = nearest_of(
            candidates
                .iter()
                .filter(|&&i| !visited[i])
                .map(|&i| (i, items[i].position_m())),
            &current_m,
        );
        let next = match next {
            Some(n) => n,
            None => break,
        };

        visited[next] = true;
        current_m = items[next].position_m();
        sorted.push(items[next].clone());
    }

    sorted
}

/// Find the candidate nearest to `target_m`.
///
/// Candidates are `(index, position)` pairs. Ties in distance go to the lowest index. Returns
/// `None` if there are no candidates.
pub fn nearest_of<I>(candidates: I, target_m: &Vector2<f64>) -> Option<usize>
where
    I: IntoIterator<Item = (usize, Vector2<f64>)>,
{
    candidates
        .into_iter()
        .min_by_key(|(i, p)| (OrderedFloat((p - target_m).norm()), *i))
        .map(|(i, _)| i)
}

/// Returns true if the bearing from the origin to the point is within +/-90 deg of the heading.
///
/// A point on top of the origin counts as in front.
pub fn is_in_front(origin_m: &Vector2<f64>, heading_rad: f64, point_m: &Vector2<f64>) -> bool {
    match bearing(origin_m, point_m) {
        Some(b) => abs_ang_dist(b, heading_rad) <= FRAC_PI_2 + HALF_PLANE_TOLERANCE_RAD,
        None => true,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use track_if::{Cone, ConeColour};

    fn cone(x: f64, y: f64) -> Cone {
        Cone::new(x, y, ConeColour::Blue)
    }

    #[test]
    fn test_chain_order() {
        // Input deliberately out of order
        let cones = [cone(5.0, 3.0), cone(1.0, 3.0), cone(3.0, 3.0)];
        let origin = Vector2::new(0.0, 0.0);

        let sorted = chain_sort(&cones, &origin, 0.0, SortMode::All);
        assert_eq!(sorted, vec![cones[1], cones[2], cones[0]]);
    }

    #[test]
    fn test_chain_follows_neighbours_not_origin_distance() {
        // The second cone is further from the origin than the third, but nearer the first
        let cones = [cone(1.0, 0.0), cone(4.0, 0.0), cone(1.0, 3.5)];
        let sorted = chain_sort(&cones, &Vector2::zeros(), 0.0, SortMode::All);
        assert_eq!(sorted, vec![cones[0], cones[1], cones[2]]);
    }

    #[test]
    fn test_front_only() {
        let cones = [cone(-2.0, 0.0), cone(2.0, 1.0), cone(0.0, 1.0)];
        let sorted = chain_sort(&cones, &Vector2::zeros(), 0.0, SortMode::FrontOnly);

        // (0, 1) is exactly abeam so is kept, (-2, 0) is behind so is dropped
        assert_eq!(sorted, vec![cones[2], cones[1]]);
    }

    #[test]
    fn test_front_only_fallback() {
        // Heading ~298 deg, every cone is behind, so all are sorted
        let cones = [cone(3.0, 5.0), cone(3.0, 2.0)];
        let sorted = chain_sort(&cones, &Vector2::zeros(), 5.2, SortMode::FrontOnly);
        assert_eq!(sorted, vec![cones[1], cones[0]]);
    }

    #[test]
    fn test_ties_use_input_order() {
        let cones = [cone(0.0, 1.0), cone(0.0, -1.0)];
        let sorted = chain_sort(&cones, &Vector2::zeros(), 0.0, SortMode::All);
        assert_eq!(sorted, vec![cones[0], cones[1]]);

        let flipped = [cones[1], cones[0]];
        let sorted = chain_sort(&flipped, &Vector2::zeros(), 0.0, SortMode::All);
        assert_eq!(sorted, vec![cones[1], cones[0]]);
    }

    #[test]
    fn test_empty() {
        let cones: [Cone; 0] = [];
        assert!(chain_sort(&cones, &Vector2::zeros(), 0.0, SortMode::FrontOnly).is_empty());
        assert_eq!(nearest_of(Vec::new(), &Vector2::zeros()), None);
    }
}
