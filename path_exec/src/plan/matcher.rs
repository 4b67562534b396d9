//! # Cone Matching
//!
//! Pairs left hand cones with right hand cones to form the gates the path should pass through.
//!
//! Each left cone claims its nearest right cone, and where several left cones claim the same
//! right cone only the closest claimant keeps it. If both sides are left with unmatched cones the
//! round is repeated over just the unmatched cones, so that leftovers only ever remain on one
//! side.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use ordered_float::OrderedFloat;
use serde::Serialize;
use track_if::Cone;

use super::chain_sort::nearest_of;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A left and right cone forming a gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pair {
    pub left: Cone,
    pub right: Cone,
}

/// Result of matching the two sides.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Matching {
    /// Matched pairs, ranked by the chain position of their left cone
    pub pairs: Vec<Pair>,

    /// Unmatched left cones, in chain order
    pub left_leftover: Vec<Cone>,

    /// Unmatched right cones, in chain order
    pub right_leftover: Vec<Cone>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pair {
    /// Midpoint of the gate.
    pub fn midpoint(&self) -> nalgebra::Vector2<f64> {
        0.5 * (self.left.position_m + self.right.position_m)
    }
}

impl Matching {
    pub fn has_leftovers(&self) -> bool {
        !self.left_leftover.is_empty() || !self.right_leftover.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Match the chain sorted left and right cones.
pub fn match_cones(left: &[Cone], right: &[Cone]) -> Matching {
    // Nothing to match against, everything is a leftover
    if left.is_empty() || right.is_empty() {
        return Matching {
            pairs: Vec::new(),
            left_leftover: left.to_vec(),
            right_leftover: right.to_vec(),
        };
    }

    let mut left_free: Vec<usize> = (0..left.len()).collect();
    let mut right_free: Vec<usize> = (0..right.len()).collect();
    let mut matched: Vec<(usize, usize)> = Vec::new();

    while !left_free.is_empty() && !right_free.is_empty() {
        let round = match_round(left, right, &left_free, &right_free);

        // Can't happen with both sides non-empty, but guarantees termination
        if round.is_empty() {
            break;
        }

        trace!("Matching round produced {} pairs", round.len());

        left_free.retain(|l| !round.iter().any(|(rl, _)| rl == l));
        right_free.retain(|r| !round.iter().any(|(_, rr)| rr == r));
        matched.extend(round);
    }

    matched.sort_by_key(|(l, _)| *l);

    Matching {
        pairs: matched
            .iter()
            .map(|&(l, r)| Pair {
                left: left[l],
                right: right[r],
            })
            .collect(),
        left_leftover: left_free.iter().map(|&l| left[l]).collect(),
        right_leftover: right_free.iter().map(|&r| right[r]).collect(),
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// One round of nearest neighbour matching between the free cones of each side.
///
/// Returns `(left_index, right_index)` pairs ordered by right index.
fn match_round(
    left: &[Cone],
    right: &[Cone],
    left_free: &[usize],
    right_free: &[usize],
) -> Vec<(usize, usize)> {
    // Best claimant for each right cone as (distance, left index)
    let mut best: Vec<Option<(OrderedFloat<f64>, usize)>> = vec![None; right.len()];

    for &l in left_free {
        let claimed = nearest_of(
            right_free.iter().map(|&r| (r, right[r].position_m)),
            &left[l].position_m,
        );

        if let Some(r) = claimed {
            let claim = (
                OrderedFloat((right[r].position_m - left[l].position_m).norm()),
                l,
            );

            best[r] = match best[r] {
                Some(current) if current <= claim => Some(current),
                _ => Some(claim),
            };
        }
    }

    best.iter()
        .enumerate()
        .filter_map(|(r, b)| b.map(|(_, l)| (l, r)))
        .collect()
}
