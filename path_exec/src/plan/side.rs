//! Splits cones into the two sides of the track.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;
use track_if::Cone;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Cones grouped by the side of the track they bound, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sides {
    pub left: Vec<Cone>,
    pub right: Vec<Cone>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Side {
    pub fn of(cone: &Cone) -> Self {
        if cone.is_left() {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Rotate `dir` a quarter turn towards the inside of the track.
    ///
    /// For a right hand cone this is +90 deg (anticlockwise), for a left hand cone -90 deg.
    pub fn inward(&self, dir: &Vector2<f64>) -> Vector2<f64> {
        match self {
            Side::Right => Vector2::new(-dir.y, dir.x),
            Side::Left => Vector2::new(dir.y, -dir.x),
        }
    }

    /// Returns true if a cone on this side, at the given signed cross product from a segment
    /// (`direction x (cone - start)`), is *not* strictly on its own side of travel.
    pub fn is_wrong_side(&self, cross: f64) -> bool {
        match self {
            Side::Left => cross <= 0.0,
            Side::Right => cross >= 0.0,
        }
    }
}

impl Sides {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Partition the cones by side, preserving their order.
pub fn split_sides(cones: &[Cone]) -> Sides {
    let (left, right) = cones.iter().copied().partition(|c| c.is_left());
    Sides { left, right }
}

#[cfg(test)]
mod test {
    use super::*;
    use track_if::ConeColour;

    #[test]
    fn test_split_sides() {
        let cones = [
            Cone::new(1.0, 3.0, ConeColour::Blue),
            Cone::new(1.0, 1.0, ConeColour::Yellow),
            Cone::new(3.0, 3.0, ConeColour::Blue),
        ];

        let sides = split_sides(&cones);
        assert_eq!(sides.left, vec![cones[0], cones[2]]);
        assert_eq!(sides.right, vec![cones[1]]);
        assert!(split_sides(&[]).is_empty());
    }

    #[test]
    fn test_inward() {
        let fwd = Vector2::new(1.0, 0.0);
        assert_eq!(Side::Right.inward(&fwd), Vector2::new(0.0, 1.0));
        assert_eq!(Side::Left.inward(&fwd), Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_is_wrong_side() {
        assert!(Side::Left.is_wrong_side(-1.0));
        assert!(Side::Left.is_wrong_side(0.0));
        assert!(!Side::Left.is_wrong_side(1.0));
        assert!(Side::Right.is_wrong_side(1.0));
        assert!(Side::Right.is_wrong_side(0.0));
        assert!(!Side::Right.is_wrong_side(-1.0));
    }
}
