//! Builds the corridor midline from matched gates.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;

use super::{
    matcher::Pair,
    waypoint::{bearing, TerminalHeading, Waypoint, WaypointSource},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Midline {
    /// The vehicle position followed by the midpoint of each gate, in rank order
    pub waypoints: Vec<Waypoint>,

    /// How the final waypoint of the whole path should be headed
    pub terminal: TerminalHeading,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the midline through the ranked gates.
///
/// If `closes_track` is set (no cones were left unmatched) the path should leave through the last
/// gate square to it, so the terminal heading is the gate normal. Otherwise the path will be
/// extended past the gates and the last bearing is kept.
pub fn build_midline(pairs: &[Pair], vehicle_m: &Vector2<f64>, closes_track: bool) -> Midline {
    let mut waypoints = Vec::with_capacity(pairs.len() + 1);
    waypoints.push(Waypoint::new(*vehicle_m, WaypointSource::Vehicle));
    waypoints.extend(
        pairs
            .iter()
            .map(|p| Waypoint::new(p.midpoint(), WaypointSource::Midpoint)),
    );

    let terminal = match pairs.last() {
        Some(last) if closes_track => gate_normal(last)
            .map(TerminalHeading::GateNormal)
            .unwrap_or(TerminalHeading::ContinueBearing),
        _ => TerminalHeading::ContinueBearing,
    };

    Midline {
        waypoints,
        terminal,
    }
}

/// Heading normal to the gate, pointing through it in the direction of travel.
///
/// With the left cone on the left of travel, the left-to-right vector rotated +90 deg points
/// forwards. Returns `None` if both cones are in the same place.
pub fn gate_normal(pair: &Pair) -> Option<f64> {
    bearing(&pair.left.position_m, &pair.right.position_m).map(|b| b + FRAC_PI_2)
}

#[cfg(test)]
mod test {
    use super::*;
    use track_if::{Cone, ConeColour};

    fn pair(lx: f64, ly: f64, rx: f64, ry: f64) -> Pair {
        Pair {
            left: Cone::new(lx, ly, ConeColour::Blue),
            right: Cone::new(rx, ry, ConeColour::Yellow),
        }
    }

    #[test]
    fn test_midline() {
        let pairs = [pair(1.0, 3.0, 1.0, 1.0), pair(3.0, 3.0, 3.0, 1.0)];
        let midline = build_midline(&pairs, &Vector2::zeros(), true);

        let points: Vec<_> = midline.waypoints.iter().map(|w| w.position_m).collect();
        assert_eq!(
            points,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 2.0),
                Vector2::new(3.0, 2.0)
            ]
        );
        assert_eq!(midline.waypoints[0].source, WaypointSource::Vehicle);

        // Gate runs along y so the exit heading is along +x
        match midline.terminal {
            TerminalHeading::GateNormal(h) => assert!(h.abs() < 1e-12),
            t => panic!("Expected gate normal, got {:?}", t),
        }
    }

    #[test]
    fn test_midline_open() {
        let midline = build_midline(&[pair(1.0, 3.0, 1.0, 1.0)], &Vector2::zeros(), false);
        assert_eq!(midline.terminal, TerminalHeading::ContinueBearing);

        let midline = build_midline(&[], &Vector2::new(2.0, 1.0), true);
        assert_eq!(midline.waypoints.len(), 1);
        assert_eq!(midline.terminal, TerminalHeading::ContinueBearing);
    }

    #[test]
    fn test_gate_normal() {
        // Driving along +y the left cone is at -x
        let h = gate_normal(&pair(-1.0, 0.0, 1.0, 0.0)).unwrap();
        assert!((h - FRAC_PI_2).abs() < 1e-12);

        assert_eq!(gate_normal(&pair(1.0, 1.0, 1.0, 1.0)), None);
    }
}
