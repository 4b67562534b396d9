//! # Cone Interface
//!
//! Defines the cone observations and car pose consumed by the path planner, along with their wire
//! representation. On the wire a cone's colour is a raw code, `0` for yellow (the right hand
//! boundary of the track) and `1` for blue (the left hand boundary).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::convert::TryFrom;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single detected cone in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConeFrame", into = "ConeFrame")]
pub struct Cone {
    /// Position of the cone in the world frame
    pub position_m: Vector2<f64>,

    /// Colour of the cone, which determines which side of the track it bounds
    pub colour: ConeColour,
}

/// The pose of the car in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CarPoseFrame", into = "CarPoseFrame")]
pub struct CarPose {
    /// Position of the car in the world frame
    pub position_m: Vector2<f64>,

    /// Heading of the car, angle to the +ve x axis in radians
    pub yaw_rad: f64,
}

/// Serialisable form of a [`Cone`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConeFrame {
    pub x: f64,
    pub y: f64,

    /// Raw colour code, 0 = yellow, 1 = blue
    pub color: u8,
}

/// Serialisable form of a [`CarPose`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarPoseFrame {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Colour of a cone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConeColour {
    /// Marks the right hand side of the track
    Yellow,

    /// Marks the left hand side of the track
    Blue,
}

#[derive(Debug, thiserror::Error)]
pub enum ConeError {
    #[error("Unknown cone colour code {0}, expected 0 (yellow, right) or 1 (blue, left)")]
    UnknownColour(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Cone {
    pub fn new(x: f64, y: f64, colour: ConeColour) -> Self {
        Self {
            position_m: Vector2::new(x, y),
            colour,
        }
    }

    /// Build a cone from a raw colour code, failing if the code isn't a known colour.
    pub fn from_raw(x: f64, y: f64, color: u8) -> Result<Self, ConeError> {
        Ok(Self::new(x, y, ConeColour::try_from(color)?))
    }

    /// Returns true if the cone bounds the left hand side of the track.
    pub fn is_left(&self) -> bool {
        self.colour.is_left()
    }
}

impl CarPose {
    pub fn new(x: f64, y: f64, yaw_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x, y),
            yaw_rad,
        }
    }

    /// Unit vector pointing along the car's heading.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.yaw_rad.cos(), self.yaw_rad.sin())
    }
}

impl ConeColour {
    /// The raw code used for this colour on the wire.
    pub fn code(&self) -> u8 {
        match self {
            ConeColour::Yellow => 0,
            ConeColour::Blue => 1,
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, ConeColour::Blue)
    }
}

impl TryFrom<u8> for ConeColour {
    type Error = ConeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ConeColour::Yellow),
            1 => Ok(ConeColour::Blue),
            c => Err(ConeError::UnknownColour(c)),
        }
    }
}

impl TryFrom<ConeFrame> for Cone {
    type Error = ConeError;

    fn try_from(frame: ConeFrame) -> Result<Self, Self::Error> {
        Cone::from_raw(frame.x, frame.y, frame.color)
    }
}

impl From<Cone> for ConeFrame {
    fn from(cone: Cone) -> Self {
        Self {
            x: cone.position_m.x,
            y: cone.position_m.y,
            color: cone.colour.code(),
        }
    }
}

impl From<CarPoseFrame> for CarPose {
    fn from(frame: CarPoseFrame) -> Self {
        CarPose::new(frame.x, frame.y, frame.yaw)
    }
}

impl From<CarPose> for CarPoseFrame {
    fn from(pose: CarPose) -> Self {
        Self {
            x: pose.position_m.x,
            y: pose.position_m.y,
            yaw: pose.yaw_rad,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_colour_codes() {
        assert_eq!(ConeColour::try_from(0).unwrap(), ConeColour::Yellow);
        assert_eq!(ConeColour::try_from(1).unwrap(), ConeColour::Blue);
        assert!(matches!(
            ConeColour::try_from(2),
            Err(ConeError::UnknownColour(2))
        ));

        assert!(ConeColour::Blue.is_left());
        assert!(!ConeColour::Yellow.is_left());
    }

    #[test]
    fn test_cone_wire_format() {
        let cone: Cone = serde_json::from_str(r#"{"x": 1.0, "y": 3.0, "color": 1}"#).unwrap();
        assert_eq!(cone, Cone::new(1.0, 3.0, ConeColour::Blue));

        // Unknown colours are rejected while parsing, not silently dropped
        let err = serde_json::from_str::<Cone>(r#"{"x": 1.0, "y": 3.0, "color": 7}"#).unwrap_err();
        assert!(err.to_string().contains("Unknown cone colour code 7"));

        let json = serde_json::to_string(&Cone::new(4.0, 2.0, ConeColour::Yellow)).unwrap();
        assert_eq!(json, r#"{"x":4.0,"y":2.0,"color":0}"#);
    }

    #[test]
    fn test_car_pose_forward() {
        let pose: CarPose = serde_json::from_str(r#"{"x": 0.5, "y": 1.0, "yaw": 0.0}"#).unwrap();
        assert_eq!(pose.position_m, Vector2::new(0.5, 1.0));
        assert!((pose.forward() - Vector2::new(1.0, 0.0)).norm() < 1e-12);
    }
}
