//! # Track interface crate.
//!
//! Provides the common interface types shared between the path planner and anything feeding it
//! with cone observations: cones, the car pose, and the named scenario fixtures.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Cone and car pose definitions, plus their wire (JSON) representation
pub mod cone;

/// Named scenario fixtures used to exercise the planner
pub mod scenario;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use cone::{CarPose, Cone, ConeColour, ConeError};
pub use scenario::{Scenario, ScenarioError};
