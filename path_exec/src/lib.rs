//! # Path Library
//!
//! Plans drivable paths between rows of track cones. See [`plan`] for the planner itself and
//! [`path`] for the path it produces.

pub mod path;
pub mod plan;
