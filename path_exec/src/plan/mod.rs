//! # Path Planner
//!
//! Plans a drivable path between two rows of cones, the left row marked by blue cones and the
//! right row by yellow cones.
//!
//! Planning runs as a pipeline of stages, each in its own module:
//!
//! 1. [`side`] - split the cones into left and right.
//! 2. [`chain_sort`] - order each side front-to-back from the vehicle.
//! 3. [`matcher`] - pair left cones with right cones into gates.
//! 4. [`midline`] - place waypoints at the gate midpoints.
//! 5. [`extender`] - continue the path alongside cones seen on one side only.
//! 6. [`corrector`] - re-order the waypoints and push the path clear of cones it passes on the
//!    wrong side of.
//! 7. [`waypoint::assign_headings`] then [`sampler`] - head each waypoint at its successor and
//!    walk the result at a fixed step up to the distance budget.
//!
//! The planner is stateless, every call to [`PathPlanner::plan`] depends only on its arguments.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod chain_sort;
pub mod corrector;
pub mod extender;
pub mod matcher;
pub mod midline;
pub mod sampler;
pub mod side;
pub mod waypoint;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use track_if::{CarPose, Cone};

use crate::path::{Path, PathError};

use chain_sort::{chain_sort, SortMode};
use corrector::correct_boundaries;
use extender::extend_single_side;
use matcher::{match_cones, Matching};
use midline::build_midline;
use side::{split_sides, Sides};
use waypoint::{assign_headings, TerminalHeading, Waypoint, WaypointPose, WaypointSource};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PathPlanner {
    params: PathPlannerParams,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PathPlannerParams {
    /// Distance between consecutive samples along the path
    pub step_m: f64,

    /// Maximum length of the path, as driven from the vehicle
    pub max_dist_m: f64,

    /// Maximum separation allowed between consecutive path points
    pub max_point_sep_m: f64,

    /// Distance kept from a cone when placing single side and corrective waypoints
    pub lateral_offset_m: f64,

    /// If true only cones in front of the vehicle are used to build the path
    pub front_only: bool,
}

/// Intermediate products of a single planning call.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// Cones of each side in chain order
    pub sides: Sides,

    pub matching: Matching,

    /// Waypoints before boundary correction, in construction order
    pub waypoints: Vec<Waypoint>,

    /// Final headed waypoints which were sampled into the path
    pub corrected: Vec<WaypointPose>,

    pub num_corrections: usize,

    pub terminal: TerminalHeading,

    pub length_m: f64,

    pub num_points: usize,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid path planner parameters: {0}")]
    InvalidParams(String),

    #[error("The {0} passed to the planner is not finite")]
    NonFiniteInput(String),

    #[error("The planned path does not meet its constraints: {0}")]
    OutputConstraint(#[from] PathError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for PathPlannerParams {
    fn default() -> Self {
        Self {
            step_m: 0.1,
            max_dist_m: 10.0,
            max_point_sep_m: 0.5,
            lateral_offset_m: 0.75,
            front_only: true,
        }
    }
}

impl PathPlannerParams {
    /// Check the parameters describe a plannable path.
    pub fn validate(&self) -> Result<(), PlanError> {
        let positive = [
            ("step_m", self.step_m),
            ("max_dist_m", self.max_dist_m),
            ("max_point_sep_m", self.max_point_sep_m),
            ("lateral_offset_m", self.lateral_offset_m),
        ];

        if let Some((name, value)) = positive
            .iter()
            .find(|(_, v)| !(v.is_finite() && *v > 0.0))
        {
            return Err(PlanError::InvalidParams(format!(
                "{} must be positive and finite, got {}",
                name, value
            )));
        }

        if self.step_m > self.max_point_sep_m {
            return Err(PlanError::InvalidParams(format!(
                "step_m ({}) is larger than max_point_sep_m ({})",
                self.step_m, self.max_point_sep_m
            )));
        }

        Ok(())
    }
}

impl PathPlanner {
    pub fn new(params: PathPlannerParams) -> Result<Self, PlanError> {
        params.validate()?;

        Ok(Self { params })
    }

    pub fn params(&self) -> &PathPlannerParams {
        &self.params
    }

    /// Plan a path from the vehicle pose between the given cones.
    pub fn plan(&self, pose: &CarPose, cones: &[Cone]) -> Result<Path, PlanError> {
        self.plan_with_report(pose, cones).map(|(path, _)| path)
    }

    /// Plan a path, also returning the intermediate products of each stage.
    pub fn plan_with_report(
        &self,
        pose: &CarPose,
        cones: &[Cone],
    ) -> Result<(Path, PlanReport), PlanError> {
        check_input(pose, cones)?;

        let vehicle_m = pose.position_m;
        let yaw_rad = pose.yaw_rad;

        debug!(
            "Planning from ({:.3}, {:.3}, {:.3}) with {} cones",
            vehicle_m.x,
            vehicle_m.y,
            yaw_rad,
            cones.len()
        );

        // ---- SORT ----

        let mode = match self.params.front_only {
            true => SortMode::FrontOnly,
            false => SortMode::All,
        };

        let sides = split_sides(cones);
        let sides = Sides {
            left: chain_sort(&sides.left, &vehicle_m, yaw_rad, mode),
            right: chain_sort(&sides.right, &vehicle_m, yaw_rad, mode),
        };

        trace!(
            "Sorted {} left and {} right cones",
            sides.left.len(),
            sides.right.len()
        );

        // ---- MATCH ----

        let matching = match_cones(&sides.left, &sides.right);

        debug!(
            "Matched {} pairs, {} left and {} right leftovers",
            matching.pairs.len(),
            matching.left_leftover.len(),
            matching.right_leftover.len()
        );

        // ---- WAYPOINTS ----

        let midline = build_midline(&matching.pairs, &vehicle_m, !matching.has_leftovers());

        let leftovers: Vec<Cone> = matching
            .left_leftover
            .iter()
            .chain(matching.right_leftover.iter())
            .copied()
            .collect();

        let mut waypoints = midline.waypoints.clone();
        waypoints.extend(extend_single_side(
            &midline.waypoints,
            &leftovers,
            &vehicle_m,
            yaw_rad,
            self.params.lateral_offset_m,
        ));

        // ---- CORRECT ----

        let corrected = correct_boundaries(
            &waypoints,
            cones,
            &vehicle_m,
            yaw_rad,
            self.params.lateral_offset_m,
        );
        let num_corrections = corrected
            .iter()
            .filter(|w| w.source == WaypointSource::Correction)
            .count();

        if num_corrections > 0 {
            debug!("Inserted {} boundary corrections", num_corrections);
        }

        let corrected = assign_headings(&corrected, midline.terminal, yaw_rad);

        // ---- SAMPLE ----

        let path = sampler::sample(
            &corrected,
            &vehicle_m,
            self.params.step_m,
            self.params.max_dist_m,
        );

        path.check_constraints(
            &vehicle_m,
            self.params.max_dist_m,
            self.params.max_point_sep_m,
        )?;

        let length_m = path.length_from(&vehicle_m);

        debug!(
            "Planned path of {} points, {:.3} m long",
            path.get_num_points(),
            length_m
        );

        let report = PlanReport {
            sides,
            matching,
            waypoints,
            corrected,
            num_corrections,
            terminal: midline.terminal,
            length_m,
            num_points: path.get_num_points(),
        };

        Ok((path, report))
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_input(pose: &CarPose, cones: &[Cone]) -> Result<(), PlanError> {
    if !(pose.position_m.iter().all(|v| v.is_finite()) && pose.yaw_rad.is_finite()) {
        return Err(PlanError::NonFiniteInput("car pose".into()));
    }

    if let Some(i) = cones
        .iter()
        .position(|c| !c.position_m.iter().all(|v| v.is_finite()))
    {
        return Err(PlanError::NonFiniteInput(format!("position of cone {}", i)));
    }

    Ok(())
}
