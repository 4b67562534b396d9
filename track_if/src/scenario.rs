//! # Scenarios
//!
//! Named fixtures pairing a set of cones with a car pose, used to exercise the path planner under
//! varied cone configurations (none, one sided, two sided, asymmetric counts, curves and chicanes).
//! Scenarios can also be loaded from JSON files using the same wire format as [`Cone`] and
//! [`CarPose`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use crate::cone::{CarPose, Cone, ConeError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Raw scenario table, each entry is (name, [(x, y, colour code)], (x, y, yaw)).
#[rustfmt::skip]
const SCENARIOS: &[(&str, &[(f64, f64, u8)], (f64, f64, f64))] = &[
    ("1", &[], (0.0, 0.0, 0.0)),
    ("2", &[(1.0, 3.0, 1), (1.0, 1.0, 0)], (0.0, 0.0, 0.4)),
    ("3", &[(1.0, 3.0, 1), (3.0, 3.0, 1), (1.0, 1.0, 0), (3.0, 1.0, 0)], (0.0, 0.0, 0.8)),
    ("4", &[(4.0, 2.0, 0)], (0.0, 0.0, 1.2)),
    ("5", &[(4.0, 2.0, 0), (3.0, 2.0, 0)], (0.0, 0.0, 1.6)),
    ("6", &[(4.0, 4.0, 1), (4.0, 2.0, 0), (3.0, 2.0, 0)], (0.0, 0.0, 2.0)),
    ("7", &[(2.0, 3.0, 1), (4.0, 3.0, 1), (2.0, 2.0, 0)], (0.0, 0.0, 1.4)),
    ("8", &[(3.0, 3.0, 1), (5.0, 3.0, 1)], (0.0, 0.0, 1.8)),
    ("9", &[(3.0, 3.0, 1)], (0.0, 0.0, 0.2)),
    ("10", &[(5.0, 3.0, 1), (5.0, 2.0, 0)], (0.0, 0.0, 0.6)),
    ("11", &[(1.0, 3.0, 1), (4.0, 5.0, 1), (1.0, 2.0, 0), (4.0, 2.0, 0)], (0.0, 0.0, 1.0)),
    ("12", &[(5.0, 2.0, 0)], (0.0, 0.0, 1.4)),
    ("13", &[(5.0, 3.0, 0), (5.0, 1.0, 0)], (0.0, 0.0, 0.1)),
    ("14", &[(3.0, 5.0, 1), (3.0, 2.0, 0), (5.0, 2.0, 0)], (0.0, 0.0, 5.2)),
    ("15", &[(2.0, 5.0, 1), (3.0, 4.0, 1), (3.0, 2.0, 0)], (0.0, 0.0, 1.6)),
    ("16", &[(0.0, 3.0, 1), (2.0, 5.0, 1)], (0.0, 0.0, 0.2)),
    ("17", &[(3.0, 5.0, 1)], (0.0, 0.0, 0.6)),
    ("18", &[(2.0, 4.0, 1), (4.0, 3.0, 0)], (0.0, 0.0, 1.0)),
    ("19", &[(2.0, 3.0, 1), (5.0, 3.0, 1), (2.0, 0.0, 0), (5.0, 2.0, 0)], (0.0, 0.0, 1.4)),
    ("20", &[(0.0, 2.0, 0)], (0.0, 0.0, 1.8)),
    ("21", &[(1.0, 4.0, 1), (3.0, 4.5, 1), (5.0, 5.0, 1)], (0.0, 0.0, 0.6)),
    ("22", &[(1.0, 1.0, 0), (3.0, 1.5, 0), (5.0, 2.0, 0)], (0.0, 0.0, 1.2)),
    ("23", &[(2.0, 4.0, 1), (3.0, 5.0, 1), (4.5, 5.5, 1)], (0.0, 0.0, 1.8)),
    ("24", &[(2.0, 1.0, 0), (3.5, 1.5, 0), (5.0, 2.5, 0)], (0.0, 0.0, 2.4)),
    ("25", &[(1.0, 3.5, 1), (3.0, 4.0, 1), (5.0, 4.5, 1), (3.0, 2.0, 0)], (0.0, 0.0, 0.4)),
    ("26", &[(1.0, 2.0, 1), (2.0, 3.5, 0), (3.5, 4.0, 1), (5.0, 3.0, 0)], (0.0, 0.0, 1.0)),
    ("27", &[(1.0, 4.0, 1), (2.5, 4.8, 1), (4.0, 5.0, 1), (3.0, 3.0, 0)], (0.0, 0.0, 1.6)),
    ("28", &[(1.0, 1.5, 0), (2.0, 2.5, 1), (3.0, 3.0, 0), (4.5, 4.0, 1)], (0.0, 0.0, 2.0)),
    ("29", &[(1.0, 4.0, 0), (2.0, 5.0, 0), (3.0, 5.2, 1), (4.0, 4.5, 1)], (0.5, 1.0, 3.1)),
    ("30", &[(2.0, 1.0, 0), (3.0, 2.0, 0), (4.5, 3.5, 0), (6.0, 5.0, 0)], (0.0, 0.0, 2.6)),
    (
        "31",
        &[
            (1.0, 2.0, 1),
            (2.0, 3.0, 0),
            (3.0, 4.0, 1),
            (4.0, 4.5, 0),
            (5.0, 4.7, 1),
        ],
        (0.0, 0.0, 1.8),
    ),
    (
        "32",
        &[
            (1.0, 1.0, 0),
            (2.0, 2.5, 1),
            (3.0, 1.5, 0),
            (4.0, 3.0, 1),
            (5.0, 2.0, 0),
        ],
        (0.0, 0.0, 1.2),
    ),
    (
        "33",
        &[
            (2.0, 2.0, 1),
            (3.0, 3.0, 1),
            (4.0, 3.5, 1),
            (5.0, 3.0, 0),
            (6.0, 2.0, 0),
        ],
        (0.0, 0.0, 1.5),
    ),
    (
        "34",
        &[
            (1.0, 3.0, 1),
            (2.0, 4.0, 1),
            (4.5, 5.0, 1),
            (2.5, 2.0, 0),
            (5.5, 3.0, 0),
        ],
        (0.0, 0.0, 2.8),
    ),
    (
        "35",
        &[
            (1.0, 2.0, 1),
            (2.0, 3.5, 0),
            (3.0, 4.0, 1),
            (4.0, 3.0, 0),
            (3.5, 1.5, 1),
        ],
        (5.0, 1.0, 3.4),
    ),
];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A set of cones and the pose of the car observing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name of the scenario, for file scenarios this is the file stem
    #[serde(default)]
    pub name: String,

    pub cones: Vec<Cone>,

    pub car: CarPose,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Selects which scenarios to run.
#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
pub enum ScenarioCmd {
    /// Run a single named scenario.
    #[structopt(name = "scenario")]
    Named {
        /// The name of the scenario, e.g. "2"
        name: String,
    },

    /// Run every named scenario in order.
    #[structopt(name = "all")]
    All,

    /// Run the scenario stored in a JSON file.
    #[structopt(name = "file")]
    File {
        /// The path to the file to load
        path: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Unknown scenario '{0}'. Valid options: {1}")]
    UnknownScenario(String, String),

    #[error("Scenario '{0}' contains an invalid cone: {1}")]
    InvalidCone(String, ConeError),

    #[error("Cannot open the scenario file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the scenario file: {0}")]
    DeserialiseError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Scenario {
    /// Load a scenario from a JSON file.
    ///
    /// Cones with an unknown colour code will cause the load to fail.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let file = File::open(path.as_ref()).map_err(ScenarioError::FileLoadError)?;

        let mut scenario: Scenario = serde_json::from_reader(BufReader::new(file))
            .map_err(ScenarioError::DeserialiseError)?;

        if scenario.name.is_empty() {
            scenario.name = path
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        debug!(
            "Loaded scenario {} with {} cones from {:?}",
            scenario.name,
            scenario.cones.len(),
            path.as_ref()
        );

        Ok(scenario)
    }

    /// Resolve the command into the list of scenarios it selects.
    pub fn from_cmd(cmd: &ScenarioCmd) -> Result<Vec<Self>, ScenarioError> {
        match cmd {
            ScenarioCmd::Named { name } => Ok(vec![make_scenario(name)?]),
            ScenarioCmd::All => scenario_names().iter().map(|n| make_scenario(n)).collect(),
            ScenarioCmd::File { path } => Ok(vec![Self::load(path)?]),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Names of all built in scenarios, in numeric order.
pub fn scenario_names() -> Vec<&'static str> {
    let mut names: Vec<&str> = SCENARIOS.iter().map(|(n, _, _)| *n).collect();
    names.sort_by_key(|n| n.parse::<u32>().unwrap_or(u32::MAX));
    names
}

/// Build a fresh copy of the named scenario.
pub fn make_scenario(name: &str) -> Result<Scenario, ScenarioError> {
    let (_, cones, (x, y, yaw)) = SCENARIOS
        .iter()
        .find(|(n, _, _)| *n == name)
        .ok_or_else(|| {
            ScenarioError::UnknownScenario(name.to_string(), scenario_names().join(", "))
        })?;

    let cones = cones
        .iter()
        .map(|&(cx, cy, code)| Cone::from_raw(cx, cy, code))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScenarioError::InvalidCone(name.to_string(), e))?;

    Ok(Scenario {
        name: name.to_string(),
        cones,
        car: CarPose::new(*x, *y, *yaw),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cone::ConeColour;

    #[test]
    fn test_scenario_names() {
        let names = scenario_names();
        assert_eq!(names.len(), 35);
        assert_eq!(names[0], "1");
        assert_eq!(names[9], "10");
        assert_eq!(names[34], "35");
    }

    #[test]
    fn test_make_scenario() {
        let s = make_scenario("2").unwrap();
        assert_eq!(s.name, "2");
        assert_eq!(
            s.cones,
            vec![
                Cone::new(1.0, 3.0, ConeColour::Blue),
                Cone::new(1.0, 1.0, ConeColour::Yellow)
            ]
        );
        assert_eq!(s.car, CarPose::new(0.0, 0.0, 0.4));

        assert!(make_scenario("1").unwrap().cones.is_empty());
    }

    #[test]
    fn test_unknown_scenario() {
        let err = make_scenario("99").unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScenario(ref n, _) if n == "99"));
        assert!(err.to_string().contains("Valid options: 1, 2, 3"));
    }

    #[test]
    fn test_all_scenarios_build() {
        let all = Scenario::from_cmd(&ScenarioCmd::All).unwrap();
        assert_eq!(all.len(), 35);
        assert!(all.iter().all(|s| s.cones.len() <= 5));
    }

    #[test]
    fn test_load_scenario_file() {
        let dir = std::env::temp_dir();

        let good = dir.join("track_if_test_scenario.json");
        std::fs::write(
            &good,
            r#"{"cones": [{"x": 4.0, "y": 2.0, "color": 0}], "car": {"x": 0.0, "y": 0.0, "yaw": 1.2}}"#,
        )
        .unwrap();
        let s = Scenario::load(&good).unwrap();
        assert_eq!(s.name, "track_if_test_scenario");
        assert_eq!(s, Scenario { name: s.name.clone(), ..make_scenario("4").unwrap() });

        let bad = dir.join("track_if_test_bad_colour.json");
        std::fs::write(
            &bad,
            r#"{"cones": [{"x": 4.0, "y": 2.0, "color": 3}], "car": {"x": 0.0, "y": 0.0, "yaw": 1.2}}"#,
        )
        .unwrap();
        assert!(matches!(
            Scenario::load(&bad),
            Err(ScenarioError::DeserialiseError(_))
        ));
    }
}
