//! Path planning executable entry point.
//!
//! Plans a path for one or more scenarios, either built in fixtures or scenario files, and saves
//! the resulting paths and planning reports into the session directory so they can be plotted.
//!
//! # Usage
//!
//! ```text
//! path_exec [--params <file>] scenario <name>
//! path_exec [--params <file>] all
//! path_exec [--params <file>] file <path>
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, error, info};
use structopt::StructOpt;

// Internal
use path_lib::plan::{PathPlanner, PathPlannerParams};
use track_if::scenario::{Scenario, ScenarioCmd};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "path_exec", about = "Plans paths between rows of track cones")]
struct Opt {
    /// Planner parameter file, relative to the params directory
    #[structopt(long, default_value = "path_planner.toml")]
    params: String,

    #[structopt(subcommand)]
    cmd: ScenarioCmd,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("path_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Cone Path Planner\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: PathPlannerParams =
        util::params::load(&opt.params).wrap_err("Could not load path planner params")?;

    info!("Path planner parameters loaded");

    let planner = PathPlanner::new(params).wrap_err("Failed to initialise the path planner")?;

    debug!("Path planner parameters: {:?}", planner.params());

    // ---- LOAD SCENARIOS ----

    let scenarios = Scenario::from_cmd(&opt.cmd).wrap_err("Failed to load scenarios")?;

    info!("Loaded {} scenario(s)", scenarios.len());

    // ---- PLAN ----

    let mut num_failed = 0;

    for scenario in scenarios {
        match planner.plan_with_report(&scenario.car, &scenario.cones) {
            Ok((path, report)) => {
                info!(
                    "Scenario {}: {} points, {:.3} m, {} pairs, {} corrections",
                    scenario.name,
                    path.get_num_points(),
                    report.length_m,
                    report.matching.pairs.len(),
                    report.num_corrections
                );

                session.save(format!("paths/{}.json", scenario.name), path);
                session.save(format!("reports/{}.json", scenario.name), report);
                session.save(format!("scenarios/{}.json", scenario.name), scenario);
            }
            Err(e) => {
                error!("Scenario {}: planning failed: {}", scenario.name, e);
                num_failed += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    session.exit();

    match num_failed {
        0 => Ok(()),
        n => Err(eyre!("Planning failed for {} scenario(s)", n)),
    }
}
