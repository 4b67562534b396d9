//! # Path Planner Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use path_lib::plan::{PathPlanner, PathPlannerParams};
use track_if::scenario::{make_scenario, scenario_names, Scenario};

fn path_planner_benchmark(c: &mut Criterion) {
    // ---- Build the planner and scenarios ----

    let planner = PathPlanner::new(PathPlannerParams::default()).unwrap();

    let scenarios: Vec<Scenario> = scenario_names()
        .iter()
        .map(|n| make_scenario(n).unwrap())
        .collect();

    // ---- Benchmarks ----

    c.bench_function("plan_all_scenarios", |b| {
        b.iter(|| {
            for s in scenarios.iter() {
                black_box(planner.plan(&s.car, &s.cones).unwrap());
            }
        })
    });

    // The five cone chicane exercises matching, extension and correction together
    let chicane = make_scenario("35").unwrap();
    c.bench_function("plan_chicane", |b| {
        b.iter(|| planner.plan_with_report(black_box(&chicane.car), black_box(&chicane.cones)))
    });
}

criterion_group!(benches, path_planner_benchmark);
criterion_main!(benches);
