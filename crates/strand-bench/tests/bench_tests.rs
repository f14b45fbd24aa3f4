//! Integration tests for strand-bench.

use strand_bench::metrics::BenchmarkMetrics;
use strand_bench::runner::BenchmarkRunner;
use strand_bench::scenarios::{Scenario, ScenarioKind};
use strand_debug::InspectionHook;
use strand_solver::TickResult;

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn hanging_cable_setup() {
    let s = Scenario::hanging_cable();
    assert_eq!(s.kind, ScenarioKind::HangingCable);
    assert_eq!(s.config.node_count, 10);
    assert_eq!(s.timesteps, 100);
    assert!((s.dt - 0.02).abs() < 1e-9);
    assert!(s.colliders().unwrap().is_empty());
}

#[test]
fn drape_setups_have_obstacles() {
    assert_eq!(Scenario::sphere_drape().colliders().unwrap().spheres().len(), 1);
    assert_eq!(Scenario::box_drape().colliders().unwrap().boxes().len(), 1);
}

#[test]
fn bridge_pins_both_ends() {
    let s = Scenario::bridge();
    assert!(s.config.end_handle_enabled);
    assert!(s.end_anchor.is_some());
}

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 4);
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
        assert!(Scenario::from_kind(kind).validate().is_ok());
    }
    assert_eq!(ScenarioKind::from_name("nope"), None);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn run_hanging_cable() {
    let scenario = Scenario::hanging_cable();
    let metrics = BenchmarkRunner::run(&scenario).unwrap();

    assert_eq!(metrics.scenario, "hanging_cable");
    assert_eq!(metrics.timesteps, 100);
    assert_eq!(metrics.node_count, 10);
    assert!((metrics.avg_passes - 10.0).abs() < 1e-6);
    assert!(metrics.final_spacing_error <= 0.05);
    assert_eq!(metrics.total_collisions, 0);
    assert!(metrics.min_sphere_clearance.is_none());
}

#[test]
fn run_sphere_drape() {
    let scenario = Scenario::sphere_drape();
    let metrics = BenchmarkRunner::run(&scenario).unwrap();

    assert!(metrics.total_collisions > 0);
    let clearance = metrics.min_sphere_clearance.unwrap();
    assert!(clearance >= -1e-4, "node inside sphere by {clearance}");
    assert!(metrics.max_displacement > 0.0);
}

#[test]
fn run_bridge_holds_ends() {
    let mut scenario = Scenario::bridge();
    scenario.timesteps = 20;
    let metrics = BenchmarkRunner::run(&scenario).unwrap();
    assert_eq!(metrics.scenario, "bridge");
    assert!(metrics.max_displacement > 0.0);
}

#[test]
fn run_all_scenarios() {
    for &kind in ScenarioKind::all() {
        let mut scenario = Scenario::from_kind(kind);
        scenario.timesteps = 3;
        let metrics = BenchmarkRunner::run(&scenario).unwrap();
        assert_eq!(metrics.scenario, kind.name());
        assert!(metrics.total_wall_time >= 0.0);
    }
}

#[derive(Default)]
struct CountingHook {
    ticks: u32,
    passes: u32,
    ended: bool,
}

impl InspectionHook for CountingHook {
    fn on_pass(&mut self, _timestep: u64, _pass: u32, _max_stretch: f32) {
        self.passes += 1;
    }

    fn on_tick_end(&mut self, _timestep: u64, _result: &TickResult) {
        self.ticks += 1;
    }

    fn on_simulation_end(&mut self) {
        self.ended = true;
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn runner_calls_hook() {
    let mut scenario = Scenario::hanging_cable();
    scenario.timesteps = 7;
    let mut hook = CountingHook::default();

    BenchmarkRunner::run_with_hook(&scenario, &mut hook).unwrap();

    assert_eq!(hook.ticks, 7);
    assert_eq!(hook.passes, 70);
    assert!(hook.ended);
}

// ─── Metrics Tests ────────────────────────────────────────────

fn sample_metrics(scenario: &str) -> BenchmarkMetrics {
    BenchmarkMetrics {
        scenario: scenario.into(),
        node_count: 30,
        timesteps: 100,
        total_wall_time: 1.5,
        avg_step_time: 0.015,
        min_step_time: 0.01,
        max_step_time: 0.02,
        avg_passes: 10.0,
        final_spacing_error: 0.01,
        max_spacing_error: 0.03,
        final_kinetic_energy: 1e-5,
        max_displacement: 0.5,
        total_collisions: 412,
        min_sphere_clearance: None,
    }
}

#[test]
fn metrics_csv_output() {
    let csv_row = sample_metrics("test").to_csv_row();
    assert!(csv_row.contains("test"));
    assert!(csv_row.contains("412"));
    // Missing clearance leaves the last column empty.
    assert!(csv_row.ends_with(','));
}

#[test]
fn metrics_csv_multi() {
    let csv = BenchmarkMetrics::to_csv(&[sample_metrics("a"), sample_metrics("b")]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3); // Header + 2 data rows
    assert!(lines[0].starts_with("scenario"));
    let columns = lines[0].split(',').count();
    assert!(lines[1..].iter().all(|l| l.split(',').count() == columns));
}

#[test]
fn metrics_json_round_trip() {
    let mut metrics = sample_metrics("test");
    metrics.min_sphere_clearance = Some(0.002);
    let json = serde_json::to_string(&metrics).unwrap();
    let recovered: BenchmarkMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.timesteps, 100);
    assert_eq!(recovered.min_sphere_clearance, Some(0.002));
}
