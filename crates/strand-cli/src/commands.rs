//! CLI command implementations.

use std::time::{Duration, Instant};

use strand_bench::metrics::BenchmarkMetrics;
use strand_bench::runner::BenchmarkRunner;
use strand_bench::scenarios::{Scenario, ScenarioKind};
use strand_debug::snapshot::CableSnapshot;
use strand_scheduler::FixedStepScheduler;
use strand_solver::{CableFrame, SharedCable};
use strand_telemetry::{EventBus, TracingSink};
use strand_types::CableId;
use tracing::info;

use crate::scene::Scene;

/// How long `simulate` runs.
#[derive(Debug, Clone, Copy)]
pub enum RunLength {
    /// Fixed ticks on the calling thread.
    Ticks { count: u64, dt: f32 },
    /// Real time on the background scheduler.
    WallClock(f64),
}

/// Run a simulation from a scene file.
pub fn simulate(
    config_path: &str,
    run: RunLength,
    snapshot_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Strand Simulation");
    println!("─────────────────");
    println!("Config: {config_path}");
    println!();

    let scene = Scene::load(config_path)?;
    let cable = scene.build_cable()?;
    println!(
        "Cable: {} nodes, {:.3}m spacing, {} passes",
        cable.node_count(),
        scene.cable.node_distance,
        scene.cable.solver_iterations,
    );
    println!("Obstacles: {} spheres, {} boxes", scene.spheres.len(), scene.boxes.len());
    println!("Virtual points: {}", scene.virtual_points.len());
    println!();

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    let shared = SharedCable::new(CableId(0), cable).with_events(bus.sender());
    let handle = shared.handle();

    let started = Instant::now();
    match run {
        RunLength::Ticks { count, dt } => {
            println!("Running {count} ticks of {dt}s");
            let mut shared = shared;
            for _ in 0..count {
                shared.tick(dt);
            }
            bus.flush();
        }
        RunLength::WallClock(seconds) => {
            println!(
                "Running {seconds}s at {} Hz x {} sub-steps",
                scene.scheduler.target_tick_frequency, scene.scheduler.sub_step_count,
            );
            let mut scheduler =
                FixedStepScheduler::new(scene.scheduler.clone())?.with_events(bus.sender());
            scheduler.register(Box::new(shared));
            scheduler.start()?;

            let deadline = started + Duration::from_secs_f64(seconds.max(0.0));
            while Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(50));
                bus.flush();
            }
            scheduler.stop()?;
            bus.flush();

            println!(
                "Scheduler: {} cycles, {} ticks, {} overruns",
                scheduler.cycle_count(),
                scheduler.tick_count(),
                scheduler.overrun_count(),
            );
        }
    }
    bus.shutdown();
    let wall = started.elapsed().as_secs_f64();

    let frame = handle.frame();
    print_frame(&frame);
    println!("Wall time:     {wall:.3}s");
    info!(ticks = frame.tick, wall_time = wall, "simulation finished");

    if let Some(path) = snapshot_path {
        let snapshot = CableSnapshot::from_frame(&frame);
        snapshot.save(path)?;
        println!("Snapshot written to: {path}");
    }

    Ok(())
}

fn print_frame(frame: &CableFrame) {
    println!();
    println!("Ticks:         {}", frame.tick);
    println!("Sim time:      {:.4}s", frame.sim_time);
    println!("Max stretch:   {:.4}", frame.result.max_stretch);
    println!("Spacing error: {:.4}", frame.result.max_spacing_error);
    println!("Colliding:     {} nodes", frame.result.collided_nodes);
    println!("Locality:      {} nodes", frame.neighbours.len());
    if let (Some(first), Some(last)) = (frame.positions.first(), frame.positions.last()) {
        println!("Head:          [{:.4}, {:.4}, {:.4}]", first.x, first.y, first.z);
        println!("Tail:          [{:.4}, {:.4}, {:.4}]", last.x, last.y, last.z);
    }
    for fb in &frame.feedback {
        println!(
            "VP {:>3} @ {:>3}: [{:.4}, {:.4}, {:.4}] |v| = {:.4}",
            fb.id.0,
            fb.node_index,
            fb.actual_position.x,
            fb.actual_position.y,
            fb.actual_position.z,
            fb.velocity.length(),
        );
    }
}

/// Run benchmark suite.
pub fn benchmark(
    scenario_name: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Strand Benchmark Suite");
    println!("══════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
                eprintln!("Unknown scenario: {scenario_name}");
                eprintln!("Available: {}, all", available.join(", "));
                return Err("Unknown scenario".into());
            }
        }
    };

    let mut all_metrics = Vec::new();

    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind);

        println!(
            "Running: {} ({} nodes, {} obstacles, {} steps)",
            kind.name(),
            scenario.config.node_count,
            scenario.spheres.len() + scenario.boxes.len(),
            scenario.timesteps,
        );

        let metrics = BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Spacing error: {:.4}", metrics.final_spacing_error);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Max displace:  {:.4}m", metrics.max_displacement);
        if let Some(clearance) = metrics.min_sphere_clearance {
            println!("  Min clearance: {clearance:.5}m");
        }
        println!();

        all_metrics.push(metrics);
    }

    if let Some(path) = output_path {
        let csv = BenchmarkMetrics::to_csv(&all_metrics);
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
    }

    Ok(())
}

/// Inspect a state snapshot.
pub fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Strand Snapshot Inspector");
    println!("─────────────────────────");
    println!();

    let snapshot = CableSnapshot::load(path).map_err(|e| format!("Failed to read snapshot: {e}"))?;

    println!("Timestep:     {}", snapshot.timestep);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!("Nodes:        {}", snapshot.node_count);

    let current = snapshot.current();
    if !current.is_empty() {
        let min_y = current.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = current.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        println!("Y range:      [{min_y:.4}, {max_y:.4}]");

        let length: f32 = current.windows(2).map(|w| w[0].distance(w[1])).sum();
        println!("Length:       {length:.4}m");

        let max_step = snapshot
            .displacements()
            .iter()
            .map(|d| d.length())
            .fold(0.0f32, f32::max);
        println!("Max step:     {max_step:.6}m");
    }

    Ok(())
}

/// Validate a scene file.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Strand Validator");
    println!("────────────────");
    println!();

    if !path.ends_with(".toml") {
        println!("Unsupported file format. Use .toml (scene).");
        return Ok(());
    }

    println!("Validating scene: {path}");
    let content = std::fs::read_to_string(path)?;
    let scene = Scene::from_toml(&content)?;
    match scene.validate() {
        Ok(()) => println!(
            "✅ Scene is valid ({} nodes, {} obstacles, {} virtual points).",
            scene.cable.node_count,
            scene.spheres.len() + scene.boxes.len(),
            scene.virtual_points.len(),
        ),
        Err(e) => println!("❌ Scene validation failed: {e}"),
    }

    Ok(())
}
