//! Benchmark runner — drives a cable through a scenario and collects metrics.

use std::sync::Arc;
use std::time::Instant;

use strand_debug::InspectionHook;
use strand_solver::Cable;
use strand_types::StrandResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario.
    pub fn run(scenario: &Scenario) -> StrandResult<BenchmarkMetrics> {
        Self::run_inner(scenario, None)
    }

    /// Run a single scenario, reporting every tick and pass to `hook`.
    pub fn run_with_hook(
        scenario: &Scenario,
        hook: &mut dyn InspectionHook,
    ) -> StrandResult<BenchmarkMetrics> {
        Self::run_inner(scenario, Some(hook))
    }

    fn run_inner(
        scenario: &Scenario,
        mut hook: Option<&mut dyn InspectionHook>,
    ) -> StrandResult<BenchmarkMetrics> {
        scenario.validate()?;

        let mut cable = Cable::new(scenario.config.clone(), scenario.anchor)?;
        if let Some(end) = scenario.end_anchor {
            cable.set_end_anchor(end);
        }
        let colliders = Arc::new(scenario.colliders()?);
        cable.set_colliders(Arc::clone(&colliders));
        let thickness = scenario.config.cable_thickness;

        // Save initial positions for displacement tracking
        let initial = cable.positions().to_vec();

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut total_passes: u64 = 0;
        let mut total_collisions: u64 = 0;
        let mut max_spacing_error = 0.0f32;
        let mut final_spacing_error = 0.0f32;
        let mut min_clearance: Option<f32> = None;
        let mut sim_time = 0.0f64;

        let total_start = Instant::now();

        for _ in 0..scenario.timesteps {
            let timestep = cable.tick_count();
            let result = match hook.as_deref_mut() {
                Some(h) => {
                    h.on_tick_begin(timestep, sim_time, scenario.dt);
                    let result = cable
                        .tick_observed(scenario.dt, |pass, stretch| h.on_pass(timestep, pass, stretch));
                    h.on_tick_end(timestep, &result);
                    result
                }
                None => cable.tick(scenario.dt),
            };
            sim_time += scenario.dt as f64;

            step_times.push(result.wall_time);
            total_passes += result.passes as u64;
            total_collisions += result.collided_nodes as u64;
            max_spacing_error = max_spacing_error.max(result.max_spacing_error);
            final_spacing_error = result.max_spacing_error;

            for p in &cable.positions()[1..] {
                if let Some(c) = colliders.min_sphere_clearance(*p, thickness) {
                    min_clearance = Some(min_clearance.map_or(c, |m| m.min(c)));
                }
            }
        }

        if let Some(h) = hook {
            h.on_simulation_end();
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();

        // Compute final metrics
        let final_ke = cable.kinetic_energy(scenario.dt);

        let max_displacement = cable
            .positions()
            .iter()
            .zip(&initial)
            .map(|(p, p0)| p.distance(*p0))
            .fold(0.0f32, f32::max);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);
        let avg_passes = if scenario.timesteps > 0 {
            total_passes as f32 / scenario.timesteps as f32
        } else {
            0.0
        };

        Ok(BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            node_count: cable.node_count(),
            timesteps: scenario.timesteps,
            total_wall_time,
            avg_step_time: avg_step,
            min_step_time: min_step,
            max_step_time: max_step,
            avg_passes,
            final_spacing_error,
            max_spacing_error,
            final_kinetic_energy: final_ke,
            max_displacement,
            total_collisions,
            min_sphere_clearance: min_clearance,
        })
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> StrandResult<Vec<BenchmarkMetrics>> {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            let scenario = Scenario::from_kind(kind);
            results.push(Self::run(&scenario)?);
        }
        Ok(results)
    }
}
