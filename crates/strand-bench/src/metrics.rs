//! Benchmark metrics — data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Node count.
    pub node_count: usize,
    /// Number of ticks executed.
    pub timesteps: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per tick (seconds).
    pub avg_step_time: f64,
    /// Minimum tick time.
    pub min_step_time: f64,
    /// Maximum tick time.
    pub max_step_time: f64,
    /// Average constraint passes per tick.
    pub avg_passes: f32,
    /// Largest relative spacing error after the final tick.
    pub final_spacing_error: f32,
    /// Largest relative spacing error seen after any tick.
    pub max_spacing_error: f32,
    /// Final kinetic energy (should approach zero once the cable settles).
    pub final_kinetic_energy: f64,
    /// Maximum node displacement from its initial position.
    pub max_displacement: f32,
    /// Sum over ticks of nodes corrected by an obstacle.
    pub total_collisions: u64,
    /// Smallest sphere clearance of any free node after any tick.
    /// `None` when the scenario has no spheres.
    pub min_sphere_clearance: Option<f32>,
}

impl BenchmarkMetrics {
    /// Format as a CSV row (header + data).
    pub fn to_csv_header() -> String {
        "scenario,node_count,timesteps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,avg_passes,final_spacing_error,max_spacing_error,final_ke,max_displacement,total_collisions,min_sphere_clearance".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        let clearance = self
            .min_sphere_clearance
            .map(|c| format!("{c:.6}"))
            .unwrap_or_default();
        format!(
            "{},{},{},{:.6},{:.4},{:.4},{:.4},{:.1},{:.6},{:.6},{:.6e},{:.6},{},{}",
            self.scenario,
            self.node_count,
            self.timesteps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.avg_passes,
            self.final_spacing_error,
            self.max_spacing_error,
            self.final_kinetic_energy,
            self.max_displacement,
            self.total_collisions,
            clearance,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
