//! Hardware target and pricing for one estimation.

use serde::{Deserialize, Serialize};

use crate::units::GpuSpec;

/// Throughput assumed when the caller has no measured figure.
pub const DEFAULT_TOKENS_PER_SECOND_PER_GPU: f64 = 3000.0;

/// Cluster the plan runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// Device memory per GPU in GB
    pub memory_per_gpu: f64,
    /// GPU count
    pub num_gpus: u64,
    /// USD per GPU-hour
    pub cost_per_gpu_hour: f64,
    /// Sustained training throughput per GPU
    pub tokens_per_second_per_gpu: f64,
    /// Grid carbon intensity in gCO2/kWh
    pub grid_carbon_intensity: f64,
    /// Power draw per GPU in watts
    pub power_draw_watts: f64,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            memory_per_gpu: 80.0,
            num_gpus: 8,
            cost_per_gpu_hour: 4.00,
            tokens_per_second_per_gpu: DEFAULT_TOKENS_PER_SECOND_PER_GPU,
            grid_carbon_intensity: 386.0,
            power_draw_watts: 700.0,
        }
    }
}

impl HardwareConfig {
    /// Take capacity, power and price from a catalog entry.
    pub fn from_gpu(gpu: &GpuSpec, num_gpus: u64) -> Self {
        Self {
            memory_per_gpu: gpu.memory_gb,
            num_gpus,
            cost_per_gpu_hour: gpu.hourly_rate,
            power_draw_watts: gpu.power_watts,
            ..Self::default()
        }
    }

    /// Set sustained throughput.
    #[must_use]
    pub fn with_throughput(mut self, tokens_per_second_per_gpu: f64) -> Self {
        self.tokens_per_second_per_gpu = tokens_per_second_per_gpu;
        self
    }

    /// Set grid carbon intensity.
    #[must_use]
    pub fn with_carbon_intensity(mut self, grams_co2_per_kwh: f64) -> Self {
        self.grid_carbon_intensity = grams_co2_per_kwh;
        self
    }

    /// Set GPU count.
    #[must_use]
    pub fn with_gpus(mut self, num_gpus: u64) -> Self {
        self.num_gpus = num_gpus;
        self
    }

    /// Aggregate device memory across the cluster, in GB.
    #[must_use]
    pub fn total_memory_gb(&self) -> f64 {
        self.memory_per_gpu * self.num_gpus as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::GpuCatalog;

    #[test]
    fn test_from_gpu_copies_catalog_values() {
        let catalog = GpuCatalog::new();
        let a100 = catalog.get("a100-40-sxm").unwrap();
        let hw = HardwareConfig::from_gpu(a100, 4);

        assert!((hw.memory_per_gpu - 40.0).abs() < f64::EPSILON);
        assert!((hw.power_draw_watts - 400.0).abs() < f64::EPSILON);
        assert!((hw.cost_per_gpu_hour - 2.00).abs() < f64::EPSILON);
        assert_eq!(hw.num_gpus, 4);
        assert!((hw.tokens_per_second_per_gpu - DEFAULT_TOKENS_PER_SECOND_PER_GPU).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_memory() {
        let hw = HardwareConfig::default().with_gpus(16);
        assert!((hw.total_memory_gb() - 1280.0).abs() < f64::EPSILON);
    }
}
