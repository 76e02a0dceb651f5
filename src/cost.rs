//! Training time, energy, carbon and cloud cost (CostEnergyEstimator).
//!
//! ```text
//! steps      = ceil(tokens / (global_batch × sequence))
//! hours      = tokens / (tokens_per_second_per_gpu × gpus) / 3600
//! gpu_hours  = hours × gpus
//! energy_kwh = power_draw_watts × gpus × hours / 1000
//! carbon_kg  = energy_kwh × gCO2_per_kWh / 1000
//! cost_usd   = hours × gpus × cost_per_gpu_hour
//! ```

use serde::{Deserialize, Serialize};

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::hardware::HardwareConfig;
use crate::params::ParameterCount;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// How many tokens the run trains on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingBudget {
    /// Compute-optimal: `chinchilla_tokens_per_param × total parameters`
    #[default]
    Chinchilla,
    /// Fixed token count
    Tokens(u64),
    /// Fixed optimizer steps over the global batch
    Steps(u64),
}

impl TrainingBudget {
    /// Tokens consumed by this budget.
    #[must_use]
    pub fn tokens(
        &self,
        params: &ParameterCount,
        arch: &ArchitectureSpec,
        calibration: &Calibration,
    ) -> u64 {
        match *self {
            Self::Chinchilla => {
                (params.total as f64 * calibration.chinchilla_tokens_per_param).round() as u64
            }
            Self::Tokens(tokens) => tokens,
            Self::Steps(steps) => steps.saturating_mul(arch.tokens_per_step()),
        }
    }
}

/// Cost and energy projection for one run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostEnergy {
    /// Tokens processed
    pub total_tokens: u64,
    /// Optimizer steps
    pub training_steps: u64,
    /// Wall-clock hours
    pub training_time_hours: f64,
    /// Hours × GPUs
    pub gpu_hours: f64,
    /// Energy drawn by the GPUs
    pub energy_kwh: f64,
    /// Emissions in kg CO2e
    pub carbon_kg: f64,
    /// Cloud rental cost
    pub total_cost_usd: f64,
}

impl CostEnergy {
    /// Derive GPU-hours, energy, carbon and cost from wall-clock hours.
    #[must_use]
    pub fn from_hours(hours: f64, hardware: &HardwareConfig) -> Self {
        let gpus = hardware.num_gpus as f64;
        let energy_kwh = hardware.power_draw_watts * gpus * hours / 1000.0;
        Self {
            total_tokens: 0,
            training_steps: 0,
            training_time_hours: hours,
            gpu_hours: hours * gpus,
            energy_kwh,
            carbon_kg: energy_kwh * hardware.grid_carbon_intensity / 1000.0,
            total_cost_usd: hours * gpus * hardware.cost_per_gpu_hour,
        }
    }
}

/// Project the run defined by `budget` onto `hardware`.
#[must_use]
pub fn estimate(
    params: &ParameterCount,
    budget: &TrainingBudget,
    arch: &ArchitectureSpec,
    hardware: &HardwareConfig,
    calibration: &Calibration,
) -> CostEnergy {
    let total_tokens = budget.tokens(params, arch, calibration);

    let training_steps = match *budget {
        TrainingBudget::Steps(steps) => steps,
        _ => total_tokens.div_ceil(arch.tokens_per_step().max(1)),
    };

    let cluster_throughput = hardware.tokens_per_second_per_gpu * hardware.num_gpus as f64;
    let hours = total_tokens as f64 / cluster_throughput / SECONDS_PER_HOUR;

    CostEnergy {
        total_tokens,
        training_steps,
        ..CostEnergy::from_hours(hours, hardware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn params() -> ParameterCount {
        ParameterCount {
            total: 7_000_000_000,
            active: 7_000_000_000,
        }
    }

    #[test]
    fn test_from_hours() {
        let hw = HardwareConfig::default();
        let cost = CostEnergy::from_hours(10.0, &hw);

        assert_relative_eq!(cost.gpu_hours, 80.0);
        // 700 W × 8 × 10 h
        assert_relative_eq!(cost.energy_kwh, 56.0);
        assert_relative_eq!(cost.carbon_kg, 56.0 * 386.0 / 1000.0, epsilon = 1e-9);
        assert_relative_eq!(cost.total_cost_usd, 320.0);
    }

    #[test]
    fn test_chinchilla_budget() {
        let arch = ArchitectureSpec::default();
        let tokens = TrainingBudget::Chinchilla.tokens(&params(), &arch, &Calibration::default());
        assert_eq!(tokens, 140_000_000_000);
    }

    #[test]
    fn test_steps_budget() {
        let arch = ArchitectureSpec::default();
        let hw = HardwareConfig::default();
        let cost = estimate(
            &params(),
            &TrainingBudget::Steps(1000),
            &arch,
            &hw,
            &Calibration::default(),
        );
        assert_eq!(cost.training_steps, 1000);
        // 1000 × 32 × 4096
        assert_eq!(cost.total_tokens, 131_072_000);
    }

    #[test]
    fn test_token_budget_hours() {
        let arch = ArchitectureSpec::default();
        let hw = HardwareConfig::default();
        let tokens = 3000 * 8 * 3600;
        let cost = estimate(
            &params(),
            &TrainingBudget::Tokens(tokens),
            &arch,
            &hw,
            &Calibration::default(),
        );
        assert_relative_eq!(cost.training_time_hours, 1.0, epsilon = 1e-12);
        // ceil(86_400_000 / 131_072)
        assert_eq!(cost.training_steps, 660);
    }

    #[test]
    fn test_budget_serde() {
        let json = serde_json::to_string(&TrainingBudget::Steps(5)).unwrap();
        assert_eq!(json, r#"{"steps":5}"#);
        let parsed: TrainingBudget = serde_json::from_str(r#""chinchilla""#).unwrap();
        assert_eq!(parsed, TrainingBudget::Chinchilla);
    }

    proptest! {
        #[test]
        fn prop_cost_monotonic_in_hours(a in 0.0f64..1e5, b in 0.0f64..1e5) {
            let hw = HardwareConfig::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let x = CostEnergy::from_hours(lo, &hw);
            let y = CostEnergy::from_hours(hi, &hw);
            prop_assert!(x.total_cost_usd <= y.total_cost_usd);
            prop_assert!(x.energy_kwh <= y.energy_kwh);
            prop_assert!(x.carbon_kg <= y.carbon_kg);
        }

        #[test]
        fn prop_cost_monotonic_in_gpus(hours in 0.0f64..1e4, g in 1u64..512) {
            let small = CostEnergy::from_hours(hours, &HardwareConfig::default().with_gpus(g));
            let large = CostEnergy::from_hours(hours, &HardwareConfig::default().with_gpus(g + 1));
            prop_assert!(small.total_cost_usd <= large.total_cost_usd);
            prop_assert!(small.gpu_hours <= large.gpu_hours);
            prop_assert!(small.energy_kwh <= large.energy_kwh);
            prop_assert!(small.carbon_kg <= large.carbon_kg);
        }

        #[test]
        fn prop_cost_linear_in_hours(hours in 0.001f64..1e4) {
            let hw = HardwareConfig::default();
            let one = CostEnergy::from_hours(hours, &hw);
            let two = CostEnergy::from_hours(hours * 2.0, &hw);
            prop_assert!((two.total_cost_usd - one.total_cost_usd * 2.0).abs() < 1e-6 * two.total_cost_usd);
        }
    }
}
