//! Estimation pipeline (EstimationFacade).
//!
//! `validate → count parameters → memory breakdown → fit check →
//! batch schedule → cost/energy` as one pure call. Validation reports the
//! first violated invariant and nothing is computed on failure.
//!
//! # Example
//!
//! ```
//! use estimar::{estimate, ArchitectureSpec, HardwareConfig, OptimizationFlags, PrecisionMode};
//! use estimar::flags::ZeroStage;
//!
//! let flags = OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters);
//! let result = estimate(
//!     &ArchitectureSpec::default(),
//!     &HardwareConfig::default(),
//!     &flags,
//!     PrecisionMode::Bf16,
//! )
//! .unwrap();
//! assert!(result.fit_status.is_feasible());
//! ```

mod validate;
mod warnings;

pub use validate::{
    validate_architecture, validate_budget, validate_flags, validate_hardware, validate_inputs,
    CHECKPOINT_FACTOR_RANGE, SUPPORTED_QUANT_BITS,
};
pub use warnings::Warning;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::cost::{self, TrainingBudget};
use crate::error::Result;
use crate::fit::{self, FitStatus};
use crate::flags::{OptimizationFlags, ZeroStage};
use crate::hardware::HardwareConfig;
use crate::memory::{self, DiskSizes, InferenceMemory, MemoryBreakdown};
use crate::params;
use crate::schedule::BatchSchedule;
use crate::units::{GpuCatalog, PrecisionMode};

/// Everything the engine computes for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Every stored parameter, all experts included
    pub parameter_count: u64,
    /// Parameters evaluated per token (top-k experts for MoE)
    pub active_parameter_count: u64,
    /// Parameters updated by the optimizer (LoRA adapters only when enabled)
    pub trainable_parameter_count: u64,
    /// GB per GPU, one entry per memory term
    pub memory: MemoryBreakdown,
    /// GB per GPU, weights+gradients+optimizer+activations+overhead
    pub total_memory_per_gpu: f64,
    /// Percent of `memory_per_gpu`; above 100 means the plan does not fit
    pub memory_utilization_pct: f64,
    pub fit_status: FitStatus,
    /// Micro-batches accumulated per optimizer step
    pub gradient_accumulation_steps: u64,
    /// Sequences per optimizer step after rounding up
    pub effective_batch_size: u64,
    /// Optimizer steps
    pub training_steps: u64,
    /// Tokens processed over the run
    pub total_tokens: u64,
    /// Wall-clock hours
    pub training_time_hours: f64,
    /// Wall-clock hours × GPU count
    pub gpu_hours: f64,
    /// kWh drawn by the GPUs
    pub energy_kwh: f64,
    /// kg CO2e at the grid carbon intensity
    pub carbon_kg: f64,
    /// USD at the hourly GPU price
    pub total_cost_usd: f64,
    /// GB per GPU to serve the model
    pub inference: InferenceMemory,
    pub inference_fit_status: FitStatus,
    /// GB on disk for weights and checkpoints
    pub disk: DiskSizes,
    pub warnings: Vec<Warning>,
}

/// One catalog GPU evaluated against the same plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareComparison {
    /// Catalog key
    pub gpu_id: String,
    /// Display name
    pub gpu_name: String,
    /// GB of memory on this GPU
    pub memory_per_gpu: f64,
    /// Percent of this GPU's capacity
    pub memory_utilization_pct: f64,
    pub fit_status: FitStatus,
    /// Wall-clock hours
    pub training_time_hours: f64,
    /// kWh
    pub energy_kwh: f64,
    /// kg CO2e
    pub carbon_kg: f64,
    /// USD
    pub total_cost_usd: f64,
}

/// Estimation with tunable calibration and token budget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimator {
    calibration: Calibration,
    budget: TrainingBudget,
}

impl Estimator {
    /// Default calibration and a Chinchilla-optimal budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override calibration constants.
    #[must_use]
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Override the token budget.
    #[must_use]
    pub fn with_budget(mut self, budget: TrainingBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Calibration in use.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Budget in use.
    pub fn budget(&self) -> TrainingBudget {
        self.budget
    }

    /// Run the full pipeline.
    pub fn estimate(
        &self,
        arch: &ArchitectureSpec,
        hardware: &HardwareConfig,
        flags: &OptimizationFlags,
        precision: PrecisionMode,
    ) -> Result<EstimationResult> {
        validate_inputs(arch, hardware, flags, &self.budget, &self.calibration)?;

        let params = params::count(arch, &flags.moe)?;
        let trainable = params::trainable(&params, arch, &flags.lora);
        debug!(
            total = params.total,
            active = params.active,
            trainable,
            "counted parameters"
        );

        let memory = memory::breakdown(
            &params,
            arch,
            flags,
            precision,
            hardware.num_gpus,
            &self.calibration,
        );
        let total_memory_per_gpu = memory.total();
        debug!(
            weights = memory.weights,
            gradients = memory.gradients,
            optimizer = memory.optimizer,
            activations = memory.activations,
            overhead = memory.overhead,
            "memory breakdown (GB per GPU)"
        );

        let fit = fit::validate_with_threshold(
            total_memory_per_gpu,
            hardware,
            self.calibration.tight_threshold_pct,
        );

        let schedule =
            BatchSchedule::plan(arch.batch_size, arch.micro_batch_size_per_gpu, hardware.num_gpus)?;

        let cost = cost::estimate(&params, &self.budget, arch, hardware, &self.calibration);
        debug!(
            tokens = cost.total_tokens,
            steps = cost.training_steps,
            hours = cost.training_time_hours,
            "projected training run"
        );

        let inference =
            InferenceMemory::estimate(&params, arch, flags, precision, hardware.num_gpus);
        let inference_fit = fit::validate_with_threshold(
            inference.total(),
            hardware,
            self.calibration.tight_threshold_pct,
        );
        let disk = DiskSizes::estimate(params.total, trainable, flags, precision);

        let mut warnings = Vec::new();
        match fit.status {
            FitStatus::Exceeds => {
                warn!(
                    required_gb = total_memory_per_gpu,
                    available_gb = hardware.memory_per_gpu,
                    "plan exceeds GPU memory"
                );
                warnings.push(Warning::CapacityExceeded {
                    required_gb: total_memory_per_gpu,
                    available_gb: hardware.memory_per_gpu,
                });
            }
            FitStatus::Tight => warnings.push(Warning::NearCapacity {
                utilization_pct: fit.utilization_pct,
            }),
            FitStatus::Fits => {}
        }
        if schedule.rounded_up(arch.batch_size) {
            warnings.push(Warning::BatchRoundedUp {
                requested: arch.batch_size,
                effective: schedule.effective_batch_size,
            });
        }
        if flags.zero_stage != ZeroStage::Disabled && hardware.num_gpus == 1 {
            warnings.push(Warning::ShardingWithoutPeers {
                zero_stage: flags.zero_stage.into(),
            });
        }
        if !flags.activation_checkpointing && flags.gradient_checkpoint_factor < 1.0 {
            warnings.push(Warning::CheckpointFactorUnused {
                factor: flags.gradient_checkpoint_factor,
            });
        }
        if inference_fit.status == FitStatus::Exceeds {
            warnings.push(Warning::InferenceExceedsCapacity {
                required_gb: inference.total(),
                available_gb: hardware.memory_per_gpu,
            });
        }

        Ok(EstimationResult {
            parameter_count: params.total,
            active_parameter_count: params.active,
            trainable_parameter_count: trainable,
            memory,
            total_memory_per_gpu,
            memory_utilization_pct: fit.utilization_pct,
            fit_status: fit.status,
            gradient_accumulation_steps: schedule.accumulation_steps,
            effective_batch_size: schedule.effective_batch_size,
            training_steps: cost.training_steps,
            total_tokens: cost.total_tokens,
            training_time_hours: cost.training_time_hours,
            gpu_hours: cost.gpu_hours,
            energy_kwh: cost.energy_kwh,
            carbon_kg: cost.carbon_kg,
            total_cost_usd: cost.total_cost_usd,
            inference,
            inference_fit_status: inference_fit.status,
            disk,
            warnings,
        })
    }

    /// Estimate the plan on every catalog GPU, cheapest first.
    ///
    /// Throughput and grid intensity come from `template`; capacity, power
    /// and price come from each catalog entry.
    pub fn compare(
        &self,
        arch: &ArchitectureSpec,
        flags: &OptimizationFlags,
        precision: PrecisionMode,
        catalog: &GpuCatalog,
        template: &HardwareConfig,
    ) -> Result<Vec<HardwareComparison>> {
        let mut rows = Vec::with_capacity(catalog.all().len());
        for gpu in catalog.all() {
            let hardware = HardwareConfig {
                memory_per_gpu: gpu.memory_gb,
                num_gpus: arch.num_gpus,
                cost_per_gpu_hour: gpu.hourly_rate,
                power_draw_watts: gpu.power_watts,
                ..template.clone()
            };
            let result = self.estimate(arch, &hardware, flags, precision)?;
            rows.push(HardwareComparison {
                gpu_id: gpu.id.clone(),
                gpu_name: gpu.name.clone(),
                memory_per_gpu: gpu.memory_gb,
                memory_utilization_pct: result.memory_utilization_pct,
                fit_status: result.fit_status,
                training_time_hours: result.training_time_hours,
                energy_kwh: result.energy_kwh,
                carbon_kg: result.carbon_kg,
                total_cost_usd: result.total_cost_usd,
            });
        }
        rows.sort_by(|a, b| a.total_cost_usd.total_cmp(&b.total_cost_usd));
        Ok(rows)
    }
}

/// Estimate with default calibration and a Chinchilla-optimal budget.
pub fn estimate(
    arch: &ArchitectureSpec,
    hardware: &HardwareConfig,
    flags: &OptimizationFlags,
    precision: PrecisionMode,
) -> Result<EstimationResult> {
    Estimator::new().estimate(arch, hardware, flags, precision)
}

/// Compare every catalog GPU with default throughput and grid intensity.
pub fn compare_hardware(
    arch: &ArchitectureSpec,
    flags: &OptimizationFlags,
    precision: PrecisionMode,
    catalog: &GpuCatalog,
) -> Result<Vec<HardwareComparison>> {
    Estimator::new().compare(arch, flags, precision, catalog, &HardwareConfig::default())
}
