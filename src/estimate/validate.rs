//! Range checks run before any arithmetic.
//!
//! Checks run in plan-file order (architecture, optimizations, hardware,
//! budget, calibration), then the parameter count is checked for overflow.
//! The first violation stops validation.

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::cost::TrainingBudget;
use crate::error::{Result, ValidationError};
use crate::flags::OptimizationFlags;
use crate::hardware::HardwareConfig;
use crate::params;

/// Checkpoint factor range, fraction of activation memory kept.
pub const CHECKPOINT_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 0.10..=1.00;

/// Quantization widths the estimator understands.
pub const SUPPORTED_QUANT_BITS: [u8; 3] = [4, 8, 16];

/// Validate every input of one estimation.
pub fn validate_inputs(
    arch: &ArchitectureSpec,
    hardware: &HardwareConfig,
    flags: &OptimizationFlags,
    budget: &TrainingBudget,
    calibration: &Calibration,
) -> Result<()> {
    validate_architecture(arch)?;
    validate_flags(arch, flags)?;
    validate_hardware(arch, hardware)?;
    validate_budget(budget)?;
    calibration.validate()?;
    params::count(arch, &flags.moe).map(|_| ())
}

/// Every architecture dimension must be positive.
pub fn validate_architecture(arch: &ArchitectureSpec) -> Result<()> {
    if arch.hidden_size == 0 {
        return Err(ValidationError::InvalidHiddenSize(arch.hidden_size));
    }
    if arch.num_layers == 0 {
        return Err(ValidationError::InvalidNumLayers(arch.num_layers));
    }
    if arch.num_attention_heads == 0 {
        return Err(ValidationError::InvalidAttentionHeads(arch.num_attention_heads));
    }
    if arch.vocab_size == 0 {
        return Err(ValidationError::InvalidVocabSize(arch.vocab_size));
    }
    if !arch.ffn_expansion_ratio.is_finite() || arch.ffn_expansion_ratio <= 0.0 {
        return Err(ValidationError::InvalidFfnRatio(arch.ffn_expansion_ratio));
    }
    if arch.sequence_length == 0 {
        return Err(ValidationError::InvalidSeqLen(arch.sequence_length));
    }
    if arch.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(arch.batch_size));
    }
    if arch.micro_batch_size_per_gpu == 0 {
        return Err(ValidationError::InvalidMicroBatchSize(
            arch.micro_batch_size_per_gpu,
        ));
    }
    if arch.num_gpus == 0 {
        return Err(ValidationError::InvalidGpuCount(arch.num_gpus));
    }
    Ok(())
}

/// Optimization toggles: ranges apply only to enabled features, except the
/// checkpoint factor and offload share which are always plain numbers.
pub fn validate_flags(arch: &ArchitectureSpec, flags: &OptimizationFlags) -> Result<()> {
    let factor = flags.gradient_checkpoint_factor;
    if !CHECKPOINT_FACTOR_RANGE.contains(&factor) {
        return Err(ValidationError::InvalidCheckpointFactor(factor));
    }

    let moe = &flags.moe;
    if moe.enabled {
        if moe.experts == 0 {
            return Err(ValidationError::InvalidExpertCount(moe.experts));
        }
        if moe.top_k == 0 || moe.top_k > moe.experts {
            return Err(ValidationError::InvalidTopK {
                top_k: moe.top_k,
                experts: moe.experts,
            });
        }
    }

    let lora = &flags.lora;
    if lora.enabled {
        if lora.rank == 0 || lora.rank > arch.hidden_size {
            return Err(ValidationError::InvalidLoRARank {
                rank: lora.rank,
                hidden_size: arch.hidden_size,
            });
        }
        if !lora.alpha.is_finite() || lora.alpha <= 0.0 {
            return Err(ValidationError::InvalidLoRAAlpha(lora.alpha));
        }
    }

    let quant = &flags.quantization;
    if quant.enabled && !SUPPORTED_QUANT_BITS.contains(&quant.bits) {
        return Err(ValidationError::InvalidQuantBits(quant.bits));
    }

    if !(0.0..=100.0).contains(&flags.cpu_offload_pct) {
        return Err(ValidationError::InvalidCpuOffload(flags.cpu_offload_pct));
    }
    Ok(())
}

/// Hardware figures must be finite; capacity and throughput positive.
pub fn validate_hardware(arch: &ArchitectureSpec, hardware: &HardwareConfig) -> Result<()> {
    if hardware.num_gpus == 0 {
        return Err(ValidationError::InvalidGpuCount(hardware.num_gpus));
    }
    if hardware.num_gpus != arch.num_gpus {
        return Err(ValidationError::GpuCountMismatch {
            architecture: arch.num_gpus,
            hardware: hardware.num_gpus,
        });
    }
    if !is_positive(hardware.memory_per_gpu) {
        return Err(ValidationError::InvalidMemoryPerGpu(hardware.memory_per_gpu));
    }
    if !is_positive(hardware.tokens_per_second_per_gpu) {
        return Err(ValidationError::InvalidThroughput(
            hardware.tokens_per_second_per_gpu,
        ));
    }
    if !is_non_negative(hardware.cost_per_gpu_hour) {
        return Err(ValidationError::InvalidCostPerHour(hardware.cost_per_gpu_hour));
    }
    if !is_non_negative(hardware.power_draw_watts) {
        return Err(ValidationError::InvalidPowerDraw(hardware.power_draw_watts));
    }
    if !is_non_negative(hardware.grid_carbon_intensity) {
        return Err(ValidationError::InvalidCarbonIntensity(
            hardware.grid_carbon_intensity,
        ));
    }
    Ok(())
}

/// Explicit budgets must be non-zero.
pub fn validate_budget(budget: &TrainingBudget) -> Result<()> {
    match *budget {
        TrainingBudget::Tokens(0) | TrainingBudget::Steps(0) => {
            Err(ValidationError::InvalidBudget(0))
        }
        _ => Ok(()),
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
