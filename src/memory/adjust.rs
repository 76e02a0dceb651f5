//! Independent memory adjustments, applied in a fixed order:
//! precision → sharding → checkpointing → MoE active fraction →
//! LoRA trainable fraction → CPU offload.
//!
//! Every function works on raw per-GPU bytes so each toggle can be tested
//! on its own.

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::flags::{OptimizationFlags, ZeroStage};
use crate::params::ParameterCount;
use crate::units::PrecisionMode;

/// Adam keeps two FP32 moments per trainable parameter.
pub const ADAM_STATE_BYTES: f64 = 2.0 * 4.0;

/// Per-GPU bytes for each memory term.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TermBytes {
    /// Stored model weights
    pub weights: f64,
    /// Weights evaluated per token
    pub active_weights: f64,
    /// Gradient buffers
    pub gradients: f64,
    /// Optimizer moments
    pub optimizer: f64,
    /// Saved activations
    pub activations: f64,
}

/// Bytes per stored weight: quantization overrides precision for weights only.
#[must_use]
pub fn weight_bytes(flags: &OptimizationFlags, precision: PrecisionMode) -> f64 {
    if flags.quantization.enabled {
        flags.quantization.weight_bytes()
    } else {
        precision.bytes() as f64
    }
}

/// Full-replica bytes before any optimization other than precision.
#[must_use]
pub fn apply_precision(
    params: &ParameterCount,
    arch: &ArchitectureSpec,
    flags: &OptimizationFlags,
    precision: PrecisionMode,
    calibration: &Calibration,
) -> TermBytes {
    let total = params.total as f64;
    let weights = total * weight_bytes(flags, precision);

    let activation_elements = arch.sequence_length as f64
        * arch.micro_batch_size_per_gpu as f64
        * arch.hidden_size as f64
        * arch.num_layers as f64;

    TermBytes {
        weights,
        active_weights: weights,
        gradients: total * precision.gradient_bytes() as f64,
        optimizer: total * ADAM_STATE_BYTES,
        activations: activation_elements
            * calibration.activation_tensors_per_token
            * precision.bytes() as f64,
    }
}

/// Divisor ZeRO applies to a term; a single GPU never divides.
#[must_use]
pub fn shard_factor(sharded: bool, num_gpus: u64) -> f64 {
    if sharded {
        num_gpus.max(1) as f64
    } else {
        1.0
    }
}

/// Split optimizer (stage ≥ 1), gradients (stage ≥ 2) and weights (stage 3).
pub fn apply_sharding(terms: &mut TermBytes, stage: ZeroStage, num_gpus: u64) {
    terms.optimizer /= shard_factor(stage.shards_optimizer(), num_gpus);
    terms.gradients /= shard_factor(stage.shards_gradients(), num_gpus);

    let weight_divisor = shard_factor(stage.shards_weights(), num_gpus);
    terms.weights /= weight_divisor;
    terms.active_weights /= weight_divisor;
}

/// Retain `gradient_checkpoint_factor` of activations when checkpointing,
/// then apply the FlashAttention reduction.
pub fn apply_checkpointing(
    terms: &mut TermBytes,
    flags: &OptimizationFlags,
    calibration: &Calibration,
) {
    terms.activations *= flags.checkpoint_retention();
    if flags.flash_attention {
        terms.activations *= calibration.flash_attention_factor;
    }
}

/// Scale the active-weights display figure by `active / total`.
pub fn apply_moe_active_fraction(terms: &mut TermBytes, params: &ParameterCount) {
    terms.active_weights = terms.weights * params.active_fraction();
}

/// Gradients and optimizer state exist only for trainable parameters.
pub fn apply_lora_trainable_fraction(terms: &mut TermBytes, trainable: u64, total: u64) {
    if total == 0 || trainable >= total {
        return;
    }
    let fraction = trainable as f64 / total as f64;
    terms.gradients *= fraction;
    terms.optimizer *= fraction;
}

/// Move `pct` percent of optimizer state to host memory.
pub fn apply_cpu_offload(terms: &mut TermBytes, pct: f64) {
    terms.optimizer *= 1.0 - (pct / 100.0).clamp(0.0, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> TermBytes {
        TermBytes {
            weights: 800.0,
            active_weights: 800.0,
            gradients: 800.0,
            optimizer: 3200.0,
            activations: 100.0,
        }
    }

    #[test]
    fn test_shard_factor_single_gpu_is_one() {
        assert!((shard_factor(true, 1) - 1.0).abs() < f64::EPSILON);
        assert!((shard_factor(true, 0) - 1.0).abs() < f64::EPSILON);
        assert!((shard_factor(false, 8) - 1.0).abs() < f64::EPSILON);
        assert!((shard_factor(true, 8) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sharding_by_stage() {
        let mut t = terms();
        apply_sharding(&mut t, ZeroStage::OptimizerStates, 8);
        assert!((t.optimizer - 400.0).abs() < f64::EPSILON);
        assert!((t.gradients - 800.0).abs() < f64::EPSILON);

        let mut t = terms();
        apply_sharding(&mut t, ZeroStage::Gradients, 8);
        assert!((t.gradients - 100.0).abs() < f64::EPSILON);
        assert!((t.weights - 800.0).abs() < f64::EPSILON);

        let mut t = terms();
        apply_sharding(&mut t, ZeroStage::Parameters, 8);
        assert!((t.weights - 100.0).abs() < f64::EPSILON);
        assert!((t.active_weights - 100.0).abs() < f64::EPSILON);
        assert!((t.activations - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_checkpointing_and_flash_compose() {
        let calibration = Calibration::default();
        let flags = OptimizationFlags::default()
            .with_checkpointing(0.4)
            .with_flash_attention(true);
        let mut t = terms();
        apply_checkpointing(&mut t, &flags, &calibration);
        assert!((t.activations - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_lora_fraction_leaves_weights_alone() {
        let mut t = terms();
        apply_lora_trainable_fraction(&mut t, 10, 100);
        assert!((t.gradients - 80.0).abs() < 1e-9);
        assert!((t.optimizer - 320.0).abs() < 1e-9);
        assert!((t.weights - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cpu_offload_only_touches_optimizer() {
        let mut t = terms();
        apply_cpu_offload(&mut t, 25.0);
        assert!((t.optimizer - 2400.0).abs() < 1e-9);
        assert!((t.gradients - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quantization_overrides_weight_bytes() {
        let flags = OptimizationFlags::default()
            .with_quantization(4, crate::flags::QuantType::Int);
        assert!((weight_bytes(&flags, PrecisionMode::Bf16) - 0.5).abs() < f64::EPSILON);
        assert!(
            (weight_bytes(&OptimizationFlags::default(), PrecisionMode::Fp32) - 4.0).abs()
                < f64::EPSILON
        );
    }
}
