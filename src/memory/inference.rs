//! Memory needed to serve the model rather than train it.

use serde::{Deserialize, Serialize};

use super::adjust::{self, shard_factor};
use crate::arch::ArchitectureSpec;
use crate::flags::OptimizationFlags;
use crate::params::ParameterCount;
use crate::units::{bytes_to_gb, PrecisionMode};

/// Resident inference memory per GPU in GB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InferenceMemory {
    /// All expert weights stay resident even though only top-k run
    pub weights: f64,
    /// Key and value cache for a full context of micro-batch sequences
    pub kv_cache: f64,
}

impl InferenceMemory {
    /// Weights + KV cache.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights + self.kv_cache
    }

    /// Estimate serving memory: `2 × L × micro × seq × h × bytes` of KV cache
    /// on top of the weights. Weights are only split across GPUs under ZeRO-3.
    #[must_use]
    pub fn estimate(
        params: &ParameterCount,
        arch: &ArchitectureSpec,
        flags: &OptimizationFlags,
        precision: PrecisionMode,
        num_gpus: u64,
    ) -> Self {
        let weight_bytes = params.total as f64 * adjust::weight_bytes(flags, precision)
            / shard_factor(flags.zero_stage.shards_weights(), num_gpus);

        let kv_bytes = 2.0
            * arch.num_layers as f64
            * arch.micro_batch_size_per_gpu as f64
            * arch.sequence_length as f64
            * arch.hidden_size as f64
            * precision.bytes() as f64;

        Self {
            weights: bytes_to_gb(weight_bytes),
            kv_cache: bytes_to_gb(kv_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{QuantType, ZeroStage};
    use approx::assert_relative_eq;

    fn params() -> ParameterCount {
        ParameterCount {
            total: 7_000_000_000,
            active: 7_000_000_000,
        }
    }

    #[test]
    fn test_kv_cache_formula() {
        let arch = ArchitectureSpec::default();
        let mem = InferenceMemory::estimate(
            &params(),
            &arch,
            &OptimizationFlags::default(),
            PrecisionMode::Bf16,
            8,
        );
        // 2 × 32 × 2 × 4096 × 4096 × 2 bytes
        assert_relative_eq!(mem.kv_cache, 4.294_967_296, epsilon = 1e-9);
        assert_relative_eq!(mem.weights, 14.0, epsilon = 1e-9);
        assert_relative_eq!(mem.total(), mem.weights + mem.kv_cache);
    }

    #[test]
    fn test_quantized_weights_shrink() {
        let arch = ArchitectureSpec::default();
        let flags = OptimizationFlags::default().with_quantization(4, QuantType::Int);
        let mem = InferenceMemory::estimate(&params(), &arch, &flags, PrecisionMode::Bf16, 1);
        assert_relative_eq!(mem.weights, 3.5, epsilon = 1e-9);
    }

    #[test]
    fn test_only_zero3_splits_weights() {
        let arch = ArchitectureSpec::default();
        let z2 = OptimizationFlags::default().with_zero_stage(ZeroStage::Gradients);
        let z3 = OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters);

        let m2 = InferenceMemory::estimate(&params(), &arch, &z2, PrecisionMode::Bf16, 8);
        let m3 = InferenceMemory::estimate(&params(), &arch, &z3, PrecisionMode::Bf16, 8);
        assert_relative_eq!(m2.weights, 14.0, epsilon = 1e-9);
        assert_relative_eq!(m3.weights, 1.75, epsilon = 1e-9);
    }
}
