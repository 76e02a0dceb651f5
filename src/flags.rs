//! Training optimization toggles.
//!
//! Each toggle is an independent adjustment; see [`crate::memory`] for the
//! order in which they are applied.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// ZeRO (DeepSpeed) / FSDP sharding stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ZeroStage {
    /// Every GPU holds a full replica
    #[default]
    Disabled,
    /// Stage 1: optimizer states sharded
    OptimizerStates,
    /// Stage 2: optimizer states and gradients sharded
    Gradients,
    /// Stage 3: optimizer states, gradients and weights sharded
    Parameters,
}

impl ZeroStage {
    /// Optimizer state is split across data-parallel ranks.
    #[must_use]
    pub fn shards_optimizer(self) -> bool {
        self >= Self::OptimizerStates
    }

    /// Gradients are split across data-parallel ranks.
    #[must_use]
    pub fn shards_gradients(self) -> bool {
        self >= Self::Gradients
    }

    /// Weights are split across data-parallel ranks.
    #[must_use]
    pub fn shards_weights(self) -> bool {
        self == Self::Parameters
    }
}

impl TryFrom<u8> for ZeroStage {
    type Error = ValidationError;

    fn try_from(stage: u8) -> Result<Self, Self::Error> {
        match stage {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::OptimizerStates),
            2 => Ok(Self::Gradients),
            3 => Ok(Self::Parameters),
            other => Err(ValidationError::InvalidZeroStage(other)),
        }
    }
}

impl From<ZeroStage> for u8 {
    fn from(stage: ZeroStage) -> Self {
        match stage {
            ZeroStage::Disabled => 0,
            ZeroStage::OptimizerStates => 1,
            ZeroStage::Gradients => 2,
            ZeroStage::Parameters => 3,
        }
    }
}

/// Mixture-of-experts FFN layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoeFlags {
    /// Replace dense FFNs with expert FFNs
    pub enabled: bool,
    /// Experts per layer (E)
    pub experts: u64,
    /// Experts evaluated per token (K)
    pub top_k: u64,
}

impl Default for MoeFlags {
    fn default() -> Self {
        Self {
            enabled: false,
            experts: 8,
            top_k: 2,
        }
    }
}

/// Low-rank adapter fine-tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoraFlags {
    /// Train adapters instead of the full weights
    pub enabled: bool,
    /// Adapter rank (r)
    pub rank: u64,
    /// Scaling numerator; affects training dynamics, not memory
    pub alpha: f64,
}

impl Default for LoraFlags {
    fn default() -> Self {
        Self {
            enabled: false,
            rank: 64,
            alpha: 128.0,
        }
    }
}

/// Number format of quantized weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantType {
    /// Integer quantization (INT8, INT4, NF4)
    #[default]
    Int,
    /// Low-precision float (FP16, FP8)
    Float,
}

/// Weight quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizationFlags {
    /// Store weights quantized
    pub enabled: bool,
    /// Bits per weight: 4, 8 or 16
    pub bits: u8,
    /// Integer or float format
    #[serde(rename = "type")]
    pub kind: QuantType,
}

impl Default for QuantizationFlags {
    fn default() -> Self {
        Self {
            enabled: false,
            bits: 8,
            kind: QuantType::Int,
        }
    }
}

impl QuantizationFlags {
    /// Bytes per quantized weight.
    #[must_use]
    pub fn weight_bytes(&self) -> f64 {
        f64::from(self.bits) / 8.0
    }
}

/// Optimization toggles applied on top of the base architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationFlags {
    /// Fused attention kernels (FlashAttention)
    pub flash_attention: bool,
    /// Recompute activations in the backward pass
    pub activation_checkpointing: bool,
    /// Fraction of activation memory retained when checkpointing (0.10..=1.00)
    pub gradient_checkpoint_factor: f64,
    /// ZeRO sharding stage
    pub zero_stage: ZeroStage,
    /// Percentage of optimizer state offloaded to host memory
    pub cpu_offload_pct: f64,
    /// Mixture of experts
    pub moe: MoeFlags,
    /// LoRA adapters
    pub lora: LoraFlags,
    /// Weight quantization
    pub quantization: QuantizationFlags,
}

impl Default for OptimizationFlags {
    fn default() -> Self {
        Self {
            flash_attention: false,
            activation_checkpointing: false,
            gradient_checkpoint_factor: 1.0,
            zero_stage: ZeroStage::Disabled,
            cpu_offload_pct: 0.0,
            moe: MoeFlags::default(),
            lora: LoraFlags::default(),
            quantization: QuantizationFlags::default(),
        }
    }
}

impl OptimizationFlags {
    /// Set the ZeRO stage.
    #[must_use]
    pub fn with_zero_stage(mut self, stage: ZeroStage) -> Self {
        self.zero_stage = stage;
        self
    }

    /// Toggle FlashAttention.
    #[must_use]
    pub fn with_flash_attention(mut self, enabled: bool) -> Self {
        self.flash_attention = enabled;
        self
    }

    /// Enable activation checkpointing keeping `factor` of activation memory.
    #[must_use]
    pub fn with_checkpointing(mut self, factor: f64) -> Self {
        self.activation_checkpointing = true;
        self.gradient_checkpoint_factor = factor;
        self
    }

    /// Enable mixture of experts.
    #[must_use]
    pub fn with_moe(mut self, experts: u64, top_k: u64) -> Self {
        self.moe = MoeFlags {
            enabled: true,
            experts,
            top_k,
        };
        self
    }

    /// Enable LoRA adapters.
    #[must_use]
    pub fn with_lora(mut self, rank: u64, alpha: f64) -> Self {
        self.lora = LoraFlags {
            enabled: true,
            rank,
            alpha,
        };
        self
    }

    /// Enable weight quantization.
    #[must_use]
    pub fn with_quantization(mut self, bits: u8, kind: QuantType) -> Self {
        self.quantization = QuantizationFlags {
            enabled: true,
            bits,
            kind,
        };
        self
    }

    /// Offload a percentage of optimizer state to host memory.
    #[must_use]
    pub fn with_cpu_offload(mut self, pct: f64) -> Self {
        self.cpu_offload_pct = pct;
        self
    }

    /// Activation memory multiplier from checkpointing alone.
    #[must_use]
    pub fn checkpoint_retention(&self) -> f64 {
        if self.activation_checkpointing {
            self.gradient_checkpoint_factor
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stage_sharding_levels() {
        assert!(!ZeroStage::Disabled.shards_optimizer());
        assert!(ZeroStage::OptimizerStates.shards_optimizer());
        assert!(!ZeroStage::OptimizerStates.shards_gradients());
        assert!(ZeroStage::Gradients.shards_gradients());
        assert!(!ZeroStage::Gradients.shards_weights());
        assert!(ZeroStage::Parameters.shards_weights());
        assert!(ZeroStage::Parameters.shards_optimizer());
    }

    #[test]
    fn test_zero_stage_from_integer() {
        assert_eq!(ZeroStage::try_from(3).unwrap(), ZeroStage::Parameters);
        assert_eq!(
            ZeroStage::try_from(4),
            Err(ValidationError::InvalidZeroStage(4))
        );
        assert_eq!(u8::from(ZeroStage::Gradients), 2);
    }

    #[test]
    fn test_zero_stage_deserializes_from_number() {
        let stage: ZeroStage = serde_yaml::from_str("2").unwrap();
        assert_eq!(stage, ZeroStage::Gradients);
        assert!(serde_yaml::from_str::<ZeroStage>("7").is_err());
    }

    #[test]
    fn test_default_flags_are_baseline() {
        let flags = OptimizationFlags::default();
        assert!(!flags.flash_attention);
        assert!(!flags.moe.enabled);
        assert!(!flags.lora.enabled);
        assert!(!flags.quantization.enabled);
        assert!((flags.checkpoint_retention() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_checkpoint_factor_ignored_when_disabled() {
        let mut flags = OptimizationFlags::default();
        flags.gradient_checkpoint_factor = 0.3;
        assert!((flags.checkpoint_retention() - 1.0).abs() < f64::EPSILON);

        let flags = OptimizationFlags::default().with_checkpointing(0.3);
        assert!((flags.checkpoint_retention() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quantization_type_field_named_type() {
        let yaml = "enabled: true\nbits: 4\ntype: float\n";
        let quant: QuantizationFlags = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(quant.kind, QuantType::Float);
        assert!((quant.weight_bytes() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let flags: OptimizationFlags =
            serde_yaml::from_str("zero_stage: 3\nmoe:\n  enabled: true\n").unwrap();
        assert_eq!(flags.zero_stage, ZeroStage::Parameters);
        assert!(flags.moe.enabled);
        assert_eq!(flags.moe.experts, 8);
        assert_eq!(flags.moe.top_k, 2);
    }
}
