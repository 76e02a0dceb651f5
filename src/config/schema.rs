//! Plan file schema
//!
//! Every section is optional. Missing architecture and optimization fields
//! come from the preset, missing hardware fields from the catalog GPU.

use serde::{Deserialize, Serialize};

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::flags::{LoraFlags, MoeFlags, OptimizationFlags, QuantizationFlags, ZeroStage};
use crate::hardware::HardwareConfig;
use crate::units::PrecisionMode;

/// One estimation request as written in YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanSpec {
    /// Starting architecture (see `estimar presets`)
    #[serde(default)]
    pub preset: Option<String>,

    /// Architecture overrides
    #[serde(default)]
    pub architecture: ArchitectureOverrides,

    /// Catalog GPU supplying capacity, power and price
    #[serde(default)]
    pub gpu: Option<String>,

    /// Hardware overrides, applied after the catalog GPU
    #[serde(default)]
    pub hardware: HardwareOverrides,

    /// Training precision (default bf16)
    #[serde(default)]
    pub precision: Option<PrecisionMode>,

    /// Optimization overrides, applied after the preset's toggles
    #[serde(default)]
    pub optimizations: OptimizationOverrides,

    /// Token budget (default: Chinchilla-optimal)
    #[serde(default)]
    pub budget: BudgetSpec,

    /// Grid region supplying carbon intensity
    #[serde(default)]
    pub grid_region: Option<String>,

    /// Engine constant overrides
    #[serde(default)]
    pub calibration: Calibration,
}

/// Architecture fields a plan may set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchitectureOverrides {
    pub hidden_size: Option<u64>,
    pub num_layers: Option<u64>,
    pub num_attention_heads: Option<u64>,
    pub vocab_size: Option<u64>,
    pub ffn_expansion_ratio: Option<f64>,
    pub sequence_length: Option<u64>,
    pub batch_size: Option<u64>,
    pub micro_batch_size_per_gpu: Option<u64>,
    pub num_gpus: Option<u64>,
}

impl ArchitectureOverrides {
    /// Write every set field into `arch`.
    pub fn apply(&self, arch: &mut ArchitectureSpec) {
        set(&mut arch.hidden_size, self.hidden_size);
        set(&mut arch.num_layers, self.num_layers);
        set(&mut arch.num_attention_heads, self.num_attention_heads);
        set(&mut arch.vocab_size, self.vocab_size);
        set(&mut arch.ffn_expansion_ratio, self.ffn_expansion_ratio);
        set(&mut arch.sequence_length, self.sequence_length);
        set(&mut arch.batch_size, self.batch_size);
        set(
            &mut arch.micro_batch_size_per_gpu,
            self.micro_batch_size_per_gpu,
        );
        set(&mut arch.num_gpus, self.num_gpus);
    }
}

/// Hardware fields a plan may set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HardwareOverrides {
    pub memory_per_gpu: Option<f64>,
    pub num_gpus: Option<u64>,
    pub cost_per_gpu_hour: Option<f64>,
    pub tokens_per_second_per_gpu: Option<f64>,
    pub grid_carbon_intensity: Option<f64>,
    pub power_draw_watts: Option<f64>,
}

impl HardwareOverrides {
    /// Write every set field into `hardware`.
    pub fn apply(&self, hardware: &mut HardwareConfig) {
        set(&mut hardware.memory_per_gpu, self.memory_per_gpu);
        set(&mut hardware.num_gpus, self.num_gpus);
        set(&mut hardware.cost_per_gpu_hour, self.cost_per_gpu_hour);
        set(
            &mut hardware.tokens_per_second_per_gpu,
            self.tokens_per_second_per_gpu,
        );
        set(&mut hardware.grid_carbon_intensity, self.grid_carbon_intensity);
        set(&mut hardware.power_draw_watts, self.power_draw_watts);
    }
}

/// Optimization fields a plan may set. Nested sections replace the preset's
/// section as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizationOverrides {
    pub flash_attention: Option<bool>,
    pub activation_checkpointing: Option<bool>,
    pub gradient_checkpoint_factor: Option<f64>,
    pub zero_stage: Option<ZeroStage>,
    pub cpu_offload_pct: Option<f64>,
    pub moe: Option<MoeFlags>,
    pub lora: Option<LoraFlags>,
    pub quantization: Option<QuantizationFlags>,
}

impl OptimizationOverrides {
    /// Write every set field into `flags`.
    pub fn apply(&self, flags: &mut OptimizationFlags) {
        set(&mut flags.flash_attention, self.flash_attention);
        set(
            &mut flags.activation_checkpointing,
            self.activation_checkpointing,
        );
        set(
            &mut flags.gradient_checkpoint_factor,
            self.gradient_checkpoint_factor,
        );
        set(&mut flags.zero_stage, self.zero_stage);
        set(&mut flags.cpu_offload_pct, self.cpu_offload_pct);
        set(&mut flags.moe, self.moe);
        set(&mut flags.lora, self.lora);
        set(&mut flags.quantization, self.quantization);
    }
}

/// Token budget; at most one of `tokens` and `steps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetSpec {
    /// Train on a fixed number of tokens
    pub tokens: Option<u64>,
    /// Train for a fixed number of optimizer steps
    pub steps: Option<u64>,
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
