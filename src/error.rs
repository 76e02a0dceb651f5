//! Validation error types
//!
//! Every invariant the engine checks before computing has its own variant, so
//! callers can map a failure straight back to the offending input field.

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Input rejected before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid hidden size: {0} (must be > 0)")]
    InvalidHiddenSize(u64),

    #[error("Invalid layer count: {0} (must be > 0)")]
    InvalidNumLayers(u64),

    #[error("Invalid attention head count: {0} (must be > 0)")]
    InvalidAttentionHeads(u64),

    #[error("Invalid vocabulary size: {0} (must be > 0)")]
    InvalidVocabSize(u64),

    #[error("Invalid FFN expansion ratio: {0} (must be a finite number > 0)")]
    InvalidFfnRatio(f64),

    #[error("Invalid sequence length: {0} (must be > 0)")]
    InvalidSeqLen(u64),

    #[error("Invalid global batch size: {0} (must be > 0)")]
    InvalidBatchSize(u64),

    #[error("Invalid micro-batch size per GPU: {0} (must be > 0)")]
    InvalidMicroBatchSize(u64),

    #[error("Invalid GPU count: {0} (must be > 0)")]
    InvalidGpuCount(u64),

    #[error("GPU count mismatch: architecture uses {architecture}, hardware provides {hardware}")]
    GpuCountMismatch { architecture: u64, hardware: u64 },

    #[error("Invalid gradient checkpoint factor: {0} (must be within 0.10..=1.00)")]
    InvalidCheckpointFactor(f64),

    #[error("Invalid ZeRO stage: {0} (must be 0, 1, 2 or 3)")]
    InvalidZeroStage(u8),

    #[error("Invalid expert count: {0} (must be > 0)")]
    InvalidExpertCount(u64),

    #[error("Invalid MoE top-k: {top_k} (must satisfy 1 <= top_k <= experts = {experts})")]
    InvalidTopK { top_k: u64, experts: u64 },

    #[error("Invalid LoRA rank: {rank} (must be > 0 and <= hidden_size = {hidden_size})")]
    InvalidLoRARank { rank: u64, hidden_size: u64 },

    #[error("Invalid LoRA alpha: {0} (must be > 0.0)")]
    InvalidLoRAAlpha(f64),

    #[error("Invalid quantization bits: {0} (must be 4, 8 or 16)")]
    InvalidQuantBits(u8),

    #[error("Invalid CPU offload percentage: {0} (must be within 0..=100)")]
    InvalidCpuOffload(f64),

    #[error("Invalid memory per GPU: {0} GB (must be > 0)")]
    InvalidMemoryPerGpu(f64),

    #[error("Invalid throughput: {0} tokens/s/GPU (must be > 0)")]
    InvalidThroughput(f64),

    #[error("Invalid cost per GPU-hour: {0} (must be >= 0)")]
    InvalidCostPerHour(f64),

    #[error("Invalid power draw: {0} W (must be >= 0)")]
    InvalidPowerDraw(f64),

    #[error("Invalid grid carbon intensity: {0} gCO2/kWh (must be >= 0)")]
    InvalidCarbonIntensity(f64),

    #[error("Invalid training budget: {0} (must be > 0)")]
    InvalidBudget(u64),

    #[error("Invalid calibration constant {name}: {value}")]
    InvalidCalibration { name: &'static str, value: f64 },

    #[error("Parameter count overflows 64 bits")]
    ParameterOverflow,
}

impl ValidationError {
    /// Plan-file path of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidHiddenSize(_) => "architecture.hidden_size",
            Self::InvalidNumLayers(_) => "architecture.num_layers",
            Self::InvalidAttentionHeads(_) => "architecture.num_attention_heads",
            Self::InvalidVocabSize(_) => "architecture.vocab_size",
            Self::InvalidFfnRatio(_) => "architecture.ffn_expansion_ratio",
            Self::InvalidSeqLen(_) => "architecture.sequence_length",
            Self::InvalidBatchSize(_) => "architecture.batch_size",
            Self::InvalidMicroBatchSize(_) => "architecture.micro_batch_size_per_gpu",
            Self::InvalidGpuCount(_) | Self::GpuCountMismatch { .. } => "architecture.num_gpus",
            Self::InvalidCheckpointFactor(_) => "optimizations.gradient_checkpoint_factor",
            Self::InvalidZeroStage(_) => "optimizations.zero_stage",
            Self::InvalidExpertCount(_) => "optimizations.moe.experts",
            Self::InvalidTopK { .. } => "optimizations.moe.top_k",
            Self::InvalidLoRARank { .. } => "optimizations.lora.rank",
            Self::InvalidLoRAAlpha(_) => "optimizations.lora.alpha",
            Self::InvalidQuantBits(_) => "optimizations.quantization.bits",
            Self::InvalidCpuOffload(_) => "optimizations.cpu_offload_pct",
            Self::InvalidMemoryPerGpu(_) => "hardware.memory_per_gpu",
            Self::InvalidThroughput(_) => "hardware.tokens_per_second_per_gpu",
            Self::InvalidCostPerHour(_) => "hardware.cost_per_gpu_hour",
            Self::InvalidPowerDraw(_) => "hardware.power_draw_watts",
            Self::InvalidCarbonIntensity(_) => "hardware.grid_carbon_intensity",
            Self::InvalidBudget(_) => "budget",
            Self::InvalidCalibration { .. } => "calibration",
            Self::ParameterOverflow => "architecture",
        }
    }

    /// Short hint on how to fix the input.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::GpuCountMismatch { .. } => "Set architecture.num_gpus and hardware.num_gpus to the same value",
            Self::InvalidCheckpointFactor(_) => "Use 1.0 to keep all activations, 0.1 for aggressive recompute",
            Self::InvalidZeroStage(_) => "Use 0 (no sharding) through 3 (shard weights, gradients and optimizer)",
            Self::InvalidTopK { .. } | Self::InvalidExpertCount(_) => "Typical MoE settings are experts: 8, top_k: 2",
            Self::InvalidQuantBits(_) => "Use bits: 4 or 8 for QLoRA-style storage, 16 for half precision",
            Self::InvalidLoRARank { .. } => "Typical LoRA ranks are 8 to 128",
            Self::InvalidCpuOffload(_) => "Give the offloaded share as a percentage, e.g. 50",
            Self::ParameterOverflow => "Reduce hidden_size, num_layers or expert count",
            Self::InvalidCalibration { .. } => "Remove the calibration override to use the defaults",
            _ => "Use a positive value",
        }
    }
}

impl From<ValidationError> for estimar_common::EstimarError {
    fn from(err: ValidationError) -> Self {
        Self::ConfigValue {
            field: err.field().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion().to_string(),
        }
    }
}
