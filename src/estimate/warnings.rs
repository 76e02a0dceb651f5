//! Non-fatal findings attached to an estimation result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Something the caller should know about; never stops an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Training memory exceeds GPU capacity
    CapacityExceeded { required_gb: f64, available_gb: f64 },
    /// Training memory above the tight threshold
    NearCapacity { utilization_pct: f64 },
    /// Accumulation rounded the global batch up
    BatchRoundedUp { requested: u64, effective: u64 },
    /// ZeRO enabled on a single GPU has nothing to shard across
    ShardingWithoutPeers { zero_stage: u8 },
    /// A checkpoint factor was set but checkpointing is off
    CheckpointFactorUnused { factor: f64 },
    /// Serving the model would not fit on one GPU
    InferenceExceedsCapacity { required_gb: f64, available_gb: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                required_gb,
                available_gb,
            } => write!(
                f,
                "Requires {required_gb:.1} GB per GPU but only {available_gb:.1} GB available; \
                 try a higher ZeRO stage, activation checkpointing or LoRA"
            ),
            Self::NearCapacity { utilization_pct } => write!(
                f,
                "Memory utilization at {utilization_pct:.1}%; fragmentation may cause OOM"
            ),
            Self::BatchRoundedUp {
                requested,
                effective,
            } => write!(
                f,
                "Global batch {requested} rounded up to {effective} by gradient accumulation"
            ),
            Self::ShardingWithoutPeers { zero_stage } => write!(
                f,
                "ZeRO stage {zero_stage} has no effect on a single GPU"
            ),
            Self::CheckpointFactorUnused { factor } => write!(
                f,
                "gradient_checkpoint_factor {factor:.2} ignored: activation checkpointing is off"
            ),
            Self::InferenceExceedsCapacity {
                required_gb,
                available_gb,
            } => write!(
                f,
                "Inference needs {required_gb:.1} GB per GPU, more than the {available_gb:.1} GB available"
            ),
        }
    }
}
