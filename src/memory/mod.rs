//! Per-GPU memory breakdown (MemoryBreakdownCalculator).
//!
//! Five terms are reported in GB (1e9 bytes): weights, gradients, optimizer
//! state, activations and overhead. Optimizations are applied as independent
//! adjustments in a fixed order, see [`adjust`].
//!
//! # Toyota Way: 見える化 (Mieruka)
//!
//! Every term is visible on its own so a plan that does not fit shows which
//! buffer to attack first.

pub mod adjust;
mod disk;
mod inference;

pub use disk::DiskSizes;
pub use inference::InferenceMemory;

use serde::{Deserialize, Serialize};

use crate::arch::ArchitectureSpec;
use crate::calibration::Calibration;
use crate::flags::OptimizationFlags;
use crate::params::{self, ParameterCount};
use crate::units::{bytes_to_gb, PrecisionMode};

/// Memory per GPU in GB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    /// Model weights resident on each GPU
    pub weights: f64,
    /// Gradient buffers
    pub gradients: f64,
    /// Optimizer moments
    pub optimizer: f64,
    /// Saved activations for one micro-batch
    pub activations: f64,
    /// Communication buffers and fragmentation
    pub overhead: f64,
    /// Weights evaluated per token (equals `weights` for dense models)
    pub active_weights: f64,
}

impl MemoryBreakdown {
    /// Sum of the five reported terms. `active_weights` is a subset of
    /// `weights` and is not added again.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights + self.gradients + self.optimizer + self.activations + self.overhead
    }

    /// Largest term and its name.
    #[must_use]
    pub fn dominant(&self) -> (&'static str, f64) {
        [
            ("weights", self.weights),
            ("gradients", self.gradients),
            ("optimizer", self.optimizer),
            ("activations", self.activations),
            ("overhead", self.overhead),
        ]
        .into_iter()
        .fold(("weights", f64::MIN), |best, term| {
            if term.1 > best.1 {
                term
            } else {
                best
            }
        })
    }
}

/// Compute the per-GPU breakdown for a validated configuration.
#[must_use]
pub fn breakdown(
    params: &ParameterCount,
    arch: &ArchitectureSpec,
    flags: &OptimizationFlags,
    precision: PrecisionMode,
    num_gpus: u64,
    calibration: &Calibration,
) -> MemoryBreakdown {
    let trainable = params::trainable(params, arch, &flags.lora);

    let mut terms = adjust::apply_precision(params, arch, flags, precision, calibration);
    adjust::apply_sharding(&mut terms, flags.zero_stage, num_gpus);
    adjust::apply_checkpointing(&mut terms, flags, calibration);
    adjust::apply_moe_active_fraction(&mut terms, params);
    adjust::apply_lora_trainable_fraction(&mut terms, trainable, params.total);
    adjust::apply_cpu_offload(&mut terms, flags.cpu_offload_pct);

    let overhead =
        calibration.overhead_fraction * (terms.weights + terms.gradients + terms.optimizer);

    MemoryBreakdown {
        weights: bytes_to_gb(terms.weights),
        gradients: bytes_to_gb(terms.gradients),
        optimizer: bytes_to_gb(terms.optimizer),
        activations: bytes_to_gb(terms.activations),
        overhead: bytes_to_gb(overhead),
        active_weights: bytes_to_gb(terms.active_weights),
    }
}
