//! On-disk checkpoint sizes.

use serde::{Deserialize, Serialize};

use super::adjust::{self, ADAM_STATE_BYTES};
use crate::flags::OptimizationFlags;
use crate::units::{bytes_to_gb, PrecisionMode};

/// Unsharded sizes in GB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskSizes {
    /// Exported weights at storage precision
    pub weights: f64,
    /// Optimizer moments for every trainable parameter
    pub optimizer: f64,
    /// Resumable checkpoint: weights + optimizer
    pub checkpoint: f64,
}

impl DiskSizes {
    /// Sizes for `total` stored and `trainable` updated parameters.
    #[must_use]
    pub fn estimate(
        total: u64,
        trainable: u64,
        flags: &OptimizationFlags,
        precision: PrecisionMode,
    ) -> Self {
        let weights = bytes_to_gb(total as f64 * adjust::weight_bytes(flags, precision));
        let optimizer = bytes_to_gb(trainable as f64 * ADAM_STATE_BYTES);
        Self {
            weights,
            optimizer,
            checkpoint: weights + optimizer,
        }
    }
}
