//! Gradient accumulation (BatchScheduler).

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// How a global batch is assembled from per-GPU micro-batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSchedule {
    /// Micro-batches accumulated before each optimizer step
    pub accumulation_steps: u64,
    /// Samples per optimizer step after rounding up
    pub effective_batch_size: u64,
}

impl BatchSchedule {
    /// Plan accumulation for a requested global batch.
    pub fn plan(global_batch: u64, micro_batch: u64, num_gpus: u64) -> Result<Self> {
        let steps = accumulation_steps(global_batch, micro_batch, num_gpus)?;
        Ok(Self {
            accumulation_steps: steps,
            effective_batch_size: steps
                .saturating_mul(micro_batch)
                .saturating_mul(num_gpus),
        })
    }

    /// Effective batch is larger than what was asked for.
    #[must_use]
    pub fn rounded_up(&self, global_batch: u64) -> bool {
        self.effective_batch_size > global_batch
    }
}

/// `ceil(global / (micro × gpus))`, never below 1.
pub fn accumulation_steps(global_batch: u64, micro_batch: u64, num_gpus: u64) -> Result<u64> {
    if global_batch == 0 {
        return Err(ValidationError::InvalidBatchSize(global_batch));
    }
    if micro_batch == 0 {
        return Err(ValidationError::InvalidMicroBatchSize(micro_batch));
    }
    if num_gpus == 0 {
        return Err(ValidationError::InvalidGpuCount(num_gpus));
    }

    let per_step = micro_batch.saturating_mul(num_gpus);
    Ok(global_batch.div_ceil(per_step).max(1))
}
