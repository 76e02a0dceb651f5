//! Model architecture and batch layout.

use serde::{Deserialize, Serialize};

/// Transformer dimensions plus the data-parallel batch layout.
///
/// Integer fields must be positive; `batch_size` need not be a multiple of
/// `micro_batch_size_per_gpu * num_gpus` (the scheduler rounds up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    /// Model width
    pub hidden_size: u64,
    /// Transformer block count
    pub num_layers: u64,
    /// Attention heads per layer
    pub num_attention_heads: u64,
    /// Vocabulary size
    pub vocab_size: u64,
    /// FFN intermediate size divided by hidden size
    #[serde(default = "default_ffn_ratio")]
    pub ffn_expansion_ratio: f64,
    /// Tokens per sequence
    pub sequence_length: u64,
    /// Global batch size (sequences per optimizer step)
    pub batch_size: u64,
    /// Sequences per GPU per forward/backward pass
    pub micro_batch_size_per_gpu: u64,
    /// Data-parallel GPU count
    pub num_gpus: u64,
}

fn default_ffn_ratio() -> f64 {
    4.0
}

impl Default for ArchitectureSpec {
    fn default() -> Self {
        Self {
            hidden_size: 4096,
            num_layers: 32,
            num_attention_heads: 32,
            vocab_size: 32000,
            ffn_expansion_ratio: default_ffn_ratio(),
            sequence_length: 4096,
            batch_size: 32,
            micro_batch_size_per_gpu: 2,
            num_gpus: 8,
        }
    }
}

impl ArchitectureSpec {
    /// Set the GPU count.
    #[must_use]
    pub fn with_gpus(mut self, num_gpus: u64) -> Self {
        self.num_gpus = num_gpus;
        self
    }

    /// Set global and per-GPU micro batch sizes.
    #[must_use]
    pub fn with_batch(mut self, global: u64, micro_per_gpu: u64) -> Self {
        self.batch_size = global;
        self.micro_batch_size_per_gpu = micro_per_gpu;
        self
    }

    /// Set sequence length.
    #[must_use]
    pub fn with_sequence_length(mut self, sequence_length: u64) -> Self {
        self.sequence_length = sequence_length;
        self
    }

    /// Tokens consumed by one optimizer step at the requested global batch.
    #[must_use]
    pub fn tokens_per_step(&self) -> u64 {
        self.batch_size.saturating_mul(self.sequence_length)
    }

    /// FFN intermediate width implied by the expansion ratio.
    #[must_use]
    pub fn intermediate_size(&self) -> u64 {
        (self.hidden_size as f64 * self.ffn_expansion_ratio).round() as u64
    }
}
