//! Named reference architectures.
//!
//! A plan file can start from a preset and override individual fields.
//!
//! Gated FFNs (SwiGLU) carry three projections instead of two, so their
//! expansion ratio is 1.5 × intermediate / hidden.

use serde::Serialize;

use crate::arch::ArchitectureSpec;
use crate::flags::OptimizationFlags;
use crate::units::normalize;

/// Preset used when a plan names none.
pub const DEFAULT_PRESET: &str = "custom";

/// A reference model and its usual batch layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    /// Lookup key (e.g., "llama-3-8b")
    pub name: &'static str,
    /// Architecture family label
    pub family: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Dimensions and batch layout
    pub architecture: ArchitectureSpec,
    /// Structural toggles the model needs (MoE routing)
    pub optimizations: OptimizationFlags,
}

/// All built-in presets.
pub fn all() -> Vec<Preset> {
    vec![
        Preset {
            name: "llama-3-8b",
            family: "Transformer Decoder",
            description: "Meta's Llama-3 8B Instruct model",
            architecture: ArchitectureSpec {
                hidden_size: 4096,
                num_layers: 32,
                num_attention_heads: 32,
                vocab_size: 128_256,
                ffn_expansion_ratio: 5.25,
                sequence_length: 8192,
                batch_size: 32,
                micro_batch_size_per_gpu: 2,
                num_gpus: 8,
            },
            optimizations: OptimizationFlags::default(),
        },
        Preset {
            name: "mixtral-8x7b",
            family: "Transformer Decoder MoE",
            description: "Mistral's Mixtral 8x7B sparse MoE model",
            architecture: ArchitectureSpec {
                hidden_size: 4096,
                num_layers: 32,
                num_attention_heads: 32,
                vocab_size: 32_000,
                ffn_expansion_ratio: 5.25,
                sequence_length: 32_768,
                batch_size: 16,
                micro_batch_size_per_gpu: 1,
                num_gpus: 16,
            },
            optimizations: OptimizationFlags::default().with_moe(8, 2),
        },
        Preset {
            name: "bert-large",
            family: "Transformer Encoder",
            description: "BERT Large (340M parameters)",
            architecture: ArchitectureSpec {
                hidden_size: 1024,
                num_layers: 24,
                num_attention_heads: 16,
                vocab_size: 30_522,
                ffn_expansion_ratio: 4.0,
                sequence_length: 512,
                batch_size: 32,
                micro_batch_size_per_gpu: 8,
                num_gpus: 2,
            },
            optimizations: OptimizationFlags::default(),
        },
        Preset {
            name: "t5-large",
            family: "Transformer Encoder-Decoder",
            description: "T5 Large (770M parameters)",
            architecture: ArchitectureSpec {
                hidden_size: 1024,
                num_layers: 24,
                num_attention_heads: 16,
                vocab_size: 32_128,
                ffn_expansion_ratio: 4.0,
                sequence_length: 512,
                batch_size: 32,
                micro_batch_size_per_gpu: 4,
                num_gpus: 4,
            },
            optimizations: OptimizationFlags::default(),
        },
        Preset {
            name: DEFAULT_PRESET,
            family: "Transformer Decoder",
            description: "Custom configuration",
            architecture: ArchitectureSpec::default(),
            optimizations: OptimizationFlags::default(),
        },
    ]
}

/// Look up a preset, ignoring case, dashes and underscores.
pub fn get(name: &str) -> Option<Preset> {
    let wanted = normalize(name);
    all().into_iter().find(|p| normalize(p.name) == wanted)
}

/// Preset names in display order.
pub fn names() -> Vec<&'static str> {
    all().iter().map(|p| p.name).collect()
}
