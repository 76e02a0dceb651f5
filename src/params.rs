//! Parameter counting (ParameterCounter).
//!
//! Standard decoder approximation per layer:
//!
//! ```text
//! attention = 4·h²              (Q, K, V, O projections)
//! ffn       = 2·h²·ratio        (up + down projections)
//! embed     = 2·vocab·h         (untied input embedding + output head)
//! ```
//!
//! With mixture-of-experts every expert owns an FFN, so the total count
//! scales the FFN term by `experts` while the active count scales it by
//! `top_k`. Layer norms and biases are ignored.

use serde::{Deserialize, Serialize};

use crate::arch::ArchitectureSpec;
use crate::error::{Result, ValidationError};
use crate::flags::{LoraFlags, MoeFlags};

/// Projections adapted by LoRA in every layer (Q, K, V, O).
pub const LORA_TARGET_MODULES: u64 = 4;

/// Total and per-token active parameter counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterCount {
    /// Every stored parameter
    pub total: u64,
    /// Parameters evaluated per token
    pub active: u64,
}

impl ParameterCount {
    /// Share of parameters touched per token.
    #[must_use]
    pub fn active_fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.active as f64 / self.total as f64
    }
}

/// Per-component counts for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBreakdown {
    /// Attention projections, all layers
    pub attention: u64,
    /// FFN weights stored, all layers and experts
    pub ffn_total: u64,
    /// FFN weights evaluated per token, all layers
    pub ffn_active: u64,
    /// Input embedding plus output head
    pub embeddings: u64,
}

impl ParameterBreakdown {
    /// Collapse into total/active counts.
    #[must_use]
    pub fn count(&self) -> ParameterCount {
        ParameterCount {
            total: self.attention + self.ffn_total + self.embeddings,
            active: self.attention + self.ffn_active + self.embeddings,
        }
    }
}

/// Count parameters for `arch`, rejecting dimensions that would make the
/// count meaningless before doing any arithmetic.
pub fn count(arch: &ArchitectureSpec, moe: &MoeFlags) -> Result<ParameterCount> {
    breakdown(arch, moe).map(|b| b.count())
}

/// Component-level parameter counts.
pub fn breakdown(arch: &ArchitectureSpec, moe: &MoeFlags) -> Result<ParameterBreakdown> {
    validate_dimensions(arch, moe)?;

    let h = arch.hidden_size;
    let layers = arch.num_layers;
    let h_sq = h.checked_mul(h).ok_or(ValidationError::ParameterOverflow)?;

    let attention_per_layer = checked(h_sq, 4)?;
    let ffn_per_layer = ffn_params_per_layer(h_sq, arch.ffn_expansion_ratio)?;

    let (experts, top_k) = if moe.enabled {
        (moe.experts, moe.top_k)
    } else {
        (1, 1)
    };

    let attention = checked(attention_per_layer, layers)?;
    let ffn_total = checked(checked(ffn_per_layer, experts)?, layers)?;
    let ffn_active = checked(checked(ffn_per_layer, top_k)?, layers)?;
    let embeddings = checked(checked(arch.vocab_size, h)?, 2)?;

    attention
        .checked_add(ffn_total)
        .and_then(|n| n.checked_add(embeddings))
        .ok_or(ValidationError::ParameterOverflow)?;

    Ok(ParameterBreakdown {
        attention,
        ffn_total,
        ffn_active,
        embeddings,
    })
}

/// Parameters updated by the optimizer.
///
/// Full training updates every stored parameter. With LoRA only the rank-`r`
/// adapter pairs on the four attention projections train:
/// `r × (4 × h × layers) × 2`.
#[must_use]
pub fn trainable(params: &ParameterCount, arch: &ArchitectureSpec, lora: &LoraFlags) -> u64 {
    if !lora.enabled {
        return params.total;
    }
    let adapted_dims = LORA_TARGET_MODULES
        .saturating_mul(arch.hidden_size)
        .saturating_mul(arch.num_layers);
    lora.rank
        .saturating_mul(adapted_dims)
        .saturating_mul(2)
        .min(params.total)
}

fn validate_dimensions(arch: &ArchitectureSpec, moe: &MoeFlags) -> Result<()> {
    if arch.hidden_size == 0 {
        return Err(ValidationError::InvalidHiddenSize(arch.hidden_size));
    }
    if arch.num_layers == 0 {
        return Err(ValidationError::InvalidNumLayers(arch.num_layers));
    }
    if arch.vocab_size == 0 {
        return Err(ValidationError::InvalidVocabSize(arch.vocab_size));
    }
    if !arch.ffn_expansion_ratio.is_finite() || arch.ffn_expansion_ratio <= 0.0 {
        return Err(ValidationError::InvalidFfnRatio(arch.ffn_expansion_ratio));
    }
    if moe.enabled {
        if moe.experts == 0 {
            return Err(ValidationError::InvalidExpertCount(moe.experts));
        }
        if moe.top_k == 0 || moe.top_k > moe.experts {
            return Err(ValidationError::InvalidTopK {
                top_k: moe.top_k,
                experts: moe.experts,
            });
        }
    }
    Ok(())
}

fn ffn_params_per_layer(h_sq: u64, ratio: f64) -> Result<u64> {
    let params = (2.0 * h_sq as f64 * ratio).round();
    if params >= u64::MAX as f64 {
        return Err(ValidationError::ParameterOverflow);
    }
    Ok(params as u64)
}

fn checked(a: u64, b: u64) -> Result<u64> {
    a.checked_mul(b).ok_or(ValidationError::ParameterOverflow)
}
