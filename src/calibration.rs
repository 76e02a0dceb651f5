//! Tunable engine constants.
//!
//! The formulas are standard approximations; these constants are what a
//! caller adjusts to match measured numbers from a specific framework.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Calibration constants used across the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Activation elements stored per token, per hidden unit, per layer.
    /// Multiplied by the precision byte-width.
    pub activation_tensors_per_token: f64,
    /// Activation multiplier when FlashAttention is on (0, 1].
    pub flash_attention_factor: f64,
    /// Communication buffers and fragmentation, as a fraction of
    /// weights + gradients + optimizer.
    pub overhead_fraction: f64,
    /// Compute-optimal tokens per parameter.
    pub chinchilla_tokens_per_param: f64,
    /// Utilization above which a plan is `Tight` rather than `Fits`.
    pub tight_threshold_pct: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            activation_tensors_per_token: 4.0,
            flash_attention_factor: 0.5,
            overhead_fraction: 0.08,
            chinchilla_tokens_per_param: 20.0,
            tight_threshold_pct: 95.0,
        }
    }
}

impl Calibration {
    /// Reject constants that would produce negative or undefined figures.
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64, bool); 5] = [
            (
                "activation_tensors_per_token",
                self.activation_tensors_per_token,
                self.activation_tensors_per_token > 0.0,
            ),
            (
                "flash_attention_factor",
                self.flash_attention_factor,
                self.flash_attention_factor > 0.0 && self.flash_attention_factor <= 1.0,
            ),
            (
                "overhead_fraction",
                self.overhead_fraction,
                (0.0..=1.0).contains(&self.overhead_fraction),
            ),
            (
                "chinchilla_tokens_per_param",
                self.chinchilla_tokens_per_param,
                self.chinchilla_tokens_per_param > 0.0,
            ),
            (
                "tight_threshold_pct",
                self.tight_threshold_pct,
                self.tight_threshold_pct > 0.0 && self.tight_threshold_pct <= 100.0,
            ),
        ];

        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(ValidationError::InvalidCalibration { name, value });
            }
        }
        Ok(())
    }
}
