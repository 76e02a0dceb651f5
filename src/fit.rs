//! Hardware fit check (HardwareFitValidator).
//!
//! An over-capacity plan is reported, not rejected: `Exceeds` is ordinary
//! result data so the caller can still show the breakdown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hardware::HardwareConfig;

/// Utilization above which a plan leaves too little headroom.
pub const DEFAULT_TIGHT_THRESHOLD_PCT: f64 = 95.0;

/// Feasibility of a plan on its target GPUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// At or below the tight threshold
    Fits,
    /// Above the threshold, at or below capacity
    Tight,
    /// Above capacity
    Exceeds,
}

impl FitStatus {
    /// Plan runs without changes (`Fits` or `Tight`).
    #[must_use]
    pub fn is_feasible(self) -> bool {
        self != Self::Exceeds
    }

    /// Classify a utilization percentage.
    #[must_use]
    pub fn classify(utilization_pct: f64, tight_threshold_pct: f64) -> Self {
        if utilization_pct <= tight_threshold_pct {
            Self::Fits
        } else if utilization_pct <= 100.0 {
            Self::Tight
        } else {
            Self::Exceeds
        }
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fits => "fits",
            Self::Tight => "tight",
            Self::Exceeds => "exceeds",
        };
        f.write_str(label)
    }
}

/// Utilization and status for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// `total / capacity × 100`, not clamped
    pub utilization_pct: f64,
    /// Classification of `utilization_pct`
    pub status: FitStatus,
}

/// Compare per-GPU memory against GPU capacity using the default threshold.
#[must_use]
pub fn validate(total_memory_per_gpu: f64, hardware: &HardwareConfig) -> FitReport {
    validate_with_threshold(total_memory_per_gpu, hardware, DEFAULT_TIGHT_THRESHOLD_PCT)
}

/// Compare per-GPU memory against GPU capacity.
#[must_use]
pub fn validate_with_threshold(
    total_memory_per_gpu: f64,
    hardware: &HardwareConfig,
    tight_threshold_pct: f64,
) -> FitReport {
    let utilization_pct = total_memory_per_gpu / hardware.memory_per_gpu * 100.0;
    FitReport {
        utilization_pct,
        status: FitStatus::classify(utilization_pct, tight_threshold_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn h100() -> HardwareConfig {
        HardwareConfig::default()
    }

    #[test]
    fn test_fits_below_threshold() {
        let report = validate(40.0, &h100());
        assert_relative_eq!(report.utilization_pct, 50.0);
        assert_eq!(report.status, FitStatus::Fits);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(validate(72.0, &h100()).status, FitStatus::Fits);
        assert_eq!(validate(76.8, &h100()).status, FitStatus::Tight);
        assert_eq!(validate(80.0, &h100()).status, FitStatus::Tight);
        assert_eq!(validate(80.1, &h100()).status, FitStatus::Exceeds);
    }

    #[test]
    fn test_utilization_not_clamped() {
        let report = validate(160.0, &h100());
        assert_relative_eq!(report.utilization_pct, 200.0);
        assert!(!report.status.is_feasible());
    }

    #[test]
    fn test_custom_threshold() {
        let report = validate_with_threshold(72.0, &h100(), 85.0);
        assert_eq!(report.status, FitStatus::Tight);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&FitStatus::Exceeds).unwrap();
        assert_eq!(json, "\"exceeds\"");
        assert_eq!(FitStatus::Tight.to_string(), "tight");
    }
}
