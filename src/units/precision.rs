//! Numeric precision modes and their storage widths.

use serde::{Deserialize, Serialize};

/// Training precision for weights, gradients and activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionMode {
    /// IEEE single precision
    Fp32,
    /// IEEE half precision
    Fp16,
    /// Brain float 16 (better dynamic range for training)
    #[default]
    Bf16,
    /// 8-bit integer
    Int8,
}

impl PrecisionMode {
    /// Every supported mode, widest first.
    pub const ALL: [PrecisionMode; 4] = [Self::Fp32, Self::Fp16, Self::Bf16, Self::Int8];

    /// Bytes per stored parameter.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Fp32 => 4,
            Self::Fp16 | Self::Bf16 => 2,
            Self::Int8 => 1,
        }
    }

    /// Bytes per gradient element.
    ///
    /// Gradients are never held below half precision.
    #[must_use]
    pub const fn gradient_bytes(self) -> u64 {
        match self {
            Self::Fp32 => 4,
            Self::Fp16 | Self::Bf16 | Self::Int8 => 2,
        }
    }

    /// Lowercase identifier used in plan files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::Fp16 => "fp16",
            Self::Bf16 => "bf16",
            Self::Int8 => "int8",
        }
    }
}

impl std::str::FromStr for PrecisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fp32" | "float32" => Ok(Self::Fp32),
            "fp16" | "float16" | "half" => Ok(Self::Fp16),
            "bf16" | "bfloat16" => Ok(Self::Bf16),
            "int8" => Ok(Self::Int8),
            _ => Err(format!("Unknown precision: {s}. Use: fp32, fp16, bf16, int8")),
        }
    }
}

impl std::fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_widths() {
        assert_eq!(PrecisionMode::Fp32.bytes(), 4);
        assert_eq!(PrecisionMode::Fp16.bytes(), 2);
        assert_eq!(PrecisionMode::Bf16.bytes(), 2);
        assert_eq!(PrecisionMode::Int8.bytes(), 1);
    }

    #[test]
    fn test_int8_gradients_stay_half_precision() {
        assert_eq!(PrecisionMode::Int8.gradient_bytes(), 2);
        for mode in PrecisionMode::ALL {
            assert!(mode.gradient_bytes() >= mode.bytes());
        }
    }

    #[test]
    fn test_precision_parsing() {
        assert_eq!("BF16".parse::<PrecisionMode>().unwrap(), PrecisionMode::Bf16);
        assert_eq!("half".parse::<PrecisionMode>().unwrap(), PrecisionMode::Fp16);
        assert!("fp8".parse::<PrecisionMode>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PrecisionMode::Int8).unwrap();
        assert_eq!(json, "\"int8\"");
        let back: PrecisionMode = serde_json::from_str("\"fp32\"").unwrap();
        assert_eq!(back, PrecisionMode::Fp32);
    }
}
