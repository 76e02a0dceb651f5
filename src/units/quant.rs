//! Quantization format reference table.

use serde::Serialize;

/// One weight storage format and its memory footprint relative to FP32.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantFormat {
    /// Format name
    pub name: &'static str,
    /// Bits per weight
    pub bits: u8,
    /// Typical quality impact
    pub impact: &'static str,
}

impl QuantFormat {
    /// Memory relative to FP32 storage.
    #[must_use]
    pub fn memory_factor(&self) -> f64 {
        f64::from(self.bits) / 32.0
    }
}

/// Common training and post-training quantization formats.
pub const QUANT_FORMATS: &[QuantFormat] = &[
    QuantFormat {
        name: "FP32",
        bits: 32,
        impact: "Baseline accuracy and memory",
    },
    QuantFormat {
        name: "FP16",
        bits: 16,
        impact: "<0.1% delta, faster via tensor cores",
    },
    QuantFormat {
        name: "BF16",
        bits: 16,
        impact: "<0.1% delta, better stability than FP16",
    },
    QuantFormat {
        name: "FP8 (E4M3)",
        bits: 8,
        impact: "<0.3% delta with TransformerEngine",
    },
    QuantFormat {
        name: "FP8 (E5M2)",
        bits: 8,
        impact: "Alternative FP8 layout, similar impact",
    },
    QuantFormat {
        name: "INT8 (W8A8 PTQ)",
        bits: 8,
        impact: "0.1-1% delta, needs calibration (e.g. SmoothQuant)",
    },
    QuantFormat {
        name: "AWQ (4-bit)",
        bits: 4,
        impact: "<1% delta, activation-aware PTQ",
    },
    QuantFormat {
        name: "GPTQ (4-bit)",
        bits: 4,
        impact: "<1% delta, layer-wise PTQ",
    },
];
