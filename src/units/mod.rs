//! Static reference data (UnitTable).
//!
//! Precision byte-widths, the GPU catalog (capacity, power, price), grid
//! carbon intensities and the quantization format table. Nothing here is
//! fetched at runtime; callers may replace catalog entries with their own.

mod gpu;
mod grid;
mod precision;
mod quant;

pub use gpu::{GpuCatalog, GpuSpec};
pub(crate) use gpu::normalize;
pub use grid::{GridRegion, GridTable};
pub use precision::PrecisionMode;
pub use quant::{QuantFormat, QUANT_FORMATS};

/// Decimal gigabyte, the unit of every memory figure the engine reports.
pub const BYTES_PER_GB: f64 = 1e9;

/// Reference tables bundled together for callers that want the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTable {
    /// GPU capacity, power and pricing
    pub gpus: GpuCatalog,
    /// Grid carbon intensities
    pub grids: GridTable,
}

/// Convert a byte count held as `f64` into decimal GB.
#[inline]
#[must_use]
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}
