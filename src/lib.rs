//! Estimar: LLM training capacity planning
//!
//! Estimar answers the questions asked before a training run is launched:
//! how many parameters the model has, how much memory each GPU needs
//! under a given set of optimizations, whether that fits, how long the run
//! takes and what it costs in dollars, energy and carbon.
//!
//! # Toyota Way Principles
//!
//! - **Jidoka**: Invalid inputs are rejected with actionable errors before
//!   any arithmetic runs
//! - **Genchi Genbutsu**: Every figure is broken down so the dominant term
//!   is visible
//! - **Heijunka**: Hardware comparisons are ranked on one cost axis
//!
//! # Example
//!
//! ```
//! use estimar::{estimate, ArchitectureSpec, HardwareConfig, OptimizationFlags, PrecisionMode};
//!
//! let arch = ArchitectureSpec::default();
//! let hw = HardwareConfig::default();
//! let flags = OptimizationFlags::default().with_flash_attention(true);
//!
//! let result = estimate(&arch, &hw, &flags, PrecisionMode::Bf16).unwrap();
//! println!("{:.1} GB per GPU ({})", result.total_memory_per_gpu, result.fit_status);
//! ```

pub mod arch;
pub mod calibration;
pub mod cli;
pub mod config;
pub mod cost;
pub mod error;
pub mod estimate;
pub mod fit;
pub mod flags;
pub mod hardware;
pub mod memory;
pub mod params;
pub mod presets;
pub mod schedule;
pub mod units;

pub use arch::ArchitectureSpec;
pub use calibration::Calibration;
pub use cost::{CostEnergy, TrainingBudget};
pub use error::{Result, ValidationError};
pub use estimate::{
    compare_hardware, estimate, EstimationResult, Estimator, HardwareComparison, Warning,
};
pub use fit::FitStatus;
pub use flags::{LoraFlags, MoeFlags, OptimizationFlags, QuantizationFlags, ZeroStage};
pub use hardware::HardwareConfig;
pub use memory::{DiskSizes, InferenceMemory, MemoryBreakdown};
pub use params::ParameterCount;
pub use units::{GpuCatalog, GpuSpec, PrecisionMode, UnitTable};
