//! Plan files and CLI arguments
//!
//! A plan is a YAML document naming a preset, a catalog GPU and any
//! overrides:
//!
//! ```yaml
//! preset: llama-3-8b
//! gpu: h100-80-sxm
//! precision: bf16
//! optimizations:
//!   flash_attention: true
//!   zero_stage: 3
//! budget:
//!   steps: 100000
//! grid_region: eu-average
//! ```

mod cli;
mod loader;
mod schema;

pub use cli::{parse_args, Cli, Command, CompareArgs, EstimateArgs, ListArgs, ValidateArgs};
pub use loader::{load_plan, load_resolved, ResolvedPlan};
pub use schema::{
    ArchitectureOverrides, BudgetSpec, HardwareOverrides, OptimizationOverrides, PlanSpec,
};
