//! CLI command tests
//!
//! Exercise each command against plan files written to a temp directory.

use super::*;
use crate::config::*;
use crate::units::{GpuCatalog, QUANT_FORMATS};
use estimar_common::EstimarError;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a plan that fits comfortably on 8 × A100-80GB
fn create_test_plan(dir: &TempDir) -> PathBuf {
    write_plan(
        dir,
        r#"
preset: llama-3-8b
gpu: a100-80-sxm
precision: bf16
optimizations:
  flash_attention: true
  activation_checkpointing: true
  gradient_checkpoint_factor: 0.3
  zero_stage: 3
budget:
  steps: 1000
"#,
    )
}

fn write_plan(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("plan.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

fn sample_plan(dir: &TempDir) -> ResolvedPlan {
    load_resolved(create_test_plan(dir)).unwrap()
}

// =========================================================================
// estimate
// =========================================================================

#[test]
fn test_estimate_command_table() {
    let dir = TempDir::new().unwrap();
    let args = EstimateArgs {
        plan: create_test_plan(&dir),
        format: OutputFormat::Table,
        gpus: None,
        precision: None,
    };
    assert!(estimate::run_estimate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_estimate_command_json_with_overrides() {
    let dir = TempDir::new().unwrap();
    let args = EstimateArgs {
        plan: create_test_plan(&dir),
        format: OutputFormat::Json,
        gpus: Some(16),
        precision: Some(crate::units::PrecisionMode::Fp32),
    };
    assert!(estimate::run_estimate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_estimate_command_missing_plan() {
    let dir = TempDir::new().unwrap();
    let args = EstimateArgs {
        plan: dir.path().join("missing.yaml"),
        format: OutputFormat::Table,
        gpus: None,
        precision: None,
    };
    let err = estimate::run_estimate(args, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, EstimarError::ConfigNotFound { .. }));
}

#[test]
fn test_apply_overrides_sets_gpus_and_precision() {
    let dir = TempDir::new().unwrap();
    let args = EstimateArgs {
        plan: create_test_plan(&dir),
        format: OutputFormat::Table,
        gpus: Some(4),
        precision: Some(crate::units::PrecisionMode::Fp32),
    };
    let plan = estimate::apply_overrides(sample_plan(&dir), &args);
    assert_eq!(plan.hardware.num_gpus, 4);
    assert_eq!(plan.architecture.num_gpus, 4);
    assert_eq!(plan.precision, crate::units::PrecisionMode::Fp32);
}

#[test]
fn test_format_result_sections() {
    let dir = TempDir::new().unwrap();
    let result = sample_plan(&dir).estimate().unwrap();
    let out = estimate::format_result(&result);
    assert!(out.contains("Weights"));
    assert!(out.contains("Accumulation steps"));
    assert!(out.contains("Utilization"));
    assert!(out.contains("Checkpoint"));
}

#[test]
fn test_format_warnings_none_when_clean() {
    let dir = TempDir::new().unwrap();
    let mut result = sample_plan(&dir).estimate().unwrap();
    result.warnings.clear();
    assert!(estimate::format_warnings(&result).is_none());
}

// =========================================================================
// validate
// =========================================================================

#[test]
fn test_validate_command_basic() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        plan: create_test_plan(&dir),
        detailed: false,
    };
    assert!(validate::run_validate(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_validate_command_detailed() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        plan: create_test_plan(&dir),
        detailed: true,
    };
    assert!(validate::run_validate(args, LogLevel::Normal).is_ok());
}

#[test]
fn test_validate_command_rejects_bad_checkpoint_factor() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
preset: llama-3-8b
optimizations:
  activation_checkpointing: true
  gradient_checkpoint_factor: 1.5
"#,
    );
    let args = ValidateArgs {
        plan: path,
        detailed: false,
    };
    let err = validate::run_validate(args, LogLevel::Quiet).unwrap_err();
    assert!(err.is_user_error());
}

#[test]
fn test_validate_and_estimate_agree_on_parameter_overflow() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(&dir, "architecture:\n  hidden_size: 5000000000\n");

    let validated = validate::run_validate(
        ValidateArgs {
            plan: path.clone(),
            detailed: false,
        },
        LogLevel::Quiet,
    );
    let estimated = estimate::run_estimate(
        EstimateArgs {
            plan: path,
            format: OutputFormat::Json,
            gpus: None,
            precision: None,
        },
        LogLevel::Quiet,
    );

    let validate_err = validated.unwrap_err();
    let estimate_err = estimated.unwrap_err();
    assert_eq!(validate_err.code(), "E003");
    assert_eq!(validate_err.code(), estimate_err.code());
}

#[test]
fn test_format_optimization_info_lists_enabled() {
    let dir = TempDir::new().unwrap();
    let info = validate::format_optimization_info(&sample_plan(&dir));
    assert!(info.contains("ZeRO stage: 3"));
    assert!(info.contains("FlashAttention"));
    assert!(info.contains("keep 30%"));
    assert!(!info.contains("LoRA"));
}

#[test]
fn test_format_hardware_info_names_gpu() {
    let dir = TempDir::new().unwrap();
    let info = validate::format_hardware_info(&sample_plan(&dir));
    assert!(info.contains("a100-80-sxm"));
    assert!(info.contains("80 GB"));
}

// =========================================================================
// compare
// =========================================================================

#[test]
fn test_compare_command_table() {
    let dir = TempDir::new().unwrap();
    let args = CompareArgs {
        plan: create_test_plan(&dir),
        format: OutputFormat::Table,
        feasible_only: false,
    };
    assert!(compare::run_compare(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_compare_command_feasible_only_json() {
    let dir = TempDir::new().unwrap();
    let args = CompareArgs {
        plan: create_test_plan(&dir),
        format: OutputFormat::Json,
        feasible_only: true,
    };
    assert!(compare::run_compare(args, LogLevel::Quiet).is_ok());
}

#[test]
fn test_format_comparison_one_row_per_gpu() {
    let dir = TempDir::new().unwrap();
    let catalog = GpuCatalog::new();
    let rows = sample_plan(&dir).compare(&catalog).unwrap();
    assert_eq!(rows.len(), catalog.all().len());
    let out = compare::format_comparison(&rows);
    for gpu in catalog.ids() {
        assert!(out.contains(gpu));
    }
}

// =========================================================================
// catalog listings
// =========================================================================

#[test]
fn test_list_commands_succeed() {
    for format in [OutputFormat::Table, OutputFormat::Json] {
        assert!(catalog::run_presets(format).is_ok());
        assert!(catalog::run_gpus(format).is_ok());
        assert!(catalog::run_quant(format).is_ok());
    }
}

#[test]
fn test_format_presets_shows_sizes() {
    let out = catalog::format_presets(&crate::presets::all());
    assert!(out.contains("llama-3-8b"));
    assert!(out.contains("mixtral-8x7b"));
    assert!(out.contains("B"));
}

#[test]
fn test_format_quant_lists_every_format() {
    let formats = QUANT_FORMATS.to_vec();
    let out = catalog::format_quant(&formats);
    for q in &formats {
        assert!(out.contains(q.name));
    }
}

#[test]
fn test_render_json_is_parseable() {
    let gpus = GpuCatalog::new().all().to_vec();
    let json = render(OutputFormat::Json, gpus.as_slice(), catalog::format_gpus).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), gpus.len());
}

// =========================================================================
// dispatch
// =========================================================================

#[test]
fn test_run_command_dispatches_estimate() {
    let dir = TempDir::new().unwrap();
    let plan = create_test_plan(&dir);
    let cli = parse_args([
        "estimar",
        "--quiet",
        "estimate",
        plan.to_str().unwrap(),
        "--format",
        "json",
    ])
    .unwrap();
    assert!(run_command(cli).is_ok());
}

#[test]
fn test_run_command_dispatches_listing() {
    let cli = parse_args(["estimar", "gpus"]).unwrap();
    assert!(run_command(cli).is_ok());
}
