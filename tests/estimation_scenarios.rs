//! End-to-end estimation scenarios through the public API

use approx::assert_relative_eq;
use estimar::params;
use estimar::{
    compare_hardware, estimate, ArchitectureSpec, Calibration, Estimator, FitStatus, GpuCatalog,
    HardwareConfig, OptimizationFlags, PrecisionMode, TrainingBudget, ValidationError, Warning,
    ZeroStage,
};

fn on_gpus(num_gpus: u64) -> (ArchitectureSpec, HardwareConfig) {
    (
        ArchitectureSpec::default().with_gpus(num_gpus),
        HardwareConfig::default().with_gpus(num_gpus),
    )
}

// ============================================================================
// Sharding
// ============================================================================

#[test]
fn test_zero3_divides_weights_across_gpus() {
    let flags = OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters);

    let (arch, hw) = on_gpus(8);
    let sharded = estimate(&arch, &hw, &flags, PrecisionMode::Fp16).unwrap();
    let (arch, hw) = on_gpus(1);
    let single = estimate(&arch, &hw, &flags, PrecisionMode::Fp16).unwrap();

    let total_weights_gb = sharded.parameter_count as f64 * 2.0 / 1e9;
    assert_relative_eq!(single.memory.weights, total_weights_gb, max_relative = 1e-12);
    assert_relative_eq!(
        sharded.memory.weights,
        total_weights_gb / 8.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_zero3_turns_exceeds_into_fits() {
    let (arch, hw) = on_gpus(8);
    let plain = estimate(
        &arch,
        &hw,
        &OptimizationFlags::default(),
        PrecisionMode::Fp16,
    )
    .unwrap();
    let sharded = estimate(
        &arch,
        &hw,
        &OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters),
        PrecisionMode::Fp16,
    )
    .unwrap();

    assert_eq!(plain.fit_status, FitStatus::Exceeds);
    assert_eq!(sharded.fit_status, FitStatus::Fits);
    assert!(sharded.total_memory_per_gpu < plain.total_memory_per_gpu);
}

#[test]
fn test_single_gpu_sharding_warns() {
    let (arch, hw) = on_gpus(1);
    let flags = OptimizationFlags::default().with_zero_stage(ZeroStage::Gradients);
    let result = estimate(&arch, &hw, &flags, PrecisionMode::Bf16).unwrap();
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::ShardingWithoutPeers { zero_stage: 2 })));
}

// ============================================================================
// Mixture of experts
// ============================================================================

#[test]
fn test_moe_ffn_share_matches_routing_ratio() {
    let arch = ArchitectureSpec::default();
    let dense = OptimizationFlags::default();
    let moe = OptimizationFlags::default().with_moe(8, 2);

    let dense_parts = params::breakdown(&arch, &dense.moe).unwrap();
    let moe_parts = params::breakdown(&arch, &moe.moe).unwrap();
    let dense_count = dense_parts.count();
    let moe_count = moe_parts.count();

    assert!(moe_count.total > 4 * dense_count.total);
    assert!(moe_count.active < 2 * dense_count.total);
    assert_relative_eq!(
        moe_parts.ffn_active as f64 / moe_parts.ffn_total as f64,
        2.0 / 8.0
    );
}

#[test]
fn test_moe_result_reports_active_parameters() {
    let (arch, hw) = on_gpus(8);
    let flags = OptimizationFlags::default()
        .with_moe(8, 2)
        .with_zero_stage(ZeroStage::Parameters);
    let result = estimate(&arch, &hw, &flags, PrecisionMode::Bf16).unwrap();

    assert!(result.active_parameter_count < result.parameter_count);
    assert!(result.memory.active_weights < result.memory.weights);
}

// ============================================================================
// Cost and budget
// ============================================================================

#[test]
fn test_step_budget_sets_training_steps() {
    let (arch, hw) = on_gpus(8);
    let estimator = Estimator::new().with_budget(TrainingBudget::Steps(500));
    let result = estimator
        .estimate(
            &arch,
            &hw,
            &OptimizationFlags::default(),
            PrecisionMode::Bf16,
        )
        .unwrap();

    assert_eq!(result.training_steps, 500);
    assert_eq!(
        result.total_tokens,
        500 * arch.batch_size * arch.sequence_length
    );
    assert_relative_eq!(result.gpu_hours, result.training_time_hours * 8.0);
}

#[test]
fn test_more_gpus_cost_no_less_time_no_more() {
    let flags = OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters);
    let (arch, hw) = on_gpus(8);
    let eight = estimate(&arch, &hw, &flags, PrecisionMode::Bf16).unwrap();
    let (arch, hw) = on_gpus(16);
    let sixteen = estimate(&arch, &hw, &flags, PrecisionMode::Bf16).unwrap();

    assert!(sixteen.training_time_hours < eight.training_time_hours);
    assert_relative_eq!(sixteen.gpu_hours, eight.gpu_hours, max_relative = 1e-12);
}

#[test]
fn test_custom_calibration_changes_overhead() {
    let (arch, hw) = on_gpus(8);
    let calibration = Calibration {
        overhead_fraction: 0.0,
        ..Calibration::default()
    };
    let result = Estimator::new()
        .with_calibration(calibration)
        .estimate(
            &arch,
            &hw,
            &OptimizationFlags::default(),
            PrecisionMode::Bf16,
        )
        .unwrap();
    assert_eq!(result.memory.overhead, 0.0);
}

// ============================================================================
// Validation and comparison
// ============================================================================

#[test]
fn test_invalid_input_computes_nothing() {
    let arch = ArchitectureSpec {
        hidden_size: 0,
        ..ArchitectureSpec::default()
    };
    let err = estimate(
        &arch,
        &HardwareConfig::default(),
        &OptimizationFlags::default(),
        PrecisionMode::Bf16,
    )
    .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidHiddenSize(0)));
}

#[test]
fn test_compare_is_sorted_by_cost() {
    let flags = OptimizationFlags::default().with_zero_stage(ZeroStage::Parameters);
    let catalog = GpuCatalog::new();
    let rows = compare_hardware(
        &ArchitectureSpec::default(),
        &flags,
        PrecisionMode::Bf16,
        &catalog,
    )
    .unwrap();

    assert_eq!(rows.len(), catalog.all().len());
    assert!(rows
        .windows(2)
        .all(|w| w[0].total_cost_usd <= w[1].total_cost_usd));
}

#[test]
fn test_result_serializes_with_snake_case_fields() {
    let (arch, hw) = on_gpus(8);
    let result = estimate(
        &arch,
        &hw,
        &OptimizationFlags::default(),
        PrecisionMode::Bf16,
    )
    .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("memory_utilization_pct").is_some());
    assert!(json.get("gradient_accumulation_steps").is_some());
    assert_eq!(json["fit_status"], "exceeds");
}
