//! Validate command implementation

use estimar_common::Result;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_resolved, ResolvedPlan, ValidateArgs};
use crate::estimate::validate_inputs;

/// Format architecture information as a string
pub fn format_architecture_info(plan: &ResolvedPlan) -> String {
    let a = &plan.architecture;
    format!(
        "  Preset: {}\n  Hidden size: {}\n  Layers: {}\n  Attention heads: {}\n  Vocabulary: {}\n  FFN ratio: {}\n  Sequence length: {}\n  Batch: {} global, {} per GPU",
        plan.preset,
        a.hidden_size,
        a.num_layers,
        a.num_attention_heads,
        a.vocab_size,
        a.ffn_expansion_ratio,
        a.sequence_length,
        a.batch_size,
        a.micro_batch_size_per_gpu
    )
}

/// Format hardware information as a string
pub fn format_hardware_info(plan: &ResolvedPlan) -> String {
    let h = &plan.hardware;
    let mut lines = Vec::new();
    if let Some(gpu) = &plan.gpu {
        lines.push(format!("  GPU: {gpu}"));
    }
    lines.push(format!("  GPUs: {} × {} GB", h.num_gpus, h.memory_per_gpu));
    lines.push(format!("  Price: ${:.2}/GPU-hour", h.cost_per_gpu_hour));
    lines.push(format!(
        "  Throughput: {} tokens/s/GPU",
        h.tokens_per_second_per_gpu
    ));
    lines.push(format!(
        "  Power: {} W, grid {} gCO2/kWh",
        h.power_draw_watts, h.grid_carbon_intensity
    ));
    lines.join("\n")
}

/// Format enabled optimizations as a string
pub fn format_optimization_info(plan: &ResolvedPlan) -> String {
    let f = &plan.flags;
    let mut lines = vec![
        format!("  Precision: {}", plan.precision),
        format!("  ZeRO stage: {}", u8::from(f.zero_stage)),
    ];
    if f.flash_attention {
        lines.push("  FlashAttention: on".to_string());
    }
    if f.activation_checkpointing {
        lines.push(format!(
            "  Activation checkpointing: keep {:.0}%",
            f.gradient_checkpoint_factor * 100.0
        ));
    }
    if f.moe.enabled {
        lines.push(format!("  MoE: {} experts, top-{}", f.moe.experts, f.moe.top_k));
    }
    if f.lora.enabled {
        lines.push(format!("  LoRA: rank {}, alpha {}", f.lora.rank, f.lora.alpha));
    }
    if f.quantization.enabled {
        lines.push(format!("  Quantization: {}-bit", f.quantization.bits));
    }
    if f.cpu_offload_pct > 0.0 {
        lines.push(format!("  CPU offload: {}% of optimizer", f.cpu_offload_pct));
    }
    lines.join("\n")
}

/// Print detailed plan summary
pub fn print_detailed_summary(plan: &ResolvedPlan) {
    println!();
    println!("Plan Summary:");
    println!("{}", format_architecture_info(plan));
    println!();
    println!("{}", format_hardware_info(plan));
    println!();
    println!("{}", format_optimization_info(plan));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<()> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating plan: {}", args.plan.display()),
    );

    let plan = load_resolved(&args.plan)?;
    validate_inputs(
        &plan.architecture,
        &plan.hardware,
        &plan.flags,
        &plan.estimator.budget(),
        plan.estimator.calibration(),
    )?;

    log(level, LogLevel::Normal, "Plan is valid");

    if args.detailed && level != LogLevel::Quiet {
        print_detailed_summary(&plan);
    }

    Ok(())
}
