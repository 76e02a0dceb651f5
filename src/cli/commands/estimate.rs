//! Estimate command implementation

use estimar_common::output::{format_gb, format_number, format_params};
use estimar_common::{Result, TableBuilder};

use super::render;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_resolved, EstimateArgs, ResolvedPlan};
use crate::estimate::EstimationResult;

/// Format parameter counts as a table
pub fn format_parameters(result: &EstimationResult) -> String {
    let total = format_params(result.parameter_count);
    let active = format_params(result.active_parameter_count);
    let trainable = format_params(result.trainable_parameter_count);
    TableBuilder::new()
        .headers(vec!["Parameters", "Count"])
        .row(vec!["Total", total.as_str()])
        .row(vec!["Active per token", active.as_str()])
        .row(vec!["Trainable", trainable.as_str()])
        .build()
        .render()
}

/// Format the per-GPU memory breakdown as a table
pub fn format_memory(result: &EstimationResult) -> String {
    let m = &result.memory;
    let rows = [
        ("Weights", m.weights),
        ("Gradients", m.gradients),
        ("Optimizer", m.optimizer),
        ("Activations", m.activations),
        ("Overhead", m.overhead),
        ("Total", result.total_memory_per_gpu),
    ];
    let cells: Vec<(&str, String)> = rows.iter().map(|(k, v)| (*k, format_gb(*v))).collect();

    let mut table = TableBuilder::new().headers(vec!["Memory per GPU", "Size"]);
    for (name, size) in &cells {
        table = table.row(vec![*name, size.as_str()]);
    }

    let mut out = table.build().render();
    out.push_str(&format!(
        "Utilization: {:.1}% ({})\n",
        result.memory_utilization_pct, result.fit_status
    ));
    if m.active_weights < m.weights {
        out.push_str(&format!(
            "Active weights per token: {}\n",
            format_gb(m.active_weights)
        ));
    }
    out
}

/// Format schedule, time, energy and cost as a table
pub fn format_run(result: &EstimationResult) -> String {
    let cells = [
        (
            "Accumulation steps",
            format_number(result.gradient_accumulation_steps),
        ),
        ("Effective batch", format_number(result.effective_batch_size)),
        ("Training steps", format_number(result.training_steps)),
        ("Tokens", format_params(result.total_tokens)),
        (
            "Wall-clock",
            format!("{:.1} h", result.training_time_hours),
        ),
        ("GPU-hours", format!("{:.1}", result.gpu_hours)),
        ("Energy", format!("{:.1} kWh", result.energy_kwh)),
        ("Carbon", format!("{:.1} kg CO2e", result.carbon_kg)),
        ("Cost", format!("${:.2}", result.total_cost_usd)),
    ];

    let mut table = TableBuilder::new().headers(vec!["Training run", "Estimate"]);
    for (name, value) in &cells {
        table = table.row(vec![*name, value.as_str()]);
    }
    table.build().render()
}

/// Format inference and checkpoint sizes
pub fn format_footprint(result: &EstimationResult) -> String {
    format!(
        "Inference: {} weights + {} KV cache ({})\nCheckpoint: {} ({} weights + {} optimizer)\n",
        format_gb(result.inference.weights),
        format_gb(result.inference.kv_cache),
        result.inference_fit_status,
        format_gb(result.disk.checkpoint),
        format_gb(result.disk.weights),
        format_gb(result.disk.optimizer),
    )
}

/// Format warnings as a bullet list
pub fn format_warnings(result: &EstimationResult) -> Option<String> {
    if result.warnings.is_empty() {
        return None;
    }
    let lines: Vec<String> = result.warnings.iter().map(|w| format!("  ⚠ {w}")).collect();
    Some(format!("Warnings:\n{}\n", lines.join("\n")))
}

/// Full table rendering of one result
pub fn format_result(result: &EstimationResult) -> String {
    let mut out = format_parameters(result);
    out.push_str(&format_memory(result));
    out.push_str(&format_run(result));
    out.push_str(&format_footprint(result));
    if let Some(warnings) = format_warnings(result) {
        out.push_str(&warnings);
    }
    out
}

/// Apply command-line overrides to a resolved plan
pub fn apply_overrides(plan: ResolvedPlan, args: &EstimateArgs) -> ResolvedPlan {
    let plan = match args.gpus {
        Some(gpus) => plan.with_gpus(gpus),
        None => plan,
    };
    match args.precision {
        Some(precision) => plan.with_precision(precision),
        None => plan,
    }
}

pub fn run_estimate(args: EstimateArgs, level: LogLevel) -> Result<()> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Loading plan: {}", args.plan.display()),
    );

    let plan = apply_overrides(load_resolved(&args.plan)?, &args);
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Preset {} on {} × {} GB at {}",
            plan.preset, plan.hardware.num_gpus, plan.hardware.memory_per_gpu, plan.precision
        ),
    );

    let result = plan.estimate()?;
    println!("{}", render(args.format, &result, format_result)?);
    Ok(())
}
