//! Compare command implementation

use estimar_common::output::format_gb;
use estimar_common::{Result, TableBuilder};

use super::render;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_resolved, CompareArgs};
use crate::estimate::HardwareComparison;
use crate::units::GpuCatalog;

/// Format comparison rows as a table
pub fn format_comparison(rows: &[HardwareComparison]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.gpu_id.clone(),
                format_gb(r.memory_per_gpu),
                format!("{:.1}%", r.memory_utilization_pct),
                r.fit_status.to_string(),
                format!("{:.1}", r.training_time_hours),
                format!("${:.2}", r.total_cost_usd),
            ]
        })
        .collect();

    let mut table = TableBuilder::new().headers(vec![
        "GPU",
        "Memory",
        "Utilization",
        "Fit",
        "Hours",
        "Cost",
    ]);
    for row in &cells {
        table = table.row(row.iter().map(String::as_str).collect());
    }
    table.build().render()
}

pub fn run_compare(args: CompareArgs, level: LogLevel) -> Result<()> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Comparing plan: {}", args.plan.display()),
    );

    let plan = load_resolved(&args.plan)?;
    let mut rows = plan.compare(&GpuCatalog::new())?;
    if args.feasible_only {
        rows.retain(|r| r.fit_status.is_feasible());
    }

    if rows.is_empty() {
        log(level, LogLevel::Normal, "No catalog GPU fits this plan");
    }
    println!("{}", render(args.format, rows.as_slice(), format_comparison)?);
    Ok(())
}
