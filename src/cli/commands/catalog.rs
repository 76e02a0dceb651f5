//! Reference table listings: presets, GPUs, quantization formats

use estimar_common::output::format_params;
use estimar_common::{OutputFormat, Result, TableBuilder};

use super::render;
use crate::params;
use crate::presets::{self, Preset};
use crate::units::{GpuCatalog, GpuSpec, QuantFormat, QUANT_FORMATS};

/// Format presets with their parameter counts
pub fn format_presets(presets: &[Preset]) -> String {
    let cells: Vec<[String; 4]> = presets
        .iter()
        .map(|p| {
            let size = params::count(&p.architecture, &p.optimizations.moe)
                .map(|c| format_params(c.total))
                .unwrap_or_else(|_| "-".to_string());
            [
                p.name.to_string(),
                p.family.to_string(),
                size,
                p.description.to_string(),
            ]
        })
        .collect();

    let mut table = TableBuilder::new().headers(vec!["Preset", "Family", "Params", "Description"]);
    for row in &cells {
        table = table.row(row.iter().map(String::as_str).collect());
    }
    table.build().render()
}

/// Format the GPU catalog
pub fn format_gpus(gpus: &[GpuSpec]) -> String {
    let cells: Vec<[String; 6]> = gpus
        .iter()
        .map(|g| {
            [
                g.id.clone(),
                g.name.clone(),
                format!("{} GB", g.memory_gb),
                g.bandwidth.clone(),
                format!("{} W", g.power_watts),
                format!("${:.2}/h", g.hourly_rate),
            ]
        })
        .collect();

    let mut table =
        TableBuilder::new().headers(vec!["ID", "Name", "Memory", "Bandwidth", "Power", "Rate"]);
    for row in &cells {
        table = table.row(row.iter().map(String::as_str).collect());
    }
    table.build().render()
}

/// Format the quantization reference
pub fn format_quant(formats: &[QuantFormat]) -> String {
    let cells: Vec<[String; 4]> = formats
        .iter()
        .map(|q| {
            [
                q.name.to_string(),
                q.bits.to_string(),
                format!("{:.0}%", q.memory_factor() * 100.0),
                q.impact.to_string(),
            ]
        })
        .collect();

    let mut table =
        TableBuilder::new().headers(vec!["Format", "Bits", "Memory vs FP32", "Quality impact"]);
    for row in &cells {
        table = table.row(row.iter().map(String::as_str).collect());
    }
    table.build().render()
}

pub fn run_presets(format: OutputFormat) -> Result<()> {
    let presets = presets::all();
    println!("{}", render(format, presets.as_slice(), format_presets)?);
    Ok(())
}

pub fn run_gpus(format: OutputFormat) -> Result<()> {
    let catalog = GpuCatalog::new();
    println!("{}", render(format, catalog.all(), format_gpus)?);
    Ok(())
}

pub fn run_quant(format: OutputFormat) -> Result<()> {
    println!("{}", render(format, QUANT_FORMATS, format_quant)?);
    Ok(())
}
