//! Plan loading and resolution into engine inputs

use std::fs;
use std::path::Path;

use estimar_common::{EstimarError, Result};
use tracing::debug;

use super::schema::PlanSpec;
use crate::arch::ArchitectureSpec;
use crate::cost::TrainingBudget;
use crate::estimate::{EstimationResult, Estimator, HardwareComparison};
use crate::flags::OptimizationFlags;
use crate::hardware::HardwareConfig;
use crate::presets::{self, DEFAULT_PRESET};
use crate::units::{GpuCatalog, PrecisionMode, UnitTable};

/// Read and parse a plan file.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<PlanSpec> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EstimarError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let yaml = fs::read_to_string(path)
        .map_err(|e| EstimarError::io(format!("Failed to read {}", path.display()), e))?;

    serde_yaml::from_str(&yaml).map_err(|e| EstimarError::ConfigParsing {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Engine inputs after preset, catalog and overrides are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    /// Preset the plan started from
    pub preset: String,
    /// Catalog GPU, when one was named
    pub gpu: Option<String>,
    pub architecture: ArchitectureSpec,
    pub hardware: HardwareConfig,
    pub flags: OptimizationFlags,
    pub precision: PrecisionMode,
    pub estimator: Estimator,
}

impl ResolvedPlan {
    /// Merge a plan with the reference tables.
    ///
    /// Order: preset → architecture overrides → catalog GPU → grid region →
    /// hardware overrides. A GPU count given on only one side is copied to
    /// the other.
    pub fn resolve(spec: &PlanSpec, units: &UnitTable) -> Result<Self> {
        let preset_name = spec.preset.as_deref().unwrap_or(DEFAULT_PRESET);
        let preset = presets::get(preset_name)
            .ok_or_else(|| EstimarError::unknown("preset", preset_name, presets::names()))?;

        let mut architecture = preset.architecture;
        spec.architecture.apply(&mut architecture);
        if spec.architecture.num_gpus.is_none() {
            if let Some(gpus) = spec.hardware.num_gpus {
                architecture.num_gpus = gpus;
            }
        }

        let mut flags = preset.optimizations;
        spec.optimizations.apply(&mut flags);

        let mut hardware = match &spec.gpu {
            Some(id) => {
                let gpu = units
                    .gpus
                    .get(id)
                    .ok_or_else(|| EstimarError::unknown("GPU", id, units.gpus.ids()))?;
                HardwareConfig::from_gpu(gpu, architecture.num_gpus)
            }
            None => HardwareConfig::default().with_gpus(architecture.num_gpus),
        };

        if let Some(region_id) = &spec.grid_region {
            let region = units
                .grids
                .get(region_id)
                .ok_or_else(|| EstimarError::unknown("grid region", region_id, units.grids.ids()))?;
            hardware.grid_carbon_intensity = region.grams_co2_per_kwh;
        }
        spec.hardware.apply(&mut hardware);

        let budget = match (spec.budget.tokens, spec.budget.steps) {
            (Some(_), Some(_)) => {
                return Err(EstimarError::ConfigValue {
                    field: "budget".to_string(),
                    message: "both tokens and steps are set".to_string(),
                    suggestion: "Keep one of budget.tokens or budget.steps".to_string(),
                })
            }
            (Some(tokens), None) => TrainingBudget::Tokens(tokens),
            (None, Some(steps)) => TrainingBudget::Steps(steps),
            (None, None) => TrainingBudget::Chinchilla,
        };

        debug!(preset = preset.name, gpu = ?spec.gpu, ?budget, "resolved plan");

        Ok(Self {
            preset: preset.name.to_string(),
            gpu: spec.gpu.clone(),
            architecture,
            hardware,
            flags,
            precision: spec.precision.unwrap_or_default(),
            estimator: Estimator::new()
                .with_calibration(spec.calibration.clone())
                .with_budget(budget),
        })
    }

    /// Run on a different GPU count.
    #[must_use]
    pub fn with_gpus(mut self, num_gpus: u64) -> Self {
        self.architecture.num_gpus = num_gpus;
        self.hardware.num_gpus = num_gpus;
        self
    }

    /// Run at a different precision.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionMode) -> Self {
        self.precision = precision;
        self
    }

    /// Estimate the plan.
    pub fn estimate(&self) -> Result<EstimationResult> {
        Ok(self
            .estimator
            .estimate(&self.architecture, &self.hardware, &self.flags, self.precision)?)
    }

    /// Estimate the plan on every GPU in `catalog`.
    pub fn compare(&self, catalog: &GpuCatalog) -> Result<Vec<HardwareComparison>> {
        Ok(self.estimator.compare(
            &self.architecture,
            &self.flags,
            self.precision,
            catalog,
            &self.hardware,
        )?)
    }
}

/// Load a plan file and resolve it against the default reference tables.
pub fn load_resolved<P: AsRef<Path>>(path: P) -> Result<ResolvedPlan> {
    let spec = load_plan(path)?;
    ResolvedPlan::resolve(&spec, &UnitTable::default())
}
