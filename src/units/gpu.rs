//! GPU reference catalog: memory capacity, power draw and hourly price.

use serde::{Deserialize, Serialize};

/// One accelerator model in the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpec {
    /// Catalog identifier (e.g., "h100-80-sxm", "rtx4090")
    pub id: String,
    /// Display name
    pub name: String,
    /// Device memory in GB
    pub memory_gb: f64,
    /// Board power under training load, in watts
    pub power_watts: f64,
    /// On-demand hourly rate in USD
    pub hourly_rate: f64,
    /// Memory bandwidth, informational
    #[serde(default)]
    pub bandwidth: String,
    /// Notable numeric formats, informational
    #[serde(default)]
    pub features: String,
}

impl GpuSpec {
    /// Create a catalog entry.
    pub fn new(id: impl Into<String>, memory_gb: f64, power_watts: f64, hourly_rate: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            memory_gb,
            power_watts,
            hourly_rate,
            bandwidth: String::new(),
            features: String::new(),
        }
    }

    /// Set display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set bandwidth description.
    pub fn with_bandwidth(mut self, bandwidth: impl Into<String>) -> Self {
        self.bandwidth = bandwidth.into();
        self
    }

    /// Set feature description.
    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = features.into();
        self
    }
}

/// Reference table of GPUs supplied to the engine by the caller.
///
/// The default table carries typical on-demand cloud rates; callers with
/// negotiated pricing replace entries with [`GpuCatalog::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuCatalog {
    gpus: Vec<GpuSpec>,
}

impl Default for GpuCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuCatalog {
    /// Create the catalog with typical datacenter and workstation parts.
    pub fn new() -> Self {
        Self {
            gpus: vec![
                GpuSpec::new("h100-80-sxm", 80.0, 700.0, 4.00)
                    .with_name("NVIDIA H100 (80GB SXM)")
                    .with_bandwidth("3.35 TB/s")
                    .with_features("FP8"),
                GpuSpec::new("h100-94-sxm", 94.0, 700.0, 4.50)
                    .with_name("NVIDIA H100 (94GB SXM)")
                    .with_bandwidth("3.35 TB/s")
                    .with_features("FP8"),
                GpuSpec::new("a100-80-sxm", 80.0, 400.0, 2.50)
                    .with_name("NVIDIA A100 (80GB SXM)")
                    .with_bandwidth("2.04 TB/s")
                    .with_features("TF32"),
                GpuSpec::new("a100-40-sxm", 40.0, 400.0, 2.00)
                    .with_name("NVIDIA A100 (40GB SXM)")
                    .with_bandwidth("1.56 TB/s")
                    .with_features("TF32"),
                GpuSpec::new("v100-32", 32.0, 300.0, 1.50)
                    .with_name("NVIDIA V100 (32GB)")
                    .with_bandwidth("900 GB/s")
                    .with_features("FP16"),
                GpuSpec::new("rtx4090", 24.0, 450.0, 1.20)
                    .with_name("RTX 4090 (24GB)")
                    .with_bandwidth("1008 GB/s")
                    .with_features("FP16"),
            ],
        }
    }

    /// Build a catalog from explicit entries.
    pub fn from_specs(gpus: Vec<GpuSpec>) -> Self {
        Self { gpus }
    }

    /// Look up a GPU, ignoring case, dashes and underscores.
    pub fn get(&self, id: &str) -> Option<&GpuSpec> {
        let wanted = normalize(id);
        self.gpus.iter().find(|g| normalize(&g.id) == wanted)
    }

    /// All entries in catalog order.
    pub fn all(&self) -> &[GpuSpec] {
        &self.gpus
    }

    /// Identifiers in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.gpus.iter().map(|g| g.id.as_str())
    }

    /// Add or replace an entry.
    pub fn set(&mut self, spec: GpuSpec) {
        let wanted = normalize(&spec.id);
        if let Some(existing) = self.gpus.iter_mut().find(|g| normalize(&g.id) == wanted) {
            *existing = spec;
        } else {
            self.gpus.push(spec);
        }
    }
}

pub(crate) fn normalize(id: &str) -> String {
    id.to_lowercase().replace(['-', '_', ' '], "")
}
