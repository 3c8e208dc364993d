use crate::cell::CellType;
use crate::config::SimulationKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Population of every cell type after one sampled tick.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub tick: u64,
    pub counts: BTreeMap<CellType, usize>,
    pub changed_cells: usize,
}

impl StepMetrics {
    /// Share of all cells holding `state`, in `[0, 1]`.
    pub fn fraction(&self, state: CellType) -> f64 {
        let total: usize = self.counts.values().sum();
        if total == 0 {
            return 0.0;
        }
        self.counts.get(&state).copied().unwrap_or(0) as f64 / total as f64
    }
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub kind: SimulationKind,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub final_counts: BTreeMap<CellType, usize>,
}
