use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::section::ModuleKey;

/// Aggregate completion score. Always derived from current section
/// contents, never persisted as a source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProgressReport {
    /// 0–100 overall completion under the fixed weighting model.
    pub overall: f64,
    /// 0–100 sub-score per module.
    pub per_module: BTreeMap<ModuleKey, f64>,
}
