use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph search and path reasoning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub default_max_hops: usize,
    /// Requested hop counts are clamped to this.
    pub max_hops_limit: usize,
    pub default_limit: usize,
    /// Maximum paths returned by `find_paths`.
    pub path_limit: usize,
    pub entity_assist_budget_ms: u64,
    /// Extra nickname → canonical name entries, merged over the built-ins.
    pub aliases: BTreeMap<String, String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_max_hops: defaults::DEFAULT_MAX_HOPS,
            max_hops_limit: defaults::DEFAULT_MAX_HOPS_LIMIT,
            default_limit: defaults::DEFAULT_GRAPH_LIMIT,
            path_limit: defaults::DEFAULT_PATH_LIMIT,
            entity_assist_budget_ms: defaults::DEFAULT_ENTITY_ASSIST_BUDGET_MS,
            aliases: BTreeMap::new(),
        }
    }
}
