use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::QueryFamily;

/// Relative weight of each substrate for one query family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstrateWeights {
    pub vector: f64,
    pub graph: f64,
}

impl SubstrateWeights {
    pub const fn new(vector: f64, graph: f64) -> Self {
        Self { vector, graph }
    }

    const fn from_pair(pair: (f64, f64)) -> Self {
        Self::new(pair.0, pair.1)
    }
}

/// Family → weights table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub entity_centric: SubstrateWeights,
    pub relationship: SubstrateWeights,
    pub definitional: SubstrateWeights,
    pub general: SubstrateWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            entity_centric: SubstrateWeights::from_pair(defaults::DEFAULT_WEIGHTS_ENTITY),
            relationship: SubstrateWeights::from_pair(defaults::DEFAULT_WEIGHTS_RELATIONSHIP),
            definitional: SubstrateWeights::from_pair(defaults::DEFAULT_WEIGHTS_DEFINITIONAL),
            general: SubstrateWeights::from_pair(defaults::DEFAULT_WEIGHTS_GENERAL),
        }
    }
}

impl WeightTable {
    pub fn for_family(&self, family: QueryFamily) -> SubstrateWeights {
        match family {
            QueryFamily::EntityCentric => self.entity_centric,
            QueryFamily::Relationship => self.relationship,
            QueryFamily::Definitional => self.definitional,
            QueryFamily::General => self.general,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, SubstrateWeights); 4] {
        [
            ("entity_centric", self.entity_centric),
            ("relationship", self.relationship),
            ("definitional", self.definitional),
            ("general", self.general),
        ]
    }
}

/// Fusion orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Nearest chunks fetched per variation, as a multiple of `top_k`.
    pub candidate_multiplier: usize,
    pub vector_timeout_ms: u64,
    pub graph_timeout_ms: u64,
    /// Similarity collection holding transcript chunks.
    pub collection: String,
    pub weights: WeightTable,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            candidate_multiplier: defaults::DEFAULT_CANDIDATE_MULTIPLIER,
            vector_timeout_ms: defaults::DEFAULT_VECTOR_TIMEOUT_MS,
            graph_timeout_ms: defaults::DEFAULT_GRAPH_TIMEOUT_MS,
            collection: defaults::DEFAULT_CHUNK_COLLECTION.to_string(),
            weights: WeightTable::default(),
        }
    }
}
