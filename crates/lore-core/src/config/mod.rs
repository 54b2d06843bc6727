//! Layered configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`LORE_*`)
//! 2. TOML file (`lore.toml`)
//! 3. Compiled defaults
//!
//! The merged result is validated before it is returned.

mod cache_config;
pub mod defaults;
mod expansion_config;
mod graph_config;
mod linker_config;
mod observability_config;
mod provider_config;
mod retrieval_config;
mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{LoreError, LoreResult};
use crate::retry::RetryPolicy;

pub use cache_config::CacheConfig;
pub use expansion_config::ExpansionConfig;
pub use graph_config::GraphConfig;
pub use linker_config::LinkerConfig;
pub use observability_config::ObservabilityConfig;
pub use provider_config::ProviderConfig;
pub use retrieval_config::{RetrievalConfig, SubstrateWeights, WeightTable};
pub use store_config::StoreConfig;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "lore.toml";

/// Top-level configuration aggregating all sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoreConfig {
    pub retrieval: RetrievalConfig,
    pub expansion: ExpansionConfig,
    pub cache: CacheConfig,
    pub graph: GraphConfig,
    pub linker: LinkerConfig,
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub observability: ObservabilityConfig,
}

impl LoreConfig {
    /// Defaults, then `path` if it exists, then `LORE_*` variables, then
    /// validation.
    pub fn load(path: Option<&Path>) -> LoreResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> LoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoreError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| LoreError::ConfigError(format!("invalid TOML in {}: {e}", path.display())))
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> LoreResult<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| LoreError::ConfigError(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> LoreResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LoreError::ConfigError(format!("cannot serialize config: {e}")))
    }

    /// Apply `LORE_*` overrides read through `lookup`. A variable that is set
    /// but does not parse is a configuration error.
    pub fn apply_env<F>(&mut self, lookup: F) -> LoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        env.set("LORE_TOP_K", &mut self.retrieval.top_k)?;
        env.set("LORE_VECTOR_TIMEOUT_MS", &mut self.retrieval.vector_timeout_ms)?;
        env.set("LORE_GRAPH_TIMEOUT_MS", &mut self.retrieval.graph_timeout_ms)?;
        env.set("LORE_COLLECTION", &mut self.retrieval.collection)?;
        env.set("LORE_EXPANSION_ENABLED", &mut self.expansion.enabled)?;
        env.set("LORE_MAX_VARIATIONS", &mut self.expansion.max_variations)?;
        env.set("LORE_EXPANSION_USE_LLM", &mut self.expansion.use_llm)?;
        env.set("LORE_CACHE_CAPACITY", &mut self.cache.capacity)?;
        env.set("LORE_CACHE_TTL_SECS", &mut self.cache.ttl_secs)?;
        env.set("LORE_MAX_HOPS_LIMIT", &mut self.graph.max_hops_limit)?;
        env.set("LORE_PATH_LIMIT", &mut self.graph.path_limit)?;
        env.set("LORE_LINK_MIN_CONFIDENCE", &mut self.linker.min_confidence)?;
        env.set("LORE_LINK_BATCH_SIZE", &mut self.linker.batch_size)?;
        env.set(
            "LORE_LINK_CONFIDENCE_DIVISOR",
            &mut self.linker.confidence_divisor,
        )?;
        env.set("LORE_STORE_MAX_ATTEMPTS", &mut self.store.retry.max_attempts)?;
        env.set_opt("LORE_EMBEDDING_ENDPOINT", &mut self.provider.embedding_endpoint);
        env.set_opt("LORE_COMPLETION_ENDPOINT", &mut self.provider.completion_endpoint);
        env.set("LORE_EMBEDDING_DIMENSIONS", &mut self.provider.dimensions)?;
        env.set(
            "LORE_PROVIDER_COOLDOWN_MS",
            &mut self.provider.unavailable_cooldown_ms,
        )?;
        env.set("LORE_LOG_JSON", &mut self.observability.json)?;
        Ok(())
    }

    pub fn validate(&self) -> LoreResult<()> {
        let r = &self.retrieval;
        positive("retrieval.top_k", r.top_k as f64)?;
        positive("retrieval.candidate_multiplier", r.candidate_multiplier as f64)?;
        positive("retrieval.vector_timeout_ms", r.vector_timeout_ms as f64)?;
        positive("retrieval.graph_timeout_ms", r.graph_timeout_ms as f64)?;
        if r.collection.trim().is_empty() {
            return Err(invalid("retrieval.collection", "must not be empty"));
        }
        for (family, w) in r.weights.entries() {
            unit(&format!("retrieval.weights.{family}.vector"), w.vector)?;
            unit(&format!("retrieval.weights.{family}.graph"), w.graph)?;
            if w.vector + w.graph <= 0.0 {
                return Err(invalid(
                    &format!("retrieval.weights.{family}"),
                    "vector and graph weights must not both be zero",
                ));
            }
        }

        let e = &self.expansion;
        if e.paraphrase_discount <= 0.0 || e.paraphrase_discount > 1.0 {
            return Err(invalid("expansion.paraphrase_discount", "must be in (0, 1]"));
        }
        if e.max_variations > 10 {
            return Err(invalid("expansion.max_variations", "must be at most 10"));
        }
        positive("expansion.budget_ms", e.budget_ms as f64)?;

        positive("cache.capacity", self.cache.capacity as f64)?;
        positive("cache.ttl_secs", self.cache.ttl_secs as f64)?;

        let g = &self.graph;
        positive("graph.max_hops_limit", g.max_hops_limit as f64)?;
        if g.default_max_hops == 0 || g.default_max_hops > g.max_hops_limit {
            return Err(invalid(
                "graph.default_max_hops",
                "must be between 1 and graph.max_hops_limit",
            ));
        }
        positive("graph.path_limit", g.path_limit as f64)?;

        let l = &self.linker;
        unit("linker.min_confidence", l.min_confidence)?;
        positive("linker.batch_size", l.batch_size as f64)?;
        positive("linker.min_episodes", l.min_episodes as f64)?;
        positive("linker.min_co_occurrences", l.min_co_occurrences as f64)?;
        positive("linker.confidence_divisor", l.confidence_divisor)?;
        if !l.confidence_divisor.is_finite() {
            return Err(invalid("linker.confidence_divisor", "must be finite"));
        }

        validate_retry("store.retry", &self.store.retry)?;
        validate_retry("provider.retry", &self.provider.retry)?;
        positive("provider.dimensions", self.provider.dimensions as f64)?;
        Ok(())
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn set<T: std::str::FromStr>(&self, key: &str, slot: &mut T) -> LoreResult<()> {
        if let Some(raw) = (self.lookup)(key) {
            *slot = raw
                .trim()
                .parse()
                .map_err(|_| LoreError::ConfigError(format!("{key}: cannot parse {raw:?}")))?;
        }
        Ok(())
    }

    fn set_opt(&self, key: &str, slot: &mut Option<String>) {
        if let Some(raw) = (self.lookup)(key) {
            let raw = raw.trim();
            *slot = (!raw.is_empty()).then(|| raw.to_string());
        }
    }
}

fn invalid(field: &str, message: &str) -> LoreError {
    LoreError::ConfigError(format!("{field}: {message}"))
}

fn positive(field: &str, value: f64) -> LoreResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be greater than 0"))
    }
}

fn unit(field: &str, value: f64) -> LoreResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0.0 and 1.0"))
    }
}

fn validate_retry(field: &str, policy: &RetryPolicy) -> LoreResult<()> {
    positive(&format!("{field}.max_attempts"), policy.max_attempts as f64)?;
    unit(&format!("{field}.jitter"), policy.jitter)?;
    if policy.max_delay_ms < policy.base_delay_ms {
        return Err(invalid(
            &format!("{field}.max_delay_ms"),
            "must not be below base_delay_ms",
        ));
    }
    Ok(())
}
