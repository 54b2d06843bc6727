//! Compiled defaults for every configuration section.

// Retrieval
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 2;
pub const DEFAULT_VECTOR_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_GRAPH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CHUNK_COLLECTION: &str = "transcript_chunks";

// Substrate weights (vector, graph) per query family
pub const DEFAULT_WEIGHTS_ENTITY: (f64, f64) = (0.35, 0.65);
pub const DEFAULT_WEIGHTS_RELATIONSHIP: (f64, f64) = (0.35, 0.65);
pub const DEFAULT_WEIGHTS_DEFINITIONAL: (f64, f64) = (0.65, 0.35);
pub const DEFAULT_WEIGHTS_GENERAL: (f64, f64) = (0.5, 0.5);

// Expansion
pub const DEFAULT_MAX_VARIATIONS: usize = 3;
pub const DEFAULT_PARAPHRASE_DISCOUNT: f64 = 0.9;
pub const DEFAULT_EXPANSION_BUDGET_MS: u64 = 2_000;
pub const DEFAULT_PARAPHRASE_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_PARAPHRASE_MAX_TOKENS: u32 = 200;

// Cache
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;

// Graph
pub const DEFAULT_MAX_HOPS: usize = 3;
pub const DEFAULT_MAX_HOPS_LIMIT: usize = 6;
pub const DEFAULT_GRAPH_LIMIT: usize = 10;
pub const DEFAULT_PATH_LIMIT: usize = 10;
pub const DEFAULT_PATH_MAX_HOPS: usize = 5;
pub const DEFAULT_INFLUENCER_MAX_HOPS: usize = 2;
pub const DEFAULT_PRACTICE_MAX_HOPS: usize = 3;
pub const DEFAULT_ENTITY_ASSIST_BUDGET_MS: u64 = 1_500;

// Linker
pub const DEFAULT_LINK_MIN_EPISODES: usize = 2;
pub const DEFAULT_LINK_MIN_CO_OCCURRENCES: usize = 2;
pub const DEFAULT_LINK_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_LINK_BATCH_SIZE: usize = 100;
pub const DEFAULT_LINK_MAX_PAIRS: usize = 1_000;
pub const DEFAULT_CONFIDENCE_DIVISOR: f64 = 10.0;

// Retry
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 100;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 2_000;
pub const DEFAULT_RETRY_JITTER: f64 = 0.2;

// Providers
pub const DEFAULT_API_KEY_ENV: &str = "LORE_API_KEY";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_UNAVAILABLE_COOLDOWN_MS: u64 = 30_000;

// Observability
pub const DEFAULT_LOG_FILTER: &str = "lore=info";
