//! LoreRuntime: owns every engine and the shared stores and providers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use lore_core::config::LoreConfig;
use lore_core::errors::LoreResult;
use lore_core::models::{CacheStats, Distance, GraphHit, LinkReport, Path, RelationshipType};
use lore_core::models::{RetrievalResult, WorkspaceId};
use lore_core::traits::{ICompletionProvider, IEmbeddingProvider, IGraphStore, ISimilarityStore};
use lore_core::tracing_setup;
use lore_graph::{
    CrossEpisodeLinker, GraphQueryOptimizer, GraphSearchOptions, LinkOptions, LlmEntityAssist,
    PathReasoner, PathResult,
};
use lore_providers::{
    ApiCompletionProvider, ApiEmbeddingProvider, CachedEmbedder, HashedEmbedder, SemanticCache,
};
use lore_retrieval::{QueryExpander, RetrievalEngine, RetrievalOptions};
use lore_storage::{
    InMemoryGraphStore, InMemorySimilarityStore, RetryingGraphStore, RetryingSimilarityStore,
};

use crate::jobs::LinkerJob;

/// Options for building a runtime. Anything left unset comes from
/// configuration or falls back to the in-process implementation.
#[derive(Default)]
pub struct RuntimeOptions {
    /// TOML file; ignored when `config_toml` is set.
    pub config_path: Option<PathBuf>,
    /// TOML configuration string.
    pub config_toml: Option<String>,
    pub graph_store: Option<Arc<dyn IGraphStore>>,
    pub similarity_store: Option<Arc<dyn ISimilarityStore>>,
    /// Replaces the configured embedding provider. Still cached.
    pub embedder: Option<Arc<dyn IEmbeddingProvider>>,
    /// Replaces the configured completion provider.
    pub completion: Option<Arc<dyn ICompletionProvider>>,
    /// Install the global tracing subscriber from `observability` config.
    pub init_tracing: bool,
}

/// Owns every engine, built once from a [`LoreConfig`].
pub struct LoreRuntime {
    config: LoreConfig,
    graph_store: Arc<dyn IGraphStore>,
    similarity_store: Arc<dyn ISimilarityStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    cache: Arc<SemanticCache>,
    completion: Option<Arc<dyn ICompletionProvider>>,
    retrieval: RetrievalEngine,
    graph_search: GraphQueryOptimizer,
    reasoner: PathReasoner,
    linker: Arc<CrossEpisodeLinker>,
}

impl LoreRuntime {
    pub fn new(opts: RuntimeOptions) -> LoreResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => {
                let mut config = LoreConfig::from_toml(toml_str)?;
                config.apply_env(|key| std::env::var(key).ok())?;
                config.validate()?;
                config
            }
            None => LoreConfig::load(opts.config_path.as_deref())?,
        };
        if opts.init_tracing {
            tracing_setup::init_from_config(&config.observability);
        }

        // Stores, behind the retry decorators.
        let graph_inner = opts
            .graph_store
            .unwrap_or_else(|| Arc::new(InMemoryGraphStore::new()));
        let similarity_inner = opts
            .similarity_store
            .unwrap_or_else(|| Arc::new(InMemorySimilarityStore::new()));
        let graph_store: Arc<dyn IGraphStore> =
            Arc::new(RetryingGraphStore::new(graph_inner, config.store.retry.clone()));
        let similarity_store: Arc<dyn ISimilarityStore> = Arc::new(RetryingSimilarityStore::new(
            similarity_inner,
            config.store.retry.clone(),
        ));

        // Embeddings: explicit, then HTTP, then the local hashed embedder.
        let base_embedder: Arc<dyn IEmbeddingProvider> = match opts.embedder {
            Some(e) => e,
            None => match ApiEmbeddingProvider::from_config(&config.provider)? {
                Some(api) => Arc::new(api),
                None => Arc::new(HashedEmbedder::new(config.provider.dimensions)),
            },
        };
        let cache = Arc::new(SemanticCache::from_config(&config.cache));
        let embedder: Arc<dyn IEmbeddingProvider> =
            Arc::new(CachedEmbedder::new(base_embedder, Arc::clone(&cache)));

        let completion: Option<Arc<dyn ICompletionProvider>> = match opts.completion {
            Some(c) => Some(c),
            None => ApiCompletionProvider::from_config(&config.provider)?
                .map(|c| Arc::new(c) as Arc<dyn ICompletionProvider>),
        };

        let collection = &config.retrieval.collection;
        if !similarity_store.collection_exists(collection)? {
            similarity_store.create_collection(collection, embedder.dimensions(), Distance::Cosine)?;
            debug!(collection = %collection, dimensions = embedder.dimensions(), "created collection");
        }

        let expander = Arc::new(QueryExpander::new(
            config.expansion.clone(),
            completion.clone(),
        ));
        let paraphraser = expander.paraphraser_name().to_string();
        let retrieval = RetrievalEngine::new(
            Arc::clone(&similarity_store),
            Arc::clone(&graph_store),
            Arc::clone(&embedder),
            expander,
            config.retrieval.clone(),
        );

        let mut graph_search = GraphQueryOptimizer::new(Arc::clone(&graph_store), config.graph.clone());
        if let Some(c) = &completion {
            graph_search = graph_search.with_entity_assist(Arc::new(LlmEntityAssist::new(Arc::clone(c))));
        }
        let reasoner = PathReasoner::new(Arc::clone(&graph_store), config.graph.clone());
        let linker = Arc::new(CrossEpisodeLinker::new(
            Arc::clone(&graph_store),
            config.linker.clone(),
        ));

        let completion_name = completion.as_ref().map_or("none", |c| c.name());
        info!(
            embedder = embedder.name(),
            dimensions = embedder.dimensions(),
            paraphraser = %paraphraser,
            completion = completion_name,
            "lore runtime ready"
        );

        Ok(Self {
            config,
            graph_store,
            similarity_store,
            embedder,
            cache,
            completion,
            retrieval,
            graph_search,
            reasoner,
            linker,
        })
    }

    /// Runtime with defaults, `lore.toml` from the working directory if
    /// present, and in-memory stores.
    pub fn from_defaults() -> LoreResult<Self> {
        Self::new(RuntimeOptions {
            config_path: Some(PathBuf::from(lore_core::config::CONFIG_FILE_NAME)),
            ..RuntimeOptions::default()
        })
    }

    // -- retrieval ---------------------------------------------------------

    pub fn retrieve(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        options: &RetrievalOptions,
    ) -> LoreResult<Vec<RetrievalResult>> {
        self.retrieval.retrieve(workspace, query, options)
    }

    // -- graph ------------------------------------------------------------

    pub fn graph_search(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        options: &GraphSearchOptions,
    ) -> Vec<GraphHit> {
        self.graph_search.search(workspace, query, options)
    }

    pub fn find_paths(
        &self,
        workspace: &WorkspaceId,
        source_id: &str,
        target_id: &str,
        max_hops: usize,
        relationship_types: &[RelationshipType],
    ) -> LoreResult<Vec<Path>> {
        self.reasoner
            .find_paths(workspace, source_id, target_id, max_hops, relationship_types)
    }

    pub fn find_influencers(
        &self,
        workspace: &WorkspaceId,
        target: &str,
        max_hops: usize,
    ) -> LoreResult<Vec<PathResult>> {
        self.reasoner.find_influencers(workspace, target, max_hops)
    }

    pub fn find_practices_for_outcome(
        &self,
        workspace: &WorkspaceId,
        outcome: &str,
        max_hops: usize,
    ) -> LoreResult<Vec<PathResult>> {
        self.reasoner
            .find_practices_for_outcome(workspace, outcome, max_hops)
    }

    // -- linking ----------------------------------------------------------

    /// Run the linker on the calling thread.
    pub fn create_links(
        &self,
        workspace: &WorkspaceId,
        options: &LinkOptions,
    ) -> LoreResult<LinkReport> {
        self.linker.create_links(workspace, options)
    }

    /// Run the linker as one background job.
    pub fn spawn_linker(&self, workspace: WorkspaceId, options: LinkOptions) -> LoreResult<LinkerJob> {
        options.validate()?;
        LinkerJob::spawn(Arc::clone(&self.linker), workspace, options)
    }

    /// Link options built from the `linker` config section.
    pub fn default_link_options(&self) -> LinkOptions {
        self.linker.default_options().clone()
    }

    // -- accessors --------------------------------------------------------

    pub fn config(&self) -> &LoreConfig {
        &self.config
    }

    pub fn graph_store(&self) -> &Arc<dyn IGraphStore> {
        &self.graph_store
    }

    pub fn similarity_store(&self) -> &Arc<dyn ISimilarityStore> {
        &self.similarity_store
    }

    /// The cached embedder every engine shares.
    pub fn embedder(&self) -> &Arc<dyn IEmbeddingProvider> {
        &self.embedder
    }

    pub fn completion(&self) -> Option<&Arc<dyn ICompletionProvider>> {
        self.completion.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn retrieval(&self) -> &RetrievalEngine {
        &self.retrieval
    }

    pub fn graph(&self) -> &GraphQueryOptimizer {
        &self.graph_search
    }

    pub fn reasoner(&self) -> &PathReasoner {
        &self.reasoner
    }

    pub fn linker(&self) -> &Arc<CrossEpisodeLinker> {
        &self.linker
    }
}
