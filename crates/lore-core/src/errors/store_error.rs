/// Similarity/graph store adapter errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{store} store unavailable: {reason}")]
    Unavailable { store: String, reason: String },

    #[error("{store} query failed: {reason}")]
    QueryFailed { store: String, reason: String },

    #[error("collection not found: {collection}")]
    CollectionNotFound { collection: String },

    #[error("vector dimension mismatch in {collection}: expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },
}

impl StoreError {
    /// Network/timeout class failures that a retry or a fallback may recover from.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::QueryFailed { .. })
    }
}
