/// Embedding/completion provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {provider}")]
    Unavailable { provider: String },

    #[error("provider request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("invalid provider response: {reason}")]
    InvalidResponse { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }
}
