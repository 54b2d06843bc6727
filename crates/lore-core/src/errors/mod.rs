//! Error taxonomy for the workspace.
//!
//! Transient failures (`is_transient`) are recovered by degrading to another
//! substrate or by skipping and logging. Configuration failures are surfaced
//! immediately and never retried.

mod provider_error;
mod store_error;

pub use provider_error::ProviderError;
pub use store_error::StoreError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum LoreError {
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid relationship type: {name}")]
    InvalidRelationshipType { name: String },

    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl LoreError {
    /// Whether the failure is a network/timeout class error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::StoreError(e) => e.is_transient(),
            Self::ProviderError(e) => e.is_transient(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Whether the failure is a configuration error that must fail fast.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::InvalidRelationshipType { .. }
        )
    }
}

pub type LoreResult<T> = Result<T, LoreError>;
