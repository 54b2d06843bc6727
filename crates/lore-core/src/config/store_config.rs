use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Store adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Applied by the retrying store decorators.
    pub retry: RetryPolicy,
}
