use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LoreError, LoreResult};

/// Tenant-scoping identifier carried by every node, edge, and chunk.
///
/// Every store call takes one; adapters apply it as an equality filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Build a workspace id. Empty or whitespace-only ids are a configuration error.
    pub fn new(id: impl Into<String>) -> LoreResult<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(LoreError::ConfigError(
                "workspace id is required and must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = LoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkspaceId> for String {
    fn from(value: WorkspaceId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_ids() {
        assert!(WorkspaceId::new("").is_err());
        assert!(WorkspaceId::new("   ").unwrap_err().is_config());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let ws = WorkspaceId::new("  podcast-main ").unwrap();
        assert_eq!(ws.as_str(), "podcast-main");
    }

    #[test]
    fn serde_rejects_empty() {
        let parsed: Result<WorkspaceId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let ok: WorkspaceId = serde_json::from_str("\"ws\"").unwrap();
        assert_eq!(ok.as_str(), "ws");
    }
}
