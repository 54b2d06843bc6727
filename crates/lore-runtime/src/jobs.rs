//! Background linker job.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info_span, Span};

use lore_core::errors::{LoreError, LoreResult};
use lore_core::models::{LinkReport, WorkspaceId};
use lore_graph::{CrossEpisodeLinker, LinkOptions};

/// Handle to one cross-episode linking run on its own thread.
pub struct LinkerJob {
    workspace: WorkspaceId,
    handle: JoinHandle<LoreResult<LinkReport>>,
}

impl LinkerJob {
    pub(crate) fn spawn(
        linker: Arc<CrossEpisodeLinker>,
        workspace: WorkspaceId,
        options: LinkOptions,
    ) -> LoreResult<Self> {
        let parent = Span::current();
        let ws = workspace.clone();
        let handle = thread::Builder::new()
            .name("lore-linker".to_string())
            .spawn(move || {
                let span = info_span!(parent: &parent, "lore.linker_job", workspace = %ws);
                let _entered = span.enter();
                linker.create_links(&ws, &options)
            })
            .map_err(|e| LoreError::ConcurrencyError(format!("failed to spawn linker: {e}")))?;
        Ok(Self { workspace, handle })
    }

    pub fn workspace(&self) -> &WorkspaceId {
        &self.workspace
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to finish.
    pub fn join(self) -> LoreResult<LinkReport> {
        self.handle.join().map_err(|_| {
            LoreError::ConcurrencyError(format!("linker for {} panicked", self.workspace))
        })?
    }

    pub fn into_handle(self) -> JoinHandle<LoreResult<LinkReport>> {
        self.handle
    }
}
