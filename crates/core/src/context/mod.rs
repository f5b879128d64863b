use crate::commit::{CommitQueue, CommitSender};
use crate::config::EngineConfig;
use crate::event::EventBus;
use crate::focus::FocusTracker;
use crate::keys::KeyStore;
use crate::resources::{ResourceCommit, ResourceTable};
use crate::Result;

/// Everything the scene graph needs from the outside world for one frame,
/// passed explicitly into `update`, `render`, property loading and command
/// handlers.
#[derive(Debug, Default)]
pub struct EngineContext {
    pub config: EngineConfig,
    pub events: EventBus,
    pub keys: KeyStore,
    pub focus: FocusTracker,
    pub resources: ResourceTable,
    commits: CommitQueue<ResourceCommit>,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Handle for loader threads to publish finished resources.
    pub fn resource_sender(&self) -> CommitSender<ResourceCommit> {
        self.commits.sender()
    }

    /// Moves committed resources into the resource table. Called once per
    /// frame on the thread that owns the scene.
    pub fn apply_commits(&mut self) -> Result<usize> {
        let commits = self.commits.drain()?;
        let count = commits.len();
        for commit in commits {
            self.resources.apply(commit);
        }
        if count > 0 {
            tracing::debug!(count, "applied resource commits");
        }
        Ok(count)
    }
}
