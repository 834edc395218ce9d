//! A story graph shared between readers.
//!
//! Sessions never hold a graph, so any number of them can walk one
//! [`SharedGraph`]. Reads run concurrently; loads and authoring edits take
//! the write lock and are seen by every session on its next step.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::authoring;
use crate::error::StoryError;
use crate::graph::{GraphDefinition, StoryGraph};
use crate::node::{Mood, NodeId};
use crate::session::Session;

/// Cheaply cloneable handle to one graph.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<StoryGraph>>,
}

impl SharedGraph {
    pub fn new(graph: StoryGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoryGraph> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, StoryGraph> {
        self.inner.write().await
    }

    /// Start a new session at the current root.
    pub async fn start_session(&self) -> Result<Session, StoryError> {
        Session::start(&*self.read().await)
    }

    /// Advance `session` along `label` under a read lock.
    pub async fn choose(&self, session: &mut Session, label: &str) -> Result<NodeId, StoryError> {
        let graph = self.read().await;
        session.choose(&graph, label).cloned()
    }

    /// Replace the whole graph. Existing sessions should restart.
    pub async fn load(&self, definition: GraphDefinition) {
        self.write().await.load(definition);
    }

    /// Append a linked scene to node `from` under the write lock.
    pub async fn append_linked_scene(
        &self,
        from: &str,
        text: &str,
        image_prompt: &str,
        mood: impl Into<Mood>,
    ) -> Result<NodeId, StoryError> {
        let mut graph = self.write().await;
        authoring::append_linked_scene(&mut graph, from, text, image_prompt, mood)
    }

    /// An owned copy of the graph in exchange form.
    pub async fn export(&self) -> GraphDefinition {
        self.read().await.export()
    }
}

impl From<StoryGraph> for SharedGraph {
    fn from(graph: StoryGraph) -> Self {
        Self::new(graph)
    }
}
