//! Session - progress through one story graph.
//!
//! A [`Session`] records where a single reader has been: the ids of visited
//! nodes, the text shown at each step, the number of choices made and the
//! achievements unlocked. It holds no reference to the graph; every
//! operation that needs nodes takes the graph as an argument, so several
//! sessions can walk the same graph and authoring edits are visible at once.

use chrono::{DateTime, TimeDelta, Utc};

use crate::achievement::{AchievementUnlock, Achievements};
use crate::error::StoryError;
use crate::graph::StoryGraph;
use crate::node::{NodeId, StoryNode};

/// Number of steps after which the journey counts as complete.
pub const DEFAULT_PROGRESS_HORIZON: usize = 10;

/// Outcome of an undo request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The last step was removed; carries the id now current.
    Undone(NodeId),
    /// Already at the first node.
    NothingToUndo,
}

/// Summary numbers for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub choices_made: usize,
    pub minutes_played: i64,
    pub achievements_unlocked: usize,
    /// Distinct achievements the graph can award.
    pub achievements_available: usize,
}

/// One reader's traversal state.
///
/// Invariants: `history` and `visited_text` have the same length, which is
/// at least one; the current node is the last entry of `history`; with no
/// failed operations `choice_count == history.len() - 1`.
#[derive(Debug, Clone)]
pub struct Session {
    history: Vec<NodeId>,
    visited_text: Vec<String>,
    achievements: Achievements,
    choice_count: usize,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Begin a session at the graph's root.
    pub fn start(graph: &StoryGraph) -> Result<Self, StoryError> {
        let root = graph.get_root()?;
        tracing::info!(root = %root.id, "Session started");
        Ok(Self {
            history: vec![root.id.clone()],
            visited_text: vec![root.text.clone()],
            achievements: Achievements::new(),
            choice_count: 0,
            started_at: Utc::now(),
        })
    }

    /// Start over from the graph's current root.
    ///
    /// Clears history, achievements and the choice counter. Fails with
    /// [`StoryError::NoRootDefined`] and changes nothing if the graph has no
    /// root.
    pub fn restart(&mut self, graph: &StoryGraph) -> Result<(), StoryError> {
        *self = Self::start(graph)?;
        Ok(())
    }

    /// Follow the choice labelled `label` from the current node.
    ///
    /// Fails without changing the session if the current node has no such
    /// choice, or if the choice points at a node that doesn't exist.
    pub fn choose(&mut self, graph: &StoryGraph, label: &str) -> Result<&NodeId, StoryError> {
        let current = graph.get_node(self.current_id().as_str())?;

        let target_id = current.choices.get(label).ok_or_else(|| {
            tracing::warn!(node = %current.id, label, "Invalid choice");
            StoryError::InvalidChoice {
                node: current.id.clone(),
                label: label.to_string(),
            }
        })?;

        let target = graph.get_node(target_id.as_str()).map_err(|_| {
            tracing::warn!(node = %current.id, label, target = %target_id, "Dangling link");
            StoryError::DanglingLink {
                from: current.id.clone(),
                label: label.to_string(),
                target: target_id.clone(),
            }
        })?;

        tracing::debug!(from = %current.id, to = %target.id, "Choice made");
        self.history.push(target.id.clone());
        self.visited_text.push(target.text.clone());
        self.choice_count += 1;

        Ok(self.current_id())
    }

    /// Step back to the previous node.
    pub fn undo(&mut self) -> UndoOutcome {
        if self.history.len() <= 1 {
            return UndoOutcome::NothingToUndo;
        }

        self.history.pop();
        self.visited_text.pop();
        self.choice_count = self.choice_count.saturating_sub(1);

        tracing::debug!(current = %self.current_id(), "Undid last choice");
        UndoOutcome::Undone(self.current_id().clone())
    }

    /// Id of the node the reader is on.
    pub fn current_id(&self) -> &NodeId {
        // history always holds at least the root
        &self.history[self.history.len() - 1]
    }

    /// The node the reader is on, looked up in `graph`.
    pub fn current_node<'g>(&self, graph: &'g StoryGraph) -> Result<&'g StoryNode, StoryError> {
        graph.get_node(self.current_id().as_str())
    }

    /// Whether the current node offers no choices.
    pub fn is_at_ending(&self, graph: &StoryGraph) -> Result<bool, StoryError> {
        Ok(self.current_node(graph)?.is_ending())
    }

    /// Record an achievement; `was_new` tells whether to announce it.
    pub fn unlock_achievement(&mut self, name: impl Into<String>) -> AchievementUnlock {
        let unlock = self.achievements.unlock(name);
        if unlock.was_new {
            tracing::info!(achievement = %unlock.name, "Achievement unlocked");
        }
        unlock
    }

    /// The visited text as numbered chapters, ready for a plain-text export.
    pub fn compile_transcript(&self) -> String {
        self.visited_text
            .iter()
            .enumerate()
            .map(|(i, text)| format!("Chapter {}:\n{}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    pub fn visited_text(&self) -> &[String] {
        &self.visited_text
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since the session started or last restarted.
    pub fn elapsed(&self) -> TimeDelta {
        Utc::now() - self.started_at
    }

    /// Share of the journey completed, capped at 1.0.
    pub fn progress(&self, horizon: usize) -> f64 {
        if horizon == 0 {
            return 1.0;
        }
        (self.history.len() as f64 / horizon as f64).min(1.0)
    }

    /// `"Step 1 → Step 2 → ..."`, one step per visited node.
    pub fn journey_path(&self) -> String {
        (1..=self.history.len())
            .map(|i| format!("Step {i}"))
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn stats(&self, graph: &StoryGraph) -> SessionStats {
        SessionStats {
            choices_made: self.choice_count,
            minutes_played: self.elapsed().num_minutes(),
            achievements_unlocked: self.achievements.len(),
            achievements_available: graph.achievement_names().len(),
        }
    }
}
