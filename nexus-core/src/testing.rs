//! Testing utilities for story graphs and sessions.
//!
//! This module provides tools for integration testing:
//! - `StoryHarness` for scripting a walk through a story
//! - Assertion helpers for checking session state

use crate::error::StoryError;
use crate::graph::StoryGraph;
use crate::playthrough::{ChoiceOutcome, Playthrough};
use crate::session::UndoOutcome;

/// Test harness for scripted playthroughs.
pub struct StoryHarness {
    /// The playthrough under test.
    pub play: Playthrough,
}

impl StoryHarness {
    /// Create a harness on the built-in sample story.
    pub fn new() -> Self {
        Self {
            play: Playthrough::sample().expect("sample story has a root"),
        }
    }

    /// Create a harness from a JSON story document.
    pub fn from_json(json: &str) -> Self {
        let graph = StoryGraph::from_json(json).expect("story JSON should parse");
        Self {
            play: Playthrough::new(graph).expect("story should have a root"),
        }
    }

    /// Follow a choice by label, panicking if it is not available.
    #[track_caller]
    pub fn choose(&mut self, label: &str) -> ChoiceOutcome {
        match self.play.choose(label) {
            Ok(outcome) => outcome,
            Err(e) => panic!("Choice '{label}' failed: {e}"),
        }
    }

    /// Follow a sequence of choices, returning the last outcome.
    #[track_caller]
    pub fn walk(&mut self, labels: &[&str]) -> Option<ChoiceOutcome> {
        let mut last = None;
        for label in labels {
            last = Some(self.choose(label));
        }
        last
    }

    /// Try a choice without panicking.
    pub fn try_choose(&mut self, label: &str) -> Result<ChoiceOutcome, StoryError> {
        self.play.choose(label)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        self.play.undo()
    }

    /// Id of the current node.
    pub fn current(&self) -> &str {
        self.play.current_id().as_str()
    }

    /// Labels of the current node's choices, in order.
    pub fn choice_labels(&self) -> Vec<String> {
        self.play
            .current_node()
            .map(|node| node.choices.labels().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether an achievement has been unlocked.
    pub fn has_achievement(&self, name: &str) -> bool {
        self.play.achievements().contains(name)
    }
}

impl Default for StoryHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session's bookkeeping agrees with itself.
///
/// `history` and `visited_text` have equal, non-zero length, the visited text
/// matches the graph's current text for each step, and the choice count
/// equals the number of steps taken.
#[track_caller]
pub fn assert_session_consistent(harness: &StoryHarness) {
    let session = harness.play.session();
    let graph = harness.play.graph();

    assert!(!session.history().is_empty(), "Expected non-empty history");
    assert_eq!(
        session.history().len(),
        session.visited_text().len(),
        "Expected history and visited text to have the same length"
    );
    assert_eq!(
        session.choice_count(),
        session.history().len() - 1,
        "Expected choice count to equal steps taken"
    );
    for (id, text) in session.history().iter().zip(session.visited_text()) {
        let node = graph
            .get_node(id.as_str())
            .unwrap_or_else(|e| panic!("History holds unknown node: {e}"));
        assert_eq!(&node.text, text, "Visited text differs for node {id}");
    }
}

/// Assert the reader is on node `id`.
#[track_caller]
pub fn assert_at(harness: &StoryHarness, id: &str) {
    assert_eq!(
        harness.current(),
        id,
        "Expected to be at node '{id}', was at '{}'",
        harness.current()
    );
}

/// Assert the current node offers `count` choices.
#[track_caller]
pub fn assert_choice_count(harness: &StoryHarness, count: usize) {
    let labels = harness.choice_labels();
    assert_eq!(
        labels.len(),
        count,
        "Expected {count} choices, found {labels:?}"
    );
}

/// Assert an achievement has been unlocked.
#[track_caller]
pub fn assert_achievement(harness: &StoryHarness, name: &str) {
    assert!(
        harness.has_achievement(name),
        "Expected achievement '{name}' to be unlocked"
    );
}
