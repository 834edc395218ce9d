//! Playthrough - one graph, one reader.
//!
//! [`Playthrough`] is the entry point used by the terminal player and the
//! headless runner. It owns a [`StoryGraph`] and a [`Session`] on it, awards
//! achievements when the reader lands on an ending, and applies authoring
//! edits at the reader's current position.

use std::path::PathBuf;

use crate::achievement::{detect_achievement, AchievementUnlock, Achievements};
use crate::authoring::{self, Branch};
use crate::error::StoryError;
use crate::graph::{GraphDefinition, StoryGraph};
use crate::node::{Mood, NodeId, StoryNode};
use crate::sample::sample_story;
use crate::session::{Session, SessionStats, UndoOutcome, DEFAULT_PROGRESS_HORIZON};

/// Settings for a playthrough.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Steps after which the progress bar is full.
    pub progress_horizon: usize,

    /// Directory for story exports and transcripts.
    pub export_dir: PathBuf,
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self {
            progress_horizon: DEFAULT_PROGRESS_HORIZON,
            export_dir: PathBuf::from("."),
        }
    }

    /// Set the number of steps that counts as a full journey.
    pub fn with_progress_horizon(mut self, horizon: usize) -> Self {
        self.progress_horizon = horizon;
        self
    }

    /// Set the directory exports are written to.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened after a successful choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutcome {
    /// The node now current.
    pub node_id: NodeId,

    /// Whether the node offers no further choices.
    pub at_ending: bool,

    /// Set when the ending announced an achievement.
    pub unlocked: Option<AchievementUnlock>,
}

/// A reader's walk through a story they may also be writing.
#[derive(Debug, Clone)]
pub struct Playthrough {
    graph: StoryGraph,
    session: Session,
    config: PlayerConfig,
}

impl Playthrough {
    /// Start reading `graph` from its root.
    pub fn new(graph: StoryGraph) -> Result<Self, StoryError> {
        let session = Session::start(&graph)?;
        Ok(Self {
            graph,
            session,
            config: PlayerConfig::default(),
        })
    }

    /// Start reading the built-in sample story.
    pub fn sample() -> Result<Self, StoryError> {
        Self::new(sample_story())
    }

    pub fn with_config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn current_node(&self) -> Result<&StoryNode, StoryError> {
        self.session.current_node(&self.graph)
    }

    pub fn current_id(&self) -> &NodeId {
        self.session.current_id()
    }

    pub fn is_at_ending(&self) -> Result<bool, StoryError> {
        self.session.is_at_ending(&self.graph)
    }

    /// Follow a choice by label.
    ///
    /// Landing on an ending that names an achievement unlocks it. Endings
    /// with an empty achievement name award nothing.
    pub fn choose(&mut self, label: &str) -> Result<ChoiceOutcome, StoryError> {
        let node_id = self.session.choose(&self.graph, label)?.clone();
        let node = self.graph.get_node(node_id.as_str())?;
        let at_ending = node.is_ending();

        let unlocked = if at_ending {
            detect_achievement(&node.text)
                .filter(|name| !name.is_empty())
                .map(|name| self.session.unlock_achievement(name))
        } else {
            None
        };

        Ok(ChoiceOutcome {
            node_id,
            at_ending,
            unlocked,
        })
    }

    /// Follow the `n`th choice of the current node, counting from 1.
    pub fn choose_index(&mut self, n: usize) -> Result<ChoiceOutcome, StoryError> {
        let node = self.current_node()?;
        let label = n
            .checked_sub(1)
            .and_then(|i| node.choices.nth(i))
            .map(|choice| choice.label.clone())
            .ok_or_else(|| StoryError::InvalidChoice {
                node: node.id.clone(),
                label: format!("#{n}"),
            })?;
        self.choose(&label)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        self.session.undo()
    }

    /// Start again from the root, clearing progress and achievements.
    pub fn restart(&mut self) -> Result<(), StoryError> {
        self.session.restart(&self.graph)
    }

    /// Replace the story with a parsed definition and restart on it.
    ///
    /// If the new story has no root, nothing changes.
    pub fn import_definition(&mut self, definition: GraphDefinition) -> Result<(), StoryError> {
        let graph = StoryGraph::from_definition(definition);
        let session = Session::start(&graph)?;
        self.graph = graph;
        self.session = session;
        Ok(())
    }

    /// Replace the story from an exchange document and restart on it.
    ///
    /// Malformed input leaves the current story and progress untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), StoryError> {
        let definition = GraphDefinition::from_json(json)?;
        self.import_definition(definition)
    }

    /// The whole story as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.graph.export().to_json_pretty()
    }

    /// Write a new scene and link it from the current node.
    pub fn add_scene(
        &mut self,
        text: &str,
        image_prompt: &str,
        mood: impl Into<Mood>,
    ) -> Result<NodeId, StoryError> {
        if text.trim().is_empty() {
            return Err(StoryError::EmptySceneText);
        }
        authoring::append_linked_scene(
            &mut self.graph,
            self.session.current_id().as_str(),
            text,
            image_prompt,
            mood,
        )
    }

    /// Write a new scene behind a junction that also leads back to the root.
    pub fn add_branch(
        &mut self,
        text: &str,
        image_prompt: &str,
        mood: impl Into<Mood>,
    ) -> Result<Branch, StoryError> {
        if text.trim().is_empty() {
            return Err(StoryError::EmptySceneText);
        }
        let root = self.graph.root_id().cloned().ok_or(StoryError::NoRootDefined)?;
        authoring::append_branch(
            &mut self.graph,
            self.session.current_id().as_str(),
            text,
            image_prompt,
            mood,
            &root,
        )
    }

    pub fn transcript(&self) -> String {
        self.session.compile_transcript()
    }

    pub fn achievements(&self) -> &Achievements {
        self.session.achievements()
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats(&self.graph)
    }

    /// Share of the journey completed under the configured horizon.
    pub fn progress(&self) -> f64 {
        self.session.progress(self.config.progress_horizon)
    }

    pub fn journey_path(&self) -> String {
        self.session.journey_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{FOREST_TRAIL, VILLAGE_ROAD};

    #[test]
    fn test_sample_starts_at_root() {
        let play = Playthrough::sample().unwrap();
        assert_eq!(play.current_id(), "start");
        assert!(!play.is_at_ending().unwrap());
    }

    #[test]
    fn test_reach_ending_unlocks_once() {
        let mut play = Playthrough::sample().unwrap();

        play.choose(VILLAGE_ROAD).unwrap();
        play.choose("💎 Buy the mysterious amulet - invest in magic").unwrap();
        let outcome = play
            .choose("🌊 Follow the vision to the lighthouse - heed the call")
            .unwrap();

        assert_eq!(outcome.node_id, "lighthouse_path");
        assert!(outcome.at_ending);
        let unlock = outcome.unlocked.unwrap();
        assert_eq!(unlock.name, "Keeper of the Light");
        assert!(unlock.was_new);

        play.undo();
        let again = play
            .choose("🌊 Follow the vision to the lighthouse - heed the call")
            .unwrap();
        assert!(!again.unlocked.unwrap().was_new);
        assert_eq!(play.achievements().len(), 1);
    }

    #[test]
    fn test_non_ending_awards_nothing() {
        let mut play = Playthrough::sample().unwrap();
        let outcome = play.choose(FOREST_TRAIL).unwrap();
        assert!(!outcome.at_ending);
        assert!(outcome.unlocked.is_none());
    }

    #[test]
    fn test_empty_achievement_name_ignored() {
        let graph = StoryGraph::from_json(
            r#"{"start": {"text": "Go", "choices": {"On": "end"}},
                "end": {"text": "Achievement Unlocked: 🏆"}}"#,
        )
        .unwrap();
        let mut play = Playthrough::new(graph).unwrap();

        let outcome = play.choose("On").unwrap();

        assert!(outcome.at_ending);
        assert!(outcome.unlocked.is_none());
        assert!(play.achievements().is_empty());
    }

    #[test]
    fn test_choose_index() {
        let mut play = Playthrough::sample().unwrap();

        let outcome = play.choose_index(2).unwrap();
        assert_eq!(outcome.node_id, "village_gate");

        assert!(matches!(
            play.choose_index(0),
            Err(StoryError::InvalidChoice { .. })
        ));
        assert!(matches!(
            play.choose_index(9),
            Err(StoryError::InvalidChoice { .. })
        ));
        assert_eq!(play.current_id(), "village_gate");
    }

    #[test]
    fn test_malformed_import_keeps_state() {
        let mut play = Playthrough::sample().unwrap();
        play.choose(FOREST_TRAIL).unwrap();

        let err = play.import_json(r#"{"start": {"choices": []}}"#).unwrap_err();

        assert!(matches!(err, StoryError::MalformedDefinition(_)));
        assert_eq!(play.current_id(), "forest_entrance");
        assert_eq!(play.graph().len(), 14);
    }

    #[test]
    fn test_empty_import_keeps_state() {
        let mut play = Playthrough::sample().unwrap();
        assert_eq!(play.import_json("{}").unwrap_err(), StoryError::NoRootDefined);
        assert_eq!(play.graph().len(), 14);
    }

    #[test]
    fn test_import_restarts() {
        let mut play = Playthrough::sample().unwrap();
        play.choose(FOREST_TRAIL).unwrap();

        play.import_json(r#"{"intro": {"text": "A new tale"}}"#).unwrap();

        assert_eq!(play.current_id(), "intro");
        assert_eq!(play.session().history().len(), 1);
        assert_eq!(play.stats().choices_made, 0);
    }

    #[test]
    fn test_add_scene_at_current_node() {
        let mut play = Playthrough::sample().unwrap();
        play.choose(FOREST_TRAIL).unwrap();

        let id = play.add_scene("A fox watches you", "red fox", "wise").unwrap();

        let node = play.current_node().unwrap();
        assert_eq!(node.choices.len(), 4);
        let label = "Continue to: A fox watches you...";
        assert_eq!(node.choices.get(label), Some(&id));

        let outcome = play.choose(label).unwrap();
        assert_eq!(outcome.node_id, id);
        assert!(outcome.at_ending);
    }

    #[test]
    fn test_scene_text_stored_trimmed() {
        let mut play = Playthrough::sample().unwrap();
        let id = play.add_scene("   A fox   ", "", "neutral").unwrap();

        play.choose("Continue to: A fox...").unwrap();
        assert_eq!(play.current_id(), &id);
        assert_eq!(play.current_node().unwrap().text, "A fox");
        assert!(play.transcript().ends_with("Chapter 2:\nA fox"));
    }

    #[test]
    fn test_blank_scene_rejected() {
        let mut play = Playthrough::sample().unwrap();
        assert_eq!(
            play.add_scene("   ", "", "neutral").unwrap_err(),
            StoryError::EmptySceneText
        );
        assert_eq!(
            play.add_branch("", "", "neutral").unwrap_err(),
            StoryError::EmptySceneText
        );
        assert_eq!(play.graph().len(), 14);
    }

    #[test]
    fn test_add_branch_returns_to_root() {
        let mut play = Playthrough::sample().unwrap();
        play.choose(VILLAGE_ROAD).unwrap();

        let branch = play.add_branch("A cellar door", "", "mysterious").unwrap();

        play.choose(authoring::JUNCTION_LABEL).unwrap();
        assert_eq!(play.current_id(), &branch.junction);
        play.choose(authoring::RIGHT_PATH_LABEL).unwrap();
        assert_eq!(play.current_id(), "start");
    }

    #[test]
    fn test_progress_uses_config() {
        let mut play = Playthrough::sample()
            .unwrap()
            .with_config(PlayerConfig::new().with_progress_horizon(4));
        play.choose(FOREST_TRAIL).unwrap();
        assert!((play.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_round_trip() {
        let play = Playthrough::sample().unwrap();
        let json = play.export_json().unwrap();

        let copy = StoryGraph::from_json(&json).unwrap();
        assert_eq!(copy.export(), play.graph().export());
    }
}
