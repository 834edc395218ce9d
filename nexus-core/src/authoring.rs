//! Authoring helpers for extending a story while it is being read.
//!
//! These are thin builders over [`StoryGraph::add_node`] and
//! [`StoryGraph::link_choice`]; they keep no state of their own.

use crate::error::StoryError;
use crate::graph::{SceneDraft, StoryGraph};
use crate::node::{Mood, NodeId};

/// Prefix of labels generated for linked scenes.
pub const SCENE_LABEL_PREFIX: &str = "Continue to: ";

/// Characters of scene text kept in a generated label.
pub const SCENE_LABEL_CHARS: usize = 30;

/// Marks a truncated label.
pub const ELLIPSIS: &str = "...";

/// Text of the junction node created by [`append_branch`].
pub const JUNCTION_TEXT: &str = "You come to a crossroads...";

/// Label leading from the current node to a new junction.
pub const JUNCTION_LABEL: &str = "Face a new challenge";

/// Junction label leading to the new scene.
pub const LEFT_PATH_LABEL: &str = "Take the left path";

/// Junction label leading back to the story's root.
pub const RIGHT_PATH_LABEL: &str = "Take the right path";

/// Moods offered when writing a new scene.
pub const SCENE_MOODS: [&str; 7] = [
    "neutral",
    "mysterious",
    "magical",
    "hopeful",
    "wise",
    "discovery",
    "epic",
];

/// Ids created by [`append_branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub junction: NodeId,
    pub leaf: NodeId,
}

/// Label for a choice leading to a scene: `"Continue to: "`, the first 30
/// characters of the trimmed text, then `"..."`.
pub fn scene_label(text: &str) -> String {
    let prefix: String = text.trim().chars().take(SCENE_LABEL_CHARS).collect();
    format!("{SCENE_LABEL_PREFIX}{prefix}{ELLIPSIS}")
}

/// Create a scene and link it from `from` under a label derived from its text.
///
/// Fails with [`StoryError::NodeNotFound`] before creating anything if `from`
/// doesn't exist.
pub fn append_linked_scene(
    graph: &mut StoryGraph,
    from: &str,
    text: &str,
    image_prompt: &str,
    mood: impl Into<Mood>,
) -> Result<NodeId, StoryError> {
    graph.get_node(from)?;
    let text = text.trim();

    let id = graph.add_node(
        SceneDraft::new(text)
            .with_image_prompt(image_prompt)
            .with_mood(mood),
    );
    graph.link_choice(from, scene_label(text), id.clone())?;

    tracing::info!(from, scene = %id, "Appended linked scene");
    Ok(id)
}

/// Create a junction offering the new scene or a return to `root`, and link
/// it from `from`.
///
/// ```text
/// from --"Face a new challenge"--> junction
/// junction --"Take the left path"--> leaf (the new scene)
/// junction --"Take the right path"--> root
/// ```
pub fn append_branch(
    graph: &mut StoryGraph,
    from: &str,
    text: &str,
    image_prompt: &str,
    mood: impl Into<Mood>,
    root: &NodeId,
) -> Result<Branch, StoryError> {
    graph.get_node(from)?;
    let text = text.trim();

    let junction = graph.add_node(SceneDraft::new(JUNCTION_TEXT));
    let leaf = graph.add_node(
        SceneDraft::new(text)
            .with_image_prompt(image_prompt)
            .with_mood(mood),
    );

    graph.link_choice(from, JUNCTION_LABEL, junction.clone())?;
    graph.link_choice(junction.as_str(), LEFT_PATH_LABEL, leaf.clone())?;
    graph.link_choice(junction.as_str(), RIGHT_PATH_LABEL, root.clone())?;

    tracing::info!(from, junction = %junction, leaf = %leaf, "Appended branch");
    Ok(Branch { junction, leaf })
}
