//! The story graph and its import/export definition format.
//!
//! A [`GraphDefinition`] is the document shape stories are exchanged in: a
//! JSON object mapping node ids to node objects. Parsing a definition is the
//! only place untrusted input enters the engine, so it is strict about types
//! and lenient about missing fields:
//!
//! ```json
//! {
//!   "start": {
//!     "text": "Two paths diverge.",
//!     "choices": { "Go left": "left", "Go right": "right" },
//!     "image_prompt": "a forked road at dusk",
//!     "mood": "mysterious"
//!   },
//!   "left": { "text": "The end." }
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::achievement::detect_achievement;
use crate::error::StoryError;
use crate::node::{Choices, Mood, NodeId, StoryNode};

/// Id that always wins root selection when present.
pub const START_NODE_ID: &str = "start";

/// One node entry of a definition document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNodeDefinition")]
pub struct NodeDefinition {
    pub text: String,
    pub choices: Choices,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub image_prompt: String,
    pub mood: Mood,
}

/// Wire form of a node entry. Both prompt spellings may appear in one entry;
/// `image_prompt` wins.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawNodeDefinition {
    text: String,
    choices: Choices,
    metadata: serde_json::Map<String, serde_json::Value>,
    image_prompt: Option<String>,
    #[serde(rename = "imagePrompt")]
    image_prompt_camel: Option<String>,
    mood: Mood,
}

impl From<RawNodeDefinition> for NodeDefinition {
    fn from(raw: RawNodeDefinition) -> Self {
        Self {
            text: raw.text,
            choices: raw.choices,
            metadata: raw.metadata,
            image_prompt: raw
                .image_prompt
                .or(raw.image_prompt_camel)
                .unwrap_or_default(),
            mood: raw.mood,
        }
    }
}

impl NodeDefinition {
    fn into_node(self, id: NodeId) -> StoryNode {
        StoryNode {
            id,
            text: self.text,
            choices: self.choices,
            metadata: self.metadata,
            image_prompt: self.image_prompt,
            mood: self.mood,
        }
    }
}

impl From<&StoryNode> for NodeDefinition {
    fn from(node: &StoryNode) -> Self {
        Self {
            text: node.text.clone(),
            choices: node.choices.clone(),
            metadata: node.metadata.clone(),
            image_prompt: node.image_prompt.clone(),
            mood: node.mood.clone(),
        }
    }
}

/// A whole story in exchange form, with nodes in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDefinition {
    entries: Vec<(NodeId, NodeDefinition)>,
}

impl GraphDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node entry. A repeated id replaces the earlier entry in place.
    pub fn insert(&mut self, id: impl Into<NodeId>, node: NodeDefinition) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((id, node)),
        }
    }

    pub fn with_node(mut self, id: impl Into<NodeId>, node: NodeDefinition) -> Self {
        self.insert(id, node);
        self
    }

    /// Parse a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, StoryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a definition from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StoryError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Render as pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn get(&self, id: &str) -> Option<&NodeDefinition> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == id)
            .map(|(_, node)| node)
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for GraphDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, node) in &self.entries {
            map.serialize_entry(id, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GraphDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefinitionVisitor;

        impl<'de> Visitor<'de> for DefinitionVisitor {
            type Value = GraphDefinition;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from node id to node object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<GraphDefinition, A::Error> {
                let mut definition = GraphDefinition::new();
                while let Some(id) = access.next_key::<NodeId>()? {
                    let node: NodeDefinition = access.next_value().map_err(|e| {
                        <A::Error as serde::de::Error>::custom(format!("node '{id}': {e}"))
                    })?;
                    definition.insert(id, node);
                }
                Ok(definition)
            }
        }

        deserializer.deserialize_map(DefinitionVisitor)
    }
}

/// Choice whose target is not a node of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingChoice {
    pub from: NodeId,
    pub label: String,
    pub target: NodeId,
}

/// Content and fields for a node about to be created.
#[derive(Debug, Clone, Default)]
pub struct SceneDraft {
    pub text: String,
    pub choices: Choices,
    pub image_prompt: String,
    pub mood: Mood,
}

impl SceneDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_choice(mut self, label: impl Into<String>, target: impl Into<NodeId>) -> Self {
        self.choices.insert(label, target);
        self
    }

    pub fn with_image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.image_prompt = prompt.into();
        self
    }

    pub fn with_mood(mut self, mood: impl Into<Mood>) -> Self {
        self.mood = mood.into();
        self
    }
}

/// A branching story: nodes keyed by id, plus the node traversal starts at.
///
/// Nodes are never removed. Loading a definition replaces everything;
/// authoring only ever adds nodes and choices.
#[derive(Debug, Clone, Default)]
pub struct StoryGraph {
    nodes: HashMap<NodeId, StoryNode>,
    /// Declaration order of `nodes`, followed by creation order.
    order: Vec<NodeId>,
    root_id: Option<NodeId>,
}

impl StoryGraph {
    /// An empty graph with no root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definition(definition: GraphDefinition) -> Self {
        let mut graph = Self::new();
        graph.load(definition);
        graph
    }

    pub fn from_json(json: &str) -> Result<Self, StoryError> {
        Ok(Self::from_definition(GraphDefinition::from_json(json)?))
    }

    /// Replace every node with those of `definition` and recompute the root.
    ///
    /// Link targets are not validated. The definition is already a typed,
    /// validated document, so this cannot fail.
    pub fn load(&mut self, definition: GraphDefinition) {
        let mut nodes = HashMap::with_capacity(definition.len());
        let mut order = Vec::with_capacity(definition.len());

        for (id, node) in definition.entries {
            order.push(id.clone());
            nodes.insert(id.clone(), node.into_node(id));
        }

        let root_id = select_root(&order);

        self.nodes = nodes;
        self.order = order;
        self.root_id = root_id;

        tracing::info!(
            nodes = self.nodes.len(),
            root = ?self.root_id,
            "Loaded story graph"
        );
    }

    /// Parse `json` and load it. On any parse error the current graph is
    /// left untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), StoryError> {
        let definition = GraphDefinition::from_json(json).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected story definition");
        })?;
        self.load(definition);
        Ok(())
    }

    /// Like [`StoryGraph::load_json`], from a decoded JSON value.
    pub fn load_value(&mut self, value: serde_json::Value) -> Result<(), StoryError> {
        let definition = GraphDefinition::from_value(value).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected story definition");
        })?;
        self.load(definition);
        Ok(())
    }

    pub fn get_node(&self, id: &str) -> Result<&StoryNode, StoryError> {
        self.nodes
            .get(id)
            .ok_or_else(|| StoryError::NodeNotFound(NodeId::from(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root_id(&self) -> Option<&NodeId> {
        self.root_id.as_ref()
    }

    pub fn get_root(&self) -> Result<&StoryNode, StoryError> {
        let root_id = self.root_id.as_ref().ok_or(StoryError::NoRootDefined)?;
        self.get_node(root_id.as_str())
    }

    /// Insert a new node under a fresh UUID id and return the id.
    pub fn add_node(&mut self, draft: SceneDraft) -> NodeId {
        let mut id = NodeId::random();
        while self.nodes.contains_key(&id) {
            id = NodeId::random();
        }

        let node = StoryNode {
            id: id.clone(),
            text: draft.text,
            choices: draft.choices,
            metadata: serde_json::Map::new(),
            image_prompt: draft.image_prompt,
            mood: draft.mood,
        };
        self.nodes.insert(id.clone(), node);
        self.order.push(id.clone());

        tracing::debug!(node = %id, "Added story node");
        id
    }

    /// Point `label` on node `from` at `to`.
    ///
    /// An existing label keeps its position; a new label goes last. `to` does
    /// not need to exist yet, which allows linking ahead of creating the
    /// target.
    pub fn link_choice(
        &mut self,
        from: &str,
        label: impl Into<String>,
        to: impl Into<NodeId>,
    ) -> Result<(), StoryError> {
        let node = self
            .nodes
            .get_mut(from)
            .ok_or_else(|| StoryError::NodeNotFound(NodeId::from(from)))?;
        let label = label.into();
        let to = to.into();

        tracing::debug!(from, label = %label, to = %to, "Linked choice");
        node.choices.insert(label, to);
        Ok(())
    }

    /// The graph in the exact shape [`StoryGraph::load`] accepts.
    pub fn export(&self) -> GraphDefinition {
        let mut definition = GraphDefinition::new();
        for node in self.nodes() {
            definition.insert(node.id.clone(), NodeDefinition::from(node));
        }
        definition
    }

    /// Nodes in declaration order, then creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every choice whose target is missing from the graph.
    pub fn dangling_choices(&self) -> Vec<DanglingChoice> {
        self.nodes()
            .flat_map(|node| {
                node.choices
                    .iter()
                    .filter(|choice| !self.contains(choice.target.as_str()))
                    .map(|choice| DanglingChoice {
                        from: node.id.clone(),
                        label: choice.label.clone(),
                        target: choice.target.clone(),
                    })
            })
            .collect()
    }

    /// Distinct non-empty achievement names announced by ending nodes.
    pub fn achievement_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for node in self.nodes().filter(|n| n.is_ending()) {
            if let Some(name) = detect_achievement(&node.text) {
                if !name.is_empty() && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// `"start"` if present, else the first declared id.
fn select_root(order: &[NodeId]) -> Option<NodeId> {
    order
        .iter()
        .find(|id| id.as_str() == START_NODE_ID)
        .or_else(|| order.first())
        .cloned()
}
