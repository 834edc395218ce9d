//! Story nodes and their ordered choice maps.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier of a node within a story graph.
///
/// Hand-written stories use readable ids such as `"start"`; nodes created
/// while authoring get UUID ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Emotional tone tag of a node.
///
/// The set of moods is open: the engine never validates membership and the
/// presentation layer picks a fallback style for moods it doesn't know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mood(String);

impl Mood {
    pub const NEUTRAL: &'static str = "neutral";

    pub fn new(mood: impl Into<String>) -> Self {
        Self(mood.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self(Self::NEUTRAL.to_string())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mood {
    fn from(mood: &str) -> Self {
        Self(mood.to_string())
    }
}

impl From<String> for Mood {
    fn from(mood: String) -> Self {
        Self(mood)
    }
}

/// One outgoing edge of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub target: NodeId,
}

/// Ordered mapping from choice label to target node id.
///
/// Labels are unique. Order is insertion order, which is also the order the
/// player sees the choices in. Serialized as a JSON object whose keys appear
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices {
    entries: Vec<Choice>,
}

impl Choices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a choice, or retarget an existing label in place.
    ///
    /// Returns the previous target if the label already existed.
    pub fn insert(&mut self, label: impl Into<String>, target: impl Into<NodeId>) -> Option<NodeId> {
        let label = label.into();
        let target = target.into();
        match self.entries.iter_mut().find(|c| c.label == label) {
            Some(existing) => Some(std::mem::replace(&mut existing.target, target)),
            None => {
                self.entries.push(Choice { label, target });
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&NodeId> {
        self.entries
            .iter()
            .find(|c| c.label == label)
            .map(|c| &c.target)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// The choice at a zero-based presentation position.
    pub fn nth(&self, index: usize) -> Option<&Choice> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.entries.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, T: Into<NodeId>> FromIterator<(L, T)> for Choices {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut choices = Choices::new();
        for (label, target) in iter {
            choices.insert(label, target);
        }
        choices
    }
}

impl Serialize for Choices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for choice in &self.entries {
            map.serialize_entry(&choice.label, &choice.target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChoicesVisitor;

        impl<'de> Visitor<'de> for ChoicesVisitor {
            type Value = Choices;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from choice label to node id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Choices, A::Error> {
                let mut choices = Choices::new();
                while let Some((label, target)) = access.next_entry::<String, NodeId>()? {
                    // Duplicate keys: last target wins, first position kept.
                    choices.insert(label, target);
                }
                Ok(choices)
            }
        }

        deserializer.deserialize_map(ChoicesVisitor)
    }
}

/// One narrative beat and its outgoing choices.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryNode {
    pub id: NodeId,
    pub text: String,
    pub choices: Choices,
    /// Opaque to the engine; carried through import and export.
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Opaque to the engine; a visual description of the scene.
    pub image_prompt: String,
    pub mood: Mood,
}

impl StoryNode {
    /// A node with the given text and every other field defaulted.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Choices::new(),
            metadata: serde_json::Map::new(),
            image_prompt: String::new(),
            mood: Mood::default(),
        }
    }

    /// An ending is a node with nowhere left to go.
    pub fn is_ending(&self) -> bool {
        self.choices.is_empty()
    }
}
