//! Achievement markers embedded in ending text.
//!
//! An ending announces its achievement inline:
//!
//! ```text
//! Achievement Unlocked: Keeper of the Light 🏆
//! ```
//!
//! The name is everything between the marker and the trophy, trimmed.

/// Text that introduces an achievement name.
pub const ACHIEVEMENT_MARKER: &str = "Achievement Unlocked:";

/// Delimiter that closes an achievement name.
pub const TROPHY: &str = "🏆";

/// Extract the achievement name announced in `text`, if any.
///
/// Returns `None` when the marker is absent. When the marker is present but
/// no trophy follows, the name runs to the end of the text. The name may be
/// empty after trimming; callers decide whether that counts.
pub fn detect_achievement(text: &str) -> Option<String> {
    let (_, after_marker) = text.split_once(ACHIEVEMENT_MARKER)?;
    let name = match after_marker.split_once(TROPHY) {
        Some((name, _)) => name,
        None => after_marker,
    };
    Some(name.trim().to_string())
}

/// Result of recording an achievement in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementUnlock {
    pub name: String,
    /// False when the session already held this achievement. Notifications
    /// should only fire for new unlocks.
    pub was_new: bool,
}

/// Insertion-ordered set of unlocked achievement names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Achievements {
    names: Vec<String>,
}

impl Achievements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an achievement, reporting whether it was new.
    pub fn unlock(&mut self, name: impl Into<String>) -> AchievementUnlock {
        let name = name.into();
        let was_new = !self.contains(&name);
        if was_new {
            self.names.push(name.clone());
        }
        AchievementUnlock { name, was_new }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
