//! Branching story engine.
//!
//! This crate provides:
//! - A story graph of nodes joined by labelled choices, loaded from and
//!   exported to a JSON exchange document
//! - Reading sessions with history, undo and restart
//! - Achievements announced by ending text
//! - Authoring helpers for extending a story while reading it
//! - Story file and transcript persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use nexus_core::Playthrough;
//!
//! fn main() -> Result<(), nexus_core::StoryError> {
//!     let mut play = Playthrough::sample()?;
//!
//!     let outcome = play.choose_index(1)?;
//!     println!("{}", play.current_node()?.text);
//!
//!     if let Some(unlock) = outcome.unlocked {
//!         println!("Unlocked {}", unlock.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod achievement;
pub mod authoring;
pub mod error;
pub mod graph;
pub mod node;
pub mod persist;
pub mod playthrough;
pub mod sample;
pub mod session;
pub mod shared;
pub mod testing;

// Primary public API
pub use achievement::{detect_achievement, AchievementUnlock, Achievements};
pub use authoring::{append_branch, append_linked_scene, scene_label, Branch};
pub use error::{PersistError, StoryError};
pub use graph::{GraphDefinition, NodeDefinition, SceneDraft, StoryGraph};
pub use node::{Choice, Choices, Mood, NodeId, StoryNode};
pub use playthrough::{ChoiceOutcome, PlayerConfig, Playthrough};
pub use session::{Session, SessionStats, UndoOutcome};
pub use shared::SharedGraph;
pub use testing::StoryHarness;
