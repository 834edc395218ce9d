//! TUI widgets for the story player

pub mod choices;
pub mod input;
pub mod sidebar;
pub mod status_bar;
pub mod story;

pub use choices::ChoicesWidget;
pub use input::InputWidget;
pub use sidebar::SidebarWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use story::StoryWidget;
