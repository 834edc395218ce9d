//! UI module for the story player

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::Overlay;
