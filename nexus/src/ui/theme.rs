//! Color theme and styling for the story player

use nexus_core::Mood;
use ratatui::style::{Color, Modifier, Style};

/// Accent colors keyed by scene mood.
const MOOD_ACCENTS: [(&str, Color); 12] = [
    ("mysterious", Color::Rgb(0x6A, 0x0D, 0xAD)),
    ("magical", Color::Rgb(0xFF, 0x6B, 0x6B)),
    ("hopeful", Color::Rgb(0x4E, 0xCD, 0xC4)),
    ("wise", Color::Rgb(0xFF, 0xD1, 0x66)),
    ("discovery", Color::Rgb(0x06, 0xD6, 0xA0)),
    ("epic", Color::Rgb(0x11, 0x8A, 0xB2)),
    ("peaceful", Color::Rgb(0x83, 0xC5, 0xBE)),
    ("visionary", Color::Rgb(0x9D, 0x4E, 0xDD)),
    ("fulfilling", Color::Rgb(0xF7, 0x25, 0x85)),
    ("content", Color::Rgb(0x43, 0xAA, 0x8B)),
    ("triumphant", Color::Rgb(0xF4, 0x8C, 0x06)),
    ("wonderous", Color::Rgb(0x72, 0x09, 0xB7)),
];

/// Story UI color theme
#[derive(Debug, Clone)]
pub struct StoryTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,

    /// Accent for moods without an entry in the palette.
    pub default_accent: Color,

    // Text colors
    pub story_text: Color,
    pub choice_text: Color,
    pub choice_selected: Color,
    pub prompt_text: Color,
    pub system_text: Color,

    // Milestones
    pub ending: Color,
    pub achievement: Color,
    pub progress: Color,
}

impl Default for StoryTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,

            default_accent: Color::Rgb(0x4C, 0xAF, 0x50),

            story_text: Color::White,
            choice_text: Color::Gray,
            choice_selected: Color::Cyan,
            prompt_text: Color::LightMagenta,
            system_text: Color::DarkGray,

            ending: Color::LightYellow,
            achievement: Color::Rgb(0xFF, 0xD7, 0x00),
            progress: Color::Green,
        }
    }
}

impl StoryTheme {
    /// Accent color for a mood; unknown moods get the default accent.
    pub fn mood_color(&self, mood: &Mood) -> Color {
        MOOD_ACCENTS
            .iter()
            .find(|(name, _)| *name == mood.as_str())
            .map(|(_, color)| *color)
            .unwrap_or(self.default_accent)
    }

    /// Border style for the story panel, tinted by mood.
    pub fn mood_border_style(&self, mood: &Mood) -> Style {
        Style::default().fg(self.mood_color(mood))
    }

    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    /// Style for a choice line.
    pub fn choice_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.choice_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.choice_text)
        }
    }

    pub fn prompt_style(&self) -> Style {
        Style::default()
            .fg(self.prompt_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn ending_style(&self) -> Style {
        Style::default()
            .fg(self.ending)
            .add_modifier(Modifier::BOLD)
    }

    pub fn achievement_style(&self) -> Style {
        Style::default()
            .fg(self.achievement)
            .add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.choice_selected
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}
