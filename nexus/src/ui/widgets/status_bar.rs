//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use nexus_core::Mood;

use crate::app::InputMode;
use crate::ui::theme::StoryTheme;

/// Status bar showing mode, authoring settings and the last message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    scene_mood: &'a Mood,
    theme: &'a StoryTheme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, scene_mood: &'a Mood, theme: &'a StoryTheme) -> Self {
        Self {
            input_mode,
            scene_mood,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Input mode indicator (vim-style)
        let (input_mode_text, input_mode_style) = match self.input_mode {
            InputMode::Normal => ("READ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            InputMode::Insert => ("WRITE", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            InputMode::Command => ("COMMAND", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        };

        let mut spans = vec![
            Span::styled(format!("-- {input_mode_text} --"), input_mode_style),
            Span::raw(" | "),
            Span::styled(
                format!("new scenes: {}", self.scene_mood),
                Style::default().fg(self.theme.mood_color(self.scene_mood)),
            ),
        ];

        if let Some(msg) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, Style::default().add_modifier(Modifier::DIM)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget {
    input_mode: InputMode,
}

impl HotkeyBarWidget {
    pub fn new(input_mode: InputMode) -> Self {
        Self { input_mode }
    }
}

impl Widget for HotkeyBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hotkeys = match self.input_mode {
            InputMode::Normal => vec![
                ("1-9:choose", true),
                ("j/k+Enter:select", true),
                ("u:undo", true),
                ("r:restart", true),
                ("i:write", true),
                ("::command", true),
                ("?:help", false),
            ],
            InputMode::Insert => vec![("Esc:cancel", true), ("Enter:add scene", true)],
            InputMode::Command => vec![
                ("Esc:cancel", true),
                ("Enter:execute", true),
                (":export", false),
                (":import", false),
                (":branch", false),
                (":q", false),
            ],
        };

        let spans: Vec<Span> = hotkeys
            .iter()
            .flat_map(|(text, primary)| {
                let style = if *primary {
                    Style::default()
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                };
                vec![Span::styled(*text, style), Span::raw("  ")]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
