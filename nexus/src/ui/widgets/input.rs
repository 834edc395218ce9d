//! Scene-writing and command line

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use nexus_core::Mood;

use crate::app::InputMode;
use crate::ui::theme::StoryTheme;

/// Input line below the choices.
///
/// In READ mode it only hints at what writing would do here; in WRITE mode
/// the title carries the mood the new scene will get.
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    mode: InputMode,
    scene_mood: &'a Mood,
    at_ending: bool,
    theme: &'a StoryTheme,
}

impl<'a> InputWidget<'a> {
    pub fn new(
        content: &'a str,
        mode: InputMode,
        scene_mood: &'a Mood,
        theme: &'a StoryTheme,
    ) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            mode,
            scene_mood,
            at_ending: false,
            theme,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    /// The current node has no choices, so a new scene continues the story.
    pub fn at_ending(mut self, at_ending: bool) -> Self {
        self.at_ending = at_ending;
        self
    }

    fn title(&self) -> String {
        match self.mode {
            InputMode::Normal => String::new(),
            InputMode::Insert => format!(" New {} scene ", self.scene_mood),
            InputMode::Command => " Command ".to_string(),
        }
    }

    fn hint(&self) -> &'static str {
        match (self.mode, self.at_ending) {
            (InputMode::Command, _) => "export, import, scene, branch, mood, prompt, q",
            (_, true) => "The story ends here. Press i to write what happens next...",
            (InputMode::Insert, false) => "Type the scene; it becomes a new choice here",
            (InputMode::Normal, false) => "Press i to write a new scene here...",
        }
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let writing = self.mode != InputMode::Normal;
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.mode == InputMode::Insert {
                self.theme.mood_border_style(self.scene_mood)
            } else {
                self.theme.border_style(writing)
            });
        let title = self.title();
        if !title.is_empty() {
            block = block.title(title);
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let (prefix, text, cursor) = match self.mode {
            // The buffer keeps its leading ':' in command mode
            InputMode::Command => (
                ":",
                self.content.strip_prefix(':').unwrap_or(self.content),
                self.cursor_position.saturating_sub(1),
            ),
            _ => ("✎ ", self.content, self.cursor_position),
        };
        let prefix = Span::styled(prefix, self.theme.choice_style(writing));

        let line = if !writing || text.is_empty() {
            Line::from(vec![
                prefix,
                Span::styled(self.hint(), Style::default().add_modifier(Modifier::DIM)),
            ])
        } else {
            let (before, at, after) = split_at_cursor(text, cursor);
            Line::from(vec![
                prefix,
                Span::styled(before, self.theme.story_style()),
                Span::styled(
                    at,
                    Style::default()
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                        .fg(self.theme.choice_selected),
                ),
                Span::styled(after, self.theme.story_style()),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}

/// Split on a character index; the cursor cell is a space past the end.
fn split_at_cursor(text: &str, cursor: usize) -> (String, String, String) {
    let mut chars = text.chars();
    let before: String = chars.by_ref().take(cursor).collect();
    let at = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    (before, at, chars.collect())
}
