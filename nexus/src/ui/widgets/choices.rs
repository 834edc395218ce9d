//! Numbered choice list

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use nexus_core::Choices;

use crate::ui::theme::StoryTheme;

/// Widget listing the current node's choices, with one highlighted
pub struct ChoicesWidget<'a> {
    choices: &'a Choices,
    selected: usize,
    theme: &'a StoryTheme,
}

impl<'a> ChoicesWidget<'a> {
    pub fn new(choices: &'a Choices, theme: &'a StoryTheme) -> Self {
        Self {
            choices,
            selected: 0,
            theme,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for ChoicesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" What will you do? ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(!self.choices.is_empty()));

        let lines: Vec<Line> = if self.choices.is_empty() {
            vec![Line::from(Span::styled(
                "The end. Press u to go back or r to begin again.",
                self.theme.system_style(),
            ))]
        } else {
            self.choices
                .iter()
                .enumerate()
                .map(|(i, choice)| {
                    let is_selected = i == self.selected;
                    let marker = if is_selected { "▶ " } else { "  " };
                    // Only 1-9 have hotkeys
                    let number = if i < 9 {
                        format!("{}. ", i + 1)
                    } else {
                        "   ".to_string()
                    };
                    Line::from(vec![
                        Span::styled(marker, self.theme.choice_style(is_selected)),
                        Span::styled(number, self.theme.system_style()),
                        Span::styled(choice.label.as_str(), self.theme.choice_style(is_selected)),
                    ])
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
