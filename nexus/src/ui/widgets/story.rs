//! Story text widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use nexus_core::StoryNode;

use crate::ui::theme::StoryTheme;

/// Widget for the current node's text, image prompt and ending banner
pub struct StoryWidget<'a> {
    node: &'a StoryNode,
    chapter: usize,
    scroll: u16,
    theme: &'a StoryTheme,
}

impl<'a> StoryWidget<'a> {
    pub fn new(node: &'a StoryNode, theme: &'a StoryTheme) -> Self {
        Self {
            node,
            chapter: 1,
            scroll: 0,
            theme,
        }
    }

    pub fn chapter(mut self, chapter: usize) -> Self {
        self.chapter = chapter;
        self
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for StoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = self.theme.mood_color(&self.node.mood);
        let title = Line::from(vec![
            Span::raw(format!(" Chapter {} ", self.chapter)),
            Span::styled(
                format!("· {} ", self.node.mood),
                Style::default().fg(accent).add_modifier(Modifier::ITALIC),
            ),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.mood_border_style(&self.node.mood));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        if self.node.is_ending() {
            lines.push(Line::from(Span::styled(
                "🏁 Story Conclusion",
                self.theme.ending_style(),
            )));
            lines.push(Line::from(""));
        }

        for line in self.node.text.lines() {
            lines.push(Line::from(Span::styled(line, self.theme.story_style())));
        }

        if !self.node.image_prompt.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("🎨 Imagine: ", self.theme.system_style()),
                Span::styled(self.node.image_prompt.as_str(), self.theme.prompt_style()),
            ]));
        }

        // Approximate wrapped height for scroll bounds
        let width = inner.width.max(1) as usize;
        let total_lines: usize = lines.iter().map(|l| l.width().max(1).div_ceil(width)).sum();
        let visible_height = inner.height as usize;
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = (self.scroll as usize).min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
