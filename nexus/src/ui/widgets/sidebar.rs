//! Journey sidebar: statistics, progress and achievements

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use nexus_core::{Achievements, SessionStats};

use crate::ui::theme::StoryTheme;

/// Compact journey panel for the sidebar
pub struct SidebarWidget<'a> {
    stats: &'a SessionStats,
    achievements: &'a Achievements,
    progress: f64,
    journey: &'a str,
    theme: &'a StoryTheme,
}

impl<'a> SidebarWidget<'a> {
    pub fn new(
        stats: &'a SessionStats,
        achievements: &'a Achievements,
        theme: &'a StoryTheme,
    ) -> Self {
        Self {
            stats,
            achievements,
            progress: 0.0,
            journey: "",
            theme,
        }
    }

    pub fn progress(mut self, progress: f64) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    pub fn journey(mut self, journey: &'a str) -> Self {
        self.journey = journey;
        self
    }
}

impl Widget for SidebarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Your Journey ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Progress bar
                Constraint::Length(4), // Stats
                Constraint::Min(0),    // Achievements and path
            ])
            .split(inner);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(self.theme.progress))
            .ratio(self.progress)
            .label(format!("{:.0}% explored", self.progress * 100.0));
        gauge.render(chunks[0], buf);

        let stats = vec![
            Line::from(""),
            Line::from(format!("🔀 Choices made: {}", self.stats.choices_made)),
            Line::from(format!("⏱️ Minutes: {}", self.stats.minutes_played)),
            Line::from(format!(
                "🏆 Achievements: {}/{}",
                self.stats.achievements_unlocked, self.stats.achievements_available
            )),
        ];
        Paragraph::new(stats).render(chunks[1], buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Achievements",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )),
        ];
        if self.achievements.is_empty() {
            lines.push(Line::from(Span::styled(
                "  none yet",
                self.theme.system_style(),
            )));
        }
        for name in self.achievements.iter() {
            lines.push(Line::from(Span::styled(
                format!("  🏆 {name}"),
                self.theme.achievement_style(),
            )));
        }

        if !self.journey.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Path",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(Span::styled(self.journey, self.theme.system_style())));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
    }
}
