//! Render orchestration for the story player

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    ChoicesWidget, HotkeyBarWidget, InputWidget, SidebarWidget, StatusBarWidget, StoryWidget,
};

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
    /// A newly unlocked achievement.
    Achievement(String),
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let node = app.current_node();
    let choice_count = node.map(|n| n.choices.len()).unwrap_or(0);
    let layout = AppLayout::calculate(area, choice_count);

    render_title_bar(frame, app, layout.title_area);

    match node {
        Some(node) => {
            let story = StoryWidget::new(node, &app.theme)
                .chapter(app.play.session().history().len())
                .scroll(app.story_scroll);
            frame.render_widget(story, layout.story_area);

            let choices = ChoicesWidget::new(&node.choices, &app.theme).selected(app.selected);
            frame.render_widget(choices, layout.choices_area);
        }
        None => {
            let missing = Paragraph::new(Line::from(Span::styled(
                format!("Node {} is missing from the story", app.play.current_id()),
                app.theme.ending_style(),
            )))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(missing, layout.story_area);
        }
    }

    let stats = app.play.stats();
    let journey = app.play.journey_path();
    let sidebar = SidebarWidget::new(&stats, app.play.achievements(), &app.theme)
        .progress(app.play.progress())
        .journey(&journey);
    frame.render_widget(sidebar, layout.sidebar_area);

    let status = StatusBarWidget::new(app.input_mode, &app.scene_mood, &app.theme)
        .message(app.status_message());
    frame.render_widget(status, layout.status_bar);

    frame.render_widget(HotkeyBarWidget::new(app.input_mode), layout.hotkey_bar);

    render_input(frame, app, layout.input_area);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " 📖 Narrative Nexus | {} scenes | {} ",
        app.play.graph().len(),
        app.play.current_id()
    );
    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the input area
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let at_ending = app.current_node().is_some_and(|n| n.is_ending());

    let input_widget =
        InputWidget::new(app.input_buffer(), app.input_mode, &app.scene_mood, &app.theme)
            .cursor_position(app.cursor_position())
            .at_ending(at_ending);

    frame.render_widget(input_widget, area);
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
        Overlay::Achievement(name) => render_achievement_overlay(frame, app, name, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 26, area);
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " Narrative Nexus - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Reading:"),
        Line::from("  1-9            Take a numbered choice"),
        Line::from("  j/k or ↑/↓     Move the highlight"),
        Line::from("  Enter          Take the highlighted choice"),
        Line::from("  u / r          Undo / restart"),
        Line::from("  PgUp/PgDn      Scroll long scenes"),
        Line::from(""),
        heading("Writing:"),
        Line::from("  i              Write a scene linked from here"),
        Line::from("  :scene <text>  Same, from the command line"),
        Line::from("  :branch <text> Add a crossroads leading to it"),
        Line::from("  :mood <mood>   Mood for new scenes"),
        Line::from("  :prompt <text> Image prompt for new scenes"),
        Line::from(""),
        heading("Files:"),
        Line::from("  :export [path]      Save the story as JSON"),
        Line::from("  :import [path]      Load a story (newest export)"),
        Line::from("  :transcript [path]  Save your adventure as text"),
        Line::from("  :q                  Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render the achievement notice
fn render_achievement_overlay(frame: &mut Frame, app: &App, name: &str, area: Rect) {
    let popup_area = centered_rect_fixed(44, 7, area);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("🏆 Achievement Unlocked", app.theme.achievement_style())),
        Line::from(Span::styled(name, app.theme.story_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.achievement));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(paragraph, popup_area);
}
