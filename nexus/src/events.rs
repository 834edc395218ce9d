//! Event handling for the story player

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (choosing and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Choose by number
        KeyCode::Char(c @ '1'..='9') => {
            let n = c as usize - '0' as usize;
            app.choose(n);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.choose_selected();
            EventResult::NeedsRedraw
        }

        // Selection
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            EventResult::NeedsRedraw
        }

        // Story text scrolling
        KeyCode::PageUp => {
            app.scroll_up(5);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(5);
            EventResult::NeedsRedraw
        }

        // Story actions
        KeyCode::Char('u') => {
            app.undo();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.restart();
            EventResult::NeedsRedraw
        }

        // Mode switching
        KeyCode::Char('i') => {
            app.enter_insert_mode();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        KeyCode::Char('q') => EventResult::Quit,

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (writing a scene)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
            app.clear_status();
            EventResult::NeedsRedraw
        }

        // Add the scene
        KeyCode::Enter => {
            let text = app.submit_input().unwrap_or_default();
            app.input_mode = InputMode::Normal;
            app.add_scene(&text);
            EventResult::NeedsRedraw
        }

        // Input editing
        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
            EventResult::NeedsRedraw
        }

        // Execute command
        KeyCode::Enter => {
            let command = app.input_buffer().to_string();
            app.enter_normal_mode();
            app.process_command(&command);

            if app.should_quit {
                EventResult::Quit
            } else {
                EventResult::NeedsRedraw
            }
        }

        // Input editing
        KeyCode::Left => {
            if app.cursor_position() > 1 {
                app.cursor_left();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            if app.cursor_position() > 1 {
                app.backspace();
            } else {
                // Backspace on just ":" exits command mode
                app.enter_normal_mode();
            }
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
